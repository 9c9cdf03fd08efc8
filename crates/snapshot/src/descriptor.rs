//! Persisted shape of one carried item, and of a whole loadout.

use std::fmt;
use std::num::NonZeroU32;

use loadout_core::{Enchantment, EquipmentSlot, LockMode};
use serde::{Deserialize, Serialize};

/// Number of worn-equipment slots in an armor sequence.
pub const ARMOR_SLOTS: usize = EquipmentSlot::ALL.len();

/// One occupied slot at capture time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDescriptor {
    /// Base item type identifier.
    pub type_id: String,
    /// Scalar attributes.
    pub props: ItemProps,
    /// Lore lines in display order.
    #[serde(default)]
    pub lore: Vec<String>,
    /// Capability data, present only for capabilities the item exposed.
    #[serde(default)]
    pub components: ItemComponents,
}

/// Scalar item attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemProps {
    /// Stack amount. Zero-amount stacks are never described.
    pub amount: NonZeroU32,
    /// Keep-on-death flag.
    #[serde(default)]
    pub keep_on_death: bool,
    /// Lock mode.
    #[serde(default)]
    pub lock_mode: LockMode,
    /// Custom name; absent when the item had none or an empty one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_tag: Option<String>,
}

/// Optional capability blocks.
///
/// Each field is `Some` exactly when the live item exposed that capability, so an
/// enchantable item with no enchantments still carries `enchantable: []`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemComponents {
    /// Enchantments in the capability's enumeration order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enchantable: Option<Vec<Enchantment>>,
    /// Accumulated damage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub durability: Option<u32>,
}

/// Positional slot contents; `None` marks an empty slot.
pub type SlotSequence = Vec<Option<ItemDescriptor>>;

/// Which of the two persisted sequences a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SequenceKind {
    /// Worn equipment, five slots.
    Armor,
    /// General inventory, one entry per slot.
    Inventory,
}

impl fmt::Display for SequenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SequenceKind::Armor => f.write_str("armor"),
            SequenceKind::Inventory => f.write_str("inventory"),
        }
    }
}

/// Address of a slot within a loadout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotRef {
    /// Worn-equipment slot.
    Equipment(EquipmentSlot),
    /// General inventory slot index.
    Inventory(usize),
    /// Stored entry with no matching slot on the actor (sequence longer than the
    /// actor's capacity).
    Overflow {
        /// Sequence the entry came from.
        kind: SequenceKind,
        /// Position within that sequence.
        index: usize,
    },
}

impl SlotRef {
    /// Slot for position `index` of a sequence of `kind`, given the actor's capacity.
    pub fn for_index(kind: SequenceKind, index: usize, capacity: usize) -> Self {
        match kind {
            SequenceKind::Armor => match EquipmentSlot::from_index(index) {
                Some(slot) => SlotRef::Equipment(slot),
                None => SlotRef::Overflow { kind, index },
            },
            SequenceKind::Inventory if index < capacity => SlotRef::Inventory(index),
            SequenceKind::Inventory => SlotRef::Overflow { kind, index },
        }
    }
}

impl fmt::Display for SlotRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotRef::Equipment(slot) => write!(f, "{slot}"),
            SlotRef::Inventory(index) => write!(f, "inventory[{index}]"),
            SlotRef::Overflow { kind, index } => write!(f, "{kind}[{index}] (no such slot)"),
        }
    }
}

/// The pair of sequences captured from one actor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Loadout {
    /// Equipment in [`EquipmentSlot::ALL`] order.
    pub armor: SlotSequence,
    /// Inventory in slot index order.
    pub inventory: SlotSequence,
}

impl Loadout {
    /// An all-empty loadout for an actor with `capacity` inventory slots.
    pub fn empty(capacity: usize) -> Self {
        Self {
            armor: vec![None; ARMOR_SLOTS],
            inventory: vec![None; capacity],
        }
    }

    /// Whether every slot is empty.
    pub fn is_empty(&self) -> bool {
        self.armor.iter().chain(&self.inventory).all(Option::is_none)
    }

    /// Number of occupied slots.
    pub fn occupied(&self) -> usize {
        self.iter_occupied().count()
    }

    /// Occupied slots, equipment first, then inventory in index order.
    pub fn iter_occupied(&self) -> impl Iterator<Item = (SlotRef, &ItemDescriptor)> + '_ {
        let armor = self.armor.iter().enumerate().filter_map(|(i, slot)| {
            let item = slot.as_ref()?;
            Some((SlotRef::for_index(SequenceKind::Armor, i, 0), item))
        });
        let capacity = self.inventory.len();
        let inventory = self.inventory.iter().enumerate().filter_map(move |(i, slot)| {
            let item = slot.as_ref()?;
            Some((SlotRef::for_index(SequenceKind::Inventory, i, capacity), item))
        });
        armor.chain(inventory)
    }

    /// Descriptor in an equipment slot.
    pub fn equipment(&self, slot: EquipmentSlot) -> Option<&ItemDescriptor> {
        self.armor.get(slot.index()).and_then(Option::as_ref)
    }
}

impl ItemDescriptor {
    /// One-line human summary: `diamond_sword x1 "Excalibur" [sharpness 5] damage 12`.
    pub fn summary(&self) -> String {
        let mut out = format!("{} x{}", self.type_id, self.props.amount);
        if let Some(name) = &self.props.name_tag {
            out.push_str(&format!(" \"{name}\""));
        }
        if let Some(enchantments) = &self.components.enchantable {
            if !enchantments.is_empty() {
                let list: Vec<String> = enchantments.iter().map(ToString::to_string).collect();
                out.push_str(&format!(" [{}]", list.join(", ")));
            }
        }
        if let Some(damage) = self.components.durability {
            out.push_str(&format!(" damage {damage}"));
        }
        if self.props.lock_mode != LockMode::None {
            out.push_str(&format!(" lock={}", self.props.lock_mode.as_str()));
        }
        if self.props.keep_on_death {
            out.push_str(" keep-on-death");
        }
        out
    }
}
