//! Item instances and their optional capabilities.

use serde::{Deserialize, Serialize};

use crate::enchantment::Enchantment;
use crate::error::CapabilityError;

/// How an item is locked to its holder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LockMode {
    /// Item moves and drops freely.
    #[default]
    None,
    /// Item cannot leave its slot.
    Slot,
    /// Item can move within the inventory but cannot leave it.
    Inventory,
}

impl LockMode {
    /// Wire name of the lock mode.
    pub fn as_str(self) -> &'static str {
        match self {
            LockMode::None => "none",
            LockMode::Slot => "slot",
            LockMode::Inventory => "inventory",
        }
    }
}

/// A live item stack owned by the host.
///
/// Scalar attributes are always present. Enchantments and durability exist only
/// on some item types; the probes return `None` when the type lacks the facet.
pub trait ItemInstance {
    /// Identifier of the item's base type (`minecraft:diamond_sword`).
    fn type_id(&self) -> &str;

    /// Stack amount (1 and up).
    fn amount(&self) -> u32;
    /// Set the stack amount. Hosts reject amounts above the type's stack limit.
    fn set_amount(&mut self, amount: u32) -> Result<(), CapabilityError>;

    /// Whether the item stays with the holder on death.
    fn keep_on_death(&self) -> bool;
    /// Set the keep-on-death flag.
    fn set_keep_on_death(&mut self, keep: bool);

    /// Lock mode of the item.
    fn lock_mode(&self) -> LockMode;
    /// Set the lock mode.
    fn set_lock_mode(&mut self, mode: LockMode);

    /// Custom display name, if any.
    fn name_tag(&self) -> Option<&str>;
    /// Set or clear the custom display name.
    fn set_name_tag(&mut self, name_tag: Option<String>);

    /// Lore lines shown under the name.
    fn lore(&self) -> Vec<String>;
    /// Replace all lore lines.
    fn set_lore(&mut self, lore: Vec<String>);

    /// Enchantment facet, if the item type can carry enchantments.
    fn enchantable(&self) -> Option<&dyn Enchantable>;
    /// Mutable enchantment facet.
    fn enchantable_mut(&mut self) -> Option<&mut dyn Enchantable>;

    /// Durability facet, if the item type wears down.
    fn durability(&self) -> Option<&dyn Durability>;
    /// Mutable durability facet.
    fn durability_mut(&mut self) -> Option<&mut dyn Durability>;
}

/// Enchantment facet of an item.
pub trait Enchantable {
    /// Enchantments in the host's enumeration order.
    fn enchantments(&self) -> Vec<Enchantment>;

    /// Resolve and apply an enchantment.
    fn add_enchantment(&mut self, enchantment: Enchantment) -> Result<(), CapabilityError>;
}

/// Durability facet of an item.
pub trait Durability {
    /// Damage accumulated so far (0 = pristine).
    fn damage(&self) -> u32;

    /// Damage at which the item breaks.
    fn max_durability(&self) -> u32;

    /// Overwrite the accumulated damage.
    fn set_damage(&mut self, damage: u32) -> Result<(), CapabilityError>;

    /// Uses left before the item breaks.
    fn remaining(&self) -> u32 {
        self.max_durability().saturating_sub(self.damage())
    }
}
