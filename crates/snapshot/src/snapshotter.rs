//! Capture of an actor's carried items into persisted sequences.

use std::num::NonZeroU32;

use loadout_core::{Actor, EquipmentSlot, ItemInstance, PropertyStore};
use tracing::debug;

use crate::codec::encode_sequence;
use crate::descriptor::{
    ItemComponents, ItemDescriptor, ItemProps, Loadout, SequenceKind, SlotSequence,
};
use crate::error::LoadoutError;
use crate::keys::SnapshotKeys;

/// Describe one live item.
///
/// Returns `None` for a zero-amount stack, which is recorded as an empty slot.
pub fn describe_item<I: ItemInstance + ?Sized>(item: &I) -> Option<ItemDescriptor> {
    let amount = NonZeroU32::new(item.amount())?;
    let name_tag = item
        .name_tag()
        .filter(|name| !name.is_empty())
        .map(str::to_string);

    Some(ItemDescriptor {
        type_id: item.type_id().to_string(),
        props: ItemProps {
            amount,
            keep_on_death: item.keep_on_death(),
            lock_mode: item.lock_mode(),
            name_tag,
        },
        lore: item.lore(),
        components: ItemComponents {
            enchantable: item.enchantable().map(|cap| cap.enchantments()),
            durability: item.durability().map(|cap| cap.damage()),
        },
    })
}

/// Worn equipment in [`EquipmentSlot::ALL`] order.
pub fn capture_armor<A: Actor + ?Sized>(actor: &A) -> SlotSequence {
    EquipmentSlot::ALL
        .iter()
        .map(|slot| actor.equipment(*slot).and_then(describe_item))
        .collect()
}

/// Inventory slots `0..inventory_size()` in index order.
pub fn capture_inventory<A: Actor + ?Sized>(actor: &A) -> SlotSequence {
    (0..actor.inventory_size())
        .map(|slot| actor.inventory_item(slot).and_then(describe_item))
        .collect()
}

/// Both sequences, without persisting anything.
pub fn capture<A: Actor + ?Sized>(actor: &A) -> Loadout {
    Loadout {
        armor: capture_armor(actor),
        inventory: capture_inventory(actor),
    }
}

/// Writes snapshots of actors to property stores.
#[derive(Debug, Clone, Default)]
pub struct Snapshotter {
    keys: SnapshotKeys,
}

impl Snapshotter {
    /// Snapshotter using the default `armor:` / `inventory:` key layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshotter using a custom key layout.
    pub fn with_keys(keys: SnapshotKeys) -> Self {
        Self { keys }
    }

    /// Key layout in use.
    pub fn keys(&self) -> &SnapshotKeys {
        &self.keys
    }

    /// Snapshot `actor` into its own property store.
    ///
    /// `name` defaults to the actor's identifier.
    pub fn snapshot<A>(&self, actor: &mut A, name: Option<&str>) -> Result<Loadout, LoadoutError>
    where
        A: Actor + PropertyStore,
    {
        let name = name.unwrap_or(actor.identifier()).to_string();

        let armor = capture_armor(&*actor);
        self.write(actor, SequenceKind::Armor, &name, &armor)?;

        let inventory = capture_inventory(&*actor);
        self.write(actor, SequenceKind::Inventory, &name, &inventory)?;

        Ok(Loadout { armor, inventory })
    }

    /// Snapshot `actor` into another entity's property store.
    pub fn snapshot_to<A, S>(
        &self,
        actor: &A,
        name: Option<&str>,
        storage: &mut S,
    ) -> Result<Loadout, LoadoutError>
    where
        A: Actor + ?Sized,
        S: PropertyStore + ?Sized,
    {
        let name = name.unwrap_or(actor.identifier());

        let armor = capture_armor(actor);
        self.write(storage, SequenceKind::Armor, name, &armor)?;

        let inventory = capture_inventory(actor);
        self.write(storage, SequenceKind::Inventory, name, &inventory)?;

        Ok(Loadout { armor, inventory })
    }

    /// Persist an already captured loadout under `name`.
    pub fn persist<S>(
        &self,
        loadout: &Loadout,
        name: &str,
        storage: &mut S,
    ) -> Result<(), LoadoutError>
    where
        S: PropertyStore + ?Sized,
    {
        self.write(storage, SequenceKind::Armor, name, &loadout.armor)?;
        self.write(storage, SequenceKind::Inventory, name, &loadout.inventory)
    }

    fn write<S>(
        &self,
        storage: &mut S,
        kind: SequenceKind,
        name: &str,
        slots: &[Option<ItemDescriptor>],
    ) -> Result<(), LoadoutError>
    where
        S: PropertyStore + ?Sized,
    {
        let payload =
            encode_sequence(slots).map_err(|source| LoadoutError::Encode { kind, source })?;
        let key = self.keys.key(kind, name);
        debug!(
            %key,
            slots = slots.len(),
            occupied = slots.iter().filter(|slot| slot.is_some()).count(),
            bytes = payload.len(),
            "writing {kind} sequence"
        );
        storage.set_property(&key, payload)?;
        Ok(())
    }
}
