//! Actor, item construction and property storage seams.

use crate::equipment::EquipmentSlot;
use crate::error::HostError;
use crate::item::ItemInstance;

/// An entity that carries items: a general inventory plus worn equipment.
pub trait Actor {
    /// Item type held in this actor's slots.
    type Item: ItemInstance;

    /// Stable identifier of the actor. Default snapshot name.
    fn identifier(&self) -> &str;

    /// Number of general inventory slots.
    fn inventory_size(&self) -> usize;

    /// Item in an inventory slot, `None` when the slot is empty or out of range.
    fn inventory_item(&self, slot: usize) -> Option<&Self::Item>;

    /// Put an item into (or with `None`, clear) an inventory slot.
    fn set_inventory_item(&mut self, slot: usize, item: Option<Self::Item>)
        -> Result<(), HostError>;

    /// Item worn in an equipment slot.
    fn equipment(&self, slot: EquipmentSlot) -> Option<&Self::Item>;

    /// Put an item into (or with `None`, clear) an equipment slot.
    fn set_equipment(&mut self, slot: EquipmentSlot, item: Option<Self::Item>)
        -> Result<(), HostError>;
}

/// Constructs fresh items from a type identifier.
pub trait ItemFactory {
    /// Item type produced.
    type Item: ItemInstance;

    /// New item of `type_id` with the type's default amount and attributes.
    ///
    /// Fails with [`HostError::UnknownItemType`] when the identifier does not resolve.
    fn create_item(&self, type_id: &str) -> Result<Self::Item, HostError>;
}

/// String key-value store attached to an entity (or the world).
pub trait PropertyStore {
    /// Value stored at `key`, `None` if the key was never written.
    fn property(&self, key: &str) -> Result<Option<String>, HostError>;

    /// Store `value` at `key`, replacing any previous value.
    fn set_property(&mut self, key: &str, value: String) -> Result<(), HostError>;
}

impl<S: PropertyStore + ?Sized> PropertyStore for &mut S {
    fn property(&self, key: &str) -> Result<Option<String>, HostError> {
        (**self).property(key)
    }

    fn set_property(&mut self, key: &str, value: String) -> Result<(), HostError> {
        (**self).set_property(key, value)
    }
}
