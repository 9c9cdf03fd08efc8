//! In-memory fake of the scripting host: item registry, items, actors.

use std::collections::BTreeMap;

use anyhow::{bail, Result};
use loadout_core::{
    Actor, CapabilityError, Durability, Enchantable, Enchantment, EquipmentSlot, HostError,
    ItemFactory, ItemInstance, LockMode, MemoryPropertyStore, PropertyStore,
};

use crate::rules;

/// What the fake registry knows about an item type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemTypeDef {
    /// Largest stack.
    pub max_stack: u32,
    /// Whether items of this type expose the enchantment capability.
    pub enchantable: bool,
    /// Durability of a pristine item; `None` for items that never wear.
    pub max_durability: Option<u32>,
}

impl ItemTypeDef {
    /// Stackable material without capabilities.
    pub const fn material(max_stack: u32) -> Self {
        Self {
            max_stack,
            enchantable: false,
            max_durability: None,
        }
    }

    /// Single-stack enchantable gear that wears down.
    pub const fn gear(max_durability: u32) -> Self {
        Self {
            max_stack: 1,
            enchantable: true,
            max_durability: Some(max_durability),
        }
    }

    /// Same definition with the enchantment capability switched on.
    pub const fn enchantable(mut self) -> Self {
        self.enchantable = true;
        self
    }
}

/// Item type registry implementing [`ItemFactory`].
#[derive(Debug, Clone, Default)]
pub struct TestItemRegistry {
    types: BTreeMap<String, ItemTypeDef>,
}

impl TestItemRegistry {
    /// Registry with no types.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with a handful of vanilla weapons, armor and materials.
    pub fn vanilla() -> Self {
        let mut registry = Self::new();
        for (id, def) in [
            ("minecraft:diamond_sword", ItemTypeDef::gear(1561)),
            ("minecraft:iron_pickaxe", ItemTypeDef::gear(250)),
            ("minecraft:bow", ItemTypeDef::gear(384)),
            ("minecraft:diamond_helmet", ItemTypeDef::gear(363)),
            ("minecraft:diamond_chestplate", ItemTypeDef::gear(528)),
            ("minecraft:iron_leggings", ItemTypeDef::gear(225)),
            ("minecraft:leather_boots", ItemTypeDef::gear(65)),
            ("minecraft:shield", ItemTypeDef::gear(336)),
            ("minecraft:elytra", ItemTypeDef::gear(432)),
            ("minecraft:enchanted_book", ItemTypeDef::material(1).enchantable()),
            ("minecraft:totem_of_undying", ItemTypeDef::material(1)),
            ("minecraft:dirt", ItemTypeDef::material(64)),
            ("minecraft:cobblestone", ItemTypeDef::material(64)),
            ("minecraft:bread", ItemTypeDef::material(64)),
            ("minecraft:arrow", ItemTypeDef::material(64)),
            ("minecraft:ender_pearl", ItemTypeDef::material(16)),
        ] {
            registry.register(id, def);
        }
        registry
    }

    /// Add or replace a type definition.
    pub fn register(&mut self, type_id: impl Into<String>, def: ItemTypeDef) {
        self.types.insert(type_id.into(), def);
    }

    /// Remove a type, simulating content removed between snapshot and restore.
    pub fn unregister(&mut self, type_id: &str) -> Option<ItemTypeDef> {
        self.types.remove(type_id)
    }

    /// Definition of a type.
    pub fn def(&self, type_id: &str) -> Option<ItemTypeDef> {
        self.types.get(type_id).copied()
    }

    /// Fresh item with `amount`, ready for the builder methods on [`TestItem`].
    pub fn stack(&self, type_id: &str, amount: u32) -> Result<TestItem> {
        let mut item = self.create_item(type_id)?;
        item.set_amount(amount)?;
        Ok(item)
    }
}

impl ItemFactory for TestItemRegistry {
    type Item = TestItem;

    fn create_item(&self, type_id: &str) -> Result<TestItem, HostError> {
        let def = self
            .def(type_id)
            .ok_or_else(|| HostError::UnknownItemType(type_id.to_string()))?;
        Ok(TestItem {
            type_id: type_id.to_string(),
            amount: 1,
            max_stack: def.max_stack,
            keep_on_death: false,
            lock_mode: LockMode::None,
            name_tag: None,
            lore: Vec::new(),
            enchantments: def.enchantable.then(EnchantmentList::default),
            wear: def.max_durability.map(|max| Wear { damage: 0, max }),
        })
    }
}

/// Enchantment capability of a [`TestItem`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnchantmentList(Vec<Enchantment>);

impl Enchantable for EnchantmentList {
    fn enchantments(&self) -> Vec<Enchantment> {
        self.0.clone()
    }

    fn add_enchantment(&mut self, enchantment: Enchantment) -> Result<(), CapabilityError> {
        rules::apply(&mut self.0, enchantment)
    }
}

/// Durability capability of a [`TestItem`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Wear {
    damage: u32,
    max: u32,
}

impl Durability for Wear {
    fn damage(&self) -> u32 {
        self.damage
    }

    fn max_durability(&self) -> u32 {
        self.max
    }

    fn set_damage(&mut self, damage: u32) -> Result<(), CapabilityError> {
        if damage > self.max {
            return Err(CapabilityError::DamageOutOfRange {
                damage,
                max: self.max,
            });
        }
        self.damage = damage;
        Ok(())
    }
}

/// An item stack held by the fake host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestItem {
    type_id: String,
    amount: u32,
    max_stack: u32,
    keep_on_death: bool,
    lock_mode: LockMode,
    name_tag: Option<String>,
    lore: Vec<String>,
    enchantments: Option<EnchantmentList>,
    wear: Option<Wear>,
}

impl TestItem {
    /// Set the custom name.
    pub fn named(mut self, name: &str) -> Self {
        self.name_tag = Some(name.to_string());
        self
    }

    /// Replace the lore lines.
    pub fn with_lore<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lore = lines.into_iter().map(Into::into).collect();
        self
    }

    /// Set the lock mode.
    pub fn locked(mut self, mode: LockMode) -> Self {
        self.lock_mode = mode;
        self
    }

    /// Mark the item as kept on death.
    pub fn kept_on_death(mut self) -> Self {
        self.keep_on_death = true;
        self
    }

    /// Add an enchantment through the host rules.
    pub fn enchanted(mut self, kind: &str, level: u32) -> Result<Self> {
        let Some(list) = self.enchantments.as_mut() else {
            bail!("{} cannot be enchanted", self.type_id);
        };
        list.add_enchantment(Enchantment::new(kind, level))?;
        Ok(self)
    }

    /// Set accumulated damage.
    pub fn damaged(mut self, damage: u32) -> Result<Self> {
        let Some(wear) = self.wear.as_mut() else {
            bail!("{} has no durability", self.type_id);
        };
        wear.set_damage(damage)?;
        Ok(self)
    }
}

impl ItemInstance for TestItem {
    fn type_id(&self) -> &str {
        &self.type_id
    }

    fn amount(&self) -> u32 {
        self.amount
    }

    fn set_amount(&mut self, amount: u32) -> Result<(), CapabilityError> {
        if amount == 0 || amount > self.max_stack {
            return Err(CapabilityError::AmountOutOfRange {
                amount,
                max: self.max_stack,
            });
        }
        self.amount = amount;
        Ok(())
    }

    fn keep_on_death(&self) -> bool {
        self.keep_on_death
    }

    fn set_keep_on_death(&mut self, keep: bool) {
        self.keep_on_death = keep;
    }

    fn lock_mode(&self) -> LockMode {
        self.lock_mode
    }

    fn set_lock_mode(&mut self, mode: LockMode) {
        self.lock_mode = mode;
    }

    fn name_tag(&self) -> Option<&str> {
        self.name_tag.as_deref()
    }

    fn set_name_tag(&mut self, name_tag: Option<String>) {
        self.name_tag = name_tag;
    }

    fn lore(&self) -> Vec<String> {
        self.lore.clone()
    }

    fn set_lore(&mut self, lore: Vec<String>) {
        self.lore = lore;
    }

    fn enchantable(&self) -> Option<&dyn Enchantable> {
        self.enchantments.as_ref().map(|list| list as &dyn Enchantable)
    }

    fn enchantable_mut(&mut self) -> Option<&mut dyn Enchantable> {
        self.enchantments
            .as_mut()
            .map(|list| list as &mut dyn Enchantable)
    }

    fn durability(&self) -> Option<&dyn Durability> {
        self.wear.as_ref().map(|wear| wear as &dyn Durability)
    }

    fn durability_mut(&mut self) -> Option<&mut dyn Durability> {
        self.wear.as_mut().map(|wear| wear as &mut dyn Durability)
    }
}

/// A player-like actor with inventory, equipment and its own property store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestActor {
    id: String,
    inventory: Vec<Option<TestItem>>,
    equipment: [Option<TestItem>; 5],
    properties: MemoryPropertyStore,
}

impl TestActor {
    /// Inventory size of a vanilla player (hotbar plus main inventory).
    pub const PLAYER_INVENTORY_SIZE: usize = 36;

    /// Player with a 36-slot inventory.
    pub fn player(id: &str) -> Self {
        Self::with_capacity(id, Self::PLAYER_INVENTORY_SIZE)
    }

    /// Actor with a custom inventory size.
    pub fn with_capacity(id: &str, capacity: usize) -> Self {
        Self {
            id: id.to_string(),
            inventory: vec![None; capacity],
            equipment: Default::default(),
            properties: MemoryPropertyStore::new(),
        }
    }

    /// Put `item` into inventory slot `slot`.
    pub fn give(&mut self, slot: usize, item: TestItem) -> Result<()> {
        self.set_inventory_item(slot, Some(item))?;
        Ok(())
    }

    /// Wear `item` in `slot`.
    pub fn equip(&mut self, slot: EquipmentSlot, item: TestItem) {
        self.equipment[slot.index()] = Some(item);
    }

    /// Empty every inventory and equipment slot. Properties are kept.
    pub fn strip(&mut self) {
        self.inventory.iter_mut().for_each(|slot| *slot = None);
        self.equipment.iter_mut().for_each(|slot| *slot = None);
    }

    /// Inventory slots.
    pub fn inventory(&self) -> &[Option<TestItem>] {
        &self.inventory
    }

    /// Equipment slots in [`EquipmentSlot::ALL`] order.
    pub fn worn(&self) -> &[Option<TestItem>] {
        &self.equipment
    }

    /// Whether both actors hold identical items in every slot.
    pub fn same_loadout(&self, other: &TestActor) -> bool {
        self.inventory == other.inventory && self.equipment == other.equipment
    }

    /// The actor's property store.
    pub fn properties(&self) -> &MemoryPropertyStore {
        &self.properties
    }

    /// Mutable access to the actor's property store.
    pub fn properties_mut(&mut self) -> &mut MemoryPropertyStore {
        &mut self.properties
    }
}

impl Actor for TestActor {
    type Item = TestItem;

    fn identifier(&self) -> &str {
        &self.id
    }

    fn inventory_size(&self) -> usize {
        self.inventory.len()
    }

    fn inventory_item(&self, slot: usize) -> Option<&TestItem> {
        self.inventory.get(slot)?.as_ref()
    }

    fn set_inventory_item(&mut self, slot: usize, item: Option<TestItem>) -> Result<(), HostError> {
        let size = self.inventory.len();
        let target = self
            .inventory
            .get_mut(slot)
            .ok_or(HostError::SlotOutOfRange { slot, size })?;
        *target = item;
        Ok(())
    }

    fn equipment(&self, slot: EquipmentSlot) -> Option<&TestItem> {
        self.equipment[slot.index()].as_ref()
    }

    fn set_equipment(
        &mut self,
        slot: EquipmentSlot,
        item: Option<TestItem>,
    ) -> Result<(), HostError> {
        self.equipment[slot.index()] = item;
        Ok(())
    }
}

impl PropertyStore for TestActor {
    fn property(&self, key: &str) -> Result<Option<String>, HostError> {
        self.properties.property(key)
    }

    fn set_property(&mut self, key: &str, value: String) -> Result<(), HostError> {
        self.properties.set_property(key, value)
    }
}

/// Property store whose writes always fail, for error propagation tests.
#[derive(Debug, Clone, Default)]
pub struct RejectingStore {
    /// Values returned by reads.
    pub contents: MemoryPropertyStore,
}

impl PropertyStore for RejectingStore {
    fn property(&self, key: &str) -> Result<Option<String>, HostError> {
        self.contents.property(key)
    }

    fn set_property(&mut self, key: &str, _value: String) -> Result<(), HostError> {
        Err(HostError::WriteRejected {
            key: key.to_string(),
            reason: "property storage is full".to_string(),
        })
    }
}
