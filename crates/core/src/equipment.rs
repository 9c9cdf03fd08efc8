//! Worn-equipment slot vocabulary.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Equipment slots an actor can wear items in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EquipmentSlot {
    /// Helmets, skulls, carved pumpkins.
    Head,
    /// Chestplates and elytra.
    Chest,
    /// Leggings.
    Legs,
    /// Boots.
    Feet,
    /// Off-hand item (shield, totem, torch).
    Offhand,
}

impl EquipmentSlot {
    /// All slots in persisted order. Armor sequences are indexed by this order.
    pub const ALL: [EquipmentSlot; 5] = [
        EquipmentSlot::Head,
        EquipmentSlot::Chest,
        EquipmentSlot::Legs,
        EquipmentSlot::Feet,
        EquipmentSlot::Offhand,
    ];

    /// Position of this slot within [`EquipmentSlot::ALL`].
    pub fn index(self) -> usize {
        match self {
            EquipmentSlot::Head => 0,
            EquipmentSlot::Chest => 1,
            EquipmentSlot::Legs => 2,
            EquipmentSlot::Feet => 3,
            EquipmentSlot::Offhand => 4,
        }
    }

    /// Slot at a persisted position, if the position is in range.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Lowercase name used in logs and CLI output.
    pub fn name(self) -> &'static str {
        match self {
            EquipmentSlot::Head => "head",
            EquipmentSlot::Chest => "chest",
            EquipmentSlot::Legs => "legs",
            EquipmentSlot::Feet => "feet",
            EquipmentSlot::Offhand => "offhand",
        }
    }
}

impl fmt::Display for EquipmentSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
