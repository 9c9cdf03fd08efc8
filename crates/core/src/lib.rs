#![warn(missing_docs)]
//! Host-facing primitives shared across the workspace.
//!
//! A scripting host exposes actors (players, armor stands, controller entities),
//! the items they carry, and a per-entity string property store. This crate names
//! the narrow slice of that surface the loadout engine needs, as traits the host
//! binding implements.

pub mod enchantment;
pub mod equipment;
pub mod error;
pub mod host;
pub mod item;
pub mod store;

// Re-export commonly used types
pub use enchantment::Enchantment;
pub use equipment::EquipmentSlot;
pub use error::{CapabilityError, HostError};
pub use host::{Actor, ItemFactory, PropertyStore};
pub use item::{Durability, Enchantable, ItemInstance, LockMode};
pub use store::{MemoryPropertyStore, StoreFileError};
