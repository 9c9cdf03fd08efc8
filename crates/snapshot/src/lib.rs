#![warn(missing_docs)]
//! Point-in-time capture and restore of an actor's carried items.
//!
//! A snapshot is two persisted strings on a [`PropertyStore`](loadout_core::PropertyStore):
//! `armor:<name>` holds the five worn-equipment slots and `inventory:<name>` holds
//! every general inventory slot, each as a JSON array of item descriptors or `null`.
//!
//! [`Snapshotter`] writes them and [`Restorer`] reads them back into fresh items.
//! Restoration is positional and isolated per slot: an item type that no longer
//! resolves leaves its slot empty and is reported, the rest of the loadout is
//! still restored.

mod codec;
mod descriptor;
mod error;
mod keys;
mod restorer;
mod snapshotter;

pub use codec::*;
pub use descriptor::*;
pub use error::*;
pub use keys::*;
pub use restorer::*;
pub use snapshotter::*;
