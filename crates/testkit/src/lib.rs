#![warn(missing_docs)]
//! Test surfaces for the loadout crates: a fake scripting host and golden-file
//! helpers.
//!
//! The fake host models just enough of a block-game server for snapshots to be
//! meaningful: typed item registry with stack limits, the enchantment and
//! durability capabilities with vanilla-like validation, and player actors that
//! carry their own property store.

mod host;
pub mod rules;
mod snapshot;

pub use host::*;
pub use snapshot::*;
