//! Error and warning types of snapshot and restore.

use loadout_core::{CapabilityError, HostError};
use thiserror::Error;

use crate::descriptor::{SequenceKind, SlotRef};

/// Failures that abort a snapshot or restore.
#[derive(Debug, Error)]
pub enum LoadoutError {
    /// A sequence could not be serialized.
    #[error("failed to encode {kind} sequence: {source}")]
    Encode {
        /// Sequence being written.
        kind: SequenceKind,
        /// Underlying serializer error.
        source: serde_json::Error,
    },
    /// The host rejected a property read/write or a slot assignment.
    #[error(transparent)]
    Host(#[from] HostError),
}

/// Per-slot problems absorbed during restore.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlotProblem {
    /// The stored type id no longer resolves; the slot was left empty.
    #[error("item type `{0}` no longer exists")]
    UnknownItemType(String),
    /// The host failed to construct the item for another reason; slot left empty.
    #[error("could not create `{type_id}`: {reason}")]
    CreateFailed {
        /// Stored type id.
        type_id: String,
        /// Host error text.
        reason: String,
    },
    /// The stored element is not a valid descriptor; slot left empty.
    #[error("malformed descriptor: {0}")]
    MalformedDescriptor(String),
    /// The stored entry has no slot on this actor and was dropped.
    #[error("no slot for stored `{0}`")]
    NoSuchSlot(String),
    /// A scalar attribute was rejected; the item keeps its default.
    #[error("property rejected: {0}")]
    PropertyRejected(CapabilityError),
    /// Stored enchantments, but the new item cannot be enchanted.
    #[error("`{0}` cannot hold enchantments")]
    NotEnchantable(String),
    /// One enchantment was rejected; the others were applied.
    #[error("enchantment rejected: {0}")]
    EnchantmentRejected(CapabilityError),
    /// Stored damage, but the new item has no durability.
    #[error("`{0}` has no durability")]
    NoDurability(String),
    /// The stored damage was rejected; the item keeps its default damage.
    #[error("damage rejected: {0}")]
    DamageRejected(CapabilityError),
}

impl SlotProblem {
    /// Whether the problem cost the whole slot rather than one attribute.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            SlotProblem::UnknownItemType(_)
                | SlotProblem::CreateFailed { .. }
                | SlotProblem::MalformedDescriptor(_)
                | SlotProblem::NoSuchSlot(_)
        )
    }
}

/// A problem tied to the slot it happened in.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{slot}: {problem}")]
pub struct SlotWarning {
    /// Affected slot.
    pub slot: SlotRef,
    /// What went wrong.
    pub problem: SlotProblem,
}
