//! Errors reported by host bindings.

use thiserror::Error;

/// Failures of the host API itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    /// The item registry has no type with this identifier (removed content, typo).
    #[error("unknown item type `{0}`")]
    UnknownItemType(String),
    /// A container index past the container's capacity.
    #[error("slot {slot} out of range for container of size {size}")]
    SlotOutOfRange {
        /// Requested slot.
        slot: usize,
        /// Container capacity.
        size: usize,
    },
    /// The property store refused a write.
    #[error("write to property `{key}` rejected: {reason}")]
    WriteRejected {
        /// Property key.
        key: String,
        /// Host-supplied reason.
        reason: String,
    },
    /// The entity or world backing the call is gone.
    #[error("host unavailable: {0}")]
    Unavailable(String),
}

/// A value the host refused to assign to an item or one of its capabilities.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CapabilityError {
    /// The enchantment type identifier does not resolve.
    #[error("unknown enchantment `{0}`")]
    UnknownEnchantment(String),
    /// Level outside `1..=max` for this enchantment type.
    #[error("level {level} out of range for `{kind}` (max {max})")]
    LevelOutOfRange {
        /// Enchantment type identifier.
        kind: String,
        /// Requested level.
        level: u32,
        /// Highest accepted level.
        max: u32,
    },
    /// The enchantment conflicts with one already on the item.
    #[error("`{kind}` conflicts with `{existing}`")]
    Incompatible {
        /// Enchantment being added.
        kind: String,
        /// Enchantment already present.
        existing: String,
    },
    /// Accumulated damage beyond the item's maximum durability.
    #[error("damage {damage} exceeds max durability {max}")]
    DamageOutOfRange {
        /// Requested damage.
        damage: u32,
        /// Maximum durability.
        max: u32,
    },
    /// Stack amount outside `1..=max_stack`.
    #[error("amount {amount} out of range (max stack {max})")]
    AmountOutOfRange {
        /// Requested amount.
        amount: u32,
        /// Maximum stack size.
        max: u32,
    },
}
