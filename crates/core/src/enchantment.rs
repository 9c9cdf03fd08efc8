//! Enchantment values as the host reports them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An enchantment with a specific level.
///
/// `kind` is the host's enchantment type identifier (for example
/// `minecraft:sharpness`). Whether a kind exists, and which levels it accepts,
/// is decided by the host when the enchantment is applied to an item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Enchantment {
    /// Enchantment type identifier.
    #[serde(rename = "type")]
    pub kind: String,
    /// Enchantment level (1 and up).
    pub level: u32,
}

impl Enchantment {
    /// Create a new enchantment.
    pub fn new(kind: impl Into<String>, level: u32) -> Self {
        Self {
            kind: kind.into(),
            level,
        }
    }

    /// Identifier without the `namespace:` prefix, for display.
    pub fn short_kind(&self) -> &str {
        self.kind
            .split_once(':')
            .map(|(_, name)| name)
            .unwrap_or(&self.kind)
    }
}

impl fmt::Display for Enchantment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.short_kind(), self.level)
    }
}
