//! Property key layout of persisted snapshots.

use serde::{Deserialize, Serialize};

use crate::descriptor::SequenceKind;

/// Default prefix of the worn-equipment key.
pub const DEFAULT_ARMOR_PREFIX: &str = "armor:";
/// Default prefix of the inventory key.
pub const DEFAULT_INVENTORY_PREFIX: &str = "inventory:";

/// Builds and parses the two property keys of a named snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotKeys {
    /// Prefix of the armor sequence key.
    pub armor_prefix: String,
    /// Prefix of the inventory sequence key.
    pub inventory_prefix: String,
}

impl Default for SnapshotKeys {
    fn default() -> Self {
        Self {
            armor_prefix: DEFAULT_ARMOR_PREFIX.to_string(),
            inventory_prefix: DEFAULT_INVENTORY_PREFIX.to_string(),
        }
    }
}

impl SnapshotKeys {
    /// Key holding the armor sequence of snapshot `name`.
    pub fn armor_key(&self, name: &str) -> String {
        format!("{}{}", self.armor_prefix, name)
    }

    /// Key holding the inventory sequence of snapshot `name`.
    pub fn inventory_key(&self, name: &str) -> String {
        format!("{}{}", self.inventory_prefix, name)
    }

    /// Key for one half of snapshot `name`.
    pub fn key(&self, kind: SequenceKind, name: &str) -> String {
        match kind {
            SequenceKind::Armor => self.armor_key(name),
            SequenceKind::Inventory => self.inventory_key(name),
        }
    }

    /// Split a property key into its sequence kind and snapshot name.
    ///
    /// Returns `None` for keys that belong to neither prefix. When one prefix is a
    /// prefix of the other, the longer one wins.
    pub fn parse<'k>(&self, key: &'k str) -> Option<(SequenceKind, &'k str)> {
        let mut candidates = [
            (SequenceKind::Armor, self.armor_prefix.as_str()),
            (SequenceKind::Inventory, self.inventory_prefix.as_str()),
        ];
        candidates.sort_by_key(|(_, prefix)| std::cmp::Reverse(prefix.len()));
        candidates
            .iter()
            .find_map(|(kind, prefix)| key.strip_prefix(prefix).map(|name| (*kind, name)))
    }
}
