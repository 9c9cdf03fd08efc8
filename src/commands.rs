use std::collections::BTreeMap;

use anyhow::{bail, Result};
use loadout_core::MemoryPropertyStore;
use loadout_snapshot::{
    decode_sequence, DecodedSlot, SequenceKind, SlotRef, SnapshotKeys, ARMOR_SLOTS,
};
use serde_json::Value;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub lines: Vec<String>,
}

/// Which halves of a named snapshot exist in a store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SnapshotPresence {
    pub armor: bool,
    pub inventory: bool,
}

impl SnapshotPresence {
    pub fn is_torn(&self) -> bool {
        self.armor != self.inventory
    }

    /// Only called on entries `snapshot_names` created, which hold at least one half.
    fn describe(&self) -> &'static str {
        if !self.is_torn() {
            "armor+inventory"
        } else if self.armor {
            "armor only (torn)"
        } else {
            "inventory only (torn)"
        }
    }
}

/// Snapshot names found in `store`, sorted.
pub fn snapshot_names(
    store: &MemoryPropertyStore,
    keys: &SnapshotKeys,
) -> BTreeMap<String, SnapshotPresence> {
    let mut names: BTreeMap<String, SnapshotPresence> = BTreeMap::new();
    for key in store.keys() {
        let Some((kind, name)) = keys.parse(key) else {
            continue;
        };
        let entry = names.entry(name.to_string()).or_default();
        match kind {
            SequenceKind::Armor => entry.armor = true,
            SequenceKind::Inventory => entry.inventory = true,
        }
    }
    names
}

/// One stored half, decoded without an item registry.
enum Half {
    Missing,
    Unreadable(String),
    Slots(Vec<DecodedSlot>),
}

impl Half {
    fn read(store: &MemoryPropertyStore, key: &str) -> Self {
        match store.get(key) {
            None => Half::Missing,
            Some(payload) => match decode_sequence(payload) {
                Ok(slots) => Half::Slots(slots),
                Err(err) => Half::Unreadable(err.to_string()),
            },
        }
    }
}

pub fn list(store: &MemoryPropertyStore, keys: &SnapshotKeys) -> CommandOutput {
    let names = snapshot_names(store, keys);
    let mut out = CommandOutput::default();
    if names.is_empty() {
        out.lines.push("no snapshots found".to_string());
        return out;
    }
    let width = names.keys().map(String::len).max().unwrap_or(0);
    for (name, presence) in &names {
        out.lines
            .push(format!("{name:<width$}  {}", presence.describe()));
    }
    out
}

pub fn inspect(
    store: &MemoryPropertyStore,
    keys: &SnapshotKeys,
    name: &str,
    json: bool,
) -> Result<CommandOutput> {
    let armor_key = keys.armor_key(name);
    let inventory_key = keys.inventory_key(name);
    if store.get(&armor_key).is_none() && store.get(&inventory_key).is_none() {
        bail!("no snapshot named `{name}`");
    }

    let mut out = CommandOutput::default();
    if json {
        let mut halves = serde_json::Map::new();
        halves.insert("armor".into(), payload_value(store.get(&armor_key)));
        halves.insert("inventory".into(), payload_value(store.get(&inventory_key)));
        out.lines
            .push(serde_json::to_string_pretty(&Value::Object(halves))?);
        return Ok(out);
    }

    out.lines.push(format!("snapshot {name}"));
    for (kind, key) in [
        (SequenceKind::Armor, &armor_key),
        (SequenceKind::Inventory, &inventory_key),
    ] {
        match Half::read(store, key) {
            Half::Missing => out.lines.push(format!("{kind}: missing")),
            Half::Unreadable(err) => out.lines.push(format!("{kind}: unreadable ({err})")),
            Half::Slots(slots) => {
                let occupied = slots.iter().filter(|s| **s != DecodedSlot::Empty).count();
                out.lines.push(format!(
                    "{kind}: {} slots, {occupied} occupied",
                    slots.len()
                ));
                for (index, slot) in slots.iter().enumerate() {
                    let at = SlotRef::for_index(kind, index, slots.len());
                    match slot {
                        DecodedSlot::Empty => {}
                        DecodedSlot::Item(item) => {
                            out.lines.push(format!("  {at}: {}", item.summary()))
                        }
                        DecodedSlot::Malformed(reason) => {
                            out.lines.push(format!("  {at}: malformed ({reason})"))
                        }
                    }
                }
            }
        }
    }
    Ok(out)
}

fn payload_value(payload: Option<&str>) -> Value {
    match payload {
        None => Value::Null,
        Some(text) => {
            serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub snapshots: usize,
    pub issues: Vec<String>,
}

impl ValidationReport {
    pub fn is_ok(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Decode every snapshot in `store` and collect everything a restore would have to
/// tolerate.
pub fn validate(store: &MemoryPropertyStore, keys: &SnapshotKeys) -> ValidationReport {
    let names = snapshot_names(store, keys);
    let mut report = ValidationReport {
        snapshots: names.len(),
        issues: Vec::new(),
    };

    for (name, presence) in &names {
        if presence.is_torn() {
            report
                .issues
                .push(format!("{name}: torn snapshot, {}", presence.describe()));
        }
        for kind in [SequenceKind::Armor, SequenceKind::Inventory] {
            let slots = match Half::read(store, &keys.key(kind, name)) {
                Half::Missing => continue,
                Half::Unreadable(err) => {
                    report.issues.push(format!("{name}: {kind} {err}"));
                    continue;
                }
                Half::Slots(slots) => slots,
            };
            if kind == SequenceKind::Armor && slots.len() != ARMOR_SLOTS {
                report.issues.push(format!(
                    "{name}: armor sequence has {} entries, expected {ARMOR_SLOTS}",
                    slots.len()
                ));
            }
            for (index, slot) in slots.iter().enumerate() {
                if let DecodedSlot::Malformed(reason) = slot {
                    let at = SlotRef::for_index(kind, index, slots.len());
                    report
                        .issues
                        .push(format!("{name}: {at}: malformed descriptor: {reason}"));
                }
            }
        }
    }
    report
}
