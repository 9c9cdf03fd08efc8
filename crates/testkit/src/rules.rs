//! Vanilla-like enchantment rules enforced by the fake host.

use loadout_core::{CapabilityError, Enchantment};

/// `(identifier, max level)` of every enchantment the fake host resolves.
const ENCHANTMENTS: &[(&str, u32)] = &[
    ("minecraft:efficiency", 5),
    ("minecraft:silk_touch", 1),
    ("minecraft:fortune", 3),
    ("minecraft:sharpness", 5),
    ("minecraft:knockback", 2),
    ("minecraft:fire_aspect", 2),
    ("minecraft:power", 5),
    ("minecraft:punch", 2),
    ("minecraft:flame", 1),
    ("minecraft:infinity", 1),
    ("minecraft:protection", 4),
    ("minecraft:fire_protection", 4),
    ("minecraft:blast_protection", 4),
    ("minecraft:projectile_protection", 4),
    ("minecraft:feather_falling", 4),
    ("minecraft:respiration", 3),
    ("minecraft:unbreaking", 3),
    ("minecraft:mending", 1),
];

/// Groups whose members exclude each other.
const EXCLUSIVE_GROUPS: &[&[&str]] = &[
    &["minecraft:silk_touch", "minecraft:fortune"],
    &[
        "minecraft:protection",
        "minecraft:fire_protection",
        "minecraft:blast_protection",
        "minecraft:projectile_protection",
    ],
    &["minecraft:infinity", "minecraft:mending"],
];

/// Highest level of a known enchantment kind.
pub fn max_level(kind: &str) -> Option<u32> {
    ENCHANTMENTS
        .iter()
        .find(|(id, _)| *id == kind)
        .map(|(_, max)| *max)
}

/// Whether two distinct kinds may sit on the same item.
pub fn compatible(a: &str, b: &str) -> bool {
    a == b
        || !EXCLUSIVE_GROUPS
            .iter()
            .any(|group| group.contains(&a) && group.contains(&b))
}

/// Add `enchantment` to `existing` the way the host does: validate the kind and
/// level, refuse conflicts, and raise the level of a kind already present.
pub fn apply(
    existing: &mut Vec<Enchantment>,
    enchantment: Enchantment,
) -> Result<(), CapabilityError> {
    let max = max_level(&enchantment.kind)
        .ok_or_else(|| CapabilityError::UnknownEnchantment(enchantment.kind.clone()))?;
    if enchantment.level == 0 || enchantment.level > max {
        return Err(CapabilityError::LevelOutOfRange {
            kind: enchantment.kind,
            level: enchantment.level,
            max,
        });
    }
    if let Some(conflict) = existing
        .iter()
        .find(|e| !compatible(&e.kind, &enchantment.kind))
    {
        return Err(CapabilityError::Incompatible {
            kind: enchantment.kind,
            existing: conflict.kind.clone(),
        });
    }
    match existing.iter_mut().find(|e| e.kind == enchantment.kind) {
        Some(present) => present.level = present.level.max(enchantment.level),
        None => existing.push(enchantment),
    }
    Ok(())
}
