//! Snapshot/restore round trips against the fake host.
//!
//! Covers:
//! - Round-trip identity for equipment and inventory
//! - Restore idempotence and overwrite semantics
//! - Missing, torn and malformed snapshots
//! - Named snapshots kept on another entity's store
//! - Per-slot isolation of unresolvable items and rejected capabilities

use anyhow::Result;
use loadout_core::{
    Actor, EquipmentSlot, HostError, ItemInstance, LockMode, MemoryPropertyStore, PropertyStore,
};
use loadout_snapshot::{
    capture, LoadoutError, Restorer, SequenceKind, SequenceSource, SlotProblem, SlotRef,
    Snapshotter,
};
use loadout_testkit::{ItemTypeDef, RejectingStore, TestActor, TestItemRegistry};

fn geared_player(registry: &TestItemRegistry, id: &str) -> Result<TestActor> {
    let mut player = TestActor::player(id);

    player.equip(
        EquipmentSlot::Head,
        registry
            .stack("minecraft:diamond_helmet", 1)?
            .enchanted("minecraft:protection", 4)?
            .enchanted("minecraft:respiration", 3)?
            .damaged(17)?,
    );
    player.equip(
        EquipmentSlot::Chest,
        registry
            .stack("minecraft:diamond_chestplate", 1)?
            .named("Dragonhide")
            .locked(LockMode::Slot)
            .kept_on_death(),
    );
    player.equip(
        EquipmentSlot::Feet,
        registry
            .stack("minecraft:leather_boots", 1)?
            .enchanted("minecraft:feather_falling", 2)?
            .damaged(64)?,
    );
    player.equip(
        EquipmentSlot::Offhand,
        registry.stack("minecraft:totem_of_undying", 1)?,
    );

    player.give(
        0,
        registry
            .stack("minecraft:diamond_sword", 1)?
            .named("Excalibur")
            .with_lore(["Pulled from a stone", "§6Legendary"])
            .enchanted("minecraft:sharpness", 5)?
            .enchanted("minecraft:unbreaking", 3)?
            .enchanted("minecraft:mending", 1)?
            .damaged(120)?,
    )?;
    player.give(1, registry.stack("minecraft:bow", 1)?)?;
    player.give(
        2,
        registry
            .stack("minecraft:arrow", 64)?
            .locked(LockMode::Inventory),
    )?;
    player.give(8, registry.stack("minecraft:bread", 23)?)?;
    player.give(
        20,
        registry
            .stack("minecraft:enchanted_book", 1)?
            .enchanted("minecraft:silk_touch", 1)?,
    )?;
    player.give(35, registry.stack("minecraft:ender_pearl", 16)?)?;

    Ok(player)
}

#[test]
fn restore_reproduces_snapshot() -> Result<()> {
    let registry = TestItemRegistry::vanilla();
    let mut player = geared_player(&registry, "steve")?;
    let before = player.clone();

    let snapshotter = Snapshotter::new();
    let loadout = snapshotter.snapshot(&mut player, None)?;
    assert_eq!(loadout.armor.len(), 5);
    assert_eq!(loadout.inventory.len(), TestActor::PLAYER_INVENTORY_SIZE);
    assert_eq!(loadout.occupied(), 10);

    player.strip();
    player.give(5, registry.stack("minecraft:dirt", 64)?)?;
    player.equip(EquipmentSlot::Legs, registry.stack("minecraft:iron_leggings", 1)?);

    let restorer = Restorer::new(&registry);
    let report = restorer.restore(&mut player, None)?;

    assert!(report.is_clean(), "unexpected warnings: {:?}", report.warnings);
    assert_eq!(report.armor, SequenceSource::Loaded);
    assert_eq!(report.inventory, SequenceSource::Loaded);
    assert_eq!(report.restored, 10);
    assert_eq!(report.cleared, 5 + TestActor::PLAYER_INVENTORY_SIZE - 10);
    assert!(player.same_loadout(&before));
    Ok(())
}

#[test]
fn restored_items_keep_every_attribute() -> Result<()> {
    let registry = TestItemRegistry::vanilla();
    let mut player = geared_player(&registry, "steve")?;
    Snapshotter::new().snapshot(&mut player, None)?;
    player.strip();
    Restorer::new(&registry).restore(&mut player, None)?;

    let sword = player.inventory_item(0).expect("sword restored");
    assert_eq!(sword.type_id(), "minecraft:diamond_sword");
    assert_eq!(sword.name_tag(), Some("Excalibur"));
    assert_eq!(sword.lore(), vec!["Pulled from a stone", "§6Legendary"]);
    let kinds: Vec<String> = sword
        .enchantable()
        .expect("sword is enchantable")
        .enchantments()
        .into_iter()
        .map(|e| format!("{}", e))
        .collect();
    assert_eq!(kinds, vec!["sharpness 5", "unbreaking 3", "mending 1"]);
    assert_eq!(sword.durability().map(|d| d.damage()), Some(120));

    let chest = player.equipment(EquipmentSlot::Chest).expect("chestplate restored");
    assert_eq!(chest.lock_mode(), LockMode::Slot);
    assert!(chest.keep_on_death());
    assert_eq!(chest.durability().map(|d| d.damage()), Some(0));

    let arrows = player.inventory_item(2).expect("arrows restored");
    assert_eq!(arrows.amount(), 64);
    assert_eq!(arrows.lock_mode(), LockMode::Inventory);
    Ok(())
}

#[test]
fn restore_is_idempotent() -> Result<()> {
    let registry = TestItemRegistry::vanilla();
    let mut player = geared_player(&registry, "alex")?;
    Snapshotter::new().snapshot(&mut player, None)?;
    let stored = player.properties().clone();

    let restorer = Restorer::new(&registry);
    let first = restorer.restore(&mut player, None)?;
    let after_first = player.clone();
    let second = restorer.restore(&mut player, None)?;

    assert_eq!(first, second);
    assert!(player.same_loadout(&after_first));
    assert_eq!(player.properties(), &stored, "restore must not write properties");
    Ok(())
}

#[test]
fn empty_slots_stay_empty() -> Result<()> {
    let registry = TestItemRegistry::vanilla();
    let mut player = TestActor::with_capacity("sparse", 4);
    player.give(1, registry.stack("minecraft:cobblestone", 1)?)?;

    let loadout = Snapshotter::new().snapshot(&mut player, None)?;
    assert_eq!(
        player.properties().get("inventory:sparse").unwrap(),
        r#"[null,{"typeId":"minecraft:cobblestone","props":{"amount":1,"keepOnDeath":false,"lockMode":"none"},"lore":[],"components":{}},null,null]"#
    );
    assert!(loadout.armor.iter().all(Option::is_none));

    // Fill the empty slots so restore has to clear them.
    for slot in [0, 2, 3] {
        player.give(slot, registry.stack("minecraft:dirt", 1)?)?;
    }
    Restorer::new(&registry).restore(&mut player, None)?;

    assert!(player.inventory_item(0).is_none());
    assert_eq!(player.inventory_item(1).map(|i| i.amount()), Some(1));
    assert!(player.inventory_item(2).is_none());
    assert!(player.inventory_item(3).is_none());
    Ok(())
}

#[test]
fn missing_snapshot_clears_everything() -> Result<()> {
    let registry = TestItemRegistry::vanilla();
    let mut player = geared_player(&registry, "newcomer")?;

    let report = Restorer::new(&registry).restore(&mut player, Some("never_saved"))?;

    assert_eq!(report.armor, SequenceSource::Missing);
    assert_eq!(report.inventory, SequenceSource::Missing);
    assert_eq!(report.restored, 0);
    assert_eq!(report.cleared, 5 + TestActor::PLAYER_INVENTORY_SIZE);
    assert!(report.is_clean());
    assert!(player.inventory().iter().all(Option::is_none));
    assert!(player.worn().iter().all(Option::is_none));
    Ok(())
}

#[test]
fn items_without_capabilities_omit_components() -> Result<()> {
    let registry = TestItemRegistry::vanilla();
    let mut player = TestActor::with_capacity("farmer", 2);
    player.give(0, registry.stack("minecraft:bread", 12)?)?;
    player.give(1, registry.stack("minecraft:enchanted_book", 1)?)?;

    let loadout = Snapshotter::new().snapshot(&mut player, None)?;
    let bread = loadout.inventory[0].as_ref().unwrap();
    assert_eq!(bread.components.durability, None);
    assert_eq!(bread.components.enchantable, None);
    let book = loadout.inventory[1].as_ref().unwrap();
    assert_eq!(book.components.enchantable, Some(Vec::new()));
    assert_eq!(book.components.durability, None);

    let payload = player.properties().get("inventory:farmer").unwrap();
    assert!(!payload.contains("durability"));

    player.strip();
    let report = Restorer::new(&registry).restore(&mut player, None)?;
    assert!(report.is_clean());
    assert!(player.inventory_item(0).unwrap().durability().is_none());
    Ok(())
}

#[test]
fn duel_backup_on_arena_controller() -> Result<()> {
    let registry = TestItemRegistry::vanilla();
    let mut player = geared_player(&registry, "-4294967295")?;
    let pre_duel = player.clone();
    let mut arena_controller = MemoryPropertyStore::new();

    let snapshotter = Snapshotter::new();
    snapshotter.snapshot_to(&player, Some("duel_backup"), &mut arena_controller)?;
    assert!(player.properties().is_empty());
    assert_eq!(
        arena_controller.keys().collect::<Vec<_>>(),
        vec!["armor:duel_backup", "inventory:duel_backup"]
    );

    // Duel kit replaces everything.
    player.strip();
    player.give(0, registry.stack("minecraft:iron_pickaxe", 1)?.damaged(200)?)?;
    player.equip(EquipmentSlot::Offhand, registry.stack("minecraft:shield", 1)?);

    let report = Restorer::new(&registry).restore_from(
        &mut player,
        Some("duel_backup"),
        &arena_controller,
    )?;
    assert!(report.is_clean());
    assert!(player.same_loadout(&pre_duel));
    Ok(())
}

#[test]
fn persisted_capture_restores_like_snapshot() -> Result<()> {
    let registry = TestItemRegistry::vanilla();
    let mut player = geared_player(&registry, "steve")?;
    let before = player.clone();
    let mut lobby = MemoryPropertyStore::new();
    lobby.insert("armor:lobby_kit", "stale");
    lobby.insert("inventory:lobby_kit", "stale");

    let loadout = capture(&player);
    let snapshotter = Snapshotter::new();
    snapshotter.persist(&loadout, "lobby_kit", &mut lobby)?;

    // Same bytes as a direct snapshot under the same name.
    let mut direct = MemoryPropertyStore::new();
    snapshotter.snapshot_to(&player, Some("lobby_kit"), &mut direct)?;
    assert_eq!(lobby, direct);

    player.strip();
    let report = Restorer::new(&registry).restore_from(&mut player, Some("lobby_kit"), &lobby)?;
    assert!(report.is_clean());
    assert!(player.same_loadout(&before));
    Ok(())
}

#[test]
fn rejected_persist_stops_at_armor() -> Result<()> {
    let registry = TestItemRegistry::vanilla();
    let player = geared_player(&registry, "steve")?;
    let mut store = RejectingStore::default();

    let err = Snapshotter::new()
        .persist(&capture(&player), "kit", &mut store)
        .unwrap_err();
    assert!(matches!(
        err,
        LoadoutError::Host(HostError::WriteRejected { ref key, .. }) if key == "armor:kit"
    ));
    Ok(())
}

#[test]
fn named_snapshots_are_independent() -> Result<()> {
    let registry = TestItemRegistry::vanilla();
    let mut player = TestActor::with_capacity("builder", 1);

    player.give(0, registry.stack("minecraft:dirt", 10)?)?;
    Snapshotter::new().snapshot(&mut player, Some("survival"))?;
    player.give(0, registry.stack("minecraft:cobblestone", 64)?)?;
    Snapshotter::new().snapshot(&mut player, Some("creative"))?;

    let restorer = Restorer::new(&registry);
    restorer.restore(&mut player, Some("survival"))?;
    assert_eq!(player.inventory_item(0).unwrap().type_id(), "minecraft:dirt");
    restorer.restore(&mut player, Some("creative"))?;
    assert_eq!(player.inventory_item(0).unwrap().type_id(), "minecraft:cobblestone");
    Ok(())
}

#[test]
fn snapshot_overwrites_previous_value() -> Result<()> {
    let registry = TestItemRegistry::vanilla();
    let mut player = TestActor::with_capacity("alex", 2);
    player.give(0, registry.stack("minecraft:bread", 3)?)?;
    player.give(1, registry.stack("minecraft:bread", 4)?)?;
    Snapshotter::new().snapshot(&mut player, None)?;

    player.strip();
    player.give(1, registry.stack("minecraft:arrow", 9)?)?;
    Snapshotter::new().snapshot(&mut player, None)?;

    player.strip();
    Restorer::new(&registry).restore(&mut player, None)?;
    assert!(player.inventory_item(0).is_none());
    assert_eq!(player.inventory_item(1).unwrap().type_id(), "minecraft:arrow");
    Ok(())
}

#[test]
fn removed_item_type_only_loses_its_slot() -> Result<()> {
    let mut registry = TestItemRegistry::vanilla();
    let mut player = geared_player(&registry, "steve")?;
    let before = player.clone();
    Snapshotter::new().snapshot(&mut player, None)?;

    registry.unregister("minecraft:bread");
    player.strip();
    let report = Restorer::new(&registry).restore(&mut player, None)?;

    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.warnings[0].slot, SlotRef::Inventory(8));
    assert_eq!(
        report.warnings[0].problem,
        SlotProblem::UnknownItemType("minecraft:bread".into())
    );
    assert_eq!(report.failed_slots().collect::<Vec<_>>(), vec![SlotRef::Inventory(8)]);
    assert!(player.inventory_item(8).is_none());

    for slot in (0..TestActor::PLAYER_INVENTORY_SIZE).filter(|slot| *slot != 8) {
        assert_eq!(player.inventory_item(slot), before.inventory_item(slot), "slot {slot}");
    }
    assert_eq!(player.worn(), before.worn());
    Ok(())
}

#[test]
fn corrupted_descriptor_only_loses_its_slot() -> Result<()> {
    let registry = TestItemRegistry::vanilla();
    let mut player = TestActor::with_capacity("alex", 3);
    player.properties_mut().insert(
        "inventory:alex",
        r#"[
            {"typeId":"minecraft:arrow","props":{"amount":12,"keepOnDeath":false,"lockMode":"none"},"lore":[],"components":{}},
            {"typeId":"minecraft:arrow","props":{"amount":-3}},
            {"typeId":"minecraft:not_a_real_item","props":{"amount":1,"keepOnDeath":false,"lockMode":"none"},"lore":[],"components":{}}
        ]"#,
    );

    let report = Restorer::new(&registry).restore(&mut player, None)?;

    assert_eq!(player.inventory_item(0).map(|i| i.amount()), Some(12));
    assert!(player.inventory_item(1).is_none());
    assert!(player.inventory_item(2).is_none());
    assert_eq!(report.restored, 1);
    assert!(matches!(
        report.warnings[0].problem,
        SlotProblem::MalformedDescriptor(_)
    ));
    assert_eq!(
        report.warnings[1].problem,
        SlotProblem::UnknownItemType("minecraft:not_a_real_item".into())
    );
    assert_eq!(report.armor, SequenceSource::Missing);
    Ok(())
}

#[test]
fn torn_snapshot_restores_surviving_half() -> Result<()> {
    let registry = TestItemRegistry::vanilla();
    let mut player = geared_player(&registry, "steve")?;
    let before = player.clone();
    Snapshotter::new().snapshot(&mut player, None)?;

    // Crash between the two writes: only armor made it.
    player.properties_mut().remove("inventory:steve");
    let report = Restorer::new(&registry).restore(&mut player, None)?;

    assert_eq!(report.armor, SequenceSource::Loaded);
    assert_eq!(report.inventory, SequenceSource::Missing);
    assert_eq!(player.worn(), before.worn());
    assert!(player.inventory().iter().all(Option::is_none));
    Ok(())
}

#[test]
fn garbage_payload_is_treated_as_missing() -> Result<()> {
    let registry = TestItemRegistry::vanilla();
    let mut player = geared_player(&registry, "steve")?;
    let before = player.clone();
    Snapshotter::new().snapshot(&mut player, None)?;
    player
        .properties_mut()
        .insert("armor:steve", "{\"this is\": \"not an array\"}");

    let report = Restorer::new(&registry).restore(&mut player, None)?;

    assert_eq!(report.armor, SequenceSource::Malformed);
    assert_eq!(report.inventory, SequenceSource::Loaded);
    assert!(player.worn().iter().all(Option::is_none));
    assert_eq!(player.inventory(), before.inventory());
    Ok(())
}

#[test]
fn missing_capability_skips_component_but_keeps_item() -> Result<()> {
    let mut registry = TestItemRegistry::vanilla();
    let mut player = TestActor::with_capacity("alex", 1);
    player.give(
        0,
        registry
            .stack("minecraft:bow", 1)?
            .enchanted("minecraft:power", 3)?
            .damaged(30)?,
    )?;
    Snapshotter::new().snapshot(&mut player, None)?;

    // A content update turned bows into plain items.
    registry.register("minecraft:bow", ItemTypeDef::material(1));
    let report = Restorer::new(&registry).restore(&mut player, None)?;

    let bow = player.inventory_item(0).expect("bow kept");
    assert!(bow.enchantable().is_none());
    assert!(bow.durability().is_none());
    let problems: Vec<&SlotProblem> = report.warnings.iter().map(|w| &w.problem).collect();
    assert_eq!(
        problems,
        vec![
            &SlotProblem::NotEnchantable("minecraft:bow".into()),
            &SlotProblem::NoDurability("minecraft:bow".into()),
        ]
    );
    assert_eq!(report.failed_slots().count(), 0);
    Ok(())
}

#[test]
fn rejected_values_are_skipped_individually() -> Result<()> {
    let registry = TestItemRegistry::vanilla();
    let mut player = TestActor::with_capacity("alex", 1);
    player.properties_mut().insert(
        "inventory:alex",
        r#"[{"typeId":"minecraft:diamond_sword","props":{"amount":5,"keepOnDeath":true,"lockMode":"none"},"lore":["kept"],
            "components":{"enchantable":[{"type":"minecraft:sharpness","level":9},{"type":"minecraft:knockback","level":2},{"type":"custom:vampirism","level":1}],"durability":99999}}]"#,
    );

    let report = Restorer::new(&registry).restore(&mut player, None)?;

    let sword = player.inventory_item(0).expect("sword kept");
    assert_eq!(sword.amount(), 1);
    assert!(sword.keep_on_death());
    assert_eq!(sword.lore(), vec!["kept"]);
    assert_eq!(sword.enchantable().unwrap().enchantments().len(), 1);
    assert_eq!(sword.durability().unwrap().damage(), 0);
    assert_eq!(report.warnings.len(), 4);
    assert!(report.warnings.iter().all(|w| w.slot == SlotRef::Inventory(0)));
    assert!(matches!(report.warnings[0].problem, SlotProblem::PropertyRejected(_)));
    assert!(matches!(report.warnings[3].problem, SlotProblem::DamageRejected(_)));
    Ok(())
}

#[test]
fn smaller_actor_reports_overflow() -> Result<()> {
    let registry = TestItemRegistry::vanilla();
    let mut player = geared_player(&registry, "steve")?;
    let mut store = MemoryPropertyStore::new();
    Snapshotter::new().snapshot_to(&player, Some("kit"), &mut store)?;

    let mut minecart = TestActor::with_capacity("minecart", 27);
    let report = Restorer::new(&registry).restore_from(&mut minecart, Some("kit"), &store)?;

    assert_eq!(
        report.failed_slots().collect::<Vec<_>>(),
        vec![SlotRef::Overflow {
            kind: SequenceKind::Inventory,
            index: 35
        }]
    );
    assert_eq!(minecart.inventory()[..27], player.inventory()[..27]);

    // A larger actor gets its extra slots cleared.
    player.strip();
    let mut chest = TestActor::with_capacity("chest", 54);
    chest.give(50, registry.stack("minecraft:dirt", 1)?)?;
    Restorer::new(&registry).restore_from(&mut chest, Some("kit"), &store)?;
    assert!(chest.inventory_item(50).is_none());
    assert_eq!(chest.inventory_item(35).unwrap().type_id(), "minecraft:ender_pearl");
    Ok(())
}

#[test]
fn rejected_write_propagates() -> Result<()> {
    let registry = TestItemRegistry::vanilla();
    let player = geared_player(&registry, "steve")?;
    let mut store = RejectingStore::default();

    let err = Snapshotter::new()
        .snapshot_to(&player, None, &mut store)
        .unwrap_err();
    match err {
        LoadoutError::Host(HostError::WriteRejected { key, .. }) => assert_eq!(key, "armor:steve"),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(store.property("inventory:steve")?, None);
    Ok(())
}
