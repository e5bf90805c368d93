/// INTEGRATION TESTS: equip, unequip and item hooks
///
/// Policy is checked before bounds: category first, then the item's own
/// consent, then whether the slot exists.

use std::sync::Arc;

use baubles_server::{EquipError, ServerConfig};
use baubles_shared::{
    CategoryRegistration, CategoryRegistry, EntityId, Payload, SlotCategory, MAX_SLOT_INDEX,
};
use baubles_test::{Hook, TestItem, TestServer, OWNER};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn equip_attaches_provisioned_store() {
    init_logger();
    let mut test = TestServer::new();

    test.server.equip(OWNER, 4, TestItem::named("head")).unwrap();

    let storage = test.server.storage(OWNER).unwrap();
    assert_eq!(storage.size(), 7);
    assert_eq!(storage.get(4).unwrap().kind_name(), Some("head"));
    assert_eq!(
        test.capabilities().take_hooks(),
        vec![Hook::Equipped("head".to_string(), OWNER)]
    );
}

#[test]
fn equip_returns_displaced_payload() {
    init_logger();
    let mut test = TestServer::new();
    test.server.equip(OWNER, 1, TestItem::named("ring:gold")).unwrap();
    test.capabilities().take_hooks();

    let displaced = test
        .server
        .equip(OWNER, 1, TestItem::named("ring:silver"))
        .unwrap();
    assert_eq!(displaced.unwrap().kind_name(), Some("ring:gold"));
    assert_eq!(
        test.capabilities().take_hooks(),
        vec![
            Hook::Unequipped("ring:gold".to_string(), OWNER),
            Hook::Equipped("ring:silver".to_string(), OWNER),
        ]
    );

    let displaced = test.server.equip(OWNER, 2, TestItem::named("ring")).unwrap();
    assert!(displaced.is_none());
}

#[test]
fn non_slot_items_and_empty_payloads_are_mismatches() {
    init_logger();
    let mut test = TestServer::new();

    assert_eq!(
        test.server.equip(OWNER, 0, TestItem::named("apple")),
        Err(EquipError::SlotCategoryMismatch {
            slot: 0,
            category: None
        })
    );
    assert_eq!(
        test.server.equip(OWNER, 0, baubles_shared::Payload::empty()),
        Err(EquipError::SlotCategoryMismatch {
            slot: 0,
            category: None
        })
    );
}

#[test]
fn item_can_refuse_equip() {
    init_logger();
    let mut test = TestServer::new();
    test.capabilities().refuse_equip("belt");

    assert_eq!(
        test.server.equip(OWNER, 3, TestItem::named("belt")),
        Err(EquipError::EquipRejectedByItem { slot: 3 })
    );
    assert!(test.capabilities().take_hooks().is_empty());
}

#[test]
fn trinket_past_guard_is_out_of_range() {
    init_logger();
    let mut test = TestServer::new();

    assert_eq!(
        test.server.equip(OWNER, 9, TestItem::named("trinket")),
        Err(EquipError::OutOfRange { slot: 9, size: 8 })
    );
    // the guard itself is fine
    assert!(test.server.equip(OWNER, 7, TestItem::named("trinket")).is_ok());
    assert_eq!(test.server.storage(OWNER).unwrap().size(), 8);
}

#[test]
fn unequip_empties_slot() {
    init_logger();
    let mut test = TestServer::new();
    test.server.equip(OWNER, 0, TestItem::named("amulet")).unwrap();
    test.capabilities().take_hooks();

    let removed = test.server.unequip(OWNER, 0).unwrap();
    assert_eq!(removed.kind_name(), Some("amulet"));

    let storage = test.server.storage(OWNER).unwrap();
    assert!(storage.get(0).unwrap().kind_name().is_none());
    assert!(storage.is_dirty(0));
    assert_eq!(storage.size(), 7);
    assert_eq!(
        test.capabilities().take_hooks(),
        vec![Hook::Unequipped("amulet".to_string(), OWNER)]
    );

    assert!(test.server.unequip(OWNER, 0).is_none());
    assert!(test.server.unequip(OWNER, 42).is_none());
    assert!(test.server.unequip(EntityId::new(99), 0).is_none());
}

#[test]
fn item_can_refuse_unequip() {
    init_logger();
    let mut test = TestServer::new();
    test.server.equip(OWNER, 5, TestItem::named("body:cursed")).unwrap();
    test.capabilities().refuse_unequip("body:cursed");

    assert!(test.server.unequip(OWNER, 5).is_none());
    assert_eq!(
        test.server.storage(OWNER).unwrap().get(5).unwrap().kind_name(),
        Some("body:cursed")
    );
}

#[test]
fn add_item_picks_first_open_valid_slot() {
    init_logger();
    let mut test = TestServer::new();

    assert_eq!(test.server.add_item(OWNER, TestItem::named("ring")), Ok(1));
    assert_eq!(test.server.add_item(OWNER, TestItem::named("ring")), Ok(2));
    assert_eq!(
        test.server.add_item(OWNER, TestItem::named("ring")),
        Err(EquipError::SlotCategoryMismatch {
            slot: 7,
            category: Some(SlotCategory::Ring)
        })
    );

    // universal items grow the store once every slot is taken
    for expected in [0, 3, 4, 5, 6, 7, 8] {
        assert_eq!(
            test.server.add_item(OWNER, TestItem::named("trinket")),
            Ok(expected)
        );
    }
    let storage = test.server.storage(OWNER).unwrap();
    assert_eq!(storage.size(), 9);
    assert!(storage.get(9).unwrap().kind_name().is_none());
}

#[test]
fn add_item_respects_right_click_gates() {
    init_logger();
    let mut test = TestServer::with_config(ServerConfig {
        right_click_equip: false,
        ..Default::default()
    });
    assert_eq!(
        test.server.add_item(OWNER, TestItem::named("charm")),
        Err(EquipError::EquipRejectedByItem { slot: 7 })
    );
    // a refused item leaves no store behind
    assert!(test.server.storage(OWNER).is_none());

    let mut test = TestServer::new();
    test.capabilities().refuse_right_click("charm");
    assert!(test.server.add_item(OWNER, TestItem::named("charm")).is_err());
    assert!(test.server.add_item(OWNER, TestItem::named("apple")).is_err());
    assert!(test.server.storage(OWNER).is_none());
    assert_eq!(test.server.add_item(OWNER, TestItem::named("belt")), Ok(3));
}

#[test]
fn remove_item_shifts_later_slots() {
    init_logger();
    let mut test = TestServer::new();
    for _ in 0..3 {
        test.server.add_item(OWNER, TestItem::named("trinket")).unwrap();
    }
    test.server.equip(OWNER, 1, TestItem::named("ring")).unwrap();

    let removed = test.server.remove_item(OWNER, 0).unwrap();
    assert_eq!(removed.kind_name(), Some("trinket"));

    let storage = test.server.storage(OWNER).unwrap();
    // padded back to the provisioned size
    assert_eq!(storage.size(), 7);
    assert_eq!(storage.get(0).unwrap().kind_name(), Some("ring"));
    assert_eq!(storage.get(1).unwrap().kind_name(), Some("trinket"));
    assert!(storage.get(6).unwrap().is_empty());

    assert!(test.server.remove_item(OWNER, 50).is_none());
}

#[test]
fn removals_keep_provisioned_slots() {
    init_logger();
    let mut test = TestServer::new();
    test.server.attach(OWNER);

    for _ in 0..3 {
        let removed = test.server.remove_item(OWNER, 0).expect("slot 0 exists");
        assert!(removed.is_empty());
    }
    assert_eq!(test.server.storage(OWNER).unwrap().size(), 7);
    assert!(test.capabilities().take_hooks().is_empty());

    assert_eq!(test.server.equip(OWNER, 6, TestItem::named("charm")), Ok(None));
}

#[test]
fn growth_stops_at_slot_limit() {
    init_logger();
    let mut test = TestServer::new();
    while test.server.storage(OWNER).map_or(0, |storage| storage.size()) < MAX_SLOT_INDEX {
        test.server.add_item(OWNER, TestItem::named("trinket")).unwrap();
    }

    assert_eq!(
        test.server.equip(OWNER, MAX_SLOT_INDEX, TestItem::named("trinket")),
        Err(EquipError::OutOfRange {
            slot: MAX_SLOT_INDEX,
            size: MAX_SLOT_INDEX + 1
        })
    );
    assert_eq!(
        test.server.add_item(OWNER, TestItem::named("trinket")),
        Err(EquipError::OutOfRange {
            slot: MAX_SLOT_INDEX,
            size: MAX_SLOT_INDEX + 1
        })
    );
    assert_eq!(test.server.storage(OWNER).unwrap().capacity(), MAX_SLOT_INDEX + 1);
}

#[test]
fn worn_tick_runs_for_every_worn_item() {
    init_logger();
    let mut test = TestServer::new();
    test.server.equip(OWNER, 0, TestItem::named("amulet")).unwrap();
    test.server.equip(OWNER, 3, TestItem::named("belt")).unwrap();
    test.capabilities().take_hooks();

    test.tick(OWNER);
    assert_eq!(
        test.capabilities().take_hooks(),
        vec![
            Hook::WornTick("amulet".to_string(), OWNER),
            Hook::WornTick("belt".to_string(), OWNER),
        ]
    );
}

#[test]
fn type_cache_asks_once_per_item_type() {
    init_logger();
    let mut test = TestServer::new();
    let gold: Arc<str> = Arc::from("ring:gold");

    test.server.equip(OWNER, 1, TestItem::new(&gold)).unwrap();
    test.server.equip(OWNER, 2, TestItem::new(&gold)).unwrap();
    let _ = test.server.equip(OWNER, 3, TestItem::new(&gold));

    assert_eq!(test.capabilities().classify_calls(), 1);
    assert_eq!(test.server.type_cache().len(), 1);

    // a distinct type is classified again
    test.server.equip(OWNER, 1, TestItem::named("ring:gold")).unwrap();
    assert_eq!(test.capabilities().classify_calls(), 2);
}

#[test]
fn registry_merges_extra_registrations() {
    init_logger();
    let mut registry = CategoryRegistry::with_defaults();
    registry.process(
        &[CategoryRegistration::new("TRINKET", 10)],
        &[CategoryRegistration::new("charm", 1).hidden(true)],
    );
    let mut test = TestServer::with_registry(ServerConfig::default(), registry);

    test.server.attach(OWNER);
    assert_eq!(test.server.storage(OWNER).unwrap().size(), 10);
    assert!(test
        .server
        .registry()
        .info(SlotCategory::Charm)
        .unwrap()
        .is_hidden());
}
