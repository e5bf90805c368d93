/// INTEGRATION TESTS: saving and loading one store

use std::sync::Arc;

use baubles_server::BaublesServerError;
use baubles_shared::EntityId;
use baubles_test::{TestItem, TestServer, OWNER};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn save_and_load_restore_slots() {
    init_logger();
    let mut test = TestServer::new();
    test.server.equip(OWNER, 1, TestItem::named("ring").with_charge(4)).unwrap();
    test.server.equip(OWNER, 7, TestItem::named("trinket")).unwrap();
    let bytes = test.server.save(OWNER).unwrap();

    let mut restored = TestServer::new();
    let other = EntityId::new(8);
    restored.server.load(other, &bytes).unwrap();

    let storage = restored.server.storage(other).unwrap();
    assert_eq!(storage.capacity(), 9);
    assert_eq!(storage.get(1).unwrap().charge(), 4);
    assert_eq!(storage.get(7).unwrap().kind_name(), Some("trinket"));

    // everything loaded is sent on the next tick
    assert_eq!(restored.tick(other).len(), 9);
}

#[test]
fn load_pads_short_stores_to_minimum() {
    init_logger();
    let mut small = TestServer::new();
    small.server.add_item(OWNER, TestItem::named("amulet")).unwrap();
    let bytes = {
        let storage = small.server.storage_mut(OWNER).unwrap();
        for slot in (1..7).rev() {
            storage.remove_at(slot);
        }
        assert_eq!(storage.size(), 1);
        small.server.save(OWNER).unwrap()
    };

    let mut test = TestServer::new();
    test.server.load(OWNER, &bytes).unwrap();
    let storage = test.server.storage(OWNER).unwrap();
    assert_eq!(storage.size(), 7);
    assert_eq!(storage.get(0).unwrap().kind_name(), Some("amulet"));
}

#[test]
fn failed_load_keeps_existing_store() {
    init_logger();
    let mut test = TestServer::new();
    test.server.equip(OWNER, 4, TestItem::named("head")).unwrap();
    let bytes = test.server.save(OWNER).unwrap();

    let result = test.server.load(OWNER, &bytes[..bytes.len() / 2]);
    assert!(matches!(
        result,
        Err(BaublesServerError::Load { owner, .. }) if owner == OWNER
    ));
    assert_eq!(
        test.server.storage(OWNER).unwrap().get(4).unwrap().kind_name(),
        Some("head")
    );
}

#[test]
fn loaded_kinds_are_interned() {
    init_logger();
    let mut test = TestServer::new();
    test.server.equip(OWNER, 1, TestItem::named("ring")).unwrap();
    test.server.equip(OWNER, 2, TestItem::named("ring")).unwrap();
    let bytes = test.server.save(OWNER).unwrap();

    test.server.load(OWNER, &bytes).unwrap();
    let storage = test.server.storage(OWNER).unwrap();
    let first = storage.get(1).unwrap().kind_arc().unwrap();
    let second = storage.get(2).unwrap().kind_arc().unwrap();
    assert!(Arc::ptr_eq(first, second));
}
