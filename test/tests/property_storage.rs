/// PROPERTY-BASED TESTS: slot store invariants
///
/// Key invariants:
/// 1. After any sequence of insert/remove/set there is exactly one trailing
///    empty guard slot
/// 2. Removal never reorders the surviving payloads
/// 3. Compaction never discards a non-empty payload, whatever size is asked for

use proptest::prelude::*;

use baubles_shared::{BaubleStorage, Payload};
use baubles_test::TestItem;

#[derive(Clone, Debug)]
enum Op {
    Insert(u8),
    RemoveAt(usize),
    Set(usize, Option<u8>),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u8..50).prop_map(Op::Insert),
        (0usize..12).prop_map(Op::RemoveAt),
        (0usize..12, prop::option::of(0u8..50)).prop_map(|(slot, id)| Op::Set(slot, id)),
    ]
}

fn item(id: u8) -> TestItem {
    TestItem::named(&format!("trinket:{}", id))
}

fn ids(storage: &BaubleStorage<TestItem>) -> Vec<Option<String>> {
    storage
        .iter()
        .map(|(_, item)| item.kind_name().map(str::to_string))
        .collect()
}

/// Applies `op` to a plain vector model of the logical slots
fn apply_model(model: &mut Vec<Option<String>>, op: &Op) {
    match op {
        Op::Insert(id) => model.push(item(*id).kind_name().map(str::to_string)),
        Op::RemoveAt(slot) => {
            if *slot < model.len() {
                model.remove(*slot);
            }
        }
        Op::Set(slot, id) => {
            let value = id.map(|id| item(id).kind_name().unwrap().to_string());
            if *slot < model.len() {
                model[*slot] = value;
            } else if *slot == model.len() && value.is_some() {
                model.push(value);
            }
        }
    }
}

fn apply(storage: &mut BaubleStorage<TestItem>, op: &Op) {
    match op {
        Op::Insert(id) => {
            storage.insert(item(*id));
        }
        Op::RemoveAt(slot) => {
            storage.remove_at(*slot);
        }
        Op::Set(slot, id) => {
            let payload = id.map(item).unwrap_or_else(TestItem::empty);
            let _ = storage.set(*slot, payload);
        }
    }
}

proptest! {
    /// The last slot is always an empty guard and no other slot is appended
    #[test]
    fn prop_guard_slot_always_present(ops in prop::collection::vec(op_strategy(), 0..60)) {
        let mut storage = BaubleStorage::<TestItem>::new();
        for op in &ops {
            apply(&mut storage, op);
            prop_assert_eq!(storage.capacity(), storage.size() + 1);
            prop_assert!(storage.get(storage.size()).unwrap().is_empty());
        }
    }

    /// The store behaves exactly like an ordered list with a guard appended
    #[test]
    fn prop_matches_ordered_model(ops in prop::collection::vec(op_strategy(), 0..60)) {
        let mut storage = BaubleStorage::<TestItem>::new();
        let mut model: Vec<Option<String>> = Vec::new();
        for op in &ops {
            apply(&mut storage, op);
            apply_model(&mut model, op);

            let mut expected = model.clone();
            expected.push(None);
            prop_assert_eq!(ids(&storage), expected);
        }
    }

    /// Removal keeps the relative order of every surviving payload
    #[test]
    fn prop_remove_is_stable(
        count in 1usize..15,
        slot in 0usize..15,
    ) {
        let mut storage = BaubleStorage::<TestItem>::new();
        for id in 0..count {
            storage.insert(item(id as u8));
        }
        let before = ids(&storage);

        let removed = storage.remove_at(slot);
        let after = ids(&storage);

        if slot < count {
            prop_assert!(removed.is_some());
            let mut expected = before.clone();
            expected.remove(slot);
            prop_assert_eq!(after, expected);
            for shifted in slot..storage.capacity() {
                prop_assert!(storage.is_dirty(shifted));
            }
        } else {
            prop_assert!(removed.is_none());
            prop_assert_eq!(after, before);
        }
    }

    /// Compaction keeps every payload, in order, whatever size is requested
    #[test]
    fn prop_compaction_never_drops_payloads(
        slots in prop::collection::vec(prop::option::of(0u8..50), 0..20),
        requested in 0usize..30,
    ) {
        let mut storage = BaubleStorage::<TestItem>::with_minimum(slots.len());
        for (slot, id) in slots.iter().enumerate() {
            if let Some(id) = id {
                storage.set(slot, item(*id)).unwrap();
            }
        }
        let kept: Vec<String> = ids(&storage).into_iter().flatten().collect();

        storage.resize_discarding_empty_trailing(requested);

        let after = ids(&storage);
        let packed: Vec<String> = after.iter().take(kept.len()).flatten().cloned().collect();
        prop_assert_eq!(&packed, &kept);
        prop_assert!(after[kept.len()..].iter().all(Option::is_none));
        prop_assert_eq!(storage.capacity(), requested.max(kept.len() + 1));
    }
}
