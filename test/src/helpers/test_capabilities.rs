use std::{
    collections::HashSet,
    sync::atomic::{AtomicUsize, Ordering},
};

use parking_lot::{Mutex, RwLock};

use baubles_shared::{EntityId, ItemCapabilities, SlotCategory};

use crate::TestItem;

/// A lifecycle hook invocation
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Hook {
    Equipped(String, EntityId),
    Unequipped(String, EntityId),
    WornTick(String, EntityId),
}

/// Item behaviour for tests.
///
/// A kind is classified by the text before any `:`, so `ring:gold` is a
/// RING and `apple` is not a slot item. Per-kind refusals and auto-sync can be
/// switched on at any time.
#[derive(Default)]
pub struct TestCapabilities {
    refuse_equip: RwLock<HashSet<String>>,
    refuse_unequip: RwLock<HashSet<String>>,
    refuse_right_click: RwLock<HashSet<String>>,
    auto_sync: RwLock<HashSet<String>>,
    hooks: Mutex<Vec<Hook>>,
    classify_calls: AtomicUsize,
}

impl TestCapabilities {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn refuse_equip(&self, kind: &str) {
        self.refuse_equip.write().insert(kind.to_string());
    }

    pub fn refuse_unequip(&self, kind: &str) {
        self.refuse_unequip.write().insert(kind.to_string());
    }

    pub fn refuse_right_click(&self, kind: &str) {
        self.refuse_right_click.write().insert(kind.to_string());
    }

    pub fn auto_sync(&self, kind: &str) {
        self.auto_sync.write().insert(kind.to_string());
    }

    pub fn classify_calls(&self) -> usize {
        self.classify_calls.load(Ordering::SeqCst)
    }

    pub fn take_hooks(&self) -> Vec<Hook> {
        std::mem::take(&mut *self.hooks.lock())
    }

    fn listed(set: &RwLock<HashSet<String>>, payload: &TestItem) -> bool {
        payload
            .kind_name()
            .map_or(false, |kind| set.read().contains(kind))
    }

    fn record(&self, hook: fn(String, EntityId) -> Hook, payload: &TestItem, owner: EntityId) {
        let kind = payload.kind_name().unwrap_or_default().to_string();
        self.hooks.lock().push(hook(kind, owner));
    }
}

impl ItemCapabilities<TestItem> for TestCapabilities {
    fn classify(&self, payload: &TestItem) -> Option<SlotCategory> {
        self.classify_calls.fetch_add(1, Ordering::SeqCst);
        let kind = payload.kind_name()?;
        let tag = kind.split(':').next().unwrap_or(kind);
        SlotCategory::from_identifier(tag)
    }

    fn will_auto_sync(&self, payload: &TestItem, _owner: EntityId) -> bool {
        Self::listed(&self.auto_sync, payload)
    }

    fn can_equip(&self, payload: &TestItem, _owner: EntityId) -> bool {
        !Self::listed(&self.refuse_equip, payload)
    }

    fn can_unequip(&self, payload: &TestItem, _owner: EntityId) -> bool {
        !Self::listed(&self.refuse_unequip, payload)
    }

    fn can_right_click_equip(&self, payload: &TestItem) -> bool {
        !Self::listed(&self.refuse_right_click, payload)
    }

    fn on_equipped(&self, payload: &TestItem, owner: EntityId) {
        self.record(Hook::Equipped, payload, owner);
    }

    fn on_unequipped(&self, payload: &TestItem, owner: EntityId) {
        self.record(Hook::Unequipped, payload, owner);
    }

    fn on_worn_tick(&self, payload: &TestItem, owner: EntityId) {
        self.record(Hook::WornTick, payload, owner);
    }
}
