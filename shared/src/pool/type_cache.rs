use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, AtomicU64, Ordering},
        Arc, Weak,
    },
};

use crate::{
    config::TypeCacheConfig, constants::CACHE_SHARDS, CategoryRegistry, ItemCapabilities, Payload,
    SlotCategory, SlotIndex,
};

use super::shards::Shards;

/// Entries a shard may hold before expired ones are swept
const SWEEP_THRESHOLD: usize = 64;

/// What the cache knows about an item type
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Classification {
    SlotItem(SlotCategory),
    NotASlotItem,
}

impl Classification {
    pub fn category(&self) -> Option<SlotCategory> {
        match self {
            Classification::SlotItem(category) => Some(*category),
            Classification::NotASlotItem => None,
        }
    }
}

struct Entry<K: ?Sized> {
    kind: Weak<K>,
    classification: Classification,
}

impl<K: ?Sized> Entry<K> {
    fn is_expired(&self) -> bool {
        self.kind.strong_count() == 0
    }
}

/// Hit/miss counters, only collected while stats tracking is on
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

impl CacheStats {
    pub fn total(&self) -> u64 {
        self.hits + self.misses
    }

    pub fn hit_rate(&self) -> f64 {
        if self.total() == 0 {
            return 0.0;
        }
        self.hits as f64 * 100.0 / self.total() as f64
    }
}

/// Memoizes, per item type, whether payloads of that type are slot items and
/// of which category. Slot acceptance is answered from the registry's
/// precomputed bitmaps.
///
/// Entries hold only weak references to item types, so a type that is
/// unloaded expires out of the cache instead of being kept alive by it.
pub struct TypeCache<K: ?Sized> {
    registry: Arc<CategoryRegistry>,
    entries: Shards<HashMap<usize, Entry<K>>>,
    track_stats: AtomicBool,
    hits: AtomicU64,
    misses: AtomicU64,
}

fn address<K: ?Sized>(kind: &Arc<K>) -> usize {
    Arc::as_ptr(kind) as *const () as usize
}

impl<K: ?Sized + Send + Sync + 'static> TypeCache<K> {
    pub fn new(registry: Arc<CategoryRegistry>, config: &TypeCacheConfig) -> Self {
        Self {
            registry,
            entries: Shards::new(CACHE_SHARDS),
            track_stats: AtomicBool::new(config.track_stats),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn registry(&self) -> &Arc<CategoryRegistry> {
        &self.registry
    }

    /// Category of `payload`, asking `capabilities` only the first time its
    /// item type is seen. Empty payloads are never slot items.
    pub fn classify<P, C>(&self, payload: &P, capabilities: &C) -> Option<SlotCategory>
    where
        P: Payload<Kind = K>,
        C: ItemCapabilities<P> + ?Sized,
    {
        if payload.is_empty() {
            return None;
        }
        let Some(kind) = payload.kind() else {
            return capabilities.classify(payload);
        };

        let key = address(kind);
        let shard = self.entries.for_key(&key);

        if let Some(entry) = shard.read().get(&key) {
            if !entry.is_expired() {
                self.record(true);
                return entry.classification.category();
            }
        }
        self.record(false);

        let category = capabilities.classify(payload);
        let classification = match category {
            Some(category) => Classification::SlotItem(category),
            None => Classification::NotASlotItem,
        };

        let mut entries = shard.write();
        if entries.len() >= SWEEP_THRESHOLD {
            entries.retain(|_, entry| !entry.is_expired());
        }
        entries.insert(
            key,
            Entry {
                kind: Arc::downgrade(kind),
                classification,
            },
        );

        category
    }

    pub fn is_valid_for_slot(&self, category: SlotCategory, slot: SlotIndex) -> bool {
        self.registry.is_valid_for_slot(category, slot)
    }

    /// Drops entries whose item type no longer exists
    pub fn purge_expired(&self) -> usize {
        let mut removed = 0;
        for shard in self.entries.iter() {
            let mut entries = shard.write();
            let before = entries.len();
            entries.retain(|_, entry| !entry.is_expired());
            removed += before - entries.len();
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.entries.iter().map(|shard| shard.read().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        for shard in self.entries.iter() {
            shard.write().clear();
        }
    }

    /// Turning tracking off also resets the counters
    pub fn set_stats_tracking(&self, enabled: bool) {
        self.track_stats.store(enabled, Ordering::Release);
        if !enabled {
            self.hits.store(0, Ordering::Release);
            self.misses.store(0, Ordering::Release);
        }
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Acquire),
            misses: self.misses.load(Ordering::Acquire),
        }
    }

    fn record(&self, hit: bool) {
        if !self.track_stats.load(Ordering::Relaxed) {
            return;
        }
        let counter = if hit { &self.hits } else { &self.misses };
        counter.fetch_add(1, Ordering::Relaxed);
    }
}
