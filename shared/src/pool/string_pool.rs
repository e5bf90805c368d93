use std::{
    collections::HashSet,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use log::debug;

use crate::{config::StringPoolConfig, constants::CACHE_SHARDS};

use super::shards::Shards;

/// Deduplicates short identifier strings that recur in wire messages.
///
/// Strings past the length limit, or arriving once the pool is full, are
/// handed back unchanged. Safe to share between threads; for a given value
/// the first writer's instance becomes canonical.
pub struct StringPool {
    shards: Shards<HashSet<Arc<str>>>,
    len: AtomicUsize,
    config: StringPoolConfig,
}

impl StringPool {
    pub fn new(config: StringPoolConfig) -> Self {
        Self {
            shards: Shards::new(CACHE_SHARDS),
            len: AtomicUsize::new(0),
            config,
        }
    }

    /// Canonical instance of `value`, or a fresh one if the pool declines it
    pub fn intern(&self, value: &str) -> Arc<str> {
        match self.lookup_or_insert(value, || Arc::from(value)) {
            Some(canonical) => canonical,
            None => Arc::from(value),
        }
    }

    /// Canonical instance of `value`, or `value` itself if the pool declines it
    pub fn intern_arc(&self, value: Arc<str>) -> Arc<str> {
        match self.lookup_or_insert(&value, || value.clone()) {
            Some(canonical) => canonical,
            None => value,
        }
    }

    fn lookup_or_insert(
        &self,
        value: &str,
        make: impl FnOnce() -> Arc<str>,
    ) -> Option<Arc<str>> {
        if value.len() > self.config.max_string_length {
            return None;
        }

        let shard = self.shards.for_key(value);
        if let Some(existing) = shard.read().get(value) {
            return Some(existing.clone());
        }

        // reserve room before taking the write lock so the budget is never overshot
        let reserved = self
            .len
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |len| {
                (len < self.config.max_entries).then_some(len + 1)
            })
            .is_ok();

        let mut set = shard.write();
        if let Some(existing) = set.get(value) {
            if reserved {
                self.len.fetch_sub(1, Ordering::AcqRel);
            }
            return Some(existing.clone());
        }
        if !reserved {
            debug!("StringPool: full, not interning '{}'", value);
            return None;
        }

        let canonical = make();
        set.insert(canonical.clone());
        Some(canonical)
    }

    pub fn len(&self) -> usize {
        self.len.load(Ordering::Acquire)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        for shard in self.shards.iter() {
            let mut set = shard.write();
            self.len.fetch_sub(set.len(), Ordering::AcqRel);
            set.clear();
        }
    }
}

impl Default for StringPool {
    fn default() -> Self {
        Self::new(StringPoolConfig::default())
    }
}
