use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

use parking_lot::RwLock;

/// A fixed set of independently locked buckets. Callers on different shards
/// never contend.
pub(crate) struct Shards<T> {
    shards: Box<[RwLock<T>]>,
}

impl<T: Default> Shards<T> {
    pub(crate) fn new(count: usize) -> Self {
        let shards = (0..count.max(1))
            .map(|_| RwLock::new(T::default()))
            .collect::<Vec<_>>()
            .into_boxed_slice();
        Self { shards }
    }
}

impl<T> Shards<T> {
    pub(crate) fn for_key<K: Hash + ?Sized>(&self, key: &K) -> &RwLock<T> {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        let index = (hasher.finish() as usize) % self.shards.len();
        &self.shards[index]
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &RwLock<T>> {
        self.shards.iter()
    }
}
