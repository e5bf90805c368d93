use crate::constants::{
    DEFAULT_MAX_INTERNED_LENGTH, DEFAULT_MAX_INTERNED_STRINGS, DEFAULT_MESSAGE_POOL_CAPACITY,
};

/// Limits of the `StringPool`
#[derive(Clone, Debug)]
pub struct StringPoolConfig {
    /// Strings longer than this (in bytes) are returned unchanged
    pub max_string_length: usize,
    /// Once this many distinct strings are held, new strings are returned unchanged
    pub max_entries: usize,
}

impl Default for StringPoolConfig {
    fn default() -> Self {
        Self {
            max_string_length: DEFAULT_MAX_INTERNED_LENGTH,
            max_entries: DEFAULT_MAX_INTERNED_STRINGS,
        }
    }
}

/// Sizing of the message pool
#[derive(Clone, Debug)]
pub struct MessagePoolConfig {
    /// Released messages kept for reuse. `0` disables pooling entirely and
    /// every message is allocated fresh.
    pub capacity: usize,
}

impl Default for MessagePoolConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_MESSAGE_POOL_CAPACITY,
        }
    }
}

/// Diagnostics of the type cache
#[derive(Clone, Debug, Default)]
pub struct TypeCacheConfig {
    /// Count hits and misses. Not needed for correctness.
    pub track_stats: bool,
}
