/// Longest string the `StringPool` will intern by default
pub const DEFAULT_MAX_INTERNED_LENGTH: usize = 128;

/// Distinct strings the `StringPool` will hold by default
pub const DEFAULT_MAX_INTERNED_STRINGS: usize = 1000;

/// Messages kept around for reuse by default
pub const DEFAULT_MESSAGE_POOL_CAPACITY: usize = 256;

/// Shards used by the concurrent caches
pub const CACHE_SHARDS: usize = 16;

/// Highest slot index a wire message may carry. A store never grows its
/// guard past this slot.
pub const MAX_SLOT_INDEX: usize = u8::MAX as usize;
