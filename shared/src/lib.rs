//! # Baubles Shared
//! Slot storage, categories, wire messages and pooling shared between
//! baubles-server & baubles-client crates.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

pub use baubles_serde::{
    BitReader, BitWrite, BitWriter, ConstBitLength, Serde, SerdeErr, SignedInteger,
    SignedVariableInteger, UnsignedInteger, UnsignedVariableInteger,
};

mod capabilities;
mod category;
mod config;
mod constants;
mod messages;
mod payload;
mod pool;
mod storage;
mod types;


pub use capabilities::ItemCapabilities;
pub use category::{
    CategoryError, CategoryInfo, CategoryRegistration, CategoryRegistry, SlotCategory, ValidSlots,
};
pub use config::{MessagePoolConfig, StringPoolConfig, TypeCacheConfig};
pub use constants::{
    CACHE_SHARDS, DEFAULT_MAX_INTERNED_LENGTH, DEFAULT_MAX_INTERNED_STRINGS,
    DEFAULT_MESSAGE_POOL_CAPACITY, MAX_SLOT_INDEX,
};
pub use messages::{
    encode_full_state, encode_slot_update, BaublesMessage, DecodeError, FullState, MessageKind,
    SlotUpdate,
};
pub use payload::Payload;
pub use pool::{
    new_message_allocator, CacheStats, Classification, MessageAllocator, MessagePool, PoolStats,
    StringPool, TypeCache, UnpooledMessages,
};
pub use storage::{BaubleStorage, DirtyFlags, StorageError};
pub use types::{EntityId, SlotIndex};
