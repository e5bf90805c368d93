mod message_pool;
mod shards;
mod string_pool;
mod type_cache;

pub use message_pool::{
    new_message_allocator, MessageAllocator, MessagePool, PoolStats, UnpooledMessages,
};
pub use string_pool::StringPool;
pub use type_cache::{CacheStats, Classification, TypeCache};
