mod bauble_storage;
mod dirty_flags;
mod error;

pub use bauble_storage::BaubleStorage;
pub use dirty_flags::DirtyFlags;
pub use error::StorageError;
