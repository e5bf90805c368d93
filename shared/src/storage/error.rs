use thiserror::Error;

use crate::SlotIndex;

/// Errors that can occur while operating on a `BaubleStorage`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// The slot lies outside the store. `size` is the capacity, guard included.
    #[error("Slot {slot} out of range for store of {size} slots")]
    OutOfRange { slot: SlotIndex, size: usize },
}
