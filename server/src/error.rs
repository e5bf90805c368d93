use thiserror::Error;

use baubles_shared::{EntityId, SerdeErr, SlotCategory, SlotIndex, StorageError};

/// Why an equip attempt was refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EquipError {
    /// The slot lies past the end of the owner's store. `size` counts the
    /// guard slot.
    #[error("Slot {slot} out of range for store of {size} slots")]
    OutOfRange { slot: SlotIndex, size: usize },

    /// The payload may not occupy this slot. `category` is `None` when the
    /// payload is not a slot item at all.
    #[error("Category {category:?} may not occupy slot {slot}")]
    SlotCategoryMismatch {
        slot: SlotIndex,
        category: Option<SlotCategory>,
    },

    /// The item itself refused to be equipped by this owner
    #[error("Item refused to be equipped in slot {slot}")]
    EquipRejectedByItem { slot: SlotIndex },
}

impl From<StorageError> for EquipError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::OutOfRange { slot, size } => EquipError::OutOfRange { slot, size },
        }
    }
}

/// Reported by a `Transport` that could not hand a message over
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("Delivery to observer {observer:?} was interrupted")]
    Interrupted { observer: EntityId },
}

/// Errors that end a synchronization pass early.
///
/// Slots already broadcast in the pass stay clean; the interrupted slot and
/// every later one keep their dirty flags and are retried next tick.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    #[error("Broadcast of slot {slot} to observer {observer:?} was interrupted")]
    Interrupted { slot: SlotIndex, observer: EntityId },

    /// The store shrank and its full state could not reach `observer`. The
    /// whole store is resent next tick.
    #[error("Full state resend to observer {observer:?} was interrupted")]
    ResendInterrupted { observer: EntityId },

    #[error("Store changed shape during sync: {0}")]
    Storage(#[from] StorageError),
}

/// Errors returned by `BaublesServer` operations that are not equip attempts
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BaublesServerError {
    /// Saved data for the owner could not be read. The existing store is untouched.
    #[error("Failed to load store of {owner:?}: {source}")]
    Load {
        owner: EntityId,
        #[source]
        source: SerdeErr,
    },

    /// A loaded store could not be grown to the provisioned size
    #[error("Failed to provision store of {owner:?}: {source}")]
    Provision {
        owner: EntityId,
        #[source]
        source: StorageError,
    },

    #[error("Full state for {owner:?} could not be delivered: {source}")]
    FullState {
        owner: EntityId,
        #[source]
        source: TransportError,
    },
}
