//! # Baubles Server
//! Authoritative side of baubles: owns every entity's slot store, validates
//! equip attempts against slot categories, and each tick pushes only the
//! changed slots to the observers tracking that entity.

#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces
)]

pub mod shared {
    pub use baubles_shared::{
        BaubleStorage, BitReader, BitWrite, BitWriter, CategoryRegistration, CategoryRegistry,
        EntityId, FullState, ItemCapabilities, Payload, Serde, SerdeErr, SlotCategory, SlotIndex,
        SlotUpdate,
    };
}

mod drops;
mod error;
mod server;
mod sync;

pub use drops::{DroppedItem, Velocity, DROP_PICKUP_DELAY, DROP_SCATTER, DROP_UPWARD_VELOCITY};
pub use error::{BaublesServerError, EquipError, SyncError, TransportError};
pub use server::{BaublesServer, ServerConfig};
pub use sync::{ObserverResolver, SyncTracker, Synchronizer, Transport};
