//! # Baubles Client
//! Observer side of baubles: decodes slot-update and full-state messages
//! into local mirrors of the tracked entities' slot stores.

#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces
)]

pub mod shared {
    pub use baubles_shared::{
        BaubleStorage, BitReader, BitWrite, DecodeError, EntityId, Payload, Serde, SerdeErr,
        SlotIndex,
    };
}

mod client;

pub use client::{BaublesClient, ClientConfig};
