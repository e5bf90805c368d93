use baubles_serde::SerdeErr;
use thiserror::Error;

use crate::StorageError;

/// Errors that can occur while decoding an incoming message.
///
/// A message that fails to decode is never applied to any store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The bit stream itself was malformed
    #[error("Malformed message: {0}")]
    Serde(#[from] SerdeErr),

    /// The message header named a kind this side does not know
    #[error("Unknown message kind {kind}")]
    UnknownMessageKind { kind: u8 },

    /// The message addressed a slot the local store cannot hold
    #[error("Message could not be applied: {0}")]
    Storage(#[from] StorageError),
}
