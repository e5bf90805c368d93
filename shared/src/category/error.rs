use thiserror::Error;

/// Errors that can occur while registering slot categories
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CategoryError {
    /// The identifier does not name one of the known categories
    #[error("Unknown slot category identifier '{identifier}'")]
    UnknownIdentifier { identifier: String },
}
