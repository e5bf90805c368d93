use thiserror::Error;

/// Errors raised while reading values back out of a bit stream
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SerdeErr {
    /// The reader ran past the end of its buffer
    #[error("Attempted to read past end of buffer (byte {byte_index} of {buffer_len})")]
    OutOfBounds { byte_index: usize, buffer_len: usize },

    /// The bits read do not form a valid value of the expected type
    #[error("Invalid value for {type_name}: {reason}")]
    InvalidValue {
        type_name: &'static str,
        reason: String,
    },

    /// An integer did not fit in the number of bits reserved for it
    #[error("Value {value} does not fit in {bits} bits")]
    IntegerOverflow { value: i128, bits: u8 },

    /// A length prefix exceeded the limit the reader accepts
    #[error("Length {len} exceeds limit of {limit}")]
    LengthLimit { len: usize, limit: usize },
}
