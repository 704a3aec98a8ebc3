use std::collections::TryReserveError;

/// Errors that can occur while building or reading record buffers.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    /// No further record exists. This is the normal end of iteration.
    #[error("no more records")]
    Exhausted,

    /// A record extends past the end of the buffer.
    #[error("record at offset {offset} truncated ({needed} bytes needed, {available} available)")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// The payload cannot be expressed by the 32-bit length field.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// The buffer could not grow to hold another record.
    #[error("record buffer allocation failed: {0}")]
    Allocation(#[from] TryReserveError),
}

impl RecordError {
    /// Returns true for the end-of-iteration signal.
    pub fn is_exhausted(&self) -> bool {
        matches!(self, RecordError::Exhausted)
    }
}

pub type Result<T> = std::result::Result<T, RecordError>;
