/// Errors that can occur in chunk transport operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// An I/O error occurred on the underlying stream.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The peer closed the link.
    #[error("transport closed")]
    Closed,

    /// A chunk exceeds the negotiated chunk size.
    #[error("chunk too large ({size} bytes, max {max})")]
    ChunkTooLarge { size: usize, max: usize },

    /// The transport refused the operation.
    #[error("transport rejected operation: {0}")]
    Rejected(String),
}

pub type Result<T> = std::result::Result<T, TransportError>;
