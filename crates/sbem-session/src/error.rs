use sbem_transport::TransportError;

/// Malformed or incomplete logical frames.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// The reply is shorter than the frame header.
    #[error("reply too short for frame header ({len} bytes)")]
    ShortHeader { len: usize },

    /// The reply answers a different command.
    #[error("reply command mismatch (expected {expected:#06x}, got {actual:#06x})")]
    CommandMismatch { expected: u16, actual: u16 },

    /// The header length does not match the body received.
    #[error("reply body length mismatch (declared {declared}, received {actual})")]
    LengthMismatch { declared: usize, actual: usize },

    /// The reply body does not start with the SBEM0102 magic.
    #[error("reply body missing SBEM0102 magic")]
    MissingMagic,

    /// The transport stopped delivering chunks before the reply completed.
    #[error("reply incomplete after {received} bytes")]
    Incomplete { received: usize },

    /// More bytes arrived than the reply length allows.
    #[error("reply overrun ({received} bytes received, {expected} expected)")]
    Overrun { expected: usize, received: usize },

    /// The reply exceeds the configured maximum size.
    #[error("reply too large ({size} bytes, max {max})")]
    ReplyTooLarge { size: usize, max: usize },

    /// The request body cannot be described by the 32-bit length field.
    #[error("request body too large ({size} bytes)")]
    RequestTooLarge { size: usize },

    /// A reply was requested but no request is outstanding.
    #[error("no request pending")]
    NoRequestPending,

    /// A request is already awaiting its reply.
    #[error("request {command:#06x} still awaiting reply")]
    ExchangeInFlight { command: u16 },
}

/// Errors that can occur during a session exchange.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Transport-level error.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Frame-level protocol error.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// The chunk size cannot be zero.
    #[error("invalid chunk size {0}")]
    InvalidChunkSize(usize),
}

pub type Result<T> = std::result::Result<T, SessionError>;
