/// Default chunk size in bytes (one USB HID report).
pub const DEFAULT_CHUNK_SIZE: usize = 64;

/// Default maximum reassembled reply size: 16 MiB.
pub const DEFAULT_MAX_REPLY_SIZE: usize = 16 * 1024 * 1024;

/// Configuration for a [`Session`](crate::Session).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Largest chunk handed to the transport. Must be non-zero.
    pub chunk_size: usize,
    /// Largest reply the session reassembles before giving up.
    pub max_reply_size: usize,
}

impl SessionConfig {
    /// Default configuration with an explicit chunk size.
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        Self {
            chunk_size,
            ..Self::default()
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_reply_size: DEFAULT_MAX_REPLY_SIZE,
        }
    }
}
