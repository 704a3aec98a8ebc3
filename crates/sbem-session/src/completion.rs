use crate::error::ProtocolError;
use crate::frame::{decode_header, HEADER_SIZE};

/// How much of a reply has arrived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// The total length is not known yet, or more bytes are needed.
    Incomplete,
    /// The reply is exactly `len` bytes long.
    Complete { len: usize },
}

/// Decides when a chunked reply is complete.
///
/// Called with everything received so far, before each chunk read.
/// Any closure `Fn(&[u8]) -> Result<Progress, ProtocolError>` works too.
pub trait ReplyCompletion {
    fn progress(&self, received: &[u8]) -> Result<Progress, ProtocolError>;
}

impl<F> ReplyCompletion for F
where
    F: Fn(&[u8]) -> Result<Progress, ProtocolError>,
{
    fn progress(&self, received: &[u8]) -> Result<Progress, ProtocolError> {
        self(received)
    }
}

/// Reply length comes from the frame header.
#[derive(Debug, Clone, Copy, Default)]
pub struct LengthPrefixed;

impl ReplyCompletion for LengthPrefixed {
    fn progress(&self, received: &[u8]) -> Result<Progress, ProtocolError> {
        if received.len() < HEADER_SIZE {
            return Ok(Progress::Incomplete);
        }
        let (_, body_len) = decode_header(received)?;
        Ok(Progress::Complete {
            len: HEADER_SIZE.saturating_add(body_len),
        })
    }
}

/// Reply length is known up front.
#[derive(Debug, Clone, Copy)]
pub struct FixedLength(pub usize);

impl ReplyCompletion for FixedLength {
    fn progress(&self, _received: &[u8]) -> Result<Progress, ProtocolError> {
        Ok(Progress::Complete { len: self.0 })
    }
}
