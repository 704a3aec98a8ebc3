//! Chunked request/reply exchanges for SBEM0102 devices.
//!
//! A [`Session`] frames a command together with encoded records (or raw
//! bytes), sends it in chunks no larger than the negotiated chunk size,
//! then reassembles the chunked reply into a [`RecordBuffer`] ready for
//! iteration.
//!
//! Logical frames share one header:
//! - a 2-byte little-endian command
//! - a 4-byte little-endian body length
//! - the body; record bodies start with the `SBEM0102` magic
//!
//! [`RecordBuffer`]: sbem_record::RecordBuffer

pub mod completion;
pub mod config;
pub mod error;
pub mod frame;
pub mod reader;
pub mod session;
pub mod writer;

pub use completion::{FixedLength, LengthPrefixed, Progress, ReplyCompletion};
pub use config::{SessionConfig, DEFAULT_CHUNK_SIZE, DEFAULT_MAX_REPLY_SIZE};
pub use error::{ProtocolError, Result, SessionError};
pub use frame::{decode_reply, encode_request, RequestBody, HEADER_SIZE, MAGIC};
pub use reader::receive_reply;
pub use session::Session;
pub use writer::send_chunked;
