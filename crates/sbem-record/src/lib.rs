//! SBEM0102 tagged-length-value records.
//!
//! Every record on the wire is:
//! - a 1-byte identifier
//! - a 1-byte length (`0..=254`), or the escape byte `0xFF` followed by a
//!   4-byte little-endian length
//! - the payload
//!
//! Records are appended to a [`RecordBuffer`] and read back with a
//! [`RecordCursor`], which also knows how one firmware generation terminates
//! log entries with an explicit marker instead of the length field.

pub mod buffer;
pub mod codec;
pub mod cursor;
pub mod error;
pub mod firmware;
pub mod search;

pub use buffer::RecordBuffer;
pub use codec::{
    decode_at, encode, encoded_len, Record, RecordHeader, ESCAPE, LONG_HEADER_SIZE,
    MAX_SHORT_LEN, SHORT_HEADER_SIZE,
};
pub use cursor::{CursorState, RecordCursor, Records, LOG_END_MARKER, LOG_ENTRY_IDS};
pub use error::{RecordError, Result};
pub use firmware::{FirmwareGeneration, ParseGenerationError};
pub use search::find_sequence;
