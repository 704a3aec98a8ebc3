//! Chunk-bounded blocking transport abstraction.
//!
//! Devices speaking SBEM0102 exchange bytes in pieces no larger than a
//! negotiated chunk size. This crate defines that contract:
//! - [`ChunkTransport`]: send one chunk, receive one chunk
//! - [`StreamTransport`]: adapter over any `Read + Write` byte stream
//! - [`ScriptedTransport`]: in-memory transport with a replayable script
//!
//! This is the lowest layer of sbem. Reassembly and framing live in
//! `sbem-session`.

pub mod error;
pub mod mock;
pub mod traits;

pub use error::{Result, TransportError};
pub use mock::ScriptedTransport;
pub use traits::{ChunkTransport, StreamTransport};
