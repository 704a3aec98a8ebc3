//! SBEM0102 record codec and chunked device exchanges.
//!
//! # Crate Structure
//!
//! - [`transport`]: Chunk-bounded blocking transport abstraction
//! - [`record`]: Record buffers, codec and firmware-aware cursor
//! - [`session`]: Request/reply orchestration over a transport

/// Re-export transport types.
pub mod transport {
    pub use sbem_transport::*;
}

/// Re-export record types.
pub mod record {
    pub use sbem_record::*;
}

/// Re-export session types.
pub mod session {
    pub use sbem_session::*;
}

pub use sbem_record::{FirmwareGeneration, RecordBuffer, RecordCursor};
pub use sbem_session::Session;
