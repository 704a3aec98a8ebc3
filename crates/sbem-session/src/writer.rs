use sbem_transport::ChunkTransport;
use tracing::trace;

use crate::error::{Result, SessionError};

/// Send `frame` in pieces of at most `chunk_size` bytes.
///
/// Returns the number of chunks written. Stops at the first failed chunk;
/// nothing is retried.
pub fn send_chunked<T>(transport: &mut T, frame: &[u8], chunk_size: usize) -> Result<usize>
where
    T: ChunkTransport + ?Sized,
{
    if chunk_size == 0 {
        return Err(SessionError::InvalidChunkSize(chunk_size));
    }

    let mut sent = 0usize;
    for chunk in frame.chunks(chunk_size) {
        transport.send(chunk)?;
        trace!(index = sent, len = chunk.len(), "chunk sent");
        sent += 1;
    }
    Ok(sent)
}
