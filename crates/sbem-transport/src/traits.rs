use std::io::{ErrorKind, Read, Write};

use bytes::Bytes;
use tracing::trace;

use crate::error::{Result, TransportError};

/// A blocking transport that moves bytes in bounded chunks.
///
/// Each call is one unit of transfer: `send` delivers exactly one chunk and
/// `receive` yields exactly one chunk. Completion of a logical message is not
/// the transport's concern.
pub trait ChunkTransport {
    /// Send one chunk. Callers never pass more than the negotiated chunk size.
    fn send(&mut self, chunk: &[u8]) -> Result<()>;

    /// Receive one chunk (blocking).
    ///
    /// An empty chunk means the peer has nothing more to deliver.
    fn receive(&mut self) -> Result<Bytes>;
}

impl<T: ChunkTransport + ?Sized> ChunkTransport for &mut T {
    fn send(&mut self, chunk: &[u8]) -> Result<()> {
        (**self).send(chunk)
    }

    fn receive(&mut self) -> Result<Bytes> {
        (**self).receive()
    }
}

impl<T: ChunkTransport + ?Sized> ChunkTransport for Box<T> {
    fn send(&mut self, chunk: &[u8]) -> Result<()> {
        (**self).send(chunk)
    }

    fn receive(&mut self) -> Result<Bytes> {
        (**self).receive()
    }
}

/// Chunk transport over any `Read + Write` byte stream.
///
/// Each `receive` performs a single read of at most `max_chunk` bytes, so
/// chunk boundaries follow whatever the stream hands back.
pub struct StreamTransport<T> {
    inner: T,
    max_chunk: usize,
}

impl<T: Read + Write> StreamTransport<T> {
    /// Wrap a stream, bounding every chunk to `max_chunk` bytes.
    pub fn new(inner: T, max_chunk: usize) -> Self {
        Self { inner, max_chunk }
    }

    /// Largest chunk this transport sends or receives.
    pub fn max_chunk(&self) -> usize {
        self.max_chunk
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the transport and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(TransportError::Io(err)),
            }
        }
    }
}

impl<T: Read + Write> ChunkTransport for StreamTransport<T> {
    fn send(&mut self, chunk: &[u8]) -> Result<()> {
        if chunk.len() > self.max_chunk {
            return Err(TransportError::ChunkTooLarge {
                size: chunk.len(),
                max: self.max_chunk,
            });
        }

        let mut offset = 0usize;
        while offset < chunk.len() {
            match self.inner.write(&chunk[offset..]) {
                Ok(0) => return Err(TransportError::Closed),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(TransportError::Io(err)),
            }
        }
        trace!(len = chunk.len(), "chunk written");

        self.flush()
    }

    fn receive(&mut self) -> Result<Bytes> {
        let mut chunk = vec![0u8; self.max_chunk];
        loop {
            match self.inner.read(&mut chunk) {
                Ok(0) => return Err(TransportError::Closed),
                Ok(n) => {
                    chunk.truncate(n);
                    trace!(len = n, "chunk read");
                    return Ok(Bytes::from(chunk));
                }
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(TransportError::Io(err)),
            }
        }
    }
}

impl<T> std::fmt::Debug for StreamTransport<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamTransport")
            .field("max_chunk", &self.max_chunk)
            .finish()
    }
}
