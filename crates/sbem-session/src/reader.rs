use std::cmp::Ordering;

use bytes::BytesMut;
use sbem_transport::ChunkTransport;
use tracing::trace;

use crate::completion::{Progress, ReplyCompletion};
use crate::error::{ProtocolError, Result};

const INITIAL_BUFFER_CAPACITY: usize = 1024;

/// Read chunks until `completion` reports the reply complete.
///
/// Chunks are concatenated in arrival order; their boundaries carry no
/// meaning. An empty chunk before completion is a protocol error, as is
/// receiving more bytes than the completed length.
pub fn receive_reply<T, C>(
    transport: &mut T,
    completion: &C,
    max_reply_size: usize,
) -> Result<BytesMut>
where
    T: ChunkTransport + ?Sized,
    C: ReplyCompletion + ?Sized,
{
    let mut buf = BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY);
    let mut chunks = 0usize;

    loop {
        if let Progress::Complete { len } = completion.progress(&buf)? {
            if len > max_reply_size {
                return Err(ProtocolError::ReplyTooLarge {
                    size: len,
                    max: max_reply_size,
                }
                .into());
            }
            match buf.len().cmp(&len) {
                Ordering::Equal => {
                    trace!(len, chunks, "reply reassembled");
                    return Ok(buf);
                }
                Ordering::Greater => {
                    return Err(ProtocolError::Overrun {
                        expected: len,
                        received: buf.len(),
                    }
                    .into());
                }
                Ordering::Less => {}
            }
        }

        let chunk = transport.receive()?;
        if chunk.is_empty() {
            return Err(ProtocolError::Incomplete {
                received: buf.len(),
            }
            .into());
        }
        chunks += 1;
        trace!(index = chunks - 1, len = chunk.len(), "chunk received");

        buf.extend_from_slice(&chunk);
        if buf.len() > max_reply_size {
            return Err(ProtocolError::ReplyTooLarge {
                size: buf.len(),
                max: max_reply_size,
            }
            .into());
        }
    }
}

#[cfg(test)]
mod tests {
    use sbem_transport::{ScriptedTransport, TransportError};

    use super::*;
    use crate::completion::{FixedLength, LengthPrefixed};
    use crate::error::SessionError;

    #[test]
    fn reassembles_in_arrival_order() {
        let reply: Vec<u8> = (0..92u8).collect();
        let mut transport = ScriptedTransport::new();
        transport.push_split(&reply, &[40, 40, 12]);

        let buf = receive_reply(&mut transport, &FixedLength(92), usize::MAX).unwrap();

        assert_eq!(buf.len(), 92);
        assert_eq!(buf.as_ref(), reply.as_slice());
        assert_eq!(transport.remaining(), 0);
    }

    #[test]
    fn chunk_boundaries_do_not_matter() {
        let reply: Vec<u8> = (0..92u8).rev().collect();
        let splits: [&[usize]; 4] = [&[92], &[1, 1, 90], &[46, 46], &[10; 9]];
        for split in splits {
            let mut transport = ScriptedTransport::new();
            transport.push_split(&reply, split);
            let buf = receive_reply(&mut transport, &FixedLength(92), usize::MAX).unwrap();
            assert_eq!(buf.as_ref(), reply.as_slice());
        }
    }

    #[test]
    fn length_prefix_stops_at_frame_end() {
        let frame = [0x01, 0x00, 0x03, 0x00, 0x00, 0x00, 0xA, 0xB, 0xC];
        let mut transport = ScriptedTransport::new();
        transport.push_split(&frame, &[4, 4]);
        transport.push_chunk(b"next reply");

        let buf = receive_reply(&mut transport, &LengthPrefixed, usize::MAX).unwrap();
        assert_eq!(buf.as_ref(), &frame[..]);
        assert_eq!(transport.remaining(), 1);
    }

    #[test]
    fn zero_length_reply_needs_no_chunk() {
        let mut transport = ScriptedTransport::new();
        let buf = receive_reply(&mut transport, &FixedLength(0), usize::MAX).unwrap();
        assert!(buf.is_empty());
    }

    #[test]
    fn empty_chunk_before_completion_is_incomplete() {
        let mut transport = ScriptedTransport::new();
        transport.push_chunk([1u8, 2, 3]).push_chunk([0u8; 0]);

        let err = receive_reply(&mut transport, &FixedLength(8), usize::MAX).unwrap_err();
        assert!(matches!(
            err,
            SessionError::Protocol(ProtocolError::Incomplete { received: 3 })
        ));
    }

    #[test]
    fn overrun_is_rejected() {
        let mut transport = ScriptedTransport::new();
        transport.push_chunk([0u8; 10]);

        let err = receive_reply(&mut transport, &FixedLength(8), usize::MAX).unwrap_err();
        assert!(matches!(
            err,
            SessionError::Protocol(ProtocolError::Overrun {
                expected: 8,
                received: 10
            })
        ));
    }

    #[test]
    fn declared_length_above_limit_is_rejected() {
        let mut transport = ScriptedTransport::new();
        transport.push_chunk([0x01, 0x00, 0xFF, 0xFF, 0x00, 0x00]);

        let err = receive_reply(&mut transport, &LengthPrefixed, 1024).unwrap_err();
        assert!(matches!(
            err,
            SessionError::Protocol(ProtocolError::ReplyTooLarge { max: 1024, .. })
        ));
    }

    #[test]
    fn unbounded_completion_hits_size_limit() {
        let never = |_: &[u8]| -> std::result::Result<Progress, ProtocolError> {
            Ok(Progress::Incomplete)
        };
        let mut transport = ScriptedTransport::new();
        transport.push_chunk([0u8; 8]).push_chunk([0u8; 8]);

        let err = receive_reply(&mut transport, &never, 12).unwrap_err();
        assert!(matches!(
            err,
            SessionError::Protocol(ProtocolError::ReplyTooLarge { size: 16, max: 12 })
        ));
    }

    #[test]
    fn transport_failure_propagates() {
        let mut transport = ScriptedTransport::new();
        transport.push_chunk([0u8; 4]).push_failure("stall");

        let err = receive_reply(&mut transport, &FixedLength(8), usize::MAX).unwrap_err();
        assert!(matches!(
            err,
            SessionError::Transport(TransportError::Rejected(_))
        ));
    }
}
