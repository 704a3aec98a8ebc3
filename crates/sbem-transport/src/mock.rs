//! In-memory transport with a replayable script.
//!
//! [`ScriptedTransport`] records every chunk sent through it and answers
//! `receive` calls from a queue of pre-loaded chunks or errors. This lets
//! session code be exercised without a device attached.
//!
//! ```
//! use sbem_transport::{ChunkTransport, ScriptedTransport};
//!
//! let mut transport = ScriptedTransport::new();
//! transport.push_chunk(&[0x01, 0x02]);
//!
//! transport.send(&[0xAA]).unwrap();
//! assert_eq!(transport.receive().unwrap().as_ref(), &[0x01, 0x02]);
//! assert_eq!(transport.sent().len(), 1);
//! ```

use std::collections::VecDeque;

use bytes::Bytes;
use tracing::trace;

use crate::error::{Result, TransportError};
use crate::traits::ChunkTransport;

#[derive(Debug)]
enum Step {
    Chunk(Bytes),
    Fail(String),
}

/// A [`ChunkTransport`] driven by a script instead of a device.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    script: VecDeque<Step>,
    sent: Vec<Bytes>,
    fail_send_at: Option<usize>,
}

impl ScriptedTransport {
    /// Create a transport with an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a chunk for a later `receive`.
    pub fn push_chunk(&mut self, chunk: impl AsRef<[u8]>) -> &mut Self {
        self.script
            .push_back(Step::Chunk(Bytes::copy_from_slice(chunk.as_ref())));
        self
    }

    /// Queue a receive failure.
    pub fn push_failure(&mut self, reason: impl Into<String>) -> &mut Self {
        self.script.push_back(Step::Fail(reason.into()));
        self
    }

    /// Split `reply` into the given chunk lengths and queue them in order.
    ///
    /// Any bytes left over after the listed lengths are queued as one final
    /// chunk.
    pub fn push_split(&mut self, reply: &[u8], lengths: &[usize]) -> &mut Self {
        let mut rest = reply;
        for &len in lengths {
            let take = len.min(rest.len());
            let (head, tail) = rest.split_at(take);
            self.push_chunk(head);
            rest = tail;
        }
        if !rest.is_empty() {
            self.push_chunk(rest);
        }
        self
    }

    /// Make the send with the given zero-based index fail.
    pub fn fail_send_at(&mut self, index: usize) -> &mut Self {
        self.fail_send_at = Some(index);
        self
    }

    /// Every chunk sent so far, in order.
    pub fn sent(&self) -> &[Bytes] {
        &self.sent
    }

    /// All sent chunks joined into one byte sequence.
    pub fn sent_bytes(&self) -> Vec<u8> {
        self.sent.iter().flat_map(|c| c.iter().copied()).collect()
    }

    /// Number of scripted steps not yet consumed.
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl ChunkTransport for ScriptedTransport {
    fn send(&mut self, chunk: &[u8]) -> Result<()> {
        if self.fail_send_at == Some(self.sent.len()) {
            return Err(TransportError::Rejected(format!(
                "scripted send failure at chunk {}",
                self.sent.len()
            )));
        }
        trace!(len = chunk.len(), "scripted send");
        self.sent.push(Bytes::copy_from_slice(chunk));
        Ok(())
    }

    fn receive(&mut self) -> Result<Bytes> {
        match self.script.pop_front() {
            Some(Step::Chunk(chunk)) => Ok(chunk),
            Some(Step::Fail(reason)) => Err(TransportError::Rejected(reason)),
            None => Err(TransportError::Closed),
        }
    }
}
