use bytes::BytesMut;
use sbem_record::RecordBuffer;
use sbem_transport::ChunkTransport;
use tracing::{debug, warn};

use crate::completion::{LengthPrefixed, ReplyCompletion};
use crate::config::SessionConfig;
use crate::error::{ProtocolError, Result, SessionError};
use crate::frame::{decode_reply, encode_request, RequestBody};
use crate::reader::receive_reply;
use crate::writer::send_chunked;

const INITIAL_BUFFER_CAPACITY: usize = 1024;

/// One SBEM0102 exchange channel bound to a device transport.
///
/// At most one request awaits its reply at a time. Every operation blocks
/// until the transport has finished with it.
pub struct Session<T, C = LengthPrefixed> {
    transport: T,
    config: SessionConfig,
    completion: C,
    buf: BytesMut,
    pending: Option<u16>,
}

impl<T: ChunkTransport> Session<T, LengthPrefixed> {
    /// Bind a session to `transport` with the negotiated `chunk_size`.
    pub fn new(transport: T, chunk_size: usize) -> Result<Self> {
        Self::with_config(transport, SessionConfig::with_chunk_size(chunk_size))
    }

    /// Bind a session with explicit configuration.
    pub fn with_config(transport: T, config: SessionConfig) -> Result<Self> {
        Self::with_completion(transport, config, LengthPrefixed)
    }
}

impl<T: ChunkTransport, C: ReplyCompletion> Session<T, C> {
    /// Bind a session that detects reply completion with `completion`.
    pub fn with_completion(transport: T, config: SessionConfig, completion: C) -> Result<Self> {
        if config.chunk_size == 0 {
            return Err(SessionError::InvalidChunkSize(config.chunk_size));
        }
        debug!(
            chunk_size = config.chunk_size,
            max_reply_size = config.max_reply_size,
            "session initialized"
        );
        Ok(Self {
            transport,
            config,
            completion,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            pending: None,
        })
    }

    /// Tear down the session and hand back the transport.
    pub fn close(self) -> T {
        if let Some(command) = self.pending {
            warn!(command, "session closed with a reply outstanding");
        }
        debug!("session closed");
        self.transport
    }

    /// Send `records` under `command` without waiting for a reply.
    pub fn write(&mut self, command: u16, records: &RecordBuffer) -> Result<()> {
        self.send_frame(command, RequestBody::Records(records))
    }

    /// Send `raw` bytes verbatim under `command` without waiting for a reply.
    pub fn write_raw(&mut self, command: u16, raw: &[u8]) -> Result<()> {
        self.send_frame(command, RequestBody::Raw(raw))
    }

    /// Send a request and mark it as awaiting a reply.
    pub fn send_request(&mut self, command: u16, body: RequestBody<'_>) -> Result<()> {
        if let Some(command) = self.pending {
            return Err(ProtocolError::ExchangeInFlight { command }.into());
        }
        self.send_frame(command, body)?;
        self.pending = Some(command);
        Ok(())
    }

    /// Read and validate the reply to the outstanding request.
    pub fn receive_reply(&mut self) -> Result<RecordBuffer> {
        let command = self.pending.take().ok_or(ProtocolError::NoRequestPending)?;
        let reply = receive_reply(
            &mut self.transport,
            &self.completion,
            self.config.max_reply_size,
        )?;
        let records = decode_reply(command, &reply)
            .inspect_err(|err| warn!(command, %err, "rejected reply"))?;
        debug!(command, len = records.len(), "reply received");
        Ok(records)
    }

    /// Send `records` under `command` and return the reply records.
    pub fn command_request(&mut self, command: u16, records: &RecordBuffer) -> Result<RecordBuffer> {
        self.send_request(command, RequestBody::Records(records))?;
        self.receive_reply()
    }

    /// Send `raw` bytes verbatim under `command` and return the reply records.
    pub fn command_request_raw(&mut self, command: u16, raw: &[u8]) -> Result<RecordBuffer> {
        self.send_request(command, RequestBody::Raw(raw))?;
        self.receive_reply()
    }

    fn send_frame(&mut self, command: u16, body: RequestBody<'_>) -> Result<()> {
        self.buf.clear();
        encode_request(command, body, &mut self.buf)?;
        let chunks = send_chunked(&mut self.transport, &self.buf, self.config.chunk_size)?;
        debug!(command, len = self.buf.len(), chunks, "request sent");
        Ok(())
    }

    /// Command of the request awaiting a reply, if any.
    pub fn pending(&self) -> Option<u16> {
        self.pending
    }

    /// Current session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Borrow the transport.
    pub fn get_ref(&self) -> &T {
        &self.transport
    }

    /// Mutably borrow the transport.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.transport
    }
}

impl<T, C> std::fmt::Debug for Session<T, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .field("pending", &self.pending)
            .finish()
    }
}
