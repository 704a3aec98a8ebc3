use tracing::trace;

use crate::codec::{decode_at, Record, RecordHeader};
use crate::error::{RecordError, Result};
use crate::firmware::FirmwareGeneration;
use crate::search::find_sequence;

/// Sequence that ends a log entry on firmware that ignores the length field.
pub const LOG_END_MARKER: [u8; 6] = [0x00, 0x00, 0x00, 0x00, 0x7A, 0x44];

/// Record ids whose extent is defined by [`LOG_END_MARKER`] on marker-framed
/// firmware.
pub const LOG_ENTRY_IDS: [u8; 2] = [0x7A, 0x8A];

/// The next record starts this many bytes into the marker.
const LOG_END_SKIP: usize = 4;

/// Where a [`RecordCursor`] currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorState {
    /// `advance` has not been called since creation or the last reset.
    Unstarted,
    /// A record header has been decoded at this position.
    Positioned(RecordHeader),
    /// Iteration ended; only `reset` leaves this state.
    Exhausted,
}

/// Forward-only read cursor over an encoded record buffer.
///
/// The cursor borrows the bytes it walks, so it can never outlive the
/// buffer. Positions are plain offsets.
///
/// ```
/// use sbem_record::{FirmwareGeneration, RecordBuffer};
///
/// let mut buf = RecordBuffer::new();
/// buf.add(0x01, &[0xAA, 0xBB]).unwrap();
///
/// let mut cursor = buf.cursor(FirmwareGeneration::Gen1);
/// cursor.advance().unwrap();
/// assert_eq!(cursor.id(), 0x01);
/// assert_eq!(cursor.payload().unwrap(), &[0xAA, 0xBB]);
/// assert!(cursor.advance().unwrap_err().is_exhausted());
/// ```
#[derive(Debug, Clone)]
pub struct RecordCursor<'a> {
    bytes: &'a [u8],
    generation: FirmwareGeneration,
    state: CursorState,
}

impl<'a> RecordCursor<'a> {
    /// Create an unstarted cursor over `bytes`.
    pub fn new(bytes: &'a [u8], generation: FirmwareGeneration) -> Self {
        Self {
            bytes,
            generation,
            state: CursorState::Unstarted,
        }
    }

    /// Return to the unstarted state.
    pub fn reset(&mut self) {
        self.state = CursorState::Unstarted;
    }

    /// Move to the next record.
    ///
    /// The first call positions on offset 0. Returns
    /// [`RecordError::Exhausted`] when no record follows, including on an
    /// empty buffer. A header that runs past the end of the buffer is
    /// reported as [`RecordError::Truncated`]; either way the cursor is
    /// exhausted afterwards.
    pub fn advance(&mut self) -> Result<()> {
        let next = match self.state {
            CursorState::Unstarted => Some(0),
            CursorState::Positioned(current) => self.next_offset(&current),
            CursorState::Exhausted => None,
        };

        let Some(offset) = next.filter(|&offset| offset < self.bytes.len()) else {
            self.state = CursorState::Exhausted;
            return Err(RecordError::Exhausted);
        };

        match decode_at(self.bytes, offset) {
            Ok(header) => {
                trace!(offset, id = header.id, length = header.length, "record");
                self.state = CursorState::Positioned(header);
                Ok(())
            }
            Err(err) => {
                self.state = CursorState::Exhausted;
                Err(err)
            }
        }
    }

    fn next_offset(&self, current: &RecordHeader) -> Option<usize> {
        if self.generation.uses_log_end_marker() && LOG_ENTRY_IDS.contains(&current.id) {
            let rest = &self.bytes[current.offset..];
            let found = find_sequence(rest, &LOG_END_MARKER);
            trace!(offset = current.offset, ?found, "log end marker search");
            return found.map(|m| current.offset + m + LOG_END_SKIP);
        }
        Some(current.end())
    }

    /// Current state.
    pub fn state(&self) -> CursorState {
        self.state
    }

    /// Whether a record is positioned.
    pub fn is_positioned(&self) -> bool {
        matches!(self.state, CursorState::Positioned(_))
    }

    /// Firmware generation this cursor iterates for.
    pub fn generation(&self) -> FirmwareGeneration {
        self.generation
    }

    /// Header of the positioned record, if any.
    pub fn header(&self) -> Option<RecordHeader> {
        match self.state {
            CursorState::Positioned(header) => Some(header),
            _ => None,
        }
    }

    /// The positioned record, or `None` when not positioned.
    ///
    /// Unlike [`record`](Self::record) this never panics; the inner result
    /// still reports a payload that runs past the end of the buffer.
    pub fn current(&self) -> Option<Result<Record<'a>>> {
        self.header().map(|header| self.view(header))
    }

    /// Offset of the positioned record, if any.
    pub fn position(&self) -> Option<usize> {
        self.header().map(|header| header.offset)
    }

    fn view(&self, header: RecordHeader) -> Result<Record<'a>> {
        Ok(Record {
            offset: header.offset,
            id: header.id,
            length: header.length,
            payload: header.payload(self.bytes)?,
        })
    }

    #[track_caller]
    fn positioned(&self) -> RecordHeader {
        match self.state {
            CursorState::Positioned(header) => header,
            state => panic!("record cursor accessed while not positioned ({state:?})"),
        }
    }

    /// Id of the positioned record.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is not positioned on a record.
    #[track_caller]
    pub fn id(&self) -> u8 {
        self.positioned().id
    }

    /// Declared payload length of the positioned record.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is not positioned on a record.
    #[track_caller]
    pub fn length(&self) -> u32 {
        self.positioned().length
    }

    /// Payload of the positioned record.
    ///
    /// Fails with [`RecordError::Truncated`] when the declared length runs
    /// past the end of the buffer.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is not positioned on a record.
    #[track_caller]
    pub fn payload(&self) -> Result<&'a [u8]> {
        self.positioned().payload(self.bytes)
    }

    /// The positioned record as a borrowed view.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is not positioned on a record.
    #[track_caller]
    pub fn record(&self) -> Result<Record<'a>> {
        self.view(self.positioned())
    }
}

/// Iterator adapter over a [`RecordCursor`].
///
/// Yields records until the cursor is exhausted. Decoding errors are
/// yielded once and end the iteration, including a truncated payload that
/// marker framing could otherwise skip past.
#[derive(Debug, Clone)]
pub struct Records<'a> {
    cursor: RecordCursor<'a>,
    failed: bool,
}

impl<'a> Records<'a> {
    pub fn new(cursor: RecordCursor<'a>) -> Self {
        Self {
            cursor,
            failed: false,
        }
    }
}

impl<'a> Iterator for Records<'a> {
    type Item = Result<Record<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let item = match self.cursor.advance() {
            Ok(()) => self.cursor.record(),
            Err(RecordError::Exhausted) => return None,
            Err(err) => Err(err),
        };
        self.failed = item.is_err();
        Some(item)
    }
}
