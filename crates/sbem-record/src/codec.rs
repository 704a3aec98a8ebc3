use bytes::{Buf, BufMut};

use crate::error::{RecordError, Result};

/// Length byte that announces a 32-bit little-endian length.
pub const ESCAPE: u8 = 0xFF;

/// Largest payload length that fits the one-byte length field.
pub const MAX_SHORT_LEN: usize = 254;

/// Header size of a short-form record: id (1) + length (1).
pub const SHORT_HEADER_SIZE: usize = 2;

/// Header size of an escaped record: id (1) + escape (1) + length (4).
pub const LONG_HEADER_SIZE: usize = 6;

/// Decoded header of one record inside a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHeader {
    /// Offset of the id byte.
    pub offset: usize,
    /// Record identifier.
    pub id: u8,
    /// Declared payload length.
    pub length: u32,
    /// Offset of the first payload byte.
    pub payload_offset: usize,
}

impl RecordHeader {
    /// Offset one past the last payload byte, as declared by the length field.
    pub fn end(&self) -> usize {
        self.payload_offset.saturating_add(self.length as usize)
    }

    /// Whether the escaped (32-bit) length form was used.
    pub fn is_escaped(&self) -> bool {
        self.payload_offset - self.offset == LONG_HEADER_SIZE
    }

    /// Borrow this record's payload from the buffer it was decoded from.
    pub fn payload<'a>(&self, bytes: &'a [u8]) -> Result<&'a [u8]> {
        bytes
            .get(self.payload_offset..self.end())
            .ok_or(RecordError::Truncated {
                offset: self.offset,
                needed: self.end() - self.offset,
                available: bytes.len().saturating_sub(self.offset),
            })
    }
}

/// A record borrowed from a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record<'a> {
    pub offset: usize,
    pub id: u8,
    pub length: u32,
    pub payload: &'a [u8],
}

/// Number of bytes a record with a payload of `payload_len` bytes occupies.
pub fn encoded_len(payload_len: usize) -> usize {
    if payload_len <= MAX_SHORT_LEN {
        SHORT_HEADER_SIZE + payload_len
    } else {
        LONG_HEADER_SIZE + payload_len
    }
}

/// Append one record to `dst`.
///
/// Wire format:
/// ```text
/// short   : id (1B) | len (1B, 0..=254)      | payload
/// escaped : id (1B) | 0xFF | len (4B LE)     | payload
/// ```
///
/// 255 is never written as a literal length; payloads longer than 254
/// bytes always use the escaped form.
pub fn encode(dst: &mut Vec<u8>, id: u8, payload: &[u8]) -> Result<()> {
    if payload.len() > u32::MAX as usize {
        return Err(RecordError::PayloadTooLarge {
            size: payload.len(),
            max: u32::MAX as usize,
        });
    }

    dst.try_reserve(encoded_len(payload.len()))?;
    dst.put_u8(id);
    if payload.len() <= MAX_SHORT_LEN {
        dst.put_u8(payload.len() as u8);
    } else {
        dst.put_u8(ESCAPE);
        dst.put_u32_le(payload.len() as u32);
    }
    dst.put_slice(payload);
    Ok(())
}

/// Decode the header of the record starting at `offset`.
///
/// Only the header has to be in bounds; the payload is checked when it is
/// borrowed via [`RecordHeader::payload`].
pub fn decode_at(bytes: &[u8], offset: usize) -> Result<RecordHeader> {
    let truncated = |needed: usize| RecordError::Truncated {
        offset,
        needed,
        available: bytes.len().saturating_sub(offset),
    };

    let header = bytes
        .get(offset..offset.saturating_add(SHORT_HEADER_SIZE))
        .ok_or_else(|| truncated(SHORT_HEADER_SIZE))?;
    let id = header[0];

    if header[1] != ESCAPE {
        return Ok(RecordHeader {
            offset,
            id,
            length: u32::from(header[1]),
            payload_offset: offset + SHORT_HEADER_SIZE,
        });
    }

    let mut len_field = bytes
        .get(offset + SHORT_HEADER_SIZE..offset.saturating_add(LONG_HEADER_SIZE))
        .ok_or_else(|| truncated(LONG_HEADER_SIZE))?;
    Ok(RecordHeader {
        offset,
        id,
        length: len_field.get_u32_le(),
        payload_offset: offset + LONG_HEADER_SIZE,
    })
}
