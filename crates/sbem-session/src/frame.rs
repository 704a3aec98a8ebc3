use bytes::{Buf, BufMut, BytesMut};
use sbem_record::RecordBuffer;

use crate::error::ProtocolError;

/// Frame header: command (2) + body length (4) = 6 bytes.
pub const HEADER_SIZE: usize = 6;

/// Magic that starts every record body.
pub const MAGIC: [u8; 8] = *b"SBEM0102";

/// What follows the header of an outgoing frame.
#[derive(Debug, Clone, Copy)]
pub enum RequestBody<'a> {
    /// Encoded records, sent after the `SBEM0102` magic.
    Records(&'a RecordBuffer),
    /// Opaque bytes, sent verbatim.
    Raw(&'a [u8]),
}

impl RequestBody<'_> {
    /// Body size on the wire.
    pub fn wire_len(&self) -> usize {
        match self {
            RequestBody::Records(records) => MAGIC.len() + records.len(),
            RequestBody::Raw(raw) => raw.len(),
        }
    }
}

/// Encode an outgoing frame.
///
/// Wire format:
/// ```text
/// ┌──────────────┬───────────────┬──────────────────────────────────┐
/// │ Command (2B) │ Body len (4B) │ Body                             │
/// │ LE           │ LE            │ "SBEM0102" + records, or raw     │
/// └──────────────┴───────────────┴──────────────────────────────────┘
/// ```
pub fn encode_request(
    command: u16,
    body: RequestBody<'_>,
    dst: &mut BytesMut,
) -> Result<(), ProtocolError> {
    let body_len = body.wire_len();
    if body_len > u32::MAX as usize {
        return Err(ProtocolError::RequestTooLarge { size: body_len });
    }

    dst.reserve(HEADER_SIZE + body_len);
    dst.put_u16_le(command);
    dst.put_u32_le(body_len as u32);
    match body {
        RequestBody::Records(records) => {
            dst.put_slice(&MAGIC);
            dst.put_slice(records.as_bytes());
        }
        RequestBody::Raw(raw) => dst.put_slice(raw),
    }
    Ok(())
}

/// Read the command and declared body length from a frame header.
pub fn decode_header(mut src: &[u8]) -> Result<(u16, usize), ProtocolError> {
    if src.len() < HEADER_SIZE {
        return Err(ProtocolError::ShortHeader { len: src.len() });
    }
    let command = src.get_u16_le();
    let body_len = src.get_u32_le() as usize;
    Ok((command, body_len))
}

/// Validate a complete reply to `command` and extract its records.
pub fn decode_reply(command: u16, reply: &[u8]) -> Result<RecordBuffer, ProtocolError> {
    let (actual, declared) = decode_header(reply)?;
    if actual != command {
        return Err(ProtocolError::CommandMismatch {
            expected: command,
            actual,
        });
    }

    let body = &reply[HEADER_SIZE..];
    if declared != body.len() {
        return Err(ProtocolError::LengthMismatch {
            declared,
            actual: body.len(),
        });
    }

    let records = body
        .strip_prefix(MAGIC.as_slice())
        .ok_or(ProtocolError::MissingMagic)?;
    Ok(RecordBuffer::from_bytes(records))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply_frame(command: u16, records: &RecordBuffer) -> BytesMut {
        let mut buf = BytesMut::new();
        encode_request(command, RequestBody::Records(records), &mut buf).unwrap();
        buf
    }

    #[test]
    fn test_record_request_layout() {
        let mut records = RecordBuffer::new();
        records.add(1, &[0xAA]).unwrap();

        let buf = reply_frame(0x0B05, &records);
        assert_eq!(&buf[..2], &[0x05, 0x0B]);
        assert_eq!(&buf[2..6], &[11, 0, 0, 0]);
        assert_eq!(&buf[6..14], b"SBEM0102");
        assert_eq!(&buf[14..], &[0x01, 0x01, 0xAA]);
    }

    #[test]
    fn test_raw_request_layout() {
        let mut buf = BytesMut::new();
        encode_request(0x0102, RequestBody::Raw(&[9, 8, 7]), &mut buf).unwrap();
        assert_eq!(buf.as_ref(), &[0x02, 0x01, 3, 0, 0, 0, 9, 8, 7]);
    }

    #[test]
    fn test_decode_reply_extracts_records() {
        let mut records = RecordBuffer::new();
        records.add(4, b"data").unwrap();
        let frame = reply_frame(0x2001, &records);

        let decoded = decode_reply(0x2001, &frame).unwrap();
        assert_eq!(decoded, records);
    }

    #[test]
    fn test_decode_reply_empty_record_body() {
        let frame = reply_frame(7, &RecordBuffer::new());
        let decoded = decode_reply(7, &frame).unwrap();
        assert!(decoded.is_empty());
    }

    #[test]
    fn test_decode_reply_command_mismatch() {
        let frame = reply_frame(1, &RecordBuffer::new());
        assert!(matches!(
            decode_reply(2, &frame),
            Err(ProtocolError::CommandMismatch {
                expected: 2,
                actual: 1
            })
        ));
    }

    #[test]
    fn test_decode_reply_short_header() {
        assert!(matches!(
            decode_reply(1, &[0x01, 0x00, 0x00]),
            Err(ProtocolError::ShortHeader { len: 3 })
        ));
    }

    #[test]
    fn test_decode_reply_length_mismatch() {
        let mut frame = reply_frame(1, &RecordBuffer::new());
        frame.put_u8(0xEE);
        assert!(matches!(
            decode_reply(1, &frame),
            Err(ProtocolError::LengthMismatch {
                declared: 8,
                actual: 9
            })
        ));
    }

    #[test]
    fn test_decode_reply_missing_magic() {
        let mut frame = BytesMut::new();
        encode_request(1, RequestBody::Raw(b"SBEM9999"), &mut frame).unwrap();
        assert!(matches!(
            decode_reply(1, &frame),
            Err(ProtocolError::MissingMagic)
        ));
    }
}
