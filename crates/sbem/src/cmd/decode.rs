use std::fs;

use sbem_record::RecordBuffer;
use sbem_session::frame::decode_header;
use sbem_session::{decode_reply, SessionError};
use tracing::{debug, warn};

use crate::cmd::DecodeArgs;
use crate::exit::{io_error, record_error, session_error, CliResult, SUCCESS};
use crate::output::{print_records, OutputFormat, RecordRow};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let bytes = fs::read(&args.path)
        .map_err(|err| io_error(&format!("failed reading {}", args.path.display()), err))?;

    let buffer = if args.frame {
        unwrap_frame(&bytes).map_err(|err| session_error("invalid reply frame", err))?
    } else {
        RecordBuffer::from_bytes(bytes)
    };
    debug!(len = buffer.len(), fw_gen = %args.fw_gen, "decoding records");

    let mut rows = Vec::new();
    let mut failure = None;
    for record in buffer.records(args.fw_gen) {
        match record {
            Ok(record) => rows.push(RecordRow::from_record(&record)),
            Err(err) => {
                warn!(%err, "stopped at malformed record");
                failure = Some(err);
                break;
            }
        }
    }

    print_records(&rows, format);
    match failure {
        Some(err) => Err(record_error("decode failed", err)),
        None => Ok(SUCCESS),
    }
}

fn unwrap_frame(bytes: &[u8]) -> Result<RecordBuffer, SessionError> {
    let (command, _) = decode_header(bytes)?;
    debug!(command, "reply frame header");
    Ok(decode_reply(command, bytes)?)
}

#[cfg(test)]
mod tests {
    use sbem_record::{FirmwareGeneration, RecordError};

    use super::*;

    fn reply(command: u16, records: &[u8]) -> Vec<u8> {
        let mut out = command.to_le_bytes().to_vec();
        out.extend_from_slice(&((records.len() + 8) as u32).to_le_bytes());
        out.extend_from_slice(b"SBEM0102");
        out.extend_from_slice(records);
        out
    }

    #[test]
    fn unwraps_reply_frame() {
        let frame = reply(0x0B00, &[0x01, 0x01, 0xFF]);
        let buffer = unwrap_frame(&frame).unwrap();
        assert_eq!(buffer.as_bytes(), &[0x01, 0x01, 0xFF]);
    }

    #[test]
    fn rejects_frame_without_magic() {
        let mut frame = reply(1, &[]);
        frame[6] = b'X';
        assert!(unwrap_frame(&frame).is_err());
    }

    #[test]
    fn truncated_dump_reports_record_error() {
        let buffer = RecordBuffer::from_bytes(vec![0x01, 0x05, 0x00]);
        let results: Vec<_> = buffer.records(FirmwareGeneration::Gen1).collect();
        assert!(matches!(
            results.as_slice(),
            [Err(RecordError::Truncated { .. })]
        ));
    }
}
