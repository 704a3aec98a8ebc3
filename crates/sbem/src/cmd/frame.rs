use sbem_record::RecordBuffer;
use sbem_session::Session;
use sbem_transport::ScriptedTransport;

use crate::cmd::FrameArgs;
use crate::exit::{record_error, session_error, CliResult, SUCCESS};
use crate::output::{print_chunks, OutputFormat};

pub fn run(args: FrameArgs, format: OutputFormat) -> CliResult<i32> {
    let mut session = Session::new(ScriptedTransport::new(), args.chunk_size)
        .map_err(|err| session_error("invalid session", err))?;

    let written = match &args.raw {
        Some(raw) => session.write_raw(args.command, raw),
        None => {
            let mut records = RecordBuffer::new();
            for (id, payload) in &args.records {
                records
                    .add(*id, payload)
                    .map_err(|err| record_error("encode failed", err))?;
            }
            session.write(args.command, &records)
        }
    };
    written.map_err(|err| session_error("framing failed", err))?;

    let transport = session.close();
    print_chunks(args.command, transport.sent(), format);
    Ok(SUCCESS)
}
