use std::fs;

use sbem_record::RecordBuffer;
use tracing::debug;

use crate::cmd::EncodeArgs;
use crate::exit::{io_error, record_error, CliResult, SUCCESS};
use crate::output::print_raw;

pub fn run(args: EncodeArgs) -> CliResult<i32> {
    let mut buffer = RecordBuffer::new();
    for (id, payload) in &args.records {
        buffer
            .add(*id, payload)
            .map_err(|err| record_error("encode failed", err))?;
    }
    debug!(records = args.records.len(), len = buffer.len(), "buffer encoded");

    match &args.output {
        Some(path) => fs::write(path, buffer.as_bytes())
            .map_err(|err| io_error(&format!("failed writing {}", path.display()), err))?,
        None => print_raw(buffer.as_bytes()),
    }
    Ok(SUCCESS)
}
