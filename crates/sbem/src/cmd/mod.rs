use std::path::PathBuf;

use clap::{Args, Subcommand};
use sbem_record::FirmwareGeneration;
use sbem_session::DEFAULT_CHUNK_SIZE;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod decode;
pub mod encode;
pub mod frame;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Encode records into a raw record buffer.
    Encode(EncodeArgs),
    /// Decode and list the records in a buffer or reply dump.
    Decode(DecodeArgs),
    /// Show how a request frame is split into transport chunks.
    Frame(FrameArgs),
    /// Show version information.
    Version(VersionArgs),
}

/// One `ID:HEX` record given on the command line.
pub type RecordSpec = (u8, Vec<u8>);

/// Hex-decoded bytes. Aliased so clap treats it as a single value.
pub type HexPayload = Vec<u8>;

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Encode(args) => encode::run(args),
        Command::Decode(args) => decode::run(args, format),
        Command::Frame(args) => frame::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Record to append, as ID:HEX (e.g. 1:aabb, 0x7a:). Repeatable.
    #[arg(long = "record", short = 'r', value_name = "ID:HEX", value_parser = parse_record)]
    pub records: Vec<RecordSpec>,
    /// Write the buffer here instead of stdout.
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// File holding encoded records.
    pub path: PathBuf,
    /// Firmware generation of the device that produced the data.
    #[arg(long, env = "SBEM_FW_GEN", default_value = "gen1")]
    pub fw_gen: FirmwareGeneration,
    /// Input is a complete reply frame (header + SBEM0102 magic + records).
    #[arg(long)]
    pub frame: bool,
}

#[derive(Args, Debug)]
pub struct FrameArgs {
    /// Command code (decimal or 0x-prefixed hex).
    #[arg(long, value_parser = parse_command)]
    pub command: u16,
    /// Record to send, as ID:HEX. Repeatable.
    #[arg(long = "record", short = 'r', value_name = "ID:HEX", value_parser = parse_record, conflicts_with = "raw")]
    pub records: Vec<RecordSpec>,
    /// Raw hex body sent verbatim instead of records.
    #[arg(long, value_name = "HEX", value_parser = parse_hex)]
    pub raw: Option<HexPayload>,
    /// Negotiated chunk size.
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
    pub chunk_size: usize,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

fn parse_number(input: &str) -> Result<u64, String> {
    let input = input.trim();
    let parsed = match input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
    {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => input.parse(),
    };
    parsed.map_err(|err| format!("invalid number {input:?}: {err}"))
}

fn parse_command(input: &str) -> Result<u16, String> {
    let value = parse_number(input)?;
    u16::try_from(value).map_err(|_| format!("command {input:?} does not fit in 16 bits"))
}

fn parse_hex(input: &str) -> Result<HexPayload, String> {
    hex::decode(input.trim()).map_err(|err| format!("invalid hex payload: {err}"))
}

fn parse_record(input: &str) -> Result<RecordSpec, String> {
    let (id, payload) = input
        .split_once(':')
        .ok_or_else(|| format!("record {input:?} must look like ID:HEX"))?;
    let id = parse_number(id)?;
    let id = u8::try_from(id).map_err(|_| format!("record id {id} does not fit in 8 bits"))?;
    Ok((id, parse_hex(payload)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_specs() {
        assert_eq!(parse_record("1:aabb").unwrap(), (1, vec![0xAA, 0xBB]));
        assert_eq!(parse_record("0x8A:").unwrap(), (0x8A, vec![]));
        assert!(parse_record("256:00").is_err());
        assert!(parse_record("1:abc").is_err());
        assert!(parse_record("1").is_err());
    }

    #[test]
    fn command_codes() {
        assert_eq!(parse_command("0x0b00").unwrap(), 0x0B00);
        assert_eq!(parse_command("42").unwrap(), 42);
        assert!(parse_command("0x10000").is_err());
        assert!(parse_command("nope").is_err());
    }
}
