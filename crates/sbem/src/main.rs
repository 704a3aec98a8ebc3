mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "sbem", version, about = "SBEM0102 record inspection CLI")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "warn", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let result = cmd::run(cli.command, format);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use sbem_record::FirmwareGeneration;

    use super::*;

    #[test]
    fn parses_encode_subcommand() {
        let cli = Cli::try_parse_from([
            "sbem",
            "encode",
            "--record",
            "1:aabb",
            "--record",
            "0x7a:",
        ])
        .expect("encode args should parse");

        match cli.command {
            Command::Encode(args) => {
                assert_eq!(args.records, vec![(1, vec![0xAA, 0xBB]), (0x7A, vec![])]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_decode_firmware_generation() {
        let cli = Cli::try_parse_from(["sbem", "decode", "dump.bin", "--fw-gen", "gen2"])
            .expect("decode args should parse");

        match cli.command {
            Command::Decode(args) => assert_eq!(args.fw_gen, FirmwareGeneration::Gen2),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_firmware_generation() {
        let err = Cli::try_parse_from(["sbem", "decode", "dump.bin", "--fw-gen", "gen9"])
            .expect_err("unknown generation should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn rejects_conflicting_request_bodies() {
        let err = Cli::try_parse_from([
            "sbem",
            "frame",
            "--command",
            "0x0b00",
            "--record",
            "1:00",
            "--raw",
            "00",
        ])
        .expect_err("conflicting args should fail");

        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }
}
