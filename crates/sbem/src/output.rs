use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use sbem_record::Record;
use serde::Serialize;

/// Payload bytes shown before a preview is cut off.
const PREVIEW_BYTES: usize = 24;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecordRow {
    pub offset: usize,
    pub id: u8,
    pub length: u32,
    pub payload: String,
}

impl RecordRow {
    pub fn from_record(record: &Record<'_>) -> Self {
        Self {
            offset: record.offset,
            id: record.id,
            length: record.length,
            payload: hex::encode(record.payload),
        }
    }

    fn preview(&self) -> String {
        let limit = PREVIEW_BYTES * 2;
        if self.payload.len() <= limit {
            self.payload.clone()
        } else {
            format!("{}… (+{} bytes)", &self.payload[..limit], (self.payload.len() - limit) / 2)
        }
    }
}

#[derive(Serialize)]
struct ChunkRow<'a> {
    command: u16,
    index: usize,
    size: usize,
    bytes: &'a str,
}

pub fn print_records(rows: &[RecordRow], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            for row in rows {
                println!(
                    "{}",
                    serde_json::to_string(row).unwrap_or_else(|_| "{}".to_string())
                );
            }
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["OFFSET", "ID", "LENGTH", "PAYLOAD"]);
            for row in rows {
                table.add_row(vec![
                    row.offset.to_string(),
                    format!("{:#04x}", row.id),
                    row.length.to_string(),
                    row.preview(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for row in rows {
                println!(
                    "offset={} id={:#04x} length={} payload={}",
                    row.offset,
                    row.id,
                    row.length,
                    row.preview()
                );
            }
        }
    }
}

pub fn print_chunks(command: u16, chunks: &[impl AsRef<[u8]>], format: OutputFormat) {
    let encoded: Vec<String> = chunks.iter().map(hex::encode).collect();
    match format {
        OutputFormat::Json => {
            for (index, (chunk, bytes)) in chunks.iter().zip(&encoded).enumerate() {
                let row = ChunkRow {
                    command,
                    index,
                    size: chunk.as_ref().len(),
                    bytes,
                };
                println!(
                    "{}",
                    serde_json::to_string(&row).unwrap_or_else(|_| "{}".to_string())
                );
            }
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["CHUNK", "SIZE", "BYTES"]);
            for (index, (chunk, bytes)) in chunks.iter().zip(&encoded).enumerate() {
                table.add_row(vec![
                    index.to_string(),
                    chunk.as_ref().len().to_string(),
                    bytes.clone(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for (index, bytes) in encoded.iter().enumerate() {
                println!("chunk={index} command={command:#06x} bytes={bytes}");
            }
        }
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_truncates_long_payloads() {
        let payload = [0xABu8; 30];
        let row = RecordRow::from_record(&Record {
            offset: 0,
            id: 1,
            length: 30,
            payload: &payload,
        });
        assert_eq!(row.payload.len(), 60);
        assert!(row.preview().ends_with("(+6 bytes)"));

        let short = RecordRow::from_record(&Record {
            offset: 4,
            id: 2,
            length: 2,
            payload: &[0xAA, 0xBB],
        });
        assert_eq!(short.preview(), "aabb");
    }
}
