use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Protocol dialect spoken by the device firmware.
///
/// Only affects how log entries are terminated while iterating records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FirmwareGeneration {
    Gen1,
    Gen2,
    Gen3,
}

impl FirmwareGeneration {
    /// All known generations, oldest first.
    pub const ALL: [FirmwareGeneration; 3] = [Self::Gen1, Self::Gen2, Self::Gen3];

    /// Whether log entries end at the log-end marker rather than at their
    /// encoded length.
    pub fn uses_log_end_marker(self) -> bool {
        matches!(self, FirmwareGeneration::Gen2)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FirmwareGeneration::Gen1 => "gen1",
            FirmwareGeneration::Gen2 => "gen2",
            FirmwareGeneration::Gen3 => "gen3",
        }
    }
}

impl fmt::Display for FirmwareGeneration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a firmware generation name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown firmware generation {0:?} (expected gen1, gen2 or gen3)")]
pub struct ParseGenerationError(pub String);

impl FromStr for FirmwareGeneration {
    type Err = ParseGenerationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gen1" | "1" => Ok(FirmwareGeneration::Gen1),
            "gen2" | "2" => Ok(FirmwareGeneration::Gen2),
            "gen3" | "3" => Ok(FirmwareGeneration::Gen3),
            _ => Err(ParseGenerationError(s.to_string())),
        }
    }
}
