/*
[INPUT]:  Backend status strings from the /generate contract
[OUTPUT]: Typed generation status with lossless round-trip of unknown values
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When the backend adds status values the console must react to
*/

use std::fmt;

use serde::{Deserialize, Serialize};

/// Wire value the backend uses for a successful generation.
pub const SUCCESS_STATUS: &str = "SUCCESS";

/// Status field of a generation response.
///
/// Only `SUCCESS` carries meaning for the console; every other string is a
/// failure and is kept verbatim for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum GenerationStatus {
    Success,
    Failed(String),
}

impl GenerationStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, GenerationStatus::Success)
    }

    pub fn as_str(&self) -> &str {
        match self {
            GenerationStatus::Success => SUCCESS_STATUS,
            GenerationStatus::Failed(raw) => raw,
        }
    }
}

impl From<String> for GenerationStatus {
    fn from(raw: String) -> Self {
        if raw == SUCCESS_STATUS {
            GenerationStatus::Success
        } else {
            GenerationStatus::Failed(raw)
        }
    }
}

impl From<GenerationStatus> for String {
    fn from(status: GenerationStatus) -> Self {
        match status {
            GenerationStatus::Success => SUCCESS_STATUS.to_string(),
            GenerationStatus::Failed(raw) => raw,
        }
    }
}

impl fmt::Display for GenerationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
