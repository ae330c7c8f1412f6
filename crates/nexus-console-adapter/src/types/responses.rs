/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: Typed Rust response structs with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use serde::{Deserialize, Serialize};

use super::enums::GenerationStatus;

/// Body returned by POST /generate.
///
/// `final_code` is only meaningful when `status` is `SUCCESS`; failed runs
/// omit it or send `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub status: GenerationStatus,
    #[serde(default)]
    pub logs: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_code: Option<String>,
}

impl GenerateResponse {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}
