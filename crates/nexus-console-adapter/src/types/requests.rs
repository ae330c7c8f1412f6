/*
[INPUT]:  Operator task text
[OUTPUT]: Serializable body for POST /generate
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub task: String,
}

impl GenerateRequest {
    pub fn new(task: impl Into<String>) -> Self {
        Self { task: task.into() }
    }
}
