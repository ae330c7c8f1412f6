/*
[INPUT]:  GenerateRequest from the console
[OUTPUT]: GenerateResponse or NexusError, behind an object-safe trait
[POS]:    Backend seam - lets the console run against the HTTP client or a test double
[UPDATE]: When the generation contract gains new operations
*/

use async_trait::async_trait;

use crate::http::{NexusClient, Result};
use crate::types::{GenerateRequest, GenerateResponse};

/// A service that turns a task description into a generation report.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse>;
}

#[async_trait]
impl GenerationBackend for NexusClient {
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse> {
        NexusClient::generate(self, request).await
    }
}
