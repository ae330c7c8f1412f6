/*
[INPUT]:  GenerateRequest with the operator's task text
[OUTPUT]: GenerateResponse with status, ordered logs, and optional artifact
[POS]:    HTTP layer - generation endpoint
[UPDATE]: When the generation contract changes
*/

use reqwest::Method;
use tracing::info;

use crate::http::{NexusClient, Result};
use crate::types::{GenerateRequest, GenerateResponse};

impl NexusClient {
    /// Submit a task for generation
    ///
    /// POST /generate
    /// The whole run happens server side; the body arrives in one piece.
    pub async fn generate(&self, req: &GenerateRequest) -> Result<GenerateResponse> {
        info!(task_len = req.task.len(), "submitting generation request");
        let builder = self.request(Method::POST, "/generate")?.json(req);
        let response: GenerateResponse = self.send_json(builder).await?;
        info!(
            status = %response.status,
            log_lines = response.logs.len(),
            has_code = response.final_code.is_some(),
            "generation request settled"
        );
        Ok(response)
    }
}
