/*
[INPUT]:  Operator actions (submit, export, narration toggle) and backend results
[OUTPUT]: Session transitions, narration side effects, exported artifact files
[POS]:    Orchestrator - owns the session, backend handle, narrator and exporter
[UPDATE]: When adding operator actions or changing how settlements are applied
*/

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use nexus_console_adapter::{GenerateRequest, GenerateResponse, GenerationBackend, NexusError};

use crate::export::{ArtifactExporter, ExportError, ExportOutcome};
use crate::lifecycle::LifecycleStatus;
use crate::log_feed::LogFeed;
use crate::narration::Narrator;
use crate::session::{Artifact, Cue, RequestTicket, Session, Settlement};

/// Backend call for one accepted submission, detached from the orchestrator so
/// the caller decides where it runs.
pub struct PendingGeneration {
    ticket: RequestTicket,
    backend: Arc<dyn GenerationBackend>,
}

impl PendingGeneration {
    pub fn ticket(&self) -> &RequestTicket {
        &self.ticket
    }

    /// Issue the request. There is no timeout: a backend that never answers
    /// keeps this future pending.
    pub async fn run(self) -> GenerationResult {
        let request = GenerateRequest::new(self.ticket.task.as_str());
        let outcome = self.backend.generate(&request).await;
        GenerationResult {
            request_id: self.ticket.id,
            outcome,
        }
    }
}

/// Raw backend outcome tagged with the request it belongs to.
#[derive(Debug)]
pub struct GenerationResult {
    pub request_id: Uuid,
    pub outcome: Result<GenerateResponse, NexusError>,
}

impl GenerationResult {
    fn into_settlement(self) -> (Uuid, Settlement) {
        let settlement = match self.outcome {
            Ok(response) => Settlement::Completed(response),
            Err(err) => Settlement::TransportFailed(err.detailed_message()),
        };
        (self.request_id, settlement)
    }
}

pub struct Orchestrator {
    session: Session,
    backend: Arc<dyn GenerationBackend>,
    narrator: Narrator,
    exporter: ArtifactExporter,
}

impl Orchestrator {
    pub fn new(
        backend: Arc<dyn GenerationBackend>,
        narrator: Narrator,
        exporter: ArtifactExporter,
    ) -> Self {
        Self {
            session: Session::new(),
            backend,
            narrator,
            exporter,
        }
    }

    pub fn status(&self) -> LifecycleStatus {
        self.session.status()
    }

    pub fn feed(&self) -> &LogFeed {
        self.session.feed()
    }

    pub fn artifact(&self) -> &Artifact {
        self.session.artifact()
    }

    pub fn narration_enabled(&self) -> bool {
        self.narrator.is_enabled()
    }

    pub fn set_narration_enabled(&mut self, enabled: bool) {
        self.narrator.set_enabled(enabled);
    }

    /// Synchronous half of submit: guard, reset feed and artifact, announce.
    ///
    /// Returns `None` for blank input or while a request is running; the
    /// caller must then not contact the backend.
    pub fn begin_submit(&mut self, task: &str) -> Option<PendingGeneration> {
        let ticket = self.session.begin(task)?;
        self.narrator.announce(Cue::Deployed.phrase());
        Some(PendingGeneration {
            ticket,
            backend: Arc::clone(&self.backend),
        })
    }

    /// Apply a backend outcome produced by `PendingGeneration::run`.
    pub fn settle(&mut self, result: GenerationResult) {
        let (request_id, settlement) = result.into_settlement();
        if let Some(cue) = self.session.settle(request_id, settlement) {
            self.narrator.announce(cue.phrase());
        }
    }

    /// Run one submission to completion. Returns `false` when rejected.
    pub async fn submit(&mut self, task: &str) -> bool {
        let Some(pending) = self.begin_submit(task) else {
            return false;
        };
        debug!(request_id = %pending.ticket().id, "awaiting backend");
        let result = pending.run().await;
        self.settle(result);
        true
    }

    pub async fn export_artifact(&self) -> Result<ExportOutcome, ExportError> {
        self.exporter.export(self.session.artifact()).await
    }

    pub fn shutdown(&self) {
        self.narrator.shutdown();
    }
}
