/*
[INPUT]:  Orchestrator, prompt input state, settled backend results
[OUTPUT]: AppState actions for submit, export, narration toggle, and scrolling
[POS]:    TUI app state
[UPDATE]: When adding operator actions to the console
*/

use tokio::sync::mpsc;
use tracing::{debug, warn};
use tui_input::Input;

use nexus_console::{GenerationResult, Orchestrator};

use super::runtime::UiEvent;

pub(super) const BUSY_NOTICE: &str = "busy: a task is already running";

pub(super) struct AppState {
    pub(super) orchestrator: Orchestrator,
    pub(super) input: Input,
    pub(super) status_message: String,
    pub(super) artifact_scroll: u16,
    pub(super) ticks: usize,
    event_tx: mpsc::UnboundedSender<UiEvent>,
}

impl AppState {
    pub(super) fn new(orchestrator: Orchestrator, event_tx: mpsc::UnboundedSender<UiEvent>) -> Self {
        Self {
            orchestrator,
            input: Input::default(),
            status_message: "Ready".to_string(),
            artifact_scroll: 0,
            ticks: 0,
            event_tx,
        }
    }

    /// Submit the prompt. The backend call runs on its own task and reports
    /// back through the UI event channel.
    pub(super) fn submit(&mut self) {
        if self.orchestrator.status().is_running() {
            self.status_message = BUSY_NOTICE.to_string();
            return;
        }
        let task = self.input.value().to_string();
        let Some(pending) = self.orchestrator.begin_submit(&task) else {
            debug!("blank prompt ignored");
            return;
        };

        self.artifact_scroll = 0;
        self.status_message = "Task submitted".to_string();
        let event_tx = self.event_tx.clone();
        tokio::spawn(async move {
            let result = pending.run().await;
            if event_tx.send(UiEvent::Settled(result)).is_err() {
                warn!("console closed before the backend answered");
            }
        });
    }

    pub(super) fn apply_result(&mut self, result: GenerationResult) {
        self.orchestrator.settle(result);
        self.status_message = format!("Task finished: {}", self.orchestrator.status());
    }

    pub(super) async fn export_artifact(&mut self) {
        self.status_message = match self.orchestrator.export_artifact().await {
            Ok(outcome) => outcome.to_string(),
            Err(err) => format!("Export failed: {err}"),
        };
    }

    pub(super) fn toggle_narration(&mut self) {
        let enabled = !self.orchestrator.narration_enabled();
        self.orchestrator.set_narration_enabled(enabled);
        self.status_message = if enabled {
            "Narration on".to_string()
        } else {
            "Narration muted".to_string()
        };
    }

    pub(super) fn scroll_artifact(&mut self, delta: i32) {
        let next = i32::from(self.artifact_scroll) + delta;
        self.artifact_scroll = next.clamp(0, i32::from(u16::MAX)) as u16;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use serde_json::json;
    use tempfile::TempDir;
    use tokio::time::timeout;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use nexus_console::{ArtifactExporter, LifecycleStatus, Narrator};
    use nexus_console_adapter::{ClientConfig, NexusClient};

    async fn slow_backend() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/generate"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({
                        "status": "SUCCESS",
                        "logs": ["done"],
                        "final_code": "print(1)"
                    }))
                    .set_delay(Duration::from_millis(300)),
            )
            .expect(1)
            .mount(&server)
            .await;
        server
    }

    fn app_for(
        server: &MockServer,
        dir: &TempDir,
    ) -> (AppState, mpsc::UnboundedReceiver<UiEvent>) {
        let client = NexusClient::with_config(ClientConfig {
            base_url: server.uri(),
            ..ClientConfig::default()
        })
        .expect("client");
        let orchestrator = Orchestrator::new(
            Arc::new(client),
            Narrator::silent(),
            ArtifactExporter::new(dir.path(), "nexus_solution.py"),
        );
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        (AppState::new(orchestrator, event_tx), event_rx)
    }

    #[tokio::test]
    async fn test_submit_while_running_shows_busy_notice() {
        let server = slow_backend().await;
        let dir = TempDir::new().expect("tempdir");
        let (mut app, mut event_rx) = app_for(&server, &dir);
        app.input = Input::new("Build a REST API".to_string());

        app.submit();
        assert_eq!(app.orchestrator.status(), LifecycleStatus::Running);

        app.submit();
        assert_eq!(app.status_message, BUSY_NOTICE);

        let event = timeout(Duration::from_secs(5), event_rx.recv())
            .await
            .expect("backend answer timed out");
        let Some(UiEvent::Settled(result)) = event else {
            panic!("expected a settled result");
        };
        app.apply_result(result);

        assert_eq!(app.orchestrator.status(), LifecycleStatus::Succeeded);
        assert_eq!(app.orchestrator.artifact().as_str(), "print(1)");
        let requests = server.received_requests().await.expect("request recording");
        assert_eq!(requests.len(), 1);
    }

    #[tokio::test]
    async fn test_blank_prompt_sends_nothing() {
        let server = MockServer::start().await;
        let dir = TempDir::new().expect("tempdir");
        let (mut app, mut event_rx) = app_for(&server, &dir);

        app.submit();

        assert_eq!(app.orchestrator.status(), LifecycleStatus::Idle);
        assert_eq!(app.status_message, "Ready");
        assert!(event_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_toggle_narration_updates_status_line() {
        let server = MockServer::start().await;
        let dir = TempDir::new().expect("tempdir");
        let (mut app, _event_rx) = app_for(&server, &dir);

        app.toggle_narration();
        assert!(app.orchestrator.narration_enabled());
        assert_eq!(app.status_message, "Narration on");

        app.toggle_narration();
        assert_eq!(app.status_message, "Narration muted");
    }
}
