/*
[INPUT]:  Operator task text, backend settlements for the in-flight request
[OUTPUT]: Session record (status, log feed, artifact) and narration cues per transition
[POS]:    Session layer - single owned state record with one entry point per transition
[UPDATE]: When lifecycle effects on the feed or artifact change
*/

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use nexus_console_adapter::GenerateResponse;

use crate::lifecycle::{LifecycleEvent, LifecycleStateMachine, LifecycleStatus};
use crate::log_feed::{ERROR_MARKER, LogFeed};

/// Lines shown the moment a task is submitted, before the backend answers.
pub const BOOTSTRAP_LINES: [&str; 3] = [
    "Initializing Nexus Protocols...",
    "Establishing Secure Handshake...",
    "Agents Deployed.",
];

/// Task description accepted for submission. Never blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRequest(String);

impl TaskRequest {
    /// Returns `None` for empty or whitespace-only input. The text is kept as typed.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.trim().is_empty() {
            None
        } else {
            Some(Self(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Generated solution text. Empty until a run succeeds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Artifact(String);

impl Artifact {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn clear(&mut self) {
        self.0.clear();
    }
}

/// Identity of one submitted request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTicket {
    pub id: Uuid,
    pub task: TaskRequest,
    pub issued_at: DateTime<Utc>,
}

/// How the in-flight request ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settlement {
    /// The backend answered with a well-formed body, successful or not.
    Completed(GenerateResponse),
    /// No usable response; carries the failure description.
    TransportFailed(String),
}

/// Narration tied to a lifecycle transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Deployed,
    Completed,
    Failed,
    ConnectionLost,
}

impl Cue {
    pub fn phrase(self) -> &'static str {
        match self {
            Cue::Deployed => "Initializing Nexus Protocols. Agents deployed.",
            Cue::Completed => "Architecture complete. Solution validated.",
            Cue::Failed => "Generation failed. Security protocols engaged.",
            Cue::ConnectionLost => "Connection lost. Please check backend services.",
        }
    }
}

/// Format of the line appended when the backend cannot be reached.
pub fn connection_error_line(description: &str) -> String {
    format!("{ERROR_MARKER} CONNECTION ERROR: {description}")
}

/// All mutable console state for one operator session.
#[derive(Debug, Default)]
pub struct Session {
    lifecycle: LifecycleStateMachine,
    feed: LogFeed,
    artifact: Artifact,
    in_flight: Option<RequestTicket>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> LifecycleStatus {
        self.lifecycle.state()
    }

    pub fn feed(&self) -> &LogFeed {
        &self.feed
    }

    pub fn artifact(&self) -> &Artifact {
        &self.artifact
    }

    pub fn in_flight(&self) -> Option<&RequestTicket> {
        self.in_flight.as_ref()
    }

    /// Start a new request. Returns `None` (and changes nothing) when the task
    /// is blank or a request is already running.
    pub fn begin(&mut self, raw_task: &str) -> Option<RequestTicket> {
        let Some(task) = TaskRequest::parse(raw_task) else {
            debug!("ignoring blank task submission");
            return None;
        };
        if self.lifecycle.transition(LifecycleEvent::Submit).is_err() {
            debug!(status = %self.status(), "ignoring submission while a request is in flight");
            return None;
        }

        self.feed.replace(BOOTSTRAP_LINES);
        self.artifact.clear();

        let ticket = RequestTicket {
            id: Uuid::new_v4(),
            task,
            issued_at: Utc::now(),
        };
        info!(request_id = %ticket.id, "task submitted");
        self.in_flight = Some(ticket.clone());
        Some(ticket)
    }

    /// Apply the outcome of the request named by `request_id`.
    ///
    /// Returns the cue to narrate, or `None` when the settlement does not
    /// belong to the in-flight request.
    pub fn settle(&mut self, request_id: Uuid, settlement: Settlement) -> Option<Cue> {
        match &self.in_flight {
            Some(ticket) if ticket.id == request_id => {}
            _ => {
                warn!(%request_id, "dropping settlement for unknown request");
                return None;
            }
        }
        let ticket = self.in_flight.take()?;
        let elapsed_ms = (Utc::now() - ticket.issued_at).num_milliseconds();

        let (event, cue) = match settlement {
            Settlement::Completed(response) if response.is_success() => {
                self.feed.replace(response.logs);
                self.artifact = Artifact::new(response.final_code.unwrap_or_default());
                (LifecycleEvent::BackendSucceeded, Cue::Completed)
            }
            Settlement::Completed(response) => {
                info!(backend_status = %response.status, "backend reported failure");
                self.feed.replace(response.logs);
                (LifecycleEvent::BackendFailed, Cue::Failed)
            }
            Settlement::TransportFailed(description) => {
                warn!(error = %description, "backend unreachable");
                self.feed.append(connection_error_line(&description));
                (LifecycleEvent::TransportFailed, Cue::ConnectionLost)
            }
        };

        // Running always accepts a settlement event.
        let status = self.lifecycle.transition(event).ok()?;
        info!(request_id = %ticket.id, %status, elapsed_ms, "task settled");
        Some(cue)
    }
}
