/*
[INPUT]:  LifecycleStatus and LifecycleEvent values
[OUTPUT]: Validated state transitions for the single task lifecycle
[POS]:    Session layer - state machine for lifecycle management
[UPDATE]: When lifecycle states or transitions change
*/

use std::fmt;

use thiserror::Error;

/// Status of the console's one task slot.
///
/// Transitions:
/// - Idle/Succeeded/Failed -> Running (on submit)
/// - Running -> Succeeded (backend SUCCESS)
/// - Running -> Failed (backend non-SUCCESS or transport error)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LifecycleStatus {
    #[default]
    Idle,
    Running,
    Succeeded,
    Failed,
}

impl LifecycleStatus {
    pub fn is_running(self) -> bool {
        self == LifecycleStatus::Running
    }

    /// Label shown on the operator screen
    pub fn label(self) -> &'static str {
        match self {
            LifecycleStatus::Idle => "IDLE",
            LifecycleStatus::Running => "RUNNING",
            LifecycleStatus::Succeeded => "SUCCESS",
            LifecycleStatus::Failed => "FAILED",
        }
    }
}

impl fmt::Display for LifecycleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Events that can trigger lifecycle transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    Submit,
    BackendSucceeded,
    BackendFailed,
    TransportFailed,
}

/// Errors occurring during state transitions
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StateError {
    #[error("Invalid transition: {from:?} -> {event:?}")]
    InvalidTransition {
        from: LifecycleStatus,
        event: LifecycleEvent,
    },
}

/// State machine managing the task lifecycle
#[derive(Debug, Default)]
pub struct LifecycleStateMachine {
    current_state: LifecycleStatus,
}

impl LifecycleStateMachine {
    pub fn new(initial: LifecycleStatus) -> Self {
        Self {
            current_state: initial,
        }
    }

    /// Check if the given event is valid from the current state
    pub fn can_transition(&self, event: LifecycleEvent) -> bool {
        self.next_state(event).is_some()
    }

    /// Perform a state transition
    pub fn transition(&mut self, event: LifecycleEvent) -> Result<LifecycleStatus, StateError> {
        let next = self.next_state(event).ok_or(StateError::InvalidTransition {
            from: self.current_state,
            event,
        })?;
        self.current_state = next;
        Ok(next)
    }

    pub fn state(&self) -> LifecycleStatus {
        self.current_state
    }

    fn next_state(&self, event: LifecycleEvent) -> Option<LifecycleStatus> {
        use LifecycleEvent::*;
        use LifecycleStatus::*;

        match (self.current_state, event) {
            (Idle | Succeeded | Failed, Submit) => Some(Running),
            (Running, BackendSucceeded) => Some(Succeeded),
            (Running, BackendFailed | TransportFailed) => Some(Failed),
            _ => None,
        }
    }
}
