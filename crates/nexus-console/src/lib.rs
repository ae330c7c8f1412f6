/*
[INPUT]:  Public API exports for nexus-console crate
[OUTPUT]: Module declarations and public re-exports
[POS]:    Crate root - library entry point
[UPDATE]: When adding new modules or public exports
*/

pub mod config;
pub mod export;
pub mod lifecycle;
pub mod log_feed;
pub mod narration;
pub mod orchestrator;
pub mod session;

// Re-export main types for convenience
pub use config::ConsoleConfig;
pub use export::{ArtifactExporter, ExportOutcome};
pub use lifecycle::LifecycleStatus;
pub use log_feed::{LogCategory, LogEntry, LogFeed, classify};
pub use narration::Narrator;
pub use orchestrator::{GenerationResult, Orchestrator, PendingGeneration};
pub use session::Artifact;
