/*
[INPUT]:  Crate modules and public type definitions
[OUTPUT]: Public Nexus backend adapter crate surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod backend;
pub mod http;
pub mod types;

pub use backend::GenerationBackend;

// Re-export commonly used types from http
pub use http::{ClientConfig, DEFAULT_BASE_URL, NexusClient, NexusError, Result};

// Re-export all types
pub use types::*;
