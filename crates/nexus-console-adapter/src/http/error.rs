/*
[INPUT]:  Error sources (HTTP, backend status, serialization, configuration)
[OUTPUT]: Structured error type for every way a backend call can fail
[POS]:    Error handling layer - unified error types for entire crate
[UPDATE]: When adding new error sources or improving error messages
*/

use reqwest::StatusCode;
use thiserror::Error;

/// Main error type for the backend adapter
///
/// The console treats every variant as a transport failure; the `Display`
/// text is what the operator sees in the log feed.
#[derive(Error, Debug)]
pub enum NexusError {
    /// HTTP request failed (connection refused, DNS, timeout, body read)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-2xx status
    #[error("Request failed with status code {code}: {message}")]
    Api { code: u16, message: String },

    /// Response body was not a valid generation payload
    #[error("Malformed response: {0}")]
    Serialization(#[from] serde_json::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl NexusError {
    /// Create an API error from status code and response body
    pub fn api_error(status: StatusCode, message: impl Into<String>) -> Self {
        NexusError::Api {
            code: status.as_u16(),
            message: message.into(),
        }
    }

    /// HTTP status code, when the backend answered at all
    pub fn status_code(&self) -> Option<u16> {
        match self {
            NexusError::Api { code, .. } => Some(*code),
            NexusError::Http(err) => err.status().map(|status| status.as_u16()),
            _ => None,
        }
    }

    /// True when no connection to the backend could be established
    pub fn is_connect(&self) -> bool {
        matches!(self, NexusError::Http(err) if err.is_connect())
    }

    /// `Display` text followed by every underlying cause, e.g. the OS error
    /// behind a refused connection.
    pub fn detailed_message(&self) -> String {
        let mut message = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            let text = cause.to_string();
            if !message.contains(&text) {
                message.push_str(": ");
                message.push_str(&text);
            }
            source = cause.source();
        }
        message
    }
}

/// Result type alias for adapter operations
pub type Result<T> = std::result::Result<T, NexusError>;
