//! # Errors
//!
//! Tagged failures produced by a single poll iteration, and configuration
//! failures raised before the loop starts.

use thiserror::Error;

/// Failure of one poll iteration. Every variant is recoverable: the loop logs
/// it and tries again on the next tick.
#[derive(Debug, Error)]
pub enum PollError {
    #[error("review API request failed: {0}")]
    Fetch(String),

    #[error("review API returned HTTP {0}, expected 200")]
    UnexpectedStatus(u16),

    #[error("malformed review API response: {0}")]
    Format(String),

    #[error("homework record has no `{0}` key")]
    MissingField(&'static str),

    #[error("unknown homework status: {0:?}")]
    UnknownStatus(String),

    #[error("failed to deliver notification: {0}")]
    Delivery(String),
}

impl PollError {
    /// Short tag used in structured log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            PollError::Fetch(_) | PollError::UnexpectedStatus(_) => "fetch-error",
            PollError::Format(_) => "format-error",
            PollError::MissingField(_) | PollError::UnknownStatus(_) => "status-error",
            PollError::Delivery(_) => "delivery-error",
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("missing credentials: {}", .0.join(", "))]
    MissingCredentials(Vec<String>),
}
