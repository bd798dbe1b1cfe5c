//! # Domain Traits
//!
//! Abstract interfaces for the external collaborators of the poll loop.
//! Allows for pluggable implementations in the Infrastructure layer.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::error::PollError;

/// Abstract interface for a Chat Provider (e.g., Telegram)
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Send a message to the chat, returning the provider's message id
    async fn send_message(&self, content: &str) -> Result<String, String>;
}

/// Abstract interface for the homework review API
#[async_trait]
pub trait ReviewApi: Send + Sync {
    /// Fetch the raw status body for changes since `from_date` (unix seconds).
    /// Anything other than HTTP 200 is an error.
    async fn homework_statuses(&self, from_date: i64) -> Result<Value, PollError>;
}

/// Source of the current unix time
pub trait Clock: Send + Sync {
    fn now(&self) -> i64;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}
