//! # Practicum Review API Adapter
//!
//! Implements the `ReviewApi` trait over HTTP using `reqwest`.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;

use crate::domain::error::PollError;
use crate::domain::traits::ReviewApi;
use crate::strings::logs;

pub struct PracticumClient {
    http: Client,
    endpoint: String,
    token: String,
}

impl PracticumClient {
    pub fn new(endpoint: String, token: String, timeout: Duration) -> reqwest::Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            endpoint,
            token,
        })
    }
}

#[async_trait]
impl ReviewApi for PracticumClient {
    async fn homework_statuses(&self, from_date: i64) -> Result<Value, PollError> {
        tracing::debug!("{}", logs::fetching(from_date));

        let response = self
            .http
            .get(&self.endpoint)
            .header("Authorization", format!("OAuth {}", self.token))
            .query(&[("from_date", from_date)])
            .send()
            .await
            .map_err(|e| PollError::Fetch(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            tracing::error!("{}", logs::unexpected_status(status.as_u16()));
            return Err(PollError::UnexpectedStatus(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| PollError::Fetch(format!("failed to read body: {}", e)))?;

        serde_json::from_str(&body).map_err(|e| PollError::Format(format!("invalid JSON: {}", e)))
    }
}
