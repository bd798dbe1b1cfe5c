//! # Telegram Service Adapter
//!
//! Implements the `ChatProvider` trait on top of the Telegram Bot API `sendMessage` call.
//! The bot token and destination chat are fixed at construction.

use crate::domain::traits::ChatProvider;
use crate::strings::logs;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
}

/// Envelope every Bot API method answers with
#[derive(Debug, Deserialize)]
struct TelegramResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    result: Option<SentMessage>,
}

#[derive(Debug, Deserialize)]
struct SentMessage {
    message_id: i64,
}

pub struct TelegramService {
    http: Client,
    api_base: String,
    token: String,
    chat_id: String,
}

impl TelegramService {
    pub fn new(
        api_base: String,
        token: String,
        chat_id: String,
        timeout: Duration,
    ) -> reqwest::Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            api_base,
            token,
            chat_id,
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{}",
            self.api_base.trim_end_matches('/'),
            self.token,
            method
        )
    }
}

#[async_trait]
impl ChatProvider for TelegramService {
    async fn send_message(&self, content: &str) -> Result<String, String> {
        tracing::info!("{}", logs::SENDING_MESSAGE);

        let request = SendMessageRequest {
            chat_id: &self.chat_id,
            text: content,
        };

        // The URL carries the bot token, keep it out of error text
        let response = self
            .http
            .post(self.method_url("sendMessage"))
            .json(&request)
            .send()
            .await
            .map_err(|e| format!("HTTP request failed: {}", e.without_url()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| format!("Failed to read response: {}", e.without_url()))?;

        let parsed: Option<TelegramResponse> = serde_json::from_str(&body).ok();
        match parsed {
            Some(TelegramResponse {
                ok: true,
                result: Some(sent),
                ..
            }) if status.is_success() => {
                tracing::info!("{}", logs::message_sent(&self.chat_id));
                Ok(sent.message_id.to_string())
            }
            Some(TelegramResponse {
                description: Some(description),
                ..
            }) => Err(format!("HTTP {}: {}", status, description)),
            _ => Err(format!("HTTP {}: unexpected response {}", status, body)),
        }
    }
}
