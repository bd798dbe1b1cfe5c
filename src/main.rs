//! # Main Entry Point
//!
//! Wires the notifier together:
//! - Domain: Configuration, Types, Errors
//! - Infrastructure: Practicum review API, Telegram
//! - Application: Poll Loop, Logging
//!

mod application;
mod domain;
mod infrastructure;
mod strings;

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::application::poller::PollLoop;
use crate::domain::config::AppConfig;
use crate::domain::paths;
use crate::domain::traits::SystemClock;
use crate::infrastructure::practicum::PracticumClient;
use crate::infrastructure::telegram::TelegramService;
use crate::strings::logs;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // 1. Load Configuration
    let config_path = std::env::var(paths::CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(paths::config_rel()));
    let config = AppConfig::load(&config_path).context(logs::CONFIG_LOAD_ERROR)?;

    // 2. Logging Setup
    let _guard = application::logging::init(&config.logging)?;
    tracing::info!("{}", logs::STARTING);
    if config_path.exists() {
        tracing::info!("{}", logs::config_loaded(&config_path.display().to_string()));
    } else {
        tracing::info!("{}", logs::config_defaults(&config_path.display().to_string()));
    }

    // 3. Credentials and Infrastructure
    let (review, chat) = build_clients(&config, |key| std::env::var(key).ok())?;

    // 4. Poll Loop
    PollLoop::new(
        Arc::new(review),
        Arc::new(chat),
        Arc::new(SystemClock),
        Duration::from_secs(config.poll.interval_secs),
    )
    .run()
    .await;

    Ok(())
}

/// Resolve credentials and build both HTTP clients.
/// Nothing is constructed unless all three credentials are present.
fn build_clients<F>(config: &AppConfig, lookup: F) -> Result<(PracticumClient, TelegramService)>
where
    F: Fn(&str) -> Option<String>,
{
    let credentials = match config.credentials(lookup) {
        Ok(credentials) => credentials,
        Err(e) => {
            tracing::error!(critical = true, "{}", logs::missing_credentials(&e.to_string()));
            return Err(e.into());
        }
    };

    let practicum = &config.services.practicum;
    let review = PracticumClient::new(
        practicum.endpoint.clone(),
        credentials.practicum_token,
        Duration::from_secs(practicum.timeout_secs),
    )
    .context("Failed to build review API client")?;

    let telegram = &config.services.telegram;
    let chat = TelegramService::new(
        telegram.api_base.clone(),
        credentials.telegram_token,
        credentials.telegram_chat_id,
        Duration::from_secs(telegram.timeout_secs),
    )
    .context("Failed to build Telegram client")?;

    Ok((review, chat))
}
