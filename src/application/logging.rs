//! # Logging Setup
//!
//! Installs the global `tracing` subscriber: a rolling file sink that is always
//! active, plus an optional stdout sink.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::domain::config::LoggingConfig;
use crate::domain::paths;
use crate::strings::logs;

const DEFAULT_FILTER: &str = "debug,hyper=warn,reqwest=warn,mockito=warn";

/// Build the rotating file appender. Files are named `notifier.<date>.log`
/// and only the newest `max_files` are kept.
pub fn file_appender(config: &LoggingConfig) -> Result<RollingFileAppender> {
    let dir = Path::new(&config.directory);
    if !dir.exists() {
        fs::create_dir_all(dir).context(logs::LOG_DIR_ERROR)?;
    }

    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(paths::LOG_FILE_PREFIX)
        .filename_suffix(paths::LOG_FILE_SUFFIX)
        .max_log_files(config.max_files.max(1))
        .build(dir)
        .context(logs::LOG_APPENDER_ERROR)
}

/// Install the subscriber. The returned guard must live as long as the
/// process, dropping it stops the background file writer.
pub fn init(config: &LoggingConfig) -> Result<WorkerGuard> {
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender(config)?);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    // Layer for file (Always active)
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false);

    let console_layer = if config.console {
        Some(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(guard)
}
