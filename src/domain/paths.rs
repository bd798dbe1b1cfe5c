//! # Paths
//!
//! Default locations for the configuration file and log output.
//! Everything lives under `data/` relative to the working directory.

pub const DATA_DIR: &str = "data";
pub const CONFIG_FILE: &str = "config.yaml";
pub const LOG_FILE_PREFIX: &str = "notifier";
pub const LOG_FILE_SUFFIX: &str = "log";

/// Environment variable that overrides the config file location
pub const CONFIG_PATH_ENV: &str = "NOTIFIER_CONFIG";

/// Returns the relative path to the config file (e.g. "data/config.yaml")
pub fn config_rel() -> String {
    format!("{}/{}", DATA_DIR, CONFIG_FILE)
}
