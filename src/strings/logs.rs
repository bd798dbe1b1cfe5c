pub const STARTING: &str = "Starting review notifier...";
pub const CONFIG_LOAD_ERROR: &str = "Failed to load configuration";
pub const LOG_DIR_ERROR: &str = "Failed to create log directory";
pub const LOG_APPENDER_ERROR: &str = "Failed to create rolling log file";
pub const NO_CHANGE: &str = "Response received, homework status has not changed";
pub const SENDING_MESSAGE: &str = "Sending notification to Telegram";
pub const CHECKING_RESPONSE: &str = "Checking review API response";

pub fn config_loaded(path: &str) -> String {
    format!("Loaded configuration from {path}")
}

pub fn config_defaults(path: &str) -> String {
    format!("No configuration file at {path}, using defaults")
}

pub fn missing_credentials(err: &str) -> String {
    format!("Cannot start, {err}")
}

pub fn poll_started(interval_secs: u64, cursor: i64) -> String {
    format!("Polling every {interval_secs}s starting from {cursor}")
}

pub fn fetching(from_date: i64) -> String {
    format!("Requesting homework statuses from_date={from_date}")
}

pub fn unexpected_status(code: u16) -> String {
    format!("Review API answered with HTTP {code}")
}

pub fn message_sent(chat_id: &str) -> String {
    format!("Notification sent to chat {chat_id}")
}

pub fn homework_notified(name: &str) -> String {
    format!("Notified about homework \"{name}\"")
}

pub fn program_failure(err: &str) -> String {
    format!("Program failure: {err}")
}
