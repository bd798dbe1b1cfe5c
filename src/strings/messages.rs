//! # Messages
//!
//! Text delivered to the chat: review verdicts and the status-change template.

pub const VERDICT_APPROVED: &str =
    "The work has been reviewed: the reviewer liked everything. Hooray!";
pub const VERDICT_REVIEWING: &str = "The work has been taken for review by the reviewer.";
pub const VERDICT_REJECTED: &str = "The work has been reviewed: the reviewer has comments.";

pub fn status_changed(homework_name: &str, verdict: &str) -> String {
    format!("Status changed for \"{homework_name}\": {verdict}")
}
