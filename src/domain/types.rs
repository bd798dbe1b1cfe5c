//! # Domain Types
//!
//! Homework records as returned by the review API and the status lookup table.

use serde_json::Value;

use crate::domain::error::PollError;
use crate::strings::messages;

/// Review outcome of a submitted homework.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeworkStatus {
    Approved,
    Reviewing,
    Rejected,
}

impl HomeworkStatus {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "approved" => Some(HomeworkStatus::Approved),
            "reviewing" => Some(HomeworkStatus::Reviewing),
            "rejected" => Some(HomeworkStatus::Rejected),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            HomeworkStatus::Approved => "approved",
            HomeworkStatus::Reviewing => "reviewing",
            HomeworkStatus::Rejected => "rejected",
        }
    }

    /// Human readable text sent to the chat
    pub fn verdict(&self) -> &'static str {
        match self {
            HomeworkStatus::Approved => messages::VERDICT_APPROVED,
            HomeworkStatus::Reviewing => messages::VERDICT_REVIEWING,
            HomeworkStatus::Rejected => messages::VERDICT_REJECTED,
        }
    }
}

/// A single homework entry from the `homeworks` array.
#[derive(Debug, Clone, PartialEq)]
pub struct Homework {
    pub name: String,
    pub status: HomeworkStatus,
}

impl Homework {
    /// Parse one record. Both keys must be present before the status is looked up,
    /// so a missing key is reported as `MissingField`, never as `UnknownStatus`.
    pub fn from_value(record: &Value) -> Result<Self, PollError> {
        let object = record
            .as_object()
            .ok_or_else(|| PollError::Format("homework record is not an object".into()))?;

        let name = object
            .get("homework_name")
            .ok_or(PollError::MissingField("homework_name"))?;
        let code = object
            .get("status")
            .ok_or(PollError::MissingField("status"))?;

        let name = name
            .as_str()
            .ok_or_else(|| PollError::Format("`homework_name` is not a string".into()))?;
        let code = code
            .as_str()
            .ok_or_else(|| PollError::Format("`status` is not a string".into()))?;

        let status =
            HomeworkStatus::from_code(code).ok_or_else(|| PollError::UnknownStatus(code.into()))?;

        Ok(Self {
            name: name.to_string(),
            status,
        })
    }

    pub fn notification(&self) -> String {
        messages::status_changed(&self.name, self.status.verdict())
    }
}

/// Pull the `homeworks` array out of a response body.
pub fn extract_homeworks(body: &Value) -> Result<&[Value], PollError> {
    let homeworks = body
        .get("homeworks")
        .ok_or_else(|| PollError::Format("no `homeworks` key in response".into()))?;
    homeworks
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| PollError::Format("`homeworks` is not a list".into()))
}

/// Derive the notification for the most recent change, if any.
///
/// Returns `Ok(None)` when the review API reported nothing new.
pub fn latest_change(body: &Value) -> Result<Option<Homework>, PollError> {
    match extract_homeworks(body)?.first() {
        Some(record) => Homework::from_value(record).map(Some),
        None => Ok(None),
    }
}
