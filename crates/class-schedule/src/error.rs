//! Error types for scheduling operations.

use thiserror::Error;

use crate::time::Minutes;

#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Invalid time format: {0:?} (expected HH:MM)")]
    InvalidTimeFormat(String),

    #[error("Invalid weekday: {0} (expected 0=Monday..6=Sunday)")]
    InvalidWeekday(u8),

    #[error("Empty interval: start {start} is not before end {end}")]
    EmptyInterval { start: Minutes, end: Minutes },

    #[error("Incomplete draft: missing {0}")]
    IncompleteDraft(&'static str),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid recurrence rule: {0}")]
    InvalidRule(String),

    #[error("Session JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
