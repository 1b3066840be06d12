//! Error types for freetime-engine operations.

use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FreeTimeError {
    /// An interval whose start is not strictly before its end.
    #[error("Invalid interval: start {start} is not before end {end}")]
    InvalidInterval {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("Invalid work window: {0}")]
    InvalidConfig(String),

    #[error("At least one participant is required")]
    EmptyParticipantSet,

    /// A raw provider event that cannot be mapped to a busy event.
    #[error("Invalid event: {0}")]
    InvalidEvent(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, FreeTimeError>;
