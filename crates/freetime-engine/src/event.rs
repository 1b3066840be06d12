//! Busy events as the engine consumes them.

use serde::{Deserialize, Serialize};

use crate::interval::TimeInterval;

/// A calendar item that makes its owner unavailable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusyEvent {
    /// Carried through for display only; never interpreted.
    pub title: String,
    pub interval: TimeInterval,
    /// All-day events block the whole working window of every local calendar
    /// date they touch, regardless of their literal bounds.
    #[serde(default)]
    pub is_all_day: bool,
}

impl BusyEvent {
    pub fn timed(title: impl Into<String>, interval: TimeInterval) -> Self {
        Self {
            title: title.into(),
            interval,
            is_all_day: false,
        }
    }

    pub fn all_day(title: impl Into<String>, interval: TimeInterval) -> Self {
        Self {
            title: title.into(),
            interval,
            is_all_day: true,
        }
    }
}
