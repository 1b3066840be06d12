//! Half-open time intervals and the overlap primitives the engine is built on.
//!
//! Two intervals overlap when `a.start < b.end && b.start < a.end`. Adjacent
//! intervals (one ends exactly when the other starts) do NOT overlap.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{FreeTimeError, Result};

/// A half-open range `[start, end)` with `start < end`.
///
/// The constructor is the only way in, so every value in circulation is valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawInterval")]
pub struct TimeInterval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

#[derive(Deserialize)]
struct RawInterval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TryFrom<RawInterval> for TimeInterval {
    type Error = FreeTimeError;

    fn try_from(raw: RawInterval) -> Result<Self> {
        TimeInterval::new(raw.start, raw.end)
    }
}

impl TimeInterval {
    /// Build an interval, rejecting `start >= end`.
    ///
    /// # Errors
    /// Returns `FreeTimeError::InvalidInterval` for zero-length or inverted input.
    /// The bounds are never swapped or clamped.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if start >= end {
            return Err(FreeTimeError::InvalidInterval { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn duration_minutes(&self) -> i64 {
        self.duration().num_minutes()
    }

    pub fn overlaps(&self, other: &TimeInterval) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// The common part of two intervals, or `None` when they only touch or are
    /// disjoint.
    pub fn intersection(&self, other: &TimeInterval) -> Option<TimeInterval> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        (start < end).then_some(TimeInterval { start, end })
    }

    /// Truncate this interval to `window`. Never extends it.
    pub fn clip_to(&self, window: &TimeInterval) -> Option<TimeInterval> {
        self.intersection(window)
    }
}

impl fmt::Display for TimeInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start.to_rfc3339(), self.end.to_rfc3339())
    }
}

/// A span in which a participant has no competing event.
///
/// Structurally a [`TimeInterval`], kept as a distinct type so a free result can
/// never be confused with a scheduled item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FreeInterval(TimeInterval);

impl FreeInterval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        TimeInterval::new(start, end).map(Self)
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.0.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.0.end
    }

    pub fn duration(&self) -> Duration {
        self.0.duration()
    }

    pub fn duration_minutes(&self) -> i64 {
        self.0.duration_minutes()
    }

    pub fn interval(&self) -> &TimeInterval {
        &self.0
    }

    pub(crate) fn meets(&self, min_duration: Duration) -> bool {
        self.duration() >= min_duration
    }
}

impl From<TimeInterval> for FreeInterval {
    fn from(interval: TimeInterval) -> Self {
        Self(interval)
    }
}

impl fmt::Display for FreeInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Wire shape of a free interval: ISO-8601 bounds plus the derived length.
#[derive(Serialize, Deserialize)]
struct FreeIntervalRepr {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    #[serde(default, skip_deserializing)]
    duration_minutes: i64,
}

impl Serialize for FreeInterval {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        FreeIntervalRepr {
            start: self.start(),
            end: self.end(),
            duration_minutes: self.duration_minutes(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for FreeInterval {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let repr = FreeIntervalRepr::deserialize(deserializer)?;
        FreeInterval::new(repr.start, repr.end).map_err(serde::de::Error::custom)
    }
}
