//! The working-window configuration passed into every computation.
//!
//! There is no process-wide default consulted behind the caller's back: whoever
//! invokes the engine owns a `WorkWindow` and hands it in explicitly.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{FreeTimeError, Result};
use crate::interval::TimeInterval;

/// Daily clock-time range considered for scheduling, plus the rules applied to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkWindow {
    /// First hour of the window (inclusive), 0-23.
    pub start_hour: u32,
    /// Hour the window closes (exclusive), 0-23, greater than `start_hour`.
    pub end_hour: u32,
    /// Shortest gap worth reporting, in minutes. Must be positive.
    pub min_duration_minutes: i64,
    /// Skip Saturdays and Sundays entirely.
    pub exclude_weekends: bool,
    /// The single zone in which calendar dates and window hours are interpreted.
    pub timezone: Tz,
}

impl Default for WorkWindow {
    fn default() -> Self {
        Self {
            start_hour: 9,
            end_hour: 19,
            min_duration_minutes: 30,
            exclude_weekends: true,
            timezone: chrono_tz::Asia::Tokyo,
        }
    }
}

impl WorkWindow {
    /// Check the window before any computation uses it.
    ///
    /// # Errors
    /// Returns `FreeTimeError::InvalidConfig` when `start_hour >= end_hour`, an
    /// hour is outside 0-23, or `min_duration_minutes <= 0`.
    pub fn validate(&self) -> Result<()> {
        if self.end_hour > 23 {
            return Err(FreeTimeError::InvalidConfig(format!(
                "end_hour must be within 0-23, got {}",
                self.end_hour
            )));
        }
        if self.start_hour >= self.end_hour {
            return Err(FreeTimeError::InvalidConfig(format!(
                "start_hour ({}) must be before end_hour ({})",
                self.start_hour, self.end_hour
            )));
        }
        if self.min_duration_minutes <= 0 {
            return Err(FreeTimeError::InvalidConfig(format!(
                "min_duration_minutes must be positive, got {}",
                self.min_duration_minutes
            )));
        }
        Ok(())
    }

    pub fn min_duration(&self) -> Duration {
        Duration::minutes(self.min_duration_minutes)
    }

    /// The `[start_hour, end_hour)` window of `date`, in this window's zone.
    ///
    /// `None` when a DST transition swallows the whole window, e.g. 02:00-03:00
    /// on a spring-forward date: both ends resolve to the same instant and the
    /// day has no working time.
    pub fn day_window(&self, date: NaiveDate) -> Result<Option<TimeInterval>> {
        let start = self.local_instant(date, self.start_hour)?;
        let end = self.local_instant(date, self.end_hour)?;
        Ok(TimeInterval::new(start, end).ok())
    }

    /// The whole local calendar day `[00:00, next 00:00)` of `date`.
    pub fn calendar_day(&self, date: NaiveDate) -> Result<TimeInterval> {
        let next = date
            .succ_opt()
            .ok_or_else(|| FreeTimeError::InvalidConfig(format!("no day after {}", date)))?;
        let start = self.local_instant(date, 0)?;
        let end = self.local_instant(next, 0)?;
        TimeInterval::new(start, end)
    }

    fn local_instant(&self, date: NaiveDate, hour: u32) -> Result<DateTime<Utc>> {
        let time = NaiveTime::from_hms_opt(hour, 0, 0)
            .ok_or_else(|| FreeTimeError::InvalidConfig(format!("invalid hour {}", hour)))?;
        resolve_local(&self.timezone, date.and_time(time)).ok_or_else(|| {
            FreeTimeError::InvalidConfig(format!(
                "{} {:02}:00 does not exist in {}",
                date, hour, self.timezone
            ))
        })
    }
}

/// Map a local wall-clock time to an instant.
///
/// Ambiguous times (DST fall-back) take the earlier instant. Times inside a DST
/// gap move forward to the first valid quarter hour after the gap.
pub(crate) fn resolve_local(tz: &Tz, naive: NaiveDateTime) -> Option<DateTime<Utc>> {
    (0..=8)
        .map(|step| naive + Duration::minutes(15 * step))
        .find_map(|candidate| tz.from_local_datetime(&candidate).earliest())
        .map(|dt| dt.with_timezone(&Utc))
}
