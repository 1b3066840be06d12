//! Multi-day driver: one participant's free intervals over a date range.

use chrono::{DateTime, Datelike, NaiveDate, Utc, Weekday};

use crate::config::WorkWindow;
use crate::day::derive_free_intervals;
use crate::error::Result;
use crate::event::BusyEvent;
use crate::interval::FreeInterval;

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Compute free intervals for every calendar date in `[range_start, range_end]`.
///
/// Both boundary dates are included whole. Weekends contribute nothing when
/// `config.exclude_weekends` is set. Per-day results are concatenated in date
/// order and never merged across days, so every interval lies inside a single
/// day's window. An inverted range yields an empty list.
///
/// A date whose window vanishes in a DST transition contributes nothing.
///
/// # Errors
/// Returns `FreeTimeError::InvalidConfig` if `config` fails validation.
pub fn compute_free_slots(
    events: &[BusyEvent],
    range_start: NaiveDate,
    range_end: NaiveDate,
    config: &WorkWindow,
) -> Result<Vec<FreeInterval>> {
    config.validate()?;

    let min_duration = config.min_duration();
    let mut free = Vec::new();

    for date in range_start.iter_days().take_while(|d| *d <= range_end) {
        if config.exclude_weekends && is_weekend(date) {
            continue;
        }

        let Some(day_window) = config.day_window(date)? else {
            continue;
        };
        let calendar_day = config.calendar_day(date)?;

        // An all-day event blocks the window of every local date it touches,
        // even when its bounds miss the window itself.
        let day_events: Vec<BusyEvent> = events
            .iter()
            .filter_map(|e| {
                if e.is_all_day {
                    e.interval
                        .overlaps(&calendar_day)
                        .then(|| BusyEvent::all_day(e.title.clone(), day_window))
                } else {
                    e.interval.overlaps(&day_window).then(|| e.clone())
                }
            })
            .collect();

        free.extend(derive_free_intervals(&day_events, &day_window, min_duration));
    }

    Ok(free)
}

/// Like [`compute_free_slots`], taking instants instead of dates.
///
/// Only the local calendar date (in the window's zone) of each bound matters;
/// time of day is ignored.
pub fn compute_free_slots_between(
    events: &[BusyEvent],
    range_start: DateTime<Utc>,
    range_end: DateTime<Utc>,
    config: &WorkWindow,
) -> Result<Vec<FreeInterval>> {
    let tz = config.timezone;
    compute_free_slots(
        events,
        range_start.with_timezone(&tz).date_naive(),
        range_end.with_timezone(&tz).date_naive(),
        config,
    )
}
