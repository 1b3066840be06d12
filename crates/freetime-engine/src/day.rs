//! Free intervals within a single day's working window.
//!
//! Clips busy events to the window, sorts them, then sweeps a cursor from the
//! window start emitting the gaps. Overlapping and adjacent events collapse
//! naturally because the cursor only ever moves forward.

use chrono::Duration;

use crate::event::BusyEvent;
use crate::interval::{FreeInterval, TimeInterval};

/// Clip each event to `day_window` and sort by `(start, end)`.
///
/// Events entirely outside the window are dropped. An all-day event that
/// overlaps the window stands in for the whole of it.
fn clipped_busy_periods(day_events: &[BusyEvent], day_window: &TimeInterval) -> Vec<TimeInterval> {
    let mut periods: Vec<TimeInterval> = day_events
        .iter()
        .filter_map(|e| {
            if e.is_all_day {
                e.interval.overlaps(day_window).then_some(*day_window)
            } else {
                e.interval.clip_to(day_window)
            }
        })
        .collect();

    periods.sort();
    periods
}

/// Derive the free intervals of one day.
///
/// `day_events` need not be sorted or disjoint. They are expected to belong to
/// the day of `day_window`; anything not overlapping it contributes nothing.
/// `min_duration` must be positive. Only gaps of at least `min_duration` are
/// returned, ordered by start and pairwise non-overlapping. An empty day yields
/// the whole window, a fully booked day yields nothing.
pub fn derive_free_intervals(
    day_events: &[BusyEvent],
    day_window: &TimeInterval,
    min_duration: Duration,
) -> Vec<FreeInterval> {
    let busy = clipped_busy_periods(day_events, day_window);

    let mut gaps = Vec::new();
    let mut cursor = day_window.start();

    for period in &busy {
        if cursor < period.start() {
            gaps.extend(TimeInterval::new(cursor, period.start()).ok());
        }
        cursor = cursor.max(period.end());
    }

    // Trailing gap after the last busy period.
    if cursor < day_window.end() {
        gaps.extend(TimeInterval::new(cursor, day_window.end()).ok());
    }

    gaps.into_iter()
        .map(FreeInterval::from)
        .filter(|slot| slot.meets(min_duration))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn at(hour: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 15, hour, min, 0).unwrap()
    }

    fn busy(sh: u32, sm: u32, eh: u32, em: u32) -> BusyEvent {
        BusyEvent::timed("busy", TimeInterval::new(at(sh, sm), at(eh, em)).unwrap())
    }

    fn window() -> TimeInterval {
        TimeInterval::new(at(9, 0), at(19, 0)).unwrap()
    }

    #[test]
    fn unsorted_input_is_handled() {
        let events = vec![busy(15, 0, 16, 0), busy(10, 0, 11, 0)];
        let slots = derive_free_intervals(&events, &window(), Duration::minutes(30));

        let starts: Vec<_> = slots.iter().map(|s| s.start()).collect();
        assert_eq!(starts, vec![at(9, 0), at(11, 0), at(16, 0)]);
    }

    #[test]
    fn adjacent_events_leave_no_zero_length_gap() {
        let events = vec![busy(10, 0, 11, 0), busy(11, 0, 12, 0)];
        let slots = derive_free_intervals(&events, &window(), Duration::minutes(1));

        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].end(), at(10, 0));
        assert_eq!(slots[1].start(), at(12, 0));
    }

    #[test]
    fn nested_event_does_not_rewind_cursor() {
        // 10:00-14:00 contains 11:00-12:00; the gap must start at 14:00.
        let events = vec![busy(10, 0, 14, 0), busy(11, 0, 12, 0)];
        let slots = derive_free_intervals(&events, &window(), Duration::minutes(30));

        assert_eq!(slots.len(), 2);
        assert_eq!(slots[1].start(), at(14, 0));
    }

    #[test]
    fn all_day_event_blocks_window() {
        let all_day = BusyEvent::all_day(
            "holiday",
            TimeInterval::new(
                Utc.with_ymd_and_hms(2025, 5, 15, 0, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2025, 5, 16, 0, 0, 0).unwrap(),
            )
            .unwrap(),
        );
        let slots = derive_free_intervals(&[all_day], &window(), Duration::minutes(30));
        assert!(slots.is_empty());
    }

    #[test]
    fn all_day_event_on_another_date_is_ignored() {
        let next_week = BusyEvent::all_day(
            "holiday",
            TimeInterval::new(
                Utc.with_ymd_and_hms(2025, 5, 20, 0, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2025, 5, 21, 0, 0, 0).unwrap(),
            )
            .unwrap(),
        );
        let slots = derive_free_intervals(&[next_week], &window(), Duration::minutes(30));

        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].interval(), &window());
    }

    #[test]
    fn sub_threshold_gap_is_dropped() {
        // Gap 10:00-10:15 (15 min) is below 30.
        let events = vec![busy(9, 0, 10, 0), busy(10, 15, 19, 0)];
        let slots = derive_free_intervals(&events, &window(), Duration::minutes(30));
        assert!(slots.is_empty());
    }
}
