//! Common free intervals across N participants.
//!
//! Folds the participants pairwise. Each fold is a two-pointer merge over two
//! sorted, non-overlapping lists, and the minimum-duration filter is re-applied
//! after every fold: intersection can only shrink an interval, so a slot that
//! falls below the threshold at one step can never recover later.

use chrono::Duration;

use crate::error::{FreeTimeError, Result};
use crate::interval::FreeInterval;

/// Intersect two sorted, non-overlapping free lists.
fn intersect_pair(a: &[FreeInterval], b: &[FreeInterval], min_duration: Duration) -> Vec<FreeInterval> {
    let mut common = Vec::new();
    let (mut i, mut j) = (0, 0);

    while i < a.len() && j < b.len() {
        if let Some(overlap) = a[i].interval().intersection(b[j].interval()) {
            let slot = FreeInterval::from(overlap);
            if slot.meets(min_duration) {
                common.push(slot);
            }
        }

        // Advance whichever interval finishes first; it cannot overlap anything
        // further along the other list.
        if a[i].end() <= b[j].end() {
            i += 1;
        } else {
            j += 1;
        }
    }

    common
}

/// Intervals where every participant is free for at least `min_duration`.
///
/// Each inner list must be sorted by start and non-overlapping, as produced by
/// [`compute_free_slots`](crate::slots::compute_free_slots). The result is in the
/// same form and does not depend on participant order. A single participant's
/// list is returned unchanged, without re-filtering.
///
/// # Errors
/// - `FreeTimeError::InvalidConfig` when `min_duration` is not positive.
/// - `FreeTimeError::EmptyParticipantSet` when `per_participant` is empty.
pub fn intersect_free_slots(
    per_participant: &[Vec<FreeInterval>],
    min_duration: Duration,
) -> Result<Vec<FreeInterval>> {
    if min_duration <= Duration::zero() {
        return Err(FreeTimeError::InvalidConfig(format!(
            "min_duration must be positive, got {} minutes",
            min_duration.num_minutes()
        )));
    }

    let (first, rest) = per_participant
        .split_first()
        .ok_or(FreeTimeError::EmptyParticipantSet)?;

    let mut common = first.clone();
    for other in rest {
        common = intersect_pair(&common, other, min_duration);
        if common.is_empty() {
            break;
        }
    }

    Ok(common)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn at(hour: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 15, hour, min, 0).unwrap()
    }

    fn slot(sh: u32, sm: u32, eh: u32, em: u32) -> FreeInterval {
        FreeInterval::new(at(sh, sm), at(eh, em)).unwrap()
    }

    #[test]
    fn one_wide_interval_against_many_small() {
        let a = vec![slot(9, 0, 19, 0)];
        let b = vec![slot(9, 0, 10, 0), slot(12, 0, 13, 0), slot(17, 0, 18, 0)];

        let common = intersect_pair(&a, &b, Duration::minutes(30));
        assert_eq!(common, b);
    }

    #[test]
    fn touching_intervals_produce_nothing() {
        let a = vec![slot(9, 0, 10, 0)];
        let b = vec![slot(10, 0, 11, 0)];
        assert!(intersect_pair(&a, &b, Duration::minutes(1)).is_empty());
    }

    #[test]
    fn empty_participant_set_is_an_error() {
        let result = intersect_free_slots(&[], Duration::minutes(30));
        assert!(matches!(result, Err(FreeTimeError::EmptyParticipantSet)));
    }

    #[test]
    fn non_positive_threshold_is_rejected() {
        let lists = vec![vec![slot(9, 0, 19, 0)]];
        for minutes in [0, -30] {
            let result = intersect_free_slots(&lists, Duration::minutes(minutes));
            assert!(matches!(result, Err(FreeTimeError::InvalidConfig(_))));
        }
    }

    #[test]
    fn participant_with_no_free_time_empties_result() {
        let lists = vec![vec![slot(9, 0, 19, 0)], vec![], vec![slot(9, 0, 19, 0)]];
        let common = intersect_free_slots(&lists, Duration::minutes(30)).unwrap();
        assert!(common.is_empty());
    }
}
