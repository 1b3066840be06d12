//! Per-participant pipeline: compute every participant's free list, then fold
//! them into the common free time.

use std::thread;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::WorkWindow;
use crate::error::{FreeTimeError, Result};
use crate::event::BusyEvent;
use crate::intersect::intersect_free_slots;
use crate::interval::FreeInterval;
use crate::slots::compute_free_slots;
use crate::source::{CalendarSource, SourceError};

/// One person's busy events for the queried range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub name: String,
    pub events: Vec<BusyEvent>,
}

impl Participant {
    pub fn new(name: impl Into<String>, events: Vec<BusyEvent>) -> Self {
        Self {
            name: name.into(),
            events,
        }
    }
}

/// Fetch every named participant's events from `source`.
///
/// The first fetch failure aborts the whole query. A participant whose calendar
/// could not be read is never treated as free.
pub fn fetch_participants<S: CalendarSource + ?Sized>(
    source: &S,
    names: &[&str],
    range_start: NaiveDate,
    range_end: NaiveDate,
) -> std::result::Result<Vec<Participant>, SourceError> {
    names
        .iter()
        .map(|name| {
            source
                .fetch(name, range_start, range_end)
                .map(|events| Participant::new(*name, events))
        })
        .collect()
}

/// A participant's own free intervals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantSlots {
    pub name: String,
    pub free: Vec<FreeInterval>,
}

/// Individual and common availability over one query range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommonAvailability {
    /// Same order as the input participants.
    pub per_participant: Vec<ParticipantSlots>,
    /// Intervals where everybody is free for at least the minimum duration.
    pub common: Vec<FreeInterval>,
}

/// Compute each participant's free intervals and their intersection.
///
/// Participants only read their own events, so their lists are computed on
/// scoped threads; the fold that follows is sequential.
///
/// # Errors
/// - `FreeTimeError::EmptyParticipantSet` if `participants` is empty.
/// - `FreeTimeError::InvalidConfig` if `config` fails validation.
pub fn common_free_slots(
    participants: &[Participant],
    range_start: NaiveDate,
    range_end: NaiveDate,
    config: &WorkWindow,
) -> Result<CommonAvailability> {
    if participants.is_empty() {
        return Err(FreeTimeError::EmptyParticipantSet);
    }
    config.validate()?;

    let lists: Vec<Vec<FreeInterval>> = thread::scope(|scope| {
        let handles: Vec<_> = participants
            .iter()
            .map(|p| scope.spawn(move || compute_free_slots(&p.events, range_start, range_end, config)))
            .collect();

        handles
            .into_iter()
            .map(|h| h.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic)))
            .collect::<Result<Vec<_>>>()
    })?;

    let common = intersect_free_slots(&lists, config.min_duration())?;

    let per_participant = participants
        .iter()
        .zip(lists)
        .map(|(p, free)| ParticipantSlots {
            name: p.name.clone(),
            free,
        })
        .collect();

    Ok(CommonAvailability {
        per_participant,
        common,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interval::TimeInterval;
    use chrono::{TimeZone, Utc};

    /// Serves one fixed event to everybody except `expired`, whose token is gone.
    struct StubSource;

    impl CalendarSource for StubSource {
        fn fetch(
            &self,
            participant: &str,
            _range_start: NaiveDate,
            _range_end: NaiveDate,
        ) -> std::result::Result<Vec<BusyEvent>, SourceError> {
            if participant == "expired" {
                return Err(SourceError::Authentication("token expired".to_string()));
            }
            let interval = TimeInterval::new(
                Utc.with_ymd_and_hms(2025, 5, 15, 1, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2025, 5, 15, 2, 0, 0).unwrap(),
            )
            .unwrap();
            Ok(vec![BusyEvent::timed(format!("{}'s meeting", participant), interval)])
        }
    }

    fn thursday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 15).unwrap()
    }

    #[test]
    fn fetched_participants_feed_the_pipeline() {
        let participants = fetch_participants(&StubSource, &["kuroda", "kanta"], thursday(), thursday()).unwrap();
        assert_eq!(participants[1].name, "kanta");

        let result = common_free_slots(&participants, thursday(), thursday(), &WorkWindow::default()).unwrap();
        // 09:00-10:00 and 11:00-19:00 JST remain.
        assert_eq!(result.common.len(), 2);
    }

    #[test]
    fn fetch_failure_is_propagated_not_treated_as_free() {
        let result = fetch_participants(&StubSource, &["kuroda", "expired"], thursday(), thursday());
        assert!(matches!(result, Err(SourceError::Authentication(_))));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = WorkWindow {
            min_duration_minutes: -5,
            ..WorkWindow::default()
        };
        let participants = vec![Participant::new("solo", vec![])];
        let result = common_free_slots(&participants, thursday(), thursday(), &config);
        assert!(matches!(result, Err(FreeTimeError::InvalidConfig(_))));
    }
}
