//! Calendar provider event model and the calendar-source seam.
//!
//! The network client lives outside this crate. What lives here is the mapping
//! from the provider's event JSON (`summary`, `start.dateTime` / `start.date`,
//! ...) to [`BusyEvent`]s, and the trait the client implements.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::Deserialize;
use thiserror::Error;

use crate::config::resolve_local;
use crate::error::{FreeTimeError, Result};
use crate::event::BusyEvent;
use crate::interval::TimeInterval;

/// Title used for events without a summary.
pub const UNTITLED: &str = "(untitled)";

/// Failure to obtain a participant's events.
///
/// A fetch failure is never "no events": propagate it instead of substituting an
/// empty list, which would make the participant look entirely free.
#[derive(Error, Debug)]
pub enum SourceError {
    /// Missing or expired credentials; the user has to sign in again.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Transport error: {0}")]
    Transport(String),
}

/// Supplies busy events for a participant over an inclusive date range.
pub trait CalendarSource {
    fn fetch(
        &self,
        participant: &str,
        range_start: NaiveDate,
        range_end: NaiveDate,
    ) -> std::result::Result<Vec<BusyEvent>, SourceError>;
}

/// `start` / `end` of a provider event: timed events carry `dateTime`, all-day
/// events carry a bare `date`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderDateTime {
    pub date_time: Option<DateTime<chrono::FixedOffset>>,
    pub date: Option<NaiveDate>,
}

/// A single event as returned by the calendar provider.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderEvent {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    pub start: ProviderDateTime,
    pub end: ProviderDateTime,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ProviderPayload {
    Envelope {
        #[serde(default)]
        items: Vec<ProviderEvent>,
    },
    Bare(Vec<ProviderEvent>),
}

impl ProviderDateTime {
    fn resolve(&self, tz: &Tz, which: &str, id: &str) -> Result<DateTime<Utc>> {
        if let Some(dt) = self.date_time {
            return Ok(dt.with_timezone(&Utc));
        }
        let date = self.date.ok_or_else(|| {
            FreeTimeError::InvalidEvent(format!("event '{}' has no {} date or dateTime", id, which))
        })?;
        // All-day boundaries are local midnight in the configured zone.
        date.and_hms_opt(0, 0, 0)
            .and_then(|midnight| resolve_local(tz, midnight))
            .ok_or_else(|| {
                FreeTimeError::InvalidEvent(format!(
                    "event '{}': midnight of {} does not exist in {}",
                    id, date, tz
                ))
            })
    }
}

impl ProviderEvent {
    pub fn is_all_day(&self) -> bool {
        self.start.date_time.is_none()
    }

    /// Map to a [`BusyEvent`], interpreting all-day dates in `tz`.
    ///
    /// # Errors
    /// - `FreeTimeError::InvalidEvent` if a bound has neither `dateTime` nor `date`.
    /// - `FreeTimeError::InvalidInterval` if the event ends at or before its start.
    pub fn into_busy_event(self, tz: &Tz) -> Result<BusyEvent> {
        let id = self.id.as_deref().unwrap_or("?");
        let start = self.start.resolve(tz, "start", id)?;
        let end = self.end.resolve(tz, "end", id)?;
        let interval = TimeInterval::new(start, end)?;
        let is_all_day = self.is_all_day();

        Ok(BusyEvent {
            title: self.summary.unwrap_or_else(|| UNTITLED.to_string()),
            interval,
            is_all_day,
        })
    }
}

/// Parse provider event JSON into busy events.
///
/// Accepts either a bare array of events or the provider's list envelope
/// `{ "items": [...] }`; an envelope without `items` holds no events.
pub fn parse_provider_events(json: &str, tz: &Tz) -> Result<Vec<BusyEvent>> {
    let events = match serde_json::from_str::<ProviderPayload>(json)? {
        ProviderPayload::Envelope { items } => items,
        ProviderPayload::Bare(items) => items,
    };

    events.into_iter().map(|e| e.into_busy_event(tz)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKYO: Tz = chrono_tz::Asia::Tokyo;

    #[test]
    fn timed_event_keeps_offset_instant() {
        let json = r#"[{"id":"e1","summary":"Weekly sync",
            "start":{"dateTime":"2025-05-15T10:00:00+09:00"},
            "end":{"dateTime":"2025-05-15T11:00:00+09:00"}}]"#;
        let events = parse_provider_events(json, &TOKYO).unwrap();

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title, "Weekly sync");
        assert!(!events[0].is_all_day);
        assert_eq!(events[0].interval.start().to_rfc3339(), "2025-05-15T01:00:00+00:00");
    }

    #[test]
    fn date_only_event_is_all_day_at_local_midnight() {
        let json = r#"{"items":[{"id":"h","start":{"date":"2025-05-15"},"end":{"date":"2025-05-16"}}]}"#;
        let events = parse_provider_events(json, &TOKYO).unwrap();

        assert!(events[0].is_all_day);
        assert_eq!(events[0].title, UNTITLED);
        assert_eq!(events[0].interval.start().to_rfc3339(), "2025-05-14T15:00:00+00:00");
        assert_eq!(events[0].interval.duration_minutes(), 24 * 60);
    }

    #[test]
    fn envelope_without_items_is_empty() {
        assert!(parse_provider_events(r#"{"kind":"calendar#events"}"#, &TOKYO)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn missing_bounds_and_inverted_events_are_rejected() {
        let no_start = r#"[{"id":"x","start":{},"end":{"date":"2025-05-16"}}]"#;
        assert!(matches!(
            parse_provider_events(no_start, &TOKYO),
            Err(FreeTimeError::InvalidEvent(_))
        ));

        let inverted = r#"[{"start":{"dateTime":"2025-05-15T11:00:00Z"},"end":{"dateTime":"2025-05-15T10:00:00Z"}}]"#;
        assert!(matches!(
            parse_provider_events(inverted, &TOKYO),
            Err(FreeTimeError::InvalidInterval { .. })
        ));
    }

    #[test]
    fn malformed_json_is_a_json_error() {
        assert!(matches!(
            parse_provider_events("not json", &TOKYO),
            Err(FreeTimeError::Json(_))
        ));
    }
}
