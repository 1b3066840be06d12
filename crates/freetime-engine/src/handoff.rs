//! Stateless hand-off to the language-model responder.
//!
//! Every request carries the full conversation history and the computed slots.
//! There is no session object accumulating state between calls, so a request
//! can be retried or replayed as-is.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::WorkWindow;
use crate::interval::FreeInterval;

/// Deterministic, serializable form of a slot list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotListing {
    /// True when the slots fall on more than one local calendar date.
    pub multi_day: bool,
    pub slots: Vec<FreeInterval>,
}

impl SlotListing {
    pub fn new(slots: Vec<FreeInterval>, config: &WorkWindow) -> Self {
        let dates: BTreeSet<_> = slots
            .iter()
            .map(|s| s.start().with_timezone(&config.timezone).date_naive())
            .collect();
        Self {
            multi_day: dates.len() > 1,
            slots,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// One stored message of the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

/// Everything the responder needs for one reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponderRequest {
    pub system_instruction: String,
    pub history: Vec<ChatTurn>,
    pub message: String,
    pub listing: SlotListing,
}

impl ResponderRequest {
    pub fn new(
        config: &WorkWindow,
        user_name: &str,
        now: DateTime<Utc>,
        history: Vec<ChatTurn>,
        message: impl Into<String>,
        slots: Vec<FreeInterval>,
    ) -> Self {
        Self {
            system_instruction: system_instruction(config, user_name, now),
            history,
            message: message.into(),
            listing: SlotListing::new(slots, config),
        }
    }
}

#[derive(Error, Debug)]
pub enum ResponderError {
    #[error("Responder unavailable: {0}")]
    Unavailable(String),

    #[error("Responder returned no text")]
    EmptyResponse,
}

/// Produces natural-language replies. Implemented outside this crate.
pub trait Responder {
    fn respond(&self, request: &ResponderRequest) -> Result<String, ResponderError>;
}

/// Render the rules the responder must follow when describing availability.
///
/// `now` is explicit so the instruction is reproducible.
pub fn system_instruction(config: &WorkWindow, user_name: &str, now: DateTime<Utc>) -> String {
    let local_now = now.with_timezone(&config.timezone);
    let weekend_rule = if config.exclude_weekends {
        "- Saturdays and Sundays are excluded unless the user explicitly asks to include them.\n"
    } else {
        "- Saturdays and Sundays are treated like any other day.\n"
    };

    format!(
        "You are an assistant specialized in schedule management and finding meeting times.\n\
         \n\
         Current time: {now} ({tz})\n\
         User: {user}\n\
         \n\
         Rules:\n\
         - Only the window {start:02}:00-{end:02}:00 ({tz}) is considered; time outside it is never proposed.\n\
         - Only continuous free spans of at least {min} minutes count as free time.\n\
         {weekend}\
         - Use only the free slots provided with the request; never invent events or slots.\n\
         - If no free slots are provided, say so plainly.\n\
         - Answer with a short bullet list that can be pasted into a chat as-is.\n",
        now = local_now.format("%A, %B %-d, %Y %H:%M"),
        tz = config.timezone,
        user = user_name,
        start = config.start_hour,
        end = config.end_hour,
        min = config.min_duration_minutes,
        weekend = weekend_rule,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn slot(day: u32, sh: u32, eh: u32) -> FreeInterval {
        FreeInterval::new(
            Utc.with_ymd_and_hms(2025, 5, day, sh, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 5, day, eh, 0, 0).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn multi_day_follows_local_dates() {
        let config = WorkWindow::default();
        // 02:00 and 05:00 UTC are both on May 15 in Tokyo.
        assert!(!SlotListing::new(vec![slot(15, 2, 3), slot(15, 5, 6)], &config).multi_day);
        assert!(SlotListing::new(vec![slot(15, 2, 3), slot(16, 2, 3)], &config).multi_day);
        assert!(!SlotListing::new(vec![], &config).multi_day);
    }

    #[test]
    fn instruction_reflects_window() {
        let config = WorkWindow {
            start_hour: 8,
            end_hour: 17,
            min_duration_minutes: 45,
            exclude_weekends: false,
            ..WorkWindow::default()
        };
        let now = Utc.with_ymd_and_hms(2025, 5, 15, 0, 0, 0).unwrap();
        let text = system_instruction(&config, "Kuroda", now);

        assert!(text.contains("08:00-17:00"));
        assert!(text.contains("at least 45 minutes"));
        assert!(text.contains("Thursday, May 15, 2025 09:00"));
        assert!(text.contains("like any other day"));
    }

    /// Answers from the request alone, the way a remote model call would.
    struct ListingResponder;

    impl Responder for ListingResponder {
        fn respond(&self, request: &ResponderRequest) -> Result<String, ResponderError> {
            if request.message.is_empty() {
                return Err(ResponderError::EmptyResponse);
            }
            Ok(format!(
                "{} slot(s) after {} turn(s)",
                request.listing.slots.len(),
                request.history.len()
            ))
        }
    }

    #[test]
    fn responder_sees_full_history_every_call() {
        let config = WorkWindow::default();
        let now = Utc.with_ymd_and_hms(2025, 5, 15, 0, 0, 0).unwrap();
        let history = vec![
            ChatTurn {
                role: ChatRole::User,
                content: "Free on Thursday?".to_string(),
            },
            ChatTurn {
                role: ChatRole::Assistant,
                content: "Yes, 11:00-13:00.".to_string(),
            },
        ];
        let request = ResponderRequest::new(&config, "me", now, history, "Friday?", vec![slot(16, 2, 4)]);

        // Same request, same answer: nothing is carried between calls.
        let first = ListingResponder.respond(&request).unwrap();
        let second = ListingResponder.respond(&request).unwrap();
        assert_eq!(first, "1 slot(s) after 2 turn(s)");
        assert_eq!(first, second);
    }

    #[test]
    fn request_roundtrips_through_json() {
        let config = WorkWindow::default();
        let now = Utc.with_ymd_and_hms(2025, 5, 15, 0, 0, 0).unwrap();
        let history = vec![ChatTurn {
            role: ChatRole::User,
            content: "When is everyone free?".to_string(),
        }];
        let request = ResponderRequest::new(&config, "me", now, history, "And tomorrow?", vec![slot(15, 2, 4)]);

        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains(r#""role":"user""#));
        let back: ResponderRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, request);
    }
}
