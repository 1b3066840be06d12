//! Human-readable slot listings.

use chrono_tz::Tz;

use crate::interval::FreeInterval;

/// How many slots a listing shows before summarizing the remainder.
pub const DEFAULT_LIST_LIMIT: usize = 10;

pub const NO_FREE_TIME: &str = "No free time found in the requested period.";

/// `Thu 05/15 11:00–13:00`, in local time of `tz`.
pub fn format_slot(slot: &FreeInterval, tz: &Tz) -> String {
    let start = slot.start().with_timezone(tz);
    let end = slot.end().with_timezone(tz);
    format!("{}–{}", start.format("%a %m/%d %H:%M"), end.format("%H:%M"))
}

/// Bullet list of at most `limit` slots, followed by a count of the rest.
pub fn format_slot_list(slots: &[FreeInterval], tz: &Tz, limit: usize) -> String {
    if slots.is_empty() {
        return NO_FREE_TIME.to_string();
    }

    let lines: Vec<String> = slots
        .iter()
        .take(limit)
        .map(|s| format!("- {}", format_slot(s, tz)))
        .collect();

    let mut message = format!("The following times are free:\n\n{}", lines.join("\n"));
    if slots.len() > limit {
        message.push_str(&format!("\n\n...and {} more", slots.len() - limit));
    }
    message
}
