//! WASM bindings for freetime-engine.
//!
//! Exposes free-slot computation, multi-participant intersection, and per-day
//! derivation to JavaScript via `wasm-bindgen`. All complex types are passed as
//! JSON strings.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p freetime-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir web/pkg/ \
//!   target/wasm32-unknown-unknown/release/freetime_wasm.wasm
//! ```

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;
use freetime_engine::{BusyEvent, FreeInterval, TimeInterval, WorkWindow};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Serde-friendly DTOs for crossing the WASM boundary as JSON
// ---------------------------------------------------------------------------

/// Input format for events passed from JavaScript.
///
/// All-day events may give their bounds as bare `YYYY-MM-DD` dates, which are
/// read as local midnight. A datetime bound is taken as the exact instant, so
/// an all-day event spelled with UTC midnights in a non-UTC zone touches two
/// local dates.
#[derive(Deserialize)]
struct EventInput {
    #[serde(default)]
    title: String,
    start: String,
    end: String,
    #[serde(default, alias = "isAllDay")]
    is_all_day: bool,
}

// ---------------------------------------------------------------------------
// Parsing helpers (plain `String` errors so they are testable off-wasm)
// ---------------------------------------------------------------------------

/// Parse an ISO 8601 datetime string into `DateTime<Utc>`.
///
/// Accepts both RFC 3339 (with timezone offset, e.g., "2025-05-15T10:00:00+09:00")
/// and naive local time (e.g., "2025-05-15T01:00:00"), which is interpreted as UTC.
fn parse_datetime(s: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .map(|ndt| ndt.and_utc())
        .map_err(|e| format!("Invalid datetime '{}': {}", s, e))
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    s.parse::<NaiveDate>()
        .map_err(|e| format!("Invalid date '{}': {}", s, e))
}

/// An event bound: a datetime, or for all-day events a date at local midnight in `tz`.
fn parse_bound(s: &str, is_all_day: bool, tz: Tz) -> Result<DateTime<Utc>, String> {
    if is_all_day {
        if let Ok(date) = s.parse::<NaiveDate>() {
            let config = WorkWindow {
                timezone: tz,
                ..WorkWindow::default()
            };
            return config
                .calendar_day(date)
                .map(|day| day.start())
                .map_err(|e| e.to_string());
        }
    }
    parse_datetime(s)
}

fn parse_events_json(json: &str, tz: Tz) -> Result<Vec<BusyEvent>, String> {
    let inputs: Vec<EventInput> =
        serde_json::from_str(json).map_err(|e| format!("Invalid events JSON: {}", e))?;

    inputs
        .into_iter()
        .map(|input| {
            let start = parse_bound(&input.start, input.is_all_day, tz)?;
            let end = parse_bound(&input.end, input.is_all_day, tz)?;
            let interval = TimeInterval::new(start, end).map_err(|e| e.to_string())?;
            Ok(BusyEvent {
                title: input.title,
                interval,
                is_all_day: input.is_all_day,
            })
        })
        .collect()
}

fn min_duration(minutes: i64) -> Result<Duration, String> {
    if minutes <= 0 {
        return Err(format!(
            "Invalid configuration: min_duration_minutes must be positive, got {}",
            minutes
        ));
    }
    Ok(Duration::minutes(minutes))
}

/// Sort each participant's list and reject lists whose slots overlap; the
/// intersector relies on both.
fn normalize_free_lists(mut lists: Vec<Vec<FreeInterval>>) -> Result<Vec<Vec<FreeInterval>>, String> {
    for (idx, list) in lists.iter_mut().enumerate() {
        list.sort();
        if list.windows(2).any(|pair| pair[0].end() > pair[1].start()) {
            return Err(format!("Free slot list {} contains overlapping slots", idx));
        }
    }
    Ok(lists)
}

fn to_json(slots: &[FreeInterval]) -> Result<String, String> {
    serde_json::to_string(slots).map_err(|e| format!("Serialization error: {}", e))
}

fn compute_free_slots_json(
    events_json: &str,
    range_start: &str,
    range_end: &str,
    config_json: Option<&str>,
) -> Result<String, String> {
    let config: WorkWindow = match config_json {
        Some(json) => serde_json::from_str(json).map_err(|e| format!("Invalid config JSON: {}", e))?,
        None => WorkWindow::default(),
    };
    let events = parse_events_json(events_json, config.timezone)?;

    let slots = freetime_engine::compute_free_slots(
        &events,
        parse_date(range_start)?,
        parse_date(range_end)?,
        &config,
    )
    .map_err(|e| e.to_string())?;

    to_json(&slots)
}

fn intersect_free_slots_json(lists_json: &str, min_duration_minutes: i64) -> Result<String, String> {
    let min_duration = min_duration(min_duration_minutes)?;
    let lists: Vec<Vec<FreeInterval>> =
        serde_json::from_str(lists_json).map_err(|e| format!("Invalid free slot lists JSON: {}", e))?;
    let lists = normalize_free_lists(lists)?;

    let common = freetime_engine::intersect_free_slots(&lists, min_duration).map_err(|e| e.to_string())?;

    to_json(&common)
}

fn derive_free_intervals_json(
    events_json: &str,
    window_start: &str,
    window_end: &str,
    min_duration_minutes: i64,
) -> Result<String, String> {
    let min_duration = min_duration(min_duration_minutes)?;
    let events = parse_events_json(events_json, chrono_tz::UTC)?;
    let window = TimeInterval::new(parse_datetime(window_start)?, parse_datetime(window_end)?)
        .map_err(|e| e.to_string())?;

    let slots = freetime_engine::derive_free_intervals(&events, &window, min_duration);

    to_json(&slots)
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Free slots of one participant over an inclusive date range.
///
/// `events_json` is a JSON array of `{title, start, end, is_all_day}` objects.
/// All-day bounds should be `YYYY-MM-DD` dates or local-midnight datetimes in
/// the configured zone. `range_start` / `range_end` are `YYYY-MM-DD`. `config_json` is an optional
/// partial work window (`start_hour`, `end_hour`, `min_duration_minutes`,
/// `exclude_weekends`, `timezone`). Returns a JSON array of
/// `{start, end, duration_minutes}` objects.
#[wasm_bindgen(js_name = "computeFreeSlots")]
pub fn compute_free_slots(
    events_json: &str,
    range_start: &str,
    range_end: &str,
    config_json: Option<String>,
) -> Result<String, JsValue> {
    compute_free_slots_json(events_json, range_start, range_end, config_json.as_deref())
        .map_err(|e| JsValue::from_str(&e))
}

/// Intervals where every participant is free for at least `min_duration_minutes`.
///
/// `lists_json` is a JSON array with one array of `{start, end}` objects per
/// participant. Lists may arrive in any order but must not overlap themselves.
#[wasm_bindgen(js_name = "intersectFreeSlots")]
pub fn intersect_free_slots(lists_json: &str, min_duration_minutes: i64) -> Result<String, JsValue> {
    intersect_free_slots_json(lists_json, min_duration_minutes).map_err(|e| JsValue::from_str(&e))
}

/// Free intervals inside a single explicit window. Date-only all-day bounds
/// are read as UTC midnight.
#[wasm_bindgen(js_name = "deriveFreeIntervals")]
pub fn derive_free_intervals(
    events_json: &str,
    window_start: &str,
    window_end: &str,
    min_duration_minutes: i64,
) -> Result<String, JsValue> {
    derive_free_intervals_json(events_json, window_start, window_end, min_duration_minutes)
        .map_err(|e| JsValue::from_str(&e))
}
