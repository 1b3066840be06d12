//! # freetime-engine
//!
//! Deterministic free/busy interval engine for scheduling assistants.
//!
//! Given the busy events of one or more participants and a daily working window,
//! the engine derives each participant's free intervals and the intervals where
//! everyone is free at once. The results are the facts a language model needs
//! when it drafts a scheduling reply, and it cannot reliably compute them by
//! inference.
//!
//! Every operation is a pure function of its inputs: no I/O, no logging, no
//! retained state.
//!
//! ## Modules
//!
//! - [`interval`] — `TimeInterval` / `FreeInterval` and overlap primitives
//! - [`config`] — `WorkWindow` (daily hours, minimum duration, weekend rule, zone)
//! - [`event`] — `BusyEvent`, the engine's input
//! - [`day`] — Free intervals within a single day's window
//! - [`slots`] — Multi-day driver over a date range
//! - [`intersect`] — Common free intervals across N participants
//! - [`schedule`] — Per-participant pipeline feeding the intersector
//! - [`source`] — Calendar provider event model and the `CalendarSource` seam
//! - [`handoff`] — Stateless request model for the language-model responder
//! - [`render`] — Human-readable slot listings
//! - [`error`] — Error types

pub mod config;
pub mod day;
pub mod error;
pub mod event;
pub mod handoff;
pub mod intersect;
pub mod interval;
pub mod render;
pub mod schedule;
pub mod slots;
pub mod source;

pub use config::WorkWindow;
pub use day::derive_free_intervals;
pub use error::FreeTimeError;
pub use event::BusyEvent;
pub use intersect::intersect_free_slots;
pub use interval::{FreeInterval, TimeInterval};
pub use schedule::{
    common_free_slots, fetch_participants, CommonAvailability, Participant, ParticipantSlots,
};
pub use slots::{compute_free_slots, compute_free_slots_between};
