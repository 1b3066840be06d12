//! `freetime` CLI — compute free time from calendar exports.
//!
//! ## Usage
//!
//! ```sh
//! # One participant's free slots for a week (JSON to stdout)
//! freetime slots --events me.json --from 2025-05-12 --to 2025-05-16
//!
//! # Common free time of several participants, as a readable list
//! freetime common --events kuroda.json --events kanta.json --from 2025-05-15 --format text
//!
//! # Custom window: 08:00-17:00 Zurich time, 45 minute minimum, weekends included
//! freetime common --events a.json --events b.json --from 2025-05-15 \
//!     --start-hour 8 --end-hour 17 --min-duration 45 --include-weekends --timezone Europe/Zurich
//!
//! # Window settings from a JSON file (flags still win)
//! freetime slots --events me.json --from 2025-05-15 --config window.json
//!
//! # Build the responder request for a chat message
//! freetime handoff --events a.json --events b.json --from 2025-05-15 --message "When can we meet?"
//! ```
//!
//! Event files hold the calendar provider's event list, either as a bare array or
//! wrapped in `{ "items": [...] }`.

mod logging;

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use clap::{Args, Parser, Subcommand, ValueEnum};
use freetime_engine::handoff::{ChatTurn, ResponderRequest};
use freetime_engine::render::{format_slot_list, DEFAULT_LIST_LIMIT};
use freetime_engine::source::parse_provider_events;
use freetime_engine::{common_free_slots, compute_free_slots, FreeInterval, Participant, WorkWindow};
use tracing::{debug, info};

#[derive(Parser)]
#[command(
    name = "freetime",
    version,
    about = "Find free and common meeting time in calendar exports"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Free slots of a single participant
    Slots {
        /// Calendar export of the participant
        #[arg(short, long)]
        events: String,
        #[command(flatten)]
        range: RangeArgs,
        #[command(flatten)]
        window: WindowArgs,
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
    },
    /// Slots where every participant is free
    Common {
        /// Calendar export per participant (repeat for each participant)
        #[arg(short, long, required = true)]
        events: Vec<String>,
        #[command(flatten)]
        range: RangeArgs,
        #[command(flatten)]
        window: WindowArgs,
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
    },
    /// Print the responder request for a chat message and the common free slots
    Handoff {
        /// Calendar export per participant (repeat for each participant)
        #[arg(short, long, required = true)]
        events: Vec<String>,
        #[command(flatten)]
        range: RangeArgs,
        #[command(flatten)]
        window: WindowArgs,
        /// The user's chat message
        #[arg(short, long)]
        message: String,
        /// JSON file with prior conversation turns
        #[arg(long)]
        history: Option<String>,
        /// Display name of the asking user
        #[arg(long, default_value = "me")]
        user: String,
        /// Current time as RFC 3339 (defaults to the system clock)
        #[arg(long)]
        now: Option<DateTime<Utc>>,
    },
}

#[derive(Args)]
struct RangeArgs {
    /// First date of the range (YYYY-MM-DD)
    #[arg(long)]
    from: NaiveDate,
    /// Last date of the range, inclusive (defaults to --from)
    #[arg(long)]
    to: Option<NaiveDate>,
}

impl RangeArgs {
    fn bounds(&self) -> (NaiveDate, NaiveDate) {
        (self.from, self.to.unwrap_or(self.from))
    }
}

#[derive(Args)]
struct WindowArgs {
    /// JSON file with work window settings
    #[arg(long)]
    config: Option<String>,
    /// First hour of the working window
    #[arg(long)]
    start_hour: Option<u32>,
    /// Hour the working window closes
    #[arg(long)]
    end_hour: Option<u32>,
    /// Minimum free slot length in minutes
    #[arg(long)]
    min_duration: Option<i64>,
    /// Consider Saturdays and Sundays too
    #[arg(long, conflicts_with = "exclude_weekends")]
    include_weekends: bool,
    /// Skip Saturdays and Sundays, even if the config file includes them
    #[arg(long)]
    exclude_weekends: bool,
    /// IANA timezone for dates and window hours (e.g., "Asia/Tokyo")
    #[arg(long)]
    timezone: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Text,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Commands::Slots {
            events,
            range,
            window,
            format,
        } => {
            let config = build_work_window(&window)?;
            let participant = load_participant(&events, &config.timezone)?;
            let (from, to) = range.bounds();

            let slots = compute_free_slots(&participant.events, from, to, &config)
                .context("Failed to compute free slots")?;
            info!(participant = %participant.name, slots = slots.len(), "computed free slots");

            print_slots(&slots, &config, format)?;
        }
        Commands::Common {
            events,
            range,
            window,
            format,
        } => {
            let config = build_work_window(&window)?;
            let participants = load_participants(&events, &config.timezone)?;
            let (from, to) = range.bounds();

            let result = common_free_slots(&participants, from, to, &config)
                .context("Failed to compute common free slots")?;
            info!(
                participants = participants.len(),
                slots = result.common.len(),
                "computed common free slots"
            );

            match format {
                Format::Json => println!("{}", serde_json::to_string_pretty(&result)?),
                Format::Text => print_slots(&result.common, &config, format)?,
            }
        }
        Commands::Handoff {
            events,
            range,
            window,
            message,
            history,
            user,
            now,
        } => {
            let config = build_work_window(&window)?;
            let participants = load_participants(&events, &config.timezone)?;
            let (from, to) = range.bounds();
            let history = match history {
                Some(path) => load_history(&path)?,
                None => Vec::new(),
            };

            let result = common_free_slots(&participants, from, to, &config)
                .context("Failed to compute common free slots")?;
            let request = ResponderRequest::new(
                &config,
                &user,
                now.unwrap_or_else(Utc::now),
                history,
                message,
                result.common,
            );

            println!("{}", serde_json::to_string_pretty(&request)?);
        }
    }

    Ok(())
}

/// Layer the work window: defaults, then the config file, then flags.
fn build_work_window(args: &WindowArgs) -> Result<WorkWindow> {
    let mut config = match &args.config {
        Some(path) => {
            let raw = read_file(path)?;
            serde_json::from_str(&raw).with_context(|| format!("Invalid work window config: {}", path))?
        }
        None => WorkWindow::default(),
    };

    if let Some(hour) = args.start_hour {
        config.start_hour = hour;
    }
    if let Some(hour) = args.end_hour {
        config.end_hour = hour;
    }
    if let Some(minutes) = args.min_duration {
        config.min_duration_minutes = minutes;
    }
    if args.include_weekends {
        config.exclude_weekends = false;
    }
    if args.exclude_weekends {
        config.exclude_weekends = true;
    }
    if let Some(name) = &args.timezone {
        config.timezone = name
            .parse::<Tz>()
            .map_err(|_| anyhow!("Unknown timezone: '{}'", name))?;
    }

    config.validate()?;
    debug!(?config, "work window");
    Ok(config)
}

fn load_participants(paths: &[String], tz: &Tz) -> Result<Vec<Participant>> {
    paths.iter().map(|p| load_participant(p, tz)).collect()
}

/// Read one participant's calendar export; the file stem becomes the name.
fn load_participant(path: &str, tz: &Tz) -> Result<Participant> {
    let raw = read_file(path)?;
    let events = parse_provider_events(&raw, tz)
        .with_context(|| format!("Failed to parse calendar events: {}", path))?;

    let name = Path::new(path)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string());
    debug!(participant = %name, events = events.len(), "loaded calendar");

    Ok(Participant::new(name, events))
}

fn load_history(path: &str) -> Result<Vec<ChatTurn>> {
    let raw = read_file(path)?;
    serde_json::from_str(&raw).with_context(|| format!("Invalid chat history: {}", path))
}

fn print_slots(slots: &[FreeInterval], config: &WorkWindow, format: Format) -> Result<()> {
    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(slots)?),
        Format::Text => println!("{}", format_slot_list(slots, &config.timezone, DEFAULT_LIST_LIMIT)),
    }
    Ok(())
}

fn read_file(path: &str) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
}
