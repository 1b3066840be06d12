//! Tracing setup for the CLI.
//!
//! Logs go to stderr so stdout stays machine-readable. `RUST_LOG` overrides the
//! level chosen by `-v`.

use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn level_for(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    }
}

pub fn init(verbose: u8) {
    let level = level_for(verbose);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("freetime={}", level)));

    // try_init: a subscriber may already be installed (e.g. under a test harness).
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .try_init();
}
