//! Log timestamps carrying both the wall clock and the game clock

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use time::macros::format_description;
use time::{format_description::FormatItem, OffsetDateTime};
use tracing::subscriber::SetGlobalDefaultError;
use tracing_error::ErrorLayer;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::EnvFilter;

/// Last published game clock, in milliseconds
static GAME_CLOCK_MS: AtomicU64 = AtomicU64::new(0);

const TIMESTAMP_FORMAT: &[FormatItem<'static>] = format_description!("[hour]:[minute]:[second].[subsecond digits:5]");

/// Timer for the fmt layer: `HH:MM:SS.sssss     1234ms`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GameClockTime;

impl FormatTime for GameClockTime {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        let wall = OffsetDateTime::now_utc().format(&TIMESTAMP_FORMAT).map_err(|_| fmt::Error)?;
        write!(w, "{} {:>8}ms", wall, game_clock_ms())
    }
}

/// Publish the game clock so log lines can be correlated with gameplay time
///
/// Called once per tick after the clock advances.
pub fn set_game_clock(now_ms: u64) {
    GAME_CLOCK_MS.store(now_ms, Ordering::Relaxed);
}

/// Get the last published game clock, in milliseconds
pub fn game_clock_ms() -> u64 {
    GAME_CLOCK_MS.load(Ordering::Relaxed)
}

/// Installs the global subscriber: `RUST_LOG` filtering (default `info`), the game clock timer, and span traces for errors.
pub fn init_logging() -> Result<(), SetGlobalDefaultError> {
    let subscriber = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_timer(GameClockTime))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(ErrorLayer::default());

    tracing::subscriber::set_global_default(subscriber)
}
