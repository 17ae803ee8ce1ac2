//! File logging.
//!
//! The terminal is owned by the renderer while a session runs, so every
//! `tracing` event goes to a plain-text log file instead. Level filtering
//! comes from `RUST_LOG` (default `info`).

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

pub const LOG_FILE: &str = "starpusher.log";

/// Install the global subscriber writing to `path` (appending).
/// Returns the I/O error if the file cannot be opened; the game still runs
/// without logging in that case.
pub fn init(path: &Path) -> std::io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .with_env_filter(filter)
        .try_init();
    Ok(())
}
