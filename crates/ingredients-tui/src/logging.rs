//! Tracing setup for the TUI.
//!
//! The terminal is in raw mode while playing, so events go to a file
//! instead of stderr. Without `--log-file` nothing is installed and the
//! core's events are dropped.

use std::fs::File;
use std::io;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install a subscriber that appends to `path`.
///
/// Reads `RUST_LOG`, defaulting to `info` so every puzzle's answer is logged.
///
/// # Example
/// ```bash
/// RUST_LOG=ingredients_core=debug ingredients --log-file ingredients.log
/// ```
pub fn init(path: &Path) -> io::Result<()> {
    let file = File::options().create(true).append(true).open(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .compact(),
        )
        .init();
    Ok(())
}
