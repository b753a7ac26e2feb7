//! File-backed tracing setup.
//!
//! Logging is disabled by default so the TUI is never corrupted by log
//! lines on stdout. Pass `--log-file` (or set `HOMEHERO_LOG`) to enable it.

use std::path::Path;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub fn init_tracing(log_file: Option<&Path>) {
    let path = match log_file {
        Some(path) => path.to_path_buf(),
        None => match std::env::var("HOMEHERO_LOG") {
            Ok(path) => path.into(),
            Err(_) => return,
        },
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let Ok(file) = std::fs::File::create(&path) else {
        eprintln!("Warning: failed to create log file: {}", path.display());
        return;
    };

    let file_layer = fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_target(true)
        .with_level(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .init();
}
