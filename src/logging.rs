//! Tracing setup.
//!
//! The TUI owns the terminal, so in that mode events go to a daily-rolling file only.
//! Text and JSON modes log to stderr, keeping stdout clean for their output.

use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub fn log_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("tribe-points").join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"))
}

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// File-only logging for TUI mode. Keep the guard alive until exit so buffered lines flush.
pub fn init_tui() -> Option<WorkerGuard> {
    let dir = log_dir();
    if let Err(e) = std::fs::create_dir_all(&dir) {
        eprintln!("Failed to create log directory {}: {e}", dir.display());
        return None;
    }

    let file_appender = tracing_appender::rolling::daily(&dir, "tribe-points.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true);

    if tracing_subscriber::registry()
        .with(env_filter("info"))
        .with(file_layer)
        .try_init()
        .is_err()
    {
        return None;
    }
    tracing::info!(dir = %dir.display(), "logging initialized");
    Some(guard)
}

/// Stderr logging for non-interactive modes.
pub fn init_stderr() {
    let _ = tracing_subscriber::registry()
        .with(env_filter("warn"))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();
}
