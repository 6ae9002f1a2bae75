//! Logging configuration using tracing
//!
//! The terminal UI owns the screen, so interactive sessions log to a daily
//! rolling file. Headless runs print NDJSON on stdout and log to stderr.

use std::path::{Path, PathBuf};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::Result;

/// Environment variable controlling the log filter
pub const LOG_ENV_VAR: &str = "TFLENS_LOG";

const DEFAULT_FILTER: &str = "tflens=info,warn";
const LOG_FILE_NAME: &str = "tflens.log";
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Default log directory: `<data_local_dir>/tflens/logs`
pub fn log_directory() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tflens")
        .join("logs")
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Log to a daily rolling file under `log_dir`
///
/// # Examples
/// ```bash
/// TFLENS_LOG=debug tflens --run 3
/// TFLENS_LOG=tflens_app=trace tflens
/// ```
pub fn init(log_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, LOG_FILE_NAME);

    tracing_subscriber::registry()
        .with(env_filter())
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true)
                .with_timer(fmt::time::ChronoLocal::new(TIME_FORMAT.to_string())),
        )
        .init();

    tracing::info!("───────────────────────────────────────────────────────");
    tracing::info!("tflens starting (v{})", env!("CARGO_PKG_VERSION"));
    tracing::info!("Log directory: {}", log_dir.display());
    tracing::info!("───────────────────────────────────────────────────────");

    Ok(())
}

/// Log to stderr, keeping stdout free for headless output
pub fn init_stderr() {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_timer(fmt::time::ChronoLocal::new(TIME_FORMAT.to_string())),
        )
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_directory_is_app_scoped() {
        assert!(log_directory().ends_with("tflens/logs"));
    }

    #[test]
    fn test_default_filter_parses() {
        assert!(EnvFilter::try_new(DEFAULT_FILTER).is_ok());
    }
}
