//! File-based logging initialization

use super::config::LogConfig;
use crate::core::error::{AppError, Result};
use std::fs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Initialize the logging system
///
/// Sets up file-based logging with:
/// - Daily log rotation
/// - Non-blocking writes so store actions never wait on disk
/// - Optional stderr mirror
///
/// The returned guard flushes buffered lines when dropped; keep it alive for
/// the lifetime of the process.
pub fn init(config: &LogConfig) -> Result<WorkerGuard> {
    fs::create_dir_all(&config.log_dir).map_err(|e| {
        AppError::Config(format!(
            "Failed to create log directory {}: {}",
            config.log_dir.display(),
            e
        ))
    })?;

    let file_appender =
        tracing_appender::rolling::daily(&config.log_dir, super::config::LOG_FILE_NAME);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new(super::config::DEFAULT_LOG_LEVEL));

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false); // No ANSI codes in log files

    let stderr_layer = config
        .stderr
        .then(|| fmt::layer().with_writer(std::io::stderr).with_target(false).boxed());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .map_err(|e| AppError::Config(format!("Logging already initialized: {}", e)))?;

    tracing::info!(
        log_file = %config.log_file().display(),
        log_level = %config.log_level,
        stderr = config.stderr,
        "Logging initialized"
    );

    Ok(guard)
}
