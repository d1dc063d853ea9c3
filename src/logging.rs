//! Tracing setup.
//!
//! stdout carries the tool protocol, so logs never go there. Without a
//! logging directory they are written to stderr; with one they go to a daily
//! rolling file, and errors are duplicated into a separate daily error file.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::Level;
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{InitError, RollingFileAppender, Rotation},
};
use tracing_subscriber::{EnvFilter, fmt, fmt::writer::MakeWriterExt};

const DEFAULT_FILTER: &str = "spotify_mcp=info,warn";
const LOG_FILE_PREFIX: &str = "spotify_mcp";
const ERROR_FILE_PREFIX: &str = "spotify_mcp_errors";

/// Keeps the non-blocking file writers flushing until dropped.
pub struct LoggingGuard {
    _guards: Vec<WorkerGuard>,
}

pub fn init_logging(log_dir: Option<&Path>) -> Result<LoggingGuard, LoggingError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let Some(dir) = log_dir else {
        fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(LoggingError::SubscriberInstall)?;
        return Ok(LoggingGuard {
            _guards: Vec::new(),
        });
    };

    std::fs::create_dir_all(dir).map_err(|source| LoggingError::CreateDirectory {
        path: dir.to_path_buf(),
        source,
    })?;

    let (all, all_guard) = tracing_appender::non_blocking(daily(dir, LOG_FILE_PREFIX)?);
    let (errors, errors_guard) = tracing_appender::non_blocking(daily(dir, ERROR_FILE_PREFIX)?);

    fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(all.and(errors.with_max_level(Level::ERROR)))
        .try_init()
        .map_err(LoggingError::SubscriberInstall)?;

    tracing::info!(dir = %dir.display(), "file logging initialized");

    Ok(LoggingGuard {
        _guards: vec![all_guard, errors_guard],
    })
}

fn daily(dir: &Path, prefix: &str) -> Result<RollingFileAppender, LoggingError> {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(prefix)
        .filename_suffix("log")
        .build(dir)
        .map_err(LoggingError::Appender)
}

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("failed to create log directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to create log file appender: {0}")]
    Appender(InitError),
    #[error("failed to install tracing subscriber: {0}")]
    SubscriberInstall(Box<dyn std::error::Error + Send + Sync>),
}
