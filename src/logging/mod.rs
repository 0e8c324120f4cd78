//! Tracing subscriber initialization.
//!
//! Logs go to a file so stdout stays reserved for the outgoing renderer messages.
//! Follow them with `tail -f` in a separate terminal.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "info";

/// Error type for logging initialization failures.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// Failed to create log directory
    #[error("Failed to create log directory at {path:?}: {source}")]
    DirectoryCreation {
        /// The directory path that failed to be created
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Invalid log file path (no UTF-8 filename component)
    #[error("Invalid log file path: {0:?}")]
    InvalidPath(PathBuf),

    /// Tracing subscriber already initialized
    #[error("Tracing subscriber already initialized")]
    SubscriberAlreadySet,
}

/// Where the appender writes: a directory that exists and a file name inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogTarget {
    /// Directory holding the log file.
    pub directory: PathBuf,
    /// File name within `directory`.
    pub file_name: String,
}

/// Split `log_path` into directory and file name, creating the directory.
///
/// A bare file name logs to the current directory.
///
/// # Errors
///
/// Returns `LoggingError::InvalidPath` when the path has no UTF-8 file name and
/// `LoggingError::DirectoryCreation` when the directory cannot be created.
pub fn prepare_log_target(log_path: &Path) -> Result<LogTarget, LoggingError> {
    let file_name = log_path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| LoggingError::InvalidPath(log_path.to_path_buf()))?
        .to_string();

    let directory = match log_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    std::fs::create_dir_all(&directory).map_err(|source| LoggingError::DirectoryCreation {
        path: directory.clone(),
        source,
    })?;

    Ok(LogTarget {
        directory,
        file_name,
    })
}

/// `RUST_LOG` if it parses, otherwise [`DEFAULT_FILTER`].
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global tracing subscriber, writing to `log_path` without ANSI colors.
///
/// # Errors
///
/// Fails if the log directory cannot be prepared or a global subscriber is already
/// installed.
pub fn init(log_path: &Path) -> Result<(), LoggingError> {
    let target = prepare_log_target(log_path)?;
    let file_appender = tracing_appender::rolling::never(&target.directory, &target.file_name);

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(file_appender)
        .with_ansi(false)
        .try_init()
        .map_err(|_| LoggingError::SubscriberAlreadySet)
}

#[cfg(test)]
#[path = "logging_tests.rs"]
mod tests;
