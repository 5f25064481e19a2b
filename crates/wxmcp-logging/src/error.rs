//! Error types for the logging facility.

use std::io;
use std::path::PathBuf;

/// Errors returned when the facility cannot be configured.
///
/// Sink close failures are never reported; they are swallowed while the
/// replacement sink is attached.
#[derive(Debug)]
pub enum LogError {
    /// The log file's parent directory could not be created.
    CreateDir {
        /// Directory that failed to be created.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// The log file could not be opened for appending.
    OpenFile {
        /// File that failed to open.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// A severity name was not recognized by a strict parse.
    UnknownLevel(String),
}

impl std::fmt::Display for LogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogError::CreateDir { path, source } => {
                write!(f, "Failed to create log directory {}: {source}", path.display())
            }
            LogError::OpenFile { path, source } => {
                write!(f, "Failed to open log file {}: {source}", path.display())
            }
            LogError::UnknownLevel(level) => write!(f, "Unknown log level: {level}"),
        }
    }
}

impl std::error::Error for LogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LogError::CreateDir { source, .. } | LogError::OpenFile { source, .. } => Some(source),
            LogError::UnknownLevel(_) => None,
        }
    }
}
