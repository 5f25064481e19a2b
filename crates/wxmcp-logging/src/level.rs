//! Severity levels.

use std::fmt;
use std::str::FromStr;

use crate::LogError;

/// Record severity, ordered from most verbose to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(u8)]
pub enum Severity {
    /// Diagnostic detail.
    Debug = 10,
    /// Normal operation.
    #[default]
    Info = 20,
    /// Something unexpected that the process recovered from.
    Warning = 30,
    /// An operation failed.
    Error = 40,
    /// The process cannot continue.
    Critical = 50,
}

impl Severity {
    /// All severities, most verbose first.
    pub const ALL: [Severity; 5] = [
        Severity::Debug,
        Severity::Info,
        Severity::Warning,
        Severity::Error,
        Severity::Critical,
    ];

    /// Parses a level name, falling back to [`Severity::Info`].
    ///
    /// Matching is case-insensitive. `WARN` and `FATAL` are accepted as
    /// aliases for `WARNING` and `CRITICAL`.
    pub fn parse_lenient(level: &str) -> Severity {
        Self::lookup(level).unwrap_or(Severity::Info)
    }

    /// Upper-case name used in formatted records.
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
            Severity::Critical => "CRITICAL",
        }
    }

    pub(crate) fn from_u8(value: u8) -> Severity {
        match value {
            0..=10 => Severity::Debug,
            11..=20 => Severity::Info,
            21..=30 => Severity::Warning,
            31..=40 => Severity::Error,
            _ => Severity::Critical,
        }
    }

    fn lookup(level: &str) -> Option<Severity> {
        match level.trim().to_ascii_uppercase().as_str() {
            "DEBUG" => Some(Severity::Debug),
            "INFO" => Some(Severity::Info),
            "WARNING" | "WARN" => Some(Severity::Warning),
            "ERROR" => Some(Severity::Error),
            "CRITICAL" | "FATAL" => Some(Severity::Critical),
            _ => None,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::lookup(s).ok_or_else(|| LogError::UnknownLevel(s.to_string()))
    }
}

impl From<log::Level> for Severity {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Trace | log::Level::Debug => Severity::Debug,
            log::Level::Info => Severity::Info,
            log::Level::Warn => Severity::Warning,
            log::Level::Error => Severity::Error,
        }
    }
}
