//! Record rendering for the file and console sinks.

use std::fmt;

use chrono::{DateTime, Local};

use crate::Severity;

/// Where a record was emitted from.
///
/// `function` is the module path of the call site when it is known (the
/// logging macros and the `log` bridge), otherwise the source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSite<'a> {
    /// Module path or source file of the call site.
    pub function: &'a str,
    /// Line number of the call site.
    pub line: u32,
}

impl<'a> CallSite<'a> {
    /// Creates a call site.
    #[must_use]
    pub const fn new(function: &'a str, line: u32) -> Self {
        Self { function, line }
    }
}

/// A single log record, rendered once per sink.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    logger: &'a str,
    severity: Severity,
    call_site: CallSite<'a>,
    args: fmt::Arguments<'a>,
    time: DateTime<Local>,
}

impl<'a> Record<'a> {
    /// Creates a record stamped with the current local time.
    pub fn new(
        logger: &'a str,
        severity: Severity,
        call_site: CallSite<'a>,
        args: fmt::Arguments<'a>,
    ) -> Self {
        Self {
            logger,
            severity,
            call_site,
            args,
            time: Local::now(),
        }
    }

    /// Overrides the timestamp.
    #[must_use]
    pub fn with_time(mut self, time: DateTime<Local>) -> Self {
        self.time = time;
        self
    }

    /// Name of the logger that produced the record.
    pub fn logger(&self) -> &'a str {
        self.logger
    }

    /// Record severity.
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Call site of the record.
    pub fn call_site(&self) -> CallSite<'a> {
        self.call_site
    }
}

/// Line layout used by a sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFormat {
    /// `YYYY-MM-DD HH:MM:SS - name - LEVEL - function:line - message`
    Detailed,
    /// `HH:MM:SS - LEVEL - message`
    Console,
}

impl RecordFormat {
    /// Renders a record as a single line without the trailing newline.
    pub fn render(self, record: &Record<'_>) -> String {
        match self {
            RecordFormat::Detailed => format!(
                "{} - {} - {} - {}:{} - {}",
                record.time.format("%Y-%m-%d %H:%M:%S"),
                record.logger,
                record.severity,
                record.call_site.function,
                record.call_site.line,
                record.args
            ),
            RecordFormat::Console => format!(
                "{} - {} - {}",
                record.time.format("%H:%M:%S"),
                record.severity,
                record.args
            ),
        }
    }
}
