//! Process-wide logging facility for wxmcp.
//!
//! This crate provides a single [`LogFacility`] that owns one named logical
//! logger with two sinks:
//!
//! - a **file sink** that always accepts every severity, formatted for
//!   postmortem diagnosis (timestamp, logger name, severity, call site)
//! - a **console sink** on standard output whose threshold follows the most
//!   recently requested level
//!
//! Calling [`LogFacility::get`] creates the logger on first use and
//! reconfigures it in place afterwards: the logger can be renamed, its file
//! moved and its console verbosity changed without ever ending up with
//! duplicate sinks or leaked file handles.
//!
//! # Usage
//!
//! ```ignore
//! use wxmcp_logging::{LogFacility, info};
//!
//! let logger = LogFacility::global().get("mcp_server", "logs/mcp_server.log", "INFO")?;
//! info!(logger, "Server started on port {}", 8000);
//! ```
//!
//! The facility also implements [`log::Log`], so `log` macros in the wxmcp
//! crates are routed to the active logger once [`LogFacility::install`] is
//! called. Records from other crates' targets are not.
//!
//! # Log Levels
//!
//! - **DEBUG**: request/response flow, internal state
//! - **INFO**: server lifecycle events, tool invocations
//! - **WARNING**: recoverable issues
//! - **ERROR**: failed operations, outbound fetch failures
//! - **CRITICAL**: the process cannot continue

#![forbid(unsafe_code)]

mod error;
mod facility;
mod format;
mod level;
mod logger;
mod macros;
mod sink;
pub mod testing;

pub use error::LogError;
pub use facility::{
    BRIDGED_TARGETS, DEFAULT_LEVEL, DEFAULT_LOG_FILE, DEFAULT_LOGGER_NAME, LogFacility, LogSettings,
};
pub use format::{CallSite, Record, RecordFormat};
pub use level::Severity;
pub use logger::Logger;
pub use sink::{ConsoleSink, ConsoleStream, FileSink};
