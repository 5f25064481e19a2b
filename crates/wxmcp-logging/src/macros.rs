//! Logging macros that take a [`Logger`](crate::Logger) handle.
//!
//! Each macro records `module_path!()` and `line!()` as the call site:
//!
//! ```ignore
//! use wxmcp_logging::{info, error};
//!
//! info!(logger, "Tool called: get_current_weather(city={})", city);
//! error!(logger, "Fetch failed: {}", err);
//! exception!(logger, &err, "Error fetching weather data");
//! ```

/// Logs at an explicit [`Severity`](crate::Severity).
#[macro_export]
macro_rules! log_at {
    ($logger:expr, $severity:expr, $($arg:tt)+) => {
        $logger.log(
            $severity,
            $crate::CallSite::new(module_path!(), line!()),
            format_args!($($arg)+),
        )
    };
}

/// Logs at DEBUG.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log_at!($logger, $crate::Severity::Debug, $($arg)+)
    };
}

/// Logs at INFO.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log_at!($logger, $crate::Severity::Info, $($arg)+)
    };
}

/// Logs at WARNING.
#[macro_export]
macro_rules! warning {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log_at!($logger, $crate::Severity::Warning, $($arg)+)
    };
}

/// Logs at ERROR.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log_at!($logger, $crate::Severity::Error, $($arg)+)
    };
}

/// Logs at CRITICAL.
#[macro_export]
macro_rules! critical {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log_at!($logger, $crate::Severity::Critical, $($arg)+)
    };
}

/// Logs at ERROR with the error and its source chain appended.
///
/// The message reads `<message>: <err> (caused by: <source>)...`.
#[macro_export]
macro_rules! exception {
    ($logger:expr, $err:expr, $($arg:tt)+) => {
        $logger.exception(
            $crate::CallSite::new(module_path!(), line!()),
            format_args!($($arg)+),
            $err,
        )
    };
}
