//! The process-wide logging facility.
//!
//! [`LogFacility::get`] is the only structural entry point. Every call runs
//! under one creation lock and moves the facility through:
//!
//! ```text
//! UNINITIALIZED --get--> ACTIVE(name, path, level) --get--> ACTIVE(...)
//! ```
//!
//! Reconfiguration applies, in order:
//!
//! | step | condition                   | rule                                          |
//! |------|-----------------------------|-----------------------------------------------|
//! | 1    | always                      | logger filter DEBUG, propagation off          |
//! | 2    | name changed                | move both sinks to the logger under new name  |
//! | 3    | always                      | create the log directory if missing           |
//! | 4    | no file sink                | open and attach one                           |
//! | 4    | file sink on same path      | reuse untouched                               |
//! | 4    | file sink on other path     | open new, swap in, close old                  |
//! | 5    | no console sink             | create one                                    |
//! | 5    | always                      | console threshold = requested level           |

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock, PoisonError, RwLock};

use log::{LevelFilter, Log, Metadata};
use serde::Deserialize;

use crate::logger::{LoggerRegistry, SinkSet};
use crate::sink::{absolute_path, lock};
use crate::{CallSite, ConsoleSink, ConsoleStream, FileSink, LogError, Logger, Severity};

/// Default logger name.
pub const DEFAULT_LOGGER_NAME: &str = "mcp_server";

/// Default log file path.
pub const DEFAULT_LOG_FILE: &str = "logs/mcp_server.log";

/// Default console level.
pub const DEFAULT_LEVEL: &str = "INFO";

/// `log` targets routed to the active logger: these crates and their modules.
///
/// Records from any other target (dependencies such as `reqwest` or `hyper`)
/// are not bridged.
pub const BRIDGED_TARGETS: &[&str] = &["wxmcp", "wxmcp_server", "wxmcp_logging"];

static GLOBAL: OnceLock<LogFacility> = OnceLock::new();

/// Arguments to [`LogFacility::get`] as a config record.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Logger name.
    pub name: String,
    /// Log file path.
    pub file: PathBuf,
    /// Console level name; unrecognized names mean INFO.
    pub level: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            name: DEFAULT_LOGGER_NAME.to_string(),
            file: PathBuf::from(DEFAULT_LOG_FILE),
            level: DEFAULT_LEVEL.to_string(),
        }
    }
}

#[derive(Debug)]
struct FacilityState {
    registry: LoggerRegistry,
    active: Option<Logger>,
}

/// Owner of the single logical logger and its file and console sinks.
#[derive(Debug)]
pub struct LogFacility {
    state: Mutex<FacilityState>,
    /// Copy of the active logger for the `log` bridge, so emission never
    /// waits on the creation lock.
    published: RwLock<Option<Logger>>,
    console: ConsoleStream,
}

impl Default for LogFacility {
    fn default() -> Self {
        Self::new()
    }
}

impl LogFacility {
    /// Creates a facility whose console sink writes to standard output.
    #[must_use]
    pub fn new() -> Self {
        Self::with_console(ConsoleStream::Stdout)
    }

    /// Creates a facility whose console sink writes to `console`.
    #[must_use]
    pub fn with_console(console: ConsoleStream) -> Self {
        Self {
            state: Mutex::new(FacilityState {
                registry: LoggerRegistry::new(),
                active: None,
            }),
            published: RwLock::new(None),
            console,
        }
    }

    /// The process-wide facility, created on first access.
    pub fn global() -> &'static LogFacility {
        GLOBAL.get_or_init(LogFacility::new)
    }

    /// Registers this facility as the `log` crate's logger.
    ///
    /// Only targets under [`BRIDGED_TARGETS`] are routed, at DEBUG and above.
    /// Records from `log` macros are dropped until the first
    /// [`get`](Self::get).
    pub fn install(&'static self) -> Result<(), log::SetLoggerError> {
        log::set_logger(self)?;
        log::set_max_level(LevelFilter::Debug);
        Ok(())
    }

    /// Creates the logger on first use, reconfigures it afterwards.
    ///
    /// `level` sets the console threshold; unrecognized names mean INFO.
    /// The file sink always accepts every severity.
    pub fn get(
        &self,
        name: &str,
        file_path: impl AsRef<Path>,
        level: &str,
    ) -> Result<Logger, LogError> {
        let file_path = file_path.as_ref();
        let level = Severity::parse_lenient(level);

        let mut state = lock(&self.state);
        match state.active.clone() {
            None => {
                let logger = self.create(&mut state, name, file_path, level)?;
                self.publish(&mut state, &logger);
                Ok(logger)
            }
            Some(current) => self.reconfigure(&mut state, current, name, file_path, level),
        }
    }

    /// [`get`](Self::get) with the values from `settings`.
    pub fn get_with(&self, settings: &LogSettings) -> Result<Logger, LogError> {
        self.get(&settings.name, &settings.file, &settings.level)
    }

    /// [`get`](Self::get) with the default name, path and level.
    pub fn get_default(&self) -> Result<Logger, LogError> {
        self.get_with(&LogSettings::default())
    }

    /// The active logger, if one has been created.
    pub fn active(&self) -> Option<Logger> {
        lock(&self.state).active.clone()
    }

    /// Looks up a logger by name in the facility's registry.
    pub fn logger(&self, name: &str) -> Option<Logger> {
        lock(&self.state).registry.get(name)
    }

    fn publish(&self, state: &mut FacilityState, logger: &Logger) {
        state.active = Some(logger.clone());
        *self
            .published
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(logger.clone());
    }

    fn create(
        &self,
        state: &mut FacilityState,
        name: &str,
        file_path: &Path,
        level: Severity,
    ) -> Result<Logger, LogError> {
        ensure_parent_dir(file_path)?;
        let file = Arc::new(FileSink::open(file_path)?);
        let console = Arc::new(ConsoleSink::new(self.console.clone(), level));

        let logger = state.registry.get_or_create(name);
        logger.set_level(Severity::Debug);
        logger.set_propagate(false);
        logger.attach_sinks(SinkSet {
            file: Some(file),
            console: Some(console),
        });
        Ok(logger)
    }

    fn reconfigure(
        &self,
        state: &mut FacilityState,
        current: Logger,
        name: &str,
        file_path: &Path,
        level: Severity,
    ) -> Result<Logger, LogError> {
        current.set_level(Severity::Debug);
        current.set_propagate(false);

        let logger = if current.name() == name {
            current
        } else {
            let target = state.registry.get_or_create(name);
            target.set_level(Severity::Debug);
            target.set_propagate(false);
            target.attach_sinks(current.take_sinks());
            self.publish(state, &target);
            target
        };

        ensure_parent_dir(file_path)?;
        self.reconcile_file_sink(&logger, file_path)?;
        self.reconcile_console_sink(&logger, level);
        Ok(logger)
    }

    fn reconcile_file_sink(&self, logger: &Logger, file_path: &Path) -> Result<(), LogError> {
        let requested = absolute_path(file_path)?;
        let bound = logger.sinks().file.as_ref().map(|sink| sink.path().to_path_buf());
        if bound.as_deref() == Some(requested.as_path()) {
            return Ok(());
        }

        let fresh = Arc::new(FileSink::open(&requested)?);
        let displaced = logger.sinks_mut().file.replace(fresh);
        if let Some(old) = displaced {
            let _ = old.close();
        }
        Ok(())
    }

    fn reconcile_console_sink(&self, logger: &Logger, level: Severity) {
        let mut sinks = logger.sinks_mut();
        match &sinks.console {
            Some(console) => console.set_threshold(level),
            None => {
                sinks.console = Some(Arc::new(ConsoleSink::new(self.console.clone(), level)));
            }
        }
    }

    fn published(&self) -> Option<Logger> {
        self.published
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Returns true if `target` is one of [`BRIDGED_TARGETS`] or a module below one.
fn is_bridged_target(target: &str) -> bool {
    BRIDGED_TARGETS.iter().any(|krate| {
        target
            .strip_prefix(krate)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
    })
}

fn ensure_parent_dir(file_path: &Path) -> Result<(), LogError> {
    match file_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => {
            fs::create_dir_all(dir).map_err(|source| LogError::CreateDir {
                path: dir.to_path_buf(),
                source,
            })
        }
        _ => Ok(()),
    }
}

impl Log for LogFacility {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        if metadata.level() > LevelFilter::Debug || !is_bridged_target(metadata.target()) {
            return false;
        }
        self.published()
            .is_some_and(|logger| logger.is_enabled_for(Severity::from(metadata.level())))
    }

    fn log(&self, record: &log::Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let Some(logger) = self.published() else {
            return;
        };
        let function = record.module_path().unwrap_or(record.target());
        logger.log(
            Severity::from(record.level()),
            CallSite::new(function, record.line().unwrap_or(0)),
            *record.args(),
        );
    }

    fn flush(&self) {
        if let Some(logger) = self.published() {
            logger.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::CaptureBuffer;

    #[test]
    fn settings_default_to_documented_values() {
        let settings = LogSettings::default();
        assert_eq!(settings.name, "mcp_server");
        assert_eq!(settings.file, PathBuf::from("logs/mcp_server.log"));
        assert_eq!(settings.level, "INFO");
    }

    #[test]
    fn global_is_a_singleton() {
        assert!(std::ptr::eq(LogFacility::global(), LogFacility::global()));
    }

    #[test]
    fn nothing_is_active_before_first_get() {
        let facility = LogFacility::with_console(ConsoleStream::Capture(CaptureBuffer::new()));
        assert!(facility.active().is_none());
        assert!(facility.logger(DEFAULT_LOGGER_NAME).is_none());
    }

    #[test]
    fn create_pins_filter_and_disables_propagation() {
        let dir = tempfile::tempdir().unwrap();
        let facility = LogFacility::with_console(ConsoleStream::Capture(CaptureBuffer::new()));
        let logger = facility
            .get("svc", dir.path().join("svc.log"), "ERROR")
            .unwrap();

        assert_eq!(logger.level(), Severity::Debug);
        assert!(!logger.propagates());
        assert_eq!(logger.console_level(), Some(Severity::Error));
        assert!(Logger::ptr_eq(&logger, &facility.active().unwrap()));
        assert!(Logger::ptr_eq(&logger, &facility.logger("svc").unwrap()));
    }

    #[test]
    fn failed_first_get_leaves_facility_uninitialized() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();

        let facility = LogFacility::with_console(ConsoleStream::Capture(CaptureBuffer::new()));
        let result = facility.get("svc", blocker.join("svc.log"), "INFO");
        assert!(matches!(result, Err(LogError::CreateDir { .. })));
        assert!(facility.active().is_none());
    }

    #[test]
    fn reconfigure_reattaches_missing_console_sink() {
        let dir = tempfile::tempdir().unwrap();
        let facility = LogFacility::with_console(ConsoleStream::Capture(CaptureBuffer::new()));
        let path = dir.path().join("svc.log");
        let logger = facility.get("svc", &path, "INFO").unwrap();

        logger.sinks_mut().console = None;
        assert_eq!(logger.sink_count(), 1);

        let logger = facility.get("svc", &path, "WARNING").unwrap();
        assert_eq!(logger.sink_count(), 2);
        assert_eq!(logger.console_level(), Some(Severity::Warning));
    }

    #[test]
    fn reconfigure_reattaches_missing_file_sink() {
        let dir = tempfile::tempdir().unwrap();
        let facility = LogFacility::with_console(ConsoleStream::Capture(CaptureBuffer::new()));
        let path = dir.path().join("svc.log");
        let logger = facility.get("svc", &path, "INFO").unwrap();

        let removed = logger.sinks_mut().file.take().unwrap();
        let _ = removed.close();

        let logger = facility.get("svc", &path, "INFO").unwrap();
        assert_eq!(logger.sink_count(), 2);
        assert_eq!(logger.file_path(), Some(std::path::absolute(&path).unwrap()));
    }

    #[test]
    fn bridged_targets_match_whole_crate_segments() {
        assert!(is_bridged_target("wxmcp"));
        assert!(is_bridged_target("wxmcp::router"));
        assert!(is_bridged_target("wxmcp_server::tools"));
        assert!(!is_bridged_target("wxmcp_serverless"));
        assert!(!is_bridged_target("reqwest::connect"));
        assert!(!is_bridged_target(""));
    }
}
