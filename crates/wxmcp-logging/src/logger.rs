//! Logical loggers and the name registry.

use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::{CallSite, ConsoleSink, FileSink, Record, Severity};

const ROOT_LOGGER_NAME: &str = "root";

/// Sinks attached to a logical logger, tracked by role.
#[derive(Debug, Default)]
pub(crate) struct SinkSet {
    pub(crate) file: Option<Arc<FileSink>>,
    pub(crate) console: Option<Arc<ConsoleSink>>,
}

impl SinkSet {
    pub(crate) fn len(&self) -> usize {
        usize::from(self.file.is_some()) + usize::from(self.console.is_some())
    }
}

#[derive(Debug)]
struct LoggerCore {
    name: String,
    filter: AtomicU8,
    propagate: AtomicBool,
    parent: Option<Arc<LoggerCore>>,
    sinks: RwLock<SinkSet>,
}

impl LoggerCore {
    fn new(name: &str, parent: Option<Arc<LoggerCore>>) -> Self {
        Self {
            name: name.to_string(),
            filter: AtomicU8::new(Severity::Debug as u8),
            propagate: AtomicBool::new(true),
            parent,
            sinks: RwLock::new(SinkSet::default()),
        }
    }

    fn handle(&self, record: &Record<'_>) {
        {
            let sinks = self.sinks.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(file) = &sinks.file {
                file.emit(record);
            }
            if let Some(console) = &sinks.console {
                console.emit(record);
            }
        }

        if self.propagate.load(Ordering::Acquire) {
            if let Some(parent) = &self.parent {
                parent.handle(record);
            }
        }
    }
}

/// Handle to a named logical logger.
///
/// Cloning is cheap; all clones refer to the same logger. Emitting records
/// never takes the facility's creation lock.
#[derive(Debug, Clone)]
pub struct Logger {
    inner: Arc<LoggerCore>,
}

impl Logger {
    /// Logger name (its namespace).
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// The logger's own severity filter.
    pub fn level(&self) -> Severity {
        Severity::from_u8(self.inner.filter.load(Ordering::Acquire))
    }

    /// Whether records are forwarded to the parent logger.
    pub fn propagates(&self) -> bool {
        self.inner.propagate.load(Ordering::Acquire)
    }

    /// Number of sinks currently attached.
    pub fn sink_count(&self) -> usize {
        self.sinks().len()
    }

    /// Path of the attached file sink, if any.
    pub fn file_path(&self) -> Option<PathBuf> {
        self.sinks().file.as_ref().map(|sink| sink.path().to_path_buf())
    }

    /// Threshold of the attached console sink, if any.
    pub fn console_level(&self) -> Option<Severity> {
        self.sinks().console.as_ref().map(|sink| sink.threshold())
    }

    /// Returns true if a record at `severity` passes the logger's own filter.
    pub fn is_enabled_for(&self, severity: Severity) -> bool {
        severity >= self.level()
    }

    /// Returns true if both handles refer to the same logger.
    pub fn ptr_eq(a: &Logger, b: &Logger) -> bool {
        Arc::ptr_eq(&a.inner, &b.inner)
    }

    /// Emits a record. Usually called through the logging macros.
    pub fn log(&self, severity: Severity, call_site: CallSite<'_>, args: fmt::Arguments<'_>) {
        if !self.is_enabled_for(severity) {
            return;
        }
        let record = Record::new(&self.inner.name, severity, call_site, args);
        self.inner.handle(&record);
    }

    /// Logs `message` at ERROR followed by the error and its source chain.
    /// Usually called through [`exception!`](crate::exception).
    pub fn exception(
        &self,
        call_site: CallSite<'_>,
        message: fmt::Arguments<'_>,
        err: &(dyn Error + 'static),
    ) {
        if !self.is_enabled_for(Severity::Error) {
            return;
        }
        let mut detail = format!("{message}: {err}");
        let mut source = err.source();
        while let Some(cause) = source {
            detail.push_str(&format!(" (caused by: {cause})"));
            source = cause.source();
        }
        self.log(Severity::Error, call_site, format_args!("{detail}"));
    }

    /// Flushes every attached sink.
    pub fn flush(&self) {
        let sinks = self.sinks();
        if let Some(file) = &sinks.file {
            file.flush();
        }
        if let Some(console) = &sinks.console {
            console.flush();
        }
    }

    pub(crate) fn set_level(&self, level: Severity) {
        self.inner.filter.store(level as u8, Ordering::Release);
    }

    pub(crate) fn set_propagate(&self, propagate: bool) {
        self.inner.propagate.store(propagate, Ordering::Release);
    }

    pub(crate) fn sinks(&self) -> RwLockReadGuard<'_, SinkSet> {
        self.inner.sinks.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn sinks_mut(&self) -> RwLockWriteGuard<'_, SinkSet> {
        self.inner.sinks.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Detaches and returns every sink.
    pub(crate) fn take_sinks(&self) -> SinkSet {
        std::mem::take(&mut *self.sinks_mut())
    }

    /// Attaches `incoming`, closing any file sink it displaces.
    pub(crate) fn attach_sinks(&self, incoming: SinkSet) {
        let displaced = {
            let mut sinks = self.sinks_mut();
            if let Some(console) = incoming.console {
                sinks.console = Some(console);
            }
            match incoming.file {
                Some(file) => sinks.file.replace(file),
                None => None,
            }
        };
        if let Some(old) = displaced {
            let _ = old.close();
        }
    }
}

/// Get-or-create registry of logical loggers keyed by name.
///
/// Dotted names form a hierarchy: a new logger's parent is the nearest
/// registered ancestor (`a.b.c` → `a.b` → `a`), falling back to the root.
#[derive(Debug)]
pub(crate) struct LoggerRegistry {
    root: Arc<LoggerCore>,
    loggers: HashMap<String, Arc<LoggerCore>>,
}

impl LoggerRegistry {
    pub(crate) fn new() -> Self {
        let root = LoggerCore::new(ROOT_LOGGER_NAME, None);
        root.filter.store(Severity::Warning as u8, Ordering::Release);
        root.propagate.store(false, Ordering::Release);
        Self {
            root: Arc::new(root),
            loggers: HashMap::new(),
        }
    }

    #[cfg(test)]
    pub(crate) fn root(&self) -> Logger {
        Logger {
            inner: Arc::clone(&self.root),
        }
    }

    pub(crate) fn get(&self, name: &str) -> Option<Logger> {
        self.loggers.get(name).map(|core| Logger {
            inner: Arc::clone(core),
        })
    }

    pub(crate) fn get_or_create(&mut self, name: &str) -> Logger {
        if let Some(existing) = self.get(name) {
            return existing;
        }
        let parent = self.nearest_ancestor(name);
        let core = Arc::new(LoggerCore::new(name, Some(parent)));
        self.loggers.insert(name.to_string(), Arc::clone(&core));
        Logger { inner: core }
    }

    fn nearest_ancestor(&self, name: &str) -> Arc<LoggerCore> {
        let mut current = name;
        while let Some((prefix, _)) = current.rsplit_once('.') {
            if let Some(ancestor) = self.loggers.get(prefix) {
                return Arc::clone(ancestor);
            }
            current = prefix;
        }
        Arc::clone(&self.root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::CaptureBuffer;
    use crate::{ConsoleStream, error, exception, info, warning};

    fn capture_on(logger: &Logger, threshold: Severity) -> CaptureBuffer {
        let buffer = CaptureBuffer::new();
        logger.sinks_mut().console = Some(Arc::new(ConsoleSink::new(
            ConsoleStream::Capture(buffer.clone()),
            threshold,
        )));
        buffer
    }

    #[test]
    fn registry_returns_same_logger_for_same_name() {
        let mut registry = LoggerRegistry::new();
        let a = registry.get_or_create("mcp_server");
        let b = registry.get_or_create("mcp_server");
        assert!(Logger::ptr_eq(&a, &b));
        assert!(registry.get("other").is_none());
    }

    #[test]
    fn propagating_child_reaches_parent_sinks() {
        let mut registry = LoggerRegistry::new();
        let parent = registry.get_or_create("app");
        let child = registry.get_or_create("app.db");
        let captured = capture_on(&parent, Severity::Debug);

        info!(child, "query ran");
        captured.assert_contains("query ran");

        child.set_propagate(false);
        info!(child, "silent");
        captured.assert_not_contains("silent");
    }

    #[test]
    fn unrelated_names_fall_back_to_root() {
        let mut registry = LoggerRegistry::new();
        let root = registry.root();
        let captured = capture_on(&root, Severity::Debug);
        let logger = registry.get_or_create("standalone");

        warning!(logger, "bubbles up");
        captured.assert_contains("bubbles up");
    }

    #[test]
    fn own_filter_drops_records_before_sinks() {
        let mut registry = LoggerRegistry::new();
        let logger = registry.get_or_create("filtered");
        logger.set_propagate(false);
        let captured = capture_on(&logger, Severity::Debug);

        logger.set_level(Severity::Error);
        warning!(logger, "dropped");
        error!(logger, "kept");
        captured.assert_not_contains("dropped");
        captured.assert_contains("kept");
    }

    #[test]
    fn exception_includes_source_chain() {
        #[derive(Debug)]
        struct Outer(std::io::Error);
        impl fmt::Display for Outer {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("request failed")
            }
        }
        impl Error for Outer {
            fn source(&self) -> Option<&(dyn Error + 'static)> {
                Some(&self.0)
            }
        }

        let mut registry = LoggerRegistry::new();
        let logger = registry.get_or_create("errors");
        logger.set_propagate(false);
        let captured = capture_on(&logger, Severity::Debug);

        let err = Outer(std::io::Error::new(std::io::ErrorKind::TimedOut, "timed out"));
        exception!(logger, &err, "Error fetching {} data", "weather");
        captured.assert_contains(
            "ERROR - Error fetching weather data: request failed (caused by: timed out)",
        );
    }

    #[test]
    fn take_and_attach_moves_sinks() {
        let mut registry = LoggerRegistry::new();
        let from = registry.get_or_create("from");
        let to = registry.get_or_create("to");
        let _captured = capture_on(&from, Severity::Info);

        to.attach_sinks(from.take_sinks());
        assert_eq!(from.sink_count(), 0);
        assert_eq!(to.sink_count(), 1);
        assert_eq!(to.console_level(), Some(Severity::Info));
    }
}
