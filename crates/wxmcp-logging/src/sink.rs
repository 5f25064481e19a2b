//! File and console sinks.

use std::fs::{File, OpenOptions};
use std::io::{self, LineWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::testing::CaptureBuffer;
use crate::{LogError, Record, RecordFormat, Severity};

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Resolves `path` against the current directory without touching the
/// filesystem.
pub(crate) fn absolute_path(path: &Path) -> Result<PathBuf, LogError> {
    std::path::absolute(path).map_err(|source| LogError::OpenFile {
        path: path.to_path_buf(),
        source,
    })
}

/// Append-mode file sink. Accepts every severity.
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    writer: Mutex<Option<LineWriter<File>>>,
}

impl FileSink {
    /// Opens `path` for appending, creating the file if it does not exist.
    ///
    /// The parent directory must already exist.
    pub fn open(path: &Path) -> Result<Self, LogError> {
        let path = absolute_path(path)?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| LogError::OpenFile {
                path: path.clone(),
                source,
            })?;

        Ok(Self {
            path,
            writer: Mutex::new(Some(LineWriter::new(file))),
        })
    }

    /// Absolute path this sink is bound to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Minimum severity written by this sink.
    pub fn threshold(&self) -> Severity {
        Severity::Debug
    }

    /// Returns true once [`close`](Self::close) has released the file.
    pub fn is_closed(&self) -> bool {
        lock(&self.writer).is_none()
    }

    /// Flushes and releases the file handle. Later records are dropped.
    pub fn close(&self) -> io::Result<()> {
        match lock(&self.writer).take() {
            Some(mut writer) => writer.flush(),
            None => Ok(()),
        }
    }

    pub(crate) fn flush(&self) {
        if let Some(writer) = lock(&self.writer).as_mut() {
            let _ = writer.flush();
        }
    }

    pub(crate) fn emit(&self, record: &Record<'_>) {
        let line = RecordFormat::Detailed.render(record);
        if let Some(writer) = lock(&self.writer).as_mut() {
            let _ = writeln!(writer, "{line}");
        }
    }
}

/// Destination of the console sink.
#[derive(Debug, Clone, Default)]
pub enum ConsoleStream {
    /// The process's standard output.
    #[default]
    Stdout,
    /// An in-memory buffer, for tests.
    Capture(CaptureBuffer),
}

impl ConsoleStream {
    fn write_line(&self, line: &str) {
        match self {
            ConsoleStream::Stdout => {
                let mut out = io::stdout().lock();
                let _ = writeln!(out, "{line}");
            }
            ConsoleStream::Capture(buffer) => buffer.push_line(line),
        }
    }

    fn flush(&self) {
        if let ConsoleStream::Stdout = self {
            let _ = io::stdout().flush();
        }
    }
}

/// Console sink with an adjustable threshold.
#[derive(Debug)]
pub struct ConsoleSink {
    stream: ConsoleStream,
    threshold: AtomicU8,
}

impl ConsoleSink {
    /// Creates a console sink writing to `stream`.
    pub fn new(stream: ConsoleStream, threshold: Severity) -> Self {
        Self {
            stream,
            threshold: AtomicU8::new(threshold as u8),
        }
    }

    /// Minimum severity written by this sink.
    pub fn threshold(&self) -> Severity {
        Severity::from_u8(self.threshold.load(Ordering::Acquire))
    }

    /// Changes the minimum severity.
    pub fn set_threshold(&self, threshold: Severity) {
        self.threshold.store(threshold as u8, Ordering::Release);
    }

    /// Returns true if this sink writes to the process's standard output.
    pub fn is_stdout(&self) -> bool {
        matches!(self.stream, ConsoleStream::Stdout)
    }

    pub(crate) fn flush(&self) {
        self.stream.flush();
    }

    pub(crate) fn emit(&self, record: &Record<'_>) {
        if record.severity() < self.threshold() {
            return;
        }
        self.stream.write_line(&RecordFormat::Console.render(record));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CallSite;

    fn emit_to_console(sink: &ConsoleSink, severity: Severity, message: &str) {
        sink.emit(&Record::new(
            "test",
            severity,
            CallSite::new("tests", 1),
            format_args!("{message}"),
        ));
    }

    #[test]
    fn file_sink_appends_and_stops_after_close() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");
        std::fs::write(&path, "existing\n").unwrap();

        let sink = FileSink::open(&path).unwrap();
        assert!(sink.path().is_absolute());
        assert_eq!(sink.threshold(), Severity::Debug);

        sink.emit(&Record::new(
            "app",
            Severity::Debug,
            CallSite::new("tests", 7),
            format_args!("first"),
        ));
        sink.close().unwrap();
        assert!(sink.is_closed());
        sink.emit(&Record::new(
            "app",
            Severity::Error,
            CallSite::new("tests", 8),
            format_args!("after close"),
        ));

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("existing\n"));
        assert!(contents.contains(" - app - DEBUG - tests:7 - first"));
        assert!(!contents.contains("after close"));
    }

    #[test]
    fn file_sink_close_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileSink::open(&dir.path().join("app.log")).unwrap();
        sink.close().unwrap();
        sink.close().unwrap();
    }

    #[test]
    fn file_sink_open_fails_without_parent() {
        let dir = tempfile::tempdir().unwrap();
        let result = FileSink::open(&dir.path().join("missing").join("app.log"));
        assert!(matches!(result, Err(LogError::OpenFile { .. })));
    }

    #[test]
    fn console_sink_respects_threshold() {
        let buffer = CaptureBuffer::new();
        let sink = ConsoleSink::new(ConsoleStream::Capture(buffer.clone()), Severity::Warning);
        assert!(!sink.is_stdout());

        emit_to_console(&sink, Severity::Info, "quiet");
        emit_to_console(&sink, Severity::Error, "loud");
        assert!(!buffer.contains("quiet"));
        assert!(buffer.contains(" - ERROR - loud"));

        sink.set_threshold(Severity::Debug);
        assert_eq!(sink.threshold(), Severity::Debug);
        emit_to_console(&sink, Severity::Debug, "now visible");
        assert!(buffer.contains("now visible"));
    }
}
