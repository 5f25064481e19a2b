//! Testing utilities for capturing console output.
//!
//! Provides [`CaptureBuffer`], an in-memory stand-in for standard output that
//! can be handed to a [`LogFacility`](crate::LogFacility) via
//! [`ConsoleStream::Capture`](crate::ConsoleStream::Capture).

use std::sync::{Arc, Mutex};

use crate::sink::lock;

/// Shared, clonable buffer of captured console lines.
#[derive(Debug, Clone, Default)]
pub struct CaptureBuffer {
    lines: Arc<Mutex<Vec<String>>>,
}

impl CaptureBuffer {
    /// Creates an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_line(&self, line: &str) {
        lock(&self.lines).push(line.to_string());
    }

    /// All captured lines.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        lock(&self.lines).clone()
    }

    /// Captured lines joined with newlines.
    #[must_use]
    pub fn output_string(&self) -> String {
        self.lines().join("\n")
    }

    /// Returns true if any captured line contains `needle`.
    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        lock(&self.lines).iter().any(|line| line.contains(needle))
    }

    /// Returns true if any captured line matches the regex `pattern`.
    ///
    /// An invalid pattern never matches.
    #[must_use]
    pub fn matches(&self, pattern: &str) -> bool {
        match regex::Regex::new(pattern) {
            Ok(re) => lock(&self.lines).iter().any(|line| re.is_match(line)),
            Err(_) => false,
        }
    }

    /// Discards everything captured so far.
    pub fn clear(&self) {
        lock(&self.lines).clear();
    }

    /// Asserts that some captured line contains `needle`.
    ///
    /// # Panics
    ///
    /// Panics if no captured line contains the needle.
    pub fn assert_contains(&self, needle: &str) {
        assert!(
            self.contains(needle),
            "Output did not contain '{}'. Actual output:\n{}",
            needle,
            self.output_string()
        );
    }

    /// Asserts that no captured line contains `needle`.
    ///
    /// # Panics
    ///
    /// Panics if a captured line contains the needle.
    pub fn assert_not_contains(&self, needle: &str) {
        assert!(
            !self.contains(needle),
            "Output unexpectedly contained '{}'. Actual output:\n{}",
            needle,
            self.output_string()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_lines() {
        let buffer = CaptureBuffer::new();
        let other = buffer.clone();
        other.push_line("12:00:00 - INFO - hello");

        assert_eq!(buffer.lines().len(), 1);
        assert!(buffer.contains("hello"));
        assert!(buffer.matches(r"^\d{2}:\d{2}:\d{2} - INFO - hello$"));
        assert!(!buffer.matches("("));

        buffer.clear();
        assert!(other.lines().is_empty());
    }
}
