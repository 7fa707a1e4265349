//! # Kernel Log
//!
//! This crate implements the kernel's diagnostic log.
//!
//! ## Philosophy
//!
//! Logging is explicit and structured, not text-based or printf-style.
//! Every diagnostic line a module or device emits lands in one in-process
//! log that tests can inspect, so "has only a logging side effect" is a
//! checkable property rather than a comment.

use core_types::SessionId;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;

/// Log level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    /// Debug information
    Debug,
    /// Informational messages
    Info,
    /// Warnings
    Warn,
    /// Errors
    Error,
}

/// A structured log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    /// Log level
    pub level: LogLevel,
    /// Component that emitted the entry (module or device name)
    pub source: String,
    /// Session the entry belongs to, if any
    pub session: Option<SessionId>,
    /// Log message
    pub message: String,
    /// Structured fields
    pub fields: Vec<(String, String)>,
}

impl LogEntry {
    /// Creates a new log entry
    pub fn new(level: LogLevel, source: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            source: source.into(),
            session: None,
            message: message.into(),
            fields: Vec::new(),
        }
    }

    /// Attributes the entry to a session
    pub fn with_session(mut self, session: SessionId) -> Self {
        self.session = Some(session);
        self
    }

    /// Adds a field to the log entry
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((key.into(), value.into()));
        self
    }
}

/// The kernel log store
///
/// An append-only record of every entry emitted since boot. All state is
/// directly accessible so tests can assert on logging side effects.
#[derive(Debug, Default)]
pub struct KernelLog {
    entries: Vec<LogEntry>,
}

impl KernelLog {
    /// Creates an empty log
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Appends an entry
    pub fn record(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }

    /// Returns all entries in emission order
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Returns the number of recorded entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing has been logged
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the entries emitted by one source
    pub fn entries_from(&self, source: &str) -> Vec<&LogEntry> {
        self.entries.iter().filter(|e| e.source == source).collect()
    }

    /// Returns true if any entry's message contains `needle`
    pub fn contains_message(&self, needle: &str) -> bool {
        self.entries.iter().any(|e| e.message.contains(needle))
    }
}

/// A cloneable handle to the kernel log
///
/// The host owns the log; modules and devices receive a handle at
/// initialization and emit through it. Cheap to clone, and every clone
/// observes the same log.
///
/// ## Example
///
/// ```
/// use klog::LogHandle;
///
/// let log = LogHandle::new();
/// let driver_log = log.clone();
///
/// driver_log.info("pseudo", "open requested");
/// assert!(log.with(|l| l.contains_message("open requested")));
/// ```
#[derive(Debug, Clone, Default)]
pub struct LogHandle {
    shared: Rc<RefCell<KernelLog>>,
}

impl LogHandle {
    /// Creates a handle owning a fresh, empty log
    pub fn new() -> Self {
        Self {
            shared: Rc::new(RefCell::new(KernelLog::new())),
        }
    }

    /// Records a fully built entry
    pub fn record(&self, entry: LogEntry) {
        self.shared.borrow_mut().record(entry);
    }

    /// Records an info-level message
    pub fn info(&self, source: &str, message: impl Into<String>) {
        self.record(LogEntry::new(LogLevel::Info, source, message));
    }

    /// Records a warning
    pub fn warn(&self, source: &str, message: impl Into<String>) {
        self.record(LogEntry::new(LogLevel::Warn, source, message));
    }

    /// Records an error-level message
    pub fn error(&self, source: &str, message: impl Into<String>) {
        self.record(LogEntry::new(LogLevel::Error, source, message));
    }

    /// Runs `f` with shared access to the log
    pub fn with<R>(&self, f: impl FnOnce(&KernelLog) -> R) -> R {
        f(&self.shared.borrow())
    }

    /// Returns a snapshot of all entries
    pub fn snapshot(&self) -> Vec<LogEntry> {
        self.shared.borrow().entries().to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warn);
        assert!(LogLevel::Warn < LogLevel::Error);
    }

    #[test]
    fn test_log_entry_creation() {
        let entry = LogEntry::new(LogLevel::Info, "pseudo", "read requested");
        assert_eq!(entry.level, LogLevel::Info);
        assert_eq!(entry.source, "pseudo");
        assert_eq!(entry.message, "read requested");
        assert!(entry.session.is_none());
        assert!(entry.fields.is_empty());
    }

    #[test]
    fn test_log_entry_with_session() {
        let session = SessionId::new();
        let entry = LogEntry::new(LogLevel::Info, "pseudo", "open").with_session(session);
        assert_eq!(entry.session, Some(session));
    }

    #[test]
    fn test_log_entry_with_fields() {
        let entry = LogEntry::new(LogLevel::Info, "pseudo", "read")
            .with_field("count", "16")
            .with_field("position", "0");

        assert_eq!(entry.fields.len(), 2);
        assert_eq!(entry.fields[0].0, "count");
        assert_eq!(entry.fields[1].1, "0");
    }

    #[test]
    fn test_kernel_log_records_in_order() {
        let mut log = KernelLog::new();
        log.record(LogEntry::new(LogLevel::Info, "hello", "first"));
        log.record(LogEntry::new(LogLevel::Info, "pseudo", "second"));

        assert_eq!(log.len(), 2);
        assert_eq!(log.entries()[0].message, "first");
        assert_eq!(log.entries()[1].message, "second");
    }

    #[test]
    fn test_kernel_log_entries_from() {
        let mut log = KernelLog::new();
        log.record(LogEntry::new(LogLevel::Info, "hello", "a"));
        log.record(LogEntry::new(LogLevel::Info, "pseudo", "b"));
        log.record(LogEntry::new(LogLevel::Warn, "pseudo", "c"));

        let pseudo = log.entries_from("pseudo");
        assert_eq!(pseudo.len(), 2);
        assert!(log.entries_from("nonesuch").is_empty());
    }

    #[test]
    fn test_handle_clones_share_one_log() {
        let log = LogHandle::new();
        let clone = log.clone();

        clone.info("hello", "module initialized");
        log.warn("pseudo", "short write");

        assert_eq!(log.snapshot().len(), 2);
        assert!(clone.with(|l| l.contains_message("module initialized")));
    }

    #[test]
    fn test_log_entry_serde_round_trip() {
        let entry = LogEntry::new(LogLevel::Error, "pseudo", "copy fault")
            .with_field("position", "512");
        let json = serde_json::to_string(&entry).unwrap();
        let back: LogEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back.level, LogLevel::Error);
        assert_eq!(back.message, "copy fault");
        assert_eq!(back.fields.len(), 1);
    }
}
