//! Unit tests for log.rs
//!
//! Tests LogSeverity, LogEntry and DefaultLogger formatting/filtering.

use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

fn entry(severity: LogSeverity, file: Option<&'static str>, line: Option<u32>) -> LogEntry {
    LogEntry {
        severity,
        timestamp: SystemTime::now(),
        source: "galaxy3d::RenderQueue".to_string(),
        message: "Sorted 12 queued renderables".to_string(),
        file,
        line,
    }
}

// ============================================================================
// LOG SEVERITY TESTS
// ============================================================================

#[test]
fn test_log_severity_ordering() {
    assert!(LogSeverity::Trace < LogSeverity::Debug);
    assert!(LogSeverity::Debug < LogSeverity::Info);
    assert!(LogSeverity::Info < LogSeverity::Warn);
    assert!(LogSeverity::Warn < LogSeverity::Error);
}

#[test]
fn test_log_severity_labels_have_fixed_width() {
    for severity in [
        LogSeverity::Trace,
        LogSeverity::Debug,
        LogSeverity::Info,
        LogSeverity::Warn,
        LogSeverity::Error,
    ] {
        assert_eq!(severity.label().len(), 5);
    }
}

// ============================================================================
// DEFAULT LOGGER TESTS
// ============================================================================

#[test]
fn test_default_logger_prints_every_severity_by_default() {
    let logger = DefaultLogger::default();
    assert_eq!(logger.min_severity(), LogSeverity::Trace);
    logger.log(&entry(LogSeverity::Trace, None, None));
    logger.log(&entry(LogSeverity::Error, Some("render_queue.rs"), Some(42)));
}

#[test]
fn test_default_logger_min_severity() {
    let logger = DefaultLogger::with_min_severity(LogSeverity::Warn);
    assert_eq!(logger.min_severity(), LogSeverity::Warn);
    // Dropped silently
    logger.log(&entry(LogSeverity::Info, None, None));
}

#[test]
fn test_format_entry_without_location() {
    let line = DefaultLogger::format_entry(&entry(LogSeverity::Info, None, None));
    assert!(line.contains("[INFO ]"));
    assert!(line.contains("[galaxy3d::RenderQueue]"));
    assert!(line.ends_with("Sorted 12 queued renderables"));
}

#[test]
fn test_format_entry_with_location() {
    let line = DefaultLogger::format_entry(&entry(LogSeverity::Error, Some("render_queue.rs"), Some(42)));
    assert!(line.contains("[ERROR]"));
    assert!(line.ends_with("(render_queue.rs:42)"));
}

#[test]
fn test_format_entry_requires_both_file_and_line() {
    let line = DefaultLogger::format_entry(&entry(LogSeverity::Error, Some("render_queue.rs"), None));
    assert!(!line.contains("render_queue.rs"));
}

// ============================================================================
// CUSTOM LOGGER TESTS
// ============================================================================

struct CapturingLogger {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl Logger for CapturingLogger {
    fn log(&self, entry: &LogEntry) {
        self.entries.lock().unwrap().push(entry.clone());
    }
}

#[test]
fn test_custom_logger_receives_entries() {
    let entries = Arc::new(Mutex::new(Vec::new()));
    let logger = CapturingLogger { entries: entries.clone() };

    logger.log(&entry(LogSeverity::Warn, None, None));

    let captured = entries.lock().unwrap();
    assert_eq!(captured.len(), 1);
    assert_eq!(captured[0].severity, LogSeverity::Warn);
    assert_eq!(captured[0].source, "galaxy3d::RenderQueue");
}

#[test]
fn test_logger_trait_is_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<DefaultLogger>();
    assert_send_sync::<CapturingLogger>();
}
