//! Log entry structure

use super::log_context::LogContext;
use super::severity::Severity;
use super::value::Value;
use chrono::{DateTime, Utc};

/// One log event, built per `log` call and discarded after fan-out.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub level: Severity,
    pub message: Value,
    pub context: LogContext,
    pub timestamp: DateTime<Utc>,
    pub file: Option<String>,
    pub line: Option<u32>,
}

impl LogEntry {
    pub fn new(level: Severity, message: impl Into<Value>, context: LogContext) -> Self {
        Self {
            level,
            message: message.into(),
            context,
            timestamp: Utc::now(),
            file: None,
            line: None,
        }
    }

    pub fn with_location(mut self, file: &str, line: u32) -> Self {
        self.file = Some(file.to_string());
        self.line = Some(line);
        self
    }

    /// Record the caller of this constructor as the entry's location.
    #[track_caller]
    pub fn here(level: Severity, message: impl Into<Value>, context: LogContext) -> Self {
        let location = std::panic::Location::caller();
        Self::new(level, message, context).with_location(location.file(), location.line())
    }
}
