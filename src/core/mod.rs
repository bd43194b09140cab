//! Core logger types and traits

pub mod error;
pub mod interpolate;
pub mod log_context;
pub mod log_entry;
pub mod logger;
pub mod metrics;
pub mod severity;
pub mod sink;
pub mod timestamp;
pub mod value;

pub use error::{LoggerError, Result};
pub use log_context::LogContext;
pub use log_entry::LogEntry;
pub use logger::{Logger, LoggerBuilder};
pub use metrics::LoggerMetrics;
pub use severity::{Severity, SeverityBand};
pub use sink::Sink;
pub use timestamp::TimestampFormat;
pub use value::{Describe, ErrorValue, Field, ObjectRef, StackFrame, Value, Visibility};
