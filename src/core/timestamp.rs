//! Timestamp formatting utilities
//!
//! Date patterns used by formatters for the `{date}` placeholder.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::time::SystemTime;

/// Timestamp format options
///
/// # Examples
///
/// ```
/// use log_dispatch::core::TimestampFormat;
/// use std::time::SystemTime;
///
/// let format = TimestampFormat::Standard;
/// let timestamp = format.format_system_time(&SystemTime::now());
/// // Output: "2025-01-08 10:30:45 UTC"
/// assert!(timestamp.ends_with("UTC"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// Date, time and zone: `2025-01-08 10:30:45 UTC`
    #[default]
    Standard,

    /// Date and time only: `2025-01-08 10:30:45`
    DateTime,

    /// ISO 8601 with milliseconds: `2025-01-08T10:30:45.123Z`
    Iso8601,

    /// RFC 3339 format: `2025-01-08T10:30:45+00:00`
    Rfc3339,

    /// RFC 2822 format: `Wed, 8 Jan 2025 10:30:45 +0000`
    Rfc2822,

    /// Unix timestamp in seconds: `1736332245`
    Unix,

    /// Custom strftime format
    ///
    /// # Examples
    ///
    /// ```
    /// use log_dispatch::core::TimestampFormat;
    ///
    /// // Apache log format
    /// let format = TimestampFormat::Custom("%d/%b/%Y:%H:%M:%S %z".to_string());
    /// ```
    Custom(String),
}

impl TimestampFormat {
    /// Format a `DateTime<Utc>` according to this format
    ///
    /// A `Custom` pattern chrono cannot render falls back to `Standard`.
    #[must_use]
    pub fn format(&self, datetime: &DateTime<Utc>) -> String {
        match self {
            TimestampFormat::Standard => datetime.format("%Y-%m-%d %H:%M:%S %Z").to_string(),
            TimestampFormat::DateTime => datetime.format("%Y-%m-%d %H:%M:%S").to_string(),
            TimestampFormat::Iso8601 => datetime.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
            TimestampFormat::Rfc3339 => datetime.to_rfc3339(),
            TimestampFormat::Rfc2822 => datetime.to_rfc2822(),
            TimestampFormat::Unix => datetime.timestamp().to_string(),
            TimestampFormat::Custom(format_str) => {
                let mut out = String::new();
                match write!(out, "{}", datetime.format(format_str)) {
                    Ok(()) => out,
                    Err(_) => TimestampFormat::Standard.format(datetime),
                }
            }
        }
    }

    /// Format a `SystemTime` according to this format
    #[must_use]
    pub fn format_system_time(&self, timestamp: &SystemTime) -> String {
        let datetime: DateTime<Utc> = (*timestamp).into();
        self.format(&datetime)
    }

    /// Format the current time
    #[must_use]
    pub fn format_now(&self) -> String {
        self.format(&Utc::now())
    }
}
