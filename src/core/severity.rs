//! Severity definitions
//!
//! The eight syslog-style levels, ranked 0 (most severe) to 7 (least severe),
//! and the inclusive band a sink uses to decide which of them it handles.

use super::error::{LoggerError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// System is unusable
    Emergency = 0,
    /// Action must be taken immediately
    Alert = 1,
    /// Critical conditions
    Critical = 2,
    /// Runtime errors that do not require immediate action
    Error = 3,
    /// Exceptional occurrences that are not errors
    Warning = 4,
    /// Normal but significant events
    Notice = 5,
    /// Interesting events
    Info = 6,
    /// Detailed debug information
    Debug = 7,
}

impl Severity {
    /// Every severity in rank order, most severe first.
    pub const ALL: [Severity; 8] = [
        Severity::Emergency,
        Severity::Alert,
        Severity::Critical,
        Severity::Error,
        Severity::Warning,
        Severity::Notice,
        Severity::Info,
        Severity::Debug,
    ];

    #[inline]
    pub const fn rank(self) -> u8 {
        self as u8
    }

    pub const fn from_rank(rank: u8) -> Option<Self> {
        match rank {
            0 => Some(Severity::Emergency),
            1 => Some(Severity::Alert),
            2 => Some(Severity::Critical),
            3 => Some(Severity::Error),
            4 => Some(Severity::Warning),
            5 => Some(Severity::Notice),
            6 => Some(Severity::Info),
            7 => Some(Severity::Debug),
            _ => None,
        }
    }

    /// Canonical lowercase name
    pub const fn as_str(self) -> &'static str {
        match self {
            Severity::Emergency => "emergency",
            Severity::Alert => "alert",
            Severity::Critical => "critical",
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Notice => "notice",
            Severity::Info => "info",
            Severity::Debug => "debug",
        }
    }

    pub const fn as_upper(self) -> &'static str {
        match self {
            Severity::Emergency => "EMERGENCY",
            Severity::Alert => "ALERT",
            Severity::Critical => "CRITICAL",
            Severity::Error => "ERROR",
            Severity::Warning => "WARNING",
            Severity::Notice => "NOTICE",
            Severity::Info => "INFO",
            Severity::Debug => "DEBUG",
        }
    }

    /// Look up the rank of a severity name.
    ///
    /// Names are matched exactly against the lowercase canonical table.
    ///
    /// # Examples
    ///
    /// ```
    /// use log_dispatch::Severity;
    ///
    /// assert_eq!(Severity::rank_of("warning").unwrap(), 4);
    /// assert!(Severity::rank_of("fatal").is_err());
    /// ```
    pub fn rank_of(name: &str) -> Result<u8> {
        name.parse::<Severity>().map(Severity::rank)
    }

    pub fn is_valid_name(name: &str) -> bool {
        Self::ALL.iter().any(|level| level.as_str() == name)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| LoggerError::unknown_severity(s))
    }
}

/// Inclusive rank interval a sink accepts.
///
/// `minimum` is the *least* severe level accepted (the numerically larger
/// rank) and `maximum` the *most* severe one. A level is accepted when
/// `minimum.rank() >= level.rank() >= maximum.rank()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityBand {
    pub minimum: Severity,
    pub maximum: Severity,
}

impl SeverityBand {
    /// Every level, debug through emergency.
    pub const ALL: SeverityBand = SeverityBand {
        minimum: Severity::Debug,
        maximum: Severity::Emergency,
    };

    pub const fn new(minimum: Severity, maximum: Severity) -> Self {
        Self { minimum, maximum }
    }

    /// A band holding exactly one level.
    pub const fn only(level: Severity) -> Self {
        Self::new(level, level)
    }

    /// Build a band from optional names.
    ///
    /// A missing or unrecognized minimum falls back to `debug`, a missing or
    /// unrecognized maximum to `emergency`.
    pub fn from_names(minimum: Option<&str>, maximum: Option<&str>) -> Self {
        let minimum = minimum
            .and_then(|name| name.parse().ok())
            .unwrap_or(Severity::Debug);
        let maximum = maximum
            .and_then(|name| name.parse().ok())
            .unwrap_or(Severity::Emergency);
        Self::new(minimum, maximum)
    }

    #[inline]
    pub fn accepts(&self, level: Severity) -> bool {
        self.minimum.rank() >= level.rank() && level.rank() >= self.maximum.rank()
    }
}

impl Default for SeverityBand {
    fn default() -> Self {
        Self::ALL
    }
}
