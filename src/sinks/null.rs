//! Sink that discards everything

use crate::core::{LogEntry, Result, SeverityBand, Sink};

/// Accepts every level and writes nothing.
///
/// This is what [`Logger::new(None)`](crate::Logger::new) registers so a
/// logger always has at least one sink.
#[derive(Debug, Clone, Default)]
pub struct NullSink {
    name: String,
}

impl NullSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Sink for NullSink {
    fn write(&mut self, _entry: &LogEntry) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn band(&self) -> SeverityBand {
        SeverityBand::ALL
    }

    fn last_line(&self) -> &str {
        ""
    }
}
