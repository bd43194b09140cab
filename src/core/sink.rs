//! Sink trait for log output destinations

use super::{error::Result, log_entry::LogEntry, severity::Severity, severity::SeverityBand};

/// A destination the [`Logger`](super::Logger) fans events out to.
///
/// The dispatcher only calls [`write`](Sink::write) for levels the sink
/// [`accepts`](Sink::accepts); implementations still re-check their band
/// inside `write` so a sink used on its own behaves the same way.
pub trait Sink: Send {
    fn write(&mut self, entry: &LogEntry) -> Result<()>;

    /// Registration key; an empty name asks the logger for a positional key.
    fn name(&self) -> &str;

    fn band(&self) -> SeverityBand;

    fn accepts(&self, level: Severity) -> bool {
        self.band().accepts(level)
    }

    /// The most recently rendered line, empty before the first write.
    fn last_line(&self) -> &str;

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}
