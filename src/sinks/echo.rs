//! Plain text sink for stdout or any writer

use crate::core::{LogEntry, Result, SeverityBand, Sink};
use crate::formatters::{Formatter, LineFormatter};
use std::io::{self, Write};

/// Renders each event through a [`LineFormatter`] and writes it out.
///
/// # Example
///
/// ```
/// use log_dispatch::prelude::*;
///
/// let sink = EchoSink::with_writer(Vec::new()).with_pattern("{level}: {message}\n");
/// let logger = Logger::builder().sink(sink).build();
/// logger.error("Line {n}", context! { "n" => 25 }).unwrap();
/// ```
pub struct EchoSink<W: Write + Send = io::Stdout> {
    writer: W,
    formatter: LineFormatter,
    name: String,
    band: SeverityBand,
    last_line: String,
}

impl EchoSink<io::Stdout> {
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }
}

impl Default for EchoSink<io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write + Send> EchoSink<W> {
    pub const DEFAULT_PATTERN: &'static str = "Log Level: {level}\nMessage: {message}\n\n";

    pub fn with_writer(writer: W) -> Self {
        Self {
            writer,
            formatter: LineFormatter::new(Self::DEFAULT_PATTERN),
            name: String::new(),
            band: SeverityBand::ALL,
            last_line: String::new(),
        }
    }

    #[must_use]
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.formatter.set_pattern(pattern);
        self
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn with_band(mut self, band: SeverityBand) -> Self {
        self.band = band;
        self
    }

    pub fn set_pattern(&mut self, pattern: impl Into<String>) {
        self.formatter.set_pattern(pattern);
    }

    pub fn pattern(&self) -> &str {
        self.formatter.pattern()
    }

    pub fn set_band(&mut self, band: SeverityBand) {
        self.band = band;
    }

    pub fn formatter_mut(&mut self) -> &mut LineFormatter {
        &mut self.formatter
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    pub fn into_writer(self) -> W {
        self.writer
    }
}

impl<W: Write + Send> Sink for EchoSink<W> {
    fn write(&mut self, entry: &LogEntry) -> Result<()> {
        if !self.band.accepts(entry.level) {
            return Ok(());
        }

        let line = self
            .formatter
            .format(entry.level, &entry.message, &entry.context);
        self.writer.write_all(line.as_bytes())?;
        self.last_line = line;
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn band(&self) -> SeverityBand {
        self.band
    }

    fn last_line(&self) -> &str {
        &self.last_line
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
