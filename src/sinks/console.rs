//! Colored terminal sink

use crate::core::interpolate::interpolate;
use crate::core::{LogEntry, Result, Severity, SeverityBand, Sink, TimestampFormat};
use crate::formatters::LineFormatter;
use colored::{Color, Colorize};
use std::borrow::Cow;
use std::io::{self, Write};

/// Writes `"{date}: {levelC}: {message}\n"` lines, where `{levelC}` is the
/// upper-cased level painted in that level's color.
///
/// The pattern also understands `{level}` and `{levelU}`.
pub struct ConsoleSink<W: Write + Send = io::Stdout> {
    writer: W,
    formatter: LineFormatter,
    colors: [Color; 8],
    use_colors: bool,
    name: String,
    band: SeverityBand,
    last_line: String,
}

const DEFAULT_COLORS: [Color; 8] = [
    Color::Red,
    Color::Red,
    Color::Red,
    Color::Red,
    Color::Yellow,
    Color::Yellow,
    Color::Cyan,
    Color::Cyan,
];

impl ConsoleSink<io::Stdout> {
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }
}

impl Default for ConsoleSink<io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write + Send> ConsoleSink<W> {
    pub const DEFAULT_PATTERN: &'static str = "{date}: {levelC}: {message}\n";

    pub fn with_writer(writer: W) -> Self {
        Self {
            writer,
            formatter: LineFormatter::new(Self::DEFAULT_PATTERN),
            colors: DEFAULT_COLORS,
            use_colors: true,
            name: String::new(),
            band: SeverityBand::ALL,
            last_line: String::new(),
        }
    }

    #[must_use]
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Only handle levels from `minimum` up to emergency.
    #[must_use]
    pub fn with_minimum(mut self, minimum: Severity) -> Self {
        self.band = SeverityBand::new(minimum, Severity::Emergency);
        self
    }

    #[must_use]
    pub fn with_band(mut self, band: SeverityBand) -> Self {
        self.band = band;
        self
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.formatter.set_timestamp_format(format);
        self
    }

    pub fn set_band(&mut self, band: SeverityBand) {
        self.band = band;
    }

    pub fn set_pattern(&mut self, pattern: impl Into<String>) {
        self.formatter.set_pattern(pattern);
    }

    pub fn set_text_color(&mut self, levels: &[Severity], color: Color) {
        for level in levels {
            self.colors[level.rank() as usize] = color;
        }
    }

    pub fn text_color(&self, level: Severity) -> Color {
        self.colors[level.rank() as usize]
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    fn render(&self, entry: &LogEntry) -> String {
        let level = entry.level;
        let message = self.formatter.normalize(&entry.message, &entry.context);
        let date = self.formatter.timestamp_format().format(&entry.timestamp);
        let colored_level = if self.use_colors {
            level.as_upper().color(self.text_color(level)).to_string()
        } else {
            level.as_upper().to_string()
        };

        interpolate(self.formatter.pattern(), |key| match key {
            "level" => Some(Cow::Borrowed(level.as_str())),
            "levelU" => Some(Cow::Borrowed(level.as_upper())),
            "levelC" => Some(Cow::Borrowed(colored_level.as_str())),
            "message" => Some(Cow::Borrowed(message.as_str())),
            "date" => Some(Cow::Borrowed(date.as_str())),
            _ => None,
        })
    }
}

impl<W: Write + Send> Sink for ConsoleSink<W> {
    fn write(&mut self, entry: &LogEntry) -> Result<()> {
        if !self.band.accepts(entry.level) {
            return Ok(());
        }

        let line = self.render(entry);
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
