//! File sink with optional per-level files

use crate::core::{LogEntry, LoggerError, Result, Severity, SeverityBand, Sink, TimestampFormat};
use crate::formatters::{Formatter, LineFormatter};
use fs2::FileExt;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Where entries of one level go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LevelFile {
    /// Use the default file
    Default,
    /// Use this file instead
    Path(PathBuf),
    /// Drop entries of this level
    Disabled,
}

/// Appends `"{date} | {level} | Message: {message}\n"` lines to disk.
///
/// Each write opens the target file in append mode, creating missing parent
/// directories, and holds an exclusive lock on it while the line goes out.
///
/// # Example
///
/// ```no_run
/// use log_dispatch::prelude::*;
///
/// let mut sink = FileSink::new("/var/log/app/log.txt");
/// sink.set_level_file(&[Severity::Emergency, Severity::Alert], "urgent.txt");
/// sink.disable_levels(&[Severity::Debug]);
///
/// let logger = Logger::builder().sink(sink).build();
/// logger.alert("Database unreachable", context! {}).unwrap();
/// ```
pub struct FileSink {
    default_file: PathBuf,
    level_files: [LevelFile; 8],
    formatter: LineFormatter,
    name: String,
    band: SeverityBand,
    last_line: String,
}

impl FileSink {
    pub const DEFAULT_PATTERN: &'static str = "{date} | {level} | Message: {message}\n";

    pub fn new(default_file: impl Into<PathBuf>) -> Self {
        Self {
            default_file: default_file.into(),
            level_files: std::array::from_fn(|_| LevelFile::Default),
            formatter: LineFormatter::new(Self::DEFAULT_PATTERN)
                .with_timestamp_format(TimestampFormat::DateTime),
            name: String::new(),
            band: SeverityBand::ALL,
            last_line: String::new(),
        }
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

    pub fn set_band(&mut self, band: SeverityBand) {
        self.band = band;
    }

    pub fn default_file(&self) -> &Path {
        &self.default_file
    }

    pub fn set_default_file(&mut self, file: impl Into<PathBuf>) {
        self.default_file = file.into();
    }

    /// Send `levels` to `file`. A relative name is placed in the default
    /// file's directory.
    pub fn set_level_file(&mut self, levels: &[Severity], file: impl AsRef<Path>) {
        let file = file.as_ref();
        let path = if file.is_relative() {
            self.directory().join(file)
        } else {
            file.to_path_buf()
        };

        for level in levels {
            self.level_files[level.rank() as usize] = LevelFile::Path(path.clone());
        }
    }

    pub fn disable_levels(&mut self, levels: &[Severity]) {
        for level in levels {
            self.level_files[level.rank() as usize] = LevelFile::Disabled;
        }
    }

    /// Give every level its own file, `<dir>/<level>.<ext>`, next to the
    /// default file and with its extension.
    pub fn separate_log_files(&mut self) {
        let dir = self.directory();
        let extension = self
            .default_file
            .extension()
            .map(|ext| ext.to_string_lossy().into_owned());

        for level in Severity::ALL {
            let file_name = match &extension {
                Some(ext) => format!("{}.{}", level, ext),
                None => level.to_string(),
            };
            self.level_files[level.rank() as usize] = LevelFile::Path(dir.join(file_name));
        }
    }

    /// The configured target for each level, in rank order
    pub fn level_files(&self) -> Vec<(Severity, LevelFile)> {
        Severity::ALL
            .iter()
            .map(|&level| (level, self.level_files[level.rank() as usize].clone()))
            .collect()
    }

    /// The file an entry of `level` is appended to, `None` when disabled
    pub fn file_for(&self, level: Severity) -> Option<&Path> {
        match &self.level_files[level.rank() as usize] {
            LevelFile::Default => Some(&self.default_file),
            LevelFile::Path(path) => Some(path),
            LevelFile::Disabled => None,
        }
    }

    fn directory(&self) -> PathBuf {
        match self.default_file.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    fn append(path: &Path, line: &str) -> Result<()> {
        if path.as_os_str().is_empty() {
            return Err(LoggerError::file_sink("", "no log file configured"));
        }

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    LoggerError::io_operation(
                        "creating log directory",
                        format!("cannot create {}", parent.display()),
                        e,
                    )
                })?;
            }
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                LoggerError::io_operation(
                    "opening log file",
                    format!("cannot open {}", path.display()),
                    e,
                )
            })?;

        file.lock_exclusive().map_err(|e| {
            LoggerError::io_operation(
                "locking log file",
                format!("cannot lock {}", path.display()),
                e,
            )
        })?;

        let written = file.write_all(line.as_bytes()).map_err(|e| {
            LoggerError::io_operation(
                "appending to log file",
                format!("cannot write {}", path.display()),
                e,
            )
        });
        // dropping `file` releases the lock if this unlock fails
        let _ = FileExt::unlock(&file);
        written
    }
}

impl Sink for FileSink {
    fn write(&mut self, entry: &LogEntry) -> Result<()> {
        if !self.band.accepts(entry.level) {
            return Ok(());
        }
        let Some(path) = self.file_for(entry.level) else {
            return Ok(());
        };

        let line = self
            .formatter
            .format(entry.level, &entry.message, &entry.context);
        Self::append(path, &line)?;
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
}
