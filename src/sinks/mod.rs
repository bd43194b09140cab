//! Sink implementations

pub mod chrome;
pub mod echo;
pub mod null;

#[cfg(feature = "console")]
pub mod console;

#[cfg(feature = "file")]
pub mod file;

pub use chrome::{ChromeRow, ChromeSink, HeaderTransport, MemoryTransport};
pub use echo::EchoSink;
pub use null::NullSink;

#[cfg(feature = "console")]
pub use console::ConsoleSink;

#[cfg(feature = "file")]
pub use file::{FileSink, LevelFile};

pub use crate::core::Sink;
