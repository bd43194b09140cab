//! # log_dispatch
//!
//! A structured logging facade. One [`Logger`] validates leveled events and
//! fans them out, in registration order, to any number of named sinks. Each
//! sink filters by its own severity band and renders events its own way.
//!
//! ## Features
//!
//! - **Eight syslog levels**: emergency through debug, with per-sink bands
//! - **Placeholder interpolation**: `{key}` values from the event context
//! - **Value normalization**: collections, errors and introspectable objects
//!   render to text or JSON without ever failing the call
//! - **Sinks**: null, echo, colored console, per-level files, and a
//!   browser console sink that ships events in a response header
//!
//! ```
//! use log_dispatch::prelude::*;
//!
//! let logger = Logger::builder()
//!     .sink(EchoSink::with_writer(Vec::new()).with_name("echo"))
//!     .build();
//!
//! logger.error("Line {n}", context! { "n" => 25 }).unwrap();
//! assert_eq!(
//!     logger.last_line("echo").unwrap(),
//!     "Log Level: error\nMessage: Line 25\n\n"
//! );
//! ```

pub mod core;
pub mod formatters;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::context;
    pub use crate::core::{
        Describe, ErrorValue, Field, LogContext, LogEntry, Logger, LoggerBuilder, LoggerError,
        LoggerMetrics, ObjectRef, Result, Severity, SeverityBand, Sink, StackFrame,
        TimestampFormat, Value, Visibility,
    };
    pub use crate::formatters::{Formatter, LineFormatter, TreeFormatter};
    pub use crate::sinks::{ChromeSink, EchoSink, HeaderTransport, MemoryTransport, NullSink};

    #[cfg(feature = "console")]
    pub use crate::sinks::ConsoleSink;

    #[cfg(feature = "file")]
    pub use crate::sinks::{FileSink, LevelFile};
}

pub use core::{
    Describe, ErrorValue, Field, LogContext, LogEntry, Logger, LoggerBuilder, LoggerError,
    LoggerMetrics, ObjectRef, Result, Severity, SeverityBand, Sink, StackFrame, TimestampFormat,
    Value, Visibility,
};
pub use formatters::{Formatter, LineFormatter, TreeFormatter};
pub use sinks::{ChromeSink, EchoSink, NullSink};
