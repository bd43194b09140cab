//! Message formatters
//!
//! A formatter renders a `(level, message, context)` triple. The
//! [`LineFormatter`] produces a single line from a placeholder pattern; the
//! [`TreeFormatter`] flattens object graphs into JSON trees for the browser
//! console sink.

pub mod line;
pub mod tree;

pub use line::LineFormatter;
pub use tree::TreeFormatter;

use crate::core::{LogContext, Severity, Value};

/// Rendering strategy used by a sink
pub trait Formatter {
    type Output;

    fn format(&self, level: Severity, message: &Value, context: &LogContext) -> Self::Output;
}
