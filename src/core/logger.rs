//! Dispatcher
//!
//! A [`Logger`] owns an ordered set of named sinks. Each call validates the
//! level name, interpolates the context into the message, then offers the
//! event to every sink in registration order. All work happens on the
//! caller's thread before `log` returns.

use super::{
    error::Result,
    interpolate::interpolate,
    log_context::LogContext,
    log_entry::LogEntry,
    metrics::LoggerMetrics,
    severity::Severity,
    sink::Sink,
    value::Value,
};
use crate::sinks::NullSink;
use indexmap::IndexMap;
use parking_lot::Mutex;
use std::borrow::Cow;
use std::panic::Location;

/// Registered sinks plus the positional key counter.
///
/// The counter only ever grows, so a positional key is never handed out
/// twice during the logger's lifetime.
struct Registry {
    sinks: IndexMap<String, Box<dyn Sink>>,
    counter: usize,
}

impl Registry {
    fn new() -> Self {
        Self {
            sinks: IndexMap::new(),
            counter: 0,
        }
    }

    fn insert(&mut self, sink: Box<dyn Sink>) -> String {
        let key = if sink.name().is_empty() {
            self.counter.to_string()
        } else {
            sink.name().to_string()
        };
        self.counter += 1;

        // An existing key keeps its position and gets the new sink
        self.sinks.insert(key.clone(), sink);
        key
    }
}

pub struct Logger {
    registry: Mutex<Registry>,
    metrics: LoggerMetrics,
}

impl Logger {
    /// Create a logger with one initial sink.
    ///
    /// `None` registers a [`NullSink`] so there is always something to
    /// dispatch to.
    ///
    /// # Example
    ///
    /// ```
    /// use log_dispatch::Logger;
    ///
    /// let logger = Logger::new(None);
    /// assert_eq!(logger.sink_count(), 1);
    /// assert!(logger.has_sink("0"));
    /// ```
    #[must_use]
    pub fn new(initial: Option<Box<dyn Sink>>) -> Self {
        let logger = Self::empty();
        logger.add_boxed_sink(initial.unwrap_or_else(|| Box::new(NullSink::new())));
        logger
    }

    fn empty() -> Self {
        Self {
            registry: Mutex::new(Registry::new()),
            metrics: LoggerMetrics::new(),
        }
    }

    /// Register a sink under its own name, or the next positional key when
    /// the name is empty. Returns the key used.
    pub fn add_sink<S: Sink + 'static>(&self, sink: S) -> String {
        self.add_boxed_sink(Box::new(sink))
    }

    pub fn add_boxed_sink(&self, sink: Box<dyn Sink>) -> String {
        self.registry.lock().insert(sink)
    }

    /// Unregister a sink, handing it back. Unknown names are ignored.
    pub fn remove_sink(&self, name: &str) -> Option<Box<dyn Sink>> {
        self.registry.lock().sinks.shift_remove(name)
    }

    pub fn has_sink(&self, name: &str) -> bool {
        self.registry.lock().sinks.contains_key(name)
    }

    /// Registration keys in fan-out order
    pub fn sink_names(&self) -> Vec<String> {
        self.registry.lock().sinks.keys().cloned().collect()
    }

    pub fn sink_count(&self) -> usize {
        self.registry.lock().sinks.len()
    }

    /// Last line rendered by the named sink
    pub fn last_line(&self, name: &str) -> Option<String> {
        self.registry
            .lock()
            .sinks
            .get(name)
            .map(|sink| sink.last_line().to_string())
    }

    /// Dispatch counters for this logger
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    /// Log with a level given by name.
    ///
    /// Fails with [`LoggerError::UnknownSeverity`](super::LoggerError) before
    /// any sink is touched when `level` is not one of the eight names. A
    /// sink's write error stops the fan-out and is returned as is; sinks
    /// after the failing one do not see the event.
    ///
    /// # Example
    ///
    /// ```
    /// use log_dispatch::{context, Logger};
    ///
    /// let logger = Logger::new(None);
    /// logger.log("error", "Line {n}", context! { "n" => 25 }).unwrap();
    /// assert!(logger.log("fatal", "nope", context! {}).is_err());
    /// ```
    #[track_caller]
    pub fn log(&self, level: &str, message: impl Into<Value>, context: LogContext) -> Result<()> {
        let location = Location::caller();
        let level = match level.parse::<Severity>() {
            Ok(level) => level,
            Err(e) => {
                self.metrics.record_invalid_severity();
                return Err(e);
            }
        };
        self.dispatch(level, message.into(), context, location)
    }

    /// Log with an already validated level
    #[track_caller]
    pub fn log_at(
        &self,
        level: Severity,
        message: impl Into<Value>,
        context: LogContext,
    ) -> Result<()> {
        self.dispatch(level, message.into(), context, Location::caller())
    }

    #[track_caller]
    pub fn emergency(&self, message: impl Into<Value>, context: LogContext) -> Result<()> {
        self.dispatch(Severity::Emergency, message.into(), context, Location::caller())
    }

    #[track_caller]
    pub fn alert(&self, message: impl Into<Value>, context: LogContext) -> Result<()> {
        self.dispatch(Severity::Alert, message.into(), context, Location::caller())
    }

    #[track_caller]
    pub fn critical(&self, message: impl Into<Value>, context: LogContext) -> Result<()> {
        self.dispatch(Severity::Critical, message.into(), context, Location::caller())
    }

    #[track_caller]
    pub fn error(&self, message: impl Into<Value>, context: LogContext) -> Result<()> {
        self.dispatch(Severity::Error, message.into(), context, Location::caller())
    }

    #[track_caller]
    pub fn warning(&self, message: impl Into<Value>, context: LogContext) -> Result<()> {
        self.dispatch(Severity::Warning, message.into(), context, Location::caller())
    }

    #[track_caller]
    pub fn notice(&self, message: impl Into<Value>, context: LogContext) -> Result<()> {
        self.dispatch(Severity::Notice, message.into(), context, Location::caller())
    }

    #[track_caller]
    pub fn info(&self, message: impl Into<Value>, context: LogContext) -> Result<()> {
        self.dispatch(Severity::Info, message.into(), context, Location::caller())
    }

    #[track_caller]
    pub fn debug(&self, message: impl Into<Value>, context: LogContext) -> Result<()> {
        self.dispatch(Severity::Debug, message.into(), context, Location::caller())
    }

    fn dispatch(
        &self,
        level: Severity,
        message: Value,
        context: LogContext,
        location: &Location<'_>,
    ) -> Result<()> {
        let message = interpolate_message(message, &context);
        let entry =
            LogEntry::new(level, message, context).with_location(location.file(), location.line());
        self.metrics.record_dispatched();

        let mut registry = self.registry.lock();
        for sink in registry.sinks.values_mut() {
            if !sink.accepts(level) {
                continue;
            }
            if let Err(e) = sink.write(&entry) {
                self.metrics.record_sink_failure();
                return Err(e);
            }
            self.metrics.record_delivery();
        }

        Ok(())
    }

    /// Flush every sink, stopping at the first failure
    pub fn flush(&self) -> Result<()> {
        let mut registry = self.registry.lock();
        for sink in registry.sinks.values_mut() {
            sink.flush()?;
        }
        Ok(())
    }

    /// Create a builder for Logger
    ///
    /// # Example
    /// ```
    /// use log_dispatch::prelude::*;
    ///
    /// let logger = Logger::builder()
    ///     .sink(NullSink::named("quiet"))
    ///     .build();
    /// assert_eq!(logger.sink_names(), vec!["quiet".to_string()]);
    /// ```
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }
}

/// String messages get one `{key}` substitution per context placeholder.
fn interpolate_message(message: Value, context: &LogContext) -> Value {
    match message {
        Value::String(text) if context.placeholders().next().is_some() => {
            Value::String(interpolate(&text, |key| {
                if key == LogContext::ORIGIN_KEY {
                    return None;
                }
                context.get(key).map(|value| Cow::Owned(value.to_string()))
            }))
        }
        other => other,
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(None)
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            eprintln!("[LOGGER ERROR] Failed to flush during shutdown: {}", e);
        }
    }
}

/// Builder for constructing Logger with a fluent API
///
/// Sinks are registered in the order they are given. A builder with no
/// sinks produces the same logger as `Logger::new(None)`.
pub struct LoggerBuilder {
    sinks: Vec<Box<dyn Sink>>,
}

impl LoggerBuilder {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    /// Add a sink
    #[must_use = "builder methods return a new value"]
    pub fn sink<S: Sink + 'static>(mut self, sink: S) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn boxed_sink(mut self, sink: Box<dyn Sink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn build(self) -> Logger {
        if self.sinks.is_empty() {
            return Logger::new(None);
        }

        let logger = Logger::empty();
        for sink in self.sinks {
            logger.add_boxed_sink(sink);
        }
        logger
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
