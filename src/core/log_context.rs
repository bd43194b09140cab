//! Placeholder context for log messages
//!
//! A [`LogContext`] maps placeholder names to values. Keys are kept in
//! insertion order so rendered output is stable. The reserved key
//! [`LogContext::ORIGIN_KEY`] carries the caller's original context when a
//! sink re-wraps it, and is never substituted as a placeholder itself.

use super::value::Value;
use indexmap::IndexMap;
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogContext {
    fields: IndexMap<String, Value>,
}

impl LogContext {
    /// Reserved key holding the original caller context.
    pub const ORIGIN_KEY: &'static str = "__context";

    pub fn new() -> Self {
        Self {
            fields: IndexMap::new(),
        }
    }

    /// Build a context whose only entry is `ctx` under the reserved key.
    pub fn wrap_origin(ctx: &LogContext) -> Self {
        let mut wrapped = Self::new();
        wrapped.add_field(Self::ORIGIN_KEY, Value::Map(ctx.fields.clone()));
        wrapped
    }

    /// Add a field to the context
    pub fn with_field<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Add a field to the context (mutable version)
    pub fn add_field<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.fields.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Get all fields, the reserved key included
    pub fn fields(&self) -> &IndexMap<String, Value> {
        &self.fields
    }

    /// Entries usable as `{key}` placeholders.
    pub fn placeholders(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields
            .iter()
            .filter(|(key, _)| key.as_str() != Self::ORIGIN_KEY)
            .map(|(key, value)| (key.as_str(), value))
    }

    /// The original caller context, if one was wrapped in.
    pub fn origin(&self) -> Option<&IndexMap<String, Value>> {
        match self.fields.get(Self::ORIGIN_KEY) {
            Some(Value::Map(map)) => Some(map),
            _ => None,
        }
    }

    /// Check if context has any fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Format placeholder fields as key=value pairs
    pub fn format_fields(&self) -> String {
        self.placeholders()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for LogContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_fields())
    }
}

impl From<LogContext> for Value {
    fn from(ctx: LogContext) -> Self {
        Value::Map(ctx.fields)
    }
}

impl From<IndexMap<String, Value>> for LogContext {
    fn from(fields: IndexMap<String, Value>) -> Self {
        Self { fields }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for LogContext {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
