//! Pattern based line formatter
//!
//! The pattern may use `{level}`, `{levelU}`, `{message}`, `{date}` and one
//! `{key}` per context field. Context fields shadow the built-in names.
//! Before substitution the message is normalized into text:
//!
//! - scalars are stringified, then interpolated with the original caller
//!   context when one is wrapped in under `__context`
//! - null becomes `NULL`
//! - lists and maps are normalized element by element (at most
//!   [`MAX_NORMALIZED_ITEMS`] per collection) and JSON encoded on one line
//! - errors become a JSON object with class, message, code, location,
//!   trace and the normalized cause under `previous`
//! - objects become `[object] (Type: text)` using their display text or a
//!   dump of their fields
//! - resources become `[resource]`

use super::Formatter;
use crate::core::interpolate::interpolate;
use crate::core::{ErrorValue, LogContext, ObjectRef, Severity, TimestampFormat, Value};
use std::borrow::Cow;
use std::collections::HashSet;

/// Items normalized per collection before the rest is cut off.
pub const MAX_NORMALIZED_ITEMS: usize = 1000;

/// Marker stored in place of the first item past the limit.
pub const TRUNCATION_MARKER: &str = "Over 1000 items, aborting normalization";

/// Marker for an object already being dumped further up.
const RECURSION_MARKER: &str = "*RECURSION*";

#[derive(Debug, Clone, PartialEq)]
pub struct LineFormatter {
    pattern: String,
    timestamp_format: TimestampFormat,
}

impl LineFormatter {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            timestamp_format: TimestampFormat::default(),
        }
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn set_pattern(&mut self, pattern: impl Into<String>) {
        self.pattern = pattern.into();
    }

    pub fn timestamp_format(&self) -> &TimestampFormat {
        &self.timestamp_format
    }

    pub fn set_timestamp_format(&mut self, format: TimestampFormat) {
        self.timestamp_format = format;
    }

    /// Render `message` as text according to the normalization rules.
    pub fn normalize(&self, message: &Value, context: &LogContext) -> String {
        Normalizer::new(context).text(message)
    }
}

impl Formatter for LineFormatter {
    type Output = String;

    fn format(&self, level: Severity, message: &Value, context: &LogContext) -> String {
        let message = self.normalize(message, context);
        let date = self.timestamp_format.format_now();

        interpolate(&self.pattern, |key| {
            if key != LogContext::ORIGIN_KEY {
                if let Some(value) = context.get(key) {
                    return Some(Cow::Owned(value.to_string()));
                }
            }
            match key {
                "level" => Some(Cow::Borrowed(level.as_str())),
                "levelU" => Some(Cow::Borrowed(level.as_upper())),
                "message" => Some(Cow::Borrowed(message.as_str())),
                "date" => Some(Cow::Borrowed(date.as_str())),
                _ => None,
            }
        })
    }
}

/// One normalization pass; tracks objects currently being dumped.
struct Normalizer<'a> {
    context: &'a LogContext,
    dumping: HashSet<usize>,
}

impl<'a> Normalizer<'a> {
    fn new(context: &'a LogContext) -> Self {
        Self {
            context,
            dumping: HashSet::new(),
        }
    }

    fn text(&mut self, value: &Value) -> String {
        match value {
            Value::Null => "NULL".to_string(),
            Value::List(_) | Value::Map(_) => remove_newlines(&self.json(value).to_string()),
            Value::Error(err) => self.error(err).to_string(),
            Value::Object(obj) => self.object(obj),
            Value::Resource(_) => "[resource]".to_string(),
            scalar => {
                let text = scalar.scalar_text().unwrap_or_default();
                match self.context.origin() {
                    Some(origin) => interpolate(&text, |key| {
                        origin.get(key).map(|v| Cow::Owned(v.to_string()))
                    }),
                    None => text,
                }
            }
        }
    }

    /// JSON form of a collection item
    fn json(&mut self, value: &Value) -> serde_json::Value {
        match value {
            Value::List(items) => {
                let mut out = Vec::with_capacity(items.len().min(MAX_NORMALIZED_ITEMS + 1));
                for (idx, item) in items.iter().enumerate() {
                    if idx >= MAX_NORMALIZED_ITEMS {
                        out.push(serde_json::Value::String(TRUNCATION_MARKER.to_string()));
                        break;
                    }
                    out.push(self.json(item));
                }
                serde_json::Value::Array(out)
            }
            Value::Map(map) => {
                let mut out = serde_json::Map::new();
                for (idx, (key, item)) in map.iter().enumerate() {
                    if idx >= MAX_NORMALIZED_ITEMS {
                        out.insert(
                            key.clone(),
                            serde_json::Value::String(TRUNCATION_MARKER.to_string()),
                        );
                        break;
                    }
                    out.insert(key.clone(), self.json(item));
                }
                serde_json::Value::Object(out)
            }
            Value::Error(err) => self.error(err),
            other => serde_json::Value::String(self.text(other)),
        }
    }

    fn error(&mut self, err: &ErrorValue) -> serde_json::Value {
        let mut data = serde_json::Map::new();
        data.insert("class".into(), err.class.clone().into());
        data.insert("message".into(), err.message.clone().into());
        data.insert("code".into(), err.code.into());
        data.insert("file".into(), format!("{}:{}", err.file, err.line).into());

        if !err.trace.is_empty() {
            let trace = err
                .trace
                .iter()
                .map(|frame| match frame.location() {
                    Some(location) => serde_json::Value::String(location),
                    None => {
                        let mut details = indexmap::IndexMap::new();
                        if let Some(function) = &frame.function {
                            details.insert("function".to_string(), Value::from(function));
                        }
                        if let Some(line) = frame.line {
                            details.insert("line".to_string(), Value::from(line));
                        }
                        serde_json::Value::String(self.text(&Value::Map(details)))
                    }
                })
                .collect();
            data.insert("trace".into(), serde_json::Value::Array(trace));
        }

        if let Some(previous) = &err.previous {
            data.insert("previous".into(), self.error(previous));
        }

        serde_json::Value::Object(data)
    }

    fn object(&mut self, obj: &ObjectRef) -> String {
        if let Some(text) = obj.display() {
            return format!("[object] ({}: {})", obj.type_name(), text);
        }

        if !self.dumping.insert(obj.id()) {
            return RECURSION_MARKER.to_string();
        }

        let mut dump = serde_json::Map::new();
        for field in obj.fields() {
            let key = format!("{}:{}", field.tag(), field.name);
            dump.insert(key, self.json(&field.value));
        }
        self.dumping.remove(&obj.id());

        format!(
            "[object] ({}: {})",
            obj.type_name(),
            serde_json::Value::Object(dump)
        )
    }
}

fn remove_newlines(line: &str) -> String {
    line.chars().filter(|c| *c != '\n' && *c != '\r').collect()
}
