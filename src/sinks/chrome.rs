//! Browser console sink
//!
//! Buffers every event as a row of a ChromeLogger payload and re-emits the
//! whole buffer as one base64 encoded `X-ChromeLogger-Data` response header
//! after each write. The header is capped at [`MAX_HEADER_SIZE`]: the write
//! that pushes the encoded payload past the cap has its row replaced by a
//! truncation notice and the sink stops accepting events for good.
//!
//! The HTTP side is abstracted behind [`HeaderTransport`].

use crate::core::{LogContext, LogEntry, Result, Severity, SeverityBand, Sink};
use crate::formatters::{Formatter, TreeFormatter};
use base64::Engine;
use indexmap::IndexMap;
use parking_lot::Mutex;
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;

pub const HEADER_NAME: &str = "X-ChromeLogger-Data";

/// Largest encoded payload sent, leaving room below the browser's limit
pub const MAX_HEADER_SIZE: usize = 240 * 1024;

pub const TRUNCATION_NOTICE: &str = "Logs truncated, exceeded Chrome header size limit";

const USER_AGENT_PATTERN: &str = r"\bChrome/\d+[\.\d+]*\b";

const COLUMNS: [&str; 3] = ["log", "backtrace", "type"];

const DEFAULT_TAGS: [&str; 8] = ["error", "error", "error", "error", "warn", "", "info", ""];

/// What the sink needs from the HTTP response it rides on
pub trait HeaderTransport: Send {
    /// Whether the response headers have already gone out
    fn headers_sent(&self) -> bool;

    /// Set a response header, replacing any earlier value
    fn send_header(&mut self, name: &str, value: &str) -> Result<()>;

    /// The requesting client's `User-Agent`
    fn user_agent(&self) -> Option<String>;
}

#[derive(Debug, Default)]
struct MemoryState {
    headers: IndexMap<String, String>,
    user_agent: Option<String>,
    headers_sent: bool,
}

/// In-memory transport; clones share the same headers.
#[derive(Debug, Clone, Default)]
pub struct MemoryTransport {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user_agent(user_agent: impl Into<String>) -> Self {
        let transport = Self::new();
        transport.state.lock().user_agent = Some(user_agent.into());
        transport
    }

    pub fn header(&self, name: &str) -> Option<String> {
        self.state.lock().headers.get(name).cloned()
    }

    pub fn headers(&self) -> IndexMap<String, String> {
        self.state.lock().headers.clone()
    }

    /// Behave as if the response headers were flushed
    pub fn mark_headers_sent(&self) {
        self.state.lock().headers_sent = true;
    }
}

impl HeaderTransport for MemoryTransport {
    fn headers_sent(&self) -> bool {
        self.state.lock().headers_sent
    }

    fn send_header(&mut self, name: &str, value: &str) -> Result<()> {
        self.state
            .lock()
            .headers
            .insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn user_agent(&self) -> Option<String> {
        self.state.lock().user_agent.clone()
    }
}

/// One payload row: `[log, backtrace, type]`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChromeRow(serde_json::Value, String, String);

impl ChromeRow {
    fn truncation_notice() -> Self {
        ChromeRow(
            serde_json::Value::String(TRUNCATION_NOTICE.to_string()),
            String::new(),
            String::new(),
        )
    }

    pub fn log(&self) -> &serde_json::Value {
        &self.0
    }

    pub fn backtrace(&self) -> &str {
        &self.1
    }

    pub fn tag(&self) -> &str {
        &self.2
    }
}

#[derive(Serialize)]
struct Payload<'a> {
    version: &'static str,
    columns: [&'static str; 3],
    rows: &'a [ChromeRow],
}

pub struct ChromeSink<T: HeaderTransport> {
    transport: T,
    formatter: TreeFormatter,
    rows: Vec<ChromeRow>,
    tags: [String; 8],
    backtraces: HashSet<String>,
    log_backtrace: bool,
    /// Set once the user agent has been checked
    initialized: bool,
    accepted: bool,
    overflowed: bool,
    name: String,
    band: SeverityBand,
    last_line: String,
}

impl<T: HeaderTransport> ChromeSink<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            formatter: TreeFormatter::new(),
            rows: Vec::new(),
            tags: DEFAULT_TAGS.map(String::from),
            backtraces: HashSet::new(),
            log_backtrace: true,
            initialized: false,
            accepted: false,
            overflowed: false,
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

    /// Turn the backtrace column on or off
    pub fn log_backtrace(&mut self, enabled: bool) {
        self.log_backtrace = enabled;
    }

    pub fn set_level_tag(&mut self, levels: &[Severity], tag: impl Into<String>) {
        let tag = tag.into();
        for level in levels {
            self.tags[level.rank() as usize] = tag.clone();
        }
    }

    pub fn level_tag(&self, level: Severity) -> &str {
        &self.tags[level.rank() as usize]
    }

    pub fn rows(&self) -> &[ChromeRow] {
        &self.rows
    }

    pub fn is_overflowed(&self) -> bool {
        self.overflowed
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// The current payload, base64 encoded
    pub fn encoded_payload(&self) -> Result<String> {
        let payload = Payload {
            version: env!("CARGO_PKG_VERSION"),
            columns: COLUMNS,
            rows: &self.rows,
        };
        let json = serde_json::to_string(&payload)?;
        Ok(base64::engine::general_purpose::STANDARD.encode(json))
    }

    fn backtrace_for(&mut self, entry: &LogEntry) -> String {
        let line = match (&entry.file, entry.line) {
            (Some(file), Some(line)) if self.log_backtrace => format!("{} : {}", file, line),
            _ => String::new(),
        };

        if self.backtraces.contains(&line) {
            String::new()
        } else {
            self.backtraces.insert(line.clone());
            line
        }
    }

    fn headers_accepted(&self) -> bool {
        let Some(user_agent) = self.transport.user_agent() else {
            return false;
        };
        Regex::new(USER_AGENT_PATTERN)
            .map(|re| re.is_match(&user_agent))
            .unwrap_or(false)
    }

    fn send(&mut self) -> Result<()> {
        if !self.initialized {
            self.initialized = true;
            self.accepted = self.headers_accepted();
        }

        let mut encoded = self.encoded_payload()?;
        if encoded.len() > MAX_HEADER_SIZE {
            self.overflowed = true;
            if let Some(last) = self.rows.last_mut() {
                *last = ChromeRow::truncation_notice();
            }
            encoded = self.encoded_payload()?;
        }

        if self.accepted && !self.transport.headers_sent() {
            self.transport.send_header(HEADER_NAME, &encoded)?;
        }
        Ok(())
    }
}

impl<T: HeaderTransport> Sink for ChromeSink<T> {
    fn write(&mut self, entry: &LogEntry) -> Result<()> {
        if self.overflowed || !self.band.accepts(entry.level) {
            return Ok(());
        }

        let backtrace = self.backtrace_for(entry);
        let log = self.formatter.format(
            entry.level,
            &entry.message,
            &LogContext::wrap_origin(&entry.context),
        );
        let tag = self.level_tag(entry.level).to_string();
        self.rows.push(ChromeRow(log, backtrace, tag));

        self.last_line = self
            .formatter
            .line_formatter()
            .normalize(&entry.message, &LogContext::new());
        self.send()
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Describe, Field, Value};
    use serde_json::json;

    const CHROME_UA: &str = "Mozilla/5.0 (X11; Linux x86_64) Chrome/120.0.6099.71 Safari/537.36";

    fn sink() -> (ChromeSink<MemoryTransport>, MemoryTransport) {
        let transport = MemoryTransport::with_user_agent(CHROME_UA);
        let mut sink = ChromeSink::new(transport.clone());
        sink.log_backtrace(false);
        (sink, transport)
    }

    fn entry(level: Severity, message: impl Into<Value>) -> LogEntry {
        LogEntry::new(level, message, LogContext::new())
    }

    fn decode(header: &str) -> serde_json::Value {
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(header)
            .expect("valid base64");
        serde_json::from_slice(&bytes).expect("valid json")
    }

    #[test]
    fn test_headers() {
        let (mut sink, transport) = sink();
        sink.write(&entry(Severity::Debug, "test")).unwrap();
        sink.write(&entry(Severity::Warning, "something bad")).unwrap();

        let header = transport.header(HEADER_NAME).expect("header sent");
        assert_eq!(
            decode(&header),
            json!({
                "version": env!("CARGO_PKG_VERSION"),
                "columns": ["log", "backtrace", "type"],
                "rows": [
                    ["test", "", ""],
                    ["something bad", "", "warn"]
                ]
            })
        );
        assert_eq!(sink.last_line(), "something bad");
    }

    #[test]
    fn test_header_overflow() {
        let (mut sink, transport) = sink();
        let kept = "a".repeat(150 * 1024);

        sink.write(&entry(Severity::Debug, "test")).unwrap();
        sink.write(&entry(Severity::Warning, kept.as_str())).unwrap();
        assert!(!sink.is_overflowed());

        sink.write(&entry(Severity::Warning, "a".repeat(200 * 1024)))
            .unwrap();
        assert!(sink.is_overflowed());

        let expected = json!({
            "version": env!("CARGO_PKG_VERSION"),
            "columns": ["log", "backtrace", "type"],
            "rows": [
                ["test", "", ""],
                [kept, "", "warn"],
                [TRUNCATION_NOTICE, "", ""]
            ]
        });
        assert_eq!(decode(&transport.header(HEADER_NAME).unwrap()), expected);

        // Overflow is permanent, small events are ignored from now on
        sink.write(&entry(Severity::Error, "tiny")).unwrap();
        sink.write(&entry(Severity::Info, "tinier")).unwrap();
        assert!(sink.is_overflowed());
        assert_eq!(sink.rows().len(), 3);
        assert_eq!(decode(&transport.header(HEADER_NAME).unwrap()), expected);
    }

    #[test]
    fn test_non_chrome_client_gets_no_header() {
        let transport = MemoryTransport::with_user_agent("curl/8.5.0");
        let mut sink = ChromeSink::new(transport.clone());

        sink.write(&entry(Severity::Info, "one")).unwrap();
        sink.write(&entry(Severity::Info, "two")).unwrap();

        assert!(transport.headers().is_empty());
        assert_eq!(sink.rows().len(), 2);
    }

    #[test]
    fn test_missing_user_agent_gets_no_header() {
        let transport = MemoryTransport::new();
        let mut sink = ChromeSink::new(transport.clone());
        sink.write(&entry(Severity::Info, "one")).unwrap();
        assert!(transport.header(HEADER_NAME).is_none());
    }

    #[test]
    fn test_rejected_user_agent_stays_rejected() {
        let transport = MemoryTransport::with_user_agent("curl/8.5.0");
        let mut sink = ChromeSink::new(transport.clone());
        sink.write(&entry(Severity::Info, "one")).unwrap();

        transport.state.lock().user_agent = Some(CHROME_UA.to_string());
        sink.write(&entry(Severity::Info, "two")).unwrap();

        assert!(transport.headers().is_empty());
        assert_eq!(sink.rows().len(), 2);
    }

    #[test]
    fn test_accepted_user_agent_stays_accepted() {
        let (mut sink, transport) = sink();
        sink.write(&entry(Severity::Info, "one")).unwrap();

        transport.state.lock().user_agent = Some("curl/8.5.0".to_string());
        sink.write(&entry(Severity::Info, "two")).unwrap();

        let payload = decode(&transport.header(HEADER_NAME).unwrap());
        assert_eq!(payload["rows"].as_array().unwrap().len(), 2);
        assert_eq!(payload["rows"][1][0], "two");
    }

    #[test]
    fn test_flushed_headers_are_not_rewritten() {
        let (mut sink, transport) = sink();
        sink.write(&entry(Severity::Info, "before")).unwrap();
        let first = transport.header(HEADER_NAME).unwrap();

        transport.mark_headers_sent();
        sink.write(&entry(Severity::Info, "after")).unwrap();

        assert_eq!(transport.header(HEADER_NAME).unwrap(), first);
        assert_eq!(sink.rows().len(), 2);
    }

    #[test]
    fn test_backtrace_is_deduplicated() {
        let transport = MemoryTransport::with_user_agent(CHROME_UA);
        let mut sink = ChromeSink::new(transport);

        let at = |line| entry(Severity::Info, "hot").with_location("src/app.rs", line);
        sink.write(&at(10)).unwrap();
        sink.write(&at(10)).unwrap();
        sink.write(&at(11)).unwrap();

        let backtraces: Vec<&str> = sink.rows().iter().map(ChromeRow::backtrace).collect();
        assert_eq!(backtraces, vec!["src/app.rs : 10", "", "src/app.rs : 11"]);
    }

    #[test]
    fn test_level_tags() {
        let (mut sink, _transport) = sink();
        let tags: Vec<&str> = Severity::ALL.iter().map(|&l| sink.level_tag(l)).collect();
        assert_eq!(tags, DEFAULT_TAGS.to_vec());

        sink.set_level_tag(&[Severity::Notice, Severity::Debug], "log");
        sink.write(&entry(Severity::Notice, "n")).unwrap();
        assert_eq!(sink.rows()[0].tag(), "log");
    }

    #[test]
    fn test_message_interpolated_from_caller_context() {
        let (mut sink, _transport) = sink();
        let ctx = LogContext::new().with_field("user", "alice");
        sink.write(&LogEntry::new(Severity::Info, "hello {user}", ctx))
            .unwrap();

        assert_eq!(sink.rows()[0].log(), &json!("hello alice"));
    }

    #[test]
    fn test_object_message_is_flattened() {
        struct Request {
            path: String,
        }

        impl Describe for Request {
            fn type_name(&self) -> &str {
                "Request"
            }

            fn describe_fields(&self) -> Vec<Field> {
                vec![Field::protected("path", self.path.as_str())]
            }
        }

        let (mut sink, _transport) = sink();
        let request = Arc::new(Request {
            path: "/login".to_string(),
        });
        sink.write(&entry(Severity::Debug, Value::object(request)))
            .unwrap();

        assert_eq!(
            sink.rows()[0].log(),
            &json!([{ "___class_name": "Request", "protected path": "/login" }])
        );
    }

    #[test]
    fn test_band_is_checked_inside_write() {
        let (sink, transport) = sink();
        let mut sink = sink.with_band(SeverityBand::only(Severity::Error));

        sink.write(&entry(Severity::Info, "ignored")).unwrap();
        assert!(sink.rows().is_empty());
        assert!(transport.headers().is_empty());
    }
}
