//! Integration tests for the logging facade
//!
//! These tests verify:
//! - Fail-fast severity validation
//! - Fan-out order and band filtering
//! - Context interpolation through sinks
//! - File sink output
//! - Browser console overflow
//! - Thread safety

use base64::Engine;
use log_dispatch::prelude::*;
use log_dispatch::sinks::chrome::{HEADER_NAME, TRUNCATION_NOTICE};
use parking_lot::Mutex;
use std::fs;
use std::io::{self, Write};
use std::sync::Arc;
use std::thread;
use tempfile::TempDir;

/// Writer whose bytes stay readable after the sink moves into a logger
#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().clone()).expect("utf-8 output")
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn echo(buffer: &SharedBuffer, name: &str, pattern: &str) -> EchoSink<SharedBuffer> {
    EchoSink::with_writer(buffer.clone())
        .with_name(name)
        .with_pattern(pattern)
}

#[test]
fn test_invalid_severity_reaches_no_sink() {
    let buffer = SharedBuffer::default();
    let logger = Logger::builder()
        .sink(echo(&buffer, "a", "{message}\n"))
        .sink(echo(&buffer, "b", "{message}\n"))
        .build();

    for name in ["fatal", "Error", "warn", "", "trace"] {
        let err = logger
            .log(name, "never written", LogContext::new())
            .expect_err("level must be rejected");
        assert!(err.is_invalid_severity(), "{} should be invalid", name);
    }

    assert!(buffer.contents().is_empty());
    assert_eq!(logger.metrics().invalid_severity_count(), 5);
}

#[test]
fn test_fan_out_in_registration_order() {
    let buffer = SharedBuffer::default();
    let logger = Logger::builder()
        .sink(echo(&buffer, "first", "A:{message}\n"))
        .sink(echo(&buffer, "second", "B:{message}\n"))
        .build();

    logger.info("one", LogContext::new()).expect("log");
    logger.info("two", LogContext::new()).expect("log");

    assert_eq!(buffer.contents(), "A:one\nB:one\nA:two\nB:two\n");
}

#[test]
fn test_context_interpolation_end_to_end() {
    let buffer = SharedBuffer::default();
    let logger = Logger::builder()
        .sink(echo(&buffer, "echo", "{level}: {message}"))
        .build();

    logger
        .log("error", "Line {n}", context! { "n" => "25" })
        .expect("log");

    assert_eq!(buffer.contents(), "error: Line 25");
}

#[test]
fn test_scalar_message_round_trip() {
    let buffer = SharedBuffer::default();
    let logger = Logger::builder()
        .sink(echo(&buffer, "echo", "{message}"))
        .build();

    logger.debug("plain text {not a key}", LogContext::new()).expect("log");
    assert_eq!(logger.last_line("echo").unwrap(), "plain text {not a key}");
}

#[test]
fn test_unrenderable_date_pattern_still_logs() {
    let buffer = SharedBuffer::default();
    let mut sink = echo(&buffer, "echo", "{date} {message}\n");
    sink.formatter_mut()
        .set_timestamp_format(TimestampFormat::Custom("%Q".to_string()));
    let logger = Logger::builder().sink(sink).build();

    logger.info("hello", LogContext::new()).expect("log");

    let out = buffer.contents();
    assert!(out.ends_with(" UTC hello\n"), "unexpected output: {:?}", out);
}

#[test]
fn test_band_edge_warning_to_error() {
    let buffer = SharedBuffer::default();
    let band = SeverityBand::new(Severity::Warning, Severity::Error);
    let logger = Logger::builder()
        .sink(echo(&buffer, "band", "{level}\n").with_band(band))
        .build();

    for level in Severity::ALL {
        logger.log_at(level, "x", LogContext::new()).expect("log");
    }

    assert_eq!(buffer.contents(), "error\nwarning\n");
}

#[test]
fn test_structured_messages_are_normalized() {
    let buffer = SharedBuffer::default();
    let logger = Logger::builder()
        .sink(echo(&buffer, "echo", "{message}\n"))
        .build();

    logger
        .info(vec![Value::from(1), Value::from("two")], LogContext::new())
        .expect("log");
    logger.info(Value::Null, LogContext::new()).expect("log");
    logger
        .info(Value::resource("socket"), LogContext::new())
        .expect("log");

    assert_eq!(buffer.contents(), "[\"1\",\"two\"]\nNULL\n[resource]\n");
}

#[test]
fn test_errors_are_rendered_as_json() {
    let buffer = SharedBuffer::default();
    let logger = Logger::builder()
        .sink(echo(&buffer, "echo", "{message}"))
        .build();

    let err = ErrorValue::new("ConfigError", "missing key")
        .with_code(3)
        .with_location("src/config.rs", 12);
    logger.error(err, LogContext::new()).expect("log");

    let rendered: serde_json::Value =
        serde_json::from_str(&buffer.contents()).expect("json message");
    assert_eq!(rendered["class"], "ConfigError");
    assert_eq!(rendered["message"], "missing key");
    assert_eq!(rendered["code"], 3);
    assert_eq!(rendered["file"], "src/config.rs:12");
}

#[cfg(feature = "file")]
#[test]
fn test_file_sink_through_logger() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let default_file = temp_dir.path().join("nested").join("app.log");

    let mut sink = FileSink::new(&default_file).with_name("file");
    sink.set_level_file(&[Severity::Emergency, Severity::Alert], "urgent.log");
    sink.disable_levels(&[Severity::Debug]);

    let logger = Logger::builder().sink(sink).build();
    logger
        .alert("Database {db} unreachable", context! { "db" => "orders" })
        .expect("log");
    logger.info("Started", LogContext::new()).expect("log");
    logger.debug("Noise", LogContext::new()).expect("log");

    let urgent = fs::read_to_string(temp_dir.path().join("nested").join("urgent.log"))
        .expect("Failed to read urgent log");
    assert!(urgent.ends_with(" | alert | Message: Database orders unreachable\n"));

    let main = fs::read_to_string(&default_file).expect("Failed to read log file");
    let lines: Vec<&str> = main.lines().collect();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].ends_with(" | info | Message: Started"));
}

#[cfg(feature = "file")]
#[test]
fn test_file_sink_failure_aborts_fan_out() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let blocker = temp_dir.path().join("blocker");
    fs::write(&blocker, "not a directory").expect("write blocker");

    let buffer = SharedBuffer::default();
    let logger = Logger::builder()
        .sink(FileSink::new(blocker.join("app.log")))
        .sink(echo(&buffer, "after", "{message}"))
        .build();

    let err = logger
        .error("lost", LogContext::new())
        .expect_err("file sink must fail");

    assert!(matches!(err, LoggerError::IoOperation { .. }));
    assert!(buffer.contents().is_empty());
}

#[test]
fn test_chrome_overflow_through_logger() {
    let transport = MemoryTransport::with_user_agent("Mozilla/5.0 Chrome/99.0.4844.51");
    let mut sink = ChromeSink::new(transport.clone()).with_name("chrome");
    sink.log_backtrace(false);

    let logger = Logger::builder().sink(sink).build();
    logger.debug("test", LogContext::new()).expect("log");
    logger
        .warning("a".repeat(150 * 1024), LogContext::new())
        .expect("log");
    logger
        .warning("a".repeat(200 * 1024), LogContext::new())
        .expect("log");

    let decode = |header: String| -> serde_json::Value {
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(header)
            .expect("base64");
        serde_json::from_slice(&bytes).expect("json")
    };

    let overflowed = decode(transport.header(HEADER_NAME).expect("header"));
    let rows = overflowed["rows"].as_array().expect("rows");
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[2][0], TRUNCATION_NOTICE);

    for i in 0..10 {
        logger.info(format!("small {}", i), LogContext::new()).expect("log");
    }
    assert_eq!(decode(transport.header(HEADER_NAME).expect("header")), overflowed);
}

#[test]
fn test_chrome_backtrace_points_at_caller() {
    let transport = MemoryTransport::with_user_agent("Chrome/120.0");
    let logger = Logger::builder()
        .sink(ChromeSink::new(transport.clone()))
        .build();

    let line = line!() + 1;
    logger.info("here", LogContext::new()).expect("log");

    let header = transport.header("X-ChromeLogger-Data").expect("header");
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(header)
        .expect("base64");
    let payload: serde_json::Value = serde_json::from_slice(&bytes).expect("json");
    let backtrace = payload["rows"][0][1].as_str().expect("backtrace");
    assert!(
        backtrace.ends_with(&format!("integration_tests.rs : {}", line)),
        "unexpected backtrace {}",
        backtrace
    );
}

#[test]
fn test_concurrent_logging() {
    let buffer = SharedBuffer::default();
    let logger = Arc::new(
        Logger::builder()
            .sink(echo(&buffer, "echo", "{message}\n"))
            .build(),
    );

    let handles: Vec<_> = (0..8)
        .map(|thread_id| {
            let logger = Arc::clone(&logger);
            thread::spawn(move || {
                for i in 0..50 {
                    logger
                        .notice(
                            "thread {t} message {i}",
                            context! { "t" => thread_id, "i" => i },
                        )
                        .expect("log");
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    let contents = buffer.contents();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 400);
    assert!(lines.iter().all(|line| line.starts_with("thread ")));
    assert_eq!(logger.metrics().sink_deliveries(), 400);
}

#[test]
fn test_flush_reaches_every_sink() {
    let buffer = SharedBuffer::default();
    let logger = Logger::builder()
        .sink(echo(&buffer, "a", "{message}"))
        .sink(NullSink::named("b"))
        .build();

    logger.info("flushed", LogContext::new()).expect("log");
    logger.flush().expect("flush");
    assert_eq!(buffer.contents(), "flushed");
}
