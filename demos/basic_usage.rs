//! Basic logger usage example
//!
//! Demonstrates fan-out to several sinks, severity bands and context
//! placeholders.
//!
//! Run with: cargo run --example basic_usage

use log_dispatch::prelude::*;
use log_dispatch::{info, warning};
use std::sync::Arc;

struct Session {
    user: String,
    requests: u32,
}

impl Describe for Session {
    fn type_name(&self) -> &str {
        "Session"
    }

    fn describe_fields(&self) -> Vec<Field> {
        vec![
            Field::public("user", self.user.as_str()),
            Field::private("requests", self.requests),
        ]
    }
}

fn main() -> Result<()> {
    println!("=== log_dispatch - Basic Usage Example ===\n");

    // Colored console for everything, plain echo for errors and worse
    let logger = Logger::builder()
        .sink(ConsoleSink::new().with_name("console"))
        .sink(
            EchoSink::new()
                .with_name("errors")
                .with_pattern("!! {levelU}: {message}\n")
                .with_band(SeverityBand::new(Severity::Error, Severity::Emergency)),
        )
        .build();

    println!("1. Logging at every level:");
    for level in Severity::ALL {
        logger.log(level.as_str(), "This is a {level} message", context! { "level" => level.as_str() })?;
    }

    println!("\n2. Unknown level names are rejected before any sink runs:");
    match logger.log("fatal", "never printed", LogContext::new()) {
        Ok(()) => println!("   unexpected success"),
        Err(e) => println!("   {}", e),
    }

    println!("\n3. Context placeholders and macros:");
    logger.notice(
        "User {user} logged in from {ip}",
        context! { "user" => "alice", "ip" => "10.0.0.7" },
    )?;
    info!(logger, "Processing {} items", 100)?;
    warning!(logger, context = context! { "pct" => 91 }; "Disk usage at {pct}%")?;

    println!("\n4. Structured values:");
    logger.info(vec![Value::from("a"), Value::from(1), Value::from(true)], LogContext::new())?;
    let session = Arc::new(Session {
        user: "alice".to_string(),
        requests: 12,
    });
    logger.debug(Value::object(session), LogContext::new())?;
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "config.toml missing");
    logger.error(ErrorValue::from_error(&io_error), LogContext::new())?;

    println!("\n5. Sinks registered: {:?}", logger.sink_names());
    println!(
        "   events: {}, deliveries: {}, rejected: {}",
        logger.metrics().events_dispatched(),
        logger.metrics().sink_deliveries(),
        logger.metrics().invalid_severity_count()
    );

    println!("\n=== Example completed successfully! ===");
    Ok(())
}
