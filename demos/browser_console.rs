//! Browser console example
//!
//! Demonstrates the ChromeLogger header sink with an in-memory transport,
//! including object flattening and the header size cap.
//!
//! Run with: cargo run --example browser_console

use base64::Engine;
use log_dispatch::prelude::*;
use log_dispatch::sinks::chrome::HEADER_NAME;
use parking_lot::Mutex;
use std::sync::{Arc, Weak};

struct Order {
    id: u64,
    customer: Mutex<Option<Arc<Customer>>>,
}

struct Customer {
    name: String,
    last_order: Weak<Order>,
}

impl Describe for Order {
    fn type_name(&self) -> &str {
        "Order"
    }

    fn describe_fields(&self) -> Vec<Field> {
        let customer = self.customer.lock().clone().map(Value::object);
        vec![
            Field::public("id", self.id),
            Field::protected("customer", customer),
        ]
    }
}

impl Describe for Customer {
    fn type_name(&self) -> &str {
        "Customer"
    }

    fn describe_fields(&self) -> Vec<Field> {
        vec![
            Field::public("name", self.name.as_str()),
            Field::private("last_order", self.last_order.upgrade().map(Value::object)),
        ]
    }
}

fn decode(header: &str) -> Result<serde_json::Value> {
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(header)
        .map_err(|e| LoggerError::other(e.to_string()))?;
    Ok(serde_json::from_slice(&bytes)?)
}

fn main() -> Result<()> {
    println!("=== log_dispatch - Browser Console Example ===\n");

    let transport = MemoryTransport::with_user_agent(
        "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 Chrome/120.0.0.0 Safari/537.36",
    );
    let logger = Logger::builder()
        .sink(ChromeSink::new(transport.clone()).with_name("chrome"))
        .build();

    println!("1. Scalar messages:");
    logger.info("Request {path} started", context! { "path" => "/checkout" })?;
    logger.warning("Slow query", LogContext::new())?;

    println!("2. An object graph with a cycle:");
    let order = Arc::new(Order {
        id: 1042,
        customer: Mutex::new(None),
    });
    let customer = Arc::new(Customer {
        name: "alice".to_string(),
        last_order: Arc::downgrade(&order),
    });
    *order.customer.lock() = Some(customer);
    logger.debug(Value::object(Arc::clone(&order)), LogContext::new())?;

    if let Some(header) = transport.header(HEADER_NAME) {
        let payload = decode(&header)?;
        println!("{}", serde_json::to_string_pretty(&payload)?);
    }

    println!("\n3. Exceeding the header size cap:");
    logger.info("x".repeat(300 * 1024), LogContext::new())?;
    logger.info("ignored after overflow", LogContext::new())?;
    if let Some(header) = transport.header(HEADER_NAME) {
        let payload = decode(&header)?;
        let rows = payload["rows"].as_array().map(Vec::len).unwrap_or(0);
        println!("   rows in header: {}", rows);
        println!("   last row: {}", payload["rows"][rows.saturating_sub(1)][0]);
    }

    println!("\n=== Example completed successfully! ===");
    Ok(())
}
