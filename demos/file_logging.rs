//! File logging example
//!
//! Demonstrates logging to the console and to per-level files at once.
//!
//! Run with: cargo run --example file_logging

use log_dispatch::prelude::*;

fn main() -> Result<()> {
    println!("=== log_dispatch - File Logging Example ===\n");

    // Urgent levels get their own file, debug output is dropped
    let mut file_sink = FileSink::new("logs/application.log").with_name("file");
    file_sink.set_level_file(
        &[Severity::Emergency, Severity::Alert, Severity::Critical],
        "urgent.log",
    );
    file_sink.disable_levels(&[Severity::Debug]);

    let logger = Logger::builder()
        .sink(ConsoleSink::new().with_name("console"))
        .sink(file_sink)
        .build();

    println!("1. Logging to both console and file:");
    logger.info("Application started", LogContext::new())?;
    logger.debug("Loading configuration...", LogContext::new())?;
    logger.warning("Using default settings for {count} options", context! { "count" => 3 })?;
    logger.critical("Database {db} unreachable", context! { "db" => "orders" })?;

    println!("\n2. Performing some operations:");
    for i in 1..=5 {
        logger.info("Processing item {i}/5", context! { "i" => i })?;
    }

    println!("\n3. Last line written to disk:");
    if let Some(line) = logger.last_line("file") {
        print!("   {}", line);
    }

    println!("\n4. One file per level:");
    let mut separate = FileSink::new("logs/by-level/all.log");
    separate.separate_log_files();
    for (level, target) in separate.level_files() {
        if let LevelFile::Path(path) = target {
            println!("   {:<9} -> {}", level, path.display());
        }
    }
    let by_level = Logger::new(Some(Box::new(separate)));
    by_level.notice("Each level lands in its own file", LogContext::new())?;

    logger.flush()?;

    println!("\n=== Example completed successfully! ===");
    println!("Check the 'logs' directory for the output");

    Ok(())
}
