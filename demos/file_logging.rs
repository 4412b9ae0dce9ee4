//! File logging example
//!
//! Writes JSON lines to a file, then reads them back and decodes each one.
//!
//! Run with: cargo run --example file_logging

use event_logger::prelude::*;
use event_logger::decode;
use std::fs;

fn main() -> Result<()> {
    println!("=== Event Logger - File Logging Example ===\n");

    let log_path = std::env::temp_dir().join("event_logger_demo").join("app.jsonl");
    if log_path.exists() {
        fs::remove_file(&log_path)?;
    }

    let logger = Logger::builder()
        .sink(FileSink::new(&log_path)?)
        .field("component", "file-demo")
        .field_serialized("tags", &["demo", "file"])
        .build();

    println!("1. Writing 10 records to {}", log_path.display());
    for i in 0..10 {
        logger.infof(format_args!("Processing item {}", i));
    }
    logger.warn("Disk usage above 80%");
    logger.error("Failed to reach upstream");

    // Blocks until every record is on disk
    logger.close();

    println!("\n2. Reading records back:");
    let content = fs::read_to_string(&log_path)?;
    for line in content.lines() {
        let event = decode(line.as_bytes())?;
        println!(
            "   [{}] {:<8} {} ({})",
            event.time().format("%H:%M:%S%.3f"),
            event.level(),
            event.message(),
            event.file().unwrap_or("-")
        );
    }

    let metrics = logger.metrics();
    println!(
        "\n3. Metrics: enqueued={} written={} dropped={}",
        metrics.enqueued(),
        metrics.written(),
        metrics.dropped_count()
    );

    println!("\n=== Example completed successfully! ===");
    Ok(())
}
