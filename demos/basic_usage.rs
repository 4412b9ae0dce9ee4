//! Basic logger usage example
//!
//! Demonstrates leveled logging to stdout, formatted messages, fixed fields
//! and the minimum level.
//!
//! Run with: cargo run --example basic_usage

use event_logger::prelude::*;
use event_logger::{info, warn};

fn main() {
    println!("=== Event Logger - Basic Usage Example ===\n");

    // Stdout sink by default; every record carries the service field
    let logger = Logger::builder()
        .field("service", "basic-usage")
        .field("version", env!("CARGO_PKG_VERSION"))
        .build();

    println!("1. Logging at different levels:");
    logger.debug("This is a debug message");
    logger.info("This is an info message");
    logger.warn("This is a warning message");
    logger.error("This is an error message");

    println!("\n2. Formatted messages:");
    let port = 8080;
    info!(logger, "Server listening on port {}", port);
    warn!(logger, "Retry attempt {} of {}", 3, 5);
    logger.errorf(format_args!("value={}", 42));

    // Drain before the next section so output does not interleave
    logger.close();

    println!("\n3. Minimum level set to WARNING - debug and info won't show:");
    let quiet = Logger::builder().min_level(LogLevel::Warning).build();
    quiet.debug("Debug message (hidden)");
    quiet.info("Info message (hidden)");
    quiet.warn("Warning message (visible)");
    quiet.close();

    println!("\n=== Example completed successfully! ===");
}
