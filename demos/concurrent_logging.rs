//! Concurrent logging example
//!
//! Several worker threads share one logger. Records from each thread keep
//! their order, and `fatal` drains everything before exiting.
//!
//! Run with: cargo run --example concurrent_logging

use event_logger::prelude::*;
use event_logger::{fatal, info};
use std::sync::Arc;
use std::thread;

fn main() {
    println!("=== Event Logger - Concurrent Logging Example ===\n");

    let logger = Arc::new(
        Logger::builder()
            .sink(ConsoleSink::stderr())
            .field("service", "concurrent-demo")
            .queue(QueueMode::Bounded(64))
            .build(),
    );

    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let logger = Arc::clone(&logger);
            thread::spawn(move || {
                for job in 0..5 {
                    info!(logger, "worker {} finished job {}", worker, job);
                }
            })
        })
        .collect();

    for handle in handles {
        let _ = handle.join();
    }

    println!("All workers done, {} records queued", logger.metrics().enqueued());

    // Drains the queue, then exits with status 1
    fatal!(logger, "shutting down after {} workers", 4);
}
