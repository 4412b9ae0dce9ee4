//! # Event Logger
//!
//! A minimal structured-event logger. Leveled calls from any thread become
//! one JSON object per line, delivered to a single sink by one background
//! worker in exactly the order they were logged.
//!
//! ## Features
//!
//! - **Ordered**: one queue, one worker, global FIFO delivery
//! - **Non-blocking callers**: encoding happens on the caller, I/O on the worker
//! - **Fatal protocol**: `fatal` drains everything queued, then exits
//! - **Testable**: injectable sink, exit function and call-site resolver
//!
//! ```
//! use event_logger::prelude::*;
//!
//! let sink = MemorySink::new();
//! let logger = Logger::builder()
//!     .sink(sink.clone())
//!     .field("service", "x")
//!     .exit_fn(|_code| {})
//!     .build();
//!
//! logger.info("hello");
//! logger.close();
//!
//! let event = event_logger::decode(sink.lines()[0].as_bytes())?;
//! assert_eq!(event.level(), LogLevel::Info);
//! assert_eq!(event.message(), "hello");
//! # Ok::<(), LoggerError>(())
//! ```

pub mod core;
pub mod global;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::core::{
        Event, ExitFn, FieldValue, Fields, LogLevel, Logger, LoggerBuilder, LoggerError,
        LoggerMetrics, PipelineState, QueueMode, Result, Sink, FATAL_EXIT_CODE,
    };
    pub use crate::sinks::{ConsoleSink, FileSink, MemorySink, WriterSink};
}

pub use crate::core::{
    decode, encode, CallSiteFn, Event, ExitFn, FieldValue, Fields, LogLevel, Logger,
    LoggerBuilder, LoggerError, LoggerMetrics, Pipeline, PipelineState, QueueMode, Result, Sink,
    FATAL_EXIT_CODE, RECORD_SEPARATOR,
};
pub use sinks::{ConsoleSink, FileSink, MemorySink, WriterSink};
