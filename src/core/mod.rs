//! Core logger types and traits

pub mod call_site;
pub mod encoder;
pub mod error;
pub mod event;
pub mod field;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod pipeline;
pub mod sink;

pub use call_site::CallSiteFn;
pub use encoder::{decode, encode, RECORD_SEPARATOR};
pub use error::{LoggerError, Result};
pub use event::Event;
pub use field::{FieldValue, Fields};
pub use log_level::LogLevel;
pub use logger::{ExitFn, Logger, LoggerBuilder, FATAL_EXIT_CODE};
pub use metrics::LoggerMetrics;
pub use pipeline::{Pipeline, PipelineState, QueueMode};
pub use sink::Sink;
