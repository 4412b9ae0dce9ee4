//! Process-wide default logger
//!
//! A convenience layer over one [`Logger`] instance. The first use builds a
//! default logger (stdout, real process exit) unless [`init`] installed one
//! earlier. Every function forwards to that instance with the caller's
//! location preserved.
//!
//! ```no_run
//! use event_logger::global;
//!
//! global::info("service starting");
//! global::warnf(format_args!("cache miss ratio {:.2}", 0.37));
//! global::close();
//! ```

use crate::core::{LogLevel, Logger};
use std::fmt;
use std::sync::OnceLock;

static DEFAULT: OnceLock<Logger> = OnceLock::new();

/// Install `logger` as the process-wide default.
///
/// Only the first installation wins, and only if nothing has logged through
/// this module yet. Otherwise the rejected logger is handed back.
pub fn init(logger: Logger) -> Result<(), Logger> {
    DEFAULT.set(logger)
}

/// The default logger, created on first use
pub fn logger() -> &'static Logger {
    DEFAULT.get_or_init(Logger::new)
}

/// Drain and stop the default logger. Statics are never dropped, so call
/// this before returning from `main` to flush pending records.
pub fn close() -> bool {
    DEFAULT.get().is_some_and(Logger::close)
}

#[track_caller]
pub fn log(level: LogLevel, message: impl Into<String>) {
    logger().log(level, message);
}

#[track_caller]
pub fn logf(level: LogLevel, args: fmt::Arguments<'_>) {
    logger().logf(level, args);
}

#[track_caller]
pub fn debug(message: impl Into<String>) {
    logger().debug(message);
}

#[track_caller]
pub fn debugf(args: fmt::Arguments<'_>) {
    logger().debugf(args);
}

#[track_caller]
pub fn info(message: impl Into<String>) {
    logger().info(message);
}

#[track_caller]
pub fn infof(args: fmt::Arguments<'_>) {
    logger().infof(args);
}

#[track_caller]
pub fn warn(message: impl Into<String>) {
    logger().warn(message);
}

#[track_caller]
pub fn warnf(args: fmt::Arguments<'_>) {
    logger().warnf(args);
}

#[track_caller]
pub fn error(message: impl Into<String>) {
    logger().error(message);
}

#[track_caller]
pub fn errorf(args: fmt::Arguments<'_>) {
    logger().errorf(args);
}

#[track_caller]
pub fn fatal(message: impl Into<String>) {
    logger().fatal(message);
}

#[track_caller]
pub fn fatalf(args: fmt::Arguments<'_>) {
    logger().fatalf(args);
}
