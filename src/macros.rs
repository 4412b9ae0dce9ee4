//! Logging macros for ergonomic log message formatting.
//!
//! These macros are the formatted (`*f`) entry points with `format!`-style
//! arguments. Because they expand at the call site, the recorded `file` is the
//! line of the macro invocation.
//!
//! # Examples
//!
//! ```
//! use event_logger::prelude::*;
//! use event_logger::info;
//!
//! let logger = Logger::builder().sink(MemorySink::new()).build();
//!
//! // Basic logging
//! info!(logger, "Server started");
//!
//! // With format arguments
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//! # logger.close();
//! ```

/// Log a message with automatic formatting.
///
/// # Examples
///
/// ```
/// # use event_logger::prelude::*;
/// # let logger = Logger::builder().sink(MemorySink::new()).build();
/// use event_logger::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.logf($level, ::std::format_args!($($arg)+))
    };
}

/// Log a debug-level message.
///
/// # Examples
///
/// ```
/// # use event_logger::prelude::*;
/// # let logger = Logger::builder().sink(MemorySink::new()).build();
/// use event_logger::debug;
/// debug!(logger, "Counter value: {}", 10);
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $logger.debugf(::std::format_args!($($arg)+))
    };
}

/// Log an info-level message.
///
/// # Examples
///
/// ```
/// # use event_logger::prelude::*;
/// # let logger = Logger::builder().sink(MemorySink::new()).build();
/// use event_logger::info;
/// info!(logger, "Processing {} items", 100);
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $logger.infof(::std::format_args!($($arg)+))
    };
}

/// Log a warning-level message.
///
/// # Examples
///
/// ```
/// # use event_logger::prelude::*;
/// # let logger = Logger::builder().sink(MemorySink::new()).build();
/// use event_logger::warn;
/// warn!(logger, "Retry attempt {} of {}", 3, 5);
/// ```
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $logger.warnf(::std::format_args!($($arg)+))
    };
}

/// Log an error-level message.
///
/// # Examples
///
/// ```
/// # use event_logger::prelude::*;
/// # let logger = Logger::builder().sink(MemorySink::new()).build();
/// use event_logger::error;
/// error!(logger, "value={}", 42);
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $logger.errorf(::std::format_args!($($arg)+))
    };
}

/// Log a fatal-level message, drain the logger and run its exit function.
///
/// # Examples
///
/// ```
/// # use event_logger::prelude::*;
/// let logger = Logger::builder()
///     .sink(MemorySink::new())
///     .exit_fn(|code| assert_eq!(code, 1))
///     .build();
/// use event_logger::fatal;
/// fatal!(logger, "Unable to recover from error: {}", "disk full");
/// ```
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $logger.fatalf(::std::format_args!($($arg)+))
    };
}

#[cfg(test)]
mod tests {
    use crate::core::{decode, LogLevel, Logger};
    use crate::sinks::MemorySink;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    fn messages(sink: &MemorySink) -> Vec<(LogLevel, String)> {
        sink.lines()
            .iter()
            .map(|line| decode(line.as_bytes()).unwrap())
            .map(|event| (event.level(), event.message().to_string()))
            .collect()
    }

    #[test]
    fn test_level_macros() {
        let sink = MemorySink::new();
        let logger = Logger::builder().sink(sink.clone()).build();

        log!(logger, LogLevel::Info, "Formatted: {}", 42);
        debug!(logger, "Count: {}", 5);
        info!(logger, "Items: {}", 100);
        warn!(logger, "Retry {} of {}", 1, 3);
        error!(logger, "Code: {}", 500);
        logger.close();

        assert_eq!(
            messages(&sink),
            [
                (LogLevel::Info, "Formatted: 42".to_string()),
                (LogLevel::Debug, "Count: 5".to_string()),
                (LogLevel::Info, "Items: 100".to_string()),
                (LogLevel::Warning, "Retry 1 of 3".to_string()),
                (LogLevel::Error, "Code: 500".to_string()),
            ]
        );
    }

    #[test]
    fn test_fatal_macro() {
        let sink = MemorySink::new();
        let exited = Arc::new(AtomicBool::new(false));
        let exited_clone = Arc::clone(&exited);
        let logger = Logger::builder()
            .sink(sink.clone())
            .exit_fn(move |_| exited_clone.store(true, Ordering::SeqCst))
            .build();

        fatal!(logger, "Critical failure: {}", "system");

        assert!(exited.load(Ordering::SeqCst));
        assert_eq!(messages(&sink), [(LogLevel::Fatal, "Critical failure: system".to_string())]);
    }

    #[test]
    fn test_macro_records_invocation_line() {
        let sink = MemorySink::new();
        let logger = Logger::builder().sink(sink.clone()).build();

        let line = line!() + 1;
        info!(logger, "where am I");
        logger.close();

        let event = decode(sink.lines()[0].as_bytes()).unwrap();
        assert_eq!(event.file(), Some(format!("{}:{}", file!(), line).as_str()));
    }
}
