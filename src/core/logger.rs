//! Main logger implementation

use super::{
    call_site::{default_resolver, CallSiteFn},
    encoder,
    event::Event,
    field::{FieldValue, Fields},
    log_level::LogLevel,
    metrics::LoggerMetrics,
    pipeline::{Pipeline, PipelineState, QueueMode},
    sink::Sink,
};
use crate::sinks::ConsoleSink;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt::{self, Write as _};
use std::panic::Location;
use std::sync::Arc;

/// Status passed to the exit function after a fatal event has been drained
pub const FATAL_EXIT_CODE: i32 = 1;

/// Terminal action run after a fatal event. Defaults to `std::process::exit`.
pub type ExitFn = Arc<dyn Fn(i32) + Send + Sync>;

/// Leveled, structured logger writing JSON lines through one ordered
/// background pipeline.
///
/// All methods take `&self` and may be called from any number of threads.
/// Every entry point is `#[track_caller]`, so the `file` key names the line
/// that called it.
pub struct Logger {
    pipeline: Pipeline,
    fields: Fields,
    min_level: LogLevel,
    exit_fn: ExitFn,
    call_site: Option<CallSiteFn>,
    metrics: Arc<LoggerMetrics>,
}

impl Logger {
    /// Logger writing to stdout with no fields.
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Create a builder for Logger
    ///
    /// # Example
    /// ```
    /// use event_logger::prelude::*;
    ///
    /// let logger = Logger::builder()
    ///     .sink(MemorySink::new())
    ///     .field("service", "billing")
    ///     .exit_fn(|_code| {})
    ///     .build();
    /// ```
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    #[track_caller]
    pub fn log(&self, level: LogLevel, message: impl Into<String>) {
        self.dispatch(level, message.into(), Location::caller());
    }

    /// Log a pre-formatted message, usually built with `format_args!`.
    ///
    /// A `Display` impl that fails midway leaves whatever it wrote so far
    /// as the message.
    #[track_caller]
    pub fn logf(&self, level: LogLevel, args: fmt::Arguments<'_>) {
        self.dispatch(level, format_message(args), Location::caller());
    }

    fn dispatch(&self, level: LogLevel, message: String, location: &'static Location<'static>) {
        if level < self.min_level && level != LogLevel::Fatal {
            return;
        }

        let file = self.call_site.as_ref().and_then(|resolve| resolve(location));
        let event = Event::new(level, message, self.fields.clone(), file);

        match encoder::encode(&event) {
            Ok(record) => {
                self.pipeline.enqueue(record);
            }
            Err(_) => {
                self.metrics.record_encode_failure();
            }
        }

        if level == LogLevel::Fatal {
            self.terminate();
        }
    }

    /// Drain the pipeline, then ask for process exit. Only the caller that
    /// actually closed the pipeline runs the exit function.
    fn terminate(&self) {
        if self.pipeline.close() {
            (self.exit_fn)(FATAL_EXIT_CODE);
        }
    }

    #[inline]
    #[track_caller]
    pub fn debug(&self, message: impl Into<String>) {
        self.log(LogLevel::Debug, message);
    }

    #[inline]
    #[track_caller]
    pub fn debugf(&self, args: fmt::Arguments<'_>) {
        self.logf(LogLevel::Debug, args);
    }

    #[inline]
    #[track_caller]
    pub fn info(&self, message: impl Into<String>) {
        self.log(LogLevel::Info, message);
    }

    #[inline]
    #[track_caller]
    pub fn infof(&self, args: fmt::Arguments<'_>) {
        self.logf(LogLevel::Info, args);
    }

    #[inline]
    #[track_caller]
    pub fn warn(&self, message: impl Into<String>) {
        self.log(LogLevel::Warning, message);
    }

    #[inline]
    #[track_caller]
    pub fn warnf(&self, args: fmt::Arguments<'_>) {
        self.logf(LogLevel::Warning, args);
    }

    #[inline]
    #[track_caller]
    pub fn error(&self, message: impl Into<String>) {
        self.log(LogLevel::Error, message);
    }

    #[inline]
    #[track_caller]
    pub fn errorf(&self, args: fmt::Arguments<'_>) {
        self.logf(LogLevel::Error, args);
    }

    /// Log at fatal level, wait for everything queued to reach the sink,
    /// then run the exit function with [`FATAL_EXIT_CODE`].
    ///
    /// With the default exit function this does not return.
    #[track_caller]
    pub fn fatal(&self, message: impl Into<String>) {
        self.log(LogLevel::Fatal, message);
    }

    #[track_caller]
    pub fn fatalf(&self, args: fmt::Arguments<'_>) {
        self.logf(LogLevel::Fatal, args);
    }

    /// Stop accepting events and block until every event logged before this
    /// call has been written to the sink.
    ///
    /// Returns `true` if this call closed the logger, `false` if it was
    /// already closed (by `close`, `fatal` or another thread).
    pub fn close(&self) -> bool {
        self.pipeline.close()
    }

    pub fn state(&self) -> PipelineState {
        self.pipeline.state()
    }

    /// The fixed fields stamped onto every event
    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    pub fn min_level(&self) -> LogLevel {
        self.min_level
    }

    /// Get the logger metrics for detailed observability
    ///
    /// # Example
    ///
    /// ```
    /// use event_logger::prelude::*;
    ///
    /// let logger = Logger::builder().sink(MemorySink::new()).build();
    /// logger.info("counted");
    /// logger.close();
    ///
    /// let metrics = logger.metrics();
    /// assert_eq!(metrics.written(), 1);
    /// assert_eq!(metrics.dropped_count(), 0);
    /// ```
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

fn exit_process(code: i32) {
    std::process::exit(code)
}

fn format_message(args: fmt::Arguments<'_>) -> String {
    if let Some(literal) = args.as_str() {
        return literal.to_owned();
    }
    let mut message = String::new();
    let _ = message.write_fmt(args);
    message
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use event_logger::prelude::*;
///
/// let logger = Logger::builder()
///     .sink(ConsoleSink::stderr())
///     .field("service", "api-gateway")
///     .field("version", 3)
///     .queue(QueueMode::Bounded(4096))
///     .min_level(LogLevel::Info)
///     .build();
/// # logger.close();
/// ```
pub struct LoggerBuilder {
    sink: Option<Box<dyn Sink>>,
    exit_fn: Option<ExitFn>,
    fields: HashMap<String, FieldValue>,
    queue: QueueMode,
    min_level: LogLevel,
    call_site: Option<CallSiteFn>,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            sink: None,
            exit_fn: None,
            fields: HashMap::new(),
            queue: QueueMode::default(),
            min_level: LogLevel::Debug,
            call_site: Some(default_resolver()),
        }
    }

    /// Set the destination for records. Defaults to stdout.
    #[must_use = "builder methods return a new value"]
    pub fn sink<S: Sink + 'static>(mut self, sink: S) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    /// Replace the action taken after a fatal event is drained.
    #[must_use = "builder methods return a new value"]
    pub fn exit_fn<F>(mut self, exit_fn: F) -> Self
    where
        F: Fn(i32) + Send + Sync + 'static,
    {
        self.exit_fn = Some(Arc::new(exit_fn));
        self
    }

    /// Attach a fixed field to every event. A repeated name overwrites the
    /// earlier value.
    #[must_use = "builder methods return a new value"]
    pub fn field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Attach any `Serialize` value as a fixed field.
    ///
    /// If the value has no JSON representation the logger still builds, but
    /// every event it produces is dropped at encode time.
    #[must_use = "builder methods return a new value"]
    pub fn field_serialized<T: Serialize + ?Sized>(
        mut self,
        name: impl Into<String>,
        value: &T,
    ) -> Self {
        self.fields.insert(name.into(), FieldValue::serialized(value));
        self
    }

    /// Choose between an unbounded queue (default) and a bounded one that
    /// blocks producers while full.
    #[must_use = "builder methods return a new value"]
    pub fn queue(mut self, mode: QueueMode) -> Self {
        self.queue = mode;
        self
    }

    /// Discard events below `level`. Fatal events are never discarded.
    #[must_use = "builder methods return a new value"]
    pub fn min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    /// Replace how the caller location is rendered into the `file` key.
    #[must_use = "builder methods return a new value"]
    pub fn call_site<F>(mut self, resolver: F) -> Self
    where
        F: Fn(&'static Location<'static>) -> Option<String> + Send + Sync + 'static,
    {
        self.call_site = Some(Arc::new(resolver));
        self
    }

    /// Never write the `file` key.
    #[must_use = "builder methods return a new value"]
    pub fn without_call_site(mut self) -> Self {
        self.call_site = None;
        self
    }

    /// Build the Logger and start its background worker
    pub fn build(self) -> Logger {
        let sink = self
            .sink
            .unwrap_or_else(|| Box::new(ConsoleSink::stdout()));
        let exit_fn = self
            .exit_fn
            .unwrap_or_else(|| Arc::new(exit_process));
        let metrics = Arc::new(LoggerMetrics::new());

        Logger {
            pipeline: Pipeline::start(sink, self.queue, Arc::clone(&metrics)),
            fields: Fields::from(self.fields),
            min_level: self.min_level,
            exit_fn,
            call_site: self.call_site,
            metrics,
        }
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sinks::MemorySink;
    use std::sync::atomic::{AtomicI32, AtomicUsize, Ordering};

    fn quiet_logger(sink: &MemorySink) -> Logger {
        Logger::builder()
            .sink(sink.clone())
            .exit_fn(|_| {})
            .build()
    }

    fn decode_all(sink: &MemorySink) -> Vec<Event> {
        sink.lines()
            .iter()
            .map(|line| encoder::decode(line.as_bytes()).unwrap())
            .collect()
    }

    #[test]
    fn test_builder_default() {
        let logger = LoggerBuilder::default().exit_fn(|_| {}).build();
        assert_eq!(logger.min_level(), LogLevel::Debug);
        assert!(logger.fields().is_empty());
        assert_eq!(logger.state(), PipelineState::Open);
        logger.close();
    }

    #[test]
    fn test_each_level_method() {
        let sink = MemorySink::new();
        let logger = quiet_logger(&sink);

        logger.debug("d");
        logger.info("i");
        logger.warn("w");
        logger.error("e");
        logger.close();

        let levels: Vec<LogLevel> = decode_all(&sink).iter().map(Event::level).collect();
        assert_eq!(
            levels,
            [LogLevel::Debug, LogLevel::Info, LogLevel::Warning, LogLevel::Error]
        );
    }

    #[test]
    fn test_formatted_variants() {
        let sink = MemorySink::new();
        let logger = quiet_logger(&sink);
        let foo = "foo";

        logger.debugf(format_args!("1 {}", foo));
        logger.infof(format_args!("2 {}", foo));
        logger.warnf(format_args!("3 {}", foo));
        logger.errorf(format_args!("value={}", 42));
        logger.logf(LogLevel::Info, format_args!("{:>4}", 7));
        logger.close();

        let messages: Vec<String> = decode_all(&sink)
            .iter()
            .map(|e| e.message().to_string())
            .collect();
        assert_eq!(messages, ["1 foo", "2 foo", "3 foo", "value=42", "   7"]);
    }

    #[test]
    fn test_call_site_points_at_caller() {
        let sink = MemorySink::new();
        let logger = quiet_logger(&sink);

        let line = line!() + 1;
        logger.info("here");
        logger.close();

        let events = decode_all(&sink);
        assert_eq!(events[0].file(), Some(format!("{}:{}", file!(), line).as_str()));
    }

    #[test]
    fn test_without_call_site_omits_file() {
        let sink = MemorySink::new();
        let logger = Logger::builder()
            .sink(sink.clone())
            .without_call_site()
            .build();
        logger.info("anonymous");
        logger.close();

        assert!(!sink.lines()[0].contains("\"file\""));
    }

    #[test]
    fn test_custom_call_site_resolver() {
        let sink = MemorySink::new();
        let logger = Logger::builder()
            .sink(sink.clone())
            .call_site(|location| Some(format!("line {}", location.line())))
            .build();
        logger.info("custom");
        logger.close();

        assert!(decode_all(&sink)[0].file().unwrap().starts_with("line "));
    }

    #[test]
    fn test_min_level_filters_but_never_fatal() {
        let sink = MemorySink::new();
        let exits = Arc::new(AtomicUsize::new(0));
        let exits_clone = Arc::clone(&exits);
        let logger = Logger::builder()
            .sink(sink.clone())
            .min_level(LogLevel::Error)
            .exit_fn(move |_| {
                exits_clone.fetch_add(1, Ordering::SeqCst);
            })
            .build();

        logger.info("filtered");
        logger.warn("filtered");
        logger.error("kept");
        logger.fatal("always");

        let messages: Vec<String> = decode_all(&sink)
            .iter()
            .map(|e| e.message().to_string())
            .collect();
        assert_eq!(messages, ["kept", "always"]);
        assert_eq!(exits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_fatal_drains_then_exits() {
        let sink = MemorySink::new();
        let seen_at_exit = Arc::new(AtomicUsize::new(0));
        let status = Arc::new(AtomicI32::new(0));
        let (sink_clone, seen_clone, status_clone) =
            (sink.clone(), Arc::clone(&seen_at_exit), Arc::clone(&status));

        let logger = Logger::builder()
            .sink(sink.clone())
            .exit_fn(move |code| {
                seen_clone.store(sink_clone.lines().len(), Ordering::SeqCst);
                status_clone.store(code, Ordering::SeqCst);
            })
            .build();

        logger.info("before");
        logger.fatalf(format_args!("giving up after {} tries", 3));

        assert_eq!(seen_at_exit.load(Ordering::SeqCst), 2);
        assert_eq!(status.load(Ordering::SeqCst), FATAL_EXIT_CODE);
        assert_eq!(logger.state(), PipelineState::Closed);

        let events = decode_all(&sink);
        assert_eq!(events[1].level(), LogLevel::Fatal);
        assert_eq!(events[1].message(), "giving up after 3 tries");
    }

    #[test]
    fn test_log_at_fatal_level_runs_protocol() {
        let sink = MemorySink::new();
        let exits = Arc::new(AtomicUsize::new(0));
        let exits_clone = Arc::clone(&exits);
        let logger = Logger::builder()
            .sink(sink.clone())
            .exit_fn(move |_| {
                exits_clone.fetch_add(1, Ordering::SeqCst);
            })
            .build();

        logger.log(LogLevel::Fatal, "via log");
        assert_eq!(exits.load(Ordering::SeqCst), 1);
        assert_eq!(sink.lines().len(), 1);
    }

    #[test]
    fn test_calls_after_close_are_dropped() {
        let sink = MemorySink::new();
        let exits = Arc::new(AtomicUsize::new(0));
        let exits_clone = Arc::clone(&exits);
        let logger = Logger::builder()
            .sink(sink.clone())
            .exit_fn(move |_| {
                exits_clone.fetch_add(1, Ordering::SeqCst);
            })
            .build();

        logger.info("kept");
        assert!(logger.close());
        logger.info("late");
        logger.fatal("late fatal");

        assert_eq!(sink.lines().len(), 1);
        assert_eq!(exits.load(Ordering::SeqCst), 0);
        assert_eq!(logger.metrics().rejected_after_close(), 2);
        assert!(!logger.close());
    }

    #[test]
    fn test_unrepresentable_field_drops_every_event() {
        let sink = MemorySink::new();
        let mut bad = HashMap::new();
        bad.insert((1, 2), "tuple key");
        let logger = Logger::builder()
            .sink(sink.clone())
            .field_serialized("bad", &bad)
            .build();

        logger.info("one");
        logger.error("two");
        logger.close();

        assert!(sink.is_empty());
        assert_eq!(logger.metrics().encode_failures(), 2);
    }

    #[test]
    fn test_failing_display_keeps_partial_message() {
        struct Broken;
        impl fmt::Display for Broken {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("partial")?;
                Err(fmt::Error)
            }
        }

        let sink = MemorySink::new();
        let logger = quiet_logger(&sink);
        logger.infof(format_args!("got {} value", Broken));
        logger.close();

        assert_eq!(decode_all(&sink)[0].message(), "got partial");
    }

    #[test]
    fn test_drop_drains_without_exit() {
        let sink = MemorySink::new();
        let exits = Arc::new(AtomicUsize::new(0));
        let exits_clone = Arc::clone(&exits);
        {
            let logger = Logger::builder()
                .sink(sink.clone())
                .exit_fn(move |_| {
                    exits_clone.fetch_add(1, Ordering::SeqCst);
                })
                .build();
            for i in 0..10 {
                logger.info(format!("scoped {}", i));
            }
        }
        assert_eq!(sink.lines().len(), 10);
        assert_eq!(exits.load(Ordering::SeqCst), 0);
    }
}
