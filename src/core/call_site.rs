//! Call-site resolution for the `file` key of each record
//!
//! Every public logging entry point is `#[track_caller]`, so the location
//! handed to the resolver is the user's call (or macro invocation), never an
//! internal helper frame.

use std::panic::Location;
use std::sync::Arc;

/// Turns the tracked caller location into the `"path:line"` string written to
/// the `file` key. Returning `None` omits the key from the record.
pub type CallSiteFn = Arc<dyn Fn(&'static Location<'static>) -> Option<String> + Send + Sync>;

/// Format a location as `"path:line"`.
pub fn file_and_line(location: &Location<'_>) -> String {
    format!("{}:{}", location.file(), location.line())
}

/// The resolver used unless the builder overrides it.
pub fn default_resolver() -> CallSiteFn {
    Arc::new(|location| Some(file_and_line(location)))
}
