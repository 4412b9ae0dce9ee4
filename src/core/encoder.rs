//! JSON-lines encoding of events
//!
//! One event becomes one compact JSON object with no trailing newline. The
//! pipeline appends the record separator when the record is queued.

use super::error::Result;
use super::event::Event;

/// Terminates every record handed to a sink.
pub const RECORD_SEPARATOR: &[u8] = b"\n";

/// Serialize an event to a single compact JSON record.
///
/// Fails only when a field holds an unrepresentable value.
pub fn encode(event: &Event) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(event)?)
}

/// Parse one record back into an event. Surrounding whitespace, including a
/// trailing separator, is ignored.
pub fn decode(record: &[u8]) -> Result<Event> {
    Ok(serde_json::from_slice(record.trim_ascii())?)
}
