//! Event structure

use super::field::Fields;
use super::log_level::LogLevel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One log occurrence.
///
/// Field order and key names are the wire format: `time`, `level`,
/// `message`, `fields` (omitted when empty), `file` (omitted when the call
/// site is unknown).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    time: DateTime<Utc>,
    level: LogLevel,
    message: String,
    #[serde(default, skip_serializing_if = "Fields::is_empty")]
    fields: Fields,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    file: Option<String>,
}

impl Event {
    /// Capture an event now.
    pub fn new(
        level: LogLevel,
        message: impl Into<String>,
        fields: Fields,
        file: Option<String>,
    ) -> Self {
        Self::at(Utc::now(), level, message, fields, file)
    }

    /// Build an event with an explicit timestamp.
    pub fn at(
        time: DateTime<Utc>,
        level: LogLevel,
        message: impl Into<String>,
        fields: Fields,
        file: Option<String>,
    ) -> Self {
        Self {
            time,
            level,
            message: message.into(),
            fields,
            file,
        }
    }

    pub fn time(&self) -> DateTime<Utc> {
        self.time
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    /// The `"path:line"` call site, if it was resolved
    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }
}
