use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// One structured record extracted from a single log line.
///
/// Only ever created by a successful format match; lines matching no
/// pattern produce no event. Immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEvent {
    /// Owning bundle. Parsers emit events unbound; the pipeline attaches
    /// the id via [`LogEvent::bind`] before persisting.
    pub bundle_id: String,
    /// Parsed point in time; `None` when the line's timestamp substring
    /// failed to parse. Never defaulted.
    pub timestamp: Option<NaiveDateTime>,
    /// Raw level token from the source line (`E`, `W`, `Error`, ...),
    /// not normalized at parse time.
    pub level: String,
    /// Component label; a synthetic constant for formats without one.
    pub tag: String,
    /// Decoded message body.
    pub message: String,
    /// The original unmodified line, retained for traceability.
    pub raw_line: String,
}

impl LogEvent {
    /// Build an event from matched line fields, not yet tied to a bundle.
    pub fn matched(
        timestamp: Option<NaiveDateTime>,
        level: impl Into<String>,
        tag: impl Into<String>,
        message: impl Into<String>,
        raw_line: impl Into<String>,
    ) -> Self {
        Self {
            bundle_id: String::new(),
            timestamp,
            level: level.into(),
            tag: tag.into(),
            message: message.into(),
            raw_line: raw_line.into(),
        }
    }

    /// Attach the owning bundle id.
    pub fn bind(mut self, bundle_id: &str) -> Self {
        self.bundle_id = bundle_id.to_string();
        self
    }
}
