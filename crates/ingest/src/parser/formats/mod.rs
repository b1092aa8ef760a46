/// Individual platform log format parsers

pub mod android;
pub mod ios;

pub use android::AndroidLogParser;
pub use ios::IosLogParser;

use std::path::Path;

use chrono::NaiveDateTime;

use super::TIMESTAMP_FORMAT;

/// Advisory extension check shared by all variants.
pub(crate) fn has_log_extension(path: &Path) -> bool {
    match path.file_name().and_then(|n| n.to_str()) {
        Some(name) => {
            let name = name.to_ascii_lowercase();
            name.ends_with(".log") || name.ends_with(".txt")
        }
        None => false,
    }
}

/// Parse a matched timestamp substring. A malformed value yields `None`;
/// the surrounding event is still emitted.
pub(crate) fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT).ok()
}
