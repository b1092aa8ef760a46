use std::path::Path;

pub use super::model::{LogEvent, ParseError};

/// Capability contract for one platform log format.
///
/// `supports` is an advisory filename check, expected to be consulted
/// before `parse`. A parser must still tolerate files that do not match
/// its pattern: read line by line and emit nothing, never error on
/// non-matching content.
pub trait LogParser: Send + Sync {
    /// Advisory filename-based check.
    fn supports(&self, path: &Path) -> bool;

    /// Parse a file into a finite sequence of events, possibly empty.
    fn parse(&self, path: &Path) -> Result<Vec<LogEvent>, ParseError>;

    /// Short name for logging.
    fn name(&self) -> &'static str;
}
