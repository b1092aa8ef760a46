use std::path::Path;

use tracing::warn;

use super::formats::{AndroidLogParser, IosLogParser};
use super::traits::{LogEvent, LogParser};

/// Ordered set of registered parsers.
///
/// Registration order is the dispatch order: for a given file the first
/// parser whose `parse` yields a non-empty result wins and the remaining
/// parsers are not tried. Adding a platform format means adding one
/// variant here; the dispatch logic never changes.
pub struct ParserRegistry {
    parsers: Vec<Box<dyn LogParser>>,
}

impl ParserRegistry {
    pub fn new() -> Self {
        Self::with_parsers(vec![
            Box::new(AndroidLogParser::new()),
            Box::new(IosLogParser::new()),
        ])
    }

    pub fn with_parsers(parsers: Vec<Box<dyn LogParser>>) -> Self {
        Self { parsers }
    }

    pub fn len(&self) -> usize {
        self.parsers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parsers.is_empty()
    }

    /// Run the file through the registered parsers in order.
    ///
    /// A parser error is absorbed here: it is logged and the next parser
    /// gets its turn, so a single unreadable attempt never fails the
    /// enclosing bundle. A file no parser matches contributes nothing.
    pub fn dispatch(&self, path: &Path) -> Vec<LogEvent> {
        for parser in &self.parsers {
            if !parser.supports(path) {
                continue;
            }
            match parser.parse(path) {
                Ok(events) if !events.is_empty() => return events,
                Ok(_) => continue,
                Err(e) => {
                    warn!(
                        "parser {} failed for file {}: {}",
                        parser.name(),
                        path.display(),
                        e
                    );
                }
            }
        }
        Vec::new()
    }
}

impl Default for ParserRegistry {
    fn default() -> Self {
        Self::new()
    }
}
