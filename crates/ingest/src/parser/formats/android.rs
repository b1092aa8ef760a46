use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use regex::Regex;
use tracing::debug;

use super::{has_log_extension, parse_timestamp};
use crate::parser::traits::{LogEvent, LogParser, ParseError};

/// Parser for Android diagnostic logs.
///
/// Two wire formats are emitted by different Android logging pipelines and
/// both are handled here, bracketed first with the structured layout as
/// fallback:
///
/// - bracketed:  `[I]|2025-06-30 15:08:56.004|MOD|TAG123|hello world`
/// - structured: `I|2025-06-30 15:08:56.004||0|M:Core|T:Net|Q:main|D:connected`
pub struct AndroidLogParser {
    bracketed: Regex,
    structured: Regex,
}

impl AndroidLogParser {
    pub fn new() -> Self {
        let bracketed = Regex::new(
            r"^\[(?P<level>[A-Z])\]\|(?P<time>\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}\.\d{3})\|(?:.*\|)?(?P<tag>[A-Za-z0-9_]+)\|(?P<msg>.*)$",
        )
        .expect("Failed to compile bracketed Android pattern");
        let structured = Regex::new(
            r"^(?P<level>[A-Z])\|(?P<time>\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}\.\d{3})\|.*?\|T:(?P<tag>[^|]+)\|.*?D:(?P<msg>.*)$",
        )
        .expect("Failed to compile structured Android pattern");
        Self {
            bracketed,
            structured,
        }
    }
}

impl Default for AndroidLogParser {
    fn default() -> Self {
        Self::new()
    }
}

impl LogParser for AndroidLogParser {
    fn supports(&self, path: &Path) -> bool {
        has_log_extension(path)
    }

    fn parse(&self, path: &Path) -> Result<Vec<LogEvent>, ParseError> {
        let reader = BufReader::new(File::open(path)?);
        let mut events = Vec::new();
        for line in reader.lines() {
            let line = line?;
            let caps = match self
                .bracketed
                .captures(&line)
                .or_else(|| self.structured.captures(&line))
            {
                Some(caps) => caps,
                None => continue,
            };
            events.push(LogEvent::matched(
                parse_timestamp(&caps["time"]),
                &caps["level"],
                &caps["tag"],
                &caps["msg"],
                &line,
            ));
        }
        debug!(
            "Android parser produced {} events from {}",
            events.len(),
            path.display()
        );
        Ok(events)
    }

    fn name(&self) -> &'static str {
        "android"
    }
}
