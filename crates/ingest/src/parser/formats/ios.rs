use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use regex::Regex;
use tracing::debug;

use super::{has_log_extension, parse_timestamp};
use crate::parser::traits::{LogEvent, LogParser, ParseError};

/// Tag applied to every iOS event; the format carries no tag field.
const IOS_TAG: &str = "iOS";

/// Parser for iOS console logs.
///
/// Example: `2025-06-25 12:30:04.094 MyApp[123:456] <Error>: crash detected`
pub struct IosLogParser {
    pattern: Regex,
}

impl IosLogParser {
    pub fn new() -> Self {
        let pattern = Regex::new(
            r"^(?P<time>\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}\.\d{3}) .*?<(?P<level>[A-Za-z]+)>: (?P<msg>.*)$",
        )
        .expect("Failed to compile iOS pattern");
        Self { pattern }
    }
}

impl Default for IosLogParser {
    fn default() -> Self {
        Self::new()
    }
}

impl LogParser for IosLogParser {
    fn supports(&self, path: &Path) -> bool {
        has_log_extension(path)
    }

    fn parse(&self, path: &Path) -> Result<Vec<LogEvent>, ParseError> {
        let reader = BufReader::new(File::open(path)?);
        let mut events = Vec::new();
        for line in reader.lines() {
            let line = line?;
            let caps = match self.pattern.captures(&line) {
                Some(caps) => caps,
                None => continue,
            };
            events.push(LogEvent::matched(
                parse_timestamp(&caps["time"]),
                &caps["level"],
                IOS_TAG,
                &caps["msg"],
                &line,
            ));
        }
        debug!(
            "iOS parser produced {} events from {}",
            events.len(),
            path.display()
        );
        Ok(events)
    }

    fn name(&self) -> &'static str {
        "ios"
    }
}
