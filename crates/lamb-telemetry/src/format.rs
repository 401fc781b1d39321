// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Rendering of records into output lines.
//!
//! Two mutually exclusive styles exist:
//!
//! - human-readable: `[2025-01-31 12:00:00.042] [T:3] [Physics] [WARN] step overrun`
//! - structured: `{"timestamp":"…","thread":"…","subsystem":"…","level":"…","message":"…"}`
//!
//! Downstream tools parse these lines, so both layouts are fixed.

use lamb_core::{FormatOptions, Record, Severity};
use serde::Serialize;

/// `strftime` layout of the timestamp field (local time, milliseconds).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// ANSI sequence restoring the terminal's default color.
pub const COLOR_RESET: &str = "\x1b[0m";

// Field order is the on-disk order.
#[derive(Serialize)]
struct StructuredLine<'a> {
    timestamp: &'a str,
    thread: &'a str,
    subsystem: &'a str,
    level: &'a str,
    message: &'a str,
}

/// Renders a record as a single line, without the trailing newline.
pub fn format_line(record: &Record, structured: bool) -> String {
    let timestamp = record.timestamp().format(TIMESTAMP_FORMAT).to_string();
    if structured {
        format_structured(record, &timestamp)
    } else {
        format!(
            "[{timestamp}] [T:{}] [{}] [{}] {}",
            record.thread(),
            record.subsystem(),
            record.severity(),
            record.message()
        )
    }
}

fn format_structured(record: &Record, timestamp: &str) -> String {
    let thread = record.thread().to_string();
    let line = StructuredLine {
        timestamp,
        thread: &thread,
        subsystem: record.subsystem(),
        level: record.severity().as_str(),
        message: record.message(),
    };
    // serde_json escapes `"` `\` \b \f \n \r \t as two-character escapes and
    // every other byte below 0x20 as \u00xx. Serializing borrowed strings
    // cannot fail.
    serde_json::to_string(&line).unwrap_or_default()
}

/// ANSI color used for console lines of the given severity.
pub const fn color_for(severity: Severity) -> &'static str {
    match severity {
        Severity::Info => "\x1b[37m",
        Severity::Warning => "\x1b[33m",
        Severity::Error => "\x1b[31m",
    }
}

/// Decorates an already formatted line for the console.
pub fn console_line(severity: Severity, line: &str, options: &FormatOptions) -> String {
    if options.colored_console() {
        format!("{}{line}{COLOR_RESET}", color_for(severity))
    } else {
        line.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};
    use lamb_core::ThreadTag;
    use serde::Deserialize;

    fn record(severity: Severity, message: &str) -> Record {
        let timestamp = Local
            .with_ymd_and_hms(2025, 3, 14, 9, 26, 53)
            .unwrap()
            + chrono::Duration::milliseconds(58);
        Record::at(severity, "Physics", message, timestamp, ThreadTag(7))
    }

    // Raw (still escaped) text of the message field of a structured line.
    fn message_field(message: &str) -> String {
        let line = format_line(&record(Severity::Info, message), true);
        line.split_once("\"message\":\"")
            .and_then(|(_, rest)| rest.strip_suffix("\"}"))
            .unwrap()
            .to_string()
    }

    #[derive(Deserialize)]
    struct Parsed {
        timestamp: String,
        thread: String,
        subsystem: String,
        level: Severity,
        message: String,
    }

    #[test]
    fn test_human_readable_layout() {
        let line = format_line(&record(Severity::Warning, "step overrun"), false);
        assert_eq!(
            line,
            "[2025-03-14 09:26:53.058] [T:7] [Physics] [WARN] step overrun"
        );
    }

    #[test]
    fn test_structured_layout() {
        let line = format_line(&record(Severity::Error, "boom"), true);
        assert_eq!(
            line,
            r#"{"timestamp":"2025-03-14 09:26:53.058","thread":"7","subsystem":"Physics","level":"ERROR","message":"boom"}"#
        );
    }

    #[test]
    fn test_escape_rules() {
        assert_eq!(message_field("say \"hi\""), "say \\\"hi\\\"");
        assert_eq!(message_field("C:\\maps"), "C:\\\\maps");
        assert_eq!(message_field("a\u{8}b\u{c}c"), "a\\bb\\fc");
        assert_eq!(message_field("l1\nl2\r\tend"), "l1\\nl2\\r\\tend");
        assert_eq!(message_field("\u{1}\u{1f}"), "\\u0001\\u001f");
        assert_eq!(message_field("plain/text é"), "plain/text é");
    }

    #[test]
    fn test_structured_line_round_trips() {
        let message = "quote \" backslash \\ newline \n bell \u{7} tab \t";
        let original = record(Severity::Warning, message);
        let line = format_line(&original, true);

        assert!(!line.contains('\n'));
        let parsed: Parsed = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed.level, Severity::Warning);
        assert_eq!(parsed.subsystem, "Physics");
        assert_eq!(parsed.message, message);
        assert_eq!(parsed.thread, "7");
        assert_eq!(parsed.timestamp, "2025-03-14 09:26:53.058");
    }

    #[test]
    fn test_console_colors() {
        let colored = FormatOptions::new(true, true, false);
        let line = console_line(Severity::Error, "x", &colored);
        assert_eq!(line, "\x1b[31mx\x1b[0m");
        assert_eq!(console_line(Severity::Info, "x", &colored), "\x1b[37mx\x1b[0m");
        assert_eq!(console_line(Severity::Warning, "x", &colored), "\x1b[33mx\x1b[0m");

        let structured = FormatOptions::new(true, true, true);
        assert_eq!(console_line(Severity::Error, "x", &structured), "x");
        let plain = FormatOptions::new(true, false, false);
        assert_eq!(console_line(Severity::Error, "x", &plain), "x");
    }
}
