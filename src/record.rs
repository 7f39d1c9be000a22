//! Captured diagnostic records and their on-disk rendering.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Severity classification mirroring the host runtime's diagnostic levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    /// Informational output.
    Info,
    /// Warning conditions that should be noted.
    Warning,
    /// Recoverable errors.
    Error,
    /// Uncaught exceptions surfaced by the host.
    Exception,
    /// Failed assertions.
    Assert,
}

impl Severity {
    /// Returns the capitalized name written into the log file.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "Info",
            Severity::Warning => "Warning",
            Severity::Error => "Error",
            Severity::Exception => "Exception",
            Severity::Assert => "Assert",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One captured diagnostic event.
///
/// The timestamp is assigned once at construction from local wall-clock time
/// and never changes afterwards, so a record drained long after ingestion
/// still carries its capture time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogRecord {
    /// Primary log text.
    pub message: String,
    /// Auxiliary context such as a stack trace. May be empty.
    pub detail: String,
    /// Host-provided severity classification.
    pub severity: Severity,
    /// Capture time, `yyyy-MM-dd HH:mm:ss:ffff`.
    pub timestamp: String,
}

impl LogRecord {
    /// Creates a record stamped with the current local time.
    pub fn new(message: &str, detail: &str, severity: Severity) -> Self {
        Self {
            message: message.to_string(),
            detail: detail.to_string(),
            severity,
            timestamp: format_timestamp(Local::now()),
        }
    }

    /// Renders the record in the file format:
    ///
    /// ```text
    /// <timestamp>  <Severity>  <message>
    /// <detail>
    ///
    /// ```
    ///
    /// Two-space separators, the detail on its own line, then a blank line.
    pub fn render(&self) -> String {
        format!(
            "{}  {}  {}  \n{}\n\n",
            self.timestamp, self.severity, self.message, self.detail
        )
    }
}

/// Formats a local time as `yyyy-MM-dd HH:mm:ss:ffff`.
///
/// chrono has no four-digit fraction specifier, so the trailing field
/// (tenths of a millisecond) is derived from the sub-second microseconds.
pub fn format_timestamp(at: DateTime<Local>) -> String {
    format!(
        "{}:{:04}",
        at.format("%Y-%m-%d %H:%M:%S"),
        at.timestamp_subsec_micros() / 100
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_severity_as_str() {
        assert_eq!(Severity::Info.as_str(), "Info");
        assert_eq!(Severity::Warning.as_str(), "Warning");
        assert_eq!(Severity::Error.as_str(), "Error");
        assert_eq!(Severity::Exception.as_str(), "Exception");
        assert_eq!(Severity::Assert.as_str(), "Assert");
    }

    #[test]
    fn test_severity_display() {
        assert_eq!(format!("{}", Severity::Warning), "Warning");
    }

    #[test]
    fn test_format_timestamp() {
        let at = Local
            .with_ymd_and_hms(2024, 5, 1, 23, 59, 59)
            .unwrap()
            .checked_add_signed(chrono::Duration::microseconds(123_456))
            .unwrap();
        assert_eq!(format_timestamp(at), "2024-05-01 23:59:59:1234");
    }

    #[test]
    fn test_format_timestamp_zero_fraction_padded() {
        let at = Local.with_ymd_and_hms(2024, 5, 2, 0, 0, 1).unwrap();
        assert_eq!(format_timestamp(at), "2024-05-02 00:00:01:0000");
    }

    #[test]
    fn test_record_timestamp_assigned_at_construction() {
        let record = LogRecord::new("boot", "", Severity::Info);
        // yyyy-MM-dd HH:mm:ss:ffff is always 24 characters.
        assert_eq!(record.timestamp.len(), 24);
        let cloned = record.clone();
        assert_eq!(cloned.timestamp, record.timestamp);
    }

    #[test]
    fn test_render_format() {
        let record = LogRecord {
            message: "something failed".to_string(),
            detail: "at main.rs:10".to_string(),
            severity: Severity::Error,
            timestamp: "2024-05-01 12:00:00:0000".to_string(),
        };
        assert_eq!(
            record.render(),
            "2024-05-01 12:00:00:0000  Error  something failed  \nat main.rs:10\n\n"
        );
    }

    #[test]
    fn test_render_empty_detail() {
        let record = LogRecord {
            message: "ping".to_string(),
            detail: String::new(),
            severity: Severity::Info,
            timestamp: "2024-05-01 12:00:00:0000".to_string(),
        };
        // Empty detail still produces its line and the trailing blank line.
        assert!(record.render().ends_with("ping  \n\n\n"));
    }
}
