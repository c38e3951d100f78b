//! Timestamp formatting for records.

use chrono::{DateTime, Local, SecondsFormat};

/// Current local time.
pub fn now() -> DateTime<Local> {
    Local::now()
}

/// RFC 3339 with whole seconds and the local offset, as written in JSON records.
pub fn rfc3339(timestamp: &DateTime<Local>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Secs, false)
}

/// Short clock time (`3:04PM`) used by the console format.
pub fn kitchen(timestamp: &DateTime<Local>) -> String {
    timestamp.format("%-I:%M%p").to_string()
}
