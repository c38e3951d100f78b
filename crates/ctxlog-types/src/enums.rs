//! Common enumerations used throughout ctxlog.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use crate::errors::{LevelError, LogError, Result};

/// Raw value of the `trace` name, one step below [`Level::Debug`].
const RAW_TRACE: i8 = -1;
/// Raw value produced by the empty string.
const RAW_NO_LEVEL: i8 = 6;
/// Raw value of the `disabled` name.
const RAW_DISABLED: i8 = 7;

/// Log severity, ordered from least to most severe.
///
/// The discriminants match the raw values understood by [`Level::parse`],
/// so names outside the supported range (`trace`, `disabled`) and plain
/// integers can be clamped onto this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
#[repr(i8)]
pub enum Level {
    /// Debug messages
    Debug = 0,
    /// Informational messages
    Info = 1,
    /// Warnings
    Warn = 2,
    /// Errors
    Error = 3,
    /// Unrecoverable errors; the process exits after logging
    Fatal = 4,
    /// Programmer errors; the caller unwinds after logging
    Panic = 5,
}

impl Level {
    /// Least severe level a logger may be configured with.
    pub const MIN: Level = Level::Debug;
    /// Most severe level a logger may be configured with.
    pub const MAX: Level = Level::Panic;

    /// All levels in ascending order.
    pub const ALL: [Level; 6] = [
        Level::Debug,
        Level::Info,
        Level::Warn,
        Level::Error,
        Level::Fatal,
        Level::Panic,
    ];

    /// Parse a level name, clamping out-of-range values.
    ///
    /// Accepts the names `trace`, `debug`, `info`, `warn` (or `warning`),
    /// `error`, `fatal`, `panic` and `disabled` in any case, the empty
    /// string, and integers that fit in an `i8`. Anything that parses but
    /// falls outside [`Level::MIN`]..=[`Level::MAX`] is clamped to the
    /// nearest bound and reported through a `tracing` warning; only
    /// unparseable input is an error.
    pub fn parse(input: &str) -> Result<Level> {
        let raw = parse_raw(input).map_err(|source| LogError::ParseLevel {
            input: input.to_string(),
            source,
        })?;

        if raw < Level::MIN.as_raw() {
            tracing::warn!(level = input, "log level less than min allowed");
        } else if raw > Level::MAX.as_raw() {
            tracing::warn!(level = input, "log level greater than max allowed");
        }

        Ok(Level::from_raw(raw))
    }

    /// Map a raw value onto a level, saturating at both ends.
    pub fn from_raw(raw: i8) -> Level {
        match raw {
            i8::MIN..=0 => Level::Debug,
            1 => Level::Info,
            2 => Level::Warn,
            3 => Level::Error,
            4 => Level::Fatal,
            _ => Level::Panic,
        }
    }

    /// The raw numeric value of this level.
    pub fn as_raw(self) -> i8 {
        self as i8
    }

    /// Lowercase name, as written in JSON records.
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
            Level::Fatal => "fatal",
            Level::Panic => "panic",
        }
    }

    /// Three-letter abbreviation used by the console format.
    pub fn abbreviation(self) -> &'static str {
        match self {
            Level::Debug => "DBG",
            Level::Info => "INF",
            Level::Warn => "WRN",
            Level::Error => "ERR",
            Level::Fatal => "FTL",
            Level::Panic => "PNC",
        }
    }
}

fn parse_raw(input: &str) -> std::result::Result<i8, LevelError> {
    match input.to_ascii_lowercase().as_str() {
        "trace" => Ok(RAW_TRACE),
        "debug" => Ok(Level::Debug.as_raw()),
        "info" => Ok(Level::Info.as_raw()),
        "warn" | "warning" => Ok(Level::Warn.as_raw()),
        "error" => Ok(Level::Error.as_raw()),
        "fatal" => Ok(Level::Fatal.as_raw()),
        "panic" => Ok(Level::Panic.as_raw()),
        "disabled" => Ok(RAW_DISABLED),
        "" => Ok(RAW_NO_LEVEL),
        other => {
            let value: i64 = other
                .parse()
                .map_err(|_| LevelError::Unknown(input.to_string()))?;
            i8::try_from(value).map_err(|_| LevelError::OutOfBounds(value))
        }
    }
}

impl FromStr for Level {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self> {
        Level::parse(s)
    }
}

impl TryFrom<String> for Level {
    type Error = LogError;

    fn try_from(value: String) -> Result<Self> {
        Level::parse(&value)
    }
}

impl From<Level> for &'static str {
    fn from(level: Level) -> Self {
        level.as_str()
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Record format of an output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per line
    #[default]
    Json,
    /// Human-readable single line with level abbreviations
    Console,
}

impl FromStr for LogFormat {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "console" | "plain" | "text" => Ok(LogFormat::Console),
            _ => Err(LogError::Config(format!("Invalid log format: {}", s))),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Json => write!(f, "json"),
            LogFormat::Console => write!(f, "console"),
        }
    }
}

/// How often a configured log file is rolled over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rotation {
    /// A single file that grows forever
    #[default]
    Never,
    /// A new file every minute
    Minutely,
    /// A new file every hour
    Hourly,
    /// A new file every day
    Daily,
}
