//! Configuration types and structures.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use crate::{Level, LogFormat, Rotation};

/// Logger configuration.
///
/// Every field has a default, so an empty YAML document is a valid
/// configuration: info level, JSON on stdout, no toggles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Minimum level of the configured logger
    #[serde(default = "default_level")]
    pub level: Level,

    /// Record format written to stdout
    #[serde(default)]
    pub format: LogFormat,

    /// Log file; when set, JSON records also go to this file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,

    /// Rotation policy of `file`
    #[serde(default)]
    pub rotation: Rotation,

    /// Whether error records carry a stack trace
    #[serde(default)]
    pub stacktrace: bool,

    /// Whether records carry the caller's file and line
    #[serde(default)]
    pub caller: bool,

    /// Process-wide floor applied beneath every logger's own level
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_level: Option<Level>,
}

fn default_level() -> Level {
    Level::Info
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::default(),
            file: None,
            rotation: Rotation::default(),
            stacktrace: false,
            caller: false,
            global_level: None,
        }
    }
}
