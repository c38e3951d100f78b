//! Configuration loading and logger initialization.
//!
//! A [`LogConfig`] is resolved from layers, highest priority first:
//! 1. Environment variables (`CTXLOG_LEVEL`, `CTXLOG_FORMAT`, `CTXLOG_FILE`,
//!    `CTXLOG_STACKTRACE`, `CTXLOG_CALLER`)
//! 2. Values loaded from a YAML file
//! 3. Default values
//!
//! ## Example
//!
//! ```rust,ignore
//! use ctxlog_core::config;
//!
//! let config = config::load("~/.config/ctxlog/config.yml")?;
//! let logger = config::init(&config)?;
//! logger.info("configured", ());
//! ```

use crate::logger::Logger;
use crate::output::{self, Output};
use crate::{state, util};
use ctxlog_types::{bail, LogConfig, LogError, LogFormat, Result, Rotation};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_appender::rolling::{self, RollingFileAppender};

/// Environment variable overriding `level`.
pub const ENV_LEVEL: &str = "CTXLOG_LEVEL";
/// Environment variable overriding `format`.
pub const ENV_FORMAT: &str = "CTXLOG_FORMAT";
/// Environment variable overriding `file`.
pub const ENV_FILE: &str = "CTXLOG_FILE";
/// Environment variable overriding `stacktrace`.
pub const ENV_STACKTRACE: &str = "CTXLOG_STACKTRACE";
/// Environment variable overriding `caller`.
pub const ENV_CALLER: &str = "CTXLOG_CALLER";

/// Configuration layer priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConfigLayer {
    /// Default values
    Default = 0,
    /// Values loaded from file
    Loaded = 1,
    /// Values from environment variables
    Environment = 2,
}

/// Load configuration from `path` and the process environment.
///
/// A missing file is not an error; defaults and environment still apply.
pub fn load(path: impl AsRef<Path>) -> Result<LogConfig> {
    load_with_env(path, |key| std::env::var(key).ok())
}

/// Load configuration from `path`, reading overrides through `env`.
pub fn load_with_env(
    path: impl AsRef<Path>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<LogConfig> {
    let path = util::expand_path(path);
    let mut layers = HashMap::new();

    layers.insert(ConfigLayer::Default, serde_json::to_value(LogConfig::default())?);

    if path.exists() {
        let content = fs::read_to_string(&path)
            .map_err(|e| LogError::Config(format!("Failed to read config file: {}", e)))?;

        let value: Value = serde_yaml::from_str(&content)?;

        if !value.is_null() {
            layers.insert(ConfigLayer::Loaded, value);
        }
    }

    layers.insert(ConfigLayer::Environment, env_layer(env)?);

    let mut merged = Value::Object(Map::new());
    for layer in [ConfigLayer::Default, ConfigLayer::Loaded, ConfigLayer::Environment] {
        if let Some(layer_data) = layers.remove(&layer) {
            merged = util::deep_merge(merged, layer_data);
        }
    }

    serde_json::from_value(merged)
        .map_err(|e| LogError::Config(format!("Failed to parse log config: {}", e)))
}

fn env_layer(env: impl Fn(&str) -> Option<String>) -> Result<Value> {
    let mut layer = Map::new();

    if let Some(level) = env(ENV_LEVEL) {
        layer.insert("level".to_string(), Value::String(level));
    }
    if let Some(format) = env(ENV_FORMAT) {
        let format: LogFormat = format.parse()?;
        layer.insert("format".to_string(), serde_json::to_value(format)?);
    }
    if let Some(file) = env(ENV_FILE) {
        layer.insert("file".to_string(), Value::String(file));
    }
    if let Some(flag) = env(ENV_STACKTRACE) {
        layer.insert("stacktrace".to_string(), Value::Bool(parse_flag(ENV_STACKTRACE, &flag)?));
    }
    if let Some(flag) = env(ENV_CALLER) {
        layer.insert("caller".to_string(), Value::Bool(parse_flag(ENV_CALLER, &flag)?));
    }

    Ok(Value::Object(layer))
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => bail!(Config, "Invalid value for {}: {}", key, value),
    }
}

/// Default configuration file location (`<config dir>/ctxlog/config.yml`).
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("ctxlog").join("config.yml"))
}

/// Apply `config` to the process and build its logger.
///
/// Sets the stack-capture and caller toggles and the global level floor,
/// builds the logger, and installs it as the default logger returned for
/// contexts without one. With `file` set, records go to stdout in the
/// configured format and to the file as JSON.
pub fn init(config: &LogConfig) -> Result<Logger> {
    state::set_stacktrace_enabled(config.stacktrace);
    state::set_caller_enabled(config.caller);
    match config.global_level {
        Some(level) => state::set_global_level(level),
        None => state::reset_global_level(),
    }

    let logger = Logger::new(config.level).output(build_output(config)?);
    state::set_default_logger(logger.clone());

    tracing::debug!(
        level = %config.level,
        format = %config.format,
        file = ?config.file,
        "logger initialized"
    );

    Ok(logger)
}

/// Build the output described by `config`.
pub fn build_output(config: &LogConfig) -> Result<Output> {
    let stdout = match config.format {
        LogFormat::Json => Output::stdout(),
        LogFormat::Console => output::plain_text(),
    };

    match &config.file {
        Some(path) => Ok(stdout.tee(Output::json(file_appender(path, config.rotation)?))),
        None => Ok(stdout),
    }
}

fn file_appender(path: &Path, rotation: Rotation) -> Result<RollingFileAppender> {
    let path = util::expand_path(path);
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| LogError::Config(format!("Invalid log file path: {}", path.display())))?;
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    fs::create_dir_all(&directory)?;

    RollingFileAppender::builder()
        .rotation(appender_rotation(rotation))
        .filename_prefix(file_name)
        .build(&directory)
        .map_err(|e| LogError::Config(format!("Failed to open log file {}: {}", path.display(), e)))
}

fn appender_rotation(rotation: Rotation) -> rolling::Rotation {
    match rotation {
        Rotation::Never => rolling::Rotation::NEVER,
        Rotation::Minutely => rolling::Rotation::MINUTELY,
        Rotation::Hourly => rolling::Rotation::HOURLY,
        Rotation::Daily => rolling::Rotation::DAILY,
    }
}
