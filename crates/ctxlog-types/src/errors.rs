//! Error types for ctxlog operations.

use thiserror::Error;

/// Failure of the raw level-name parser.
///
/// This is always wrapped in [`LogError::ParseLevel`] together with the
/// offending input before it reaches a caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LevelError {
    /// Neither a known level name nor an integer
    #[error("unknown level string '{0}'")]
    Unknown(String),

    /// An integer that does not fit the level range
    #[error("out-of-bounds level '{0}'")]
    OutOfBounds(i64),
}

/// The main error type for ctxlog operations.
#[derive(Error, Debug)]
pub enum LogError {
    /// A level name could not be parsed
    #[error("cannot parse log level \"{input}\": {source}")]
    ParseLevel {
        /// The string that was rejected
        input: String,
        /// The underlying parser failure
        #[source]
        source: LevelError,
    },

    /// Configuration-related error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

/// A specialized Result type for ctxlog operations.
pub type Result<T> = std::result::Result<T, LogError>;

/// Helper macro to bail out with a LogError
///
/// # Example
///
/// ```ignore
/// if !valid {
///     bail!(Config, "invalid value for {}: {}", key, value);
/// }
/// ```
#[macro_export]
macro_rules! bail {
    ($variant:ident, $msg:expr) => {
        return Err($crate::LogError::$variant($msg.to_string()))
    };
    ($variant:ident, $fmt:expr, $($arg:tt)*) => {
        return Err($crate::LogError::$variant(format!($fmt, $($arg)*)))
    };
}
