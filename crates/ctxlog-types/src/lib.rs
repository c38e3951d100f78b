//! # ctxlog Types
//!
//! Core types shared across all ctxlog crates.
//!
//! This crate provides the fundamental building blocks for the ctxlog
//! logging facade, including:
//!
//! - The ordered severity [`Level`] with lenient, clamping parsing
//! - Output format and rotation enums used by configuration
//! - The [`LogConfig`] structure loaded from YAML
//! - Error types and result aliases
//!
//! ## Example
//!
//! ```
//! use ctxlog_types::Level;
//!
//! let level = Level::parse("warn").unwrap();
//! assert_eq!(level, Level::Warn);
//! assert!(Level::Debug < level);
//!
//! // Levels below debug are clamped rather than rejected.
//! assert_eq!(Level::parse("trace").unwrap(), Level::Debug);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod errors;
pub mod enums;
pub mod config;

// Re-export common types for convenience
pub use errors::{LevelError, LogError, Result};
pub use enums::{Level, LogFormat, Rotation};
pub use config::LogConfig;
