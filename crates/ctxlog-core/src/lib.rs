//! # ctxlog Core
//!
//! Leveled, structured logging that travels with a request context.
//!
//! This crate provides:
//!
//! - **Logger**: an immutable handle with a level, attached fields and an
//!   output; deriving a new handle never changes the old one
//! - **Output**: JSON or console records on stdout, files or any
//!   `tracing_subscriber` `MakeWriter`, with fan-out
//! - **Context**: bind a logger to a request-scoped [`Context`] and log
//!   through the free functions of this crate
//! - **Toggles**: process-wide stack capture on errors, caller annotation
//!   and a global level floor
//! - **Tracing bridge**: route `tracing` events through a logger
//! - **Configuration**: build everything from YAML plus environment
//!
//! ## Example
//!
//! ```rust
//! use ctxlog_core::{fields, output, Context, Level, Logger};
//!
//! let logger = Logger::new(Level::Debug)
//!     .output(output::plain_text())
//!     .with(fields!("service" => "billing"));
//! let ctx = Context::background().with_logger(logger);
//!
//! ctxlog_core::info(&ctx, "charge sent", [("amount", 1250)]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bridge;
pub mod config;
pub mod context;
pub mod fields;
pub mod logger;
pub mod output;
pub mod stack;
pub mod state;
pub mod term;
pub mod time;
pub mod util;

mod record;

// Re-export commonly used items
pub use bridge::{init_tracing, LoggerLayer};
pub use context::{from_context, to_context, Context};
pub use ctxlog_types::{Level, LogConfig, LogError, LogFormat, Result, Rotation};
pub use fields::{Fields, IntoFields};
pub use logger::Logger;
pub use output::{plain_text, write_to_file, Output, SharedBuffer};
pub use state::{
    caller_enabled, default_logger, global_level, reset_global_level, set_caller_enabled,
    set_default_logger, set_global_level, set_stacktrace_enabled, stacktrace_enabled,
};

/// ctxlog version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Parse a level name, clamping out-of-range values.
///
/// See [`Level::parse`].
pub fn parse_level(input: &str) -> Result<Level> {
    Level::parse(input)
}

/// Log at debug level through the logger bound to `ctx`.
#[track_caller]
pub fn debug(ctx: &Context, msg: impl AsRef<str>, fields: impl IntoFields) {
    ctx.logger().debug(msg, fields);
}

/// Log at info level through the logger bound to `ctx`.
#[track_caller]
pub fn info(ctx: &Context, msg: impl AsRef<str>, fields: impl IntoFields) {
    ctx.logger().info(msg, fields);
}

/// Log at warn level through the logger bound to `ctx`.
#[track_caller]
pub fn warn(ctx: &Context, msg: impl AsRef<str>, fields: impl IntoFields) {
    ctx.logger().warn(msg, fields);
}

/// Log `err` at error level through the logger bound to `ctx`.
#[track_caller]
pub fn error(ctx: &Context, err: &dyn std::error::Error, msg: impl AsRef<str>, fields: impl IntoFields) {
    ctx.logger().error(err, msg, fields);
}

/// Log at fatal level through the logger bound to `ctx`, then exit.
///
/// See [`Logger::fatal`]; this never returns.
#[track_caller]
pub fn fatal(ctx: &Context, msg: impl AsRef<str>, fields: impl IntoFields) -> ! {
    ctx.logger().fatal(msg, fields)
}

/// Log at panic level through the logger bound to `ctx`, then panic.
///
/// See [`Logger::panic`]; this never returns normally.
#[track_caller]
pub fn panic(ctx: &Context, msg: impl AsRef<str>, fields: impl IntoFields) -> ! {
    ctx.logger().panic(msg, fields)
}
