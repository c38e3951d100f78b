//! Process-wide logging state.
//!
//! Three atomics are read by every emission call on every thread: the
//! stack-capture toggle, the caller-annotation toggle and the global level
//! floor. A change is visible to calls issued after it; calls racing the
//! change may observe either value.
//!
//! The default logger, returned for contexts without a bound logger, lives
//! here too.

use crate::logger::Logger;
use ctxlog_types::Level;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, AtomicI8, Ordering};

/// Raw floor that lets every level through.
const RAW_TRACE: i8 = -1;

static STACKTRACE_ENABLED: AtomicBool = AtomicBool::new(false);
static CALLER_ENABLED: AtomicBool = AtomicBool::new(false);
static GLOBAL_LEVEL: AtomicI8 = AtomicI8::new(RAW_TRACE);

static DEFAULT_LOGGER: Lazy<RwLock<Logger>> =
    Lazy::new(|| RwLock::new(Logger::new(Level::Error)));

/// Attach a stack trace to every error record, on every logger.
pub fn set_stacktrace_enabled(enabled: bool) {
    STACKTRACE_ENABLED.store(enabled, Ordering::Relaxed);
}

/// Whether error records carry a stack trace.
pub fn stacktrace_enabled() -> bool {
    STACKTRACE_ENABLED.load(Ordering::Relaxed)
}

/// Attach the caller's `file:line` to every record, on every logger.
pub fn set_caller_enabled(enabled: bool) {
    CALLER_ENABLED.store(enabled, Ordering::Relaxed);
}

/// Whether records carry the caller's location.
pub fn caller_enabled() -> bool {
    CALLER_ENABLED.load(Ordering::Relaxed)
}

/// Set a floor beneath every logger's own level.
///
/// A record is written only if its level passes both the logger's level
/// and this floor.
pub fn set_global_level(level: Level) {
    GLOBAL_LEVEL.store(level.as_raw(), Ordering::Relaxed);
}

/// Remove the global floor.
pub fn reset_global_level() {
    GLOBAL_LEVEL.store(RAW_TRACE, Ordering::Relaxed);
}

/// The global floor, if one is set.
pub fn global_level() -> Option<Level> {
    let raw = GLOBAL_LEVEL.load(Ordering::Relaxed);
    (raw > RAW_TRACE).then(|| Level::from_raw(raw))
}

pub(crate) fn passes_global_level(level: Level) -> bool {
    level.as_raw() >= GLOBAL_LEVEL.load(Ordering::Relaxed)
}

/// The logger used for contexts that have none bound.
///
/// Until replaced with [`set_default_logger`] this writes JSON to stdout
/// at [`Level::Error`].
pub fn default_logger() -> Logger {
    DEFAULT_LOGGER.read().clone()
}

/// Replace the default logger.
pub fn set_default_logger(logger: Logger) {
    *DEFAULT_LOGGER.write() = logger;
}
