//! The logger handle and its emission methods.

use crate::fields::{Fields, IntoFields};
use crate::output::Output;
use crate::record::Record;
use crate::{stack, state, time};
use ctxlog_types::Level;
use std::error::Error;
use std::panic::Location;
use std::sync::Arc;

/// Exit status used by [`Logger::fatal`].
pub const FATAL_EXIT_CODE: i32 = 1;

/// A cheap, cloneable logging handle.
///
/// A `Logger` is a value: [`level`](Logger::level), [`with`](Logger::with)
/// and [`output`](Logger::output) return a new handle and leave the
/// original untouched. Handles only share the process-wide toggles in
/// [`crate::state`] and the writers they were given.
///
/// Every emission method is `#[track_caller]`, so caller annotation points
/// at the code calling it, including through the context-taking free
/// functions of this crate.
#[derive(Clone, Debug)]
pub struct Logger {
    level: Level,
    fields: Arc<Fields>,
    output: Output,
}

impl Logger {
    /// A timestamped JSON logger on stdout at `level`.
    pub fn new(level: Level) -> Self {
        Self {
            level,
            fields: Arc::new(Fields::new()),
            output: Output::stdout(),
        }
    }

    /// A logger at `level` with each output option applied in order.
    ///
    /// Options replace the destination, so the last one wins.
    pub fn new_with(level: Level, options: impl IntoIterator<Item = Output>) -> Self {
        options
            .into_iter()
            .fold(Self::new(level), |logger, output| logger.output(output))
    }

    /// The same logger with a different minimum level.
    pub fn level(&self, level: Level) -> Logger {
        Logger {
            level,
            ..self.clone()
        }
    }

    /// The same logger with `fields` attached to every record it writes.
    ///
    /// Fields accumulate across chained calls in attachment order.
    pub fn with(&self, fields: impl IntoFields) -> Logger {
        let mut accumulated = (*self.fields).clone();
        accumulated.extend(fields.into_fields());
        Logger {
            fields: Arc::new(accumulated),
            ..self.clone()
        }
    }

    /// The same logger writing to `output`.
    pub fn output(&self, output: Output) -> Logger {
        Logger {
            output,
            ..self.clone()
        }
    }

    /// The logger's own minimum level.
    pub fn current_level(&self) -> Level {
        self.level
    }

    /// Fields attached with [`Logger::with`].
    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    /// Whether a record at `level` would be written.
    pub fn enabled(&self, level: Level) -> bool {
        level >= self.level && state::passes_global_level(level)
    }

    /// Log at debug level.
    #[track_caller]
    pub fn debug(&self, msg: impl AsRef<str>, fields: impl IntoFields) {
        self.emit(Level::Debug, None, msg.as_ref(), fields, Some(call_site()));
    }

    /// Log at info level.
    #[track_caller]
    pub fn info(&self, msg: impl AsRef<str>, fields: impl IntoFields) {
        self.emit(Level::Info, None, msg.as_ref(), fields, Some(call_site()));
    }

    /// Log at warn level.
    #[track_caller]
    pub fn warn(&self, msg: impl AsRef<str>, fields: impl IntoFields) {
        self.emit(Level::Warn, None, msg.as_ref(), fields, Some(call_site()));
    }

    /// Log `err` at error level.
    ///
    /// The record's `error` field is the error's display text. When stack
    /// capture is enabled the record also carries the current stack.
    #[track_caller]
    pub fn error(&self, err: &dyn Error, msg: impl AsRef<str>, fields: impl IntoFields) {
        self.emit(
            Level::Error,
            Some(err.to_string()),
            msg.as_ref(),
            fields,
            Some(call_site()),
        );
    }

    /// Log at fatal level, then exit the process with status 1.
    ///
    /// This does not return and does not unwind: destructors of live
    /// values are not run. Records are flushed before exiting.
    #[track_caller]
    pub fn fatal(&self, msg: impl AsRef<str>, fields: impl IntoFields) -> ! {
        self.emit(Level::Fatal, None, msg.as_ref(), fields, Some(call_site()));
        std::process::exit(FATAL_EXIT_CODE)
    }

    /// Log at panic level, then panic with `msg`.
    ///
    /// This is not a normal return: the panic unwinds to the nearest
    /// `catch_unwind` (or aborts the thread). Use it for programmer errors,
    /// not for recoverable failures.
    #[track_caller]
    pub fn panic(&self, msg: impl AsRef<str>, fields: impl IntoFields) -> ! {
        let msg = msg.as_ref();
        self.emit(Level::Panic, None, msg, fields, Some(call_site()));
        panic!("{}", msg)
    }

    pub(crate) fn emit(
        &self,
        level: Level,
        error: Option<String>,
        msg: &str,
        fields: impl IntoFields,
        caller: Option<(&str, u32)>,
    ) {
        if !self.enabled(level) {
            return;
        }

        let stack = if level == Level::Error && state::stacktrace_enabled() {
            Some(stack::capture())
        } else {
            None
        };
        let caller = caller
            .filter(|_| state::caller_enabled())
            .map(|(file, line)| format!("{}:{}", file, line));

        let record = Record {
            level,
            time: time::now(),
            message: msg,
            context: &self.fields,
            stack,
            error,
            fields: fields.into_fields(),
            caller,
        };
        self.output.write(&record);
    }
}

impl Default for Logger {
    fn default() -> Self {
        state::default_logger()
    }
}

#[track_caller]
fn call_site() -> (&'static str, u32) {
    let location = Location::caller();
    (location.file(), location.line())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields;
    use crate::output::SharedBuffer;
    use serde_json::Value;
    use std::panic::AssertUnwindSafe;

    fn buffered(level: Level) -> (Logger, SharedBuffer) {
        let buf = SharedBuffer::new();
        let logger = Logger::new(level).output(Output::json(buf.clone()));
        (logger, buf)
    }

    fn records(buf: &SharedBuffer) -> Vec<Value> {
        buf.lines()
            .iter()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_level_suppresses_lower_records() {
        for (i, configured) in Level::ALL.into_iter().enumerate() {
            let (logger, buf) = buffered(configured);
            for emitted in &Level::ALL[..4] {
                logger.emit(*emitted, None, "m", (), None);
            }

            let written: Vec<String> = records(&buf)
                .iter()
                .map(|r| r["level"].as_str().unwrap().to_string())
                .collect();
            let expected: Vec<String> = Level::ALL[..4]
                .iter()
                .skip(i)
                .map(|l| l.as_str().to_string())
                .collect();
            assert_eq!(written, expected, "logger at {}", configured);
        }
    }

    #[test]
    fn test_derivation_leaves_original_untouched() {
        let (base, buf) = buffered(Level::Debug);
        let quiet = base.level(Level::Error);
        let tagged = base.with([("k", "v")]);

        assert_eq!(base.current_level(), Level::Debug);
        assert!(base.fields().is_empty());
        assert_eq!(tagged.fields().len(), 1);

        quiet.info("hidden", ());
        base.info("plain", ());
        tagged.info("tagged", ());

        let recs = records(&buf);
        assert_eq!(recs.len(), 2);
        assert!(recs[0].get("k").is_none());
        assert_eq!(recs[1]["k"], "v");
    }

    #[test]
    fn test_with_accumulates_in_order() {
        let (logger, buf) = buffered(Level::Debug);
        let logger = logger.with([("k1", "v1")]).with(fields!("k2" => 2));

        logger.info("first", ());
        logger.info("second", ());

        for line in buf.lines() {
            assert!(line.starts_with(r#"{"level":"info","k1":"v1","k2":2,"#), "{}", line);
        }
    }

    #[test]
    fn test_new_with_applies_options_in_order() {
        let first = SharedBuffer::new();
        let second = SharedBuffer::new();
        let logger = Logger::new_with(
            Level::Info,
            [Output::json(first.clone()), Output::console(second.clone())],
        );

        logger.warn("m", ());
        assert!(first.contents().is_empty());
        assert!(second.contents().contains("WRN"));
    }

    #[test]
    fn test_panic_unwinds_after_writing() {
        let (logger, buf) = buffered(Level::Debug);
        let result = std::panic::catch_unwind(AssertUnwindSafe(|| logger.panic("boom", [("k", 1)])));

        let payload = result.unwrap_err();
        assert_eq!(payload.downcast_ref::<String>().map(String::as_str), Some("boom"));

        let recs = records(&buf);
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0]["level"], "panic");
        assert_eq!(recs[0]["message"], "boom");
        assert_eq!(recs[0]["k"], 1);
    }
}
