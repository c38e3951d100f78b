//! Bridge from the `tracing` crate into a [`Logger`].
//!
//! [`LoggerLayer`] is a `tracing-subscriber` layer that turns every tracing
//! event into one record of the wrapped logger, so libraries instrumented
//! with `tracing` macros end up in the same output as direct calls.
//!
//! # Usage
//!
//! ```rust,ignore
//! use ctxlog_core::{init_tracing, Level, Logger};
//!
//! init_tracing(Logger::new(Level::Info))?;
//! tracing::info!(user = "ann", "signed in");
//! ```

use crate::fields::Fields;
use crate::logger::Logger;
use ctxlog_types::{Level, LogError, Result};
use std::fmt;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

/// A tracing layer writing events through a [`Logger`].
#[derive(Debug, Clone)]
pub struct LoggerLayer {
    logger: Logger,
}

impl LoggerLayer {
    /// Create a layer writing through `logger`.
    pub fn new(logger: Logger) -> Self {
        Self { logger }
    }

    /// Map a tracing level onto a record level.
    ///
    /// `TRACE` has no counterpart and is clamped to [`Level::Debug`].
    fn map_level(level: &tracing::Level) -> Level {
        match *level {
            tracing::Level::TRACE | tracing::Level::DEBUG => Level::Debug,
            tracing::Level::INFO => Level::Info,
            tracing::Level::WARN => Level::Warn,
            tracing::Level::ERROR => Level::Error,
        }
    }
}

impl<S> Layer<S> for LoggerLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let level = Self::map_level(metadata.level());
        if !self.logger.enabled(level) {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let mut fields = Fields::new();
        fields.push("target", metadata.target());
        fields.extend(visitor.fields);

        let caller = metadata.file().zip(metadata.line());
        self.logger.emit(
            level,
            visitor.error,
            visitor.message.as_deref().unwrap_or_default(),
            fields,
            caller,
        );
    }
}

/// Collects the message, an `error` value and all other fields of an event.
#[derive(Default)]
struct EventVisitor {
    message: Option<String>,
    error: Option<String>,
    fields: Fields,
}

impl Visit for EventVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_owned());
        } else {
            self.fields.push(field.name(), value);
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.fields.push(field.name(), value);
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.fields.push(field.name(), value);
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.fields.push(field.name(), value);
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.fields.push(field.name(), value);
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        if field.name() == "error" {
            self.error = Some(value.to_string());
        } else {
            self.fields.push(field.name(), value.to_string());
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{:?}", value));
        } else {
            self.fields.push(field.name(), format!("{:?}", value));
        }
    }
}

/// Install a global tracing subscriber writing through `logger`.
///
/// Fails if a global subscriber is already set.
pub fn init_tracing(logger: Logger) -> Result<()> {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    tracing_subscriber::registry()
        .with(LoggerLayer::new(logger))
        .try_init()
        .map_err(|e| LogError::Other(format!("Failed to install tracing subscriber: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::{Output, SharedBuffer};
    use serde_json::Value;
    use tracing_subscriber::layer::SubscriberExt;

    fn capture(level: Level, f: impl FnOnce()) -> Vec<Value> {
        let buf = SharedBuffer::new();
        let logger = Logger::new(level).output(Output::json(buf.clone()));
        let subscriber = tracing_subscriber::registry().with(LoggerLayer::new(logger));

        tracing::subscriber::with_default(subscriber, f);

        buf.lines()
            .iter()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_event_becomes_record() {
        let records = capture(Level::Debug, || {
            tracing::info!(target: "billing", user = "ann", attempts = 3, "charge sent");
        });

        assert_eq!(records.len(), 1);
        let rec = &records[0];
        assert_eq!(rec["level"], "info");
        assert_eq!(rec["message"], "charge sent");
        assert_eq!(rec["target"], "billing");
        assert_eq!(rec["user"], "ann");
        assert_eq!(rec["attempts"], 3);
    }

    #[test]
    fn test_error_field_is_lifted() {
        let err = std::io::Error::new(std::io::ErrorKind::Other, "disk gone");
        let records = capture(Level::Debug, || {
            tracing::error!(error = &err as &(dyn std::error::Error + 'static), "write failed");
        });

        assert_eq!(records[0]["level"], "error");
        assert_eq!(records[0]["error"], "disk gone");
    }

    #[test]
    fn test_logger_level_filters_events() {
        let records = capture(Level::Warn, || {
            tracing::trace!("too quiet");
            tracing::info!("still too quiet");
            tracing::warn!("loud enough");
        });

        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["message"], "loud enough");
    }

    #[test]
    fn test_map_level() {
        assert_eq!(LoggerLayer::map_level(&tracing::Level::TRACE), Level::Debug);
        assert_eq!(LoggerLayer::map_level(&tracing::Level::ERROR), Level::Error);
    }
}
