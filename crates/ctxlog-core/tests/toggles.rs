//! Process-wide toggles: caller annotation, stack capture, global level.
//!
//! These tests change global state, so each one holds `LOCK` and restores
//! the defaults before releasing it.

use ctxlog_core::{
    config, Context, Level, LogConfig, Logger, LoggerLayer, Output, SharedBuffer,
};
use once_cell::sync::Lazy;
use parking_lot::{Mutex, MutexGuard};
use serde_json::Value;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use tracing_subscriber::layer::SubscriberExt;

static LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

struct Guard(#[allow(dead_code)] MutexGuard<'static, ()>);

impl Drop for Guard {
    fn drop(&mut self) {
        ctxlog_core::set_caller_enabled(false);
        ctxlog_core::set_stacktrace_enabled(false);
        ctxlog_core::reset_global_level();
        ctxlog_core::set_default_logger(Logger::new(Level::Error));
    }
}

fn lock() -> Guard {
    Guard(LOCK.lock())
}

fn json_context() -> (Context, SharedBuffer) {
    let buf = SharedBuffer::new();
    let logger = Logger::new(Level::Debug).output(Output::json(buf.clone()));
    (Context::background().with_logger(logger), buf)
}

fn records(buf: &SharedBuffer) -> Vec<Value> {
    buf.lines()
        .iter()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

fn test_error() -> io::Error {
    io::Error::new(io::ErrorKind::Other, "test error")
}

#[test]
fn caller_points_at_the_logging_line() {
    let _guard = lock();
    ctxlog_core::set_caller_enabled(true);
    let (ctx, buf) = json_context();

    let expected_free = format!("{}:{}", file!(), line!() + 1);
    ctxlog_core::info(&ctx, "through context", ());
    let expected_method = format!("{}:{}", file!(), line!() + 1);
    ctx.logger().warn("through logger", ());

    let recs = records(&buf);
    assert_eq!(recs.len(), 2);
    assert_eq!(recs[0]["caller"], Value::from(expected_free));
    assert_eq!(recs[1]["caller"], Value::from(expected_method));
}

#[test]
fn caller_is_omitted_when_disabled() {
    let _guard = lock();
    ctxlog_core::set_caller_enabled(false);
    let (ctx, buf) = json_context();

    ctxlog_core::info(&ctx, "m", ());

    assert!(records(&buf)[0].get("caller").is_none());
}

#[test]
fn caller_toggle_applies_to_existing_loggers() {
    let _guard = lock();
    let (ctx, buf) = json_context();

    ctxlog_core::info(&ctx, "before", ());
    ctxlog_core::set_caller_enabled(true);
    ctxlog_core::info(&ctx, "after", ());

    let recs = records(&buf);
    assert!(recs[0].get("caller").is_none());
    assert!(recs[1]["caller"].as_str().unwrap().contains("toggles.rs"));
}

#[test]
fn error_records_carry_stack_when_enabled() {
    let _guard = lock();
    ctxlog_core::set_stacktrace_enabled(true);
    let (ctx, buf) = json_context();

    ctxlog_core::error(&ctx, &test_error(), "errorMsg", ());

    let recs = records(&buf);
    let stack = recs[0]["stack"].as_array().expect("stack array");
    assert!(!stack.is_empty());
    assert!(
        stack[0]["func"]
            .as_str()
            .unwrap()
            .contains("error_records_carry_stack_when_enabled"),
        "top frame should be the logging code: {:?}",
        stack[0]
    );
    assert!(stack.iter().all(|frame| frame["func"].is_string()));
    assert_eq!(recs[0]["error"], "test error");
}

#[test]
fn bridged_error_stack_starts_at_the_event_site() {
    let _guard = lock();
    ctxlog_core::set_stacktrace_enabled(true);
    let buf = SharedBuffer::new();
    let logger = Logger::new(Level::Debug).output(Output::json(buf.clone()));
    let subscriber = tracing_subscriber::registry().with(LoggerLayer::new(logger));

    tracing::subscriber::with_default(subscriber, || {
        tracing::error!("bridged failure");
    });

    let recs = records(&buf);
    let stack = recs[0]["stack"].as_array().expect("stack array");
    let top = stack[0]["func"].as_str().unwrap();
    assert!(
        top.contains("bridged_error_stack_starts_at_the_event_site"),
        "top frame should be the event site: {}",
        top
    );
}

#[test]
fn only_error_records_carry_stack() {
    let _guard = lock();
    ctxlog_core::set_stacktrace_enabled(true);
    let (ctx, buf) = json_context();

    ctxlog_core::debug(&ctx, "d", ());
    ctxlog_core::info(&ctx, "i", ());
    ctxlog_core::warn(&ctx, "w", ());
    let _ = panic::catch_unwind(AssertUnwindSafe(|| ctxlog_core::panic(&ctx, "p", ())));

    let recs = records(&buf);
    assert_eq!(recs.len(), 4);
    for rec in recs {
        assert!(rec.get("stack").is_none(), "{}", rec);
    }
}

#[test]
fn stack_is_omitted_when_disabled() {
    let _guard = lock();
    ctxlog_core::set_stacktrace_enabled(false);
    let (ctx, buf) = json_context();

    ctxlog_core::error(&ctx, &test_error(), "errorMsg", ());

    assert!(records(&buf)[0].get("stack").is_none());
}

#[test]
fn global_level_floors_every_logger() {
    let _guard = lock();
    let (ctx, buf) = json_context();

    ctxlog_core::set_global_level(Level::Warn);
    assert_eq!(ctxlog_core::global_level(), Some(Level::Warn));
    ctxlog_core::info(&ctx, "hidden", ());
    ctxlog_core::warn(&ctx, "shown", ());

    ctxlog_core::reset_global_level();
    assert_eq!(ctxlog_core::global_level(), None);
    ctxlog_core::info(&ctx, "shown again", ());

    let messages: Vec<String> = records(&buf)
        .iter()
        .map(|r| r["message"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(messages, vec!["shown", "shown again"]);
}

#[test]
fn global_level_does_not_lower_logger_level() {
    let _guard = lock();
    let buf = SharedBuffer::new();
    let logger = Logger::new(Level::Error).output(Output::json(buf.clone()));

    ctxlog_core::set_global_level(Level::Debug);
    logger.info("hidden", ());

    assert!(buf.contents().is_empty());
}

#[test]
fn config_init_applies_toggles_and_default_logger() {
    let _guard = lock();
    let config = LogConfig {
        level: Level::Warn,
        stacktrace: true,
        caller: true,
        global_level: Some(Level::Info),
        ..LogConfig::default()
    };

    let logger = config::init(&config).unwrap();

    assert_eq!(logger.current_level(), Level::Warn);
    assert!(ctxlog_core::stacktrace_enabled());
    assert!(ctxlog_core::caller_enabled());
    assert_eq!(ctxlog_core::global_level(), Some(Level::Info));
    assert_eq!(Context::background().logger().current_level(), Level::Warn);

    let config = LogConfig::default();
    config::init(&config).unwrap();
    assert!(!ctxlog_core::stacktrace_enabled());
    assert!(!ctxlog_core::caller_enabled());
    assert_eq!(ctxlog_core::global_level(), None);
}
