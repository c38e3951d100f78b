//! Stack capture for error records.
//!
//! The standard library's backtrace is captured unconditionally (ignoring
//! `RUST_BACKTRACE`) and its symbolized text is split into structured
//! frames. Frames belonging to the capture machinery and to this crate's
//! emission path are dropped from the top, so the first frame is the code
//! that logged the error.

use serde::Serialize;
use std::backtrace::Backtrace;
use std::path::Path;

/// Function-name prefixes stripped from the top of a captured stack.
const INTERNAL_PREFIXES: &[&str] = &[
    "std::backtrace",
    "ctxlog_core::stack::capture",
    "ctxlog_core::logger::Logger::",
    "ctxlog_core::bridge::LoggerLayer",
    "<ctxlog_core::bridge::LoggerLayer",
    "tracing::",
    "tracing_core::",
    "tracing_subscriber::",
    "<tracing_subscriber::",
    "<tracing_core::",
    "std::thread::local::",
];

/// Placeholder printed for a frame without symbols.
const UNKNOWN_FUNC: &str = "<unknown>";

/// Forwarding functions stripped from the top of a captured stack.
const INTERNAL_FUNCS: &[&str] = &["ctxlog_core::error"];

/// One frame of a captured stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Frame {
    /// Demangled function path
    pub func: String,
    /// Line number, when debug info is available
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    /// Source file name without its directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Capture the current call stack.
#[inline(never)]
pub fn capture() -> Vec<Frame> {
    let backtrace = Backtrace::force_capture();
    trim(parse(&backtrace.to_string()))
}

/// Drop unsymbolized frames, then the internal frames on top.
fn trim(mut frames: Vec<Frame>) -> Vec<Frame> {
    frames.retain(|frame| frame.func != UNKNOWN_FUNC);

    let skip = frames
        .iter()
        .take_while(|frame| is_internal(&frame.func))
        .count();
    frames.drain(..skip);
    frames
}

fn is_internal(func: &str) -> bool {
    INTERNAL_PREFIXES.iter().any(|prefix| func.starts_with(prefix))
        || INTERNAL_FUNCS.contains(&func)
}

/// Parse the textual form of a backtrace.
///
/// Each frame is an `N: function` line optionally followed by an
/// `at path:line:column` line.
fn parse(text: &str) -> Vec<Frame> {
    let mut frames: Vec<Frame> = Vec::new();

    for line in text.lines() {
        let line = line.trim();

        if let Some(location) = line.strip_prefix("at ") {
            if let Some(frame) = frames.last_mut() {
                let (source, number) = split_location(location);
                frame.source = source;
                frame.line = number;
            }
            continue;
        }

        if let Some((index, func)) = line.split_once(": ") {
            if !index.is_empty() && index.chars().all(|c| c.is_ascii_digit()) {
                frames.push(Frame {
                    func: strip_hash(func).to_string(),
                    line: None,
                    source: None,
                });
            }
        }
    }

    frames
}

fn split_location(location: &str) -> (Option<String>, Option<u32>) {
    let mut parts = location.rsplitn(3, ':');
    let _column = parts.next();
    let line = parts.next().and_then(|l| l.parse().ok());
    let path = parts.next();

    let source = path.map(|p| {
        Path::new(p)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| p.to_string())
    });

    (source, line)
}

/// Drop the `::h0123456789abcdef` suffix of a legacy-mangled symbol.
fn strip_hash(func: &str) -> &str {
    match func.rsplit_once("::h") {
        Some((head, hash)) if hash.len() == 16 && hash.chars().all(|c| c.is_ascii_hexdigit()) => head,
        _ => func,
    }
}
