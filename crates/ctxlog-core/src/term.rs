//! Terminal helpers for the console format.

use colored::*;
use ctxlog_types::Level;
use std::io::{self, IsTerminal};

/// Check if stdout is attached to a terminal.
pub fn in_controlling_terminal() -> bool {
    io::stdout().is_terminal()
}

/// Level abbreviation, coloured by severity when `color` is set.
pub fn level_label(level: Level, color: bool) -> String {
    let label = level.abbreviation();
    if !color {
        return label.to_string();
    }

    match level {
        Level::Debug => label.yellow().to_string(),
        Level::Info => label.green().to_string(),
        Level::Warn => label.red().to_string(),
        Level::Error | Level::Fatal | Level::Panic => label.red().bold().to_string(),
    }
}

/// Dimmed text (timestamps, caller, separators).
pub fn dim(text: &str, color: bool) -> String {
    if color {
        text.bright_black().to_string()
    } else {
        text.to_string()
    }
}

/// Field name followed by `=`.
pub fn field_name(name: &str, color: bool) -> String {
    if color {
        format!("{}=", name).cyan().to_string()
    } else {
        format!("{}=", name)
    }
}

/// Value of the `error` field.
pub fn error_value(text: &str, color: bool) -> String {
    if color {
        text.red().to_string()
    } else {
        text.to_string()
    }
}
