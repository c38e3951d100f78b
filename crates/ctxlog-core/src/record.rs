//! A single log event and its two renderings.

use crate::fields::Fields;
use crate::stack::Frame;
use crate::{term, time};
use chrono::{DateTime, Local};
use ctxlog_types::Level;
use serde_json::Value;

/// Everything written for one event.
#[derive(Debug)]
pub(crate) struct Record<'a> {
    pub level: Level,
    pub time: DateTime<Local>,
    pub message: &'a str,
    /// Fields attached to the logger with `with`
    pub context: &'a Fields,
    pub stack: Option<Vec<Frame>>,
    pub error: Option<String>,
    /// Fields passed to this call
    pub fields: Fields,
    pub caller: Option<String>,
}

impl Record<'_> {
    /// One JSON object followed by a newline.
    ///
    /// Key order: `level`, logger fields, `stack`, `error`, call fields,
    /// `caller`, `time`, `message`.
    pub fn to_json_line(&self) -> String {
        let mut line = String::from("{");
        push_entry(&mut line, "level", &Value::from(self.level.as_str()));

        for (key, value) in self.context.iter() {
            push_entry(&mut line, key, value);
        }
        if let Some(stack) = &self.stack {
            let frames = serde_json::to_value(stack).unwrap_or(Value::Null);
            push_entry(&mut line, "stack", &frames);
        }
        if let Some(error) = &self.error {
            push_entry(&mut line, "error", &Value::from(error.as_str()));
        }
        for (key, value) in self.fields.iter() {
            push_entry(&mut line, key, value);
        }
        if let Some(caller) = &self.caller {
            push_entry(&mut line, "caller", &Value::from(caller.as_str()));
        }
        push_entry(&mut line, "time", &Value::from(time::rfc3339(&self.time)));
        push_entry(&mut line, "message", &Value::from(self.message));

        line.push_str("}\n");
        line
    }

    /// One human-readable line: `3:04PM INF caller > message error=... k=v`.
    pub fn to_console_line(&self, color: bool) -> String {
        let mut parts = vec![
            term::dim(&time::kitchen(&self.time), color),
            term::level_label(self.level, color),
        ];

        if let Some(caller) = &self.caller {
            parts.push(term::dim(&format!("{} >", caller), color));
        }
        if !self.message.is_empty() {
            parts.push(self.message.to_string());
        }
        if let Some(error) = &self.error {
            parts.push(format!(
                "{}{}",
                term::field_name("error", color),
                term::error_value(&console_string(error), color)
            ));
        }
        for (key, value) in self.context.iter().chain(self.fields.iter()) {
            parts.push(format!("{}{}", term::field_name(key, color), console_value(value)));
        }
        if let Some(stack) = &self.stack {
            let frames = serde_json::to_value(stack).unwrap_or(Value::Null);
            parts.push(format!("{}{}", term::field_name("stack", color), frames));
        }

        let mut line = parts.join(" ");
        line.push('\n');
        line
    }
}

/// Append `"key":value`, comma-separated. Repeated keys are written again.
fn push_entry(line: &mut String, key: &str, value: &Value) {
    if line.len() > 1 {
        line.push(',');
    }
    line.push_str(&Value::from(key).to_string());
    line.push(':');
    line.push_str(&value.to_string());
}

fn console_value(value: &Value) -> String {
    match value {
        Value::String(s) => console_string(s),
        other => other.to_string(),
    }
}

/// Quote strings that would be ambiguous unquoted.
fn console_string(s: &str) -> String {
    let needs_quote = s.is_empty()
        || s.chars().any(|c| c.is_whitespace() || c.is_control() || c == '"' || c == '=');
    if needs_quote {
        format!("{:?}", s)
    } else {
        s.to_string()
    }
}
