//! CLI structure and command definitions.

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use ctxlog_types::LogFormat;
use serde_json::Value;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ctxlog")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Emit and inspect structured log records", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (defaults to <config dir>/ctxlog/config.yml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Emit one record through a configured logger
    Emit {
        /// Level of the record (debug, info, warn, error, fatal, panic)
        #[arg(short, long, default_value = "info")]
        level: String,

        /// Record format on stdout (overrides the configuration)
        #[arg(short, long, value_parser = parse_format)]
        format: Option<LogFormat>,

        /// Also write JSON records to this file
        #[arg(long)]
        file: Option<PathBuf>,

        /// Error text attached to an error record
        #[arg(short, long)]
        error: Option<String>,

        /// Attach a stack trace to error records
        #[arg(long)]
        stack: bool,

        /// Attach the caller's file and line
        #[arg(long)]
        caller: bool,

        /// Record message
        message: String,

        /// Event fields; values are read as JSON, falling back to a string
        #[arg(value_name = "KEY=VALUE", value_parser = parse_field)]
        fields: Vec<(String, Value)>,
    },

    /// Parse a level name and print the level it resolves to
    Level {
        /// Level name or number
        #[arg(allow_hyphen_values = true)]
        name: String,
    },
}

impl Cli {
    pub async fn execute(&self) -> Result<()> {
        use crate::commands::*;

        match &self.command {
            Commands::Emit {
                level,
                format,
                file,
                error,
                stack,
                caller,
                message,
                fields,
            } => {
                let args = emit::EmitArgs {
                    config: self.config.clone(),
                    level,
                    format: *format,
                    file: file.clone(),
                    error: error.as_deref(),
                    stack: *stack,
                    caller: *caller,
                    message,
                    fields,
                };
                emit::execute(args).await
            }
            Commands::Level { name } => level::execute(name),
        }
    }
}

fn parse_format(s: &str) -> Result<LogFormat> {
    Ok(s.parse()?)
}

fn parse_field(s: &str) -> Result<(String, Value)> {
    let (key, raw) = s
        .split_once('=')
        .ok_or_else(|| anyhow!("expected KEY=VALUE, got '{}'", s))?;
    if key.is_empty() {
        return Err(anyhow!("empty key in '{}'", s));
    }

    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((key.to_string(), value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_field() {
        assert_eq!(parse_field("n=3").unwrap(), ("n".to_string(), Value::from(3)));
        assert_eq!(parse_field("ok=true").unwrap().1, Value::Bool(true));
        assert_eq!(parse_field("user=ann").unwrap().1, Value::from("ann"));
        assert_eq!(parse_field("eq=a=b").unwrap().1, Value::from("a=b"));
        assert_eq!(parse_field("list=[1,2]").unwrap().1, serde_json::json!([1, 2]));
        assert!(parse_field("novalue").is_err());
        assert!(parse_field("=v").is_err());
    }
}
