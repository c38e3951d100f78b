//! Emit a single record.

use anyhow::{bail, Context as _, Result};
use ctxlog_core::{config, Context, Level, LogConfig, LogFormat};
use serde_json::Value;
use std::path::PathBuf;

/// Arguments of `ctxlog emit`.
pub struct EmitArgs<'a> {
    pub config: Option<PathBuf>,
    pub level: &'a str,
    pub format: Option<LogFormat>,
    pub file: Option<PathBuf>,
    pub error: Option<&'a str>,
    pub stack: bool,
    pub caller: bool,
    pub message: &'a str,
    pub fields: &'a [(String, Value)],
}

pub async fn execute(args: EmitArgs<'_>) -> Result<()> {
    let level = Level::parse(args.level)?;
    let config = resolve_config(&args)?;
    let logger = config::init(&config).context("Failed to initialize logger")?;

    tracing::debug!(%level, ?config, "emitting record");

    let ctx = Context::background().with_logger(logger);
    ctx.scope(async move { emit(level, &args) }).await
}

fn resolve_config(args: &EmitArgs<'_>) -> Result<LogConfig> {
    let mut config = match &args.config {
        Some(path) => config::load(path)?,
        None => match config::default_path() {
            Some(path) => config::load(path)?,
            None => LogConfig::default(),
        },
    };

    if let Some(format) = args.format {
        config.format = format;
    }
    if let Some(file) = &args.file {
        config.file = Some(file.clone());
    }
    config.stacktrace |= args.stack;
    config.caller |= args.caller;

    Ok(config)
}

fn emit(level: Level, args: &EmitArgs<'_>) -> Result<()> {
    let ctx = Context::current();
    let fields = args.fields;

    match level {
        Level::Debug => ctxlog_core::debug(&ctx, args.message, fields),
        Level::Info => ctxlog_core::info(&ctx, args.message, fields),
        Level::Warn => ctxlog_core::warn(&ctx, args.message, fields),
        Level::Error => {
            let Some(text) = args.error else {
                bail!("an error record needs --error TEXT");
            };
            let err = anyhow::Error::msg(text.to_string());
            ctxlog_core::error(&ctx, &*err, args.message, fields)
        }
        Level::Fatal => ctxlog_core::fatal(&ctx, args.message, fields),
        Level::Panic => ctxlog_core::panic(&ctx, args.message, fields),
    }

    Ok(())
}
