//! Resolve a level name.

use anyhow::Result;
use colored::Colorize;
use ctxlog_core::Level;

pub fn execute(name: &str) -> Result<()> {
    let level = Level::parse(name)?;

    println!("{}", level);
    if name.trim() != level.as_str() {
        eprintln!("{} {} -> {}", "Resolved:".dimmed(), name, level.abbreviation());
    }

    Ok(())
}
