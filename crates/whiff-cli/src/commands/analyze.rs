//! Analyze command implementation.

use anyhow::{Context, Result};
use std::path::Path;

use crate::commands::{load_config, read_input};
use crate::OutputFormat;

/// Runs the analyze command.
pub fn run(
    file: Option<&Path>,
    stdin: bool,
    format: OutputFormat,
    config: Option<&Path>,
) -> Result<()> {
    let (name, source) = read_input(file, stdin)?;
    let config = load_config(config)?;

    let violations =
        whiff::parse_and_match_with(&source, config).context("failed to analyze input")?;
    tracing::debug!(count = violations.len(), "analysis complete");

    super::output::print(&violations, format, &name, &source)
}
