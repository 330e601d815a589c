//! Command implementations.

pub mod analyze;
pub mod output;
pub mod repair;
pub mod rules;

use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;
use whiff::Config;

/// Display name used for stdin input in reports and diff headers.
pub const STDIN_NAME: &str = "Dockerfile";

/// Reads the Dockerfile to process, returning its display name and content.
pub fn read_input(file: Option<&Path>, stdin: bool) -> Result<(String, String)> {
    if stdin {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .context("failed to read from stdin")?;
        return Ok((STDIN_NAME.to_string(), content));
    }
    let path = file.context("no input: pass a file or --stdin")?;
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    Ok((path.display().to_string(), content))
}

/// Loads configuration: the `--config` path if given, `./whiff.toml` if it
/// exists, defaults otherwise.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    if let Some(path) = explicit {
        return Config::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()));
    }
    let default = Path::new("whiff.toml");
    if default.exists() {
        tracing::debug!("using ./whiff.toml");
        return Config::from_file(default).context("failed to load ./whiff.toml");
    }
    Ok(Config::default())
}
