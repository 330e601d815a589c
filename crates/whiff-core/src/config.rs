//! TOML configuration for enabling and disabling rules.

use crate::rule::RuleGroup;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config file '{path}'")]
    Io {
        /// Path of the config file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid TOML or has the wrong shape.
    #[error("failed to parse config: {message}")]
    Parse {
        /// Parser message.
        message: String,
    },
}

/// Per-rule settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleConfig {
    /// Explicit enable or disable for one rule. Overrides group selection.
    pub enabled: Option<bool>,
}

/// Engine configuration.
///
/// ```toml
/// groups = ["binnacle", "hadolint"]
///
/// [rules.no-sudo]
/// enabled = false
/// ```
///
/// With no `groups` key every group is active. A `rules.<name>.enabled`
/// entry always wins over the group selection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Groups to run. `None` means all groups.
    pub groups: Option<Vec<RuleGroup>>,
    /// Per-rule overrides, keyed by rule name.
    #[serde(default)]
    pub rules: HashMap<String, RuleConfig>,
}

impl Config {
    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] on invalid TOML or unknown keys.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|err| ConfigError::Parse {
            message: err.to_string(),
        })
    }

    /// Loads configuration from a file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the file cannot be read and
    /// [`ConfigError::Parse`] when its content is invalid.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Whether a rule should run under this configuration.
    #[must_use]
    pub fn is_rule_enabled(&self, name: &str, group: RuleGroup) -> bool {
        if let Some(rule) = self.rules.get(name) {
            if let Some(enabled) = rule.enabled {
                return enabled;
            }
        }
        match &self.groups {
            Some(groups) => groups.contains(&group),
            None => true,
        }
    }
}
