//! The one-call entry points: parse + match, and parse + match + repair.

use thiserror::Error;
use whiff_core::{CatalogError, Config, Matcher, RepairOutcome, Violation};
use whiff_rules::default_catalog;
use whiff_syntax::ParseError;

/// Errors from the one-call API.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The source could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// The default catalog failed to build.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// The result of a full detect-and-repair pass over one source.
#[derive(Debug)]
pub struct RepairReport {
    /// Violations found before any repair ran, in reporting order.
    pub violations: Vec<Violation>,
    /// Outcome per violation, index-aligned with `violations`.
    pub outcomes: Vec<RepairOutcome>,
    /// The repaired source, line endings normalized to `\n`.
    pub output: String,
}

impl RepairReport {
    /// Number of violations that were successfully repaired.
    #[must_use]
    pub fn repaired_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_repaired()).count()
    }

    /// Number of repairs that ran and failed.
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failed()).count()
    }
}

/// Parses a Dockerfile source and runs the default catalog over it.
///
/// # Errors
///
/// Returns [`EngineError::Parse`] on malformed input.
pub fn parse_and_match(source: &str) -> Result<Vec<Violation>, EngineError> {
    parse_and_match_with(source, Config::default())
}

/// Like [`parse_and_match`], with rule configuration applied.
///
/// # Errors
///
/// Returns [`EngineError::Parse`] on malformed input.
pub fn parse_and_match_with(source: &str, config: Config) -> Result<Vec<Violation>, EngineError> {
    let tree = whiff_syntax::parse(source)?;
    let catalog = default_catalog()?;
    Ok(Matcher::with_config(&catalog, config).match_all(&tree))
}

/// Parses, matches, repairs every repairable violation, and re-serializes.
///
/// # Errors
///
/// Returns [`EngineError::Parse`] on malformed input. Individual repair
/// failures do not error; they are reported per violation in the
/// [`RepairReport`].
pub fn repair_source(source: &str) -> Result<RepairReport, EngineError> {
    repair_source_with(source, Config::default())
}

/// Like [`repair_source`], with rule configuration applied.
///
/// # Errors
///
/// Returns [`EngineError::Parse`] on malformed input.
pub fn repair_source_with(source: &str, config: Config) -> Result<RepairReport, EngineError> {
    let mut tree = whiff_syntax::parse(source)?;
    let catalog = default_catalog()?;
    let matcher = Matcher::with_config(&catalog, config);
    let violations = matcher.match_all(&tree);
    let outcomes = matcher.repair_all(&mut tree, &violations);
    let output = tree.serialize(true);
    Ok(RepairReport {
        violations,
        outcomes,
        output,
    })
}
