//! Violations and repair outcomes.

use crate::rule::{RepairError, RuleGroup};
use miette::{Diagnostic, SourceSpan};
use serde::Serialize;
use whiff_syntax::{NodeId, Span};

/// Source location of a violation, derived from the matched node's span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Location {
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
    /// Byte offset in the source.
    pub offset: usize,
    /// Length of the span in bytes.
    pub length: usize,
}

impl From<Span> for Location {
    fn from(span: Span) -> Self {
        Self {
            line: span.line,
            column: span.column,
            offset: span.offset,
            length: span.length,
        }
    }
}

/// One rule firing at one tree location.
///
/// A violation observes its matched node; it does not own it. Violations
/// are only meaningful against the tree state they were matched on — do
/// not carry them across a repair pass into a new match pass.
#[derive(Debug, Clone, Serialize)]
pub struct Violation {
    /// Name of the rule that fired.
    pub rule: &'static str,
    /// Group of the rule that fired.
    pub group: RuleGroup,
    /// Human-readable message.
    pub message: String,
    /// Where the smell was found.
    pub location: Location,
    /// The matched node.
    pub node: NodeId,
    /// Whether the rule defines a repair for this violation.
    pub repairable: bool,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{}] at {}:{}: {}",
            self.rule, self.group, self.location.line, self.location.column, self.message
        )
    }
}

/// Converts a [`Violation`] into a rich diagnostic for terminal rendering.
#[derive(Debug, thiserror::Error, Diagnostic)]
#[error("{message}")]
pub struct ViolationDiagnostic {
    message: String,
    #[help]
    help: Option<String>,
    #[label("{label}")]
    span: SourceSpan,
    label: String,
}

impl From<&Violation> for ViolationDiagnostic {
    fn from(v: &Violation) -> Self {
        Self {
            message: v.message.clone(),
            help: v
                .repairable
                .then(|| "a repair is available: run `whiff repair`".to_string()),
            span: SourceSpan::from((v.location.offset, v.location.length)),
            label: v.rule.to_string(),
        }
    }
}

/// What happened when one violation's repair was attempted.
///
/// Every violation moves through exactly one of these states, once:
/// detected, then repaired, failed, or skipped. There is no way back to
/// detected; a new matcher pass produces new violations.
#[derive(Debug)]
pub enum RepairOutcome {
    /// The repair mutated the tree successfully.
    Repaired,
    /// The repair ran and failed; the tree region was left unchanged.
    RepairFailed(RepairError),
    /// The rule defines no repair.
    RepairSkipped,
}

impl RepairOutcome {
    /// Whether the repair succeeded.
    #[must_use]
    pub fn is_repaired(&self) -> bool {
        matches!(self, Self::Repaired)
    }

    /// Whether the repair ran and failed.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::RepairFailed(_))
    }

    /// Whether no repair was defined.
    #[must_use]
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::RepairSkipped)
    }
}

impl std::fmt::Display for RepairOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repaired => write!(f, "repaired"),
            Self::RepairFailed(err) => write!(f, "repair failed: {err}"),
            Self::RepairSkipped => write!(f, "no repair defined"),
        }
    }
}
