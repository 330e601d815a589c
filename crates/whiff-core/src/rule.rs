//! The rule trait and rule groups.

use crate::query::Query;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use whiff_syntax::{NodeId, Tree, TreeError};

/// The body of practice a rule was derived from.
///
/// Grouping is metadata for listing and filtering; it has no effect on
/// matching semantics or ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleGroup {
    /// Rules specific to this project.
    Whiff,
    /// Rules derived from the binnacle best-practices study.
    Binnacle,
    /// Rules derived from the hadolint linter.
    Hadolint,
}

impl std::fmt::Display for RuleGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Whiff => write!(f, "whiff"),
            Self::Binnacle => write!(f, "binnacle"),
            Self::Hadolint => write!(f, "hadolint"),
        }
    }
}

/// Errors from applying a repair.
#[derive(Debug, Error)]
pub enum RepairError {
    /// The rule defines no repair.
    #[error("rule '{rule}' does not define a repair")]
    Unsupported {
        /// Name of the rule.
        rule: &'static str,
    },
    /// The matched node no longer satisfies the rule's structural
    /// precondition (typically mutated by an earlier repair in the batch).
    #[error("repair target no longer satisfies the rule's precondition")]
    PreconditionFailed,
    /// A tree mutation was rejected.
    #[error(transparent)]
    Tree(#[from] TreeError),
}

/// One smell definition: a query to find candidate nodes, an optional
/// confirmation step for conditions the query algebra cannot express
/// (absences, cross-sibling checks), and an optional repair.
///
/// # Example
///
/// ```ignore
/// struct NoSudo;
///
/// impl Rule for NoSudo {
///     fn name(&self) -> &'static str { "no-sudo" }
///     fn group(&self) -> RuleGroup { RuleGroup::Hadolint }
///     fn query(&self) -> Query {
///         Query::within(
///             Query::kind(NodeKind::ShellCommand),
///             Query::all([Query::kind(NodeKind::CommandName), Query::value("sudo")]),
///         )
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// The kebab-case name of this rule, unique within a catalog.
    fn name(&self) -> &'static str;

    /// The group this rule belongs to.
    fn group(&self) -> RuleGroup;

    /// A brief description of the smell.
    fn description(&self) -> &'static str {
        ""
    }

    /// The query locating candidate nodes. Built once at catalog
    /// registration and reused for every matcher pass.
    fn query(&self) -> Query;

    /// A post-filter over query matches; return `false` to drop a
    /// candidate. The default confirms everything.
    fn confirm(&self, _tree: &Tree, _node: NodeId) -> bool {
        true
    }

    /// The message reported for a match. Defaults to [`Rule::description`].
    fn message(&self, _tree: &Tree, _node: NodeId) -> String {
        self.description().to_string()
    }

    /// Whether this rule can rewrite matched nodes.
    fn supports_repair(&self) -> bool {
        false
    }

    /// Rewrites the smell at `node` in place.
    ///
    /// A repair must only touch the subtree of its matched node plus, for
    /// insertion, direct siblings or the parent. It may fail when an
    /// earlier repair in the same batch has already restructured the
    /// region.
    ///
    /// # Errors
    ///
    /// [`RepairError::Unsupported`] by default; implementations return
    /// [`RepairError::PreconditionFailed`] or a [`TreeError`] when the
    /// target no longer has the expected shape.
    fn repair(&self, _tree: &mut Tree, _node: NodeId) -> Result<(), RepairError> {
        Err(RepairError::Unsupported { rule: self.name() })
    }
}

/// Type alias for boxed rule trait objects.
pub type RuleBox = Box<dyn Rule>;

#[cfg(test)]
mod tests {
    use super::*;
    use whiff_syntax::NodeKind;

    struct TestRule;

    impl Rule for TestRule {
        fn name(&self) -> &'static str {
            "test-rule"
        }
        fn group(&self) -> RuleGroup {
            RuleGroup::Whiff
        }
        fn description(&self) -> &'static str {
            "a test rule"
        }
        fn query(&self) -> Query {
            Query::kind(NodeKind::ShellCommand)
        }
    }

    #[test]
    fn defaults_are_detect_only() {
        let rule = TestRule;
        assert!(!rule.supports_repair());
        let mut tree = whiff_syntax::parse("RUN ls\n").expect("parse failed");
        let node = tree.root();
        assert!(matches!(
            rule.repair(&mut tree, node),
            Err(RepairError::Unsupported { rule: "test-rule" })
        ));
    }

    #[test]
    fn group_display_is_lowercase() {
        assert_eq!(RuleGroup::Binnacle.to_string(), "binnacle");
        assert_eq!(RuleGroup::Hadolint.to_string(), "hadolint");
        assert_eq!(RuleGroup::Whiff.to_string(), "whiff");
    }
}
