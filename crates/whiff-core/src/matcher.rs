//! The matcher: evaluates every catalog rule against one tree and drives
//! the sequential repair pass.

use crate::catalog::RuleCatalog;
use crate::config::Config;
use crate::rule::Rule;
use crate::violation::{RepairOutcome, Violation};
use tracing::{debug, warn};
use whiff_syntax::{NodeId, Tree};

/// Evaluates all rules of a catalog against a parsed tree.
///
/// Matching is read-only and idempotent. The returned violations are
/// ordered first by rule registration order, then by pre-order match order
/// within each rule; that two-level ordering is the engine's one global
/// ordering guarantee.
pub struct Matcher<'c> {
    catalog: &'c RuleCatalog,
    config: Config,
}

impl<'c> Matcher<'c> {
    /// Creates a matcher over a catalog with default configuration.
    #[must_use]
    pub fn new(catalog: &'c RuleCatalog) -> Self {
        Self {
            catalog,
            config: Config::default(),
        }
    }

    /// Creates a matcher that honors rule enable/disable configuration.
    #[must_use]
    pub fn with_config(catalog: &'c RuleCatalog, config: Config) -> Self {
        Self { catalog, config }
    }

    /// Evaluates every rule against the tree.
    pub fn match_all(&self, tree: &Tree) -> Vec<Violation> {
        let mut violations = Vec::new();

        for entry in self.catalog.entries() {
            let rule = entry.rule.as_ref();
            if !self.config.is_rule_enabled(rule.name(), rule.group()) {
                debug!(rule = rule.name(), "skipping disabled rule");
                continue;
            }

            let candidates = entry.query.evaluate(tree, tree.root());
            debug!(
                rule = rule.name(),
                candidates = candidates.len(),
                "query evaluated"
            );

            for node in candidates {
                if !rule.confirm(tree, node) {
                    continue;
                }
                violations.push(make_violation(rule, tree, node));
            }
        }

        debug!(total = violations.len(), "match pass complete");
        violations
    }

    /// Attempts one violation's repair.
    ///
    /// Failures are caught here: the error is recorded in the outcome and
    /// logged, never propagated.
    pub fn repair(&self, tree: &mut Tree, violation: &Violation) -> RepairOutcome {
        let Some(rule) = self.catalog.get(violation.rule) else {
            warn!(rule = violation.rule, "violation references unknown rule");
            return RepairOutcome::RepairSkipped;
        };
        if !rule.supports_repair() {
            return RepairOutcome::RepairSkipped;
        }
        match rule.repair(tree, violation.node) {
            Ok(()) => {
                debug!(rule = violation.rule, line = violation.location.line, "repaired");
                RepairOutcome::Repaired
            }
            Err(err) => {
                warn!(
                    rule = violation.rule,
                    line = violation.location.line,
                    error = %err,
                    "repair failed"
                );
                RepairOutcome::RepairFailed(err)
            }
        }
    }

    /// Attempts every violation's repair, strictly in the given order.
    ///
    /// Each violation is processed exactly once; a failure never aborts the
    /// remainder of the batch. The returned outcomes are index-aligned with
    /// the input.
    pub fn repair_all(&self, tree: &mut Tree, violations: &[Violation]) -> Vec<RepairOutcome> {
        violations
            .iter()
            .map(|violation| self.repair(tree, violation))
            .collect()
    }
}

fn make_violation(rule: &dyn Rule, tree: &Tree, node: NodeId) -> Violation {
    Violation {
        rule: rule.name(),
        group: rule.group(),
        message: rule.message(tree, node),
        location: tree.span(node).into(),
        node,
        repairable: rule.supports_repair(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::Query;
    use crate::rule::{RepairError, RuleGroup};
    use pretty_assertions::assert_eq;
    use whiff_syntax::{parse, NodeKind};

    /// Matches every shell command by name.
    struct CommandRule {
        name: &'static str,
        command: &'static str,
    }

    impl Rule for CommandRule {
        fn name(&self) -> &'static str {
            self.name
        }
        fn group(&self) -> RuleGroup {
            RuleGroup::Whiff
        }
        fn query(&self) -> Query {
            Query::within(
                Query::kind(NodeKind::ShellCommand),
                Query::all([
                    Query::kind(NodeKind::CommandName),
                    Query::value(self.command),
                ]),
            )
        }
    }

    /// A repairable rule whose repair always fails.
    struct FailingRepair;

    impl Rule for FailingRepair {
        fn name(&self) -> &'static str {
            "failing-repair"
        }
        fn group(&self) -> RuleGroup {
            RuleGroup::Whiff
        }
        fn query(&self) -> Query {
            Query::within(
                Query::kind(NodeKind::ShellCommand),
                Query::all([Query::kind(NodeKind::CommandName), Query::value("false")]),
            )
        }
        fn supports_repair(&self) -> bool {
            true
        }
        fn repair(&self, _tree: &mut Tree, _node: NodeId) -> Result<(), RepairError> {
            Err(RepairError::PreconditionFailed)
        }
    }

    const SOURCE: &str = "RUN wget http://x\nRUN curl http://y && wget http://z\n";

    fn catalog() -> RuleCatalog {
        RuleCatalog::builder()
            .rule(CommandRule {
                name: "no-curl",
                command: "curl",
            })
            .rule(CommandRule {
                name: "no-wget",
                command: "wget",
            })
            .build()
            .expect("catalog build failed")
    }

    #[test]
    fn orders_by_rule_then_by_position() {
        let tree = parse(SOURCE).expect("parse failed");
        let catalog = catalog();
        let violations = Matcher::new(&catalog).match_all(&tree);

        // no-curl registered first, so its single match comes before both
        // wget matches even though a wget appears earlier in the source.
        let rules: Vec<&str> = violations.iter().map(|v| v.rule).collect();
        assert_eq!(rules, vec!["no-curl", "no-wget", "no-wget"]);
        assert_eq!(violations[1].location.line, 1);
        assert_eq!(violations[2].location.line, 2);
    }

    #[test]
    fn matching_is_deterministic_and_read_only() {
        let tree = parse(SOURCE).expect("parse failed");
        let catalog = catalog();
        let matcher = Matcher::new(&catalog);

        let before = tree.serialize(false);
        let first = matcher.match_all(&tree);
        let second = matcher.match_all(&tree);
        assert_eq!(tree.serialize(false), before);
        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.rule, b.rule);
            assert_eq!(a.node, b.node);
            assert_eq!(a.location, b.location);
        }
    }

    #[test]
    fn no_dedup_across_rules() {
        let catalog = RuleCatalog::builder()
            .rule(CommandRule {
                name: "r1",
                command: "wget",
            })
            .rule(CommandRule {
                name: "r2",
                command: "wget",
            })
            .build()
            .expect("catalog build failed");
        let tree = parse("RUN wget http://x\n").expect("parse failed");
        let violations = Matcher::new(&catalog).match_all(&tree);
        assert_eq!(violations.len(), 2);
        assert_eq!(violations[0].node, violations[1].node);
    }

    #[test]
    fn disabled_rules_are_skipped() {
        let config = Config::parse("[rules.no-wget]\nenabled = false\n").expect("config");
        let tree = parse(SOURCE).expect("parse failed");
        let catalog = catalog();
        let violations = Matcher::with_config(&catalog, config).match_all(&tree);
        let rules: Vec<&str> = violations.iter().map(|v| v.rule).collect();
        assert_eq!(rules, vec!["no-curl"]);
    }

    #[test]
    fn repair_outcomes_are_aligned_and_resilient() {
        let catalog = RuleCatalog::builder()
            .rule(CommandRule {
                name: "detect-only",
                command: "true",
            })
            .rule(FailingRepair)
            .build()
            .expect("catalog build failed");
        let mut tree = parse("RUN true && false\n").expect("parse failed");
        let matcher = Matcher::new(&catalog);
        let violations = matcher.match_all(&tree);
        assert_eq!(violations.len(), 2);

        let outcomes = matcher.repair_all(&mut tree, &violations);
        assert_eq!(outcomes.len(), 2);
        assert!(outcomes[0].is_skipped());
        assert!(outcomes[1].is_failed());
        // A failed batch still leaves a serializable, unchanged tree.
        assert_eq!(tree.serialize(false), "RUN true && false\n");
    }
}
