//! End-to-end properties of the detect-and-repair pipeline.

use pretty_assertions::assert_eq;
use whiff::rules::default_catalog;
use whiff::{
    parse, parse_and_match, repair_source, Matcher, NodeId, NodeKind, Query, RepairError, Rule,
    RuleCatalog, RuleGroup, Tree,
};

const APT_SOURCE: &str = "FROM ubuntu:18.04\nRUN apt-get update && apt-get install curl\n";

#[test]
fn matching_is_deterministic() {
    let first = parse_and_match(APT_SOURCE).expect("match failed");
    let second = parse_and_match(APT_SOURCE).expect("match failed");
    assert_eq!(first.len(), second.len());
    for (a, b) in first.iter().zip(&second) {
        assert_eq!(a.rule, b.rule);
        assert_eq!(a.location, b.location);
    }
}

#[test]
fn matching_does_not_change_the_tree() {
    let tree = parse(APT_SOURCE).expect("parse failed");
    let catalog = default_catalog().expect("catalog failed");
    let matcher = Matcher::new(&catalog);
    matcher.match_all(&tree);
    matcher.match_all(&tree);
    assert_eq!(tree.serialize(false), APT_SOURCE);
}

#[test]
fn violations_are_ordered_by_rule_then_position() {
    // The apk smell sits on line 2, the curl smell on line 3, the unpinned
    // image on line 1. Reporting order follows catalog registration, not
    // source position.
    let source = "FROM alpine\nRUN apk add curl\nRUN curl http://example.com/install.sh\n";
    let violations = parse_and_match(source).expect("match failed");
    let rules: Vec<&str> = violations.iter().map(|v| v.rule).collect();
    assert_eq!(rules, vec!["curl-use-f", "from-pin-tag", "apk-add-no-cache"]);
}

#[test]
fn same_rule_reports_in_source_order() {
    let source = "RUN curl http://a\nRUN curl http://b\n";
    let violations = parse_and_match(source).expect("match failed");
    assert_eq!(violations.len(), 2);
    assert_eq!(violations[0].location.line, 1);
    assert_eq!(violations[1].location.line, 2);
}

#[test]
fn clean_source_round_trips_unchanged() {
    let source = "FROM ubuntu:22.04\nRUN apt-get update && apt-get install -y --no-install-recommends curl && rm -rf /var/lib/apt/lists/*\nLABEL maintainer=\"jane\"\n";
    let report = repair_source(source).expect("repair failed");
    assert!(report.violations.is_empty());
    assert_eq!(report.output, source);
}

#[test]
fn crlf_input_is_normalized_on_output() {
    let source = "FROM ubuntu:22.04\r\nLABEL a=\"b\"\r\n";
    let report = repair_source(source).expect("repair failed");
    assert!(report.violations.is_empty());
    assert_eq!(report.output, "FROM ubuntu:22.04\nLABEL a=\"b\"\n");
}

#[test]
fn apt_scenario_detects_and_repairs() {
    let report = repair_source(APT_SOURCE).expect("repair failed");
    let rules: Vec<&str> = report.violations.iter().map(|v| v.rule).collect();
    assert_eq!(
        rules,
        vec![
            "apt-get-install-use-y",
            "apt-get-install-no-recommends",
            "apt-get-install-remove-lists",
        ]
    );
    assert_eq!(report.repaired_count(), 3);
    assert_eq!(
        report.output,
        "FROM ubuntu:18.04\nRUN apt-get update && apt-get install --no-install-recommends -y curl && rm -rf /var/lib/apt/lists/*\n"
    );
}

#[test]
fn repairs_touch_only_their_own_regions() {
    let source = "FROM alpine:3.19\n# install tooling\nRUN apk add curl\nCMD [\"sh\"]\n";
    let report = repair_source(source).expect("repair failed");
    assert_eq!(report.repaired_count(), 1);
    assert_eq!(
        report.output,
        "FROM alpine:3.19\n# install tooling\nRUN apk add --no-cache curl\nCMD [\"sh\"]\n"
    );
}

#[test]
fn independent_smells_repair_on_their_own_lines() {
    let source = "FROM alpine:3.19\nRUN apk add curl\nRUN curl http://example.com/install.sh\nCMD [\"sh\"]\n";
    let report = repair_source(source).expect("repair failed");
    assert_eq!(report.repaired_count(), 2);

    // Exactly the two smelly lines change; every other line is untouched.
    let before: Vec<&str> = source.lines().collect();
    let after: Vec<&str> = report.output.lines().collect();
    assert_eq!(before.len(), after.len());
    assert_eq!(after[1], "RUN apk add --no-cache curl");
    assert_eq!(after[2], "RUN curl -f http://example.com/install.sh");
    assert_eq!(before[0], after[0]);
    assert_eq!(before[3], after[3]);
}

#[test]
fn detect_only_rules_are_skipped_not_failed() {
    let report = repair_source("FROM ubuntu\nRUN sudo make install\n").expect("repair failed");
    let rules: Vec<&str> = report.violations.iter().map(|v| v.rule).collect();
    assert_eq!(rules, vec!["no-sudo", "from-pin-tag"]);
    assert!(report.outcomes.iter().all(whiff::RepairOutcome::is_skipped));
    assert_eq!(report.output, "FROM ubuntu\nRUN sudo make install\n");
}

/// A rule whose repair always fails, for batch-resilience checks.
struct BrokenRepair;

impl Rule for BrokenRepair {
    fn name(&self) -> &'static str {
        "broken-repair"
    }
    fn group(&self) -> RuleGroup {
        RuleGroup::Whiff
    }
    fn description(&self) -> &'static str {
        "always fails to repair"
    }
    fn query(&self) -> Query {
        Query::within(
            Query::kind(NodeKind::ShellCommand),
            Query::all([Query::kind(NodeKind::CommandName), Query::value("wget")]),
        )
    }
    fn supports_repair(&self) -> bool {
        true
    }
    fn repair(&self, _tree: &mut Tree, _node: NodeId) -> Result<(), RepairError> {
        Err(RepairError::PreconditionFailed)
    }
}

#[test]
fn a_failed_repair_does_not_abort_the_batch() {
    let catalog = RuleCatalog::builder()
        .rule(BrokenRepair)
        .rule(whiff::rules::CurlUseF)
        .build()
        .expect("catalog failed");
    let mut tree = parse("RUN wget http://a && curl http://b\n").expect("parse failed");
    let matcher = Matcher::new(&catalog);
    let violations = matcher.match_all(&tree);
    assert_eq!(violations.len(), 2);

    let outcomes = matcher.repair_all(&mut tree, &violations);
    assert!(outcomes[0].is_failed());
    assert!(outcomes[1].is_repaired());
    assert_eq!(
        tree.serialize(true),
        "RUN wget http://a && curl -f http://b\n"
    );
}

#[test]
fn repaired_output_has_no_remaining_repairable_smells() {
    let report = repair_source(APT_SOURCE).expect("repair failed");
    let again = parse_and_match(&report.output).expect("match failed");
    assert!(again.iter().all(|v| !v.repairable), "left: {again:?}");
}
