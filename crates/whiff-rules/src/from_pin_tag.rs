//! Rule: pin base images to a tag or digest.
//!
//! A bare `FROM ubuntu` floats with the registry's `latest`, so the same
//! Dockerfile builds differently over time. Detect only: inventing a tag
//! would guess the user's intent.

use whiff_core::{Query, Rule, RuleGroup};
use whiff_syntax::{NodeId, NodeKind, Tree};

/// Detects `FROM` images without a `:tag` or `@digest`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FromPinTag;

/// Whether `image` names an earlier build stage rather than a registry
/// image.
fn is_stage_reference(tree: &Tree, node: NodeId, image: &str) -> bool {
    let offset = tree.span(node).offset;
    tree.preorder(tree.root())
        .filter(|&n| tree.kind(n) == NodeKind::StageAlias && tree.span(n).offset < offset)
        .filter_map(|n| tree.value(n))
        .any(|alias| alias.eq_ignore_ascii_case(image))
}

impl Rule for FromPinTag {
    fn name(&self) -> &'static str {
        "from-pin-tag"
    }

    fn group(&self) -> RuleGroup {
        RuleGroup::Hadolint
    }

    fn description(&self) -> &'static str {
        "base image is not pinned to a tag or digest"
    }

    fn query(&self) -> Query {
        Query::kind(NodeKind::ImageRef)
    }

    fn confirm(&self, tree: &Tree, node: NodeId) -> bool {
        let Some(image) = tree.value(node) else {
            return false;
        };
        if image.contains(':') || image.contains('@') {
            return false;
        }
        if image == "scratch" || image.starts_with('$') {
            return false;
        }
        !is_stage_reference(tree, node, image)
    }

    fn message(&self, tree: &Tree, node: NodeId) -> String {
        match tree.value(node) {
            Some(image) => format!("image '{image}' is not pinned to a tag or digest"),
            None => self.description().to_string(),
        }
    }
}
