//! Rule: `MAINTAINER` is deprecated; use a `LABEL`.

use whiff_core::{Query, RepairError, Rule, RuleGroup};
use whiff_syntax::{NodeId, NodeKind, Tree};

/// Detects `MAINTAINER` instructions and rewrites them to
/// `LABEL maintainer="..."`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaintainerDeprecated;

fn keyword_child(tree: &Tree, instruction: NodeId) -> Option<NodeId> {
    tree.children(instruction)
        .iter()
        .copied()
        .find(|&c| tree.kind(c) == NodeKind::Keyword)
}

fn body_child(tree: &Tree, instruction: NodeId) -> Option<NodeId> {
    tree.children(instruction)
        .iter()
        .copied()
        .find(|&c| tree.kind(c) == NodeKind::Argument)
}

impl Rule for MaintainerDeprecated {
    fn name(&self) -> &'static str {
        "maintainer-deprecated"
    }

    fn group(&self) -> RuleGroup {
        RuleGroup::Hadolint
    }

    fn description(&self) -> &'static str {
        "MAINTAINER is deprecated; use LABEL maintainer=..."
    }

    fn query(&self) -> Query {
        Query::all([
            Query::kind(NodeKind::Instruction),
            Query::value("MAINTAINER"),
        ])
    }

    // The instruction's cached keyword is not rewritten by the repair, so
    // re-confirm against the keyword leaf itself.
    fn confirm(&self, tree: &Tree, node: NodeId) -> bool {
        keyword_child(tree, node)
            .and_then(|k| tree.text(k))
            .is_some_and(|t| t.eq_ignore_ascii_case("MAINTAINER"))
    }

    fn supports_repair(&self) -> bool {
        true
    }

    fn repair(&self, tree: &mut Tree, node: NodeId) -> Result<(), RepairError> {
        let keyword = keyword_child(tree, node).ok_or(RepairError::PreconditionFailed)?;
        if tree
            .text(keyword)
            .is_some_and(|t| t.eq_ignore_ascii_case("LABEL"))
        {
            return Ok(());
        }
        let body = body_child(tree, node).ok_or(RepairError::PreconditionFailed)?;
        let author = tree
            .value(body)
            .ok_or(RepairError::PreconditionFailed)?
            .replace('"', "\\\"");
        tree.set_text(keyword, "LABEL")?;
        tree.set_text(body, format!("maintainer=\"{author}\""))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::testing::{detect, repaired};
    use pretty_assertions::assert_eq;

    #[test]
    fn detects_maintainer_in_any_case() {
        assert_eq!(detect(MaintainerDeprecated, "MAINTAINER jane\n").len(), 1);
        assert_eq!(detect(MaintainerDeprecated, "maintainer jane\n").len(), 1);
    }

    #[test]
    fn ignores_label() {
        assert!(detect(MaintainerDeprecated, "LABEL maintainer=\"jane\"\n").is_empty());
    }

    #[test]
    fn repair_escapes_embedded_quotes() {
        assert_eq!(
            repaired(MaintainerDeprecated, "MAINTAINER Jane \"JD\" Doe\n"),
            "LABEL maintainer=\"Jane \\\"JD\\\" Doe\"\n"
        );
    }

    #[test]
    fn repair_rewrites_in_place() {
        assert_eq!(
            repaired(
                MaintainerDeprecated,
                "FROM ubuntu:22.04\nMAINTAINER Jane Doe <jane@example.com>\n"
            ),
            "FROM ubuntu:22.04\nLABEL maintainer=\"Jane Doe <jane@example.com>\"\n"
        );
    }
}
