//! Rule: `apk add` should bypass the package index cache.

use crate::helpers;
use whiff_core::{Query, RepairError, Rule, RuleGroup};
use whiff_syntax::{NodeId, Tree};

const FLAG: &str = "--no-cache";

/// Detects `apk add` without `--no-cache`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApkAddNoCache;

impl Rule for ApkAddNoCache {
    fn name(&self) -> &'static str {
        "apk-add-no-cache"
    }

    fn group(&self) -> RuleGroup {
        RuleGroup::Whiff
    }

    fn description(&self) -> &'static str {
        "apk add without --no-cache leaves the index cache in the layer"
    }

    fn query(&self) -> Query {
        helpers::command("apk")
    }

    fn confirm(&self, tree: &Tree, node: NodeId) -> bool {
        helpers::is_subcommand(tree, node, "add") && !tree.command_has_flag(node, &[FLAG])
    }

    fn supports_repair(&self) -> bool {
        true
    }

    fn repair(&self, tree: &mut Tree, node: NodeId) -> Result<(), RepairError> {
        if tree.command_has_flag(node, &[FLAG]) {
            return Ok(());
        }
        helpers::insert_flag_after_subcommand(tree, node, "add", FLAG)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::testing::{detect, repaired};
    use pretty_assertions::assert_eq;

    #[test]
    fn detects_cached_add() {
        assert_eq!(detect(ApkAddNoCache, "RUN apk add curl\n").len(), 1);
    }

    #[test]
    fn accepts_no_cache() {
        assert!(detect(ApkAddNoCache, "RUN apk add --no-cache curl\n").is_empty());
    }

    #[test]
    fn ignores_apk_del() {
        assert!(detect(ApkAddNoCache, "RUN apk del build-deps\n").is_empty());
    }

    #[test]
    fn repair_inserts_after_add() {
        assert_eq!(
            repaired(ApkAddNoCache, "RUN apk add curl git\n"),
            "RUN apk add --no-cache curl git\n"
        );
    }
}
