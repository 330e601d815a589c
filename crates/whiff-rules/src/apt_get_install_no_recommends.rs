//! Rule: `apt-get install` should skip recommended packages.

use crate::helpers;
use whiff_core::{Query, RepairError, Rule, RuleGroup};
use whiff_syntax::{NodeId, Tree};

const FLAG: &str = "--no-install-recommends";

/// Detects `apt-get install` without `--no-install-recommends`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AptGetInstallNoRecommends;

impl Rule for AptGetInstallNoRecommends {
    fn name(&self) -> &'static str {
        "apt-get-install-no-recommends"
    }

    fn group(&self) -> RuleGroup {
        RuleGroup::Binnacle
    }

    fn description(&self) -> &'static str {
        "apt-get install pulls in recommended packages and bloats the image"
    }

    fn query(&self) -> Query {
        helpers::command("apt-get")
    }

    fn confirm(&self, tree: &Tree, node: NodeId) -> bool {
        helpers::is_subcommand(tree, node, "install") && !tree.command_has_flag(node, &[FLAG])
    }

    fn supports_repair(&self) -> bool {
        true
    }

    fn repair(&self, tree: &mut Tree, node: NodeId) -> Result<(), RepairError> {
        if tree.command_has_flag(node, &[FLAG]) {
            return Ok(());
        }
        helpers::insert_flag_after_subcommand(tree, node, "install", FLAG)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::testing::{detect, repaired};
    use pretty_assertions::assert_eq;

    #[test]
    fn detects_missing_flag() {
        let violations = detect(AptGetInstallNoRecommends, "RUN apt-get install -y curl\n");
        assert_eq!(violations.len(), 1);
    }

    #[test]
    fn accepts_flag_present() {
        assert!(detect(
            AptGetInstallNoRecommends,
            "RUN apt-get install -y --no-install-recommends curl\n"
        )
        .is_empty());
    }

    #[test]
    fn repair_inserts_the_flag() {
        assert_eq!(
            repaired(AptGetInstallNoRecommends, "RUN apt-get install -y curl\n"),
            "RUN apt-get install --no-install-recommends -y curl\n"
        );
    }
}
