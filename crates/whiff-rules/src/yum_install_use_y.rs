//! Rule: `yum install` must run non-interactively.

use crate::helpers;
use whiff_core::{Query, RepairError, Rule, RuleGroup};
use whiff_syntax::{NodeId, Tree};

/// Detects `yum install` without `-y` and inserts the flag.
#[derive(Debug, Clone, Copy, Default)]
pub struct YumInstallUseY;

fn has_yes(tree: &Tree, command: NodeId) -> bool {
    tree.command_has_short_flag(command, 'y')
        || tree.command_has_flag(command, &["--assumeyes"])
}

impl Rule for YumInstallUseY {
    fn name(&self) -> &'static str {
        "yum-install-use-y"
    }

    fn group(&self) -> RuleGroup {
        RuleGroup::Hadolint
    }

    fn description(&self) -> &'static str {
        "yum install without -y blocks the build waiting for input"
    }

    fn query(&self) -> Query {
        helpers::command("yum")
    }

    fn confirm(&self, tree: &Tree, node: NodeId) -> bool {
        helpers::is_subcommand(tree, node, "install") && !has_yes(tree, node)
    }

    fn supports_repair(&self) -> bool {
        true
    }

    fn repair(&self, tree: &mut Tree, node: NodeId) -> Result<(), RepairError> {
        if has_yes(tree, node) {
            return Ok(());
        }
        helpers::insert_flag_after_subcommand(tree, node, "install", "-y")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::testing::{detect, repaired};
    use pretty_assertions::assert_eq;

    #[test]
    fn detects_missing_yes() {
        assert_eq!(detect(YumInstallUseY, "RUN yum install httpd\n").len(), 1);
    }

    #[test]
    fn accepts_yes() {
        assert!(detect(YumInstallUseY, "RUN yum install -y httpd\n").is_empty());
        assert!(detect(YumInstallUseY, "RUN yum install --assumeyes httpd\n").is_empty());
    }

    #[test]
    fn repair_inserts_after_install() {
        assert_eq!(
            repaired(YumInstallUseY, "RUN yum install httpd\n"),
            "RUN yum install -y httpd\n"
        );
    }
}
