//! Rule: clean the apt package lists in the same layer that created them.
//!
//! `apt-get install` leaves `/var/lib/apt/lists` populated; unless the same
//! `RUN` removes it, the data is baked into the layer forever.

use crate::helpers;
use whiff_core::{Query, RepairError, Rule, RuleGroup};
use whiff_syntax::{NodeId, Tree};

const LISTS: &str = "/var/lib/apt/lists/*";

/// Detects `apt-get install` without a matching `rm -rf /var/lib/apt/lists/*`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AptGetInstallRemoveLists;

fn script_removes_lists(tree: &Tree, script: NodeId) -> bool {
    tree.script_commands(script).iter().any(|&cmd| {
        tree.command_name(cmd) == Some("rm") && tree.find_argument(cmd, LISTS).is_some()
    })
}

impl Rule for AptGetInstallRemoveLists {
    fn name(&self) -> &'static str {
        "apt-get-install-remove-lists"
    }

    fn group(&self) -> RuleGroup {
        RuleGroup::Binnacle
    }

    fn description(&self) -> &'static str {
        "apt-get install without removing /var/lib/apt/lists in the same layer"
    }

    fn query(&self) -> Query {
        helpers::command("apt-get")
    }

    fn confirm(&self, tree: &Tree, node: NodeId) -> bool {
        if !helpers::is_subcommand(tree, node, "install") {
            return false;
        }
        match tree.enclosing_script(node) {
            Some(script) => !script_removes_lists(tree, script),
            None => false,
        }
    }

    fn supports_repair(&self) -> bool {
        true
    }

    /// Appends the cleanup command to the end of the enclosing script.
    ///
    /// When two `apt-get install` commands share one script, the first
    /// repair already appends the cleanup; the second is a no-op.
    fn repair(&self, tree: &mut Tree, node: NodeId) -> Result<(), RepairError> {
        let script = tree
            .enclosing_script(node)
            .ok_or(RepairError::PreconditionFailed)?;
        if script_removes_lists(tree, script) {
            return Ok(());
        }
        tree.append_command(script, "&&", &["rm", "-rf", LISTS])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::testing::{detect, repaired};
    use pretty_assertions::assert_eq;

    #[test]
    fn detects_missing_cleanup() {
        let violations = detect(AptGetInstallRemoveLists, "RUN apt-get install -y curl\n");
        assert_eq!(violations.len(), 1);
    }

    #[test]
    fn accepts_cleanup_in_same_script() {
        assert!(detect(
            AptGetInstallRemoveLists,
            "RUN apt-get install -y curl && rm -rf /var/lib/apt/lists/*\n"
        )
        .is_empty());
    }

    #[test]
    fn cleanup_in_another_instruction_does_not_count() {
        let source = "RUN apt-get install -y curl\nRUN rm -rf /var/lib/apt/lists/*\n";
        assert_eq!(detect(AptGetInstallRemoveLists, source).len(), 1);
    }

    #[test]
    fn repair_appends_cleanup() {
        assert_eq!(
            repaired(AptGetInstallRemoveLists, "RUN apt-get install -y curl\n"),
            "RUN apt-get install -y curl && rm -rf /var/lib/apt/lists/*\n"
        );
    }

    #[test]
    fn two_installs_in_one_script_append_once() {
        assert_eq!(
            repaired(
                AptGetInstallRemoveLists,
                "RUN apt-get install -y curl && apt-get install -y git\n"
            ),
            "RUN apt-get install -y curl && apt-get install -y git && rm -rf /var/lib/apt/lists/*\n"
        );
    }
}
