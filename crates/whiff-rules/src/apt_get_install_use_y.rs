//! Rule: `apt-get install` must run non-interactively.
//!
//! An `apt-get install` without `-y` stalls the image build waiting for a
//! confirmation prompt that never comes.

use crate::helpers;
use whiff_core::{Query, RepairError, Rule, RuleGroup};
use whiff_syntax::{NodeId, Tree};

/// Detects `apt-get install` without `-y` and inserts the flag.
#[derive(Debug, Clone, Copy, Default)]
pub struct AptGetInstallUseY;

fn has_yes(tree: &Tree, command: NodeId) -> bool {
    tree.command_has_short_flag(command, 'y')
        || tree.command_has_flag(command, &["--yes", "--assume-yes"])
}

impl Rule for AptGetInstallUseY {
    fn name(&self) -> &'static str {
        "apt-get-install-use-y"
    }

    fn group(&self) -> RuleGroup {
        RuleGroup::Binnacle
    }

    fn description(&self) -> &'static str {
        "apt-get install without -y blocks the build waiting for input"
    }

    fn query(&self) -> Query {
        helpers::command("apt-get")
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
