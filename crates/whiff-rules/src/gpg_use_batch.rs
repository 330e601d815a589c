//! Rule: `gpg` needs `--batch` to run without a terminal.

use crate::helpers;
use whiff_core::{Query, RepairError, Rule, RuleGroup};
use whiff_syntax::{NodeId, Tree};

/// Detects `gpg` without `--batch`/`--no-tty` and inserts `--batch`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GpgUseBatch;

fn is_batch(tree: &Tree, command: NodeId) -> bool {
    tree.command_has_flag(command, &["--batch", "--no-tty"])
}

impl Rule for GpgUseBatch {
    fn name(&self) -> &'static str {
        "gpg-use-batch"
    }

    fn group(&self) -> RuleGroup {
        RuleGroup::Binnacle
    }

    fn description(&self) -> &'static str {
        "gpg without --batch may try to prompt on a missing tty"
    }

    fn query(&self) -> Query {
        helpers::command("gpg")
    }

    fn confirm(&self, tree: &Tree, node: NodeId) -> bool {
        !is_batch(tree, node)
    }

    fn supports_repair(&self) -> bool {
        true
    }

    fn repair(&self, tree: &mut Tree, node: NodeId) -> Result<(), RepairError> {
        if is_batch(tree, node) {
            return Ok(());
        }
        tree.append_flag(node, "--batch")?;
        Ok(())
    }
}
