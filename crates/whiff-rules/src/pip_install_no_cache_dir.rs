//! Rule: `pip install` should not populate the wheel cache.

use crate::helpers;
use whiff_core::{Query, RepairError, Rule, RuleGroup};
use whiff_syntax::{NodeId, Tree};

const FLAG: &str = "--no-cache-dir";

/// Detects `pip install`/`pip3 install` without `--no-cache-dir`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PipInstallNoCacheDir;

impl Rule for PipInstallNoCacheDir {
    fn name(&self) -> &'static str {
        "pip-install-no-cache-dir"
    }

    fn group(&self) -> RuleGroup {
        RuleGroup::Binnacle
    }

    fn description(&self) -> &'static str {
        "pip install caches wheels in the layer; pass --no-cache-dir"
    }

    fn query(&self) -> Query {
        helpers::command_any(&["pip", "pip3"])
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
