//! Rule: a lone `apt-get update` creates a stale-index layer.
//!
//! `apt-get update` must be chained with the `apt-get install` that uses
//! its index; on its own, later layers reuse the cached stale index.
//! Detect only: merging instructions is a restructuring no local repair
//! can do safely.

use crate::helpers;
use whiff_core::{Query, Rule, RuleGroup};
use whiff_syntax::{NodeId, Tree};

/// Detects `apt-get update` with no `apt-get install` in the same script.
#[derive(Debug, Clone, Copy, Default)]
pub struct AptGetUpdateWithoutInstall;

fn script_installs(tree: &Tree, script: NodeId) -> bool {
    tree.script_commands(script).iter().any(|&cmd| {
        tree.command_name(cmd) == Some("apt-get") && helpers::is_subcommand(tree, cmd, "install")
    })
}

impl Rule for AptGetUpdateWithoutInstall {
    fn name(&self) -> &'static str {
        "apt-get-update-without-install"
    }

    fn group(&self) -> RuleGroup {
        RuleGroup::Whiff
    }

    fn description(&self) -> &'static str {
        "apt-get update should be chained with the apt-get install that uses it"
    }

    fn query(&self) -> Query {
        helpers::command("apt-get")
    }

    fn confirm(&self, tree: &Tree, node: NodeId) -> bool {
        if !helpers::is_subcommand(tree, node, "update") {
            return false;
        }
        match tree.enclosing_script(node) {
            Some(script) => !script_installs(tree, script),
            None => false,
        }
    }
}
