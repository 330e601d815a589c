//! Rule: clean the npm cache after `npm install`.

use crate::helpers;
use whiff_core::{Query, RepairError, Rule, RuleGroup};
use whiff_syntax::{NodeId, Tree};

/// Detects `npm install` without a later `npm cache clean` in the same
/// script.
#[derive(Debug, Clone, Copy, Default)]
pub struct NpmCacheCleanAfterInstall;

fn is_cache_clean(tree: &Tree, command: NodeId) -> bool {
    if tree.command_name(command) != Some("npm") {
        return false;
    }
    let args = tree.arguments(command);
    let values: Vec<&str> = args.iter().filter_map(|&a| tree.value(a)).collect();
    values.starts_with(&["cache", "clean"])
}

fn cleaned_later(tree: &Tree, command: NodeId) -> bool {
    let Some(script) = tree.enclosing_script(command) else {
        return false;
    };
    let commands = tree.script_commands(script);
    commands
        .iter()
        .skip_while(|&&c| c != command)
        .skip(1)
        .any(|&c| is_cache_clean(tree, c))
}

impl Rule for NpmCacheCleanAfterInstall {
    fn name(&self) -> &'static str {
        "npm-cache-clean-after-install"
    }

    fn group(&self) -> RuleGroup {
        RuleGroup::Binnacle
    }

    fn description(&self) -> &'static str {
        "npm install leaves its cache in the layer; clean it in the same RUN"
    }

    fn query(&self) -> Query {
        helpers::command("npm")
    }

    fn confirm(&self, tree: &Tree, node: NodeId) -> bool {
        helpers::is_subcommand(tree, node, "install") && !cleaned_later(tree, node)
    }

    fn supports_repair(&self) -> bool {
        true
    }

    fn repair(&self, tree: &mut Tree, node: NodeId) -> Result<(), RepairError> {
        if cleaned_later(tree, node) {
            return Ok(());
        }
        let script = tree
            .enclosing_script(node)
            .ok_or(RepairError::PreconditionFailed)?;
        tree.append_command(script, "&&", &["npm", "cache", "clean", "--force"])?;
        Ok(())
    }
}
