//! Rule: `curl` must fail on HTTP errors.
//!
//! Without `-f`, curl writes the error page to stdout and exits zero, so a
//! 404 during an image build goes unnoticed.

use crate::helpers;
use whiff_core::{Query, RepairError, Rule, RuleGroup};
use whiff_syntax::{NodeId, Tree};

/// Detects `curl` without `-f`/`--fail` and inserts `-f`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CurlUseF;

fn has_fail(tree: &Tree, command: NodeId) -> bool {
    tree.command_has_short_flag(command, 'f') || tree.command_has_flag(command, &["--fail"])
}

impl Rule for CurlUseF {
    fn name(&self) -> &'static str {
        "curl-use-f"
    }

    fn group(&self) -> RuleGroup {
        RuleGroup::Binnacle
    }

    fn description(&self) -> &'static str {
        "curl without -f does not fail on HTTP errors"
    }

    fn query(&self) -> Query {
        helpers::command("curl")
    }

    fn confirm(&self, tree: &Tree, node: NodeId) -> bool {
        !has_fail(tree, node)
    }

    fn supports_repair(&self) -> bool {
        true
    }

    fn repair(&self, tree: &mut Tree, node: NodeId) -> Result<(), RepairError> {
        if has_fail(tree, node) {
            return Ok(());
        }
        tree.append_flag(node, "-f")?;
        Ok(())
    }
}
