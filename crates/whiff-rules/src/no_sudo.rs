//! Rule: do not use `sudo` in build steps.
//!
//! Build steps already run as the current `USER`; sudo's tty and signal
//! handling behaves unpredictably inside a build. Detect only, since the
//! right fix (drop sudo, or switch `USER`) depends on intent.

use crate::helpers;
use whiff_core::{Query, Rule, RuleGroup};
use whiff_syntax::{NodeId, Tree};

/// Detects any `sudo` invocation.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSudo;

impl Rule for NoSudo {
    fn name(&self) -> &'static str {
        "no-sudo"
    }

    fn group(&self) -> RuleGroup {
        RuleGroup::Hadolint
    }

    fn description(&self) -> &'static str {
        "avoid sudo in build steps; use USER to switch users instead"
    }

    fn query(&self) -> Query {
        helpers::command("sudo")
    }

    fn message(&self, tree: &Tree, node: NodeId) -> String {
        match tree.arguments(node).first().and_then(|&a| tree.value(a)) {
            Some(wrapped) => format!("'{wrapped}' is run through sudo; use USER instead"),
            None => self.description().to_string(),
        }
    }
}
