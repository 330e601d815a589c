//! Shared query builders and repair building blocks.

use whiff_core::{Query, RepairError};
use whiff_syntax::{NodeId, NodeKind, Tree};

/// A query matching shell commands whose executable name is `name`.
pub(crate) fn command(name: &str) -> Query {
    Query::within(
        Query::kind(NodeKind::ShellCommand),
        Query::all([Query::kind(NodeKind::CommandName), Query::value(name)]),
    )
}

/// A query matching shell commands whose executable name is any of `names`.
pub(crate) fn command_any(names: &[&str]) -> Query {
    Query::within(
        Query::kind(NodeKind::ShellCommand),
        Query::all([
            Query::kind(NodeKind::CommandName),
            Query::any(names.iter().map(|n| Query::value(*n))),
        ]),
    )
}

/// The first non-flag argument after the command name (`install` in
/// `apt-get install -y curl`).
///
/// Leading environment assignments (`DEBIAN_FRONTEND=noninteractive ...`)
/// are argument children that sit before the name word, so the scan starts
/// at the name.
pub(crate) fn subcommand(tree: &Tree, command: NodeId) -> Option<&str> {
    let children = tree.children(command);
    let name = children
        .iter()
        .position(|&c| tree.kind(c) == NodeKind::CommandName)?;
    children[name + 1..]
        .iter()
        .copied()
        .find(|&c| tree.kind(c) == NodeKind::Argument)
        .and_then(|c| tree.value(c))
}

/// Whether the command is `<name> <sub> ...`.
pub(crate) fn is_subcommand(tree: &Tree, command: NodeId, sub: &str) -> bool {
    subcommand(tree, command) == Some(sub)
}

/// Inserts `flag` right after the command's `sub` argument word.
///
/// Fails with [`RepairError::PreconditionFailed`] when the subcommand word
/// is no longer there, which means an earlier repair restructured the
/// command.
pub(crate) fn insert_flag_after_subcommand(
    tree: &mut Tree,
    command: NodeId,
    sub: &str,
    flag: &str,
) -> Result<(), RepairError> {
    let anchor = tree
        .find_argument(command, sub)
        .ok_or(RepairError::PreconditionFailed)?;
    tree.insert_word_after(anchor, NodeKind::Flag, flag)?;
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::*;
    use whiff_syntax::parse;

    #[test]
    fn subcommand_skips_flags() {
        let tree = parse("RUN apt-get -q install curl\n").expect("parse failed");
        let cmd = tree
            .preorder(tree.root())
            .find(|&n| tree.kind(n) == NodeKind::ShellCommand)
            .expect("no command");
        assert_eq!(subcommand(&tree, cmd), Some("install"));
        assert!(is_subcommand(&tree, cmd, "install"));
        assert!(!is_subcommand(&tree, cmd, "update"));
    }

    #[test]
    fn subcommand_skips_leading_env_assignments() {
        let tree = parse("RUN DEBIAN_FRONTEND=noninteractive apt-get install curl\n")
            .expect("parse failed");
        let cmd = tree
            .preorder(tree.root())
            .find(|&n| tree.kind(n) == NodeKind::ShellCommand)
            .expect("no command");
        assert_eq!(subcommand(&tree, cmd), Some("install"));
    }

    #[test]
    fn insert_flag_lands_after_the_subcommand() {
        let mut tree = parse("RUN apt-get install curl\n").expect("parse failed");
        let cmd = tree
            .preorder(tree.root())
            .find(|&n| tree.kind(n) == NodeKind::ShellCommand)
            .expect("no command");
        insert_flag_after_subcommand(&mut tree, cmd, "install", "-y").expect("repair failed");
        assert_eq!(tree.serialize(false), "RUN apt-get install -y curl\n");
    }
}
