//! Shell tokenization for instruction bodies, and the shell-level view of
//! the tree that rules and repairs work through.

use crate::kind::NodeKind;
use crate::tree::{NodeId, Tree, TreeError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenKind {
    Word,
    Gap,
    Op,
}

/// A raw token as a byte range into the full source.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Token {
    pub(crate) kind: TokenKind,
    pub(crate) start: usize,
    pub(crate) end: usize,
}

#[derive(Debug)]
pub(crate) struct UnterminatedQuote {
    pub(crate) offset: usize,
}

fn is_op_byte(b: u8) -> bool {
    matches!(b, b'&' | b'|' | b';')
}

fn gap_len(bytes: &[u8], pos: usize, end: usize) -> usize {
    match bytes[pos] {
        b' ' | b'\t' | b'\r' | b'\n' => 1,
        b'\\' if pos + 1 < end && bytes[pos + 1] == b'\n' => 2,
        b'\\' if pos + 2 < end && bytes[pos + 1] == b'\r' && bytes[pos + 2] == b'\n' => 3,
        _ => 0,
    }
}

/// Splits `src[start..end]` into word, gap, and operator tokens.
///
/// Gaps absorb whitespace and `\`-newline continuations. Words are
/// quote-aware: single quotes run to the matching quote, double quotes
/// honor backslash escapes. Operators are only split out in `shell` mode;
/// otherwise `&|;` are ordinary word bytes.
pub(crate) fn lex(
    src: &str,
    start: usize,
    end: usize,
    shell: bool,
) -> Result<Vec<Token>, UnterminatedQuote> {
    let bytes = src.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = start;

    while pos < end {
        let b = bytes[pos];
        if gap_len(bytes, pos, end) > 0 {
            let gap_start = pos;
            loop {
                let len = if pos < end { gap_len(bytes, pos, end) } else { 0 };
                if len == 0 {
                    break;
                }
                pos += len;
            }
            tokens.push(Token {
                kind: TokenKind::Gap,
                start: gap_start,
                end: pos,
            });
        } else if shell && is_op_byte(b) {
            let op_end = if (b == b'&' || b == b'|') && pos + 1 < end && bytes[pos + 1] == b {
                pos + 2
            } else {
                pos + 1
            };
            tokens.push(Token {
                kind: TokenKind::Op,
                start: pos,
                end: op_end,
            });
            pos = op_end;
        } else {
            let word_start = pos;
            while pos < end {
                let c = bytes[pos];
                if matches!(c, b' ' | b'\t' | b'\r' | b'\n') || (shell && is_op_byte(c)) {
                    break;
                }
                match c {
                    b'\\' => {
                        if gap_len(bytes, pos, end) > 0 {
                            break;
                        }
                        pos = (pos + 2).min(end);
                    }
                    b'\'' => {
                        let close = bytes[pos + 1..end].iter().position(|&x| x == b'\'');
                        match close {
                            Some(i) => pos = pos + 1 + i + 1,
                            None => return Err(UnterminatedQuote { offset: pos }),
                        }
                    }
                    b'"' => {
                        let mut q = pos + 1;
                        loop {
                            if q >= end {
                                return Err(UnterminatedQuote { offset: pos });
                            }
                            match bytes[q] {
                                b'\\' => q += 2,
                                b'"' => break,
                                _ => q += 1,
                            }
                        }
                        pos = q + 1;
                    }
                    _ => pos += 1,
                }
            }
            tokens.push(Token {
                kind: TokenKind::Word,
                start: word_start,
                end: pos,
            });
        }
    }

    Ok(tokens)
}

/// Whether a word is a leading environment assignment (`NAME=value`).
pub(crate) fn is_assignment(word: &str) -> bool {
    if word.starts_with('-') {
        return false;
    }
    match word.split_once('=') {
        Some((name, _)) => {
            !name.is_empty()
                && !name.starts_with(|c: char| c.is_ascii_digit())
                && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    }
}

/// Shell-level navigation and repair helpers.
///
/// These are the only mutations repairs perform: each touches the subtree
/// of one command or script plus, for insertion, a direct sibling slot.
/// Every helper fails with a [`TreeError`] when its target has already been
/// detached or restructured by an earlier repair.
impl Tree {
    /// The executable name of a shell command node.
    #[must_use]
    pub fn command_name(&self, command: NodeId) -> Option<&str> {
        self.children(command)
            .iter()
            .find(|&&c| self.kind(c) == NodeKind::CommandName)
            .and_then(|&c| self.value(c))
    }

    /// Whether the command carries any of the given flag words verbatim.
    #[must_use]
    pub fn command_has_flag(&self, command: NodeId, names: &[&str]) -> bool {
        self.children(command).iter().any(|&c| {
            self.kind(c) == NodeKind::Flag
                && self.value(c).is_some_and(|v| names.contains(&v))
        })
    }

    /// Whether the command carries `letter` inside a short-flag cluster
    /// (`-y`, `-qy`, `-fsSL`, ...).
    #[must_use]
    pub fn command_has_short_flag(&self, command: NodeId, letter: char) -> bool {
        self.children(command).iter().any(|&c| {
            self.kind(c) == NodeKind::Flag
                && self.value(c).is_some_and(|v| {
                    v.starts_with('-') && !v.starts_with("--") && v[1..].contains(letter)
                })
        })
    }

    /// The first argument child of `command` with exactly this value.
    #[must_use]
    pub fn find_argument(&self, command: NodeId, value: &str) -> Option<NodeId> {
        self.children(command)
            .iter()
            .copied()
            .find(|&c| self.kind(c) == NodeKind::Argument && self.value(c) == Some(value))
    }

    /// All argument children of `command`, in source order.
    #[must_use]
    pub fn arguments(&self, command: NodeId) -> Vec<NodeId> {
        self.children(command)
            .iter()
            .copied()
            .filter(|&c| self.kind(c) == NodeKind::Argument)
            .collect()
    }

    /// The shell script enclosing `id`, if any.
    #[must_use]
    pub fn enclosing_script(&self, id: NodeId) -> Option<NodeId> {
        if self.kind(id) == NodeKind::ShellScript {
            return Some(id);
        }
        self.ancestor_of_kind(id, NodeKind::ShellScript)
    }

    /// The simple commands of a script, in source order.
    #[must_use]
    pub fn script_commands(&self, script: NodeId) -> Vec<NodeId> {
        self.children(script)
            .iter()
            .copied()
            .filter(|&c| self.kind(c) == NodeKind::ShellCommand)
            .collect()
    }

    /// Whether any command in the script has the given executable name.
    #[must_use]
    pub fn script_has_command(&self, script: NodeId, name: &str) -> bool {
        self.script_commands(script)
            .iter()
            .any(|&c| self.command_name(c) == Some(name))
    }

    /// Inserts a new word leaf (preceded by a single space) right after
    /// `anchor`, returning the new leaf.
    ///
    /// # Errors
    ///
    /// Fails when `anchor` has been detached from the tree.
    pub fn insert_word_after(
        &mut self,
        anchor: NodeId,
        kind: NodeKind,
        text: &str,
    ) -> Result<NodeId, TreeError> {
        if !self.is_attached(anchor) {
            return Err(TreeError::Detached);
        }
        let space = self.new_leaf(NodeKind::Trivia, " ");
        let word = self.new_leaf(kind, text);
        self.insert_after(anchor, space)?;
        self.insert_after(space, word)?;
        Ok(word)
    }

    /// Appends a flag word right after the command's executable name.
    ///
    /// # Errors
    ///
    /// Fails when the command has no name word or is detached.
    pub fn append_flag(&mut self, command: NodeId, flag: &str) -> Result<NodeId, TreeError> {
        let name = self
            .children(command)
            .iter()
            .copied()
            .find(|&c| self.kind(c) == NodeKind::CommandName)
            .ok_or(TreeError::MissingChild)?;
        self.insert_word_after(name, NodeKind::Flag, flag)
    }

    /// Appends ` <operator> <words...>` to the end of a shell script,
    /// returning the new command node.
    ///
    /// The first word becomes the command name; words starting with `-`
    /// become flags; the rest become arguments.
    ///
    /// # Errors
    ///
    /// Fails when the script has been detached from the tree.
    pub fn append_command(
        &mut self,
        script: NodeId,
        operator: &str,
        words: &[&str],
    ) -> Result<NodeId, TreeError> {
        if !self.is_attached(script) {
            return Err(TreeError::Detached);
        }
        if words.is_empty() {
            return Err(TreeError::MissingChild);
        }

        let command = self.new_node(NodeKind::ShellCommand);
        for (i, word) in words.iter().enumerate() {
            let kind = if i == 0 {
                NodeKind::CommandName
            } else if word.starts_with('-') {
                NodeKind::Flag
            } else {
                NodeKind::Argument
            };
            if i > 0 {
                let space = self.new_leaf(NodeKind::Trivia, " ");
                self.append_child(command, space)?;
            }
            let leaf = self.new_leaf(kind, *word);
            self.append_child(command, leaf)?;
            if i == 0 {
                self.set_value(command, *word);
            }
        }

        let lead = self.new_leaf(NodeKind::Trivia, " ");
        let op = self.new_leaf(NodeKind::Operator, operator);
        let mid = self.new_leaf(NodeKind::Trivia, " ");

        // Insert after the last command so trailing trivia (spaces,
        // continuations) stays at the end of the script.
        let anchor = self
            .children(script)
            .iter()
            .copied()
            .rev()
            .find(|&c| self.kind(c) == NodeKind::ShellCommand);
        match anchor {
            Some(anchor) => {
                self.insert_after(anchor, lead)?;
                self.insert_after(lead, op)?;
                self.insert_after(op, mid)?;
                self.insert_after(mid, command)?;
            }
            None => {
                self.append_child(script, lead)?;
                self.append_child(script, op)?;
                self.append_child(script, mid)?;
                self.append_child(script, command)?;
            }
        }
        Ok(command)
    }
}
