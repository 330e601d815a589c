//! Lenient, position-preserving Dockerfile parser.
//!
//! The parser never rejects unknown instructions and keeps comments, blank
//! lines, and `\`-continuations as trivia so the tree serializes back to
//! the exact input. `RUN`/`CMD`/`ENTRYPOINT` shell bodies are parsed into
//! commands and operators; exec-form bodies stay opaque; every other
//! instruction keeps its body as one raw leaf.

use crate::kind::NodeKind;
use crate::shell::{self, Token, TokenKind};
use crate::tree::{NodeId, Span, Tree};
use thiserror::Error;

/// Errors from parsing Dockerfile source.
#[derive(Debug, Error)]
pub enum ParseError {
    /// A shell word opened a quote that never closes.
    #[error("unterminated quote at line {line}")]
    UnterminatedQuote {
        /// 1-indexed line of the opening quote.
        line: usize,
    },
}

/// Parses Dockerfile source into a [`Tree`].
///
/// # Errors
///
/// Returns [`ParseError::UnterminatedQuote`] when a shell body opens a
/// quote that never closes; all other input parses leniently.
pub fn parse(source: &str) -> Result<Tree, ParseError> {
    Parser::new(source).run()
}

struct Parser<'s> {
    src: &'s str,
    bytes: &'s [u8],
    line_starts: Vec<usize>,
    tree: Tree,
}

impl<'s> Parser<'s> {
    fn new(src: &'s str) -> Self {
        let mut line_starts = vec![0];
        for (i, b) in src.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(i + 1);
            }
        }
        Self {
            src,
            bytes: src.as_bytes(),
            line_starts,
            tree: Tree::new(),
        }
    }

    fn line_of(&self, offset: usize) -> usize {
        self.line_starts.partition_point(|&s| s <= offset)
    }

    fn span(&self, start: usize, end: usize) -> Span {
        let line = self.line_of(start);
        let column = start - self.line_starts[line - 1] + 1;
        Span::new(line, column, start, end - start)
    }

    fn run(mut self) -> Result<Tree, ParseError> {
        let len = self.bytes.len();
        let root = self.tree.root();
        self.tree.set_span(root, Span::new(1, 1, 0, len));

        let mut pos = 0;
        while pos < len {
            match self.bytes[pos] {
                b' ' | b'\t' | b'\r' | b'\n' => {
                    let start = pos;
                    while pos < len && matches!(self.bytes[pos], b' ' | b'\t' | b'\r' | b'\n') {
                        pos += 1;
                    }
                    self.leaf(root, NodeKind::Trivia, start, pos);
                }
                b'#' => {
                    let start = pos;
                    while pos < len && self.bytes[pos] != b'\n' {
                        pos += 1;
                    }
                    self.leaf(root, NodeKind::Comment, start, pos);
                }
                _ => {
                    let end = self.instruction_end(pos);
                    self.instruction(pos, end)?;
                    pos = end;
                }
            }
        }

        Ok(self.tree)
    }

    /// Finds the end of the instruction starting at `pos`: the first
    /// newline not escaped by a `\` continuation.
    fn instruction_end(&self, mut pos: usize) -> usize {
        let len = self.bytes.len();
        while pos < len {
            match self.bytes[pos] {
                b'\n' => return pos,
                b'\\' => {
                    if pos + 1 < len && self.bytes[pos + 1] == b'\n' {
                        pos += 2;
                    } else if pos + 2 < len
                        && self.bytes[pos + 1] == b'\r'
                        && self.bytes[pos + 2] == b'\n'
                    {
                        pos += 3;
                    } else {
                        pos += 2;
                    }
                }
                _ => pos += 1,
            }
        }
        len
    }

    fn instruction(&mut self, start: usize, end: usize) -> Result<(), ParseError> {
        let mut kw_end = start;
        while kw_end < end && self.bytes[kw_end].is_ascii_alphabetic() {
            kw_end += 1;
        }
        let keyword = &self.src[start..kw_end];
        let upper = keyword.to_ascii_uppercase();

        let span = self.span(start, end);
        let instr = self.tree.new_node_spanned(NodeKind::Instruction, span);
        self.tree.set_value(instr, &upper);
        let root = self.tree.root();
        attach(&mut self.tree, root, instr);

        self.leaf(instr, NodeKind::Keyword, start, kw_end);

        match upper.as_str() {
            "RUN" | "CMD" | "ENTRYPOINT" => self.shell_body(instr, kw_end, end)?,
            "FROM" => self.from_body(instr, kw_end, end)?,
            _ => self.raw_body(instr, kw_end, end),
        }
        Ok(())
    }

    /// Consumes the gap (spaces, tabs, continuations) at `start`, adding a
    /// trivia leaf to `parent` when non-empty. Returns the new position.
    fn leading_gap(&mut self, parent: NodeId, start: usize, end: usize) -> usize {
        let mut pos = start;
        loop {
            let step = if pos < end {
                match self.bytes[pos] {
                    b' ' | b'\t' | b'\r' => 1,
                    b'\\' if pos + 1 < end && self.bytes[pos + 1] == b'\n' => 2,
                    b'\\'
                        if pos + 2 < end
                            && self.bytes[pos + 1] == b'\r'
                            && self.bytes[pos + 2] == b'\n' =>
                    {
                        3
                    }
                    _ => 0,
                }
            } else {
                0
            };
            if step == 0 {
                break;
            }
            pos += step;
        }
        if pos > start {
            self.leaf(parent, NodeKind::Trivia, start, pos);
        }
        pos
    }

    fn shell_body(&mut self, instr: NodeId, start: usize, end: usize) -> Result<(), ParseError> {
        let body = self.leading_gap(instr, start, end);
        if body >= end {
            return Ok(());
        }
        if self.bytes[body] == b'[' {
            self.leaf(instr, NodeKind::JsonArray, body, end);
            return Ok(());
        }

        let tokens = shell::lex(self.src, body, end, true).map_err(|e| {
            ParseError::UnterminatedQuote {
                line: self.line_of(e.offset),
            }
        })?;
        let span = self.span(body, end);
        let script = self.tree.new_node_spanned(NodeKind::ShellScript, span);
        attach(&mut self.tree, instr, script);
        self.build_script(script, &tokens);
        Ok(())
    }

    fn build_script(&mut self, script: NodeId, tokens: &[Token]) {
        let mut current: Option<NodeId> = None;
        let mut saw_name = false;

        for (i, tok) in tokens.iter().enumerate() {
            match tok.kind {
                TokenKind::Word => {
                    let text = &self.src[tok.start..tok.end];
                    let command = match current {
                        Some(c) => c,
                        None => {
                            let span = self.span(tok.start, tok.end);
                            let c = self.tree.new_node_spanned(NodeKind::ShellCommand, span);
                            attach(&mut self.tree, script, c);
                            saw_name = false;
                            current = Some(c);
                            c
                        }
                    };
                    let kind = if !saw_name {
                        if shell::is_assignment(text) {
                            NodeKind::Argument
                        } else {
                            saw_name = true;
                            NodeKind::CommandName
                        }
                    } else if text.starts_with('-') {
                        NodeKind::Flag
                    } else {
                        NodeKind::Argument
                    };
                    self.leaf(command, kind, tok.start, tok.end);
                    if kind == NodeKind::CommandName {
                        self.tree.set_value(command, text);
                    }
                }
                TokenKind::Gap => {
                    let next_is_word =
                        tokens.get(i + 1).map(|t| t.kind) == Some(TokenKind::Word);
                    match current {
                        Some(command) if next_is_word => {
                            self.leaf(command, NodeKind::Trivia, tok.start, tok.end);
                        }
                        _ => {
                            current = None;
                            self.leaf(script, NodeKind::Trivia, tok.start, tok.end);
                        }
                    }
                }
                TokenKind::Op => {
                    current = None;
                    saw_name = false;
                    self.leaf(script, NodeKind::Operator, tok.start, tok.end);
                }
            }
        }

        self.cover_command_spans(script);
    }

    /// Widens each command span to cover all of its children; the initial
    /// span only covered the first word.
    fn cover_command_spans(&mut self, script: NodeId) {
        for command in self.tree.script_commands(script) {
            let children = self.tree.children(command);
            let (Some(&first), Some(&last)) = (children.first(), children.last()) else {
                continue;
            };
            let start = self.tree.span(first);
            let end = self.tree.span(last);
            self.tree.set_span(
                command,
                Span::new(
                    start.line,
                    start.column,
                    start.offset,
                    end.offset + end.length - start.offset,
                ),
            );
        }
    }

    fn from_body(&mut self, instr: NodeId, start: usize, end: usize) -> Result<(), ParseError> {
        let tokens = shell::lex(self.src, start, end, false).map_err(|e| {
            ParseError::UnterminatedQuote {
                line: self.line_of(e.offset),
            }
        })?;

        let mut image_seen = false;
        let mut expect_alias = false;
        for tok in &tokens {
            match tok.kind {
                TokenKind::Gap => self.leaf(instr, NodeKind::Trivia, tok.start, tok.end),
                TokenKind::Word | TokenKind::Op => {
                    let text = &self.src[tok.start..tok.end];
                    let kind = if expect_alias {
                        expect_alias = false;
                        NodeKind::StageAlias
                    } else if text.eq_ignore_ascii_case("AS") {
                        expect_alias = true;
                        NodeKind::Argument
                    } else if text.starts_with('-') {
                        NodeKind::Flag
                    } else if image_seen {
                        NodeKind::Argument
                    } else {
                        image_seen = true;
                        NodeKind::ImageRef
                    };
                    self.leaf(instr, kind, tok.start, tok.end);
                }
            }
        }
        Ok(())
    }

    fn raw_body(&mut self, instr: NodeId, start: usize, end: usize) {
        let body = self.leading_gap(instr, start, end);
        // Trailing spaces and CR stay out of the value leaf.
        let mut value_end = end;
        while value_end > body && matches!(self.bytes[value_end - 1], b' ' | b'\t' | b'\r') {
            value_end -= 1;
        }
        if body < value_end {
            self.leaf(instr, NodeKind::Argument, body, value_end);
        }
        if value_end < end {
            self.leaf(instr, NodeKind::Trivia, value_end, end);
        }
    }

    fn leaf(&mut self, parent: NodeId, kind: NodeKind, start: usize, end: usize) {
        let span = self.span(start, end);
        let text = &self.src[start..end];
        let id = self.tree.new_leaf_spanned(kind, text, span);
        attach(&mut self.tree, parent, id);
    }
}

/// Attaching a freshly created node to its parent cannot fail; the node has
/// no parent and no ancestry yet.
fn attach(tree: &mut Tree, parent: NodeId, child: NodeId) {
    debug_assert!(tree.parent(child).is_none());
    let _ = tree.append_child(parent, child);
}
