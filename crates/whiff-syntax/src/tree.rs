//! Arena-backed syntax tree with stable node handles.
//!
//! Nodes own their children through index lists; parent links are non-owning
//! back-references used only for upward navigation. Detaching a node never
//! frees it, so handles held by violations stay valid for the duration of a
//! matcher pass even after repairs restructure the tree.

use crate::kind::NodeKind;
use crate::line_endings::normalize_line_endings;
use serde::Serialize;
use thiserror::Error;

/// A stable handle to a node in a [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct NodeId(pub(crate) usize);

/// Source span of a node.
///
/// Line and column are 1-indexed. Nodes created by repairs carry a
/// synthetic zero span; spans of parsed nodes remain valid until the tree
/// is mutated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Span {
    /// 1-indexed line number.
    pub line: usize,
    /// 1-indexed column number.
    pub column: usize,
    /// Byte offset from the start of the source.
    pub offset: usize,
    /// Length of the span in bytes.
    pub length: usize,
}

impl Span {
    /// Creates a span with explicit coordinates.
    #[must_use]
    pub fn new(line: usize, column: usize, offset: usize, length: usize) -> Self {
        Self {
            line,
            column,
            offset,
            length,
        }
    }

    /// The zero span used for synthesized nodes.
    #[must_use]
    pub fn synthetic() -> Self {
        Self::default()
    }
}

/// Errors from tree mutation.
///
/// A mutation fails when its structural precondition no longer holds,
/// typically because an earlier repair in the same batch already
/// restructured the region.
#[derive(Debug, Error)]
pub enum TreeError {
    /// Text replacement attempted on an interior node.
    #[error("node is not a leaf")]
    NotALeaf,
    /// The target node is no longer reachable from the root.
    #[error("node has been detached from the tree")]
    Detached,
    /// The node has no parent (it is the root or already detached).
    #[error("node has no parent")]
    NoParent,
    /// Attaching a node that already has a parent.
    #[error("node is already attached")]
    AlreadyAttached,
    /// Attaching a node inside its own subtree.
    #[error("attachment would create a cycle")]
    WouldCycle,
    /// A structurally required child node is missing.
    #[error("expected child node is missing")]
    MissingChild,
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    span: Span,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    /// Exact source text; present on leaves only.
    text: Option<String>,
    /// Canonical payload when it differs from the text (e.g. the uppercased
    /// instruction keyword).
    value: Option<String>,
}

/// A parsed Dockerfile.
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<NodeData>,
    root: NodeId,
}

impl Tree {
    pub(crate) fn new() -> Self {
        let root = NodeData {
            kind: NodeKind::Dockerfile,
            span: Span::synthetic(),
            parent: None,
            children: Vec::new(),
            text: None,
            value: None,
        };
        Self {
            nodes: vec![root],
            root: NodeId(0),
        }
    }

    /// The root node.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The kind tag of a node.
    #[must_use]
    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.nodes[id.0].kind
    }

    /// The source span of a node.
    #[must_use]
    pub fn span(&self, id: NodeId) -> Span {
        self.nodes[id.0].span
    }

    /// The children of a node, in source order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// The parent of a node, if attached and not the root.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// The exact source text of a leaf node.
    #[must_use]
    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.nodes[id.0].text.as_deref()
    }

    /// The matchable payload of a node: its canonical value if one is set,
    /// otherwise its leaf text.
    #[must_use]
    pub fn value(&self, id: NodeId) -> Option<&str> {
        let node = &self.nodes[id.0];
        node.value.as_deref().or(node.text.as_deref())
    }

    /// Whether `id` is reachable from the root.
    #[must_use]
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut current = id;
        loop {
            if current == self.root {
                return true;
            }
            match self.nodes[current.0].parent {
                Some(p) => current = p,
                None => return false,
            }
        }
    }

    /// Depth-first pre-order traversal starting at (and including) `from`.
    ///
    /// Children are visited in source order, so repeated traversal of an
    /// unmutated tree always yields the same sequence.
    #[must_use]
    pub fn preorder(&self, from: NodeId) -> Preorder<'_> {
        Preorder {
            tree: self,
            stack: vec![from],
        }
    }

    /// All strict descendants of `id`, in pre-order.
    pub fn descendants(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.preorder(id).skip(1)
    }

    /// The nearest ancestor of `id` with the given kind.
    #[must_use]
    pub fn ancestor_of_kind(&self, id: NodeId, kind: NodeKind) -> Option<NodeId> {
        let mut current = self.parent(id);
        while let Some(node) = current {
            if self.kind(node) == kind {
                return Some(node);
            }
            current = self.parent(node);
        }
        None
    }

    // --- construction ---

    /// Creates an unattached leaf with a synthetic span.
    pub fn new_leaf(&mut self, kind: NodeKind, text: impl Into<String>) -> NodeId {
        self.push(NodeData {
            kind,
            span: Span::synthetic(),
            parent: None,
            children: Vec::new(),
            text: Some(text.into()),
            value: None,
        })
    }

    /// Creates an unattached interior node with a synthetic span.
    pub fn new_node(&mut self, kind: NodeKind) -> NodeId {
        self.push(NodeData {
            kind,
            span: Span::synthetic(),
            parent: None,
            children: Vec::new(),
            text: None,
            value: None,
        })
    }

    pub(crate) fn new_leaf_spanned(
        &mut self,
        kind: NodeKind,
        text: impl Into<String>,
        span: Span,
    ) -> NodeId {
        self.push(NodeData {
            kind,
            span,
            parent: None,
            children: Vec::new(),
            text: Some(text.into()),
            value: None,
        })
    }

    pub(crate) fn new_node_spanned(&mut self, kind: NodeKind, span: Span) -> NodeId {
        self.push(NodeData {
            kind,
            span,
            parent: None,
            children: Vec::new(),
            text: None,
            value: None,
        })
    }

    pub(crate) fn set_value(&mut self, id: NodeId, value: impl Into<String>) {
        self.nodes[id.0].value = Some(value.into());
    }

    pub(crate) fn set_span(&mut self, id: NodeId, span: Span) {
        self.nodes[id.0].span = span;
    }

    fn push(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(data);
        id
    }

    // --- mutation ---

    /// Replaces the text of a leaf node.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::NotALeaf`] for interior nodes and
    /// [`TreeError::Detached`] for nodes no longer reachable from the root.
    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) -> Result<(), TreeError> {
        if !self.is_attached(id) {
            return Err(TreeError::Detached);
        }
        let node = &mut self.nodes[id.0];
        if node.text.is_none() {
            return Err(TreeError::NotALeaf);
        }
        node.text = Some(text.into());
        node.value = None;
        Ok(())
    }

    /// Appends `child` as the last child of `parent`.
    ///
    /// # Errors
    ///
    /// Fails if `child` is already attached or if the attachment would make
    /// a node its own ancestor.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        self.check_attachable(parent, child)?;
        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);
        Ok(())
    }

    /// Inserts `node` as the sibling immediately after `anchor`.
    ///
    /// # Errors
    ///
    /// Fails if `anchor` has no parent or `node` cannot be attached.
    pub fn insert_after(&mut self, anchor: NodeId, node: NodeId) -> Result<(), TreeError> {
        let parent = self.parent(anchor).ok_or(TreeError::NoParent)?;
        self.check_attachable(parent, node)?;
        let index = self.child_index(parent, anchor)?;
        self.nodes[parent.0].children.insert(index + 1, node);
        self.nodes[node.0].parent = Some(parent);
        Ok(())
    }

    /// Inserts `node` as the sibling immediately before `anchor`.
    ///
    /// # Errors
    ///
    /// Fails if `anchor` has no parent or `node` cannot be attached.
    pub fn insert_before(&mut self, anchor: NodeId, node: NodeId) -> Result<(), TreeError> {
        let parent = self.parent(anchor).ok_or(TreeError::NoParent)?;
        self.check_attachable(parent, node)?;
        let index = self.child_index(parent, anchor)?;
        self.nodes[parent.0].children.insert(index, node);
        self.nodes[node.0].parent = Some(parent);
        Ok(())
    }

    /// Detaches `id` from its parent. The node stays allocated and its
    /// handle stays valid, but it no longer contributes to serialization.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::NoParent`] for the root or an already detached
    /// node.
    pub fn detach(&mut self, id: NodeId) -> Result<(), TreeError> {
        let parent = self.parent(id).ok_or(TreeError::NoParent)?;
        let index = self.child_index(parent, id)?;
        self.nodes[parent.0].children.remove(index);
        self.nodes[id.0].parent = None;
        Ok(())
    }

    fn check_attachable(&self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        if self.nodes[child.0].parent.is_some() {
            return Err(TreeError::AlreadyAttached);
        }
        // Reject attaching a node into its own subtree.
        let mut current = Some(parent);
        while let Some(node) = current {
            if node == child {
                return Err(TreeError::WouldCycle);
            }
            current = self.parent(node);
        }
        Ok(())
    }

    fn child_index(&self, parent: NodeId, child: NodeId) -> Result<usize, TreeError> {
        self.nodes[parent.0]
            .children
            .iter()
            .position(|&c| c == child)
            .ok_or(TreeError::Detached)
    }

    // --- serialization ---

    /// Serializes the tree back to text.
    ///
    /// Output is the pre-order concatenation of all attached leaf text, so
    /// regions untouched by repairs reproduce the original input
    /// byte-for-byte. With `normalize_eol` set, CRLF/CR line endings are
    /// rewritten to LF at this output boundary.
    #[must_use]
    pub fn serialize(&self, normalize_eol: bool) -> String {
        let mut out = String::new();
        for node in self.preorder(self.root) {
            if let Some(text) = self.text(node) {
                out.push_str(text);
            }
        }
        if normalize_eol {
            normalize_line_endings(&out)
        } else {
            out
        }
    }
}

/// Pre-order traversal iterator. See [`Tree::preorder`].
pub struct Preorder<'t> {
    tree: &'t Tree,
    stack: Vec<NodeId>,
}

impl Iterator for Preorder<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let next = self.stack.pop()?;
        let children = self.tree.children(next);
        self.stack.extend(children.iter().rev());
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn word_tree() -> (Tree, NodeId, NodeId) {
        let mut tree = Tree::new();
        let a = tree.new_leaf(NodeKind::Argument, "a");
        let b = tree.new_leaf(NodeKind::Argument, "b");
        tree.append_child(tree.root(), a).unwrap();
        tree.append_child(tree.root(), b).unwrap();
        (tree, a, b)
    }

    #[test]
    fn serialize_concatenates_leaves_in_order() {
        let (tree, _, _) = word_tree();
        assert_eq!(tree.serialize(false), "ab");
    }

    #[test]
    fn insert_after_places_sibling() {
        let (mut tree, a, _) = word_tree();
        let mid = tree.new_leaf(NodeKind::Trivia, " ");
        tree.insert_after(a, mid).unwrap();
        assert_eq!(tree.serialize(false), "a b");
    }

    #[test]
    fn insert_before_places_sibling() {
        let (mut tree, _, b) = word_tree();
        let mid = tree.new_leaf(NodeKind::Trivia, "-");
        tree.insert_before(b, mid).unwrap();
        assert_eq!(tree.serialize(false), "a-b");
    }

    #[test]
    fn detach_removes_from_output_but_keeps_handle() {
        let (mut tree, a, _) = word_tree();
        tree.detach(a).unwrap();
        assert_eq!(tree.serialize(false), "b");
        assert_eq!(tree.text(a), Some("a"));
        assert!(!tree.is_attached(a));
    }

    #[test]
    fn set_text_rejects_interior_nodes() {
        let mut tree = Tree::new();
        let node = tree.new_node(NodeKind::ShellCommand);
        tree.append_child(tree.root(), node).unwrap();
        assert!(matches!(
            tree.set_text(node, "x"),
            Err(TreeError::NotALeaf)
        ));
    }

    #[test]
    fn set_text_rejects_detached_nodes() {
        let (mut tree, a, _) = word_tree();
        tree.detach(a).unwrap();
        assert!(matches!(tree.set_text(a, "x"), Err(TreeError::Detached)));
    }

    #[test]
    fn append_rejects_already_attached() {
        let (mut tree, a, _) = word_tree();
        let root = tree.root();
        assert!(matches!(
            tree.append_child(root, a),
            Err(TreeError::AlreadyAttached)
        ));
    }

    #[test]
    fn append_rejects_cycles() {
        let mut tree = Tree::new();
        let outer = tree.new_node(NodeKind::ShellScript);
        let inner = tree.new_node(NodeKind::ShellCommand);
        tree.append_child(tree.root(), outer).unwrap();
        tree.append_child(outer, inner).unwrap();
        tree.detach(outer).unwrap();
        assert!(matches!(
            tree.append_child(inner, outer),
            Err(TreeError::WouldCycle)
        ));
    }

    #[test]
    fn preorder_visits_parent_before_children() {
        let mut tree = Tree::new();
        let cmd = tree.new_node(NodeKind::ShellCommand);
        let name = tree.new_leaf(NodeKind::CommandName, "ls");
        tree.append_child(tree.root(), cmd).unwrap();
        tree.append_child(cmd, name).unwrap();

        let order: Vec<NodeId> = tree.preorder(tree.root()).collect();
        assert_eq!(order, vec![tree.root(), cmd, name]);
    }
}
