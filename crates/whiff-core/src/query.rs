//! The query algebra: composable predicates over tree shape.

use whiff_syntax::{NodeId, NodeKind, Tree};

/// An immutable expression describing a tree shape to search for.
///
/// A query is built once, when its rule is registered, and reused across
/// matcher passes; evaluation is read-only.
///
/// Composition semantics (the documented precedence rule): [`Query::All`]
/// and [`Query::Any`] test every branch against the *same* node currently
/// being visited, in listed order with ordinary boolean short-circuit.
/// Descendant scoping never happens implicitly; only an explicit
/// [`Query::Within`] scans the subtree below the visited node, and that
/// scan is itself pre-order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// Matches a node whose kind is in the set.
    Kind(Vec<NodeKind>),
    /// Matches a node whose payload equals the literal.
    Value(String),
    /// Matches when every sub-query matches this node.
    All(Vec<Query>),
    /// Matches when any sub-query matches this node.
    Any(Vec<Query>),
    /// Matches when the outer query matches this node and the inner query
    /// matches some strict descendant of it.
    Within(Box<Query>, Box<Query>),
}

impl Query {
    /// A query matching one node kind.
    #[must_use]
    pub fn kind(kind: NodeKind) -> Self {
        Self::Kind(vec![kind])
    }

    /// A query matching any of several node kinds.
    pub fn kinds(kinds: impl IntoIterator<Item = NodeKind>) -> Self {
        Self::Kind(kinds.into_iter().collect())
    }

    /// A query matching a node payload exactly.
    pub fn value(value: impl Into<String>) -> Self {
        Self::Value(value.into())
    }

    /// Conjunction over the same node.
    pub fn all(queries: impl IntoIterator<Item = Query>) -> Self {
        Self::All(queries.into_iter().collect())
    }

    /// Disjunction over the same node.
    pub fn any(queries: impl IntoIterator<Item = Query>) -> Self {
        Self::Any(queries.into_iter().collect())
    }

    /// Descendant scoping: `outer` on this node, `inner` somewhere below it.
    #[must_use]
    pub fn within(outer: Query, inner: Query) -> Self {
        Self::Within(Box::new(outer), Box::new(inner))
    }

    /// Tests this query against a single node.
    #[must_use]
    pub fn matches(&self, tree: &Tree, node: NodeId) -> bool {
        match self {
            Self::Kind(kinds) => kinds.contains(&tree.kind(node)),
            Self::Value(value) => tree.value(node) == Some(value.as_str()),
            Self::All(queries) => queries.iter().all(|q| q.matches(tree, node)),
            Self::Any(queries) => queries.iter().any(|q| q.matches(tree, node)),
            Self::Within(outer, inner) => {
                outer.matches(tree, node)
                    && tree.descendants(node).any(|d| inner.matches(tree, d))
            }
        }
    }

    /// Evaluates this query against the subtree rooted at `root`.
    ///
    /// Traversal is depth-first pre-order with children in source order, so
    /// repeated evaluation of an unmutated tree yields the same sequence.
    /// A query that matches nothing returns an empty vector; overlapping
    /// matches at different depths are all returned.
    #[must_use]
    pub fn evaluate(&self, tree: &Tree, root: NodeId) -> Vec<NodeId> {
        tree.preorder(root)
            .filter(|&node| self.matches(tree, node))
            .collect()
    }
}
