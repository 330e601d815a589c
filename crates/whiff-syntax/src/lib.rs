//! # whiff-syntax
//!
//! A position-preserving concrete syntax tree for Dockerfiles.
//!
//! The tree is the substrate the whiff rule engine matches against and
//! repairs in place. Its one hard guarantee is byte fidelity: every byte of
//! the parsed source lands in exactly one leaf node, and [`Tree::serialize`]
//! reproduces untouched regions of the input exactly. Repairs mutate the
//! tree through the neighborhood-scoped API on [`Tree`] and serialize back
//! to text, so a diff against the original shows only the intended edits.
//!
//! ## Example
//!
//! ```
//! use whiff_syntax::{parse, NodeKind};
//!
//! let tree = parse("FROM ubuntu\nRUN apt-get update\n").unwrap();
//! assert_eq!(tree.serialize(false), "FROM ubuntu\nRUN apt-get update\n");
//!
//! let commands: Vec<_> = tree
//!     .preorder(tree.root())
//!     .filter(|&n| tree.kind(n) == NodeKind::ShellCommand)
//!     .collect();
//! assert_eq!(commands.len(), 1);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod kind;
mod line_endings;
mod parser;
mod shell;
mod tree;

pub use kind::NodeKind;
pub use line_endings::normalize_line_endings;
pub use parser::{parse, ParseError};
pub use tree::{NodeId, Preorder, Span, Tree, TreeError};
