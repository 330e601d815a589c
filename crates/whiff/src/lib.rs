//! # whiff
//!
//! Dockerfile smell detection and automatic repair.
//!
//! This is the main facade crate: it re-exports the engine, the syntax
//! tree, and the built-in rules, and provides the two one-call entry
//! points most consumers want.
//!
//! ## Quick Start
//!
//! ```
//! let source = "FROM ubuntu:22.04\nRUN apt-get install curl\n";
//!
//! // Detection only.
//! let violations = whiff::parse_and_match(source)?;
//! assert!(!violations.is_empty());
//!
//! // Detection plus repair.
//! let report = whiff::repair_source(source)?;
//! assert!(report.output.contains("apt-get install --no-install-recommends -y curl"));
//! # Ok::<(), whiff::EngineError>(())
//! ```
//!
//! ## Programmatic Usage
//!
//! For anything beyond the one-call API (custom rules, configuration,
//! holding the tree between passes), use the pieces directly:
//!
//! ```
//! use whiff::{Matcher, RuleCatalog};
//! use whiff::rules::CurlUseF;
//!
//! let catalog = RuleCatalog::builder().rule(CurlUseF).build()?;
//! let tree = whiff::parse("RUN curl http://example.com\n")?;
//! let violations = Matcher::new(&catalog).match_all(&tree);
//! assert_eq!(violations.len(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Re-export the engine types.
pub use whiff_core::*;

// Re-export the syntax tree surface repairs and drivers work against.
pub use whiff_syntax::{
    normalize_line_endings, parse, NodeId, NodeKind, ParseError, Span, Tree, TreeError,
};

/// Built-in rules and the default catalog.
pub mod rules {
    pub use whiff_rules::*;
}

mod engine;

pub use engine::{
    parse_and_match, parse_and_match_with, repair_source, repair_source_with, EngineError,
    RepairReport,
};
