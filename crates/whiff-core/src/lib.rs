//! # whiff-core
//!
//! The smell-detection and repair engine for Dockerfiles.
//!
//! This crate provides the pieces the rule set and the drivers are built
//! from:
//!
//! - [`Query`] — a small algebra for describing tree shapes to search for
//! - [`Rule`] — the trait one smell definition implements
//! - [`RuleCatalog`] — the immutable, ordered rule collection
//! - [`Matcher`] — evaluates every rule against a tree, in a stable order
//! - [`Violation`] / [`RepairOutcome`] — one rule firing at one location,
//!   and what happened when its repair ran
//!
//! ## Example
//!
//! ```ignore
//! use whiff_core::{Matcher, RuleCatalog};
//!
//! let catalog = RuleCatalog::builder().rule(MyRule).build()?;
//! let matcher = Matcher::new(&catalog);
//! let violations = matcher.match_all(&tree);
//! let outcomes = matcher.repair_all(&mut tree, &violations);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod catalog;
mod config;
mod matcher;
mod query;
mod rule;
mod violation;

pub use catalog::{CatalogError, RuleCatalog, RuleCatalogBuilder};
pub use config::{Config, ConfigError, RuleConfig};
pub use matcher::Matcher;
pub use query::Query;
pub use rule::{RepairError, Rule, RuleBox, RuleGroup};
pub use violation::{Location, RepairOutcome, Violation, ViolationDiagnostic};
