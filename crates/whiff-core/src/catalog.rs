//! The immutable, ordered rule catalog.

use crate::query::Query;
use crate::rule::{Rule, RuleBox, RuleGroup};
use std::collections::HashSet;
use thiserror::Error;

/// Errors detected while building a catalog.
///
/// These are programmer errors; a driver should abort startup on them
/// rather than trying to recover.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Two rules registered under the same name.
    #[error("duplicate rule name '{name}'")]
    DuplicateName {
        /// The offending rule name.
        name: String,
    },
}

pub(crate) struct CatalogEntry {
    pub(crate) rule: RuleBox,
    /// The rule's query, built once at registration.
    pub(crate) query: Query,
}

/// An ordered, named collection of rules.
///
/// Built once at process start and shared read-only; registration order is
/// the reporting order whenever multiple rules fire.
pub struct RuleCatalog {
    entries: Vec<CatalogEntry>,
}

impl RuleCatalog {
    /// Creates a new builder.
    #[must_use]
    pub fn builder() -> RuleCatalogBuilder {
        RuleCatalogBuilder::default()
    }

    /// Number of registered rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates rules in registration order.
    pub fn rules(&self) -> impl Iterator<Item = &dyn Rule> {
        self.entries.iter().map(|e| e.rule.as_ref())
    }

    /// Looks a rule up by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&dyn Rule> {
        self.entries
            .iter()
            .find(|e| e.rule.name() == name)
            .map(|e| e.rule.as_ref())
    }

    /// Rules belonging to one group, in registration order.
    #[must_use]
    pub fn by_group(&self, group: RuleGroup) -> Vec<&dyn Rule> {
        self.rules().filter(|r| r.group() == group).collect()
    }

    pub(crate) fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }
}

/// Builder for a [`RuleCatalog`].
#[derive(Default)]
pub struct RuleCatalogBuilder {
    entries: Vec<CatalogEntry>,
}

impl RuleCatalogBuilder {
    /// Registers a rule. Registration order is preserved.
    #[must_use]
    pub fn rule<R: Rule + 'static>(self, rule: R) -> Self {
        self.rule_box(Box::new(rule))
    }

    /// Registers a boxed rule.
    #[must_use]
    pub fn rule_box(mut self, rule: RuleBox) -> Self {
        let query = rule.query();
        self.entries.push(CatalogEntry { rule, query });
        self
    }

    /// Finalizes the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateName`] when two rules share a name.
    pub fn build(self) -> Result<RuleCatalog, CatalogError> {
        let mut seen = HashSet::new();
        for entry in &self.entries {
            let name = entry.rule.name();
            if !seen.insert(name) {
                return Err(CatalogError::DuplicateName {
                    name: name.to_string(),
                });
            }
        }
        Ok(RuleCatalog {
            entries: self.entries,
        })
    }
}
