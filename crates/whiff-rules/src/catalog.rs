//! The default catalog and per-group rule lists.

use crate::{
    ApkAddNoCache, AptGetInstallNoRecommends, AptGetInstallRemoveLists, AptGetInstallUseY,
    AptGetUpdateWithoutInstall, CurlUseF, FromPinTag, GpgUseBatch, MaintainerDeprecated, NoSudo,
    NpmCacheCleanAfterInstall, PipInstallNoCacheDir, YumInstallUseY,
};
use whiff_core::{CatalogError, RuleBox, RuleCatalog};

/// The binnacle (best-practices literature) rules.
#[must_use]
pub fn binnacle_rules() -> Vec<RuleBox> {
    vec![
        Box::new(AptGetInstallUseY),
        Box::new(AptGetInstallNoRecommends),
        Box::new(AptGetInstallRemoveLists),
        Box::new(CurlUseF),
        Box::new(NpmCacheCleanAfterInstall),
        Box::new(PipInstallNoCacheDir),
        Box::new(GpgUseBatch),
    ]
}

/// The hadolint-derived rules.
#[must_use]
pub fn hadolint_rules() -> Vec<RuleBox> {
    vec![
        Box::new(YumInstallUseY),
        Box::new(NoSudo),
        Box::new(FromPinTag),
        Box::new(MaintainerDeprecated),
    ]
}

/// The project-specific rules.
#[must_use]
pub fn whiff_rules() -> Vec<RuleBox> {
    vec![
        Box::new(ApkAddNoCache),
        Box::new(AptGetUpdateWithoutInstall),
    ]
}

/// Builds the full catalog: binnacle, then hadolint, then whiff rules.
///
/// The registration order here is the reporting order for every consumer.
///
/// # Errors
///
/// Returns [`CatalogError::DuplicateName`] if a rule name collides, which
/// would be a bug in this crate.
pub fn default_catalog() -> Result<RuleCatalog, CatalogError> {
    let mut builder = RuleCatalog::builder();
    for rule in binnacle_rules()
        .into_iter()
        .chain(hadolint_rules())
        .chain(whiff_rules())
    {
        builder = builder.rule_box(rule);
    }
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use whiff_core::{Rule, RuleGroup};

    #[test]
    fn catalog_has_all_rules_in_group_order() {
        let catalog = default_catalog().expect("catalog build failed");
        assert_eq!(catalog.len(), 13);

        let groups: Vec<RuleGroup> = catalog.rules().map(Rule::group).collect();
        let mut sorted = groups.clone();
        sorted.sort_by_key(|g| match g {
            RuleGroup::Binnacle => 0,
            RuleGroup::Hadolint => 1,
            RuleGroup::Whiff => 2,
        });
        assert_eq!(groups, sorted);
    }

    #[test]
    fn names_are_unique_and_kebab_case() {
        let catalog = default_catalog().expect("catalog build failed");
        for rule in catalog.rules() {
            assert!(rule
                .name()
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
            assert!(!rule.description().is_empty());
        }
    }

    #[test]
    fn group_lists_match_rule_groups() {
        for rule in binnacle_rules() {
            assert_eq!(rule.group(), RuleGroup::Binnacle);
        }
        for rule in hadolint_rules() {
            assert_eq!(rule.group(), RuleGroup::Hadolint);
        }
        for rule in whiff_rules() {
            assert_eq!(rule.group(), RuleGroup::Whiff);
        }
    }
}
