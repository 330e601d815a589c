//! # whiff-rules
//!
//! Built-in Dockerfile smell rules for whiff.
//!
//! Each rule lives in its own module and implements [`whiff_core::Rule`];
//! [`default_catalog`] registers all of them in a fixed order, which is the
//! order violations are reported in.
//!
//! ## Available Rules
//!
//! | Group | Name | Repair |
//! |-------|------|--------|
//! | binnacle | `apt-get-install-use-y` | inserts `-y` |
//! | binnacle | `apt-get-install-no-recommends` | inserts `--no-install-recommends` |
//! | binnacle | `apt-get-install-remove-lists` | appends `&& rm -rf /var/lib/apt/lists/*` |
//! | binnacle | `curl-use-f` | inserts `-f` |
//! | binnacle | `npm-cache-clean-after-install` | appends `&& npm cache clean --force` |
//! | binnacle | `pip-install-no-cache-dir` | inserts `--no-cache-dir` |
//! | binnacle | `gpg-use-batch` | inserts `--batch` |
//! | hadolint | `yum-install-use-y` | inserts `-y` |
//! | hadolint | `no-sudo` | detect only |
//! | hadolint | `from-pin-tag` | detect only |
//! | hadolint | `maintainer-deprecated` | rewrites to `LABEL maintainer=` |
//! | whiff | `apk-add-no-cache` | inserts `--no-cache` |
//! | whiff | `apt-get-update-without-install` | detect only |
//!
//! ## Usage
//!
//! ```ignore
//! use whiff_core::Matcher;
//! use whiff_rules::default_catalog;
//!
//! let catalog = default_catalog()?;
//! let tree = whiff_syntax::parse(source)?;
//! let violations = Matcher::new(&catalog).match_all(&tree);
//! ```

mod apk_add_no_cache;
mod apt_get_install_no_recommends;
mod apt_get_install_remove_lists;
mod apt_get_install_use_y;
mod apt_get_update_without_install;
mod catalog;
mod curl_use_f;
mod from_pin_tag;
mod gpg_use_batch;
mod helpers;
mod maintainer_deprecated;
mod no_sudo;
mod npm_cache_clean_after_install;
mod pip_install_no_cache_dir;
mod yum_install_use_y;

pub use apk_add_no_cache::ApkAddNoCache;
pub use apt_get_install_no_recommends::AptGetInstallNoRecommends;
pub use apt_get_install_remove_lists::AptGetInstallRemoveLists;
pub use apt_get_install_use_y::AptGetInstallUseY;
pub use apt_get_update_without_install::AptGetUpdateWithoutInstall;
pub use catalog::{binnacle_rules, default_catalog, hadolint_rules, whiff_rules};
pub use curl_use_f::CurlUseF;
pub use from_pin_tag::FromPinTag;
pub use gpg_use_batch::GpgUseBatch;
pub use maintainer_deprecated::MaintainerDeprecated;
pub use no_sudo::NoSudo;
pub use npm_cache_clean_after_install::NpmCacheCleanAfterInstall;
pub use pip_install_no_cache_dir::PipInstallNoCacheDir;
pub use yum_install_use_y::YumInstallUseY;

/// Re-export core types for convenience.
pub use whiff_core::{Rule, RuleBox, RuleGroup, Violation};
