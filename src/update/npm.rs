//! npm / yarn requirement updater
//!
//! Handles requirement formats:
//! - Exact: `1.2.3` (a partial `1.2` is an x-range)
//! - Caret: `^1.2.3`
//! - Tilde: `~1.2.3`, `~1.2`
//! - Wildcard: `1.x`, `1.2.*`
//! - Range: `>=1.0.0 <2.0.0`, `1.0.0 - 2.0.0`
//! - Alternatives: `^1.0.0 || ^2.0.0`
//!
//! Dist-tags (`latest`), URLs and `npm:` aliases are left alone.

use crate::domain::{Ecosystem, Version};
use crate::error::UpdateError;
use crate::parser::Grammar;
use crate::update::strategy::Strategy;
use crate::update::{RequirementUpdate, RequirementUpdater};

/// npm requirement updater
#[derive(Debug, Clone)]
pub struct NpmUpdater {
    strategy: Strategy,
}

impl NpmUpdater {
    /// Creates the updater
    pub fn new() -> Self {
        Self {
            strategy: Strategy::new(
                Grammar::for_ecosystem(Ecosystem::Npm),
                |target| format!("^{}", target),
                |target| target.to_string(),
            ),
        }
    }
}

impl Default for NpmUpdater {
    fn default() -> Self {
        Self::new()
    }
}

impl RequirementUpdater for NpmUpdater {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Npm
    }

    fn updated_requirement(
        &self,
        requirement: &str,
        target: &Version,
        is_library: bool,
    ) -> Result<RequirementUpdate, UpdateError> {
        self.strategy.update(requirement, target, is_library)
    }

    fn registry_requirement(&self, target: &Version) -> String {
        self.strategy.registry_requirement(target)
    }

    fn is_satisfied(&self, requirement: &str, target: &Version) -> bool {
        self.strategy.is_satisfied(requirement, target)
    }
}
