//! Composer requirement updater
//!
//! Handles requirement formats:
//! - Exact: `1.2.3`, `v1.2.3`
//! - Caret: `^1.2`
//! - Tilde: `~1.2` (next significant release, so `<2.0`)
//! - Wildcard: `1.2.*`
//! - Range: `>=1.0 <2.0`, `>=1.0,<2.0`, `1.0 - 2.0`
//! - Alternatives: `^1.0 || ^2.0`, `^1.0 | ^2.0`
//! - Stability flags: `^1.2@beta`
//! - Aliases: `1.2.3 as 1.0.x-dev`, `dev-master as 1.0.0`
//! - Branches: `dev-master`, `1.0.x-dev`

use crate::domain::{Ecosystem, Version};
use crate::error::UpdateError;
use crate::parser::Grammar;
use crate::update::strategy::Strategy;
use crate::update::{RequirementUpdate, RequirementUpdater};

/// Composer requirement updater
#[derive(Debug, Clone)]
pub struct ComposerUpdater {
    strategy: Strategy,
}

impl ComposerUpdater {
    /// Creates the updater
    pub fn new() -> Self {
        Self {
            strategy: Strategy::new(
                Grammar::for_ecosystem(Ecosystem::Composer),
                |target| format!("^{}", target),
                |target| target.to_string(),
            ),
        }
    }
}

impl Default for ComposerUpdater {
    fn default() -> Self {
        Self::new()
    }
}

impl RequirementUpdater for ComposerUpdater {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Composer
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
