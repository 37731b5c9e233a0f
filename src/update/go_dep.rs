//! Go dep requirement updater
//!
//! dep constraints follow Masterminds/semver: a bare version means caret,
//! `~` allows patch updates, and alternatives use `||`.

use crate::domain::{Ecosystem, Version};
use crate::error::UpdateError;
use crate::parser::Grammar;
use crate::update::strategy::Strategy;
use crate::update::{RequirementUpdate, RequirementUpdater};

/// Go dep requirement updater
#[derive(Debug, Clone)]
pub struct GoDepUpdater {
    strategy: Strategy,
}

impl GoDepUpdater {
    /// Creates the updater
    pub fn new() -> Self {
        Self {
            strategy: Strategy::new(
                Grammar::for_ecosystem(Ecosystem::GoDep),
                |target| format!("^{}", target),
                |target| format!("={}", target),
            ),
        }
    }
}

impl Default for GoDepUpdater {
    fn default() -> Self {
        Self::new()
    }
}

impl RequirementUpdater for GoDepUpdater {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::GoDep
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
