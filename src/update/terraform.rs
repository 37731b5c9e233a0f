//! Terraform provider and module requirement updater
//!
//! Handles requirement formats:
//! - Exact: `1.2.3`, `= 1.2.3`
//! - Pessimistic: `~> 1.2`
//! - Range: `>= 1.0, < 2.0`, `!= 1.5.0`

use crate::domain::{Ecosystem, Version};
use crate::error::UpdateError;
use crate::parser::Grammar;
use crate::update::strategy::Strategy;
use crate::update::{RequirementUpdate, RequirementUpdater};

/// Terraform requirement updater
#[derive(Debug, Clone)]
pub struct TerraformUpdater {
    strategy: Strategy,
}

impl TerraformUpdater {
    /// Creates the updater
    pub fn new() -> Self {
        Self {
            strategy: Strategy::new(
                Grammar::for_ecosystem(Ecosystem::Terraform),
                |target| format!("~> {}", target),
                |target| target.to_string(),
            ),
        }
    }
}

impl Default for TerraformUpdater {
    fn default() -> Self {
        Self::new()
    }
}

impl RequirementUpdater for TerraformUpdater {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Terraform
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
