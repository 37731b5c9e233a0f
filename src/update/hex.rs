//! Hex (mix) requirement updater
//!
//! Handles requirement formats:
//! - Exact: `1.2.3`, `== 1.2.3`
//! - Pessimistic: `~> 1.2`, `~> 1.2.3`
//! - Range: `>= 1.0 and < 2.0`
//! - Alternatives: `~> 1.0 or ~> 2.0`

use crate::domain::{Ecosystem, Version};
use crate::error::UpdateError;
use crate::parser::Grammar;
use crate::update::strategy::Strategy;
use crate::update::{RequirementUpdate, RequirementUpdater};

/// Hex requirement updater
#[derive(Debug, Clone)]
pub struct HexUpdater {
    strategy: Strategy,
}

impl HexUpdater {
    /// Creates the updater
    pub fn new() -> Self {
        Self {
            strategy: Strategy::new(
                Grammar::for_ecosystem(Ecosystem::Hex),
                |target| format!("~> {}", target),
                |target| format!("== {}", target),
            ),
        }
    }
}

impl Default for HexUpdater {
    fn default() -> Self {
        Self::new()
    }
}

impl RequirementUpdater for HexUpdater {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Hex
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
