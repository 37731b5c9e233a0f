//! Python (pip / Pipenv / Poetry) requirement updater
//!
//! Handles requirement formats:
//! - Exact: `==1.2.3`, `===1.2.3`
//! - Compatible release: `~=1.4.5`
//! - Wildcard: `==1.2.*`
//! - Range: `>=1.0,<2.0`, `>=1.0, !=1.5.0`
//! - Poetry: `^1.2`, `~1.2`
//!
//! PEP 440 has no alternatives, so an unsatisfied range is rewritten in place.

use crate::domain::{Ecosystem, Version};
use crate::error::UpdateError;
use crate::parser::Grammar;
use crate::update::strategy::Strategy;
use crate::update::{RequirementUpdate, RequirementUpdater};

/// Python requirement updater
#[derive(Debug, Clone)]
pub struct PythonUpdater {
    strategy: Strategy,
}

impl PythonUpdater {
    /// Creates the updater
    pub fn new() -> Self {
        Self {
            strategy: Strategy::new(
                Grammar::for_ecosystem(Ecosystem::Python),
                |target| format!(">={}", target),
                |target| format!("=={}", target),
            ),
        }
    }
}

impl Default for PythonUpdater {
    fn default() -> Self {
        Self::new()
    }
}

impl RequirementUpdater for PythonUpdater {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Python
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
