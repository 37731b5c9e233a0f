//! Cargo requirement updater
//!
//! Handles requirement formats:
//! - Default (caret): `1.2.3`, `1.2`, `0.3`
//! - Caret: `^1.2.3`
//! - Tilde: `~1.2.3`
//! - Exact: `=1.2.3`
//! - Wildcard: `1.*`, `1.2.*`
//! - Range: `>=1.0, <2.0`
//!
//! Whether a requirement accepts a version is decided by `semver::VersionReq`,
//! the same matcher Cargo itself uses.

use crate::domain::{Ecosystem, Version};
use crate::error::UpdateError;
use crate::parser::{Grammar, ParsedRequirement};
use crate::update::strategy::Strategy;
use crate::update::{RequirementUpdate, RequirementUpdater};
use semver::VersionReq;

/// Cargo requirement updater
#[derive(Debug, Clone)]
pub struct CargoUpdater {
    strategy: Strategy,
}

/// Matches with `semver`, falling back to the grammar when it rejects the input
fn semver_satisfies(parsed: &ParsedRequirement, version: &Version, grammar: &Grammar) -> bool {
    match (VersionReq::parse(&parsed.input), version.to_semver()) {
        (Ok(req), Some(version)) => req.matches(&version),
        _ => parsed.satisfied_by(version, grammar),
    }
}

impl CargoUpdater {
    /// Creates the updater
    pub fn new() -> Self {
        Self {
            strategy: Strategy::new(
                Grammar::for_ecosystem(Ecosystem::Cargo),
                |target| format!("^{}", target),
                |target| format!("={}", target),
            )
            .with_satisfaction(semver_satisfies),
        }
    }
}

impl Default for CargoUpdater {
    fn default() -> Self {
        Self::new()
    }
}

impl RequirementUpdater for CargoUpdater {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Cargo
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
