//! Requirement updating
//!
//! This module provides:
//! - The `RequirementUpdater` trait with one implementation per ecosystem
//! - `UpdaterRegistry`, the explicit ecosystem-to-updater table
//! - Dependency-level updating, including git source transitions
//! - `UpdateJudge`, which applies the CLI filters before updating

pub mod bump;
mod cargo;
mod composer;
mod filter;
mod go_dep;
mod hex;
mod maven;
mod npm;
mod python;
mod source;
pub(crate) mod strategy;
mod terraform;

pub use cargo::CargoUpdater;
pub use composer::ComposerUpdater;
pub use filter::UpdateFilter;
pub use go_dep::GoDepUpdater;
pub use hex::HexUpdater;
pub use maven::MavenUpdater;
pub use npm::NpmUpdater;
pub use python::PythonUpdater;
pub use source::{classify_ref, resolve_source_transition, RefKind, SourceTransition};
pub use terraform::TerraformUpdater;

use crate::domain::{
    ChangeKind, Dependency, Ecosystem, GitRefContext, Requirement, RequirementChange, SkipReason,
    Source, SourceKind, UpdateResult, UpdateTarget, Version,
};
use crate::error::UpdateError;
use crate::parser::is_version_requirement;
use log::{debug, info, warn};
use std::collections::HashMap;
use std::fmt;

/// Outcome of rewriting one requirement string
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequirementUpdate {
    /// The new requirement text
    Updated(String),
    /// The text stays as it is
    Unchanged(SkipReason),
}

/// Trait for ecosystem-specific requirement rewriting
pub trait RequirementUpdater: Send + Sync {
    /// Returns the ecosystem this updater handles
    fn ecosystem(&self) -> Ecosystem;

    /// Rewrites `requirement` so that `target` is permitted
    ///
    /// Returns `Unchanged` when the target is already allowed or the text
    /// carries no version. Errors only on constraints with no bump rule.
    fn updated_requirement(
        &self,
        requirement: &str,
        target: &Version,
        is_library: bool,
    ) -> Result<RequirementUpdate, UpdateError>;

    /// The requirement written when a dependency moves onto the registry
    fn registry_requirement(&self, target: &Version) -> String;

    /// Returns true if `target` already satisfies `requirement`
    fn is_satisfied(&self, requirement: &str, target: &Version) -> bool;
}

/// Get the updater for the specified ecosystem
pub fn get_updater(ecosystem: Ecosystem) -> Box<dyn RequirementUpdater> {
    match ecosystem {
        Ecosystem::Npm => Box::new(NpmUpdater::new()),
        Ecosystem::Composer => Box::new(ComposerUpdater::new()),
        Ecosystem::Cargo => Box::new(CargoUpdater::new()),
        Ecosystem::Python => Box::new(PythonUpdater::new()),
        Ecosystem::Terraform => Box::new(TerraformUpdater::new()),
        Ecosystem::Hex => Box::new(HexUpdater::new()),
        Ecosystem::GoDep => Box::new(GoDepUpdater::new()),
        Ecosystem::Maven => Box::new(MavenUpdater::new()),
    }
}

/// Ecosystem-to-updater table
///
/// `Default` registers every built-in updater. Start from `empty()` to
/// register a custom set.
pub struct UpdaterRegistry {
    updaters: HashMap<Ecosystem, Box<dyn RequirementUpdater>>,
}

impl UpdaterRegistry {
    /// Creates a registry with no updaters
    pub fn empty() -> Self {
        Self {
            updaters: HashMap::new(),
        }
    }

    /// Registers an updater under its own ecosystem, replacing any previous one
    pub fn register(&mut self, updater: Box<dyn RequirementUpdater>) {
        self.updaters.insert(updater.ecosystem(), updater);
    }

    /// Registers an updater (builder pattern)
    pub fn with_updater(mut self, updater: Box<dyn RequirementUpdater>) -> Self {
        self.register(updater);
        self
    }

    /// Looks up the updater for an ecosystem
    pub fn get(&self, ecosystem: Ecosystem) -> Result<&dyn RequirementUpdater, UpdateError> {
        self.updaters
            .get(&ecosystem)
            .map(|updater| updater.as_ref())
            .ok_or(UpdateError::UnsupportedEcosystem { ecosystem })
    }

    /// Registered ecosystems, in declaration order
    pub fn ecosystems(&self) -> Vec<Ecosystem> {
        Ecosystem::all()
            .iter()
            .copied()
            .filter(|e| self.updaters.contains_key(e))
            .collect()
    }

    /// Updates every requirement of a dependency
    pub fn update_dependency(
        &self,
        dependency: &Dependency,
    ) -> Result<Vec<RequirementChange>, UpdateError> {
        self.requirement_changes(
            dependency.ecosystem,
            &dependency.requirements,
            &dependency.target,
            dependency.library,
            dependency.git.as_ref(),
        )
    }

    /// Maps requirements one-to-one onto their updated form
    ///
    /// The output has the same length and order as `requirements`, and every
    /// field other than the requirement text and source is carried over.
    pub fn requirement_changes(
        &self,
        ecosystem: Ecosystem,
        requirements: &[Requirement],
        target: &UpdateTarget,
        is_library: bool,
        git: Option<&GitRefContext>,
    ) -> Result<Vec<RequirementChange>, UpdateError> {
        let Some(resolvable) = &target.latest_resolvable_version else {
            debug!("No resolvable version, leaving {} requirement(s)", requirements.len());
            return Ok(requirements
                .iter()
                .map(|r| RequirementChange::unchanged(r, SkipReason::NoTarget))
                .collect());
        };

        check_sources(requirements)?;

        let updater = self.get(ecosystem)?;
        let target = Version::parse_for(resolvable.as_str(), ecosystem)?;
        let git = git.cloned().unwrap_or_default();

        requirements
            .iter()
            .map(|requirement| change_for(updater, requirement, &target, is_library, &git))
            .collect()
    }
}

impl Default for UpdaterRegistry {
    fn default() -> Self {
        Ecosystem::all()
            .iter()
            .fold(Self::empty(), |registry, &ecosystem| {
                registry.with_updater(get_updater(ecosystem))
            })
    }
}

impl fmt::Debug for UpdaterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpdaterRegistry")
            .field("ecosystems", &self.ecosystems())
            .finish()
    }
}

/// Updates requirement records with the built-in updaters
///
/// Returns the new records in input order. An absent resolvable version
/// returns the input unchanged.
pub fn update_requirements(
    ecosystem: Ecosystem,
    requirements: &[Requirement],
    target: &UpdateTarget,
    is_library: bool,
    git: Option<&GitRefContext>,
) -> Result<Vec<Requirement>, UpdateError> {
    let changes = UpdaterRegistry::default().requirement_changes(
        ecosystem,
        requirements,
        target,
        is_library,
        git,
    )?;
    Ok(changes.into_iter().map(|c| c.requirement).collect())
}

// Registry sources without a URL mean the same as no source at all
fn is_default_registry(source: &Source) -> bool {
    source.kind == SourceKind::Registry && source.url.is_none()
}

fn check_sources(requirements: &[Requirement]) -> Result<(), UpdateError> {
    let mut distinct: Vec<&Source> = Vec::new();
    for source in requirements
        .iter()
        .filter_map(|r| r.source.as_ref())
        .filter(|s| !is_default_registry(s))
    {
        if !distinct.iter().any(|seen| seen.same_origin(source)) {
            distinct.push(source);
        }
    }

    if distinct.len() > 1 {
        return Err(UpdateError::MultipleIncompatibleSources {
            sources: distinct.iter().map(|s| s.to_string()).collect(),
        });
    }
    Ok(())
}

fn change_for(
    updater: &dyn RequirementUpdater,
    requirement: &Requirement,
    target: &Version,
    is_library: bool,
    git: &GitRefContext,
) -> Result<RequirementChange, UpdateError> {
    if let Some(source) = requirement.source.as_ref().filter(|s| s.is_git()) {
        return git_change(updater, requirement, source, target, is_library, git);
    }

    let Some(text) = requirement.requirement.as_deref() else {
        return Ok(RequirementChange::unchanged(
            requirement,
            SkipReason::NotUpdatable,
        ));
    };

    match updater.updated_requirement(text, target, is_library)? {
        RequirementUpdate::Updated(new) => {
            debug!("{} -> {} ({})", text, new, requirement.file);
            Ok(RequirementChange::new(
                requirement.with_requirement(Some(new)),
                ChangeKind::Bumped,
            ))
        }
        RequirementUpdate::Unchanged(reason) => {
            debug!("{} unchanged: {}", text, reason);
            Ok(RequirementChange::unchanged(requirement, reason))
        }
    }
}

fn git_change(
    updater: &dyn RequirementUpdater,
    requirement: &Requirement,
    source: &Source,
    target: &Version,
    is_library: bool,
    git: &GitRefContext,
) -> Result<RequirementChange, UpdateError> {
    match resolve_source_transition(source, git) {
        SourceTransition::RefBumped { reference } => {
            debug!("Moving git ref to {} ({})", reference, requirement.file);
            let mut updated = requirement.clone();
            updated.source = Some(source.clone().with_ref(reference));
            if let Some(text) = requirement.requirement.as_deref() {
                if let RequirementUpdate::Updated(new) =
                    updater.updated_requirement(text, target, is_library)?
                {
                    updated.requirement = Some(new);
                }
            }
            Ok(RequirementChange::new(updated, ChangeKind::RefBumped))
        }
        SourceTransition::SourceSwitchedToRegistry => {
            let new_requirement = match requirement.requirement.as_deref() {
                Some(text) if is_version_requirement(text) => {
                    match updater.updated_requirement(text, target, is_library)? {
                        RequirementUpdate::Updated(new) => new,
                        RequirementUpdate::Unchanged(_) => text.to_string(),
                    }
                }
                _ => updater.registry_requirement(target),
            };
            debug!(
                "Switching {} to the registry as {}",
                source, new_requirement
            );
            let mut updated = requirement.with_requirement(Some(new_requirement));
            updated.source = None;
            Ok(RequirementChange::new(updated, ChangeKind::SwitchedToRegistry))
        }
        SourceTransition::NoChange => Ok(RequirementChange::unchanged(
            requirement,
            SkipReason::GitUnchanged,
        )),
    }
}

/// Decides the outcome for each dependency
///
/// Filters are checked first, then the dependency's requirements are run
/// through the registry. Updater errors become `Failed` results so one bad
/// dependency does not stop the rest.
#[derive(Debug)]
pub struct UpdateJudge {
    filter: UpdateFilter,
    registry: UpdaterRegistry,
}

impl UpdateJudge {
    /// Creates a judge using the built-in updaters
    pub fn new(filter: UpdateFilter) -> Self {
        Self::with_registry(filter, UpdaterRegistry::default())
    }

    /// Creates a judge with a custom updater registry
    pub fn with_registry(filter: UpdateFilter, registry: UpdaterRegistry) -> Self {
        Self { filter, registry }
    }

    /// Checks if a dependency should be skipped based on filters
    pub fn should_skip(&self, dependency: &Dependency) -> Option<SkipReason> {
        if !self.filter.should_process_ecosystem(dependency.ecosystem) {
            return Some(SkipReason::EcosystemFiltered);
        }

        if !self.filter.should_process_package(&dependency.name) {
            if !self.filter.only.is_empty() {
                return Some(SkipReason::NotInOnlyList);
            }
            return Some(SkipReason::Excluded);
        }

        None
    }

    /// Judges a single dependency
    pub fn judge(&self, dependency: &Dependency) -> UpdateResult {
        if let Some(reason) = self.should_skip(dependency) {
            debug!("Skipping {}: {}", dependency.name, reason);
            return UpdateResult::skip(dependency.clone(), reason);
        }

        if dependency.target.is_held_back() {
            info!(
                "{}: latest version is not resolvable, using {}",
                dependency.name,
                dependency
                    .target
                    .latest_resolvable_version
                    .as_ref()
                    .map(ToString::to_string)
                    .unwrap_or_else(|| "nothing".to_string())
            );
        }

        match self.registry.update_dependency(dependency) {
            Ok(changes) => UpdateResult::from_changes(dependency.clone(), changes),
            Err(e) => {
                warn!("Failed to update {}: {}", dependency.name, e);
                UpdateResult::failed(dependency.clone(), e.to_string())
            }
        }
    }

    /// Judges dependencies in order
    pub fn judge_all(&self, dependencies: &[Dependency]) -> Vec<UpdateResult> {
        dependencies.iter().map(|d| self.judge(d)).collect()
    }
}
