//! Update outcome types

use super::{Dependency, Requirement};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reason why a requirement or dependency was left unchanged
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// No latest resolvable version was supplied
    NoTarget,
    /// Requirement has no version (branch name, `*`, URL, dist-tag)
    NotUpdatable,
    /// Target already satisfies the requirement
    AlreadySatisfied,
    /// Requirement or alias could not be read as a version constraint
    UnresolvableVersion(String),
    /// Git source with no newer tag and no registry release
    GitUnchanged,
    /// Package was excluded via --exclude flag
    Excluded,
    /// Package not in --only list
    NotInOnlyList,
    /// Ecosystem not selected via --ecosystem
    EcosystemFiltered,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoTarget => write!(f, "no resolvable version"),
            SkipReason::NotUpdatable => write!(f, "not a version requirement"),
            SkipReason::AlreadySatisfied => write!(f, "already satisfied"),
            SkipReason::UnresolvableVersion(msg) => write!(f, "unresolvable version: {}", msg),
            SkipReason::GitUnchanged => write!(f, "git source unchanged"),
            SkipReason::Excluded => write!(f, "excluded by --exclude"),
            SkipReason::NotInOnlyList => write!(f, "not in --only list"),
            SkipReason::EcosystemFiltered => write!(f, "ecosystem filtered"),
        }
    }
}

/// What happened to a single requirement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChangeKind {
    /// Requirement string rewritten
    Bumped,
    /// Git ref moved to a newer tag
    RefBumped,
    /// Git source dropped in favour of the registry
    SwitchedToRegistry,
    /// Left as is
    Unchanged {
        /// Why nothing changed
        reason: SkipReason,
    },
}

impl ChangeKind {
    /// Returns true if the requirement was modified
    pub fn is_change(&self) -> bool {
        !matches!(self, ChangeKind::Unchanged { .. })
    }

    /// Shorthand for an unchanged outcome
    pub fn unchanged(reason: SkipReason) -> Self {
        ChangeKind::Unchanged { reason }
    }
}

/// A requirement after the updater ran, with how it got there
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementChange {
    /// The resulting requirement record
    pub requirement: Requirement,
    /// Outcome for this entry
    pub change: ChangeKind,
}

impl RequirementChange {
    /// Creates a change record
    pub fn new(requirement: Requirement, change: ChangeKind) -> Self {
        Self {
            requirement,
            change,
        }
    }

    /// Record for an untouched requirement
    pub fn unchanged(requirement: &Requirement, reason: SkipReason) -> Self {
        Self::new(requirement.clone(), ChangeKind::unchanged(reason))
    }
}

/// Result of updating a single dependency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UpdateResult {
    /// At least one requirement changed
    Update {
        /// The dependency as supplied
        dependency: Dependency,
        /// Per-requirement results, aligned with `dependency.requirements`
        changes: Vec<RequirementChange>,
    },
    /// Nothing changed
    Skip {
        /// The dependency as supplied
        dependency: Dependency,
        /// The reason for skipping
        reason: SkipReason,
    },
    /// The updater refused the dependency
    Failed {
        /// The dependency as supplied
        dependency: Dependency,
        /// Error description
        message: String,
    },
}

impl UpdateResult {
    /// Builds the result from per-requirement changes
    pub fn from_changes(dependency: Dependency, changes: Vec<RequirementChange>) -> Self {
        if changes.iter().any(|c| c.change.is_change()) {
            return UpdateResult::Update {
                dependency,
                changes,
            };
        }

        let reason = changes
            .iter()
            .filter_map(|c| match &c.change {
                ChangeKind::Unchanged { reason } => Some(reason.clone()),
                _ => None,
            })
            .max_by_key(reason_rank)
            .unwrap_or(SkipReason::NotUpdatable);
        UpdateResult::Skip { dependency, reason }
    }

    /// Creates a Skip result
    pub fn skip(dependency: Dependency, reason: SkipReason) -> Self {
        UpdateResult::Skip { dependency, reason }
    }

    /// Creates a Failed result
    pub fn failed(dependency: Dependency, message: impl Into<String>) -> Self {
        UpdateResult::Failed {
            dependency,
            message: message.into(),
        }
    }

    /// Returns true if this is an update result
    pub fn is_update(&self) -> bool {
        matches!(self, UpdateResult::Update { .. })
    }

    /// Returns true if this is a skip result
    pub fn is_skip(&self) -> bool {
        matches!(self, UpdateResult::Skip { .. })
    }

    /// Returns true if this is a failure
    pub fn is_failure(&self) -> bool {
        matches!(self, UpdateResult::Failed { .. })
    }

    /// Returns the dependency reference
    pub fn dependency(&self) -> &Dependency {
        match self {
            UpdateResult::Update { dependency, .. } => dependency,
            UpdateResult::Skip { dependency, .. } => dependency,
            UpdateResult::Failed { dependency, .. } => dependency,
        }
    }

    /// Returns the package name
    pub fn package_name(&self) -> &str {
        &self.dependency().name
    }

    /// Iterates over (old, new) pairs whose requirement text changed
    pub fn changed_pairs(&self) -> Vec<(&Requirement, &Requirement)> {
        match self {
            UpdateResult::Update {
                dependency,
                changes,
            } => dependency
                .requirements
                .iter()
                .zip(changes.iter())
                .filter(|(_, c)| c.change.is_change())
                .map(|(old, c)| (old, &c.requirement))
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// Ranks soft reasons so the most informative one represents a dependency
fn reason_rank(reason: &SkipReason) -> u8 {
    match reason {
        SkipReason::NotUpdatable => 0,
        SkipReason::GitUnchanged => 1,
        SkipReason::AlreadySatisfied => 2,
        SkipReason::UnresolvableVersion(_) => 3,
        SkipReason::NoTarget => 4,
        SkipReason::Excluded | SkipReason::NotInOnlyList | SkipReason::EcosystemFiltered => 5,
    }
}

impl fmt::Display for UpdateResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdateResult::Update { dependency, .. } => {
                let pairs: Vec<String> = self
                    .changed_pairs()
                    .iter()
                    .map(|(old, new)| {
                        format!(
                            "{} → {}",
                            old.requirement.as_deref().unwrap_or("<none>"),
                            new.requirement.as_deref().unwrap_or("<none>")
                        )
                    })
                    .collect();
                write!(f, "{}: {}", dependency.name, pairs.join(", "))
            }
            UpdateResult::Skip { dependency, reason } => {
                write!(f, "{}: skipped ({})", dependency.name, reason)
            }
            UpdateResult::Failed {
                dependency,
                message,
            } => write!(f, "{}: failed ({})", dependency.name, message),
        }
    }
}
