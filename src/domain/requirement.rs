//! Requirement records shared by every ecosystem
//!
//! A dependency may be declared in several files (or several times in
//! one file), so its requirements form an ordered list. Updaters map over
//! that list one-to-one; downstream patching aligns old and new entries
//! by index.

use super::{Ecosystem, Version};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a dependency is fetched from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// A git repository
    Git,
    /// The ecosystem's default registry
    Registry,
    /// A local path
    Path,
    /// A non-default registry
    PrivateRegistry,
}

/// Structured source descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    /// Source type
    #[serde(rename = "type")]
    pub kind: SourceKind,
    /// Repository or registry URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Tracked branch, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    /// Pinned ref (tag or commit), if any
    #[serde(default, rename = "ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

impl Source {
    /// Creates a git source
    pub fn git(url: impl Into<String>) -> Self {
        Self {
            kind: SourceKind::Git,
            url: Some(url.into()),
            branch: None,
            reference: None,
        }
    }

    /// Creates a source of any kind without location details
    pub fn of_kind(kind: SourceKind) -> Self {
        Self {
            kind,
            url: None,
            branch: None,
            reference: None,
        }
    }

    /// Sets the pinned ref (builder pattern)
    pub fn with_ref(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    /// Sets the tracked branch (builder pattern)
    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    /// Returns true if this is a git source
    pub fn is_git(&self) -> bool {
        self.kind == SourceKind::Git
    }

    /// Returns true if both sources point at the same place
    pub fn same_origin(&self, other: &Source) -> bool {
        self.kind == other.kind && self.url == other.url
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            SourceKind::Git => "git",
            SourceKind::Registry => "registry",
            SourceKind::Path => "path",
            SourceKind::PrivateRegistry => "private registry",
        };
        match &self.url {
            Some(url) => write!(f, "{} {}", kind, url)?,
            None => write!(f, "{}", kind)?,
        }
        if let Some(reference) = &self.reference {
            write!(f, "#{}", reference)?;
        }
        Ok(())
    }
}

/// A single declared constraint tied to one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    /// Raw requirement text, absent when the dependency declares none
    #[serde(default)]
    pub requirement: Option<String>,
    /// Originating manifest path
    pub file: String,
    /// Dependency groups (e.g. `dependencies`, `devDependencies`)
    #[serde(default)]
    pub groups: Vec<String>,
    /// Structured source, absent for the default registry
    #[serde(default)]
    pub source: Option<Source>,
}

impl Requirement {
    /// Creates a registry requirement declared in `file`
    pub fn new(requirement: impl Into<String>, file: impl Into<String>) -> Self {
        Self {
            requirement: Some(requirement.into()),
            file: file.into(),
            groups: Vec::new(),
            source: None,
        }
    }

    /// Creates a requirement without an explicit constraint
    pub fn unconstrained(file: impl Into<String>) -> Self {
        Self {
            requirement: None,
            file: file.into(),
            groups: Vec::new(),
            source: None,
        }
    }

    /// Sets the groups (builder pattern)
    pub fn with_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups = groups.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the source (builder pattern)
    pub fn with_source(mut self, source: Source) -> Self {
        self.source = Some(source);
        self
    }

    /// Copy of this record with a different requirement string
    pub fn with_requirement(&self, requirement: Option<String>) -> Self {
        Self {
            requirement,
            ..self.clone()
        }
    }

    /// Returns true if this requirement comes from a git source
    pub fn is_git(&self) -> bool {
        self.source.as_ref().is_some_and(Source::is_git)
    }

    /// The requirement text, or an empty string
    pub fn requirement_str(&self) -> &str {
        self.requirement.as_deref().unwrap_or("")
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.requirement {
            Some(req) => write!(f, "{} ({})", req, self.file)?,
            None => write!(f, "<none> ({})", self.file)?,
        }
        if let Some(source) = &self.source {
            write!(f, " [{}]", source)?;
        }
        Ok(())
    }
}

/// The versions an update may move to
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateTarget {
    /// Newest known version
    #[serde(default)]
    pub latest_version: Option<Version>,
    /// Newest version installable without breaking other dependencies
    #[serde(default)]
    pub latest_resolvable_version: Option<Version>,
}

impl UpdateTarget {
    /// Creates a target where latest and resolvable coincide
    pub fn resolvable(version: Version) -> Self {
        Self {
            latest_version: Some(version.clone()),
            latest_resolvable_version: Some(version),
        }
    }

    /// Creates a target with no installable version
    pub fn none() -> Self {
        Self::default()
    }

    /// Returns true if the resolvable version is held back below the latest
    pub fn is_held_back(&self) -> bool {
        match (&self.latest_version, &self.latest_resolvable_version) {
            (Some(latest), Some(resolvable)) => resolvable < latest,
            (Some(_), None) => true,
            _ => false,
        }
    }
}

/// Git information supplied by the ref-resolution collaborator
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitRefContext {
    /// Tag resolved for the target version, if one exists
    #[serde(default)]
    pub latest_tag: Option<String>,
    /// Whether the registry publishes the target version
    #[serde(default)]
    pub registry_release: bool,
}

/// A dependency and everything needed to update it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    /// Package name
    pub name: String,
    /// Ecosystem the dependency belongs to
    pub ecosystem: Ecosystem,
    /// Whether the declaring project is a library
    #[serde(default)]
    pub library: bool,
    /// Declared requirements, in file order
    pub requirements: Vec<Requirement>,
    /// Update target versions
    #[serde(default)]
    pub target: UpdateTarget,
    /// Git ref information for git-sourced requirements
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git: Option<GitRefContext>,
}

impl Dependency {
    /// Creates a new dependency
    pub fn new(
        name: impl Into<String>,
        ecosystem: Ecosystem,
        requirements: Vec<Requirement>,
        target: UpdateTarget,
    ) -> Self {
        Self {
            name: name.into(),
            ecosystem,
            library: false,
            requirements,
            target,
            git: None,
        }
    }

    /// Marks the dependency as declared by a library (builder pattern)
    pub fn as_library(mut self, library: bool) -> Self {
        self.library = library;
        self
    }

    /// Attaches git ref information (builder pattern)
    pub fn with_git(mut self, git: GitRefContext) -> Self {
        self.git = Some(git);
        self
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lib_marker = if self.library { " (library)" } else { "" };
        write!(f, "{}{} [{}]", self.name, lib_marker, self.ecosystem)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    #[test]
    fn test_requirement_new() {
        let req = Requirement::new("^1.2.3", "package.json").with_groups(["dependencies"]);
        assert_eq!(req.requirement.as_deref(), Some("^1.2.3"));
        assert_eq!(req.file, "package.json");
        assert_eq!(req.groups, vec!["dependencies".to_string()]);
        assert!(!req.is_git());
    }

    #[test]
    fn test_with_requirement_copies_other_fields() {
        let req = Requirement::new("^1.0.0", "package.json")
            .with_groups(["devDependencies"])
            .with_source(Source::git("https://github.com/a/b").with_ref("v1.0.0"));
        let updated = req.with_requirement(Some("^2.0.0".to_string()));
        assert_eq!(updated.requirement.as_deref(), Some("^2.0.0"));
        assert_eq!(updated.groups, req.groups);
        assert_eq!(updated.source, req.source);
    }

    #[test]
    fn test_requirement_display() {
        let req = Requirement::new("~1.2", "composer.json");
        assert_eq!(format!("{}", req), "~1.2 (composer.json)");

        let git = Requirement::unconstrained("package.json")
            .with_source(Source::git("https://github.com/a/b").with_ref("master"));
        assert_eq!(
            format!("{}", git),
            "<none> (package.json) [git https://github.com/a/b#master]"
        );
    }

    #[test]
    fn test_source_same_origin() {
        let a = Source::git("https://github.com/a/b").with_ref("v1");
        let b = Source::git("https://github.com/a/b").with_ref("v2");
        let c = Source::git("https://github.com/a/c");
        assert!(a.same_origin(&b));
        assert!(!a.same_origin(&c));
        assert!(!a.same_origin(&Source::of_kind(SourceKind::Registry)));
    }

    #[test]
    fn test_update_target_held_back() {
        let target = UpdateTarget {
            latest_version: Some(v("3.0.0")),
            latest_resolvable_version: Some(v("2.5.0")),
        };
        assert!(target.is_held_back());
        assert!(!UpdateTarget::resolvable(v("2.5.0")).is_held_back());
        assert!(!UpdateTarget::none().is_held_back());
    }

    #[test]
    fn test_serde_source_field_names() {
        let source = Source::git("https://github.com/a/b").with_ref("v1.0.0");
        let json = serde_json::to_string(&source).unwrap();
        assert_eq!(
            json,
            r#"{"type":"git","url":"https://github.com/a/b","ref":"v1.0.0"}"#
        );
    }

    #[test]
    fn test_serde_dependency_defaults() {
        let json = r#"{
            "name": "left-pad",
            "ecosystem": "npm",
            "requirements": [{"requirement": "^1.0.0", "file": "package.json"}]
        }"#;
        let dep: Dependency = serde_json::from_str(json).unwrap();
        assert!(!dep.library);
        assert!(dep.git.is_none());
        assert_eq!(dep.target, UpdateTarget::none());
        assert!(dep.requirements[0].groups.is_empty());
    }

    #[test]
    fn test_dependency_display() {
        let dep = Dependency::new("serde", Ecosystem::Cargo, Vec::new(), UpdateTarget::none())
            .as_library(true);
        assert_eq!(format!("{}", dep), "serde (library) [Cargo]");
    }
}
