//! Manifest patching
//!
//! This module provides functionality to:
//! - Replace one dependency's requirement string inside manifest text
//! - Pick the patcher for a file by its name
//! - Write patched manifests back, honouring dry-run
//!
//! Patching is textual so formatting, key order and comments survive.

mod cargo_toml;
mod composer_json;
mod package_json;
mod requirements_txt;
mod writer;

pub use cargo_toml::CargoTomlPatcher;
pub use composer_json::ComposerJsonPatcher;
pub use package_json::PackageJsonPatcher;
pub use requirements_txt::RequirementsTxtPatcher;
pub use writer::{read_manifest, write_manifest, ManifestEdit, ManifestWriter, WriteResult};

use crate::domain::Ecosystem;
use crate::error::ManifestError;
use std::path::Path;

/// Trait for rewriting requirement strings in a manifest format
pub trait ManifestPatcher {
    /// Returns the ecosystem whose manifests this patcher handles
    fn ecosystem(&self) -> Ecosystem;

    /// Replaces `old` with `new` for `package`
    ///
    /// Fails with `RequirementNotFound` when the package is not declared
    /// with exactly `old`.
    fn update_requirement(
        &self,
        content: &str,
        package: &str,
        old: &str,
        new: &str,
    ) -> Result<String, ManifestError>;

    /// Like `update_requirement`, limited to the dependency sections in `groups`
    ///
    /// Formats that do not key sections by group name patch every declaration.
    fn update_requirement_in(
        &self,
        content: &str,
        package: &str,
        _groups: &[String],
        old: &str,
        new: &str,
    ) -> Result<String, ManifestError> {
        self.update_requirement(content, package, old, new)
    }
}

/// Get a manifest patcher for a file, chosen by file name
pub fn get_patcher(path: &Path) -> Option<Box<dyn ManifestPatcher>> {
    let file_name = path.file_name().and_then(|n| n.to_str())?;
    match file_name {
        "package.json" => Some(Box::new(PackageJsonPatcher)),
        "composer.json" => Some(Box::new(ComposerJsonPatcher)),
        "Cargo.toml" => Some(Box::new(CargoTomlPatcher)),
        name if is_requirements_file(name) => Some(Box::new(RequirementsTxtPatcher)),
        _ => None,
    }
}

// requirements.txt, requirements-dev.txt, dev-requirements.txt, ...
fn is_requirements_file(name: &str) -> bool {
    name.ends_with(".txt") && name.contains("requirements")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_patcher_by_file_name() {
        let ecosystem = |p: &str| get_patcher(Path::new(p)).map(|patcher| patcher.ecosystem());
        assert_eq!(ecosystem("package.json"), Some(Ecosystem::Npm));
        assert_eq!(ecosystem("web/composer.json"), Some(Ecosystem::Composer));
        assert_eq!(ecosystem("crates/core/Cargo.toml"), Some(Ecosystem::Cargo));
        assert_eq!(ecosystem("requirements.txt"), Some(Ecosystem::Python));
        assert_eq!(ecosystem("requirements-dev.txt"), Some(Ecosystem::Python));
    }

    #[test]
    fn test_get_patcher_unknown() {
        assert!(get_patcher(Path::new("mix.exs")).is_none());
        assert!(get_patcher(Path::new("notes.txt")).is_none());
        assert!(get_patcher(Path::new("")).is_none());
    }
}
