//! composer.json patcher for PHP projects
//!
//! Handles:
//! - require
//! - require-dev

use crate::domain::Ecosystem;
use crate::error::ManifestError;
use crate::manifest::package_json::patch_json;
use crate::manifest::ManifestPatcher;

const SECTIONS: &[&str] = &["require", "require-dev"];

/// Patcher for composer.json files
pub struct ComposerJsonPatcher;

impl ManifestPatcher for ComposerJsonPatcher {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Composer
    }

    fn update_requirement(
        &self,
        content: &str,
        package: &str,
        old: &str,
        new: &str,
    ) -> Result<String, ManifestError> {
        patch_json(content, "composer.json", SECTIONS, &[], package, old, new)
    }

    fn update_requirement_in(
        &self,
        content: &str,
        package: &str,
        groups: &[String],
        old: &str,
        new: &str,
    ) -> Result<String, ManifestError> {
        patch_json(content, "composer.json", SECTIONS, groups, package, old, new)
    }
}
