//! Cargo.toml patcher for Rust projects
//!
//! Handles:
//! - Plain requirement: `serde = "1.0"`
//! - Inline table: `serde = { version = "1.0", features = [...] }`
//! - Table form: `[dependencies.serde]` followed by `version = "1.0"`
//! - Any of `dependencies`, `dev-dependencies`, `build-dependencies`,
//!   including `target.<cfg>.` prefixed tables

use crate::domain::Ecosystem;
use crate::error::ManifestError;
use crate::manifest::ManifestPatcher;
use regex::Regex;

/// Patcher for Cargo.toml files
pub struct CargoTomlPatcher;

impl ManifestPatcher for CargoTomlPatcher {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Cargo
    }

    fn update_requirement(
        &self,
        content: &str,
        package: &str,
        old: &str,
        new: &str,
    ) -> Result<String, ManifestError> {
        content
            .parse::<toml::Table>()
            .map_err(|e| ManifestError::toml_parse_error("Cargo.toml", e.to_string()))?;

        let name = regex::escape(package);
        let old_quoted = format!(r#""{}""#, regex::escape(old));

        let patterns = [
            // package = "old"
            format!(r#"(?m)^(\s*{}\s*=\s*){}"#, name, old_quoted),
            // package = { ..., version = "old", ... }
            format!(
                r#"(?m)^(\s*{}\s*=\s*\{{[^}}\n]*?\bversion\s*=\s*){}"#,
                name, old_quoted
            ),
            // [dependencies.package] ... version = "old"
            format!(
                r#"(?m)(^\[(?:[^\]\n]*\.)?(?:dependencies|dev-dependencies|build-dependencies)\.{}\][^\[]*?^\s*version\s*=\s*){}"#,
                name, old_quoted
            ),
        ];

        let mut result = content.to_string();
        let mut updated = false;
        for pattern in &patterns {
            let Ok(re) = Regex::new(pattern) else {
                continue;
            };
            if re.is_match(&result) {
                result = re
                    .replace_all(&result, |caps: &regex::Captures| {
                        format!(r#"{}"{}""#, &caps[1], new)
                    })
                    .into_owned();
                updated = true;
            }
        }

        if updated {
            Ok(result)
        } else {
            Err(ManifestError::requirement_not_found("Cargo.toml", package, old))
        }
    }
}
