//! requirements.txt patcher for pip projects
//!
//! Handles PEP 508 lines:
//! - `requests==2.31.0`
//! - `requests[socks] >=2.0,<3.0 ; python_version >= "3.8"`
//! - Trailing `# comments`
//!
//! Names match case-insensitively with `-`, `_` and `.` treated alike.

use crate::domain::Ecosystem;
use crate::error::ManifestError;
use crate::manifest::ManifestPatcher;
use regex::Regex;

/// Patcher for requirements.txt files
pub struct RequirementsTxtPatcher;

// PEP 503 normalisation: runs of -, _ and . are equivalent
fn name_pattern(package: &str) -> String {
    package
        .split(['-', '_', '.'])
        .filter(|part| !part.is_empty())
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"[-_.]+")
}

impl ManifestPatcher for RequirementsTxtPatcher {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Python
    }

    fn update_requirement(
        &self,
        content: &str,
        package: &str,
        old: &str,
        new: &str,
    ) -> Result<String, ManifestError> {
        let pattern = format!(
            r"(?mi)^([ \t]*{}(?:\[[^\]\n]*\])?[ \t]*){}([ \t]*(?:;[^\n]*|#[^\n]*)?)$",
            name_pattern(package),
            regex::escape(old)
        );
        let re = Regex::new(&pattern)
            .map_err(|_| ManifestError::requirement_not_found("requirements.txt", package, old))?;

        if !re.is_match(content) {
            return Err(ManifestError::requirement_not_found(
                "requirements.txt",
                package,
                old,
            ));
        }

        let replaced = re.replace_all(content, |caps: &regex::Captures| {
            format!("{}{}{}", &caps[1], new, &caps[2])
        });
        Ok(replaced.into_owned())
    }
}
