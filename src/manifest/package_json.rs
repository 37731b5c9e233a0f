//! package.json patcher for npm and yarn projects
//!
//! Handles:
//! - dependencies
//! - devDependencies
//! - peerDependencies
//! - optionalDependencies

use crate::domain::Ecosystem;
use crate::error::ManifestError;
use crate::manifest::ManifestPatcher;
use regex::Regex;
use serde_json::Value;
use std::ops::Range;

const SECTIONS: &[&str] = &[
    "dependencies",
    "devDependencies",
    "peerDependencies",
    "optionalDependencies",
];

/// Patcher for package.json files
pub struct PackageJsonPatcher;

impl ManifestPatcher for PackageJsonPatcher {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Npm
    }

    fn update_requirement(
        &self,
        content: &str,
        package: &str,
        old: &str,
        new: &str,
    ) -> Result<String, ManifestError> {
        patch_json(content, "package.json", SECTIONS, &[], package, old, new)
    }

    fn update_requirement_in(
        &self,
        content: &str,
        package: &str,
        groups: &[String],
        old: &str,
        new: &str,
    ) -> Result<String, ManifestError> {
        patch_json(content, "package.json", SECTIONS, groups, package, old, new)
    }
}

/// Replaces a requirement value in a JSON manifest
///
/// The document is parsed first to find the sections declaring the package
/// with `old`; the replacement itself is textual and limited to those
/// sections. When `groups` names any of `sections`, only those are patched.
pub(crate) fn patch_json(
    content: &str,
    file_name: &str,
    sections: &[&str],
    groups: &[String],
    package: &str,
    old: &str,
    new: &str,
) -> Result<String, ManifestError> {
    let json: Value = serde_json::from_str(content)
        .map_err(|e| ManifestError::json_parse_error(file_name, e.to_string()))?;

    let scoped: Vec<&str> = sections
        .iter()
        .copied()
        .filter(|section| groups.iter().any(|g| g == section))
        .collect();
    let scope = if scoped.is_empty() { sections } else { &scoped[..] };

    let declared: Vec<&str> = scope
        .iter()
        .copied()
        .filter(|section| {
            json.get(*section)
                .and_then(|deps| deps.get(package))
                .and_then(Value::as_str)
                == Some(old)
        })
        .collect();
    if declared.is_empty() {
        return Err(ManifestError::requirement_not_found(file_name, package, old));
    }

    // "package": "old" with flexible whitespace
    let pattern = format!(
        r#"("{}"\s*:\s*)"{}""#,
        regex::escape(package),
        regex::escape(old)
    );
    let re = Regex::new(&pattern)
        .map_err(|_| ManifestError::requirement_not_found(file_name, package, old))?;

    let mut patched = content.to_string();
    for section in declared {
        let span = section_span(&patched, section)
            .ok_or_else(|| ManifestError::requirement_not_found(file_name, package, old))?;
        let replaced = re.replace_all(&patched[span.clone()], |caps: &regex::Captures| {
            format!(r#"{}"{}""#, &caps[1], new)
        });
        patched = format!("{}{}{}", &patched[..span.start], replaced, &patched[span.end..]);
    }
    Ok(patched)
}

/// Byte range of the top-level object `"section": { ... }`, braces included
fn section_span(content: &str, section: &str) -> Option<Range<usize>> {
    let key = Regex::new(&format!(r#""{}"\s*:\s*\{{"#, regex::escape(section))).ok()?;
    let found = key
        .find_iter(content)
        .find(|m| nesting_at(content, m.start()) == Some(1))?;
    let open = found.end() - 1;
    let close = matching_brace(content, open)?;
    Some(open..close + 1)
}

/// Object/array depth at byte `pos`, or None inside a string
fn nesting_at(content: &str, pos: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for byte in content.as_bytes()[..pos].iter().copied() {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'{' | b'[' => depth += 1,
            b'}' | b']' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    (!in_string).then_some(depth)
}

/// Index of the `}` closing the object opened at `open`
fn matching_brace(content: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (i, byte) in content.as_bytes().iter().copied().enumerate().skip(open) {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'{' | b'[' => depth += 1,
            b'}' | b']' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}
