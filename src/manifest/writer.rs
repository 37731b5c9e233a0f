//! Manifest file writing
//!
//! This module provides:
//! - ManifestWriter for applying requirement edits to manifest files
//! - Dry-run mode support (no actual file modifications)
//! - Per-edit error collection with graceful continuation

use crate::domain::UpdateResult;
use crate::error::ManifestError;
use crate::manifest::get_patcher;
use log::{debug, info};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// One requirement replacement inside a manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEdit {
    /// Package name as declared in the manifest
    pub package: String,
    /// Current requirement text
    pub old: String,
    /// Replacement requirement text
    pub new: String,
    /// Dependency sections the requirement was declared in
    pub groups: Vec<String>,
}

impl ManifestEdit {
    /// Creates an edit
    pub fn new(package: impl Into<String>, old: impl Into<String>, new: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            old: old.into(),
            new: new.into(),
            groups: Vec::new(),
        }
    }

    /// Limits the edit to the named dependency sections (builder pattern)
    pub fn with_groups(mut self, groups: &[String]) -> Self {
        self.groups = groups.to_vec();
        self
    }
}

/// Writer for manifest files that applies requirement edits
pub struct ManifestWriter {
    /// Whether to run in dry-run mode (no file modifications)
    dry_run: bool,
}

/// Result of applying edits to a manifest file
#[derive(Debug)]
pub struct WriteResult {
    /// Path to the manifest file
    pub path: PathBuf,
    /// Number of edits successfully applied
    pub updates_applied: usize,
    /// Number of edits that failed
    pub updates_failed: usize,
    /// Whether the file was actually modified
    pub file_modified: bool,
    /// Errors encountered during update
    pub errors: Vec<String>,
}

impl WriteResult {
    fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            updates_applied: 0,
            updates_failed: 0,
            file_modified: false,
            errors: Vec::new(),
        }
    }

    /// Returns true if any edits were successfully applied
    pub fn has_updates(&self) -> bool {
        self.updates_applied > 0
    }

    /// Returns true if any errors occurred
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

impl ManifestWriter {
    /// Create a new ManifestWriter
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    /// Check if this writer is in dry-run mode
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Apply edits to one manifest file
    pub fn apply_edits(&self, path: &Path, edits: &[ManifestEdit]) -> Result<WriteResult, ManifestError> {
        let patcher = get_patcher(path).ok_or_else(|| ManifestError::UnsupportedFormat {
            path: path.to_path_buf(),
        })?;
        let mut result = WriteResult::new(path);
        let mut content = read_manifest(path)?;
        debug!("Patching {} as a {} manifest", path.display(), patcher.ecosystem());

        for edit in edits {
            match patcher.update_requirement_in(
                &content,
                &edit.package,
                &edit.groups,
                &edit.old,
                &edit.new,
            ) {
                Ok(updated) => {
                    debug!("{}: {} -> {}", edit.package, edit.old, edit.new);
                    content = updated;
                    result.updates_applied += 1;
                }
                Err(e) => {
                    result.updates_failed += 1;
                    result
                        .errors
                        .push(format!("Failed to update {}: {}", edit.package, e));
                }
            }
        }

        if result.has_updates() && !self.is_dry_run() {
            write_manifest(path, &content)?;
            result.file_modified = true;
            info!("Wrote {}", path.display());
        }

        Ok(result)
    }

    /// Apply every textual change in `results` to manifests under `root`
    ///
    /// Requirement `file` fields are resolved relative to `root`. Changes
    /// without old or new text (a git source switching to the registry) can
    /// not be patched textually and are reported as errors.
    pub fn apply_results(&self, root: &Path, results: &[UpdateResult]) -> Vec<WriteResult> {
        let mut by_file: BTreeMap<PathBuf, Vec<ManifestEdit>> = BTreeMap::new();
        let mut unpatchable: BTreeMap<PathBuf, Vec<String>> = BTreeMap::new();

        for update in results {
            for (old, new) in update.changed_pairs() {
                let path = root.join(&old.file);
                if old.source != new.source {
                    unpatchable.entry(path.clone()).or_default().push(format!(
                        "Source change for {} must be applied by hand",
                        update.package_name()
                    ));
                }
                if let (Some(from), Some(to)) = (old.requirement.as_deref(), new.requirement.as_deref()) {
                    if from != to {
                        let edit = ManifestEdit::new(update.package_name(), from, to)
                            .with_groups(&old.groups);
                        let edits = by_file.entry(path).or_default();
                        // One edit already rewrites every section it covers
                        if !edits.contains(&edit) {
                            edits.push(edit);
                        }
                    }
                }
            }
        }

        let mut write_results: Vec<WriteResult> = by_file
            .iter()
            .map(|(path, edits)| match self.apply_edits(path, edits) {
                Ok(result) => result,
                Err(e) => {
                    let mut result = WriteResult::new(path);
                    result.updates_failed = edits.len();
                    result.errors.push(format!("Failed to process manifest: {}", e));
                    result
                }
            })
            .collect();

        for (path, errors) in unpatchable {
            match write_results.iter_mut().find(|r| r.path == path) {
                Some(result) => {
                    result.updates_failed += errors.len();
                    result.errors.extend(errors);
                }
                None => {
                    let mut result = WriteResult::new(path);
                    result.updates_failed = errors.len();
                    result.errors = errors;
                    write_results.push(result);
                }
            }
        }

        write_results
    }
}

/// Read a manifest file content safely
pub fn read_manifest(path: &Path) -> Result<String, ManifestError> {
    fs::read_to_string(path).map_err(|e| ManifestError::read_error(path, e))
}

/// Write content to a manifest file
pub fn write_manifest(path: &Path, content: &str) -> Result<(), ManifestError> {
    fs::write(path, content).map_err(|e| ManifestError::write_error(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        ChangeKind, Dependency, Ecosystem, Requirement, RequirementChange, Source, UpdateTarget,
    };
    use tempfile::TempDir;

    const PACKAGE_JSON: &str = r#"{
  "dependencies": {
    "lodash": "^3.10.0",
    "express": "^4.18.0"
  }
}"#;

    fn create_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn bumped(name: &str, old: &str, new: &str, file: &str) -> UpdateResult {
        let requirement = Requirement::new(old, file);
        let dependency = Dependency::new(
            name,
            Ecosystem::Npm,
            vec![requirement.clone()],
            UpdateTarget::none(),
        );
        UpdateResult::from_changes(
            dependency,
            vec![RequirementChange::new(
                requirement.with_requirement(Some(new.to_string())),
                ChangeKind::Bumped,
            )],
        )
    }

    #[test]
    fn test_manifest_writer_new() {
        assert!(!ManifestWriter::new(false).is_dry_run());
        assert!(ManifestWriter::new(true).is_dry_run());
    }

    #[test]
    fn test_write_result_flags() {
        let mut result = WriteResult::new("/path/to/file");
        assert!(!result.has_updates());
        assert!(!result.has_errors());

        result.updates_applied = 1;
        result.errors.push("error".to_string());
        assert!(result.has_updates());
        assert!(result.has_errors());
    }

    #[test]
    fn test_apply_edits_dry_run() {
        let temp_dir = TempDir::new().unwrap();
        let path = create_file(&temp_dir, "package.json", PACKAGE_JSON);

        let writer = ManifestWriter::new(true);
        let result = writer
            .apply_edits(&path, &[ManifestEdit::new("lodash", "^3.10.0", "^4.17.21")])
            .unwrap();

        assert_eq!(result.updates_applied, 1);
        assert!(!result.file_modified);
        assert_eq!(fs::read_to_string(&path).unwrap(), PACKAGE_JSON);
    }

    #[test]
    fn test_apply_edits_actual_write() {
        let temp_dir = TempDir::new().unwrap();
        let path = create_file(&temp_dir, "package.json", PACKAGE_JSON);

        let writer = ManifestWriter::new(false);
        let result = writer
            .apply_edits(
                &path,
                &[
                    ManifestEdit::new("lodash", "^3.10.0", "^4.17.21"),
                    ManifestEdit::new("express", "^4.18.0", "^5.0.0"),
                ],
            )
            .unwrap();

        assert_eq!(result.updates_applied, 2);
        assert!(result.file_modified);
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains(r#""lodash": "^4.17.21""#));
        assert!(content.contains(r#""express": "^5.0.0""#));
    }

    #[test]
    fn test_apply_edits_handles_failed_edit() {
        let temp_dir = TempDir::new().unwrap();
        let path = create_file(&temp_dir, "package.json", PACKAGE_JSON);

        let writer = ManifestWriter::new(false);
        let result = writer
            .apply_edits(
                &path,
                &[
                    ManifestEdit::new("lodash", "^3.10.0", "^4.17.21"),
                    ManifestEdit::new("nonexistent", "1.0.0", "2.0.0"),
                ],
            )
            .unwrap();

        assert_eq!(result.updates_applied, 1);
        assert_eq!(result.updates_failed, 1);
        assert!(result.has_errors());
        assert!(result.file_modified);
    }

    #[test]
    fn test_apply_edits_unsupported_format() {
        let temp_dir = TempDir::new().unwrap();
        let path = create_file(&temp_dir, "mix.exs", "defp deps do [] end");
        let result = ManifestWriter::new(false).apply_edits(&path, &[]);
        assert!(matches!(result, Err(ManifestError::UnsupportedFormat { .. })));
    }

    #[test]
    fn test_apply_edits_file_not_found() {
        let result = ManifestWriter::new(false).apply_edits(
            Path::new("/nonexistent/path/package.json"),
            &[ManifestEdit::new("lodash", "1", "2")],
        );
        assert!(matches!(result, Err(ManifestError::ReadError { .. })));
    }

    #[test]
    fn test_apply_results_groups_by_file() {
        let temp_dir = TempDir::new().unwrap();
        create_file(&temp_dir, "package.json", PACKAGE_JSON);

        let results = vec![
            bumped("lodash", "^3.10.0", "^4.17.21", "package.json"),
            bumped("express", "^4.18.0", "^5.0.0", "package.json"),
        ];
        let write_results = ManifestWriter::new(false).apply_results(temp_dir.path(), &results);

        assert_eq!(write_results.len(), 1);
        assert_eq!(write_results[0].updates_applied, 2);
        assert!(write_results[0].file_modified);
    }

    #[test]
    fn test_apply_results_same_package_in_two_sections() {
        let temp_dir = TempDir::new().unwrap();
        let content = r#"{
  "dependencies": {"lodash": "^3.0.0"},
  "peerDependencies": {"lodash": "^3.0.0"}
}"#;
        create_file(&temp_dir, "package.json", content);

        let requirements = vec![
            Requirement::new("^3.0.0", "package.json").with_groups(["dependencies"]),
            Requirement::new("^3.0.0", "package.json").with_groups(["peerDependencies"]),
        ];
        let changes = requirements
            .iter()
            .map(|r| {
                RequirementChange::new(r.with_requirement(Some("^4.0.0".to_string())), ChangeKind::Bumped)
            })
            .collect();
        let result = UpdateResult::from_changes(
            Dependency::new("lodash", Ecosystem::Npm, requirements, UpdateTarget::none()),
            changes,
        );

        let write_results = ManifestWriter::new(false).apply_results(temp_dir.path(), &[result]);
        assert_eq!(write_results.len(), 1);
        assert_eq!(write_results[0].updates_applied, 2);
        assert_eq!(write_results[0].updates_failed, 0);
        assert!(!write_results[0].has_errors());
        let written = fs::read_to_string(temp_dir.path().join("package.json")).unwrap();
        assert_eq!(written.matches(r#""lodash": "^4.0.0""#).count(), 2);
    }

    #[test]
    fn test_apply_results_ungrouped_duplicates_patch_once() {
        let temp_dir = TempDir::new().unwrap();
        let content = r#"{
  "dependencies": {"lodash": "^3.0.0"},
  "devDependencies": {"lodash": "^3.0.0"}
}"#;
        create_file(&temp_dir, "package.json", content);

        let results = vec![
            bumped("lodash", "^3.0.0", "^4.0.0", "package.json"),
            bumped("lodash", "^3.0.0", "^4.0.0", "package.json"),
        ];
        let write_results = ManifestWriter::new(false).apply_results(temp_dir.path(), &results);
        assert_eq!(write_results[0].updates_applied, 1);
        assert!(!write_results[0].has_errors());
        let written = fs::read_to_string(temp_dir.path().join("package.json")).unwrap();
        assert_eq!(written.matches(r#""lodash": "^4.0.0""#).count(), 2);
    }

    #[test]
    fn test_apply_results_reports_source_switch() {
        let temp_dir = TempDir::new().unwrap();
        create_file(&temp_dir, "package.json", PACKAGE_JSON);

        let requirement = Requirement::unconstrained("package.json")
            .with_source(Source::git("https://github.com/jonschlinkert/is-number"));
        let mut switched = requirement.with_requirement(Some("^4.0.0".to_string()));
        switched.source = None;
        let result = UpdateResult::from_changes(
            Dependency::new(
                "is-number",
                Ecosystem::Npm,
                vec![requirement],
                UpdateTarget::none(),
            ),
            vec![RequirementChange::new(switched, ChangeKind::SwitchedToRegistry)],
        );

        let write_results = ManifestWriter::new(false).apply_results(temp_dir.path(), &[result]);
        assert_eq!(write_results.len(), 1);
        assert_eq!(write_results[0].updates_failed, 1);
        assert!(write_results[0].errors[0].contains("is-number"));
        assert_eq!(
            fs::read_to_string(temp_dir.path().join("package.json")).unwrap(),
            PACKAGE_JSON
        );
    }

    #[test]
    fn test_read_and_write_manifest() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("Cargo.toml");
        write_manifest(&path, "[dependencies]\n").unwrap();
        assert_eq!(read_manifest(&path).unwrap(), "[dependencies]\n");
        assert!(read_manifest(Path::new("/nonexistent/Cargo.toml")).is_err());
    }
}
