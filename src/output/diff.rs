//! Diff output formatter for showing changes
//!
//! This module provides:
//! - Unified diff format display grouped by requirement file
//! - Before/after requirement comparison

use crate::domain::{Requirement, UpdateSummary};
use crate::orchestrator::OrchestratorResult;
use crate::output::{requirement_label, OutputFormatter};
use std::io::Write;

/// Diff formatter for showing requirement changes
pub struct DiffFormatter {
    /// Whether this is a dry-run
    dry_run: bool,
}

impl DiffFormatter {
    /// Create a new diff formatter
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    /// Get the dry-run prefix if applicable
    fn dry_run_prefix(&self) -> &'static str {
        if self.dry_run {
            "(dry-run) "
        } else {
            ""
        }
    }
}

/// Changed pairs grouped by file, files in first-seen order
fn group_by_file(summary: &UpdateSummary) -> Vec<(&str, Vec<(&str, &Requirement, &Requirement)>)> {
    let mut groups: Vec<(&str, Vec<(&str, &Requirement, &Requirement)>)> = Vec::new();
    for result in &summary.results {
        for (old, new) in result.changed_pairs() {
            let entry = (result.package_name(), old, new);
            match groups.iter_mut().find(|(file, _)| *file == old.file) {
                Some((_, changes)) => changes.push(entry),
                None => groups.push((old.file.as_str(), vec![entry])),
            }
        }
    }
    groups
}

impl OutputFormatter for DiffFormatter {
    fn format(&self, result: &OrchestratorResult, writer: &mut dyn Write) -> std::io::Result<()> {
        let prefix = self.dry_run_prefix();

        for (file, changes) in group_by_file(&result.summary) {
            // Write diff header
            writeln!(writer, "{}--- a/{}", prefix, file)?;
            writeln!(writer, "{}+++ b/{}", prefix, file)?;

            // Write each change as a diff hunk
            for (name, old, new) in changes {
                writeln!(writer, "@@ {} @@", name)?;
                writeln!(writer, "-  \"{}\": \"{}\"", name, requirement_label(old))?;
                writeln!(writer, "+  \"{}\": \"{}\"", name, requirement_label(new))?;
            }

            writeln!(writer)?;
        }

        self.format_summary(&result.summary, writer)
    }

    fn format_summary(
        &self,
        summary: &UpdateSummary,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let verb = if self.dry_run { "would be" } else { "were" };
        writeln!(
            writer,
            "{}# {} dependency(ies) {} updated",
            self.dry_run_prefix(),
            summary.total_updates(),
            verb
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        ChangeKind, Dependency, Ecosystem, RequirementChange, UpdateResult, UpdateTarget,
    };

    fn bumped(name: &str, reqs: &[(&str, &str, &str)]) -> UpdateResult {
        let requirements: Vec<_> = reqs
            .iter()
            .map(|(old, _, file)| Requirement::new(*old, *file))
            .collect();
        let changes = requirements
            .iter()
            .zip(reqs)
            .map(|(r, (old, new, _))| {
                if old == new {
                    RequirementChange::unchanged(r, crate::domain::SkipReason::AlreadySatisfied)
                } else {
                    RequirementChange::new(r.with_requirement(Some(new.to_string())), ChangeKind::Bumped)
                }
            })
            .collect();
        UpdateResult::from_changes(
            Dependency::new(name, Ecosystem::Npm, requirements, UpdateTarget::none()),
            changes,
        )
    }

    fn render(dry_run: bool, summary: UpdateSummary) -> String {
        let result = OrchestratorResult {
            summary,
            write_results: Vec::new(),
            errors: Vec::new(),
        };
        let mut output = Vec::new();
        DiffFormatter::new(dry_run).format(&result, &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_diff_format() {
        let mut summary = UpdateSummary::new(false);
        summary.add_result(bumped("lodash", &[("^3.10.0", "^4.0.0", "package.json")]));
        let output = render(false, summary);

        assert_eq!(
            output,
            "--- a/package.json\n+++ b/package.json\n@@ lodash @@\n-  \"lodash\": \"^3.10.0\"\n+  \"lodash\": \"^4.0.0\"\n\n# 1 dependency(ies) were updated\n"
        );
    }

    #[test]
    fn test_diff_groups_by_file() {
        let mut summary = UpdateSummary::new(true);
        summary.add_result(bumped(
            "react",
            &[
                ("^17.0.0", "^18.0.0", "package.json"),
                ("^17.0.0", "^18.0.0", "packages/ui/package.json"),
            ],
        ));
        summary.add_result(bumped("redux", &[("^4.0.0", "^5.0.0", "package.json")]));
        let output = render(true, summary);

        assert!(output.starts_with("(dry-run) --- a/package.json\n"));
        let root = output.find("a/package.json").unwrap();
        let nested = output.find("a/packages/ui/package.json").unwrap();
        assert!(root < nested);
        assert_eq!(output.matches("@@ react @@").count(), 2);
        assert_eq!(output.matches("--- a/package.json").count(), 1);
        assert!(output.ends_with("(dry-run) # 2 dependency(ies) would be updated\n"));
    }

    #[test]
    fn test_diff_skips_unchanged_requirements() {
        let mut summary = UpdateSummary::new(false);
        summary.add_result(bumped(
            "react",
            &[
                ("^18.0.0", "^18.0.0", "package.json"),
                ("^17.0.0", "^18.0.0", "packages/ui/package.json"),
            ],
        ));
        let output = render(false, summary);
        assert!(!output.contains("--- a/package.json"));
        assert!(output.contains("--- a/packages/ui/package.json"));
    }
}
