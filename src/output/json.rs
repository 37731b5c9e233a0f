//! JSON output formatter for machine processing

use crate::domain::{ChangeKind, UpdateResult, UpdateSummary};
use crate::orchestrator::OrchestratorResult;
use crate::output::{OutputFormatter, Verbosity};
use serde::Serialize;
use std::io::Write;

/// JSON formatter for machine-readable output
pub struct JsonFormatter {
    verbosity: Verbosity,
}

#[derive(Serialize)]
struct JsonOutput {
    dry_run: bool,
    summary: JsonSummary,
    dependencies: Vec<JsonDependency>,
    files: Vec<String>,
    errors: Vec<String>,
}

#[derive(Serialize)]
struct JsonSummary {
    dependencies: usize,
    updates: usize,
    skips: usize,
    failures: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    by_ecosystem: Vec<JsonEcosystemSummary>,
}

#[derive(Serialize)]
struct JsonEcosystemSummary {
    ecosystem: String,
    updates: usize,
    skips: usize,
    failures: usize,
}

#[derive(Serialize)]
struct JsonDependency {
    name: String,
    ecosystem: String,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    requirements: Vec<JsonRequirement>,
}

#[derive(Serialize)]
struct JsonRequirement {
    file: String,
    from: Option<String>,
    to: Option<String>,
    change: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    source_from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    source_to: Option<String>,
}

fn change_name(change: &ChangeKind) -> &'static str {
    match change {
        ChangeKind::Bumped => "bumped",
        ChangeKind::RefBumped => "ref_bumped",
        ChangeKind::SwitchedToRegistry => "switched_to_registry",
        ChangeKind::Unchanged { .. } => "unchanged",
    }
}

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }

    fn result_to_json(&self, result: &UpdateResult) -> JsonDependency {
        let dependency = result.dependency();
        let mut entry = JsonDependency {
            name: dependency.name.clone(),
            ecosystem: dependency.ecosystem.to_string(),
            status: "updated",
            reason: None,
            message: None,
            requirements: Vec::new(),
        };

        match result {
            UpdateResult::Update { changes, .. } => {
                entry.requirements = dependency
                    .requirements
                    .iter()
                    .zip(changes)
                    .filter(|(_, c)| c.change.is_change())
                    .map(|(old, c)| JsonRequirement {
                        file: old.file.clone(),
                        from: old.requirement.clone(),
                        to: c.requirement.requirement.clone(),
                        change: change_name(&c.change),
                        source_from: old.source.as_ref().map(|s| s.to_string()),
                        source_to: c.requirement.source.as_ref().map(|s| s.to_string()),
                    })
                    .collect();
            }
            UpdateResult::Skip { reason, .. } => {
                entry.status = "skipped";
                entry.reason = Some(reason.to_string());
            }
            UpdateResult::Failed { message, .. } => {
                entry.status = "failed";
                entry.message = Some(message.clone());
            }
        }
        entry
    }

    fn summary_to_json(&self, summary: &UpdateSummary) -> JsonSummary {
        let by_ecosystem = if self.verbosity == Verbosity::Verbose {
            summary
                .ecosystems()
                .into_iter()
                .map(|ecosystem| {
                    let results: Vec<_> = summary.by_ecosystem(ecosystem).collect();
                    JsonEcosystemSummary {
                        ecosystem: ecosystem.to_string(),
                        updates: results.iter().filter(|r| r.is_update()).count(),
                        skips: results.iter().filter(|r| r.is_skip()).count(),
                        failures: results.iter().filter(|r| r.is_failure()).count(),
                    }
                })
                .collect()
        } else {
            Vec::new()
        };

        JsonSummary {
            dependencies: summary.total_dependencies(),
            updates: summary.total_updates(),
            skips: summary.total_skips(),
            failures: summary.total_failures(),
            by_ecosystem,
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, result: &OrchestratorResult, writer: &mut dyn Write) -> std::io::Result<()> {
        let summary = &result.summary;

        // Skips are listed only in verbose mode, like the text output
        let dependencies = summary
            .results
            .iter()
            .filter(|r| self.verbosity == Verbosity::Verbose || !r.is_skip())
            .map(|r| self.result_to_json(r))
            .collect();

        let output = JsonOutput {
            dry_run: summary.dry_run,
            summary: self.summary_to_json(summary),
            dependencies,
            files: summary.files.iter().map(|f| f.display().to_string()).collect(),
            errors: result.errors.iter().map(|e| e.to_string()).collect(),
        };

        let json = serde_json::to_string_pretty(&output).map_err(std::io::Error::other)?;

        writeln!(writer, "{}", json)?;

        Ok(())
    }

    fn format_summary(
        &self,
        summary: &UpdateSummary,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let output = self.summary_to_json(summary);

        let json = serde_json::to_string_pretty(&output).map_err(std::io::Error::other)?;

        writeln!(writer, "{}", json)?;

        Ok(())
    }
}
