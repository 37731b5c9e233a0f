//! Text output formatter for human-readable display
//!
//! This module provides:
//! - Human-readable update result display with colors
//! - Semantic version change type indication (major/minor/patch)
//! - Grouping by ecosystem
//! - Skipped dependency display with reasons
//! - Summary with per-ecosystem breakdown

use crate::domain::{ChangeKind, Ecosystem, Requirement, UpdateResult, UpdateSummary};
use crate::orchestrator::{OrchestratorError, OrchestratorResult};
use crate::output::{requirement_label, OutputFormatter, Verbosity};
use colored::Colorize;
use regex::Regex;
use std::io::Write;
use std::sync::LazyLock;

static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)*").unwrap());

/// Semantic version change type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionChangeType {
    /// Major version change (breaking)
    Major,
    /// Minor version change (features)
    Minor,
    /// Patch version change (fixes)
    Patch,
    /// Unknown or unparseable
    Unknown,
}

impl VersionChangeType {
    /// Determine the change type between two requirement strings
    ///
    /// Compares the highest version mentioned in each, so `^17.0.0` to
    /// `^17.0.0 || ^18.0.0` is a major change and `>=1.0,<2.0` to
    /// `>=1.0,<3.0` is too.
    pub fn from_requirements(old: &str, new: &str) -> Self {
        let highest = |req: &str| -> Option<(u64, u64, u64)> {
            VERSION_RE
                .find_iter(req)
                .filter_map(|m| {
                    let mut parts = m.as_str().split('.').map(|p| p.parse::<u64>().ok());
                    let major = parts.next().flatten()?;
                    let minor = parts.next().flatten().unwrap_or(0);
                    let patch = parts.next().flatten().unwrap_or(0);
                    Some((major, minor, patch))
                })
                .max()
        };

        match (highest(old), highest(new)) {
            (Some((old_major, old_minor, old_patch)), Some((new_major, new_minor, new_patch))) => {
                if new_major != old_major {
                    VersionChangeType::Major
                } else if new_minor != old_minor {
                    VersionChangeType::Minor
                } else if new_patch != old_patch {
                    VersionChangeType::Patch
                } else {
                    VersionChangeType::Unknown
                }
            }
            _ => VersionChangeType::Unknown,
        }
    }

    /// Get the display label with color
    pub fn colored_label(&self) -> String {
        match self {
            VersionChangeType::Major => "major".red().bold().to_string(),
            VersionChangeType::Minor => "minor".yellow().to_string(),
            VersionChangeType::Patch => "patch".green().to_string(),
            VersionChangeType::Unknown => "?".dimmed().to_string(),
        }
    }

    /// Get the plain label
    pub fn label(&self) -> &'static str {
        match self {
            VersionChangeType::Major => "major",
            VersionChangeType::Minor => "minor",
            VersionChangeType::Patch => "patch",
            VersionChangeType::Unknown => "?",
        }
    }
}

/// Text formatter for human-readable output
pub struct TextFormatter {
    /// Verbosity level
    verbosity: Verbosity,
    /// Whether this is a dry-run
    dry_run: bool,
    /// Whether to use colors
    color: bool,
}

impl TextFormatter {
    /// Create a text formatter; `color` comes from `OutputConfig`
    pub fn with_color(verbosity: Verbosity, dry_run: bool, color: bool) -> Self {
        Self {
            verbosity,
            dry_run,
            color,
        }
    }

    /// Get the dry-run prefix if applicable
    fn dry_run_prefix(&self) -> String {
        if self.dry_run {
            if self.color {
                format!("{} ", "(dry-run)".cyan())
            } else {
                "(dry-run) ".to_string()
            }
        } else {
            String::new()
        }
    }

    /// Skips are only listed in verbose mode
    fn is_visible(&self, result: &UpdateResult) -> bool {
        match result {
            UpdateResult::Skip { .. } => self.verbosity == Verbosity::Verbose,
            _ => true,
        }
    }

    fn format_ecosystem_header(
        &self,
        ecosystem: Ecosystem,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        if self.color {
            writeln!(writer, "{}", ecosystem.display_name().bold())
        } else {
            writeln!(writer, "{}", ecosystem.display_name())
        }
    }

    fn change_label(&self, change: &ChangeKind, old: &Requirement, new: &Requirement) -> String {
        let label = match change {
            ChangeKind::RefBumped => "ref".to_string(),
            ChangeKind::SwitchedToRegistry => "registry".to_string(),
            _ => {
                let change_type = VersionChangeType::from_requirements(
                    old.requirement_str(),
                    new.requirement_str(),
                );
                if self.color {
                    return change_type.colored_label();
                }
                change_type.label().to_string()
            }
        };
        if self.color {
            label.magenta().to_string()
        } else {
            label
        }
    }

    fn format_update(&self, result: &UpdateResult, writer: &mut dyn Write) -> std::io::Result<()> {
        let UpdateResult::Update {
            dependency,
            changes,
        } = result
        else {
            return Ok(());
        };

        let held_back = match (
            dependency.target.is_held_back(),
            &dependency.target.latest_version,
        ) {
            (true, Some(latest)) => format!(" (latest {} not resolvable)", latest),
            _ => String::new(),
        };

        for (old, change) in dependency.requirements.iter().zip(changes) {
            if !change.change.is_change() {
                continue;
            }
            let new = &change.requirement;
            let label = self.change_label(&change.change, old, new);
            if self.color {
                writeln!(
                    writer,
                    "  {} {} {} {}  {} [{}]{}",
                    dependency.name.bold(),
                    requirement_label(old).dimmed(),
                    "→".dimmed(),
                    requirement_label(new).green(),
                    old.file.dimmed(),
                    label,
                    held_back.dimmed()
                )?;
            } else {
                writeln!(
                    writer,
                    "  {} {} → {}  {} [{}]{}",
                    dependency.name,
                    requirement_label(old),
                    requirement_label(new),
                    old.file,
                    label,
                    held_back
                )?;
            }
        }
        Ok(())
    }

    fn format_result(&self, result: &UpdateResult, writer: &mut dyn Write) -> std::io::Result<()> {
        match result {
            UpdateResult::Update { .. } => self.format_update(result, writer),
            UpdateResult::Skip { dependency, reason } => {
                if self.color {
                    writeln!(
                        writer,
                        "  {} {}",
                        dependency.name.dimmed(),
                        format!("({})", reason).dimmed()
                    )
                } else {
                    writeln!(writer, "  {} ({})", dependency.name, reason)
                }
            }
            UpdateResult::Failed {
                dependency,
                message,
            } => {
                if self.color {
                    writeln!(
                        writer,
                        "  {} {} {}",
                        "✗".red(),
                        dependency.name.bold(),
                        message.red()
                    )
                } else {
                    writeln!(writer, "  ✗ {} {}", dependency.name, message)
                }
            }
        }
    }

    fn format_write_errors(
        &self,
        errors: &[&OrchestratorError],
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        if errors.is_empty() {
            return Ok(());
        }
        if self.color {
            writeln!(writer, "{}", "Errors:".red().bold())?;
        } else {
            writeln!(writer, "Errors:")?;
        }
        for error in errors {
            writeln!(writer, "  {}", error)?;
        }
        writeln!(writer)
    }

    fn format_files(&self, summary: &UpdateSummary, writer: &mut dyn Write) -> std::io::Result<()> {
        if summary.files.is_empty() {
            return Ok(());
        }
        let heading = if self.dry_run { "Would write:" } else { "Wrote:" };
        if self.color {
            writeln!(writer, "{}", heading.bold())?;
        } else {
            writeln!(writer, "{}", heading)?;
        }
        for file in &summary.files {
            writeln!(writer, "  {}", file.display())?;
        }
        writeln!(writer)
    }
}

impl OutputFormatter for TextFormatter {
    fn format(&self, result: &OrchestratorResult, writer: &mut dyn Write) -> std::io::Result<()> {
        let summary = &result.summary;

        if self.verbosity != Verbosity::Quiet {
            for ecosystem in summary.ecosystems() {
                let visible: Vec<_> = summary
                    .by_ecosystem(ecosystem)
                    .filter(|r| self.is_visible(r))
                    .collect();
                if visible.is_empty() {
                    continue;
                }
                self.format_ecosystem_header(ecosystem, writer)?;
                for r in visible {
                    self.format_result(r, writer)?;
                }
                writeln!(writer)?;
            }

            let write_errors: Vec<_> = result
                .errors
                .iter()
                .filter(|e| matches!(e, OrchestratorError::WriteError { .. }))
                .collect();
            self.format_write_errors(&write_errors, writer)?;
            self.format_files(summary, writer)?;
        }

        self.format_summary(summary, writer)
    }

    fn format_summary(
        &self,
        summary: &UpdateSummary,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let prefix = self.dry_run_prefix();
        let updates = summary.total_updates();
        let skips = summary.total_skips();
        let failures = summary.total_failures();

        if self.verbosity == Verbosity::Quiet {
            if self.color {
                writeln!(
                    writer,
                    "{}{} updated, {} failed",
                    prefix,
                    updates.to_string().green(),
                    failures.to_string().red()
                )?;
            } else {
                writeln!(writer, "{}{} updated, {} failed", prefix, updates, failures)?;
            }
            return Ok(());
        }

        if self.color {
            writeln!(writer, "{}{}:", prefix, "Summary".bold())?;
            if updates > 0 {
                writeln!(
                    writer,
                    "  {} dependency(ies) updated",
                    updates.to_string().green()
                )?;
            } else {
                writeln!(writer, "  {}", "No dependencies updated".dimmed())?;
            }
            writeln!(
                writer,
                "  {} dependency(ies) skipped",
                skips.to_string().dimmed()
            )?;
            if failures > 0 {
                writeln!(
                    writer,
                    "  {} dependency(ies) failed",
                    failures.to_string().red()
                )?;
            }
        } else {
            writeln!(writer, "{}Summary:", prefix)?;
            if updates > 0 {
                writeln!(writer, "  {} dependency(ies) updated", updates)?;
            } else {
                writeln!(writer, "  No dependencies updated")?;
            }
            writeln!(writer, "  {} dependency(ies) skipped", skips)?;
            if failures > 0 {
                writeln!(writer, "  {} dependency(ies) failed", failures)?;
            }
        }

        // Verbose: show breakdown by ecosystem
        if self.verbosity == Verbosity::Verbose {
            writeln!(writer)?;
            if self.color {
                writeln!(writer, "{}:", "By ecosystem".dimmed())?;
            } else {
                writeln!(writer, "By ecosystem:")?;
            }
            for ecosystem in summary.ecosystems() {
                let results: Vec<_> = summary.by_ecosystem(ecosystem).collect();
                let eco_updates = results.iter().filter(|r| r.is_update()).count();
                let eco_skips = results.iter().filter(|r| r.is_skip()).count();
                let eco_failures = results.iter().filter(|r| r.is_failure()).count();
                if self.color {
                    writeln!(
                        writer,
                        "  {}: {} updated, {} skipped, {} failed",
                        ecosystem.display_name().cyan(),
                        eco_updates.to_string().green(),
                        eco_skips.to_string().dimmed(),
                        eco_failures.to_string().red()
                    )?;
                } else {
                    writeln!(
                        writer,
                        "  {}: {} updated, {} skipped, {} failed",
                        ecosystem.display_name(),
                        eco_updates,
                        eco_skips,
                        eco_failures
                    )?;
                }
            }
        }

        Ok(())
    }
}
