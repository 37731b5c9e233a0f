//! Output formatting for update results
//!
//! This module provides:
//! - Text output for human-readable display
//! - JSON output for machine processing
//! - Diff output for showing changes

mod diff;
mod json;
mod text;

pub use diff::DiffFormatter;
pub use json::JsonFormatter;
pub use text::TextFormatter;

use crate::cli::CliArgs;
use crate::domain::{Requirement, UpdateSummary};
use crate::orchestrator::OrchestratorResult;
use std::io::{IsTerminal, Write};

/// Which formatter renders the results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    /// `--json`
    Json,
    /// `--diff`
    Diff,
}

/// How much of the result set is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// One summary line
    Quiet,
    #[default]
    Normal,
    /// Adds skipped dependencies and per-ecosystem counts
    Verbose,
}

/// Rendering options for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub verbosity: Verbosity,
    /// Prefix output with `(dry-run)` and say "would" instead of "were"
    pub dry_run: bool,
    /// Colour the text formatter's labels
    pub color: bool,
}

impl OutputConfig {
    /// Rendering options implied by the command line
    ///
    /// `--json` wins over `--diff` and `--quiet` over `--verbose`. Colour is
    /// used only when stdout is a terminal and `--no-color` is absent.
    pub fn from_cli(args: &CliArgs) -> Self {
        let format = match (args.json, args.diff) {
            (true, _) => OutputFormat::Json,
            (false, true) => OutputFormat::Diff,
            (false, false) => OutputFormat::Text,
        };
        let verbosity = match (args.quiet, args.verbose) {
            (true, _) => Verbosity::Quiet,
            (false, true) => Verbosity::Verbose,
            (false, false) => Verbosity::Normal,
        };

        Self {
            format,
            verbosity,
            dry_run: args.dry_run,
            color: !args.no_color && std::io::stdout().is_terminal(),
        }
    }
}

/// Trait for output formatters
pub trait OutputFormatter {
    /// Format and write the orchestrator result
    fn format(&self, result: &OrchestratorResult, writer: &mut dyn Write) -> std::io::Result<()>;

    /// Format and write just the summary
    fn format_summary(
        &self,
        summary: &UpdateSummary,
        writer: &mut dyn Write,
    ) -> std::io::Result<()>;
}

/// Requirement text plus its source, as shown to the user
pub(crate) fn requirement_label(requirement: &Requirement) -> String {
    let text = requirement.requirement.as_deref().unwrap_or("<none>");
    match &requirement.source {
        Some(source) => format!("{} [{}]", text, source),
        None => text.to_string(),
    }
}

/// Create an output formatter based on configuration
pub fn create_formatter(config: OutputConfig) -> Box<dyn OutputFormatter> {
    match config.format {
        OutputFormat::Text => Box::new(TextFormatter::with_color(
            config.verbosity,
            config.dry_run,
            config.color,
        )),
        OutputFormat::Json => Box::new(JsonFormatter::new(config.verbosity)),
        OutputFormat::Diff => Box::new(DiffFormatter::new(config.dry_run)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn config(argv: &[&str]) -> OutputConfig {
        let args = CliArgs::parse_from(["depbump", "request.json"].iter().chain(argv).copied());
        OutputConfig::from_cli(&args)
    }

    #[test]
    fn test_defaults() {
        let config = config(&["--no-color"]);
        assert_eq!(config.format, OutputFormat::Text);
        assert_eq!(config.verbosity, Verbosity::Normal);
        assert!(!config.dry_run);
    }

    #[test]
    fn test_format_flags() {
        assert_eq!(config(&["--json"]).format, OutputFormat::Json);
        assert_eq!(config(&["--diff"]).format, OutputFormat::Diff);
    }

    #[test]
    fn test_quiet_wins_over_verbose() {
        assert_eq!(config(&["--verbose"]).verbosity, Verbosity::Verbose);
        assert_eq!(config(&["-q", "--verbose"]).verbosity, Verbosity::Quiet);
    }

    #[test]
    fn test_dry_run_and_no_color() {
        let config = config(&["-n", "--no-color"]);
        assert!(config.dry_run);
        assert!(!config.color);
    }

    #[test]
    fn test_requirement_label() {
        use crate::domain::Source;

        assert_eq!(requirement_label(&Requirement::new("^1.0.0", "package.json")), "^1.0.0");
        let git = Requirement::unconstrained("package.json")
            .with_source(Source::git("https://github.com/a/b").with_ref("v1.0.0"));
        assert_eq!(
            requirement_label(&git),
            "<none> [git https://github.com/a/b#v1.0.0]"
        );
    }
}
