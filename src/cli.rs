//! CLI argument parsing module for depbump

use crate::domain::Ecosystem;
use clap::{ArgAction, Parser};
use log::LevelFilter;
use std::path::PathBuf;

fn parse_ecosystem(s: &str) -> Result<Ecosystem, String> {
    s.parse()
}

/// Multi-ecosystem dependency requirement updater
#[derive(Parser, Debug, Clone)]
#[command(
    name = "depbump",
    version,
    about = "Multi-ecosystem dependency requirement updater"
)]
pub struct CliArgs {
    /// Request file listing dependencies and target versions (.json or .toml)
    pub request: PathBuf,

    /// Directory manifest paths are relative to (default: the request file's directory)
    #[arg(long)]
    pub root: Option<PathBuf>,

    // General options
    /// Apply the new requirements to the manifest files
    #[arg(short, long)]
    pub write: bool,

    /// Dry run mode - show what would be written without making changes
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable quiet mode - minimal output
    #[arg(short, long)]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    // Policy overrides
    /// Treat every dependency as declared by a library (widen requirements)
    #[arg(long, conflicts_with = "application")]
    pub library: bool,

    /// Treat every dependency as declared by an application (pin requirements)
    #[arg(long)]
    pub application: bool,

    // Filters
    /// Process only these ecosystems (can be specified multiple times)
    #[arg(long, value_parser = parse_ecosystem, action = ArgAction::Append)]
    pub ecosystem: Vec<Ecosystem>,

    /// Exclude specific packages from update (can be specified multiple times)
    #[arg(long, action = ArgAction::Append)]
    pub exclude: Vec<String>,

    /// Update only specific packages (can be specified multiple times)
    #[arg(long, action = ArgAction::Append)]
    pub only: Vec<String>,

    // Output options
    /// Output results in JSON format
    #[arg(long, conflicts_with = "diff")]
    pub json: bool,

    /// Show changes in diff format
    #[arg(long)]
    pub diff: bool,

    /// Disable coloured output
    #[arg(long)]
    pub no_color: bool,
}

impl CliArgs {
    /// Library flag forced from the command line, if any
    pub fn library_override(&self) -> Option<bool> {
        if self.library {
            Some(true)
        } else if self.application {
            Some(false)
        } else {
            None
        }
    }

    /// Log level implied by the verbosity flags
    pub fn log_level(&self) -> LevelFilter {
        if self.debug {
            LevelFilter::Debug
        } else if self.verbose {
            LevelFilter::Info
        } else if self.quiet {
            LevelFilter::Error
        } else {
            LevelFilter::Warn
        }
    }

    /// Check if manifests should be patched on disk
    pub fn should_write_files(&self) -> bool {
        self.write && !self.dry_run
    }
}
