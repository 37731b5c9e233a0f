//! Update orchestrator for coordinating the entire update workflow
//!
//! This module provides:
//! - Workflow coordination: load request → judge → write
//! - Dry-run mode support
//! - Ecosystem and package filter application
//! - Error handling with partial continuation

use crate::cli::CliArgs;
use crate::config::{load_request, UpdateRequest};
use crate::domain::{UpdateResult, UpdateSummary};
use crate::error::ConfigError;
use crate::manifest::{ManifestWriter, WriteResult};
use crate::update::{UpdateFilter, UpdateJudge};
use log::{debug, info};
use std::path::PathBuf;

/// Orchestrator for coordinating the update workflow
pub struct Orchestrator {
    /// CLI arguments for configuration
    args: CliArgs,
}

/// Result of running the orchestrator
pub struct OrchestratorResult {
    /// Update summary with all results
    pub summary: UpdateSummary,
    /// Write results for each manifest
    pub write_results: Vec<WriteResult>,
    /// Errors encountered during processing
    pub errors: Vec<OrchestratorError>,
}

impl OrchestratorResult {
    /// Returns true if any dependency failed or any manifest edit failed
    pub fn has_failures(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Errors that can occur during orchestration
#[derive(Debug)]
pub enum OrchestratorError {
    /// The updater refused a dependency
    UpdateError { package: String, message: String },
    /// Failed to patch or write a manifest
    WriteError { path: String, message: String },
}

impl std::fmt::Display for OrchestratorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrchestratorError::UpdateError { package, message } => {
                write!(f, "Failed to update {}: {}", package, message)
            }
            OrchestratorError::WriteError { path, message } => {
                write!(f, "Failed to write {}: {}", path, message)
            }
        }
    }
}

impl std::error::Error for OrchestratorError {}

impl Orchestrator {
    /// Create a new orchestrator with the given CLI arguments
    pub fn new(args: CliArgs) -> Self {
        Self { args }
    }

    /// Load the request file and run the update workflow
    pub fn run(&self) -> Result<OrchestratorResult, ConfigError> {
        let request = load_request(&self.args.request)?;
        Ok(self.run_request(request))
    }

    /// Run the update workflow on an already loaded request
    pub fn run_request(&self, request: UpdateRequest) -> OrchestratorResult {
        let request = match self.args.library_override() {
            Some(library) => request.with_library(library),
            None => request,
        };

        let mut summary = UpdateSummary::new(self.args.dry_run);
        let mut errors = Vec::new();

        // Step 1: Judge every dependency in request order
        let judge = UpdateJudge::new(self.build_filter());
        debug!("Processing {} dependencies", request.len());
        for result in judge.judge_all(&request.dependencies) {
            if let UpdateResult::Failed {
                dependency,
                message,
            } = &result
            {
                errors.push(OrchestratorError::UpdateError {
                    package: dependency.name.clone(),
                    message: message.clone(),
                });
            }
            if result.is_update() {
                info!("Updated {}", result.package_name());
            }
            summary.add_result(result);
        }

        // Step 2: Patch manifests (the writer honours dry-run)
        let write_results = if self.args.write && summary.has_changes() {
            let root = self.manifest_root(&request);
            let writer = ManifestWriter::new(self.args.dry_run);
            writer.apply_results(&root, &summary.results)
        } else {
            Vec::new()
        };

        for result in &write_results {
            if result.has_updates() {
                summary.add_file(&result.path);
            }
            if result.has_errors() {
                debug!("{} write error(s) in {}", result.errors.len(), result.path.display());
            }
            for error in &result.errors {
                errors.push(OrchestratorError::WriteError {
                    path: result.path.display().to_string(),
                    message: error.clone(),
                });
            }
        }

        OrchestratorResult {
            summary,
            write_results,
            errors,
        }
    }

    /// Build an UpdateFilter from CLI arguments
    fn build_filter(&self) -> UpdateFilter {
        UpdateFilter::new()
            .with_ecosystems(self.args.ecosystem.clone())
            .with_exclude(self.args.exclude.clone())
            .with_only(self.args.only.clone())
    }

    /// Directory that requirement file paths are relative to
    fn manifest_root(&self, request: &UpdateRequest) -> PathBuf {
        if let Some(root) = &self.args.root {
            return root.clone();
        }
        request
            .path
            .parent()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}
