//! Update result summary types
//!
//! Provides the overall tally across all processed dependencies.

use super::{Ecosystem, UpdateResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Overall summary of all update operations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateSummary {
    /// Results for each dependency, in input order
    pub results: Vec<UpdateResult>,
    /// Manifest files that were (or in dry-run would be) rewritten
    pub files: Vec<PathBuf>,
    /// Whether this was a dry run
    pub dry_run: bool,
}

impl UpdateSummary {
    /// Creates a new UpdateSummary
    pub fn new(dry_run: bool) -> Self {
        Self {
            results: Vec::new(),
            files: Vec::new(),
            dry_run,
        }
    }

    /// Adds a dependency result
    pub fn add_result(&mut self, result: UpdateResult) {
        self.results.push(result);
    }

    /// Records a patched manifest file
    pub fn add_file(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        if !self.files.contains(&path) {
            self.files.push(path);
        }
    }

    /// Returns the total number of dependencies updated
    pub fn total_updates(&self) -> usize {
        self.results.iter().filter(|r| r.is_update()).count()
    }

    /// Returns the total number of dependencies skipped
    pub fn total_skips(&self) -> usize {
        self.results.iter().filter(|r| r.is_skip()).count()
    }

    /// Returns the total number of dependencies that failed
    pub fn total_failures(&self) -> usize {
        self.results.iter().filter(|r| r.is_failure()).count()
    }

    /// Returns the total number of dependencies processed
    pub fn total_dependencies(&self) -> usize {
        self.results.len()
    }

    /// Returns true if any dependency changed
    pub fn has_changes(&self) -> bool {
        self.total_updates() > 0
    }

    /// Returns results for a specific ecosystem
    pub fn by_ecosystem(&self, ecosystem: Ecosystem) -> impl Iterator<Item = &UpdateResult> {
        self.results
            .iter()
            .filter(move |r| r.dependency().ecosystem == ecosystem)
    }

    /// Ecosystems present in the results, in first-seen order
    pub fn ecosystems(&self) -> Vec<Ecosystem> {
        let mut seen = Vec::new();
        for result in &self.results {
            let ecosystem = result.dependency().ecosystem;
            if !seen.contains(&ecosystem) {
                seen.push(ecosystem);
            }
        }
        seen
    }
}
