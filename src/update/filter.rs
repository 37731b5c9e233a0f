//! Update filter configuration
//!
//! This module provides the UpdateFilter struct that encapsulates
//! the name and ecosystem filters applied before updating.

use crate::domain::Ecosystem;

/// Filter configuration for update judgment
#[derive(Debug, Clone, Default)]
pub struct UpdateFilter {
    /// Ecosystems to process (empty means all)
    pub ecosystems: Vec<Ecosystem>,
    /// Packages to exclude from updates
    pub exclude: Vec<String>,
    /// If non-empty, only update these packages
    pub only: Vec<String>,
}

impl UpdateFilter {
    /// Create a new UpdateFilter with default settings (process all)
    pub fn new() -> Self {
        Self::default()
    }

    /// Set ecosystems to process
    pub fn with_ecosystems(mut self, ecosystems: Vec<Ecosystem>) -> Self {
        self.ecosystems = ecosystems;
        self
    }

    /// Set packages to exclude
    pub fn with_exclude(mut self, exclude: Vec<String>) -> Self {
        self.exclude = exclude;
        self
    }

    /// Set packages to include (only list)
    pub fn with_only(mut self, only: Vec<String>) -> Self {
        self.only = only;
        self
    }

    /// Check if an ecosystem should be processed
    pub fn should_process_ecosystem(&self, ecosystem: Ecosystem) -> bool {
        self.ecosystems.is_empty() || self.ecosystems.contains(&ecosystem)
    }

    /// Check if a package should be processed based on filters
    pub fn should_process_package(&self, name: &str) -> bool {
        // --only wins over --exclude
        if !self.only.is_empty() {
            return self.only.iter().any(|p| p == name);
        }
        !self.exclude.iter().any(|p| p == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_filter() {
        let filter = UpdateFilter::new();
        assert!(filter.ecosystems.is_empty());
        assert!(filter.exclude.is_empty());
        assert!(filter.only.is_empty());
    }

    #[test]
    fn test_should_process_ecosystem() {
        let filter = UpdateFilter::new();
        assert!(filter.should_process_ecosystem(Ecosystem::Maven));

        let filter = UpdateFilter::new().with_ecosystems(vec![Ecosystem::Npm, Ecosystem::Cargo]);
        assert!(filter.should_process_ecosystem(Ecosystem::Npm));
        assert!(!filter.should_process_ecosystem(Ecosystem::Hex));
    }

    #[test]
    fn test_should_process_package_with_exclude() {
        let filter = UpdateFilter::new().with_exclude(vec!["lodash".to_string()]);
        assert!(!filter.should_process_package("lodash"));
        assert!(filter.should_process_package("react"));
    }

    #[test]
    fn test_should_process_package_with_only() {
        let filter = UpdateFilter::new().with_only(vec!["serde".to_string()]);
        assert!(filter.should_process_package("serde"));
        assert!(!filter.should_process_package("tokio"));
    }

    #[test]
    fn test_only_takes_precedence() {
        let filter = UpdateFilter::new()
            .with_only(vec!["serde".to_string()])
            .with_exclude(vec!["serde".to_string()]);
        assert!(filter.should_process_package("serde"));
    }
}
