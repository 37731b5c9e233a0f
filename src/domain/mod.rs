//! Core domain models for depbump
//!
//! This module contains the fundamental types used throughout the crate:
//! - Ecosystem types for supported package managers
//! - Comparable version values
//! - Requirement, source and target records
//! - Update outcomes and the overall summary

mod ecosystem;
mod requirement;
mod summary;
mod update_result;
mod version;

pub use ecosystem::Ecosystem;
pub use requirement::{Dependency, GitRefContext, Requirement, Source, SourceKind, UpdateTarget};
pub use summary::UpdateSummary;
pub use update_result::{ChangeKind, RequirementChange, SkipReason, UpdateResult};
pub use version::{join_segments, Version};
