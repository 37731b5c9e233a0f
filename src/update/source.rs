//! Git source transitions
//!
//! Decides, once per call, whether a git-sourced requirement keeps its
//! source, moves to a newer tag, or switches to the registry. The move is
//! one-way: nothing here turns a registry source into a git one, and a ref
//! is never invented when no tag was supplied.

use crate::domain::{GitRefContext, Source};
use regex::Regex;
use std::sync::LazyLock;

// `v1`, `1.2.3`, `v2.0.0-rc.1`
static TAG_LOOKALIKE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^v?\d+(?:\.\d+)*(?:-[\w.\-]+)?$").unwrap());

// Abbreviated or full commit SHA
static COMMIT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9a-f]{7,40}$").unwrap());

/// What the current git ref looks like
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefKind {
    /// A commit SHA
    PinnedRef,
    /// No ref, or a branch name
    Branch,
    /// A ref shaped like a version tag
    TagLookalike,
}

/// Outcome for one git-sourced requirement
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceTransition {
    /// Source stays as it is
    NoChange,
    /// Ref replaced by a newer tag; still a git source
    RefBumped {
        /// The new tag
        reference: String,
    },
    /// Git source dropped in favour of the registry
    SourceSwitchedToRegistry,
}

/// Classifies the source's current ref
pub fn classify_ref(source: &Source) -> RefKind {
    match source.reference.as_deref() {
        None => RefKind::Branch,
        Some(reference) if source.branch.as_deref() == Some(reference) => RefKind::Branch,
        Some(reference) if TAG_LOOKALIKE_RE.is_match(reference) => RefKind::TagLookalike,
        Some(reference) if COMMIT_RE.is_match(reference) => RefKind::PinnedRef,
        Some(_) => RefKind::Branch,
    }
}

/// Decides how a git source should change
pub fn resolve_source_transition(source: &Source, context: &GitRefContext) -> SourceTransition {
    if !source.is_git() {
        return SourceTransition::NoChange;
    }

    if classify_ref(source) == RefKind::TagLookalike {
        if let Some(tag) = &context.latest_tag {
            if source.reference.as_deref() != Some(tag.as_str()) {
                return SourceTransition::RefBumped {
                    reference: tag.clone(),
                };
            }
        }
    }

    if context.registry_release {
        return SourceTransition::SourceSwitchedToRegistry;
    }

    SourceTransition::NoChange
}
