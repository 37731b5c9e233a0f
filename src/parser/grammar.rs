//! Per-ecosystem requirement grammars
//!
//! A `Grammar` is a plain description of what a requirement string may
//! contain for one ecosystem and how its pieces are joined back together
//! when the updater writes a new requirement.

use crate::domain::Ecosystem;
use regex::Regex;
use std::sync::LazyLock;

/// Matches URL schemes and shorthand sources (`git+https:`, `file:`, `github:`)
static URL_LIKE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*:").unwrap());

/// Matches relative or absolute paths and `user/repo` shorthands
static PATH_LIKE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\.{0,2}/|~/)|^[\w.\-]+/[\w.\-]+").unwrap());

/// How alternatives are written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrStyle {
    /// No alternatives
    None,
    /// `||` only
    DoublePipe,
    /// `||` or `|`
    AnyPipe,
    /// The `or` keyword
    Keyword,
}

/// What a version with no operator means
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BareVersion {
    Exact,
    Caret,
}

/// Upper bound of a `~` constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TildeFlavor {
    /// `~1.2.3` allows patch updates, `~1` allows minor updates
    Minor,
    /// `~1.2` allows minor updates, `~1.2.3` allows patch updates
    Pessimistic,
}

/// What an exact version with missing segments means
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartialExact {
    /// `1.2` matches any `1.2.x`
    XRange,
    /// `1.2` matches `1.2.0` only
    Padded,
}

/// Requirement syntax of one ecosystem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grammar {
    pub ecosystem: Ecosystem,
    pub or_style: OrStyle,
    /// `,` joins constraints
    pub comma_and: bool,
    /// Whitespace alone joins constraints
    pub whitespace_and: bool,
    /// `and` joins constraints
    pub keyword_and: bool,
    /// `a - b` ranges
    pub hyphen_ranges: bool,
    /// `x as y` aliases
    pub aliases: bool,
    pub bare: BareVersion,
    pub tilde: TildeFlavor,
    pub partial_exact: PartialExact,
    /// Text placed between an existing requirement and an appended branch
    pub or_joiner: &'static str,
}

impl Grammar {
    /// Returns the grammar for an ecosystem
    pub fn for_ecosystem(ecosystem: Ecosystem) -> Self {
        let base = Grammar {
            ecosystem,
            or_style: OrStyle::None,
            comma_and: true,
            whitespace_and: false,
            keyword_and: false,
            hyphen_ranges: false,
            aliases: false,
            bare: BareVersion::Exact,
            tilde: TildeFlavor::Minor,
            partial_exact: PartialExact::Padded,
            or_joiner: " || ",
        };

        match ecosystem {
            Ecosystem::Npm => Grammar {
                or_style: OrStyle::DoublePipe,
                comma_and: false,
                whitespace_and: true,
                hyphen_ranges: true,
                partial_exact: PartialExact::XRange,
                ..base
            },
            Ecosystem::Composer => Grammar {
                or_style: OrStyle::AnyPipe,
                whitespace_and: true,
                hyphen_ranges: true,
                aliases: true,
                tilde: TildeFlavor::Pessimistic,
                ..base
            },
            Ecosystem::Cargo => Grammar {
                bare: BareVersion::Caret,
                partial_exact: PartialExact::XRange,
                ..base
            },
            Ecosystem::Hex => Grammar {
                or_style: OrStyle::Keyword,
                comma_and: false,
                keyword_and: true,
                or_joiner: " or ",
                ..base
            },
            Ecosystem::GoDep => Grammar {
                or_style: OrStyle::DoublePipe,
                whitespace_and: true,
                hyphen_ranges: true,
                bare: BareVersion::Caret,
                partial_exact: PartialExact::XRange,
                ..base
            },
            Ecosystem::Python | Ecosystem::Terraform | Ecosystem::Maven => base,
        }
    }

    /// Returns true if the grammar can express alternatives
    pub fn has_or(&self) -> bool {
        self.or_style != OrStyle::None
    }

    /// Returns true if `separator` is an accepted OR token
    pub fn accepts_or(&self, separator: &str) -> bool {
        match self.or_style {
            OrStyle::None => false,
            OrStyle::DoublePipe => separator == "||",
            OrStyle::AnyPipe => separator == "||" || separator == "|",
            OrStyle::Keyword => separator == "or",
        }
    }
}

/// Returns true if `requirement` names a URL, path or hosted-repo shorthand
pub fn is_url_like(requirement: &str) -> bool {
    let trimmed = requirement.trim();
    URL_LIKE.is_match(trimmed) || PATH_LIKE.is_match(trimmed)
}

/// Returns true if `requirement` is worth parsing as a version constraint
pub fn is_version_requirement(requirement: &str) -> bool {
    requirement.chars().any(|c| c.is_ascii_digit()) && !is_url_like(requirement)
}
