//! Parsed requirement model and satisfaction checks
//!
//! Handles constraint classes:
//! - Exact: `1.2.3`, `=1.2.3`, `==1.2.3`
//! - Caret: `^1.2.3` (or a bare version where bare means caret)
//! - Tilde: `~1.2.3`
//! - Pessimistic: `~> 2.0`, `~=2.2`
//! - Wildcard: `1.2.*`, `1.x`, `*`
//! - Comparison: `>=1.0`, `>1.0`, `<2.0`, `<=2.0`, `!=1.5`
//! - Hyphen range: `1.0.0 - 2.0.0`
//! - Branch: `dev-master`, `1.0.x-dev`

use crate::domain::{join_segments, Version};
use crate::parser::grammar::{BareVersion, Grammar, PartialExact, TildeFlavor};
use std::fmt;
use std::ops::Range;

/// Comparison and range operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `^`
    Caret,
    /// `~`
    Tilde,
    /// `~>`
    TildeGreater,
    /// `~=`
    Compatible,
    /// `=`
    Equal,
    /// `==`
    DoubleEqual,
    /// `===`
    Identity,
    /// `!=`
    NotEqual,
    /// `>`
    Greater,
    /// `>=`
    GreaterEqual,
    /// `<`
    Less,
    /// `<=`
    LessEqual,
}

impl Operator {
    /// Parses an operator symbol
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        let operator = match symbol {
            "^" => Operator::Caret,
            "~" => Operator::Tilde,
            "~>" => Operator::TildeGreater,
            "~=" => Operator::Compatible,
            "=" => Operator::Equal,
            "==" => Operator::DoubleEqual,
            "===" => Operator::Identity,
            "!=" => Operator::NotEqual,
            ">" => Operator::Greater,
            ">=" => Operator::GreaterEqual,
            "<" => Operator::Less,
            "<=" => Operator::LessEqual,
            _ => return None,
        };
        Some(operator)
    }

    /// Returns the operator symbol
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Caret => "^",
            Operator::Tilde => "~",
            Operator::TildeGreater => "~>",
            Operator::Compatible => "~=",
            Operator::Equal => "=",
            Operator::DoubleEqual => "==",
            Operator::Identity => "===",
            Operator::NotEqual => "!=",
            Operator::Greater => ">",
            Operator::GreaterEqual => ">=",
            Operator::Less => "<",
            Operator::LessEqual => "<=",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a constraint behaves, after applying the grammar's defaults
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorClass {
    Exact,
    Caret,
    Tilde,
    /// `~>` and `~=`
    Pessimistic,
    Wildcard,
    /// `*` on its own
    Any,
    /// `>` and `>=`
    LowerBound,
    /// `<` and `<=`
    UpperBound,
    HyphenRange,
    NotEqual,
    /// A branch name or anything else that is not a version
    Branch,
}

/// One release segment of a version pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    Number(u64),
    /// `*`, `x` or `X`
    Wildcard(char),
}

/// A version as written in a constraint, wildcards allowed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionPattern {
    pub segments: Vec<Segment>,
    /// Text after the release segments, separator stripped
    pub prerelease: Option<String>,
    /// Composer stability flag after `@`
    pub stability: Option<String>,
}

fn is_wildcard_byte(b: u8) -> bool {
    matches!(b, b'*' | b'x' | b'X')
}

impl VersionPattern {
    /// Reads a version pattern, returning None for branch names and other words
    pub fn parse(text: &str) -> Option<Self> {
        let (body, stability) = match text.split_once('@') {
            Some((body, flag)) => (body, Some(flag.to_string())),
            None => (text, None),
        };

        if body.starts_with("dev-") || body.ends_with("-dev") {
            return None;
        }

        let body = match body.strip_prefix(['v', 'V']) {
            Some(rest) if rest.starts_with(|c: char| c.is_ascii_digit()) => rest,
            _ => body,
        };

        let bytes = body.as_bytes();
        let segment_ends = |pos: usize| {
            bytes
                .get(pos)
                .is_none_or(|b| matches!(b, b'.' | b'-' | b'+'))
        };

        let mut segments = Vec::new();
        let mut pos = 0;
        loop {
            let start = pos;
            if bytes.get(pos).is_some_and(u8::is_ascii_digit) {
                while bytes.get(pos).is_some_and(u8::is_ascii_digit) {
                    pos += 1;
                }
                segments.push(Segment::Number(body[start..pos].parse().ok()?));
            } else if bytes.get(pos).copied().is_some_and(is_wildcard_byte) && segment_ends(pos + 1)
            {
                segments.push(Segment::Wildcard(bytes[pos] as char));
                pos += 1;
            } else {
                break;
            }

            let next_starts_segment = bytes.get(pos) == Some(&b'.')
                && bytes.get(pos + 1).is_some_and(|b| {
                    b.is_ascii_digit() || (is_wildcard_byte(*b) && segment_ends(pos + 2))
                });
            if !next_starts_segment {
                break;
            }
            pos += 1;
        }

        if segments.is_empty() {
            return None;
        }

        let rest = &body[pos..];
        let prerelease = if rest.is_empty() {
            None
        } else {
            let stripped = rest
                .strip_prefix('-')
                .or_else(|| rest.strip_prefix('.'))
                .unwrap_or(rest);
            let valid = !stripped.is_empty()
                && stripped
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '+' | '_'));
            if !valid {
                return None;
            }
            Some(stripped.to_string())
        };

        Some(Self {
            segments,
            prerelease,
            stability,
        })
    }

    /// Explicit numeric segments before the first wildcard
    pub fn numbers(&self) -> Vec<u64> {
        self.segments
            .iter()
            .map_while(|s| match s {
                Segment::Number(n) => Some(*n),
                Segment::Wildcard(_) => None,
            })
            .collect()
    }

    /// Returns true if any segment is a wildcard
    pub fn has_wildcard(&self) -> bool {
        self.segments
            .iter()
            .any(|s| matches!(s, Segment::Wildcard(_)))
    }

    /// Number of wildcard segments
    pub fn wildcard_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, Segment::Wildcard(_)))
            .count()
    }

    /// The wildcard character used, if any
    pub fn wildcard_char(&self) -> Option<char> {
        self.segments.iter().find_map(|s| match s {
            Segment::Wildcard(c) => Some(*c),
            Segment::Number(_) => None,
        })
    }

    /// Returns true if the pattern matches anything (`*`, `x`)
    pub fn is_any(&self) -> bool {
        matches!(self.segments.first(), Some(Segment::Wildcard(_)))
    }

    /// The smallest version the pattern describes
    pub fn lower(&self) -> Version {
        let mut numbers = self.numbers();
        if numbers.is_empty() {
            numbers.push(0);
        }
        match &self.prerelease {
            Some(pre) if !self.has_wildcard() => {
                Version::parse(&format!("{}-{}", join_segments(&numbers), pre))
                    .unwrap_or_else(|_| Version::from_segments(&numbers))
            }
            _ => Version::from_segments(&numbers),
        }
    }

    /// The exact version written, when there are no wildcards
    pub fn exact(&self) -> Option<Version> {
        (!self.has_wildcard()).then(|| self.lower())
    }
}

/// Segments of `segments` with `index` incremented and everything after zeroed
///
/// The result has `max(segments.len(), index + 1)` segments.
pub fn increment_at(segments: &[u64], index: usize) -> Vec<u64> {
    let len = segments.len().max(index + 1);
    (0..len)
        .map(|i| {
            let current = segments.get(i).copied().unwrap_or(0);
            match i.cmp(&index) {
                std::cmp::Ordering::Less => current,
                std::cmp::Ordering::Equal => current + 1,
                std::cmp::Ordering::Greater => 0,
            }
        })
        .collect()
}

/// Exclusive upper bound of a caret constraint over `segments`
fn caret_upper(segments: &[u64]) -> Version {
    let index = segments
        .iter()
        .position(|s| *s != 0)
        .unwrap_or(segments.len().saturating_sub(1));
    Version::from_segments(&increment_at(segments, index))
}

/// Exclusive upper bound of a tilde-like constraint bumped at `index`
fn bumped_upper(segments: &[u64], index: usize) -> Version {
    Version::from_segments(&increment_at(segments, index))
}

/// Returns true if `version` falls inside the wildcard pattern
fn wildcard_match(pattern: &VersionPattern, version: &Version) -> bool {
    let numbers = pattern.numbers();
    if numbers.is_empty() {
        return true;
    }
    *version >= pattern.lower() && *version < bumped_upper(&numbers, numbers.len() - 1)
}

/// A version word with its span
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionToken {
    /// Text as written
    pub text: String,
    /// Byte span in the requirement
    pub span: Range<usize>,
    /// Parsed form, None for branch names
    pub pattern: Option<VersionPattern>,
}

impl VersionToken {
    /// Creates a token, parsing its pattern
    pub fn new(text: &str, span: Range<usize>) -> Self {
        Self {
            text: text.to_string(),
            span,
            pattern: VersionPattern::parse(text),
        }
    }

    /// Returns true if the token reads as a version
    pub fn is_version(&self) -> bool {
        self.pattern.is_some()
    }
}

/// A single constraint: operator, version and optional range upper or alias
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    pub operator: Option<Operator>,
    pub version: VersionToken,
    /// Upper version of a hyphen range
    pub upper: Option<VersionToken>,
    /// Right-hand side of `x as y`
    pub alias: Option<VersionToken>,
    /// Span of the whole constraint
    pub span: Range<usize>,
}

impl Constraint {
    /// Classifies the constraint under `grammar`
    pub fn class(&self, grammar: &Grammar) -> OperatorClass {
        if self.upper.is_some() {
            return OperatorClass::HyphenRange;
        }
        let Some(pattern) = &self.version.pattern else {
            return OperatorClass::Branch;
        };

        match self.operator {
            Some(Operator::NotEqual) => OperatorClass::NotEqual,
            Some(Operator::Greater) | Some(Operator::GreaterEqual) => OperatorClass::LowerBound,
            Some(Operator::Less) | Some(Operator::LessEqual) => OperatorClass::UpperBound,
            Some(Operator::Caret) => OperatorClass::Caret,
            Some(Operator::Tilde) => OperatorClass::Tilde,
            Some(Operator::TildeGreater) | Some(Operator::Compatible) => {
                OperatorClass::Pessimistic
            }
            Some(Operator::Equal) | Some(Operator::DoubleEqual) | Some(Operator::Identity)
            | None => {
                if pattern.is_any() {
                    OperatorClass::Any
                } else if pattern.has_wildcard() {
                    OperatorClass::Wildcard
                } else if self.operator.is_none() && grammar.bare == BareVersion::Caret {
                    OperatorClass::Caret
                } else {
                    OperatorClass::Exact
                }
            }
        }
    }

    /// Returns true if `version` satisfies this constraint
    pub fn satisfied_by(&self, version: &Version, grammar: &Grammar) -> bool {
        let Some(pattern) = &self.version.pattern else {
            return false;
        };
        let numbers = pattern.numbers();
        let lower = pattern.lower();

        match self.class(grammar) {
            OperatorClass::Any => true,
            OperatorClass::Branch => false,
            OperatorClass::Wildcard => wildcard_match(pattern, version),
            OperatorClass::Exact => {
                let x_range = pattern.prerelease.is_none()
                    && grammar.partial_exact == PartialExact::XRange
                    && numbers.len() < 3;
                if x_range {
                    wildcard_match(pattern, version)
                } else {
                    *version == lower
                }
            }
            OperatorClass::Caret => {
                if numbers.is_empty() {
                    return true;
                }
                *version >= lower && *version < caret_upper(&numbers)
            }
            OperatorClass::Tilde => {
                if numbers.is_empty() {
                    return true;
                }
                let index = match grammar.tilde {
                    TildeFlavor::Minor => 1.min(numbers.len() - 1),
                    TildeFlavor::Pessimistic => numbers.len().saturating_sub(2),
                };
                *version >= lower && *version < bumped_upper(&numbers, index)
            }
            OperatorClass::Pessimistic => {
                if numbers.is_empty() {
                    return true;
                }
                let index = numbers.len().saturating_sub(2);
                *version >= lower && *version < bumped_upper(&numbers, index)
            }
            OperatorClass::LowerBound => match self.operator {
                Some(Operator::Greater) if !pattern.has_wildcard() => *version > lower,
                _ => *version >= lower,
            },
            OperatorClass::UpperBound => {
                if pattern.has_wildcard() {
                    return match self.operator {
                        Some(Operator::LessEqual) => wildcard_match(pattern, version) || *version < lower,
                        _ => *version < lower,
                    };
                }
                match self.operator {
                    Some(Operator::LessEqual) => *version <= lower,
                    _ => *version < lower,
                }
            }
            OperatorClass::HyphenRange => {
                let Some(upper) = self.upper.as_ref().and_then(|u| u.pattern.as_ref()) else {
                    return false;
                };
                if *version < lower {
                    return false;
                }
                let upper_numbers = upper.numbers();
                if upper_numbers.is_empty() {
                    return true;
                }
                if upper_numbers.len() >= 3 && !upper.has_wildcard() {
                    *version <= upper.lower()
                } else {
                    *version < bumped_upper(&upper_numbers, upper_numbers.len() - 1)
                }
            }
            OperatorClass::NotEqual => {
                if pattern.has_wildcard() {
                    !wildcard_match(pattern, version)
                } else {
                    *version != lower
                }
            }
        }
    }
}

/// One OR alternative: constraints that must all hold
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    pub constraints: Vec<Constraint>,
    /// Text between consecutive constraints, as written
    pub joiners: Vec<String>,
    /// Span of the whole branch
    pub span: Range<usize>,
}

impl Branch {
    /// Returns true if every constraint is satisfied
    pub fn satisfied_by(&self, version: &Version, grammar: &Grammar) -> bool {
        self.constraints
            .iter()
            .all(|c| c.satisfied_by(version, grammar))
    }

    /// Returns true if any constraint carries a version
    pub fn is_numeric(&self, grammar: &Grammar) -> bool {
        self.constraints.iter().any(|c| {
            !matches!(
                c.class(grammar),
                OperatorClass::Branch | OperatorClass::Any
            )
        })
    }
}

/// A requirement split into OR branches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRequirement {
    /// The original requirement text
    pub input: String,
    pub branches: Vec<Branch>,
    /// Text between consecutive branches, as written
    pub separators: Vec<String>,
}

impl ParsedRequirement {
    /// Returns true if any branch is satisfied
    pub fn satisfied_by(&self, version: &Version, grammar: &Grammar) -> bool {
        self.branches
            .iter()
            .any(|b| b.satisfied_by(version, grammar))
    }

    /// Text of branch `index` as written
    pub fn branch_text(&self, index: usize) -> &str {
        self.branches
            .get(index)
            .map(|b| &self.input[b.span.clone()])
            .unwrap_or("")
    }

    /// All constraints across branches, in order
    pub fn constraints(&self) -> impl Iterator<Item = &Constraint> {
        self.branches.iter().flat_map(|b| b.constraints.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    #[test]
    fn test_operator_symbols() {
        for symbol in ["^", "~", "~>", "~=", "=", "==", "===", "!=", ">", ">=", "<", "<="] {
            let op = Operator::from_symbol(symbol).unwrap();
            assert_eq!(op.as_str(), symbol);
        }
        assert!(Operator::from_symbol("=>").is_none());
    }

    #[test]
    fn test_pattern_plain() {
        let pattern = VersionPattern::parse("1.2.3").unwrap();
        assert_eq!(pattern.numbers(), vec![1, 2, 3]);
        assert!(!pattern.has_wildcard());
        assert!(pattern.prerelease.is_none());
    }

    #[test]
    fn test_pattern_wildcards() {
        let pattern = VersionPattern::parse("1.2.*").unwrap();
        assert_eq!(pattern.numbers(), vec![1, 2]);
        assert_eq!(pattern.wildcard_count(), 1);
        assert_eq!(pattern.wildcard_char(), Some('*'));

        let pattern = VersionPattern::parse("1.x.x").unwrap();
        assert_eq!(pattern.numbers(), vec![1]);
        assert_eq!(pattern.wildcard_count(), 2);

        assert!(VersionPattern::parse("*").unwrap().is_any());
    }

    #[test]
    fn test_pattern_prerelease_and_stability() {
        let pattern = VersionPattern::parse("1.0.0-beta.2").unwrap();
        assert_eq!(pattern.prerelease.as_deref(), Some("beta.2"));

        let pattern = VersionPattern::parse("2.0rc1").unwrap();
        assert_eq!(pattern.numbers(), vec![2, 0]);
        assert_eq!(pattern.prerelease.as_deref(), Some("rc1"));

        let pattern = VersionPattern::parse("1.2.0@beta").unwrap();
        assert_eq!(pattern.stability.as_deref(), Some("beta"));
        assert!(pattern.prerelease.is_none());
    }

    #[test]
    fn test_pattern_branches_are_not_versions() {
        assert!(VersionPattern::parse("dev-master").is_none());
        assert!(VersionPattern::parse("1.0.x-dev").is_none());
        assert!(VersionPattern::parse("latest").is_none());
        assert!(VersionPattern::parse("v").is_none());
    }

    #[test]
    fn test_pattern_v_prefix() {
        let pattern = VersionPattern::parse("v1.4").unwrap();
        assert_eq!(pattern.numbers(), vec![1, 4]);
    }

    #[test]
    fn test_increment_at() {
        assert_eq!(increment_at(&[1, 2, 3], 0), vec![2, 0, 0]);
        assert_eq!(increment_at(&[1, 2, 3], 1), vec![1, 3, 0]);
        assert_eq!(increment_at(&[1], 1), vec![1, 1]);
    }

    #[test]
    fn test_caret_upper() {
        assert_eq!(caret_upper(&[1, 2, 3]), v("2.0.0"));
        assert_eq!(caret_upper(&[0, 2, 3]), v("0.3.0"));
        assert_eq!(caret_upper(&[0, 0, 3]), v("0.0.4"));
        assert_eq!(caret_upper(&[0, 0]), v("0.1"));
    }

    #[test]
    fn test_wildcard_match() {
        let pattern = VersionPattern::parse("1.2.*").unwrap();
        assert!(wildcard_match(&pattern, &v("1.2.9")));
        assert!(!wildcard_match(&pattern, &v("1.3.0")));
    }
}
