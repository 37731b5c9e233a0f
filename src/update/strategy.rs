//! Shared requirement update policy
//!
//! Every ecosystem except Maven runs the same steps:
//! 1. No digits, or a URL/path: leave it alone
//! 2. Parse with the ecosystem grammar; failures are soft
//! 3. Already satisfied by the target: leave it alone
//! 4. Rewrite range groups constraint by constraint, or bump the operator
//!    pattern of one branch
//! 5. Re-join untouched alternatives with their original separators
//!
//! Libraries keep their existing alternatives and gain a new one when the
//! grammar has OR; applications replace the first numeric alternative and
//! drop the others.

use crate::domain::{SkipReason, Version};
use crate::error::UpdateError;
use crate::parser::{
    is_version_requirement, parse_requirement, Branch, Constraint, Grammar, OperatorClass,
    ParsedRequirement, VersionPattern, VersionToken,
};
use crate::update::{bump, RequirementUpdate};
use log::debug;

/// Decides whether a parsed requirement accepts a version
pub type SatisfiesFn = fn(&ParsedRequirement, &Version, &Grammar) -> bool;

/// Renders a requirement for a bare target version
pub type RenderFn = fn(&Version) -> String;

fn grammar_satisfies(parsed: &ParsedRequirement, version: &Version, grammar: &Grammar) -> bool {
    parsed.satisfied_by(version, grammar)
}

/// Grammar-driven update policy for one ecosystem
#[derive(Debug, Clone)]
pub struct Strategy {
    grammar: Grammar,
    registry: RenderFn,
    pin: RenderFn,
    satisfies: SatisfiesFn,
}

impl Strategy {
    /// Creates a strategy
    ///
    /// `registry` renders the requirement used when a new alternative is
    /// appended or a git source moves to the registry. `pin` renders an
    /// exact requirement.
    pub fn new(grammar: Grammar, registry: RenderFn, pin: RenderFn) -> Self {
        Self {
            grammar,
            registry,
            pin,
            satisfies: grammar_satisfies,
        }
    }

    /// Replaces the satisfaction check (builder pattern)
    pub fn with_satisfaction(mut self, satisfies: SatisfiesFn) -> Self {
        self.satisfies = satisfies;
        self
    }

    /// The grammar used for parsing
    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    /// Requirement for a dependency newly taken from the registry
    pub fn registry_requirement(&self, target: &Version) -> String {
        (self.registry)(target)
    }

    /// Exact requirement on `target`
    pub fn pin_requirement(&self, target: &Version) -> String {
        (self.pin)(target)
    }

    /// Returns true if `requirement` parses and accepts `target`
    pub fn is_satisfied(&self, requirement: &str, target: &Version) -> bool {
        parse_requirement(requirement.trim(), &self.grammar)
            .map(|parsed| (self.satisfies)(&parsed, target, &self.grammar))
            .unwrap_or(false)
    }

    /// Computes the updated requirement string
    pub fn update(
        &self,
        requirement: &str,
        target: &Version,
        is_library: bool,
    ) -> Result<RequirementUpdate, UpdateError> {
        let trimmed = requirement.trim();
        if !is_version_requirement(trimmed) {
            debug!("'{}' is not a version requirement", trimmed);
            return Ok(RequirementUpdate::Unchanged(SkipReason::NotUpdatable));
        }

        let parsed = match parse_requirement(trimmed, &self.grammar) {
            Ok(parsed) => parsed,
            Err(e) => {
                debug!("cannot parse '{}': {}", trimmed, e);
                return Ok(RequirementUpdate::Unchanged(SkipReason::UnresolvableVersion(
                    e.to_string(),
                )));
            }
        };

        if let Some(constraint) = parsed
            .constraints()
            .find(|c| c.alias.is_some() && !c.version.is_version())
        {
            return Ok(RequirementUpdate::Unchanged(SkipReason::UnresolvableVersion(
                format!("'{}' is not a version", constraint.version.text),
            )));
        }

        if !parsed.branches.iter().any(|b| b.is_numeric(&self.grammar)) {
            return Ok(RequirementUpdate::Unchanged(SkipReason::NotUpdatable));
        }

        if (self.satisfies)(&parsed, target, &self.grammar) {
            debug!("'{}' already accepts {}", trimmed, target);
            return Ok(RequirementUpdate::Unchanged(SkipReason::AlreadySatisfied));
        }

        let updated = self.rewrite(&parsed, target, is_library)?;
        debug!("'{}' -> '{}' for {}", trimmed, updated, target);
        Ok(RequirementUpdate::Updated(updated))
    }

    fn rewrite(
        &self,
        parsed: &ParsedRequirement,
        target: &Version,
        is_library: bool,
    ) -> Result<String, UpdateError> {
        let grammar = &self.grammar;
        let numeric: Vec<usize> = parsed
            .branches
            .iter()
            .enumerate()
            .filter(|(_, b)| b.is_numeric(grammar))
            .map(|(i, _)| i)
            .collect();
        let Some(&first) = numeric.first() else {
            return Ok(parsed.input.clone());
        };

        let upper_bounds = parsed
            .constraints()
            .filter(|c| {
                matches!(
                    c.class(grammar),
                    OperatorClass::UpperBound | OperatorClass::HyphenRange
                )
            })
            .count();

        if upper_bounds > 0 {
            if (upper_bounds == 1 && numeric.len() == 1) || !grammar.has_or() {
                let branch = self.rewrite_range(parsed, &parsed.branches[first], target)?;
                return Ok(keep_first_numeric(parsed, first, &numeric, branch));
            }
            return Ok(self.append_branch(parsed, &self.registry_requirement(target)));
        }

        if is_library && grammar.has_or() {
            let template = numeric.last().copied().unwrap_or(first);
            let branch = self.bump_branch(parsed, &parsed.branches[template], target, true);
            Ok(self.append_branch(parsed, &branch))
        } else {
            let branch = self.bump_branch(parsed, &parsed.branches[first], target, is_library);
            Ok(keep_first_numeric(parsed, first, &numeric, branch))
        }
    }

    /// Rewrites a group holding an upper bound, one constraint at a time
    fn rewrite_range(
        &self,
        parsed: &ParsedRequirement,
        branch: &Branch,
        target: &Version,
    ) -> Result<String, UpdateError> {
        let grammar = &self.grammar;
        let mut pieces = Vec::with_capacity(branch.constraints.len());

        for constraint in &branch.constraints {
            let text = &parsed.input[constraint.span.clone()];
            if constraint.satisfied_by(target, grammar) {
                pieces.push(Some(text.to_string()));
                continue;
            }

            match constraint.class(grammar) {
                OperatorClass::UpperBound => {
                    let token = decorate(&constraint.version, &raised_bound(&constraint.version, target));
                    pieces.push(Some(splice(parsed, constraint, &constraint.version, &token)));
                }
                OperatorClass::HyphenRange => {
                    let Some(upper) = &constraint.upper else {
                        pieces.push(Some(text.to_string()));
                        continue;
                    };
                    let token = decorate(upper, &raised_bound(upper, target));
                    pieces.push(Some(splice(parsed, constraint, upper, &token)));
                }
                OperatorClass::NotEqual => pieces.push(None),
                _ => {
                    let operator = constraint.operator.map_or("=", |op| op.as_str());
                    return Err(UpdateError::unknown_operator(operator, parsed.input.clone()));
                }
            }
        }

        Ok(join_kept(pieces, &branch.joiners))
    }

    /// Bumps the operator pattern of one branch
    fn bump_branch(
        &self,
        parsed: &ParsedRequirement,
        branch: &Branch,
        target: &Version,
        is_library: bool,
    ) -> String {
        let grammar = &self.grammar;
        let patterned: Vec<&Constraint> = branch
            .constraints
            .iter()
            .filter(|c| is_pattern_class(c.class(grammar)))
            .collect();

        if patterned.is_empty() {
            debug!("no operator pattern in '{}'", parsed.input);
            return if is_library {
                self.registry_requirement(target)
            } else {
                self.pin_requirement(target)
            };
        }

        let tilde_precision = patterned
            .iter()
            .filter(|c| c.class(grammar) == OperatorClass::Tilde)
            .map(|c| pattern_of(&c.version).numbers().len())
            .min()
            .unwrap_or(1);
        let wildcard_template = patterned
            .iter()
            .filter(|c| c.class(grammar) == OperatorClass::Wildcard)
            .map(|c| pattern_of(&c.version))
            .max_by_key(|p| p.numbers().len());

        let pieces = branch
            .constraints
            .iter()
            .map(|constraint| {
                let text = &parsed.input[constraint.span.clone()];
                let class = constraint.class(grammar);
                if !is_pattern_class(class) {
                    let keep = matches!(class, OperatorClass::Branch | OperatorClass::Any)
                        || constraint.satisfied_by(target, grammar);
                    return keep.then(|| text.to_string());
                }

                let pattern = pattern_of(&constraint.version);
                let pinned = pattern.prerelease.is_some() || target.is_prerelease();
                let version = match class {
                    OperatorClass::Caret if !pinned => bump::caret(pattern.numbers().len(), target),
                    OperatorClass::Tilde if !pinned => {
                        bump::tilde(tilde_precision, target, grammar.tilde)
                    }
                    OperatorClass::Pessimistic if !pinned => {
                        bump::same_precision(pattern.numbers().len(), target)
                    }
                    OperatorClass::Wildcard if !pinned => {
                        let template = wildcard_template.unwrap_or(pattern);
                        bump::wildcard(
                            template.numbers().len(),
                            template.wildcard_count(),
                            template.wildcard_char().unwrap_or('*'),
                            target,
                        )
                    }
                    _ => bump::exact(target),
                };
                let token = decorate(&constraint.version, &version);
                Some(splice(parsed, constraint, &constraint.version, &token))
            })
            .collect();

        join_kept(pieces, &branch.joiners)
    }

    /// Appends `branch` as a new alternative, reusing the first separator as written
    fn append_branch(&self, parsed: &ParsedRequirement, branch: &str) -> String {
        let separator = parsed
            .separators
            .first()
            .map(String::as_str)
            .unwrap_or(self.grammar.or_joiner);
        format!("{}{}{}", parsed.input, separator, branch)
    }
}

fn is_pattern_class(class: OperatorClass) -> bool {
    matches!(
        class,
        OperatorClass::Exact
            | OperatorClass::Caret
            | OperatorClass::Tilde
            | OperatorClass::Pessimistic
            | OperatorClass::Wildcard
    )
}

static EMPTY_PATTERN: VersionPattern = VersionPattern {
    segments: Vec::new(),
    prerelease: None,
    stability: None,
};

/// Pattern of a token the classifier already accepted as a version
fn pattern_of(token: &VersionToken) -> &VersionPattern {
    token.pattern.as_ref().unwrap_or(&EMPTY_PATTERN)
}

/// Upper bound raised past `target`, keeping any wildcard segments as written
fn raised_bound(token: &VersionToken, target: &Version) -> String {
    let pattern = pattern_of(token);
    let bumped = bump::bump_at_first_nonzero(&pattern.lower(), target);
    match pattern.wildcard_char() {
        Some(wildcard_char) if !pattern.numbers().is_empty() => bump::wildcard(
            pattern.numbers().len(),
            pattern.wildcard_count(),
            wildcard_char,
            &bumped,
        ),
        _ => bumped.to_string(),
    }
}

/// Carries the `v` prefix and `@stability` flag over to a new version token
fn decorate(original: &VersionToken, version: &str) -> String {
    let prefix = match original.text.chars().next() {
        Some(c @ ('v' | 'V')) => c.to_string(),
        _ => String::new(),
    };
    let stability = original
        .pattern
        .as_ref()
        .and_then(|p| p.stability.as_deref())
        .map(|flag| format!("@{}", flag))
        .unwrap_or_default();
    format!("{}{}{}", prefix, version, stability)
}

/// Constraint text with `token` replaced by `replacement`
fn splice(
    parsed: &ParsedRequirement,
    constraint: &Constraint,
    token: &VersionToken,
    replacement: &str,
) -> String {
    format!(
        "{}{}{}",
        &parsed.input[constraint.span.start..token.span.start],
        replacement,
        &parsed.input[token.span.end..constraint.span.end]
    )
}

/// Joins the constraints that survived, using the joiner written before each
fn join_kept(pieces: Vec<Option<String>>, joiners: &[String]) -> String {
    let mut out = String::new();
    for (i, piece) in pieces.into_iter().enumerate() {
        let Some(piece) = piece else { continue };
        if !out.is_empty() && i > 0 {
            out.push_str(joiners.get(i - 1).map_or(" ", String::as_str));
        }
        out.push_str(&piece);
    }
    out
}

/// Replaces the first numeric branch and drops the other numeric ones
fn keep_first_numeric(
    parsed: &ParsedRequirement,
    first: usize,
    numeric: &[usize],
    replacement: String,
) -> String {
    let mut out = String::new();
    for index in 0..parsed.branches.len() {
        if index != first && numeric.contains(&index) {
            continue;
        }
        if !out.is_empty() && index > 0 {
            out.push_str(&parsed.separators[index - 1]);
        }
        if index == first {
            out.push_str(&replacement);
        } else {
            out.push_str(parsed.branch_text(index));
        }
    }
    out
}
