//! Maven requirement updater
//!
//! Maven requirements have their own syntax:
//! - Soft requirement: `1.2.3` (a preference, replaced by the target)
//! - Hard pin: `[1.2.3]`
//! - Interval: `[1.0,2.0)`, `(,2.0]`, `[1.5,)`
//! - Union of intervals: `[1.0,2.0),[3.0,4.0)` (left alone)
//! - Property reference: `${spring.version}` (left alone)

use crate::domain::{Ecosystem, SkipReason, Version};
use crate::error::UpdateError;
use crate::update::bump::bump_at_first_nonzero;
use crate::update::{RequirementUpdate, RequirementUpdater};
use log::debug;
use regex::Regex;
use std::sync::LazyLock;

static PROPERTY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$\{[^}]*\}").unwrap());

// One interval: opening bracket, optional lower, optional comma + upper, closing bracket
static INTERVAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([\[(])\s*([^,\[\]()]*?)\s*(?:(,)\s*([^,\[\]()]*?)\s*)?([\])])$").unwrap()
});

/// Maven requirement updater
#[derive(Debug, Clone, Default)]
pub struct MavenUpdater;

/// A parsed `[a,b)` style interval
#[derive(Debug, Clone, PartialEq, Eq)]
struct Interval {
    open: char,
    lower: Option<String>,
    has_comma: bool,
    upper: Option<String>,
    close: char,
}

impl Interval {
    fn parse(text: &str) -> Option<Self> {
        let caps = INTERVAL_RE.captures(text)?;
        let non_empty = |i: usize| {
            caps.get(i)
                .map(|m| m.as_str().to_string())
                .filter(|s| !s.is_empty())
        };
        Some(Self {
            open: caps.get(1)?.as_str().chars().next()?,
            lower: non_empty(2),
            has_comma: caps.get(3).is_some(),
            upper: non_empty(4),
            close: caps.get(5)?.as_str().chars().next()?,
        })
    }

    fn contains(&self, target: &Version) -> Result<bool, String> {
        let parse = |text: &str| {
            Version::parse_for(text, Ecosystem::Maven).map_err(|e| e.to_string())
        };

        if !self.has_comma {
            return match &self.lower {
                Some(pinned) => Ok(*target == parse(pinned)?),
                None => Ok(false),
            };
        }

        if let Some(lower) = &self.lower {
            let lower = parse(lower)?;
            let ok = if self.open == '[' {
                *target >= lower
            } else {
                *target > lower
            };
            if !ok {
                return Ok(false);
            }
        }
        if let Some(upper) = &self.upper {
            let upper = parse(upper)?;
            let ok = if self.close == ']' {
                *target <= upper
            } else {
                *target < upper
            };
            if !ok {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn render(&self) -> String {
        let lower = self.lower.as_deref().unwrap_or("");
        if !self.has_comma {
            return format!("{}{}{}", self.open, lower, self.close);
        }
        format!(
            "{}{},{}{}",
            self.open,
            lower,
            self.upper.as_deref().unwrap_or(""),
            self.close
        )
    }
}

impl MavenUpdater {
    /// Creates the updater
    pub fn new() -> Self {
        Self
    }

    fn update_interval(
        &self,
        interval: Interval,
        target: &Version,
    ) -> Result<RequirementUpdate, UpdateError> {
        match interval.contains(target) {
            Ok(true) => return Ok(RequirementUpdate::Unchanged(SkipReason::AlreadySatisfied)),
            Ok(false) => {}
            Err(message) => {
                return Ok(RequirementUpdate::Unchanged(SkipReason::UnresolvableVersion(
                    message,
                )))
            }
        }

        // Hard pin
        if !interval.has_comma {
            return Ok(RequirementUpdate::Updated(format!("[{}]", target)));
        }

        let upper = interval
            .upper
            .as_deref()
            .and_then(|u| Version::parse_for(u, Ecosystem::Maven).ok());
        match upper {
            Some(upper) if *target >= upper => {
                let bumped = bump_at_first_nonzero(&upper, target);
                let updated = Interval {
                    upper: Some(bumped.to_string()),
                    ..interval
                };
                Ok(RequirementUpdate::Updated(updated.render()))
            }
            _ => Ok(RequirementUpdate::Unchanged(SkipReason::UnresolvableVersion(
                format!("{} is below the interval's lower bound", target),
            ))),
        }
    }
}

impl RequirementUpdater for MavenUpdater {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Maven
    }

    fn updated_requirement(
        &self,
        requirement: &str,
        target: &Version,
        _is_library: bool,
    ) -> Result<RequirementUpdate, UpdateError> {
        let trimmed = requirement.trim();
        if PROPERTY_RE.is_match(trimmed) || !trimmed.chars().any(|c| c.is_ascii_digit()) {
            return Ok(RequirementUpdate::Unchanged(SkipReason::NotUpdatable));
        }

        if trimmed.starts_with(['[', '(']) {
            return match Interval::parse(trimmed) {
                Some(interval) => self.update_interval(interval, target),
                None => {
                    debug!("'{}' is a union of intervals", trimmed);
                    Ok(RequirementUpdate::Unchanged(SkipReason::NotUpdatable))
                }
            };
        }

        match Version::parse_for(trimmed, Ecosystem::Maven) {
            Ok(current) if current == *target => {
                Ok(RequirementUpdate::Unchanged(SkipReason::AlreadySatisfied))
            }
            Ok(_) => Ok(RequirementUpdate::Updated(target.to_string())),
            Err(e) => Ok(RequirementUpdate::Unchanged(SkipReason::UnresolvableVersion(
                e.to_string(),
            ))),
        }
    }

    fn registry_requirement(&self, target: &Version) -> String {
        target.to_string()
    }

    fn is_satisfied(&self, requirement: &str, target: &Version) -> bool {
        matches!(
            self.updated_requirement(requirement, target, false),
            Ok(RequirementUpdate::Unchanged(SkipReason::AlreadySatisfied))
        )
    }
}
