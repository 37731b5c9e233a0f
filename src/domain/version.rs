//! Ordered version values
//!
//! A `Version` is a list of numeric release segments plus optional
//! prerelease identifiers and build metadata. Comparison pads release
//! segments with zeros, so `1.2` and `1.2.0` are equal.
//!
//! Ecosystems disagree on what a legal version looks like; use
//! [`Version::parse_for`] when the ecosystem is known.

use crate::domain::Ecosystem;
use crate::error::VersionError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A single prerelease identifier
#[derive(Debug, Clone, PartialEq, Eq)]
enum Identifier {
    Numeric(u64),
    Alpha(String),
}

impl Ord for Identifier {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Identifier::Numeric(a), Identifier::Numeric(b)) => a.cmp(b),
            (Identifier::Numeric(_), Identifier::Alpha(_)) => Ordering::Less,
            (Identifier::Alpha(_), Identifier::Numeric(_)) => Ordering::Greater,
            (Identifier::Alpha(a), Identifier::Alpha(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for Identifier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Maven qualifiers that denote a plain release
const MAVEN_RELEASE_QUALIFIERS: &[&str] = &["final", "ga", "release"];

/// A comparable version value
#[derive(Debug, Clone)]
pub struct Version {
    text: String,
    release: Vec<u64>,
    prerelease: Vec<Identifier>,
    build: Option<String>,
    glued_prerelease: bool,
}

impl Version {
    /// Parse a version with the lenient shared rules
    pub fn parse(input: &str) -> Result<Self, VersionError> {
        let trimmed = input.trim();
        let text = strip_v_prefix(trimmed);

        let invalid = || VersionError::invalid(input);

        let bytes = text.as_bytes();
        if bytes.is_empty() || !bytes[0].is_ascii_digit() {
            return Err(invalid());
        }

        // Release segments: digits separated by single dots
        let mut release = Vec::new();
        let mut pos = 0;
        loop {
            let start = pos;
            while pos < bytes.len() && bytes[pos].is_ascii_digit() {
                pos += 1;
            }
            let segment: u64 = text[start..pos].parse().map_err(|_| invalid())?;
            release.push(segment);

            let continues = pos + 1 < bytes.len()
                && bytes[pos] == b'.'
                && bytes[pos + 1].is_ascii_digit();
            if !continues {
                break;
            }
            pos += 1;
        }

        let rest = &text[pos..];
        let (pre_part, build) = match rest.split_once('+') {
            Some((pre, build)) => {
                if build.is_empty() || !build.chars().all(is_identifier_char) {
                    return Err(invalid());
                }
                (pre, Some(build.to_string()))
            }
            None => (rest, None),
        };

        let glued_prerelease = !pre_part.is_empty() && !pre_part.starts_with(['-', '.']);
        let prerelease = if pre_part.is_empty() {
            Vec::new()
        } else {
            let body = pre_part
                .strip_prefix('-')
                .or_else(|| pre_part.strip_prefix('.'))
                .unwrap_or(pre_part);
            if body.is_empty() {
                return Err(invalid());
            }
            let mut identifiers = Vec::new();
            for part in body.split(['.', '-']) {
                if part.is_empty() || !part.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
                {
                    return Err(invalid());
                }
                identifiers.push(match part.parse::<u64>() {
                    Ok(n) => Identifier::Numeric(n),
                    Err(_) => Identifier::Alpha(part.to_ascii_lowercase()),
                });
            }
            identifiers
        };

        Ok(Self {
            text: text.to_string(),
            release,
            prerelease,
            build,
            glued_prerelease,
        })
    }

    /// Parse a version applying the ecosystem's legality rules
    pub fn parse_for(input: &str, ecosystem: Ecosystem) -> Result<Self, VersionError> {
        let mut version = Self::parse(input)?;

        match ecosystem {
            Ecosystem::Cargo => {
                semver::Version::parse(input.trim()).map_err(|e| {
                    VersionError::invalid_for(input, ecosystem, e.to_string())
                })?;
            }
            Ecosystem::Npm | Ecosystem::GoDep => {
                if version.release.len() > 3 {
                    return Err(VersionError::invalid_for(
                        input,
                        ecosystem,
                        "more than three release segments",
                    ));
                }
                if version.glued_prerelease {
                    return Err(VersionError::invalid_for(
                        input,
                        ecosystem,
                        "prerelease must follow '-'",
                    ));
                }
            }
            Ecosystem::Composer | Ecosystem::Python | Ecosystem::Hex | Ecosystem::Terraform => {
                if version.release.len() > 4 {
                    return Err(VersionError::invalid_for(
                        input,
                        ecosystem,
                        "more than four release segments",
                    ));
                }
            }
            Ecosystem::Maven => {
                if let [Identifier::Alpha(qualifier)] = version.prerelease.as_slice() {
                    if MAVEN_RELEASE_QUALIFIERS.contains(&qualifier.as_str()) {
                        version.prerelease.clear();
                    }
                }
            }
        }

        Ok(version)
    }

    /// Build a release version from numeric segments
    pub fn from_segments(segments: &[u64]) -> Self {
        let text = join_segments(segments);
        Self {
            text,
            release: segments.to_vec(),
            prerelease: Vec::new(),
            build: None,
            glued_prerelease: false,
        }
    }

    /// Numeric release segments
    pub fn segments(&self) -> &[u64] {
        &self.release
    }

    /// Number of release segments as written
    pub fn precision(&self) -> usize {
        self.release.len()
    }

    /// Segment at `index`, zero when the version is shorter
    pub fn segment(&self, index: usize) -> u64 {
        self.release.get(index).copied().unwrap_or(0)
    }

    /// Returns true if the version carries a prerelease suffix
    pub fn is_prerelease(&self) -> bool {
        !self.prerelease.is_empty()
    }

    /// Build metadata after `+`, if any
    pub fn build(&self) -> Option<&str> {
        self.build.as_deref()
    }

    /// The release form of this version (prerelease and build dropped)
    pub fn release(&self) -> Self {
        Self::from_segments(&self.release)
    }

    /// The version text without a leading `v`
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Convert to a `semver::Version`, padding missing segments with zeros
    pub fn to_semver(&self) -> Option<semver::Version> {
        if self.release.len() > 3 {
            return None;
        }
        let mut text = format!(
            "{}.{}.{}",
            self.segment(0),
            self.segment(1),
            self.segment(2)
        );
        if !self.prerelease.is_empty() {
            text.push('-');
            let pre: Vec<String> = self
                .prerelease
                .iter()
                .map(|id| match id {
                    Identifier::Numeric(n) => n.to_string(),
                    Identifier::Alpha(s) => s.clone(),
                })
                .collect();
            text.push_str(&pre.join("."));
        }
        semver::Version::parse(&text).ok()
    }
}

/// Join numeric segments with dots
pub fn join_segments(segments: &[u64]) -> String {
    segments
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(".")
}

fn strip_v_prefix(text: &str) -> &str {
    match text.strip_prefix(['v', 'V']) {
        Some(rest) if rest.starts_with(|c: char| c.is_ascii_digit()) => rest,
        _ => text,
    }
}

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '.' || c == '-'
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.release.len().max(other.release.len());
        for i in 0..len {
            match self.segment(i).cmp(&other.segment(i)) {
                Ordering::Equal => continue,
                other => return other,
            }
        }

        match (self.prerelease.is_empty(), other.prerelease.is_empty()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => self.prerelease.cmp(&other.prerelease),
        }
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.text)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    #[test]
    fn test_parse_simple() {
        let version = v("1.2.3");
        assert_eq!(version.segments(), &[1, 2, 3]);
        assert!(!version.is_prerelease());
        assert_eq!(version.to_string(), "1.2.3");
    }

    #[test]
    fn test_parse_strips_v_prefix() {
        let version = v("v2.0");
        assert_eq!(version.segments(), &[2, 0]);
        assert_eq!(version.as_str(), "2.0");
    }

    #[test]
    fn test_parse_prerelease_and_build() {
        let version = v("1.0.0-beta.2+sha.5114f85");
        assert_eq!(version.segments(), &[1, 0, 0]);
        assert!(version.is_prerelease());
        assert_eq!(version.release().to_string(), "1.0.0");
    }

    #[test]
    fn test_parse_glued_prerelease() {
        let version = v("1.0rc1");
        assert_eq!(version.segments(), &[1, 0]);
        assert!(version.is_prerelease());
    }

    #[test]
    fn test_parse_invalid() {
        assert!(Version::parse("").is_err());
        assert!(Version::parse("abc").is_err());
        assert!(Version::parse("1.2.3-").is_err());
        assert!(Version::parse("1.2.3+").is_err());
        assert!(Version::parse("1.2.3-be ta").is_err());
    }

    #[test]
    fn test_padding_equality() {
        assert_eq!(v("1.2"), v("1.2.0"));
        assert!(v("1.2") < v("1.2.1"));
    }

    #[test]
    fn test_ordering_numeric_segments() {
        assert!(v("1.9.0") < v("1.10.0"));
        assert!(v("10.0.0") > v("9.9.9"));
    }

    #[test]
    fn test_ordering_prerelease() {
        assert!(v("1.0.0-alpha") < v("1.0.0"));
        assert!(v("1.0.0-alpha") < v("1.0.0-beta"));
        assert!(v("1.0.0-alpha.1") < v("1.0.0-alpha.beta"));
        assert!(v("1.0.0-rc.2") < v("1.0.0-rc.10"));
        assert!(v("1.0.0-rc.1") > v("0.9.9"));
    }

    #[test]
    fn test_parse_for_cargo_requires_full_semver() {
        assert!(Version::parse_for("1.2.3", Ecosystem::Cargo).is_ok());
        assert!(Version::parse_for("1.2", Ecosystem::Cargo).is_err());
    }

    #[test]
    fn test_parse_for_npm_segment_count() {
        assert!(Version::parse_for("1.2.3", Ecosystem::Npm).is_ok());
        assert!(Version::parse_for("1.2.3.4", Ecosystem::Npm).is_err());
        assert!(Version::parse_for("1.0rc1", Ecosystem::Npm).is_err());
    }

    #[test]
    fn test_parse_for_python_allows_four_segments() {
        assert!(Version::parse_for("1.2.3.4", Ecosystem::Python).is_ok());
        assert!(Version::parse_for("1.2.3.4.5", Ecosystem::Python).is_err());
        assert!(Version::parse_for("2.0rc1", Ecosystem::Python).is_ok());
    }

    #[test]
    fn test_parse_for_maven_release_qualifier() {
        let version = Version::parse_for("5.3.1.Final", Ecosystem::Maven).unwrap();
        assert!(!version.is_prerelease());
        assert_eq!(version.segments(), &[5, 3, 1]);

        let snapshot = Version::parse_for("5.3.1-SNAPSHOT", Ecosystem::Maven).unwrap();
        assert!(snapshot.is_prerelease());
    }

    #[test]
    fn test_from_segments() {
        let version = Version::from_segments(&[3, 0, 1]);
        assert_eq!(version.to_string(), "3.0.1");
        assert_eq!(version.precision(), 3);
    }

    #[test]
    fn test_to_semver_pads() {
        assert_eq!(v("1.2").to_semver().unwrap(), semver::Version::new(1, 2, 0));
        assert!(v("1.2.3.4").to_semver().is_none());
    }

    #[test]
    fn test_serde_round_trip_as_string() {
        let json = serde_json::to_string(&v("1.4.0")).unwrap();
        assert_eq!(json, "\"1.4.0\"");
        let parsed: Version = serde_json::from_str("\"v2.1\"").unwrap();
        assert_eq!(parsed, v("2.1"));
        assert!(serde_json::from_str::<Version>("\"nope\"").is_err());
    }
}
