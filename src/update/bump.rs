//! Precision-preserving version bump routines
//!
//! Each routine takes the constraint's original shape and the target and
//! returns the text of the new version token. Operators are left to the
//! caller.

use crate::domain::{join_segments, Version};
use crate::parser::{increment_at, TildeFlavor};

/// Raise `old` just past `permit`, keeping `old`'s segment count
///
/// Finds the first nonzero segment of `old` (the last one when all are
/// zero), copies `permit` below it, increments `permit` at it and zeroes
/// the rest.
pub fn bump_at_first_nonzero(old: &Version, permit: &Version) -> Version {
    let old = old.release();
    let len = old.precision().max(1);
    let index = old
        .segments()
        .iter()
        .position(|s| *s != 0)
        .unwrap_or(len - 1);

    let permit_segments: Vec<u64> = (0..len).map(|i| permit.segment(i)).collect();
    let mut bumped = increment_at(&permit_segments, index);
    bumped.truncate(len);
    Version::from_segments(&bumped)
}

/// Version text for a caret constraint written with `precision` segments
pub fn caret(precision: usize, target: &Version) -> String {
    if target.is_prerelease() {
        return target.as_str().to_string();
    }
    let segments = target.segments();
    let index = segments
        .iter()
        .position(|s| *s != 0)
        .unwrap_or(segments.len().saturating_sub(1));
    let len = precision.max(index + 1);

    let bumped: Vec<u64> = (0..len)
        .map(|i| if i <= index { target.segment(i) } else { 0 })
        .collect();
    join_segments(&bumped)
}

/// Version text for a tilde constraint at `precision` segments
pub fn tilde(precision: usize, target: &Version, flavor: TildeFlavor) -> String {
    if target.is_prerelease() {
        return target.as_str().to_string();
    }
    let len = precision.max(1);
    let mut segments: Vec<u64> = (0..len).map(|i| target.segment(i)).collect();
    if flavor == TildeFlavor::Pessimistic && len >= 2 {
        segments[len - 1] = 0;
    }
    join_segments(&segments)
}

/// Version text at exactly `precision` segments, for `~>` and `~=`
pub fn same_precision(precision: usize, target: &Version) -> String {
    if target.is_prerelease() {
        return target.as_str().to_string();
    }
    let segments: Vec<u64> = (0..precision.max(1)).map(|i| target.segment(i)).collect();
    join_segments(&segments)
}

/// Version text for a wildcard constraint such as `1.2.*` or `1.x`
pub fn wildcard(explicit: usize, wildcards: usize, wildcard_char: char, target: &Version) -> String {
    let mut parts: Vec<String> = (0..explicit)
        .map(|i| target.segment(i).to_string())
        .collect();
    parts.extend(std::iter::repeat_n(wildcard_char.to_string(), wildcards));
    parts.join(".")
}

/// Version text for an exact constraint
pub fn exact(target: &Version) -> String {
    target.as_str().to_string()
}
