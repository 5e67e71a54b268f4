//! Request path matching against compiled patterns.
//!
//! # Responsibilities
//! - Normalize request paths (case, trailing slash)
//! - Align path components against one candidate's segments
//! - Produce the capture map for a successful alignment
//!
//! # Design Decisions
//! - Each candidate is walked once, left to right; a failed segment
//!   abandons the candidate (no backtracking)
//! - Components are sliced from the normalized path, so wildcard
//!   captures are borrowed remainders rather than re-joined vectors
//! - The only allocation per attempt is the capture map

use std::borrow::Cow;
use std::collections::hash_map;
use std::collections::HashMap;

use serde::Serialize;

use crate::routing::pattern::{CompiledPattern, Segment};

/// Variables captured from a request path, keyed by capture name.
///
/// Every variable a pattern declares is present; optional captures that
/// were not supplied hold `""`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Captures(HashMap<String, String>);

impl Captures {
    /// Value of a captured variable.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> hash_map::Iter<'_, String, String> {
        self.0.iter()
    }
}

impl From<HashMap<String, String>> for Captures {
    fn from(map: HashMap<String, String>) -> Self {
        Self(map)
    }
}

impl<'a> IntoIterator for &'a Captures {
    type Item = (&'a String, &'a String);
    type IntoIter = hash_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Normalize a request path for lookup.
///
/// Lower-cases unless `case_sensitive`; strips trailing `/` (except on the
/// root path) unless `strict_slash`.
pub fn normalize(path: &str, case_sensitive: bool, strict_slash: bool) -> Cow<'_, str> {
    let path = if strict_slash || path == "/" {
        path
    } else {
        path.trim_end_matches('/')
    };
    if case_sensitive || !path.bytes().any(|b| b.is_ascii_uppercase()) && path.is_ascii() {
        Cow::Borrowed(path)
    } else {
        Cow::Owned(path.to_lowercase())
    }
}

/// Walk a normalized path against one compiled pattern.
///
/// The path must begin with `/`; `/` itself yields a single empty
/// component. Returns the captures on success.
pub fn align(pattern: &CompiledPattern, path: &str) -> Option<Captures> {
    let segments = pattern.segments();
    let mut remaining = path.strip_prefix('/')?;
    if segments.is_empty() {
        return None;
    }
    let last_segment = segments.len() - 1;
    let mut captures = pattern.default_captures().clone();

    for (index, segment) in segments.iter().enumerate() {
        // `remaining` always starts at the current component.
        let (component, tail) = match remaining.split_once('/') {
            Some((component, tail)) => (component, Some(tail)),
            None => (remaining, None),
        };
        let is_last_component = tail.is_none();
        let is_last_segment = index == last_segment;

        let value = match segment {
            Segment::Static(literal) => {
                if literal != component {
                    return None;
                }
                component
            }
            Segment::Capture(capture) => {
                let value = capture.strip(component)?;
                if capture.is_wildcard() {
                    if remaining.is_empty() && !capture.is_optional() {
                        return None;
                    }
                    captures.insert(capture.name(), remaining);
                    return Some(captures);
                }
                if !capture.accepts(value) {
                    return None;
                }
                captures.insert(capture.name(), value);
                value
            }
        };

        // Lookahead: an absent optional tail, or a wildcard swallowing the rest.
        if !is_last_segment && !value.is_empty() {
            if let Segment::Capture(next) = &segments[index + 1] {
                if next.is_optional() && is_last_component {
                    return Some(captures);
                }
                if next.is_wildcard() {
                    let rest = tail.unwrap_or("");
                    if rest.is_empty() && !next.is_optional() {
                        return None;
                    }
                    captures.insert(next.name(), rest);
                    return Some(captures);
                }
            }
        }

        if is_last_component {
            return is_last_segment.then_some(captures);
        }
        remaining = tail.unwrap_or("");
    }

    // Path has more components than the pattern has segments.
    None
}
