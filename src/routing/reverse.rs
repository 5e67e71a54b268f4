//! Reverse generation: route name + variables → path.
//!
//! # Responsibilities
//! - Rebuild a literal path from a route's segments
//! - Stop at the first unresolved capture, yielding the parent path
//!
//! # Design Decisions
//! - Generation without any variables fails only when the very first
//!   segment is a required capture; otherwise it truncates
//! - Capture prefix/suffix literals are re-emitted around the value,
//!   except for wildcards, whose matched value keeps its literals
//! - A path that resolves to nothing is returned as `/`

use std::collections::HashMap;

use crate::routing::error::{RouterError, RouterResult};
use crate::routing::pattern::Segment;
use crate::routing::route::Route;

/// Build the path for `route` from `params`.
pub fn generate(route: &Route, params: Option<&HashMap<String, String>>) -> RouterResult<String> {
    let mut path = String::new();

    for (index, segment) in route.segments().iter().enumerate() {
        match segment {
            Segment::Static(literal) => {
                path.push('/');
                path.push_str(literal);
            }
            Segment::Capture(capture) => {
                match params.and_then(|params| params.get(capture.name())) {
                    // Matched wildcards already hold their whole component.
                    Some(value) if capture.is_wildcard() => {
                        path.push('/');
                        path.push_str(value);
                    }
                    Some(value) => {
                        path.push('/');
                        path.push_str(capture.prefix());
                        path.push_str(value);
                        path.push_str(capture.suffix());
                    }
                    None if params.is_none() && index == 0 && !capture.is_optional() => {
                        return Err(RouterError::RequiredVariableMissing {
                            route: route.name().unwrap_or(route.path()).to_string(),
                            variable: capture.name().to_string(),
                        });
                    }
                    None => break,
                }
            }
        }
    }

    if path.is_empty() {
        path.push('/');
    }
    Ok(path)
}
