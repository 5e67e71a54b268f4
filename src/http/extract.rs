//! Capture access for handlers.
//!
//! The router stores the [`Captures`] of a match in the request extensions
//! before the route's chain runs.

use axum::http::Request;

use crate::routing::Captures;

/// Read access to path captures attached by the router.
pub trait CapturesExt {
    /// All captures, if the request went through a dynamic or static route.
    fn captures(&self) -> Option<&Captures>;

    /// One captured value.
    fn capture(&self, name: &str) -> Option<&str> {
        self.captures().and_then(|captures| captures.get(name))
    }
}

impl<B> CapturesExt for Request<B> {
    fn captures(&self) -> Option<&Captures> {
        self.extensions().get::<Captures>()
    }
}
