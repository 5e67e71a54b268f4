//! Frozen route definitions.

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use futures_util::future::BoxFuture;

use crate::routing::error::{RouterError, RouterResult};
use crate::routing::handler::Handler;
use crate::routing::matcher::Captures;
use crate::routing::pattern::{CompiledPattern, Segment};

/// A compiled route with its composed handler chain.
///
/// Routes are created by [`RouterBuilder::freeze`](crate::routing::RouterBuilder::freeze)
/// and never change afterwards.
#[derive(Debug, Clone)]
pub struct Route {
    pub(crate) method: Method,
    pub(crate) pattern: CompiledPattern,
    pub(crate) name: Option<String>,
    pub(crate) chain: Option<Handler>,
}

impl Route {
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The pattern as registered (including any group prefix).
    pub fn path(&self) -> &str {
        self.pattern.raw()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn priority(&self) -> i32 {
        self.pattern.priority()
    }

    pub fn is_static(&self) -> bool {
        self.pattern.is_static()
    }

    pub fn segments(&self) -> &[Segment] {
        self.pattern.segments()
    }

    pub fn pattern(&self) -> &CompiledPattern {
        &self.pattern
    }

    pub fn default_captures(&self) -> &Captures {
        self.pattern.default_captures()
    }

    /// Returns true if a terminal handler was registered.
    pub fn has_handler(&self) -> bool {
        self.chain.is_some()
    }

    /// Run the route's chain for a request.
    pub fn invoke(&self, request: Request<Body>) -> RouterResult<BoxFuture<'static, Response>> {
        let chain = self.chain.as_ref().ok_or_else(|| RouterError::NoHandlerBound {
            method: self.method.clone(),
            path: self.pattern.raw().to_string(),
        })?;
        Ok(chain.call(request))
    }
}
