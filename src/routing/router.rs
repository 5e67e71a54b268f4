//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Store compiled routes
//! - Look up matching route for request
//! - Return matched route or explicit no-match
//! - Dispatch a request through the matched route's chain
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(1) static lookup via HashMap before the dynamic scan
//! - O(n) priority-ordered dynamic scan, first full alignment wins
//! - Explicit NoMatch rather than silent default

use std::collections::HashMap;
use std::time::Instant;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::observability::metrics;
use crate::routing::builder::RouterBuilder;
use crate::routing::error::{RouterError, RouterResult};
use crate::routing::handler::Handler;
use crate::routing::matcher::{self, Captures};
use crate::routing::reverse;
use crate::routing::route::Route;
use crate::routing::table::RouteTable;

/// Path normalization switches applied at both compile and match time.
///
/// The defaults fold case and ignore trailing slashes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchOptions {
    pub case_sensitive: bool,
    pub strict_slash: bool,
}

/// A successful lookup.
#[derive(Debug)]
pub struct RouteMatch<'r> {
    pub route: &'r Route,
    pub captures: Captures,
}

/// Frozen router.
///
/// Produced by [`RouterBuilder::freeze`]; safe to share across tasks.
#[derive(Debug)]
pub struct Router {
    pub(crate) routes: Vec<Route>,
    pub(crate) table: RouteTable,
    pub(crate) names: HashMap<String, usize>,
    pub(crate) not_found: Handler,
    pub(crate) options: MatchOptions,
}

impl Router {
    /// Start a new build phase with the default rules.
    pub fn builder() -> RouterBuilder {
        RouterBuilder::new()
    }

    pub fn options(&self) -> MatchOptions {
        self.options
    }

    /// All routes in registration order.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Look up a named route.
    pub fn route_by_name(&self, name: &str) -> Option<&Route> {
        self.names.get(name).map(|&index| &self.routes[index])
    }

    /// Find the route for a method and raw request path.
    pub fn find<'r>(&'r self, method: &Method, path: &str) -> Option<RouteMatch<'r>> {
        let routes = self.table.get(method)?;
        let path = matcher::normalize(path, self.options.case_sensitive, self.options.strict_slash);

        if let Some(index) = routes.lookup_static(&path) {
            return Some(RouteMatch {
                route: &self.routes[index],
                captures: Captures::default(),
            });
        }

        routes.dynamics().iter().find_map(|&index| {
            let route = &self.routes[index];
            matcher::align(route.pattern(), &path).map(|captures| RouteMatch { route, captures })
        })
    }

    /// Build the path for a named route.
    ///
    /// See [`reverse::generate`] for the truncation rules.
    pub fn generate(&self, name: &str, params: Option<&HashMap<String, String>>) -> RouterResult<String> {
        let route = self
            .route_by_name(name)
            .ok_or_else(|| RouterError::RouteNotFound(name.to_string()))?;
        reverse::generate(route, params)
    }

    /// Route a request and run the selected chain.
    ///
    /// Captures are attached to the request extensions before the chain
    /// runs. No match invokes the not-found chain.
    pub async fn dispatch(&self, mut request: Request<Body>) -> Response {
        let start_time = Instant::now();
        let method = request.method().clone();
        let path = request.uri().path().to_string();

        let Some(found) = self.find(&method, &path) else {
            tracing::debug!(method = %method, path = %path, "No route matched");
            metrics::record_not_found(method.as_str());
            let response = self.not_found.call(request).await;
            metrics::record_request(method.as_str(), response.status().as_u16(), "none", start_time);
            return response;
        };

        let route = found.route;
        tracing::debug!(
            method = %method,
            path = %path,
            route = %route.path(),
            captures = found.captures.len(),
            "Route matched"
        );
        request.extensions_mut().insert(found.captures);

        let response = match route.invoke(request) {
            Ok(future) => future.await,
            Err(err) => {
                tracing::error!(error = %err, "Route invoked without a handler");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        };

        metrics::record_request(method.as_str(), response.status().as_u16(), route.path(), start_time);
        response
    }
}
