//! Build-phase router construction.
//!
//! # Responsibilities
//! - Own the rule registry while routes are being registered
//! - Compile each route as it is registered and file it in the table
//! - Collect global, group and route-local middleware
//! - Freeze into an immutable [`Router`]
//!
//! # Design Decisions
//! - Single owner, `&mut self` throughout; no locking in the build phase
//! - Configuration errors surface from the registering call, never later
//! - Chains are assembled at freeze, so middleware added after a route
//!   still applies to it

use std::collections::HashMap;

use axum::http::Method;

use crate::routing::error::RouterResult;
use crate::routing::group::RouteGroup;
use crate::routing::handler::{compose, split_entries, Entry, Handler, Middleware};
use crate::routing::pattern::CompiledPattern;
use crate::routing::route::Route;
use crate::routing::router::{MatchOptions, Router};
use crate::routing::rules::RuleRegistry;
use crate::routing::table::RouteTable;

/// Index of the implicit root group.
pub(crate) const ROOT_GROUP: usize = 0;

/// A registered route awaiting freeze.
#[derive(Debug)]
struct PendingRoute {
    method: Method,
    pattern: CompiledPattern,
    name: Option<String>,
    group: usize,
    entries: Vec<Entry>,
}

#[derive(Debug, Default)]
pub(crate) struct GroupSpec {
    pub(crate) prefix: String,
    pub(crate) middlewares: Vec<Middleware>,
}

/// Mutable router under construction.
#[derive(Debug)]
pub struct RouterBuilder {
    rules: RuleRegistry,
    options: MatchOptions,
    routes: Vec<PendingRoute>,
    table: RouteTable,
    names: HashMap<String, usize>,
    groups: Vec<GroupSpec>,
    middlewares: Vec<Middleware>,
    not_found: Vec<Entry>,
}

impl RouterBuilder {
    /// Builder with the default rules and default match options.
    pub fn new() -> Self {
        Self::with_options(MatchOptions::default())
    }

    pub fn with_options(options: MatchOptions) -> Self {
        Self {
            rules: RuleRegistry::new(),
            options,
            routes: Vec::new(),
            table: RouteTable::new(),
            names: HashMap::new(),
            groups: vec![GroupSpec::default()],
            middlewares: Vec::new(),
            not_found: Vec::new(),
        }
    }

    /// Register (or replace) a named rule.
    ///
    /// Only routes registered afterwards see the new expression.
    pub fn rule(&mut self, name: &str, expression: &str) -> RouterResult<&mut Self> {
        self.rules.register(name, expression)?;
        Ok(self)
    }

    /// Add middleware that wraps every route.
    pub fn use_middleware(&mut self, middleware: Middleware) -> &mut Self {
        self.middlewares.push(middleware);
        self
    }

    /// Replace the not-found chain.
    ///
    /// Without a terminal handler the default 404 response is used.
    pub fn not_found(&mut self, entries: impl IntoIterator<Item = Entry>) -> &mut Self {
        self.not_found = entries.into_iter().collect();
        self
    }

    /// Open a route group under `prefix`.
    pub fn group(&mut self, prefix: &str) -> RouteGroup<'_> {
        self.groups.push(GroupSpec {
            prefix: prefix.trim_end_matches('/').to_string(),
            middlewares: Vec::new(),
        });
        let index = self.groups.len() - 1;
        RouteGroup::new(self, index)
    }

    /// Register a route for any method.
    pub fn route(
        &mut self,
        method: Method,
        path: &str,
        entries: impl IntoIterator<Item = Entry>,
    ) -> RouterResult<RouteHandle<'_>> {
        self.register(ROOT_GROUP, method, path, entries)
    }

    pub fn get(&mut self, path: &str, entries: impl IntoIterator<Item = Entry>) -> RouterResult<RouteHandle<'_>> {
        self.route(Method::GET, path, entries)
    }

    pub fn post(&mut self, path: &str, entries: impl IntoIterator<Item = Entry>) -> RouterResult<RouteHandle<'_>> {
        self.route(Method::POST, path, entries)
    }

    pub fn put(&mut self, path: &str, entries: impl IntoIterator<Item = Entry>) -> RouterResult<RouteHandle<'_>> {
        self.route(Method::PUT, path, entries)
    }

    pub fn patch(&mut self, path: &str, entries: impl IntoIterator<Item = Entry>) -> RouterResult<RouteHandle<'_>> {
        self.route(Method::PATCH, path, entries)
    }

    pub fn delete(&mut self, path: &str, entries: impl IntoIterator<Item = Entry>) -> RouterResult<RouteHandle<'_>> {
        self.route(Method::DELETE, path, entries)
    }

    pub fn options(&mut self, path: &str, entries: impl IntoIterator<Item = Entry>) -> RouterResult<RouteHandle<'_>> {
        self.route(Method::OPTIONS, path, entries)
    }

    pub(crate) fn group_ref(&self, group: usize) -> &GroupSpec {
        &self.groups[group]
    }

    pub(crate) fn group_mut(&mut self, group: usize) -> &mut GroupSpec {
        &mut self.groups[group]
    }

    /// Compile a route and file it under its method.
    pub(crate) fn register(
        &mut self,
        group: usize,
        method: Method,
        path: &str,
        entries: impl IntoIterator<Item = Entry>,
    ) -> RouterResult<RouteHandle<'_>> {
        let full_path = join_path(&self.groups[group].prefix, path, self.options.strict_slash);
        let pattern = CompiledPattern::compile(&full_path, &self.rules, self.options)?;
        let index = self.routes.len();

        tracing::debug!(
            method = %method,
            path = %full_path,
            priority = pattern.priority(),
            is_static = pattern.is_static(),
            "Route compiled"
        );

        if pattern.is_static() {
            if let Some(previous) = self.table.insert_static(method.clone(), pattern.static_key(), index) {
                tracing::warn!(
                    method = %method,
                    path = %full_path,
                    replaced = %self.routes[previous].pattern.raw(),
                    "Static route overwritten"
                );
            }
        } else {
            self.table.insert_dynamic(method.clone(), index);
        }

        self.routes.push(PendingRoute {
            method,
            pattern,
            name: None,
            group,
            entries: entries.into_iter().collect(),
        });

        Ok(RouteHandle { builder: self, index })
    }

    /// Assemble chains, sort dynamic routes and hand back an immutable router.
    pub fn freeze(self) -> Router {
        let RouterBuilder {
            options,
            routes,
            mut table,
            names,
            groups,
            middlewares,
            not_found,
            ..
        } = self;

        table.sort_by_priority(|index| routes[index].pattern.priority());

        let routes: Vec<Route> = routes
            .into_iter()
            .map(|pending| {
                let (local, terminal) = split_entries(pending.entries);
                if terminal.is_none() {
                    tracing::warn!(
                        method = %pending.method,
                        path = %pending.pattern.raw(),
                        "Route has no terminal handler"
                    );
                }
                let chain = terminal.map(|terminal| {
                    let layers = middlewares
                        .iter()
                        .chain(groups[pending.group].middlewares.iter())
                        .chain(local.iter());
                    compose(layers, terminal)
                });
                Route {
                    method: pending.method,
                    pattern: pending.pattern,
                    name: pending.name,
                    chain,
                }
            })
            .collect();

        let (not_found_layers, not_found_terminal) = split_entries(not_found);
        let not_found = compose(
            not_found_layers.iter(),
            not_found_terminal.unwrap_or_else(Handler::not_found),
        );

        for (method, entries) in table.methods() {
            tracing::info!(
                method = %method,
                static_routes = entries.static_count(),
                dynamic_routes = entries.dynamics().len(),
                "Routes frozen"
            );
        }

        Router {
            routes,
            table,
            names,
            not_found,
            options,
        }
    }
}

impl Default for RouterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle to a just-registered route, for naming and priority tweaks.
pub struct RouteHandle<'a> {
    builder: &'a mut RouterBuilder,
    index: usize,
}

impl RouteHandle<'_> {
    /// Bind a name for reverse generation. Re-using a name rebinds it.
    pub fn name(self, name: impl Into<String>) -> Self {
        let name = name.into();
        let route = &mut self.builder.routes[self.index];
        if let Some(previous) = self.builder.names.insert(name.clone(), self.index) {
            if previous != self.index {
                tracing::warn!(name = %name, path = %route.pattern.raw(), "Route name rebound");
            }
        }
        route.name = Some(name);
        self
    }

    /// Shift the computed priority of this route.
    pub fn add_priority(self, delta: i32) -> Self {
        self.builder.routes[self.index].pattern.add_priority(delta);
        self
    }

    pub fn path(&self) -> &str {
        self.builder.routes[self.index].pattern.raw()
    }

    pub fn priority(&self) -> i32 {
        self.builder.routes[self.index].pattern.priority()
    }
}

/// Join a group prefix and a route path.
///
/// `/` under a prefix registers the prefix itself. Trailing slashes are
/// dropped except on the bare root; with `strict_slash` a single one is kept.
fn join_path(prefix: &str, path: &str, strict_slash: bool) -> String {
    if path == "/" && prefix.is_empty() {
        return "/".to_string();
    }
    let path = if path == "/" { "" } else { path };
    let joined = format!("{prefix}{path}");
    let trimmed = joined.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else if strict_slash && trimmed.len() < joined.len() {
        format!("{trimmed}/")
    } else {
        trimmed.to_string()
    }
}
