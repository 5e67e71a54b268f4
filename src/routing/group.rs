//! Route groups: a shared path prefix plus shared middleware.

use axum::http::Method;

use crate::routing::builder::{RouteHandle, RouterBuilder};
use crate::routing::error::RouterResult;
use crate::routing::handler::{Entry, Middleware};

/// A prefix scope on a [`RouterBuilder`].
///
/// Group middleware runs after global middleware and before the
/// route's own middleware.
pub struct RouteGroup<'a> {
    builder: &'a mut RouterBuilder,
    index: usize,
}

impl<'a> RouteGroup<'a> {
    pub(crate) fn new(builder: &'a mut RouterBuilder, index: usize) -> Self {
        Self { builder, index }
    }

    /// The normalized prefix (no trailing `/`).
    pub fn prefix(&self) -> &str {
        &self.builder.group_ref(self.index).prefix
    }

    /// Add middleware shared by every route in this group.
    pub fn use_middleware(&mut self, middleware: Middleware) -> &mut Self {
        self.builder.group_mut(self.index).middlewares.push(middleware);
        self
    }

    pub fn route(
        &mut self,
        method: Method,
        path: &str,
        entries: impl IntoIterator<Item = Entry>,
    ) -> RouterResult<RouteHandle<'_>> {
        self.builder.register(self.index, method, path, entries)
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
}
