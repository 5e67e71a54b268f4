//! Handlers, middleware and registration entries.
//!
//! # Responsibilities
//! - Type-erase async request handlers
//! - Represent middleware as handler-to-handler functions
//! - Tag registration items as middleware or terminal handler
//! - Compose a route's chain once, at freeze
//!
//! # Design Decisions
//! - Registration takes explicit `Entry` variants instead of inspecting
//!   values at dispatch time
//! - Chains are composed outermost-first: the first middleware listed
//!   sees the request first
//! - When several terminal handlers are listed, the last one wins

use std::future::Future;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::{IntoResponse, Response};
use futures_util::future::{BoxFuture, FutureExt};

type HandlerFn = dyn Fn(Request<Body>) -> BoxFuture<'static, Response> + Send + Sync;
type MiddlewareFn = dyn Fn(Handler) -> Handler + Send + Sync;

/// A type-erased async request handler.
#[derive(Clone)]
pub struct Handler(Arc<HandlerFn>);

impl Handler {
    /// Wrap an async function.
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn(Request<Body>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        Self(Arc::new(move |request: Request<Body>| -> BoxFuture<'static, Response> {
            f(request).boxed()
        }))
    }

    /// Invoke the handler.
    pub fn call(&self, request: Request<Body>) -> BoxFuture<'static, Response> {
        (self.0)(request)
    }

    /// Default not-found handler.
    pub fn not_found() -> Self {
        Self::new(|_request| async { (StatusCode::NOT_FOUND, "404 page not found\n").into_response() })
    }
}

impl std::fmt::Debug for Handler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Handler")
    }
}

/// A function from the next handler to a wrapping handler.
#[derive(Clone)]
pub struct Middleware(Arc<MiddlewareFn>);

impl Middleware {
    /// Wrap a raw `Handler -> Handler` function.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Handler) -> Handler + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Build middleware from an async function receiving the request and
    /// the rest of the chain.
    pub fn from_fn<F, Fut>(f: F) -> Self
    where
        F: Fn(Request<Body>, Handler) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        let f = Arc::new(f);
        Self::new(move |next: Handler| {
            let f = f.clone();
            Handler::new(move |request| (*f)(request, next.clone()))
        })
    }

    /// Wrap `next` in this middleware.
    pub fn wrap(&self, next: Handler) -> Handler {
        (self.0)(next)
    }
}

impl std::fmt::Debug for Middleware {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Middleware")
    }
}

/// One item in a route's registration list.
#[derive(Debug, Clone)]
pub enum Entry {
    Middleware(Middleware),
    Handler(Handler),
}

impl From<Handler> for Entry {
    fn from(handler: Handler) -> Self {
        Entry::Handler(handler)
    }
}

impl From<Middleware> for Entry {
    fn from(middleware: Middleware) -> Self {
        Entry::Middleware(middleware)
    }
}

/// Shorthand for a terminal handler entry.
pub fn handler<F, Fut>(f: F) -> Entry
where
    F: Fn(Request<Body>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    Entry::Handler(Handler::new(f))
}

/// Shorthand for a middleware entry built with [`Middleware::from_fn`].
pub fn middleware<F, Fut>(f: F) -> Entry
where
    F: Fn(Request<Body>, Handler) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    Entry::Middleware(Middleware::from_fn(f))
}

/// Split entries into middleware (in order) and the terminal handler.
pub(crate) fn split_entries(entries: Vec<Entry>) -> (Vec<Middleware>, Option<Handler>) {
    let mut middlewares = Vec::new();
    let mut terminal = None;
    for entry in entries {
        match entry {
            Entry::Middleware(middleware) => middlewares.push(middleware),
            Entry::Handler(handler) => terminal = Some(handler),
        }
    }
    (middlewares, terminal)
}

/// Compose middleware around a terminal handler.
pub(crate) fn compose<'a>(
    middlewares: impl DoubleEndedIterator<Item = &'a Middleware>,
    terminal: Handler,
) -> Handler {
    middlewares
        .rev()
        .fold(terminal, |next, middleware| middleware.wrap(next))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn tag(name: &'static str) -> Middleware {
        Middleware::from_fn(move |request: Request<Body>, next: Handler| async move {
            let mut response = next.call(request).await;
            let trail = response
                .headers()
                .get("x-trail")
                .and_then(|value| value.to_str().ok())
                .map(|value| format!("{name},{value}"))
                .unwrap_or_else(|| name.to_string());
            response
                .headers_mut()
                .insert("x-trail", HeaderValue::from_str(&trail).unwrap());
            response
        })
    }

    #[tokio::test]
    async fn test_compose_runs_outermost_first() {
        let terminal = Handler::new(|_request| async { "done".into_response() });
        let chain = [tag("global"), tag("group"), tag("route")];

        let composed = compose(chain.iter(), terminal);
        let response = composed.call(Request::new(Body::empty())).await;

        assert_eq!(response.headers()["x-trail"], "global,group,route");
    }

    #[tokio::test]
    async fn test_default_not_found() {
        let response = Handler::not_found().call(Request::new(Body::empty())).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_split_entries_last_handler_wins() {
        let entries = vec![
            Entry::from(tag("a")),
            handler(|_request| async { "first".into_response() }),
            Entry::from(tag("b")),
            handler(|_request| async { "second".into_response() }),
        ];

        let (middlewares, terminal) = split_entries(entries);
        assert_eq!(middlewares.len(), 2);
        assert!(terminal.is_some());
    }
}
