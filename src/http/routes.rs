//! Config-driven route construction.
//!
//! # Responsibilities
//! - Register configured rules and routes on a fresh builder
//! - Attach the built-in handlers (fixed body or JSON echo)
//! - Freeze the result
//!
//! # Design Decisions
//! - Each build starts from a new builder; reload never edits a live router
//! - The echo handler reports the matched pattern and its captures

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::config::{ConfigError, RouteConfig, ServiceConfig, ValidationError};
use crate::http::extract::CapturesExt;
use crate::http::request::RequestIdExt;
use crate::routing::{handler, Captures, Entry, Router, RouterBuilder};

/// Build and freeze a router from configuration.
pub fn build_router(config: &ServiceConfig) -> Result<Router, ConfigError> {
    let mut builder = RouterBuilder::with_options(config.router.into());

    for rule in &config.rules {
        builder.rule(&rule.name, &rule.expression)?;
    }

    for (index, route) in config.routes.iter().enumerate() {
        let method: Method = route.method.parse().map_err(|_| {
            ConfigError::Validation(vec![ValidationError::InvalidMethod {
                index,
                method: route.method.clone(),
            }])
        })?;

        let handle = builder.route(method, &route.path, [route_handler(route)])?;
        if let Some(name) = &route.name {
            handle.name(name.clone());
        }
    }

    Ok(builder.freeze())
}

fn route_handler(route: &RouteConfig) -> Entry {
    match &route.body {
        Some(body) => {
            let body = body.clone();
            handler(move |_request| {
                let body = body.clone();
                async move { body.into_response() }
            })
        }
        None => {
            let label = route.name.clone().unwrap_or_else(|| route.path.clone());
            handler(move |request| {
                let response = echo(&label, &request);
                async move { response }
            })
        }
    }
}

fn echo(route: &str, request: &Request<Body>) -> Response {
    let empty = Captures::default();
    let captures = request.captures().unwrap_or(&empty);
    Json(json!({
        "route": route,
        "method": request.method().as_str(),
        "path": request.uri().path(),
        "captures": captures,
        "request_id": request.request_id(),
    }))
    .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use crate::config::parse_config;
    use crate::routing::RouterError;

    #[test]
    fn test_build_from_config() {
        let config = parse_config(
            r#"
            [[rules]]
            name = "slug"
            expression = "[a-z-]+"

            [[routes]]
            name = "post"
            path = "/posts/{slug:slug}"

            [[routes]]
            method = "DELETE"
            path = "/posts/{i:id}"
            "#,
        )
        .unwrap();

        let router = build_router(&config).unwrap();
        let found = router.find(&Method::GET, "/posts/hello-world").unwrap();
        assert_eq!(found.captures.get("slug"), Some("hello-world"));
        assert!(router.find(&Method::DELETE, "/posts/12").is_some());
        assert!(router.find(&Method::GET, "/posts/12").is_none());

        let params = HashMap::from([("slug".to_string(), "a-b".to_string())]);
        assert_eq!(router.generate("post", Some(&params)).unwrap(), "/posts/a-b");
    }

    #[test]
    fn test_unknown_rule_fails_build() {
        let config = parse_config(
            r#"
            [[routes]]
            path = "/colors/{hex:value}"
            "#,
        )
        .unwrap();

        let err = build_router(&config).unwrap_err();
        assert!(matches!(err, ConfigError::Router(RouterError::UnknownRule { .. })));
    }

    #[test]
    fn test_invalid_rule_fails_build() {
        let config = parse_config(
            r#"
            [[rules]]
            name = "broken"
            expression = "[a-"
            "#,
        )
        .unwrap();

        let err = build_router(&config).unwrap_err();
        assert!(matches!(err, ConfigError::Router(RouterError::InvalidRule { .. })));
    }
}
