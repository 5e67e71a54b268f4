//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate methods, path shapes and rule definitions
//! - Detect duplicate route names
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServiceConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system
//! - Pattern compilation errors are left to the router build

use std::collections::HashSet;
use std::net::SocketAddr;

use axum::http::Method;
use thiserror::Error;

use crate::config::schema::ServiceConfig;

/// A single semantic problem in a configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address `{0}` is not a socket address")]
    BindAddress(String),

    #[error("observability.metrics_address `{0}` is not a socket address")]
    MetricsAddress(String),

    #[error("rules[{index}]: name must not be empty")]
    EmptyRuleName { index: usize },

    #[error("rules[{index}] `{name}`: expression must not be empty")]
    EmptyRuleExpression { index: usize, name: String },

    #[error("routes[{index}]: method `{method}` is not a valid HTTP method")]
    InvalidMethod { index: usize, method: String },

    #[error("routes[{index}]: path `{path}` must start with `/`")]
    RelativePath { index: usize, path: String },

    #[error("routes[{index}]: name `{name}` is already used")]
    DuplicateName { index: usize, name: String },
}

/// Check a parsed configuration.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    for (index, rule) in config.rules.iter().enumerate() {
        if rule.name.is_empty() {
            errors.push(ValidationError::EmptyRuleName { index });
        }
        if rule.expression.is_empty() {
            errors.push(ValidationError::EmptyRuleExpression {
                index,
                name: rule.name.clone(),
            });
        }
    }

    let mut names = HashSet::new();
    for (index, route) in config.routes.iter().enumerate() {
        if route.method.parse::<Method>().is_err() {
            errors.push(ValidationError::InvalidMethod {
                index,
                method: route.method.clone(),
            });
        }
        if !route.path.starts_with('/') {
            errors.push(ValidationError::RelativePath {
                index,
                path: route.path.clone(),
            });
        }
        if let Some(name) = &route.name {
            if !names.insert(name.as_str()) {
                errors.push(ValidationError::DuplicateName {
                    index,
                    name: name.clone(),
                });
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
