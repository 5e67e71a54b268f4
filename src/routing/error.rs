//! Routing error definitions.

use axum::http::Method;
use thiserror::Error;

/// Errors raised while building a router, generating paths or invoking routes.
#[derive(Debug, Error)]
pub enum RouterError {
    /// A rule expression failed to compile.
    #[error("invalid expression for rule `{name}`: {source}")]
    InvalidRule {
        name: String,
        #[source]
        source: regex::Error,
    },

    /// A pattern references a rule that was never registered.
    #[error("pattern `{pattern}` references unknown rule `{rule}`")]
    UnknownRule { rule: String, pattern: String },

    /// A wildcard capture appears before the last segment.
    #[error("wildcard capture must be the final segment of `{pattern}`")]
    WildcardNotLast { pattern: String },

    /// A capture segment could not be parsed.
    #[error("malformed capture `{segment}` in pattern `{pattern}`")]
    MalformedCapture { segment: String, pattern: String },

    /// Reverse generation was asked for a name nobody registered.
    #[error("route `{0}` was not found")]
    RouteNotFound(String),

    /// Reverse generation needs a variable the caller did not supply.
    #[error("route `{route}` requires variable `{variable}`")]
    RequiredVariableMissing { route: String, variable: String },

    /// A route was registered without a terminal handler.
    #[error("no handler bound to {method} {path}")]
    NoHandlerBound { method: Method, path: String },
}

impl RouterError {
    /// Returns true for errors that must abort startup.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            RouterError::InvalidRule { .. }
                | RouterError::UnknownRule { .. }
                | RouterError::WildcardNotLast { .. }
                | RouterError::MalformedCapture { .. }
        )
    }
}

/// Result type for routing operations.
pub type RouterResult<T> = Result<T, RouterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RouterError::RouteNotFound("Three".into());
        assert_eq!(err.to_string(), "route `Three` was not found");

        let err = RouterError::UnknownRule {
            rule: "hex".into(),
            pattern: "/color/{hex:value}".into(),
        };
        assert!(err.to_string().contains("hex"));
        assert!(err.is_configuration());
    }

    #[test]
    fn test_generation_errors_are_not_configuration() {
        let err = RouterError::RequiredVariableMissing {
            route: "user".into(),
            variable: "id".into(),
        };
        assert!(!err.is_configuration());
        assert_eq!(err.to_string(), "route `user` requires variable `id`");
    }
}
