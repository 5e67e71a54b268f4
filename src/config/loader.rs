//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::ServiceConfig;
use crate::config::validation::{validate_config, ValidationError};
use crate::routing::RouterError;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),

    #[error("Router build failed: {0}")]
    Router(#[from] RouterError),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse and validate configuration text.
pub fn parse_config(content: &str) -> Result<ServiceConfig, ConfigError> {
    let config: ServiceConfig = toml::from_str(content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ServiceConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config = parse_config(
            r#"
            [listener]
            bind_address = "127.0.0.1:3000"

            [router]
            case_sensitive = true

            [[rules]]
            name = "slug"
            expression = "[a-z0-9-]+"

            [[routes]]
            name = "post"
            path = "/posts/{slug:slug}"

            [[routes]]
            method = "POST"
            path = "/posts"
            body = "created"
            "#,
        )
        .unwrap();

        assert_eq!(config.listener.bind_address, "127.0.0.1:3000");
        assert!(config.router.case_sensitive);
        assert_eq!(config.rules[0].name, "slug");
        assert_eq!(config.routes.len(), 2);
        assert_eq!(config.routes[1].method, "POST");
        assert_eq!(config.routes[1].body.as_deref(), Some("created"));
    }

    #[test]
    fn test_parse_error() {
        let err = parse_config("[[routes]]\nmethod = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_validation_error_lists_all_problems() {
        let err = parse_config(
            r#"
            [[routes]]
            path = "a"

            [[routes]]
            path = "b"
            "#,
        )
        .unwrap_err();

        let message = err.to_string();
        assert!(message.starts_with("Validation failed: "));
        assert!(message.contains("routes[0]"));
        assert!(message.contains("routes[1]"));
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Path::new("/nonexistent/trailhead.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
