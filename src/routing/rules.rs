//! Named regular-expression rules for typed captures.
//!
//! # Responsibilities
//! - Compile and anchor rule expressions at registration
//! - Resolve rule names for the pattern compiler
//!
//! # Design Decisions
//! - Every expression is wrapped as `^(?:expr)$` so alternations stay anchored
//! - Compiled patterns hold an `Arc<Rule>`; re-registering a name only affects
//!   patterns compiled afterwards
//! - Invalid expressions fail at registration, never at match time

use std::collections::HashMap;
use std::sync::Arc;

use regex::Regex;

use crate::routing::error::{RouterError, RouterResult};

/// Rule name that turns a capture into a greedy rest-of-path wildcard.
pub const WILDCARD_RULE: &str = "*";

/// A single named, anchored rule.
#[derive(Debug, Clone)]
pub struct Rule {
    name: String,
    expression: String,
    regex: Regex,
}

impl Rule {
    /// Compile a rule. The expression is anchored on both ends.
    pub fn new(name: impl Into<String>, expression: impl Into<String>) -> RouterResult<Self> {
        let name = name.into();
        let expression = expression.into();
        let regex = Regex::new(&format!("^(?:{expression})$"))
            .map_err(|source| RouterError::InvalidRule {
                name: name.clone(),
                source,
            })?;

        Ok(Self {
            name,
            expression,
            regex,
        })
    }

    /// Rule name as referenced from patterns.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Expression as registered, without anchors.
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Returns true if the whole value satisfies the rule.
    pub fn is_match(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }

    /// Returns true for the rest-of-path rule.
    pub fn is_wildcard(&self) -> bool {
        self.name == WILDCARD_RULE
    }
}

/// Registry of rules owned by a router under construction.
#[derive(Debug, Clone)]
pub struct RuleRegistry {
    rules: HashMap<String, Arc<Rule>>,
}

impl RuleRegistry {
    /// Create a registry seeded with the default rules:
    /// `*` (anything), `i` (digits) and `s` (alphanumerics).
    pub fn new() -> Self {
        let mut registry = Self::empty();
        for (name, expression) in [(WILDCARD_RULE, ".*"), ("i", "[0-9]+"), ("s", "[0-9A-Za-z]+")] {
            // Seed expressions are constant and known to compile.
            if let Ok(rule) = Rule::new(name, expression) {
                registry.rules.insert(name.to_string(), Arc::new(rule));
            }
        }
        registry
    }

    /// Create a registry with no rules at all.
    pub fn empty() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    /// Register or replace a rule.
    pub fn register(&mut self, name: &str, expression: &str) -> RouterResult<()> {
        let rule = Rule::new(name, expression)?;
        if self.rules.insert(name.to_string(), Arc::new(rule)).is_some() {
            tracing::debug!(rule = %name, expression = %expression, "Rule replaced");
        }
        Ok(())
    }

    /// Look up a rule by name.
    pub fn lookup(&self, name: &str) -> Option<&Arc<Rule>> {
        self.rules.get(name)
    }

    /// Number of registered rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rules() {
        let registry = RuleRegistry::new();
        assert_eq!(registry.len(), 3);

        let digits = registry.lookup("i").unwrap();
        assert!(digits.is_match("42"));
        assert!(!digits.is_match("4a"));
        assert!(!digits.is_match(""));

        let alnum = registry.lookup("s").unwrap();
        assert!(alnum.is_match("abc123"));
        assert!(!alnum.is_match("abc-123"));

        let any = registry.lookup(WILDCARD_RULE).unwrap();
        assert!(any.is_wildcard());
        assert!(any.is_match(""));
    }

    #[test]
    fn test_expressions_are_anchored() {
        let rule = Rule::new("e", "(?:.html)").unwrap();
        assert!(rule.is_match(".html"));
        assert!(!rule.is_match(".htmli"));
        assert!(!rule.is_match("x.html"));

        // Alternation must not escape the anchors.
        let rule = Rule::new("ab", "a|b").unwrap();
        assert!(rule.is_match("a"));
        assert!(!rule.is_match("ax"));
        assert!(!rule.is_match("xb"));
    }

    #[test]
    fn test_invalid_expression_fails_fast() {
        let mut registry = RuleRegistry::new();
        let err = registry.register("broken", "[0-9").unwrap_err();
        assert!(matches!(err, RouterError::InvalidRule { ref name, .. } if name == "broken"));
        assert!(registry.lookup("broken").is_none());
    }

    #[test]
    fn test_register_overwrites() {
        let mut registry = RuleRegistry::new();
        let before = registry.lookup("i").unwrap().clone();

        registry.register("i", "[a-z]+").unwrap();
        let after = registry.lookup("i").unwrap();

        assert!(after.is_match("abc"));
        assert!(!after.is_match("123"));
        assert_eq!(after.expression(), "[a-z]+");
        // Previously resolved handles keep the old expression.
        assert!(before.is_match("123"));
        assert_eq!(before.expression(), "[0-9]+");
    }
}
