//! Path pattern compilation.
//!
//! # Responsibilities
//! - Split a raw pattern into typed segments
//! - Resolve rule references against the rule registry
//! - Compute the route priority used to order dynamic routes
//! - Build the default capture set (every declared variable as `""`)
//!
//! # Pattern Grammar (per `/`-delimited segment)
//! ```text
//! users            literal, case-insensitive
//! {id}             required capture
//! {id?}            optional capture
//! {i:id}           capture validated by rule `i`
//! {*:rest}         rest-of-path wildcard, final segment only
//! item-{id}.json   literal prefix/suffix glued to a capture
//! ```
//!
//! # Design Decisions
//! - Priority weights are an ordering device only; the induced order is
//!   static > affixed typed capture > typed capture > plain capture
//!   > optional capture > wildcard
//! - The bare root pattern `/` short-circuits to a fixed score
//! - Under `strict_slash` a trailing `/` compiles to a final empty
//!   literal segment, which carries no weight

use std::sync::Arc;

use crate::routing::error::{RouterError, RouterResult};
use crate::routing::matcher::Captures;
use crate::routing::router::MatchOptions;
use crate::routing::rules::{Rule, RuleRegistry};

const PRIORITY_ROOT: i32 = 20;
const PRIORITY_PATH: i32 = 16;
const PRIORITY_STATIC: i32 = 8;
const PRIORITY_CAPTURE: i32 = 4;
const PRIORITY_AFFIX: i32 = 2;
const PRIORITY_RULE: i32 = 1;
const PRIORITY_OPTIONAL: i32 = -1;
const PRIORITY_WILDCARD: i32 = -3;

/// A capture placeholder within a segment.
#[derive(Debug, Clone)]
pub struct Capture {
    name: String,
    prefix: String,
    suffix: String,
    rule: Option<Arc<Rule>>,
    optional: bool,
    wildcard: bool,
}

impl Capture {
    /// Variable name the captured value is stored under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Literal text required before the captured value.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Literal text required after the captured value.
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Validation rule, if the capture is typed.
    pub fn rule(&self) -> Option<&Rule> {
        self.rule.as_deref()
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    pub fn is_wildcard(&self) -> bool {
        self.wildcard
    }

    /// Strip the prefix and suffix from a path component.
    ///
    /// Returns `None` when either literal is missing.
    pub fn strip<'a>(&self, component: &'a str) -> Option<&'a str> {
        component
            .strip_prefix(self.prefix.as_str())?
            .strip_suffix(self.suffix.as_str())
    }

    /// Check an already-stripped value against this capture.
    ///
    /// Empty values pass only for optional captures, or when a rule
    /// explicitly accepts them.
    pub fn accepts(&self, value: &str) -> bool {
        if value.is_empty() && self.optional {
            return true;
        }
        match &self.rule {
            Some(rule) => rule.is_match(value),
            None => !value.is_empty(),
        }
    }
}

/// One `/`-delimited unit of a compiled pattern.
#[derive(Debug, Clone)]
pub enum Segment {
    /// Pure literal text, compared exactly against the normalized component.
    Static(String),
    /// A segment containing `{...}`.
    Capture(Capture),
}

impl Segment {
    pub fn is_static(&self) -> bool {
        matches!(self, Segment::Static(_))
    }

    /// The capture, if this is a capture segment.
    pub fn as_capture(&self) -> Option<&Capture> {
        match self {
            Segment::Capture(capture) => Some(capture),
            Segment::Static(_) => None,
        }
    }
}

/// A fully compiled route pattern.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    raw: String,
    segments: Vec<Segment>,
    priority: i32,
    default_captures: Captures,
}

impl CompiledPattern {
    /// Compile a raw pattern.
    ///
    /// Literal text is lower-cased unless `options.case_sensitive` is set.
    pub fn compile(raw: &str, rules: &RuleRegistry, options: MatchOptions) -> RouterResult<Self> {
        let raw = if raw.is_empty() { "/" } else { raw };
        let fold = |text: &str| {
            if options.case_sensitive {
                text.to_string()
            } else {
                text.to_lowercase()
            }
        };

        let mut pattern = Self {
            raw: raw.to_string(),
            segments: Vec::new(),
            priority: 0,
            default_captures: Captures::default(),
        };

        if raw == "/" {
            pattern.priority = PRIORITY_ROOT;
            return Ok(pattern);
        }

        let tokens: Vec<&str> = raw.split('/').filter(|token| !token.is_empty()).collect();
        let last = tokens.len().saturating_sub(1);
        let trailing_slash = options.strict_slash && raw.ends_with('/');

        for (index, token) in tokens.iter().enumerate() {
            pattern.priority += PRIORITY_PATH;

            if !token.contains('{') {
                pattern.priority += PRIORITY_STATIC;
                pattern.segments.push(Segment::Static(fold(token)));
                continue;
            }

            let capture = parse_capture(token, raw, rules, &fold)?;
            if capture.wildcard && (index != last || trailing_slash) {
                return Err(RouterError::WildcardNotLast {
                    pattern: raw.to_string(),
                });
            }

            pattern.priority += capture_priority(&capture);
            pattern.default_captures.insert(capture.name.clone(), String::new());
            pattern.segments.push(Segment::Capture(capture));
        }

        if trailing_slash {
            pattern.segments.push(Segment::Static(String::new()));
        }

        Ok(pattern)
    }

    /// The pattern as registered.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// Returns true if no segment captures anything.
    pub fn is_static(&self) -> bool {
        self.segments.iter().all(Segment::is_static)
    }

    /// Every declared variable mapped to `""`.
    pub fn default_captures(&self) -> &Captures {
        &self.default_captures
    }

    /// Adjust the computed priority by a caller-supplied delta.
    pub fn add_priority(&mut self, delta: i32) {
        self.priority += delta;
    }

    /// Lookup key for the static table: the literal segments re-joined.
    pub fn static_key(&self) -> String {
        if self.segments.is_empty() {
            return "/".to_string();
        }
        let mut key = String::new();
        for segment in &self.segments {
            if let Segment::Static(literal) = segment {
                key.push('/');
                key.push_str(literal);
            }
        }
        key
    }
}

/// Parse one token that contains `{`.
fn parse_capture(
    token: &str,
    pattern: &str,
    rules: &RuleRegistry,
    fold: &dyn Fn(&str) -> String,
) -> RouterResult<Capture> {
    let malformed = || RouterError::MalformedCapture {
        segment: token.to_string(),
        pattern: pattern.to_string(),
    };

    let (prefix, rest) = token.split_once('{').ok_or_else(malformed)?;
    let (body, suffix) = rest.split_once('}').ok_or_else(malformed)?;

    let (body, optional) = match body.strip_suffix('?') {
        Some(body) => (body, true),
        None => (body, false),
    };

    let (rule_name, name) = match body.split_once(':') {
        Some((rule_name, name)) => (rule_name, name),
        None => ("", body),
    };
    if name.is_empty() {
        return Err(malformed());
    }

    let rule = if rule_name.is_empty() {
        None
    } else {
        let rule = rules.lookup(rule_name).ok_or_else(|| RouterError::UnknownRule {
            rule: rule_name.to_string(),
            pattern: pattern.to_string(),
        })?;
        Some(rule.clone())
    };
    let wildcard = rule.as_ref().is_some_and(|rule| rule.is_wildcard());

    Ok(Capture {
        name: name.to_string(),
        prefix: fold(prefix),
        suffix: fold(suffix),
        rule,
        optional,
        wildcard,
    })
}

fn capture_priority(capture: &Capture) -> i32 {
    let mut priority = PRIORITY_CAPTURE;
    if !capture.prefix.is_empty() {
        priority += PRIORITY_AFFIX;
    }
    if !capture.suffix.is_empty() {
        priority += PRIORITY_AFFIX;
    }
    if capture.rule.is_some() {
        priority += PRIORITY_RULE;
    }
    if capture.wildcard {
        priority += PRIORITY_WILDCARD;
    }
    if capture.optional {
        priority += PRIORITY_OPTIONAL;
    }
    priority
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(raw: &str) -> CompiledPattern {
        CompiledPattern::compile(raw, &RuleRegistry::new(), MatchOptions::default()).unwrap()
    }

    #[test]
    fn test_static_pattern() {
        let pattern = compile("/One/Two");
        assert!(pattern.is_static());
        assert_eq!(pattern.segments().len(), 2);
        assert_eq!(pattern.static_key(), "/one/two");
        assert!(pattern.default_captures().is_empty());
    }

    #[test]
    fn test_root_pattern() {
        let pattern = compile("/");
        assert!(pattern.is_static());
        assert!(pattern.segments().is_empty());
        assert_eq!(pattern.priority(), PRIORITY_ROOT);
        assert_eq!(pattern.static_key(), "/");

        assert_eq!(compile("").static_key(), "/");
    }

    #[test]
    fn test_segment_count_ignores_empty_tokens() {
        let pattern = compile("//users///{id}/");
        assert_eq!(pattern.segments().len(), 2);
    }

    #[test]
    fn test_capture_parsing() {
        let pattern = compile("/Resource-{i:id?}.JSON");
        let capture = pattern.segments()[0].as_capture().unwrap();
        assert_eq!(capture.name(), "id");
        assert_eq!(capture.prefix(), "resource-");
        assert_eq!(capture.suffix(), ".json");
        assert_eq!(capture.rule().unwrap().name(), "i");
        assert!(capture.is_optional());
        assert!(!capture.is_wildcard());
        assert_eq!(pattern.default_captures().get("id"), Some(""));
    }

    #[test]
    fn test_case_sensitive_keeps_literals() {
        let options = MatchOptions {
            case_sensitive: true,
            ..MatchOptions::default()
        };
        let pattern = CompiledPattern::compile("/Docs/v-{n}", &RuleRegistry::new(), options).unwrap();
        assert!(matches!(&pattern.segments()[0], Segment::Static(s) if s == "Docs"));
        assert_eq!(pattern.segments()[1].as_capture().unwrap().prefix(), "v-");
    }

    #[test]
    fn test_strict_trailing_slash_segment() {
        let strict = MatchOptions {
            strict_slash: true,
            ..MatchOptions::default()
        };
        let rules = RuleRegistry::new();

        let pattern = CompiledPattern::compile("/docs/", &rules, strict).unwrap();
        assert!(pattern.is_static());
        assert_eq!(pattern.static_key(), "/docs/");
        assert_eq!(pattern.priority(), compile("/docs").priority());

        let pattern = CompiledPattern::compile("/items/{id}/", &rules, strict).unwrap();
        assert_eq!(pattern.segments().len(), 3);
        assert!(matches!(&pattern.segments()[2], Segment::Static(s) if s.is_empty()));

        let err = CompiledPattern::compile("/files/{*:rest}/", &rules, strict).unwrap_err();
        assert!(matches!(err, RouterError::WildcardNotLast { .. }));

        // Without strict mode the slash is just an empty token.
        assert_eq!(compile("/docs/").static_key(), "/docs");
    }

    #[test]
    fn test_unknown_rule_is_rejected() {
        let err = CompiledPattern::compile("/{hex:color}", &RuleRegistry::new(), MatchOptions::default()).unwrap_err();
        assert!(matches!(err, RouterError::UnknownRule { ref rule, .. } if rule == "hex"));
    }

    #[test]
    fn test_wildcard_must_be_last() {
        let err = CompiledPattern::compile("/{*:rest}/tail", &RuleRegistry::new(), MatchOptions::default()).unwrap_err();
        assert!(matches!(err, RouterError::WildcardNotLast { .. }));
    }

    #[test]
    fn test_malformed_captures() {
        let rules = RuleRegistry::new();
        for raw in ["/{id", "/{}", "/{i:}", "/{?}"] {
            let err = CompiledPattern::compile(raw, &rules, MatchOptions::default()).unwrap_err();
            assert!(matches!(err, RouterError::MalformedCapture { .. }), "{raw}");
        }
    }

    #[test]
    fn test_priority_ordering() {
        let literal = compile("/a").priority();
        let affixed_typed = compile("/x-{i:a}").priority();
        let typed = compile("/{i:a}").priority();
        let plain = compile("/{a}").priority();
        let optional = compile("/{a?}").priority();
        let wildcard = compile("/{*:a}").priority();

        assert!(literal > affixed_typed);
        assert!(affixed_typed > typed);
        assert!(typed > plain);
        assert!(plain > optional);
        assert!(optional > wildcard);
    }

    #[test]
    fn test_more_segments_rank_higher() {
        assert!(compile("/{one}/{two?}").priority() > compile("/{one?}").priority());
        assert!(compile("/foo/bar").priority() > compile("/foo/{*:any}").priority());
    }

    #[test]
    fn test_accepts() {
        let pattern = compile("/{a}/{b?}/{i:c}/{i:d?}");
        let captures: Vec<&Capture> = pattern
            .segments()
            .iter()
            .filter_map(Segment::as_capture)
            .collect();

        assert!(captures[0].accepts("x"));
        assert!(!captures[0].accepts(""));
        assert!(captures[1].accepts(""));
        assert!(captures[2].accepts("12"));
        assert!(!captures[2].accepts("ab"));
        assert!(!captures[2].accepts(""));
        assert!(captures[3].accepts(""));
        assert!(!captures[3].accepts("ab"));
    }
}
