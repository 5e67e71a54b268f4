//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Build phase (single owner, RouterBuilder):
//!     rule(name, expr)        → rules.rs (anchored, compiled regex)
//!     get/post/...(pattern)   → pattern.rs (segments, priority, default captures)
//!                             → table.rs (static map or dynamic list per method)
//!     freeze()                → handler.rs (compose middleware chains)
//!                             → table.rs (stable sort of dynamics by priority)
//!                             → immutable Router
//!
//! Serve phase (shared via Arc, no locks):
//!     (method, path)
//!     → router.rs (normalize, static fast path)
//!     → matcher.rs (priority-ordered scan over dynamic routes)
//!     → Return: matched Route + Captures, or NoMatch
//!
//! Reverse generation:
//!     (name, vars) → reverse.rs → literal path
//! ```
//!
//! # Design Decisions
//! - Routes compiled at registration, immutable once frozen
//! - Rule references resolved at compile time, not at match time
//! - Linear first-match scan in priority order, no backtracking
//! - Equal priorities keep registration order (stable sort)
//! - Captures returned by value, never stored on shared state

pub mod builder;
pub mod error;
pub mod group;
pub mod handler;
pub mod matcher;
pub mod pattern;
pub mod reverse;
pub mod route;
pub mod router;
pub mod rules;
pub mod table;

pub use builder::{RouteHandle, RouterBuilder};
pub use error::{RouterError, RouterResult};
pub use group::RouteGroup;
pub use handler::{handler, middleware, Entry, Handler, Middleware};
pub use matcher::Captures;
pub use pattern::{Capture, CompiledPattern, Segment};
pub use route::Route;
pub use router::{MatchOptions, RouteMatch, Router};
pub use rules::{Rule, RuleRegistry};
