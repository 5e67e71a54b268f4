//! Embeddable HTTP router with typed captures, priority ordering and
//! reverse generation, plus a small config-driven service around it.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::schema::ServiceConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{Router, RouterBuilder, RouterError};
