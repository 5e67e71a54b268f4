//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, trace span)
//!     → routing::Router::dispatch (match, attach captures, run chain)
//!     → routes.rs handlers (fixed body or JSON echo)
//!     → Send to client
//! ```

pub mod extract;
pub mod request;
pub mod routes;
pub mod server;

pub use extract::CapturesExt;
pub use request::{RequestIdExt, X_REQUEST_ID};
pub use routes::build_router;
pub use server::{reload_router, HttpServer, SharedRouter};
