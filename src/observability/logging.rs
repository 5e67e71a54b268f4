//! Structured logging.
//!
//! # Responsibilities
//! - Initialize logging subsystem
//! - Configure log level from config and environment
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - `RUST_LOG` wins over the configured level when set

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter when neither `RUST_LOG` nor config supply one.
pub const DEFAULT_FILTER: &str = "trailhead=info,tower_http=info";

/// Build the filter: `RUST_LOG` first, then `level` applied to this crate.
pub fn filter(level: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| match level {
        Some(level) => EnvFilter::new(format!("trailhead={level},tower_http={level}")),
        None => EnvFilter::new(DEFAULT_FILTER),
    })
}

/// Install the global subscriber.
///
/// Safe to call more than once; later calls are ignored.
pub fn init(level: Option<&str>) {
    let result = tracing_subscriber::registry()
        .with(filter(level))
        .with(tracing_subscriber::fmt::layer())
        .try_init();

    if result.is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}
