//! trailhead: config-driven HTTP router service.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ───────────────▶ http::server (axum, request id, trace span)
//!                          │
//!                          ▼
//!                      routing::Router (ArcSwap snapshot)
//!                          │ static map → priority-ordered scan
//!                          ▼
//!                      matched chain (captures in extensions)
//!                      or not-found chain
//!
//!     Cross-cutting: config (TOML + watcher), observability
//!     (tracing, metrics), lifecycle (signals, shutdown)
//! ```
//!
//! Besides `serve`, the binary can list the compiled routes, test a match
//! and run reverse generation against a config file.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use axum::http::Method;
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use trailhead::config::{load_config, ConfigWatcher, ServiceConfig};
use trailhead::http::{build_router, HttpServer};
use trailhead::lifecycle::{spawn_signal_listener, Shutdown};
use trailhead::observability::{logging, metrics};
use trailhead::routing::Router;

#[derive(Parser)]
#[command(name = "trailhead")]
#[command(about = "Config-driven HTTP router", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level override (trace, debug, info, warn, error).
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the configured routes
    Serve {
        /// Override listener.bind_address
        #[arg(short, long)]
        bind: Option<String>,

        /// Reload routes when the config file changes
        #[arg(short, long)]
        watch: bool,
    },
    /// List compiled routes in match order
    Routes,
    /// Show which route a request would hit
    Match {
        method: String,
        path: String,
    },
    /// Build a path from a route name and VAR=VALUE pairs
    Generate {
        name: String,
        vars: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServiceConfig::default(),
    };

    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| config.observability.log_level.clone());
    logging::init(Some(&level));

    match cli.command {
        Commands::Serve { bind, watch } => serve(config, cli.config, bind, watch).await,
        Commands::Routes => {
            print_routes(&build_router(&config)?);
            Ok(())
        }
        Commands::Match { method, path } => {
            let router = build_router(&config)?;
            let method: Method = method.parse()?;
            match router.find(&method, &path) {
                Some(found) => {
                    let report = serde_json::json!({
                        "route": found.route.path(),
                        "name": found.route.name(),
                        "priority": found.route.priority(),
                        "captures": found.captures,
                    });
                    println!("{}", serde_json::to_string_pretty(&report)?);
                }
                None => println!("no match"),
            }
            Ok(())
        }
        Commands::Generate { name, vars } => {
            let router = build_router(&config)?;
            let params = parse_vars(&vars)?;
            let params = (!params.is_empty()).then_some(&params);
            println!("{}", router.generate(&name, params)?);
            Ok(())
        }
    }
}

async fn serve(
    mut config: ServiceConfig,
    config_path: Option<PathBuf>,
    bind: Option<String>,
    watch: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("trailhead v{} starting", env!("CARGO_PKG_VERSION"));

    if let Some(bind) = bind {
        config.listener.bind_address = bind;
    }

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics exporter");
                }
            }
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    // The watcher handle must outlive the server.
    let (_watcher, updates) = match (watch, &config_path) {
        (true, Some(path)) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            (Some(watcher.run()?), updates)
        }
        (true, None) => {
            tracing::warn!("--watch ignored without --config");
            (None, mpsc::unbounded_channel().1)
        }
        (false, _) => (None, mpsc::unbounded_channel().1),
    };

    let shutdown = Arc::new(Shutdown::new());
    spawn_signal_listener(shutdown.clone());

    let server = HttpServer::new(config)?;
    server.run(listener, updates, shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

fn print_routes(router: &Router) {
    println!("{:<8} {:>8}  {:<8} {:<16} PATTERN", "METHOD", "PRIORITY", "KIND", "NAME");
    let mut methods: Vec<_> = router.table().methods().collect();
    methods.sort_by(|a, b| a.0.as_str().cmp(b.0.as_str()));

    for (method, entries) in methods {
        let mut statics: Vec<usize> = entries.statics().collect();
        statics.sort_unstable();
        let ordered = statics
            .into_iter()
            .map(|index| (index, "static"))
            .chain(entries.dynamics().iter().map(|&index| (index, "dynamic")));

        for (index, kind) in ordered {
            let route = &router.routes()[index];
            println!(
                "{:<8} {:>8}  {:<8} {:<16} {}",
                method.as_str(),
                route.priority(),
                kind,
                route.name().unwrap_or("-"),
                route.path()
            );
        }
    }
}

fn parse_vars(vars: &[String]) -> Result<HashMap<String, String>, String> {
    vars.iter()
        .map(|pair| {
            pair.split_once('=')
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .ok_or_else(|| format!("expected VAR=VALUE, got `{pair}`"))
        })
        .collect()
}
