//! Configuration file watcher for hot reload.
//!
//! The parent directory is watched rather than the file itself, so editors
//! that save by writing a temporary file and renaming it over the original
//! keep triggering reloads. Events for sibling files are ignored, and a
//! reload only goes out when the file's text actually changed.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::parse_config;
use crate::config::schema::ServiceConfig;

/// A watcher that monitors the configuration file for changes.
pub struct ConfigWatcher {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<ServiceConfig>,
}

impl ConfigWatcher {
    /// Create a new ConfigWatcher.
    ///
    /// Returns the watcher and a receiver for validated configuration updates.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<ServiceConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        (
            Self {
                path: path.to_path_buf(),
                update_tx,
            },
            update_rx,
        )
    }

    /// Start watching in a background thread.
    ///
    /// The returned handle must be kept alive for as long as updates are wanted.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let directory = watch_directory(&self.path);
        let file_name = self.path.file_name().map(OsString::from);
        let mut reload = Reload {
            path: self.path.clone(),
            last: fs::read_to_string(&self.path).ok(),
            tx: self.update_tx,
        };

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) if is_relevant(&event, file_name.as_deref()) => reload.check(),
                Ok(_) => {}
                Err(e) => tracing::error!(error = ?e, "Watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&directory, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?self.path, directory = ?directory, "Config watcher started");
        Ok(watcher)
    }
}

/// Reload state owned by the notify callback.
struct Reload {
    path: PathBuf,
    last: Option<String>,
    tx: mpsc::UnboundedSender<ServiceConfig>,
}

impl Reload {
    fn check(&mut self) {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            // Mid-rename; the create event for the new file follows.
            Err(e) => {
                tracing::debug!(path = ?self.path, error = %e, "Config file not readable yet");
                return;
            }
        };
        if self.last.as_deref() == Some(content.as_str()) {
            tracing::debug!(path = ?self.path, "Config file unchanged, skipping reload");
            return;
        }

        tracing::info!(path = ?self.path, "Config file change detected, reloading");
        match parse_config(&content) {
            Ok(config) => {
                self.last = Some(content);
                if self.tx.send(config).is_err() {
                    tracing::debug!("Config update receiver dropped");
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to reload config, keeping current routes");
            }
        }
    }
}

fn watch_directory(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// A content-changing event that names the watched file.
fn is_relevant(event: &Event, file_name: Option<&std::ffi::OsStr>) -> bool {
    let content_event = matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_));
    content_event
        && event
            .paths
            .iter()
            .any(|path| path.file_name().is_some() && path.file_name() == file_name)
}
