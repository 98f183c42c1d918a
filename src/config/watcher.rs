//! Hot reload of the resource configuration.
//!
//! # Responsibilities
//! - Notice edits to the config file, including editors that save by
//!   writing a temp file and renaming it over the original
//! - Re-parse and validate the file; forward only configs that changed
//!
//! # Design Decisions
//! - The parent directory is watched, not the file: a rename replaces the
//!   inode and a file watch would go silent after the first save
//! - Events for sibling files and metadata-only events are ignored
//! - Identical text is not re-published, so one save that fires several
//!   events yields one catalog swap

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::{parse_config, ConfigError};
use crate::config::schema::ServiceConfig;

/// Watches one config file and emits validated [`ServiceConfig`] updates.
pub struct ConfigWatcher {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<ServiceConfig>,
}

impl ConfigWatcher {
    /// Returns the watcher and the receiving end of its update channel.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<ServiceConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        let watcher = Self {
            path: path.to_path_buf(),
            update_tx,
        };
        (watcher, update_rx)
    }

    /// Start watching. Updates stop when the returned handle is dropped.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        // Whatever is on disk now is already applied.
        let current = fs::read_to_string(&self.path).ok();
        let mut reloader = Reloader::new(self.path.clone(), current, self.update_tx);

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if is_reload_event(&event, &reloader.path) {
                        reloader.reload();
                    }
                }
                Err(e) => tracing::warn!(error = %e, "Config watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;
        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        tracing::info!(path = %self.path.display(), "Watching config for changes");
        Ok(watcher)
    }
}

/// Whether `event` is a content change of the file at `target`.
pub fn is_reload_event(event: &Event, target: &Path) -> bool {
    if !(event.kind.is_modify() || event.kind.is_create()) {
        return false;
    }
    let Some(name) = target.file_name() else {
        return false;
    };
    event.paths.iter().any(|p| p.file_name() == Some(name))
}

/// Reads, validates and forwards the config, remembering the last text sent.
struct Reloader {
    path: PathBuf,
    last_text: Option<String>,
    update_tx: mpsc::UnboundedSender<ServiceConfig>,
}

impl Reloader {
    fn new(
        path: PathBuf,
        last_text: Option<String>,
        update_tx: mpsc::UnboundedSender<ServiceConfig>,
    ) -> Self {
        Self {
            path,
            last_text,
            update_tx,
        }
    }

    fn reload(&mut self) {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            // Mid-rename; the create event for the new file follows.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return,
            Err(e) => {
                tracing::error!(error = %ConfigError::from(e), "Config reload failed");
                return;
            }
        };
        if self.last_text.as_deref() == Some(text.as_str()) {
            tracing::trace!("Config unchanged, skipping reload");
            return;
        }

        match parse_config(&text) {
            Ok(config) => {
                tracing::info!(
                    path = %self.path.display(),
                    resources = config.resources.len(),
                    "Config changed, publishing update"
                );
                self.last_text = Some(text);
                if self.update_tx.send(config).is_err() {
                    tracing::debug!("Config update receiver gone");
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Invalid config on disk, keeping current state");
            }
        }
    }
}
