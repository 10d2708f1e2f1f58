//! Spec file watcher for development mode.
//!
//! Watches the directory containing the spec file and reports debounced
//! changes to that one file, so editors that save by rename are still seen.

use crate::error::{CliResult, WatchError};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use notify_debouncer_mini::{new_debouncer, DebouncedEvent, Debouncer};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};
use std::time::Duration;

/// Event types for spec file changes.
#[derive(Debug, Clone)]
pub enum WatchEvent {
    /// The spec file was written or replaced.
    Changed(PathBuf),
    /// The spec file no longer exists.
    Removed(PathBuf),
    /// An error occurred.
    Error(String),
}

/// Watcher for a single spec file.
pub struct SpecWatcher {
    /// Spec file to watch.
    spec: PathBuf,
    /// Debounce duration in milliseconds.
    debounce_ms: u64,
}

impl SpecWatcher {
    /// Create a new watcher for the given spec file.
    pub fn new(spec: impl Into<PathBuf>) -> Self {
        Self {
            spec: spec.into(),
            debounce_ms: 500,
        }
    }

    /// Set the debounce duration in milliseconds.
    pub fn with_debounce(mut self, ms: u64) -> Self {
        self.debounce_ms = ms;
        self
    }

    /// Start watching.
    ///
    /// The returned debouncer must be kept alive for events to arrive.
    pub fn watch(&self) -> CliResult<(Debouncer<RecommendedWatcher>, Receiver<WatchEvent>)> {
        let file_name = self.file_name()?;
        let dir = self.watch_dir();
        let (tx, rx) = channel::<WatchEvent>();

        let mut debouncer = new_debouncer(
            Duration::from_millis(self.debounce_ms),
            move |result: Result<Vec<DebouncedEvent>, notify::Error>| match result {
                Ok(events) => {
                    // Several raw events for the spec collapse into one report.
                    let Some(event) = events
                        .into_iter()
                        .find(|event| event.path.file_name() == Some(file_name.as_os_str()))
                    else {
                        return;
                    };

                    let path = event.path;
                    let watch_event = if path.exists() {
                        WatchEvent::Changed(path)
                    } else {
                        WatchEvent::Removed(path)
                    };
                    let _ = tx.send(watch_event);
                }
                Err(e) => {
                    let _ = tx.send(WatchEvent::Error(e.to_string()));
                }
            },
        )
        .map_err(|e| WatchError::Init(e.to_string()))?;

        debouncer
            .watcher()
            .watch(&dir, RecursiveMode::NonRecursive)
            .map_err(|e| WatchError::Init(e.to_string()))?;

        Ok((debouncer, rx))
    }

    /// Get the spec file being watched.
    pub fn spec(&self) -> &Path {
        &self.spec
    }

    /// Directory that is actually watched.
    pub fn watch_dir(&self) -> PathBuf {
        match self.spec.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    fn file_name(&self) -> CliResult<OsString> {
        self.spec
            .file_name()
            .map(|name| name.to_os_string())
            .ok_or_else(|| {
                WatchError::InvalidPath {
                    path: self.spec.clone(),
                }
                .into()
            })
    }
}

impl WatchEvent {
    /// Get the path associated with this event.
    pub fn path(&self) -> Option<&Path> {
        match self {
            WatchEvent::Changed(p) | WatchEvent::Removed(p) => Some(p),
            WatchEvent::Error(_) => None,
        }
    }

    /// Check if this is an error event.
    pub fn is_error(&self) -> bool {
        matches!(self, WatchEvent::Error(_))
    }

    /// Get the error message if this is an error event.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            WatchEvent::Error(msg) => Some(msg),
            _ => None,
        }
    }
}
