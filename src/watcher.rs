//! Reload watching for registered sources.
//!
//! Each source flagged `reload_on_change` owns a [`WatchHandle`]: a pair of
//! filesystem watchers (one per watched file's directory, filtered to that
//! file's name) feeding a channel, and a dispatcher task draining it. The
//! dispatcher re-runs the source's load for every notification and awaits
//! each run before taking the next, so re-renders of one source are
//! serialized; distinct sources have independent dispatchers and re-render
//! concurrently.
//!
//! A failed re-render is logged at `warn` level and leaves the sink's state
//! from the last successful delivery untouched. Dropping (or [`stop`]ping)
//! the handle cancels the dispatcher and releases the watchers.
//!
//! [`stop`]: WatchHandle::stop

use std::path::{Path, PathBuf};
use std::sync::Arc;

use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::YamletError;
use crate::pipeline::{self, Binding};
use crate::sink::ConfigSink;

/// Reload function re-run by a dispatcher on every change notification.
type ReloadFn = Arc<dyn Fn() -> Result<usize, YamletError> + Send + Sync>;

/// Handle owning one source's watchers and dispatcher task.
///
/// Dropping the handle stops watching: the dispatcher task is aborted and
/// the filesystem watchers are released.
pub struct WatchHandle {
    task: JoinHandle<()>,
    // Kept alive for the handle's lifetime; dropping them stops the events.
    _watchers: Vec<RecommendedWatcher>,
}

impl WatchHandle {
    /// Stop watching. Equivalent to dropping the handle.
    pub fn stop(self) {
        drop(self);
    }
}

impl Drop for WatchHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Watch a template binding's files and re-run its pipeline on change.
///
/// Must be called from within a Tokio runtime. The binding's initial load is
/// not performed here; register sources through
/// [`ConfigBuilder`](crate::builder::ConfigBuilder) to get the
/// load-then-watch sequence.
pub fn watch_template(
    binding: &Binding,
    sink: Arc<dyn ConfigSink>,
) -> Result<WatchHandle, YamletError> {
    let paths = vec![binding.template_path.clone(), binding.values_path.clone()];
    let reload_binding = binding.clone();
    let reload: ReloadFn =
        Arc::new(move || pipeline::load_binding(&reload_binding, sink.as_ref()));
    spawn_watch(paths, reload)
}

/// Watch a plain YAML file and re-flatten it on change.
///
/// Must be called from within a Tokio runtime.
pub fn watch_yaml_file(
    path: &Path,
    optional: bool,
    sink: Arc<dyn ConfigSink>,
) -> Result<WatchHandle, YamletError> {
    let reload_path = path.to_path_buf();
    let reload: ReloadFn =
        Arc::new(move || pipeline::load_yaml_file(&reload_path, optional, sink.as_ref()));
    spawn_watch(vec![path.to_path_buf()], reload)
}

/// Set up watchers for `paths` and spawn the dispatcher task.
fn spawn_watch(paths: Vec<PathBuf>, reload: ReloadFn) -> Result<WatchHandle, YamletError> {
    let (tx, mut rx) = mpsc::unbounded_channel::<PathBuf>();

    let mut watchers = Vec::with_capacity(paths.len());
    for path in paths {
        watchers.push(watch_file(&path, tx.clone())?);
    }

    let task = tokio::spawn(async move {
        while let Some(changed) = rx.recv().await {
            debug!(path = %changed.display(), "change detected, re-running pipeline");
            let reload = Arc::clone(&reload);
            // spawn_blocking for the file I/O; awaiting it here is what
            // serializes re-runs for this source.
            match tokio::task::spawn_blocking(move || reload()).await {
                Ok(Ok(count)) => {
                    debug!(path = %changed.display(), count, "reload delivered entries");
                }
                Ok(Err(error)) => {
                    warn!(path = %changed.display(), %error, "reload failed, keeping previous entries");
                }
                Err(error) => {
                    warn!(path = %changed.display(), %error, "reload task failed");
                }
            }
        }
    });

    Ok(WatchHandle {
        task,
        _watchers: watchers,
    })
}

/// Watch one file by watching its directory, filtered to the file's name.
fn watch_file(
    path: &Path,
    tx: mpsc::UnboundedSender<PathBuf>,
) -> Result<RecommendedWatcher, YamletError> {
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or_else(|| Path::new("."));
    let file_name = path.file_name().map(|n| n.to_os_string());
    let notify_path = path.to_path_buf();

    let mut watcher = notify::recommended_watcher(move |result: notify::Result<notify::Event>| {
        let Ok(event) = result else { return };
        if !matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
            return;
        }
        let matches_file = event
            .paths
            .iter()
            .any(|p| p.file_name().map(|n| n.to_os_string()) == file_name);
        if matches_file {
            // The dispatcher may already be gone during shutdown.
            let _ = tx.send(notify_path.clone());
        }
    })
    .map_err(|e| YamletError::Watch {
        path: path.to_path_buf(),
        source: e,
    })?;

    watcher.watch(dir, RecursiveMode::NonRecursive).map_err(|e| YamletError::Watch {
        path: dir.to_path_buf(),
        source: e,
    })?;

    Ok(watcher)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MemorySink;
    use std::fs;
    use std::time::Duration;
    use tempfile::TempDir;

    async fn wait_for(sink: &MemorySink, key: &str, expected: &str) -> bool {
        for _ in 0..100 {
            if sink.get(key) == Some(Some(expected.to_string())) {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        false
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn yaml_file_watch_picks_up_changes() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("settings.yaml");
        fs::write(&file, "key: before").unwrap();

        let sink = Arc::new(MemorySink::new());
        pipeline::load_yaml_file(&file, false, sink.as_ref()).unwrap();
        let handle = watch_yaml_file(&file, false, sink.clone() as Arc<dyn ConfigSink>).unwrap();

        fs::write(&file, "key: after").unwrap();
        assert!(wait_for(&sink, "key", "after").await, "change was not picked up");

        handle.stop();
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn stopped_watch_ignores_changes() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("settings.yaml");
        fs::write(&file, "key: before").unwrap();

        let sink = Arc::new(MemorySink::new());
        pipeline::load_yaml_file(&file, false, sink.as_ref()).unwrap();
        let handle = watch_yaml_file(&file, false, sink.clone() as Arc<dyn ConfigSink>).unwrap();
        handle.stop();

        fs::write(&file, "key: after").unwrap();
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(sink.get("key"), Some(Some("before".to_string())));
    }
}
