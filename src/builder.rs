//! Source registration and orderly loading.
//!
//! [`ConfigBuilder`] accumulates configuration sources (template bindings,
//! plain YAML files, YAML directories) and loads them into a sink in
//! registration order. Every initial load runs synchronously in the caller's
//! thread and completes, success or failure, before the next source is
//! considered; a failure aborts the whole load, which is the fail-fast
//! startup behavior callers want for required configuration.
//!
//! Sources flagged `reload_on_change` additionally get a
//! [`WatchHandle`](crate::watcher::WatchHandle) after their initial load.
//! Spawning handles requires an ambient Tokio runtime.

use std::path::PathBuf;
use std::sync::Arc;

use crate::error::YamletError;
use crate::pipeline::{self, Binding};
use crate::sink::ConfigSink;
use crate::watcher::{self, WatchHandle};

/// One registered configuration source.
#[derive(Debug, Clone)]
enum Source {
    Template(Binding),
    File {
        path: PathBuf,
        optional: bool,
        reload_on_change: bool,
    },
    Directory {
        path: PathBuf,
        optional: bool,
        reload_on_change: bool,
    },
}

/// Accumulates configuration sources and loads them in order.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use yamlet::{Binding, ConfigBuilder, ConfigSink, MemorySink};
///
/// # #[tokio::main] async fn main() -> Result<(), yamlet::YamletError> {
/// let sink = Arc::new(MemorySink::new());
/// let handles = ConfigBuilder::new()
///     .add_template(Binding::new("conf/app.yaml.tmpl").reload_on_change(true))
///     .add_yaml_file("conf/overrides.yaml", true, false)
///     .load(sink.clone() as Arc<dyn ConfigSink>)?;
/// # Ok(()) }
/// ```
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    sources: Vec<Source>,
}

impl ConfigBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a template binding.
    #[must_use]
    pub fn add_template(mut self, binding: Binding) -> Self {
        self.sources.push(Source::Template(binding));
        self
    }

    /// Register a plain YAML file.
    #[must_use]
    pub fn add_yaml_file(
        mut self,
        path: impl Into<PathBuf>,
        optional: bool,
        reload_on_change: bool,
    ) -> Self {
        self.sources.push(Source::File {
            path: path.into(),
            optional,
            reload_on_change,
        });
        self
    }

    /// Register a directory of YAML files.
    ///
    /// The directory's top-level `*.yml`/`*.yaml` files are loaded sorted by
    /// file name; each inherits the `optional` and `reload_on_change` flags.
    #[must_use]
    pub fn add_yaml_directory(
        mut self,
        path: impl Into<PathBuf>,
        optional: bool,
        reload_on_change: bool,
    ) -> Self {
        self.sources.push(Source::Directory {
            path: path.into(),
            optional,
            reload_on_change,
        });
        self
    }

    /// Load every registered source into `sink`, in registration order.
    ///
    /// Returns the watch handles of reload-flagged sources; dropping a
    /// handle stops its reloads. Calling this with reload-flagged sources
    /// outside a Tokio runtime panics when the watch tasks are spawned.
    ///
    /// # Errors
    ///
    /// The first failing source aborts the load and its error is returned;
    /// entries delivered by earlier sources remain in the sink.
    pub fn load(self, sink: Arc<dyn ConfigSink>) -> Result<Vec<WatchHandle>, YamletError> {
        let mut handles = Vec::new();

        for source in self.sources {
            match source {
                Source::Template(binding) => {
                    pipeline::load_binding(&binding, sink.as_ref())?;
                    if binding.reload_on_change {
                        handles.push(watcher::watch_template(&binding, Arc::clone(&sink))?);
                    }
                }
                Source::File {
                    path,
                    optional,
                    reload_on_change,
                } => {
                    pipeline::load_yaml_file(&path, optional, sink.as_ref())?;
                    if reload_on_change {
                        handles.push(watcher::watch_yaml_file(&path, optional, Arc::clone(&sink))?);
                    }
                }
                Source::Directory {
                    path,
                    optional,
                    reload_on_change,
                } => {
                    pipeline::load_yaml_directory(&path, optional, sink.as_ref())?;
                    if reload_on_change {
                        for file in pipeline::yaml_files_in(&path) {
                            handles.push(watcher::watch_yaml_file(
                                &file,
                                optional,
                                Arc::clone(&sink),
                            )?);
                        }
                    }
                }
            }
        }

        Ok(handles)
    }
}
