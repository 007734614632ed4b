//! The render pipeline: load, render, flatten, persist, deliver.
//!
//! One invocation of [`load_binding`] runs the full sequence for a template
//! binding:
//!
//! 1. check that the template and values files exist (an `optional` binding
//!    skips silently when either is missing)
//! 2. read both files and parse the values text into a tree
//! 3. render the template against the values tree
//! 4. parse the rendered text as YAML
//! 5. flatten the document's root mapping
//! 6. optionally persist the rendered text next to the template
//! 7. deliver the flat entries to the sink as one ordered batch
//!
//! There is no incremental diffing: a reload repeats the whole sequence.
//! The module also carries the two plain sources recovered alongside the
//! template pipeline: single YAML files ([`load_yaml_file`]) and directories
//! of YAML files ([`load_yaml_directory`]), which share the flattening and
//! delivery tail of the sequence.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_yaml::Value;
use tracing::{debug, warn};

use crate::constants::{DEFAULT_VALUES_FILE, RENDERED_FILE_PREFIX, TEMPLATE_SUFFIX};
use crate::error::YamletError;
use crate::sink::ConfigSink;
use crate::templating::TemplateRenderer;
use crate::tree::flatten::flatten;
use crate::tree::untag;

/// A registered template/values pairing and its policy flags.
///
/// This is the configuration surface of the pipeline; the overlapping
/// loading variants all reduce to flag combinations on this one type.
#[derive(Debug, Clone)]
pub struct Binding {
    /// Path to the template file.
    pub template_path: PathBuf,
    /// Path to the values file. Defaults to `values.yaml`.
    pub values_path: PathBuf,
    /// Skip silently when the template or values file is missing.
    pub optional: bool,
    /// Re-run the pipeline when either file changes on disk.
    pub reload_on_change: bool,
    /// Persist the rendered text next to the template.
    pub persist: bool,
}

impl Binding {
    /// Create a binding for a template with default flags: required, no
    /// reload, persisted, values from `values.yaml`.
    pub fn new(template_path: impl Into<PathBuf>) -> Self {
        Self {
            template_path: template_path.into(),
            values_path: PathBuf::from(DEFAULT_VALUES_FILE),
            optional: false,
            reload_on_change: false,
            persist: true,
        }
    }

    /// Use a specific values file.
    #[must_use]
    pub fn with_values_path(mut self, values_path: impl Into<PathBuf>) -> Self {
        self.values_path = values_path.into();
        self
    }

    /// Set whether missing files skip silently.
    #[must_use]
    pub fn optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }

    /// Set whether file changes trigger re-renders.
    #[must_use]
    pub fn reload_on_change(mut self, reload: bool) -> Self {
        self.reload_on_change = reload;
        self
    }

    /// Set whether the rendered text is persisted.
    #[must_use]
    pub fn persist(mut self, persist: bool) -> Self {
        self.persist = persist;
        self
    }
}

/// Run the full pipeline for one binding, delivering into `sink`.
///
/// Returns the number of entries delivered; `0` means an optional binding
/// was skipped because a file was missing.
///
/// # Errors
///
/// Any step's failure aborts the run: [`YamletError::FileNotFound`] for a
/// missing required file, [`YamletError::ValuesParse`] /
/// [`YamletError::RenderedParse`] for malformed YAML before/after rendering,
/// [`YamletError::Template`] for engine failures, and
/// [`YamletError::NonMappingRoot`] when either document's root is not a
/// mapping. A persistence failure is logged and does not abort.
pub fn load_binding(binding: &Binding, sink: &dyn ConfigSink) -> Result<usize, YamletError> {
    for path in [&binding.template_path, &binding.values_path] {
        if !path.exists() {
            if binding.optional {
                debug!(path = %path.display(), "optional binding file missing, skipping");
                return Ok(0);
            }
            return Err(YamletError::FileNotFound {
                path: path.clone(),
            });
        }
    }

    let template_text = read_file(&binding.template_path)?;
    let values_text = read_file(&binding.values_path)?;

    let values: Value =
        serde_yaml::from_str(&values_text).map_err(|e| YamletError::ValuesParse {
            path: binding.values_path.clone(),
            source: e,
        })?;
    if !matches!(untag(&values), Value::Mapping(_)) {
        return Err(YamletError::NonMappingRoot {
            path: binding.values_path.clone(),
        });
    }
    let values = Arc::new(values);

    let renderer = TemplateRenderer::new(Arc::clone(&values));
    let rendered = renderer.render(&template_text, &binding.template_path)?;

    let document: Value =
        serde_yaml::from_str(&rendered).map_err(|e| YamletError::RenderedParse {
            path: binding.template_path.clone(),
            source: e,
        })?;
    let Value::Mapping(root) = untag(&document) else {
        return Err(YamletError::NonMappingRoot {
            path: binding.template_path.clone(),
        });
    };

    let entries = flatten(root);

    if binding.persist {
        persist_rendered(&binding.template_path, &rendered);
    }

    let count = entries.len();
    sink.insert_batch(entries);
    debug!(
        template = %binding.template_path.display(),
        count, "delivered flattened entries"
    );
    Ok(count)
}

/// Load a single plain (non-templated) YAML file into `sink`.
///
/// Same optionality rule as [`load_binding`]; returns the delivered entry
/// count.
pub fn load_yaml_file(
    path: &Path,
    optional: bool,
    sink: &dyn ConfigSink,
) -> Result<usize, YamletError> {
    if !path.exists() {
        if optional {
            debug!(path = %path.display(), "optional yaml file missing, skipping");
            return Ok(0);
        }
        return Err(YamletError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let text = read_file(path)?;
    let document: Value = serde_yaml::from_str(&text).map_err(|e| YamletError::ValuesParse {
        path: path.to_path_buf(),
        source: e,
    })?;
    let Value::Mapping(root) = untag(&document) else {
        return Err(YamletError::NonMappingRoot {
            path: path.to_path_buf(),
        });
    };

    let entries = flatten(root);
    let count = entries.len();
    sink.insert_batch(entries);
    debug!(path = %path.display(), count, "delivered flattened entries");
    Ok(count)
}

/// Load every top-level `*.yml`/`*.yaml` file of a directory into `sink`,
/// sorted by file name.
///
/// A missing directory is skipped when `optional`, otherwise it is
/// [`YamletError::DirectoryNotFound`]; a present directory without any YAML
/// files fails a required load with [`YamletError::EmptyDirectory`].
pub fn load_yaml_directory(
    dir: &Path,
    optional: bool,
    sink: &dyn ConfigSink,
) -> Result<usize, YamletError> {
    if !dir.is_dir() {
        if optional {
            debug!(dir = %dir.display(), "optional yaml directory missing, skipping");
            return Ok(0);
        }
        return Err(YamletError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let files = yaml_files_in(dir);
    if files.is_empty() && !optional {
        return Err(YamletError::EmptyDirectory {
            path: dir.to_path_buf(),
        });
    }

    let mut total = 0;
    for file in &files {
        total += load_yaml_file(file, optional, sink)?;
    }
    Ok(total)
}

/// Enumerate the top-level YAML files of a directory, sorted by file name.
pub(crate) fn yaml_files_in(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(dir)
        .max_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(walkdir::DirEntry::into_path)
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("yml") || ext.eq_ignore_ascii_case("yaml"))
        })
        .collect();
    files.sort_by_key(|path| path.file_name().map(|name| name.to_os_string()));
    files
}

/// Derive the persisted output path for a template.
///
/// The template suffix is stripped case-insensitively and the base name gets
/// the hidden-file prefix, in the template's own directory:
/// `conf/app.yaml.tmpl` becomes `conf/.app.yaml`.
pub fn output_path(template_path: &Path) -> PathBuf {
    let file_name = template_path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
    let trimmed = if file_name.to_ascii_lowercase().ends_with(TEMPLATE_SUFFIX) {
        &file_name[..file_name.len() - TEMPLATE_SUFFIX.len()]
    } else {
        file_name
    };
    let hidden = format!("{RENDERED_FILE_PREFIX}{trimmed}");
    template_path.parent().unwrap_or_else(|| Path::new("")).join(hidden)
}

/// Write the rendered text next to the template, overwriting prior content.
///
/// Best-effort side artifact: a write failure is logged and the already
/// computed entries still get delivered.
fn persist_rendered(template_path: &Path, rendered: &str) {
    let path = output_path(template_path);
    match fs::write(&path, rendered) {
        Ok(()) => debug!(path = %path.display(), "persisted rendered output"),
        Err(error) => {
            warn!(path = %path.display(), %error, "failed to persist rendered output");
        }
    }
}

fn read_file(path: &Path) -> Result<String, YamletError> {
    fs::read_to_string(path).map_err(|e| YamletError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}
