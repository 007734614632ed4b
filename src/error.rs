//! Error handling for yamlet.
//!
//! All failure modes of the render-and-flatten pipeline are enumerated in
//! [`YamletError`]. The taxonomy distinguishes absent files (which an
//! `optional` binding is allowed to skip) from present-but-broken inputs,
//! which always propagate:
//!
//! - [`YamletError::FileNotFound`] / [`YamletError::DirectoryNotFound`] -
//!   a required input is missing entirely
//! - [`YamletError::ValuesParse`] / [`YamletError::RenderedParse`] -
//!   malformed YAML, before or after rendering
//! - [`YamletError::Template`] - template compilation or evaluation failed,
//!   including references to values keys that do not exist
//! - [`YamletError::MissingArgument`] / [`YamletError::PathNotFound`] /
//!   [`YamletError::MissingField`] - raised from within the
//!   `connection_string` template function
//!
//! [`YamletError::RenderedParse`] is deliberately separate from
//! [`YamletError::ValuesParse`]: it means the template rendered successfully
//! but produced text that is not valid YAML, which points at the template
//! rather than the values file.

use std::path::PathBuf;
use thiserror::Error;

/// The error type for all yamlet operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum YamletError {
    /// A required template or values file does not exist.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// The missing path.
        path: PathBuf,
    },

    /// A required YAML directory does not exist.
    #[error("yaml directory not found: {}", path.display())]
    DirectoryNotFound {
        /// The missing directory.
        path: PathBuf,
    },

    /// A required YAML directory contains no `*.yml` or `*.yaml` files.
    #[error("yaml directory is empty: {}", path.display())]
    EmptyDirectory {
        /// The empty directory.
        path: PathBuf,
    },

    /// The values file (or a plain YAML file) is not valid YAML.
    #[error("failed to parse yaml file: {}", path.display())]
    ValuesParse {
        /// The file that failed to parse.
        path: PathBuf,
        /// The underlying parser diagnostic.
        #[source]
        source: serde_yaml::Error,
    },

    /// The rendered template output is not valid YAML.
    ///
    /// The template itself rendered without error, so this points at the
    /// structure the template produced.
    #[error("rendered output of {} is not valid yaml", path.display())]
    RenderedParse {
        /// The template whose output failed to parse.
        path: PathBuf,
        /// The underlying parser diagnostic.
        #[source]
        source: serde_yaml::Error,
    },

    /// Template compilation or evaluation failed.
    ///
    /// Carries the engine's diagnostic, including missing-variable errors
    /// for values keys the template references but the values tree lacks.
    #[error("template rendering failed for {}: {}", path.display(), message)]
    Template {
        /// The template file.
        path: PathBuf,
        /// The cleaned-up engine diagnostic.
        message: String,
    },

    /// The document root is not a mapping.
    ///
    /// Both the values file and the rendered document must have a mapping at
    /// the top level.
    #[error("expected a mapping at the document root of {}", path.display())]
    NonMappingRoot {
        /// The offending document.
        path: PathBuf,
    },

    /// A required named argument was not passed to a template function.
    #[error("missing required argument '{name}'")]
    MissingArgument {
        /// The argument name.
        name: String,
    },

    /// A dotted lookup path did not resolve to any node in the values tree.
    #[error("no value found at path '{path}'")]
    PathNotFound {
        /// The dotted path that failed to resolve.
        path: String,
    },

    /// A resolved node lacks a required field.
    #[error("missing required field '{field}' at path '{path}'")]
    MissingField {
        /// The absent field name.
        field: String,
        /// The dotted path of the node that was inspected.
        path: String,
    },

    /// An I/O operation on one of the input files failed.
    #[error("io error on {}", path.display())]
    Io {
        /// The path being read or written.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Setting up a filesystem watch failed.
    #[error("failed to watch {}", path.display())]
    Watch {
        /// The path that could not be watched.
        path: PathBuf,
        /// The underlying notify error.
        #[source]
        source: notify::Error,
    },
}
