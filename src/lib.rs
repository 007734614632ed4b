//! yamlet - templated YAML configuration, flattened.
//!
//! yamlet renders a YAML template (with embedded Tera expressions) against a
//! separate YAML values file, then flattens the rendered document into an
//! ordered flat mapping of `:`-separated key paths to string values, ready
//! for a hierarchical configuration store:
//!
//! ```text
//! template + values  ->  render  ->  parse  ->  flatten  ->  sink
//! ```
//!
//! Templates see the values file's top-level entries as variables, plus
//! three helpers: the `to_yaml` and `indent` filters for re-emitting
//! sub-trees inline, and the `connection_string` function for building
//! database connection strings from the values tree.
//!
//! # Core Modules
//!
//! - [`tree`] - dynamic tree traversal: dotted-path resolution and
//!   flattening into ordered entries
//! - [`templating`] - the Tera-backed renderer and its registered helpers
//! - [`pipeline`] - the load-render-flatten-deliver sequence and the plain
//!   file/directory sources
//! - [`builder`] - source registration and fail-fast ordered loading
//! - [`watcher`] - per-source reload watching with serialized re-renders
//! - [`sink`] - the delivery-side abstraction and the in-memory store
//! - [`cli`] - the `yamlet` binary's `render` and `flatten` subcommands
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use yamlet::{Binding, ConfigBuilder, ConfigSink, MemorySink};
//!
//! # fn main() -> Result<(), yamlet::YamletError> {
//! let sink = Arc::new(MemorySink::new());
//! ConfigBuilder::new()
//!     .add_template(
//!         Binding::new("conf/app.yaml.tmpl").with_values_path("conf/values.yaml"),
//!     )
//!     .load(sink.clone() as Arc<dyn ConfigSink>)?;
//!
//! for entry in sink.entries() {
//!     println!("{} = {:?}", entry.key, entry.value);
//! }
//! # Ok(()) }
//! ```

pub mod builder;
pub mod cli;
pub mod constants;
pub mod error;
pub mod pipeline;
pub mod sink;
pub mod templating;
pub mod tree;
pub mod watcher;

pub use builder::ConfigBuilder;
pub use error::YamletError;
pub use pipeline::Binding;
pub use sink::{ConfigSink, MemorySink};
pub use tree::flatten::FlatEntry;
pub use watcher::WatchHandle;
