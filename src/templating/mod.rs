//! Template rendering for YAML configuration templates.
//!
//! Templates are YAML documents with embedded Tera expressions. A render pass
//! sees two things:
//!
//! - the top-level entries of the values file as plain variables
//!   (`{{ global.database.postgres01.host }}`)
//! - the registered helpers: the `to_yaml` and `indent` filters and the
//!   `connection_string` function
//!
//! The render context is rebuilt for every pass from the values tree's
//! current content, so nothing leaks between reloads. A template that
//! references a values key which does not exist fails the render with the
//! engine's missing-variable diagnostic; it never silently renders as empty
//! text.

pub mod filters;
pub mod functions;
mod renderer;

pub use renderer::TemplateRenderer;
