//! Shared constants for separators, file naming, and defaults.

/// Separator between key path segments in flattened configuration keys.
///
/// This matches the hierarchical convention of the configuration sink
/// (`parent:child:0:leaf`).
pub const KEY_SEPARATOR: char = ':';

/// File name suffix that marks a template file (`app.yaml.tmpl`).
///
/// Stripped case-insensitively when deriving the persisted output name.
pub const TEMPLATE_SUFFIX: &str = ".tmpl";

/// Prefix for persisted rendered files, hiding them from directory listings.
pub const RENDERED_FILE_PREFIX: &str = ".";

/// Default values file name used when a binding does not name one.
pub const DEFAULT_VALUES_FILE: &str = "values.yaml";

/// Default lookup path for `connection_string` when no `path` argument is given.
pub const DEFAULT_CONNECTION_PATH: &str = "global.database.postgres01";

/// Default port used by `connection_string` when the resolved node has no `port`.
pub const DEFAULT_POSTGRES_PORT: &str = "5432";
