//! Command-line interface for yamlet.
//!
//! Two subcommands cover the two kinds of sources:
//!
//! - `render` - run the template pipeline for one binding and print the
//!   flattened entries; `--watch` keeps the process alive re-rendering on
//!   file changes
//! - `flatten` - flatten a plain YAML file (or, with `--dir`, every YAML
//!   file of a directory) without any templating
//!
//! Entries are printed one per line as `key=value`; a null value prints as
//! an empty right-hand side.

mod flatten;
mod render;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

pub use flatten::FlattenCommand;
pub use render::RenderCommand;

/// Top-level CLI parser.
#[derive(Parser)]
#[command(
    name = "yamlet",
    about = "Render templated YAML configuration into flat key/value settings",
    version
)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    command: Commands,

    /// Enable debug output. Equivalent to `RUST_LOG=debug`.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    quiet: bool,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Render a YAML template against a values file and print flat entries.
    Render(RenderCommand),
    /// Flatten plain YAML files and print flat entries.
    Flatten(FlattenCommand),
}

impl Cli {
    /// Execute the selected subcommand.
    pub async fn execute(self) -> Result<()> {
        init_tracing(self.verbose, self.quiet);

        match self.command {
            Commands::Render(cmd) => cmd.execute().await,
            Commands::Flatten(cmd) => cmd.execute(),
        }
    }
}

/// Initialize the tracing subscriber, honoring `RUST_LOG` when set.
fn init_tracing(verbose: bool, quiet: bool) {
    let default = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).with_target(false).try_init();
}

/// Print flattened entries as `key=value` lines.
pub(crate) fn print_entries(entries: &[crate::FlatEntry]) {
    for entry in entries {
        println!("{}={}", entry.key, entry.value.as_deref().unwrap_or(""));
    }
}
