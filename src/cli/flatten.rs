//! The `flatten` subcommand.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;

use crate::builder::ConfigBuilder;
use crate::sink::{ConfigSink, MemorySink};

/// Flatten plain YAML into flat entries, without templating.
#[derive(Args)]
pub struct FlattenCommand {
    /// YAML file, or a directory when `--dir` is set.
    path: PathBuf,

    /// Treat the path as a directory of YAML files.
    #[arg(long)]
    dir: bool,

    /// Skip silently when the path is missing.
    #[arg(long)]
    optional: bool,
}

impl FlattenCommand {
    /// Execute the command.
    pub fn execute(self) -> Result<()> {
        let builder = if self.dir {
            ConfigBuilder::new().add_yaml_directory(&self.path, self.optional, false)
        } else {
            ConfigBuilder::new().add_yaml_file(&self.path, self.optional, false)
        };

        let sink = Arc::new(MemorySink::new());
        builder
            .load(sink.clone() as Arc<dyn ConfigSink>)
            .with_context(|| format!("failed to flatten {}", self.path.display()))?;

        super::print_entries(&sink.entries());
        Ok(())
    }
}
