//! The `render` subcommand.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;

use crate::builder::ConfigBuilder;
use crate::constants::DEFAULT_VALUES_FILE;
use crate::pipeline::Binding;
use crate::sink::{ConfigSink, MemorySink};

/// Render a template binding and print the resulting flat entries.
#[derive(Args)]
pub struct RenderCommand {
    /// Path to the template file.
    template: PathBuf,

    /// Path to the values file.
    #[arg(long, default_value = DEFAULT_VALUES_FILE)]
    values: PathBuf,

    /// Skip silently when the template or values file is missing.
    #[arg(long)]
    optional: bool,

    /// Do not persist the rendered output next to the template.
    #[arg(long)]
    no_persist: bool,

    /// Keep running and re-render when either file changes.
    #[arg(long)]
    watch: bool,
}

impl RenderCommand {
    /// Execute the command.
    pub async fn execute(self) -> Result<()> {
        let binding = Binding::new(&self.template)
            .with_values_path(&self.values)
            .optional(self.optional)
            .persist(!self.no_persist)
            .reload_on_change(self.watch);

        let sink = Arc::new(MemorySink::new());
        let handles = ConfigBuilder::new()
            .add_template(binding)
            .load(sink.clone() as Arc<dyn ConfigSink>)
            .with_context(|| {
                format!("failed to load template binding for {}", self.template.display())
            })?;

        super::print_entries(&sink.entries());

        if self.watch {
            eprintln!("watching for changes, press ctrl-c to stop");
            tokio::signal::ctrl_c().await.context("failed to wait for ctrl-c")?;
            for handle in handles {
                handle.stop();
            }
        }

        Ok(())
    }
}
