//! yamlet CLI entry point.

use anyhow::Result;
use clap::Parser;
use yamlet::cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute().await
}
