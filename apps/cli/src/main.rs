//! agentsync CLI — keep a managed agent's knowledge base index in sync.
//!
//! Resolves an agent by name against the control plane and triggers one
//! asynchronous ingestion job per data source of its knowledge base.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
