//! shakesearch - Multi-strategy corpus search server
//!
//! Builds five independent in-memory indexes over one text and races them
//! for every query, answering with the first non-empty result.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let format = cli.format;

    match cli.command {
        Commands::Serve { corpus, addr } => {
            commands::serve(corpus, addr).await?;
        }
        Commands::Search {
            query,
            corpus,
            strategy,
        } => {
            commands::search(&query, corpus, strategy, format, cli.compact).await?;
        }
        Commands::Completions { shell } => {
            commands::completions(shell);
        }
    }

    Ok(())
}
