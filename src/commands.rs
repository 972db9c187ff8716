// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command implementations for the shakesearch binary

use anyhow::{Context, Result};
use colored::Colorize;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use shakesearch::config::Config;
use shakesearch::corpus::Corpus;
use shakesearch::dispatch::{Dispatched, Dispatcher};
use shakesearch::errors::suggestions;
use shakesearch::matcher::{self, Strategy};
use shakesearch::server;

use crate::cli::OutputFormat;

fn load_corpus(config: &Config, cli_path: Option<PathBuf>) -> Result<Arc<Corpus>> {
    let path = config.merge_corpus_path(cli_path);
    let started = Instant::now();
    let corpus = Corpus::load(&path)?;
    tracing::info!(
        path = %path.display(),
        bytes = corpus.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "corpus loaded"
    );
    Ok(Arc::new(corpus))
}

/// Build every configured index, then serve HTTP until Ctrl-C.
pub async fn serve(corpus: Option<PathBuf>, addr: Option<SocketAddr>) -> Result<()> {
    let config = Config::load();
    let corpus = load_corpus(&config, corpus)?;

    tracing::info!(strategies = config.search.strategies.len(), "building indexes");
    let search_config = config.search.clone();
    let dispatcher = tokio::task::spawn_blocking(move || Dispatcher::build(&corpus, &search_config))
        .await?
        .context("Failed to build search indexes")?;

    let env_port = std::env::var("PORT").ok();
    let addr = config.listen_addr(addr, env_port.as_deref());
    server::serve(addr, Arc::new(dispatcher)).await
}

/// Answer one query, racing all strategies or running just one.
pub async fn search(
    query: &str,
    corpus: Option<PathBuf>,
    strategy: Option<Strategy>,
    format: OutputFormat,
    compact: bool,
) -> Result<()> {
    if query.is_empty() {
        anyhow::bail!(suggestions::empty_query_suggestion());
    }

    let config = Config::load();
    let corpus = load_corpus(&config, corpus)?;

    let outcome = match strategy {
        Some(strategy) => {
            let search_config = config.search.clone();
            let query = query.to_string();
            tokio::task::spawn_blocking(move || -> Result<Dispatched> {
                let matcher = matcher::build(strategy, &corpus, &search_config)
                    .with_context(|| format!("Failed to build {strategy} index"))?;
                let results = matcher.search(&query);
                Ok(Dispatched {
                    strategy: (!results.is_empty()).then_some(strategy),
                    results,
                    completed: 1,
                    timed_out: false,
                })
            })
            .await??
        }
        None => {
            let search_config = config.search.clone();
            let dispatcher =
                tokio::task::spawn_blocking(move || Dispatcher::build(&corpus, &search_config))
                    .await?
                    .context("Failed to build search indexes")?;
            dispatcher.dispatch(query).await
        }
    };

    match format {
        OutputFormat::Json => print_json(&outcome, compact)?,
        OutputFormat::Text => print_text(query, &outcome),
    }
    Ok(())
}

fn print_json(outcome: &Dispatched, compact: bool) -> Result<()> {
    let json = if compact {
        serde_json::to_string(outcome)?
    } else {
        serde_json::to_string_pretty(outcome)?
    };
    println!("{json}");
    Ok(())
}

fn print_text(query: &str, outcome: &Dispatched) {
    let Some(strategy) = outcome.strategy else {
        if outcome.timed_out {
            println!("{} Search timed out for '{}'", "✗".red(), query);
        } else {
            println!("{} No results found for '{}'", "✗".red(), query);
        }
        return;
    };

    let noun = if outcome.results.len() == 1 { "result" } else { "results" };
    println!(
        "{} {} {} via {}\n",
        "✓".green(),
        outcome.results.len(),
        noun,
        strategy.as_str().cyan().bold()
    );
    for result in &outcome.results {
        println!("{result}");
    }
}

/// Print shell completions to stdout.
pub fn completions(shell: clap_complete::Shell) {
    use clap::CommandFactory;

    let mut command = crate::cli::Cli::command();
    let name = command.get_name().to_string();
    clap_complete::generate(shell, &mut command, name, &mut std::io::stdout());
}
