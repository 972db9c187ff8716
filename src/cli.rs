// SPDX-License-Identifier: MIT OR Apache-2.0

//! CLI argument parsing using clap

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::net::SocketAddr;
use std::path::PathBuf;

use shakesearch::matcher::Strategy;

/// shakesearch - Multi-strategy search over a fixed literary corpus
///
/// Builds exact, case-insensitive, linguistic, fuzzy, and relevance indexes
/// once, then races them for every query and keeps the first answer.
#[derive(Parser, Debug)]
#[command(name = "shakesearch")]
#[command(
    author,
    version,
    about,
    long_about = None,
    after_help = "Quickstart:\n  shakesearch serve --corpus completeworks.txt\n  shakesearch search \"to be or not to be\" --corpus completeworks.txt"
)]
pub struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Compact JSON output (no pretty formatting)
    #[arg(long, global = true)]
    pub compact: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for results
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the indexes and serve the HTTP search endpoint
    #[command(after_help = "Examples:\n  shakesearch serve\n  PORT=8080 shakesearch serve -c plays.txt")]
    Serve {
        /// Corpus text file (defaults to config, then completeworks.txt)
        #[arg(short, long)]
        corpus: Option<PathBuf>,

        /// Listen address (defaults to 0.0.0.0:$PORT, then config, then 3001)
        #[arg(short, long)]
        addr: Option<SocketAddr>,
    },

    /// Run one query and print the answer
    #[command(
        visible_aliases = ["s"],
        after_help = "Examples:\n  shakesearch s \"to be or not to be\"\n  shakesearch search hamlett --strategy fuzzy\n  shakesearch --format json search \"ophelia\""
    )]
    Search {
        /// Search query
        query: String,

        /// Corpus text file (defaults to config, then completeworks.txt)
        #[arg(short, long)]
        corpus: Option<PathBuf>,

        /// Run only this strategy instead of racing all of them
        #[arg(short, long, value_enum)]
        strategy: Option<Strategy>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
