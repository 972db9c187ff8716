// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration file support for shakesearch
//!
//! Loads configuration from .shakesearch.toml in current directory or
//! ~/.config/shakesearch/config.toml

use serde::Deserialize;
use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::matcher::ignore_case::DEFAULT_CONTEXT_RADIUS;
use crate::matcher::relevance::DEFAULT_RELEVANCE_LIMIT;
use crate::matcher::{PatternSyntax, Strategy};

/// Port used when neither the CLI, `PORT`, nor the config file set one
pub const DEFAULT_PORT: u16 = 3001;

/// Corpus file used when neither the CLI nor the config file name one
pub const DEFAULT_CORPUS_PATH: &str = "completeworks.txt";

/// Per-request deadline used when the config file does not set one
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;

/// Configuration loaded from .shakesearch.toml or ~/.config/shakesearch/config.toml
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Text file to search
    pub corpus_path: Option<PathBuf>,
    /// Port to listen on
    pub port: Option<u16>,
    /// Search engine tuning
    pub search: SearchConfig,
}

/// Knobs for the matchers and the dispatcher
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Strategies to build and race, in build order
    pub strategies: Vec<Strategy>,
    /// Bytes of context on each side of a case-insensitive hit
    pub context_radius: usize,
    /// Whether case-insensitive queries are literals or regexes
    pub pattern_syntax: PatternSyntax,
    /// Minimum fuzzy alignment score for a line to qualify
    pub fuzzy_min_score: u16,
    /// Ranked lines returned by the relevance matcher
    pub relevance_limit: usize,
    /// Per-request deadline in milliseconds; 0 waits indefinitely
    pub request_timeout_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            strategies: Strategy::ALL.to_vec(),
            context_radius: DEFAULT_CONTEXT_RADIUS,
            pattern_syntax: PatternSyntax::default(),
            fuzzy_min_score: 0,
            relevance_limit: DEFAULT_RELEVANCE_LIMIT,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
        }
    }
}

impl SearchConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_ms > 0).then(|| Duration::from_millis(self.request_timeout_ms))
    }
}

impl Config {
    /// Load configuration from files
    ///
    /// Precedence (highest to lowest):
    /// 1. .shakesearch.toml in current directory
    /// 2. ~/.config/shakesearch/config.toml
    pub fn load() -> Self {
        if let Some(config) = Self::load_from_path(Path::new(".shakesearch.toml")) {
            return config;
        }

        if let Some(home) = dirs::home_dir() {
            let config_path = home.join(".config").join("shakesearch").join("config.toml");
            if let Some(config) = Self::load_from_path(&config_path) {
                return config;
            }
        }

        Self::default()
    }

    pub fn load_from_path(path: &Path) -> Option<Self> {
        let content = std::fs::read_to_string(path).ok()?;
        match toml::from_str(&content) {
            Ok(config) => {
                tracing::debug!(path = %path.display(), "loaded config");
                Some(config)
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to parse config");
                None
            }
        }
    }

    /// Merge CLI corpus path with config (CLI wins)
    pub fn merge_corpus_path(&self, cli_value: Option<PathBuf>) -> PathBuf {
        cli_value
            .or_else(|| self.corpus_path.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CORPUS_PATH))
    }

    /// Resolve the listen address.
    ///
    /// Precedence: CLI address, then the `PORT` environment value, then the
    /// configured port, then [`DEFAULT_PORT`]. Ports bind on all interfaces.
    pub fn listen_addr(&self, cli_value: Option<SocketAddr>, env_port: Option<&str>) -> SocketAddr {
        if let Some(addr) = cli_value {
            return addr;
        }
        let env_port = env_port.filter(|p| !p.is_empty()).and_then(|p| {
            let parsed = p.parse::<u16>().ok();
            if parsed.is_none() {
                tracing::warn!(port = p, "ignoring unparsable PORT");
            }
            parsed
        });
        let port = env_port.or(self.port).unwrap_or(DEFAULT_PORT);
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, port))
    }
}
