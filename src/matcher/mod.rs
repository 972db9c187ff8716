// SPDX-License-Identifier: MIT OR Apache-2.0

//! Matcher module - the five search strategies and their shared contract
//!
//! Every strategy builds its own read-only index from the corpus once at
//! startup and then answers `search(query)` with an ordered list of strings.

pub mod exact;
pub mod fuzzy;
pub mod ignore_case;
pub mod linguistic;
pub mod relevance;
pub mod suffix_array;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use crate::config::SearchConfig;
use crate::corpus::Corpus;
use crate::errors::{BuildError, SearchError};

pub use exact::ExactMatcher;
pub use fuzzy::FuzzyMatcher;
pub use ignore_case::{IgnoreCaseMatcher, PatternSyntax};
pub use linguistic::LinguisticMatcher;
pub use relevance::RelevanceMatcher;

/// Names of the search strategies
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Byte-exact substring, full lines
    Exact,
    /// Case-insensitive pattern, context windows
    IgnoreCase,
    /// Case- and diacritic-insensitive substring
    Linguistic,
    /// Ordered-subsequence fuzzy match, full lines
    Fuzzy,
    /// Fuzzy term relevance ranking, full lines
    Relevance,
}

impl Strategy {
    pub const ALL: [Strategy; 5] = [
        Strategy::Exact,
        Strategy::IgnoreCase,
        Strategy::Linguistic,
        Strategy::Fuzzy,
        Strategy::Relevance,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::Exact => "exact",
            Strategy::IgnoreCase => "ignore-case",
            Strategy::Linguistic => "linguistic",
            Strategy::Fuzzy => "fuzzy",
            Strategy::Relevance => "relevance",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One search strategy over a shared corpus
pub trait Matcher: Send + Sync {
    fn strategy(&self) -> Strategy;

    fn corpus(&self) -> &Corpus;

    /// Run the query against this strategy's index.
    fn find(&self, query: &str) -> Result<Vec<String>, SearchError>;

    /// Run the query, answering with no match instead of an error.
    ///
    /// This is the only place query errors are dropped. They are logged so a
    /// malformed query can be told apart from a query that matched nothing.
    fn search(&self, query: &str) -> Vec<String> {
        if query.is_empty() || query.len() > self.corpus().len() {
            return Vec::new();
        }
        match self.find(query) {
            Ok(results) => results,
            Err(err) => {
                tracing::warn!(
                    strategy = %self.strategy(),
                    error = %err,
                    "query rejected; answering with no match"
                );
                Vec::new()
            }
        }
    }
}

/// Build one matcher per configured strategy, in configuration order.
///
/// Builds run sequentially. A failed build aborts startup rather than
/// installing a matcher that cannot answer.
pub fn build_all(
    corpus: &Arc<Corpus>,
    config: &SearchConfig,
) -> Result<Vec<Arc<dyn Matcher>>, BuildError> {
    let mut seen = HashSet::new();
    let mut matchers: Vec<Arc<dyn Matcher>> = Vec::with_capacity(config.strategies.len());

    for &strategy in &config.strategies {
        if !seen.insert(strategy) {
            tracing::warn!(%strategy, "strategy listed twice; building it once");
            continue;
        }
        let started = Instant::now();
        matchers.push(build(strategy, corpus, config)?);
        tracing::info!(
            %strategy,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "index built"
        );
    }

    Ok(matchers)
}

/// Build a single strategy's matcher.
pub fn build(
    strategy: Strategy,
    corpus: &Arc<Corpus>,
    config: &SearchConfig,
) -> Result<Arc<dyn Matcher>, BuildError> {
    let corpus = Arc::clone(corpus);
    Ok(match strategy {
        Strategy::Exact => Arc::new(ExactMatcher::build(corpus)?),
        Strategy::IgnoreCase => Arc::new(IgnoreCaseMatcher::build(
            corpus,
            config.context_radius,
            config.pattern_syntax,
        )?),
        Strategy::Linguistic => Arc::new(LinguisticMatcher::build(corpus)?),
        Strategy::Fuzzy => Arc::new(FuzzyMatcher::build(corpus, config.fuzzy_min_score)?),
        Strategy::Relevance => Arc::new(RelevanceMatcher::build(corpus, config.relevance_limit)?),
    })
}
