// SPDX-License-Identifier: MIT OR Apache-2.0

//! Race dispatcher - run every matcher at once, keep the first non-empty answer
//!
//! Each strategy runs on tokio's blocking pool and reports into one channel.
//! Answers are consumed in completion order. When two strategies finish at
//! the same moment, which one wins is up to the channel and is not
//! deterministic. Losing tasks are never cancelled: they finish on their own
//! and their answers are dropped.

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;

use crate::config::SearchConfig;
use crate::corpus::Corpus;
use crate::errors::BuildError;
use crate::matcher::{self, Matcher, Strategy};

/// Outcome of one race
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Dispatched {
    /// Strategy whose answer was kept; `None` when nothing matched
    pub strategy: Option<Strategy>,
    /// The kept answer, or empty
    pub results: Vec<String>,
    /// Strategies that had answered when the race was decided
    #[serde(skip)]
    pub completed: usize,
    /// The deadline passed before a non-empty answer arrived
    #[serde(skip)]
    pub timed_out: bool,
}

/// Owns the strategy set and races it per query
#[derive(Clone)]
pub struct Dispatcher {
    matchers: Vec<Arc<dyn Matcher>>,
    deadline: Option<Duration>,
}

impl Dispatcher {
    pub fn new(matchers: Vec<Arc<dyn Matcher>>) -> Self {
        Self {
            matchers,
            deadline: None,
        }
    }

    /// Build every configured strategy over `corpus`.
    pub fn build(corpus: &Arc<Corpus>, config: &SearchConfig) -> Result<Self, BuildError> {
        let matchers = matcher::build_all(corpus, config)?;
        Ok(Self::new(matchers).with_deadline(config.request_timeout()))
    }

    /// Stop waiting for answers after `deadline`; `None` waits for all.
    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn strategies(&self) -> Vec<Strategy> {
        self.matchers.iter().map(|m| m.strategy()).collect()
    }

    pub async fn dispatch(&self, query: &str) -> Dispatched {
        race(&self.matchers, query, self.deadline).await
    }
}

/// Run `query` through every matcher concurrently and return the first
/// non-empty answer, or an empty one once all have answered empty.
pub async fn race(
    matchers: &[Arc<dyn Matcher>],
    query: &str,
    deadline: Option<Duration>,
) -> Dispatched {
    let started = Instant::now();
    let (tx, mut rx) = mpsc::channel(matchers.len().max(1));

    for matcher in matchers {
        let matcher = Arc::clone(matcher);
        let query = query.to_string();
        let tx = tx.clone();
        tokio::task::spawn_blocking(move || {
            let task_started = std::time::Instant::now();
            let results = matcher.search(&query);
            tracing::debug!(
                strategy = %matcher.strategy(),
                hits = results.len(),
                elapsed_ms = task_started.elapsed().as_millis() as u64,
                "strategy answered"
            );
            // the receiver is gone once another strategy has won
            let _ = tx.try_send((matcher.strategy(), results));
        });
    }
    drop(tx);

    let deadline_at = deadline.map(|d| started + d);
    let mut completed = 0;
    loop {
        let next = match deadline_at {
            Some(at) => match tokio::time::timeout_at(at, rx.recv()).await {
                Ok(next) => next,
                Err(_) => {
                    tracing::warn!(
                        query,
                        completed,
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "search deadline passed; answering with no match"
                    );
                    return Dispatched {
                        completed,
                        timed_out: true,
                        ..Dispatched::default()
                    };
                }
            },
            None => rx.recv().await,
        };

        match next {
            Some((strategy, results)) => {
                completed += 1;
                if results.is_empty() {
                    continue;
                }
                tracing::debug!(
                    %strategy,
                    hits = results.len(),
                    completed,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "race won"
                );
                return Dispatched {
                    strategy: Some(strategy),
                    results,
                    completed,
                    timed_out: false,
                };
            }
            None => {
                tracing::debug!(query, completed, "no strategy matched");
                return Dispatched {
                    completed,
                    ..Dispatched::default()
                };
            }
        }
    }
}
