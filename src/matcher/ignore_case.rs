// SPDX-License-Identifier: MIT OR Apache-2.0

//! Case-insensitive pattern matching with context windows

use regex::RegexBuilder;
use serde::Deserialize;
use std::ops::Range;
use std::sync::Arc;

use super::suffix_array::SuffixArray;
use super::{Matcher, Strategy};
use crate::corpus::Corpus;
use crate::errors::{BuildError, SearchError};

/// Default number of bytes of context on each side of a hit
pub const DEFAULT_CONTEXT_RADIUS: usize = 250;

/// How the case-insensitive matcher interprets a query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternSyntax {
    /// Every character matches itself
    #[default]
    Literal,
    /// The query is a regular expression
    Regex,
}

/// Case-insensitive search returning a context window around every hit
#[derive(Debug)]
pub struct IgnoreCaseMatcher {
    corpus: Arc<Corpus>,
    /// ASCII-lowercased copy of the corpus; same length, same offsets
    folded: Vec<u8>,
    suffixes: SuffixArray,
    radius: usize,
    syntax: PatternSyntax,
}

impl IgnoreCaseMatcher {
    pub fn build(
        corpus: Arc<Corpus>,
        radius: usize,
        syntax: PatternSyntax,
    ) -> Result<Self, BuildError> {
        let folded = corpus.as_bytes().to_ascii_lowercase();
        let suffixes = SuffixArray::build(&folded)?;
        Ok(Self {
            corpus,
            folded,
            suffixes,
            radius,
            syntax,
        })
    }

    /// Non-overlapping hits of an ASCII literal, straight from the index.
    fn indexed_spans(&self, query: &str) -> Vec<Range<usize>> {
        let needle = query.to_ascii_lowercase();
        let mut next_free = 0;
        self.suffixes
            .lookup(&self.folded, needle.as_bytes())
            .into_iter()
            .filter_map(|start| {
                if start < next_free {
                    return None;
                }
                next_free = start + needle.len();
                Some(start..next_free)
            })
            .collect()
    }

    fn scanned_spans(&self, pattern: &str) -> Result<Vec<Range<usize>>, SearchError> {
        let re = RegexBuilder::new(pattern).case_insensitive(true).build()?;
        Ok(re
            .find_iter(self.corpus.text())
            // an empty match carries no text to show context around
            .filter(|m| !m.is_empty())
            .map(|m| m.range())
            .collect())
    }
}

impl Matcher for IgnoreCaseMatcher {
    fn strategy(&self) -> Strategy {
        Strategy::IgnoreCase
    }

    fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    fn find(&self, query: &str) -> Result<Vec<String>, SearchError> {
        let spans = match self.syntax {
            PatternSyntax::Literal if query.is_ascii() => self.indexed_spans(query),
            PatternSyntax::Literal => self.scanned_spans(&regex::escape(query))?,
            PatternSyntax::Regex => self.scanned_spans(query)?,
        };

        Ok(spans
            .into_iter()
            .map(|span| self.corpus.window(span.start, span.end, self.radius).to_string())
            .collect())
    }
}
