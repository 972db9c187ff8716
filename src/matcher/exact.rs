// SPDX-License-Identifier: MIT OR Apache-2.0

//! Exact substring matching over a suffix array

use std::sync::Arc;

use super::suffix_array::SuffixArray;
use super::{Matcher, Strategy};
use crate::corpus::Corpus;
use crate::errors::{BuildError, SearchError};

/// Byte-for-byte substring search returning the enclosing line of every hit
#[derive(Debug)]
pub struct ExactMatcher {
    corpus: Arc<Corpus>,
    suffixes: SuffixArray,
}

impl ExactMatcher {
    pub fn build(corpus: Arc<Corpus>) -> Result<Self, BuildError> {
        let suffixes = SuffixArray::build(corpus.as_bytes())?;
        Ok(Self { corpus, suffixes })
    }
}

impl Matcher for ExactMatcher {
    fn strategy(&self) -> Strategy {
        Strategy::Exact
    }

    fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    /// One line per occurrence, in corpus order. A line hit twice is
    /// reported twice.
    fn find(&self, query: &str) -> Result<Vec<String>, SearchError> {
        let hits = self.suffixes.lookup(self.corpus.as_bytes(), query.as_bytes());
        Ok(hits
            .into_iter()
            .map(|start| {
                self.corpus
                    .enclosing_line(start, start + query.len())
                    .to_string()
            })
            .collect())
    }
}
