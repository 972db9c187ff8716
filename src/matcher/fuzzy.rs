// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fuzzy line matching
//!
//! A line qualifies through either of two tests, both blind to case and
//! diacritics:
//!
//! - **Subsequence**: every character of the query appears in the line, in
//!   order, and the fzf-style score of that alignment (nucleo-matcher) is at
//!   least the configured minimum.
//! - **Typo**: every word of the query is within a small edit distance of
//!   some word of the line. Words of up to 2 characters must match exactly,
//!   up to 5 characters allow one edit, longer words allow two. A swap of two
//!   adjacent characters counts as one edit.
//!
//! Results keep corpus line order.

use levenshtein_automata::{Distance, LevenshteinAutomatonBuilder};
use nucleo_matcher::pattern::{Atom, AtomKind, CaseMatching, Normalization};
use nucleo_matcher::{Matcher as Scorer, Utf32String};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use super::linguistic::fold;
use super::{Matcher, Strategy};
use crate::corpus::Corpus;
use crate::errors::{BuildError, SearchError};

pub struct FuzzyMatcher {
    corpus: Arc<Corpus>,
    /// One haystack per corpus line, same order as `Corpus::lines`
    haystacks: Vec<Utf32String>,
    /// Folded word -> ordinals of the lines containing it, ascending
    vocabulary: HashMap<String, Vec<u32>>,
    one_edit: LevenshteinAutomatonBuilder,
    two_edits: LevenshteinAutomatonBuilder,
    min_score: u16,
}

impl FuzzyMatcher {
    pub fn build(corpus: Arc<Corpus>, min_score: u16) -> Result<Self, BuildError> {
        if u32::try_from(corpus.len()).is_err() {
            return Err(BuildError::CorpusTooLarge { len: corpus.len() });
        }

        let haystacks = corpus.lines().map(Utf32String::from).collect();

        let mut vocabulary: HashMap<String, Vec<u32>> = HashMap::new();
        for (ordinal, line) in corpus.lines().enumerate() {
            let ordinal = ordinal as u32;
            for word in words(&fold(line)) {
                let postings = vocabulary.entry(word.to_string()).or_default();
                if postings.last() != Some(&ordinal) {
                    postings.push(ordinal);
                }
            }
        }

        Ok(Self {
            corpus,
            haystacks,
            vocabulary,
            one_edit: LevenshteinAutomatonBuilder::new(1, true),
            two_edits: LevenshteinAutomatonBuilder::new(2, true),
            min_score,
        })
    }

    /// Lines containing a near match for every query word.
    fn typo_matches(&self, query: &str) -> HashSet<u32> {
        let folded = fold(query);
        let terms: HashSet<&str> = words(&folded).collect();

        let mut matched: Option<HashSet<u32>> = None;
        for term in terms {
            let lines = self.lines_near(term);
            let narrowed = match matched {
                None => lines,
                Some(previous) => previous.intersection(&lines).copied().collect(),
            };
            if narrowed.is_empty() {
                return HashSet::new();
            }
            matched = Some(narrowed);
        }
        matched.unwrap_or_default()
    }

    fn lines_near(&self, term: &str) -> HashSet<u32> {
        let builder = match term.chars().count() {
            0..=2 => {
                return self
                    .vocabulary
                    .get(term)
                    .map(|lines| lines.iter().copied().collect())
                    .unwrap_or_default();
            }
            3..=5 => &self.one_edit,
            _ => &self.two_edits,
        };

        let dfa = builder.build_dfa(term);
        self.vocabulary
            .iter()
            .filter(|(word, _)| matches!(dfa.eval(word.as_bytes()), Distance::Exact(_)))
            .flat_map(|(_, lines)| lines.iter().copied())
            .collect()
    }
}

fn words(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
}

impl Matcher for FuzzyMatcher {
    fn strategy(&self) -> Strategy {
        Strategy::Fuzzy
    }

    fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    /// Qualifying lines in corpus order.
    fn find(&self, query: &str) -> Result<Vec<String>, SearchError> {
        let near = self.typo_matches(query);

        // the whole query, spaces included, is one subsequence to align
        let atom = Atom::new(
            query,
            CaseMatching::Ignore,
            Normalization::Smart,
            AtomKind::Fuzzy,
            false,
        );
        let mut scorer = Scorer::new(nucleo_matcher::Config::DEFAULT);

        Ok(self
            .corpus
            .lines()
            .zip(&self.haystacks)
            .enumerate()
            .filter(|(ordinal, (_, haystack))| {
                near.contains(&(*ordinal as u32))
                    || atom
                        .score(haystack.slice(..), &mut scorer)
                        .is_some_and(|score| score >= self.min_score)
            })
            .map(|(_, (line, _))| line.to_string())
            .collect())
    }
}
