// SPDX-License-Identifier: MIT OR Apache-2.0

//! Case- and diacritic-insensitive matching
//!
//! Approximates primary-strength English collation: two strings match when
//! they are equal after canonical decomposition, removal of combining marks,
//! and lowercasing, with `ß` expanded to `ss`. The corpus is folded once;
//! every folded byte remembers the original character it came from so hits
//! map back to the original text. A hit always ends on a whole grapheme:
//! combining marks that follow its last character are part of it.

use std::sync::Arc;
use unicode_normalization::char::{decompose_canonical, is_combining_mark};

use super::{Matcher, Strategy};
use crate::corpus::Corpus;
use crate::errors::{BuildError, SearchError};

#[derive(Debug)]
pub struct LinguisticMatcher {
    corpus: Arc<Corpus>,
    folded: String,
    /// `origins[i]` is the corpus offset of the character that produced
    /// folded byte `i`
    origins: Vec<u32>,
}

impl LinguisticMatcher {
    pub fn build(corpus: Arc<Corpus>) -> Result<Self, BuildError> {
        if u32::try_from(corpus.len()).is_err() {
            return Err(BuildError::CorpusTooLarge { len: corpus.len() });
        }

        let mut folded = String::with_capacity(corpus.len());
        let mut origins = Vec::with_capacity(corpus.len());
        for (offset, ch) in corpus.text().char_indices() {
            fold_char(ch, |c| {
                folded.push(c);
                origins.extend(std::iter::repeat(offset as u32).take(c.len_utf8()));
            });
        }

        Ok(Self {
            corpus,
            folded,
            origins,
        })
    }

    /// End offset, in the corpus, of the character behind folded byte
    /// `index` and any combining marks attached to it.
    fn origin_end(&self, index: usize) -> usize {
        let start = self.origins[index] as usize;
        let mut chars = self.corpus.text()[start..].chars();
        let mut end = start + chars.next().map_or(0, char::len_utf8);
        for mark in chars.take_while(|&c| is_combining_mark(c)) {
            end += mark.len_utf8();
        }
        end
    }
}

impl Matcher for LinguisticMatcher {
    fn strategy(&self) -> Strategy {
        Strategy::Linguistic
    }

    fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    /// Every matching original substring, scanning left to right.
    fn find(&self, query: &str) -> Result<Vec<String>, SearchError> {
        let needle = fold(query);
        if needle.is_empty() {
            return Ok(Vec::new());
        }

        let text = self.corpus.text();
        let mut matches = Vec::new();
        let mut cursor = 0;
        while let Some(pos) = self.folded[cursor..].find(&needle) {
            let start = cursor + pos;
            let end = start + needle.len();
            let original_start = self.origins[start] as usize;
            let original_end = self.origin_end(end - 1);
            matches.push(text[original_start..original_end].to_string());
            cursor = end;
        }
        Ok(matches)
    }
}

/// Fold `text` to its collation key.
pub fn fold(text: &str) -> String {
    let mut folded = String::with_capacity(text.len());
    for ch in text.chars() {
        fold_char(ch, |c| folded.push(c));
    }
    folded
}

fn fold_char(ch: char, mut emit: impl FnMut(char)) {
    decompose_canonical(ch, |base| {
        if is_combining_mark(base) {
            return;
        }
        for lower in base.to_lowercase() {
            match lower {
                'ß' => {
                    emit('s');
                    emit('s');
                }
                c if is_combining_mark(c) => {}
                c => emit(c),
            }
        }
    });
}
