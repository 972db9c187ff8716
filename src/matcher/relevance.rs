// SPDX-License-Identifier: MIT OR Apache-2.0

//! Relevance-ranked line search with tantivy fuzzy term queries

use std::ops::Range;
use std::sync::Arc;
use tantivy::{
    collector::TopDocs,
    doc,
    query::{BooleanQuery, FuzzyTermQuery, Occur, Query},
    schema::{Field, Schema, Value, INDEXED, STORED, TEXT},
    tokenizer::TokenStream,
    Index, IndexReader, IndexWriter, ReloadPolicy, TantivyDocument, Term,
};

use super::{Matcher, Strategy};
use crate::corpus::Corpus;
use crate::errors::{BuildError, SearchError};

/// Default number of ranked lines returned per query
pub const DEFAULT_RELEVANCE_LIMIT: usize = 10;

/// Indexing heap for the one-off build
pub const WRITER_BUDGET_BYTES: usize = 50_000_000;

/// In-RAM inverted index with one document per corpus line
pub struct RelevanceMatcher {
    corpus: Arc<Corpus>,
    /// Byte span of each line, indexed by line ordinal
    spans: Vec<Range<usize>>,
    index: Index,
    reader: IndexReader,
    line_field: Field,
    content_field: Field,
    limit: usize,
}

impl RelevanceMatcher {
    pub fn build(corpus: Arc<Corpus>, limit: usize) -> Result<Self, BuildError> {
        let mut schema_builder = Schema::builder();
        let line_field = schema_builder.add_u64_field("line", INDEXED | STORED);
        let content_field = schema_builder.add_text_field("content", TEXT);
        let index = Index::create_in_ram(schema_builder.build());

        let mut writer: IndexWriter = index.writer_with_num_threads(1, WRITER_BUDGET_BYTES)?;
        let mut spans = Vec::new();
        let mut start = 0;
        for (ordinal, line) in corpus.lines().enumerate() {
            writer.add_document(doc!(
                line_field => ordinal as u64,
                content_field => line
            ))?;
            spans.push(start..start + line.len());
            start += line.len() + 1;
        }
        writer.commit()?;

        let reader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()?;

        Ok(Self {
            corpus,
            spans,
            index,
            reader,
            line_field,
            content_field,
            limit,
        })
    }

    /// Query terms as the index would have tokenized them.
    fn terms(&self, query: &str) -> Result<Vec<String>, SearchError> {
        let mut analyzer = self.index.tokenizer_for_field(self.content_field)?;
        let mut stream = analyzer.token_stream(query);
        let mut terms = Vec::new();
        while stream.advance() {
            terms.push(stream.token().text.clone());
        }
        Ok(terms)
    }
}

impl Matcher for RelevanceMatcher {
    fn strategy(&self) -> Strategy {
        Strategy::Relevance
    }

    fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    /// Lines by descending score; any term within edit distance counts.
    fn find(&self, query: &str) -> Result<Vec<String>, SearchError> {
        let terms = self.terms(query)?;
        if terms.is_empty() {
            return Ok(Vec::new());
        }

        let clauses: Vec<(Occur, Box<dyn Query>)> = terms
            .iter()
            .map(|term| {
                let distance = if term.len() <= 4 { 1 } else { 2 };
                let term = Term::from_field_text(self.content_field, term);
                let fuzzy: Box<dyn Query> = Box::new(FuzzyTermQuery::new(term, distance, true));
                (Occur::Should, fuzzy)
            })
            .collect();
        let query = BooleanQuery::new(clauses);

        let searcher = self.reader.searcher();
        let top_docs = searcher.search(&query, &TopDocs::with_limit(self.limit.max(1)))?;

        let mut lines = Vec::with_capacity(top_docs.len());
        for (_score, address) in top_docs {
            let doc: TantivyDocument = searcher.doc(address)?;
            let Some(ordinal) = doc.get_first(self.line_field).and_then(|v| v.as_u64()) else {
                continue;
            };
            if let Some(span) = self.spans.get(ordinal as usize) {
                lines.push(self.corpus.text()[span.clone()].to_string());
            }
        }
        Ok(lines)
    }
}
