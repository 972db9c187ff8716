//! Error types with helpful suggestions
//!
//! Startup failures (corpus loading, index builds) are fatal and carry a
//! suggestion for the operator. Query-time failures are recovered inside the
//! matcher that hit them and reported as "no match".

use std::path::PathBuf;
use thiserror::Error;

/// Error raised while loading the corpus file
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error(
        "Corpus not readable at '{}': {source}\n\n\
         Suggestion: point shakesearch at the text to search.\n\
         Example: shakesearch serve --corpus completeworks.txt\n\
         Or set `corpus_path` in .shakesearch.toml",
        path.display()
    )]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Error raised while building a matcher index at startup
#[derive(Debug, Error)]
pub enum BuildError {
    /// Suffix offsets are stored as `u32`
    #[error("Corpus is {len} bytes; positional indexes support at most 4 GiB")]
    CorpusTooLarge { len: usize },

    #[error("Failed to build relevance index: {0}")]
    Relevance(#[from] tantivy::TantivyError),
}

/// Error raised by a single matcher while answering a query
///
/// Never crosses the dispatcher: `Matcher::search` logs it and answers with
/// an empty result.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Malformed query pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("Relevance query failed: {0}")]
    Relevance(#[from] tantivy::TantivyError),
}

/// Helper functions for creating helpful messages
pub mod suggestions {
    /// Body returned to HTTP clients that omit `q`
    pub const MISSING_QUERY: &str = "missing search query in URL params";

    /// Body returned when the result set cannot be serialized
    pub const ENCODING_FAILURE: &str = "encoding failure";

    /// Get suggestion for an empty query on the command line
    pub fn empty_query_suggestion() -> String {
        "Search query must not be empty\n\n\
         Example: shakesearch search \"to be or not to be\""
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corpus_error_names_path_and_suggests_flag() {
        let err = CorpusError::Read {
            path: PathBuf::from("missing.txt"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        let message = err.to_string();
        assert!(message.contains("missing.txt"));
        assert!(message.contains("--corpus"));
    }

    #[test]
    fn invalid_pattern_wraps_regex_error() {
        let regex_err = regex::Regex::new("(unclosed").expect_err("must fail");
        let err = SearchError::from(regex_err);
        assert!(err.to_string().starts_with("Malformed query pattern"));
    }
}
