// SPDX-License-Identifier: MIT OR Apache-2.0

//! Corpus loading and normalization
//!
//! The corpus is read once at startup, normalized, and then shared
//! read-only (`Arc<Corpus>`) by every matcher.

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

use crate::errors::CorpusError;

static WHITESPACE_ONLY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]+$").expect("static regex"));

/// Immutable, normalized text body that all indexes are built from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Corpus {
    text: String,
}

impl Corpus {
    /// Normalize `raw` into a corpus.
    pub fn new(raw: &str) -> Self {
        Self {
            text: normalize(raw),
        }
    }

    /// Read and normalize the corpus file at `path`.
    pub fn load(path: &Path) -> Result<Self, CorpusError> {
        let raw = std::fs::read_to_string(path).map_err(|source| CorpusError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(&raw))
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.text.as_bytes()
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Lines in corpus order. The ordinal of a line is its position here.
    pub fn lines(&self) -> std::str::Split<'_, char> {
        self.text.split('\n')
    }

    /// The full line(s) enclosing the byte span `[start, end)`.
    ///
    /// Expands backward to just after the previous newline (or corpus start)
    /// and forward to the next newline at or after `end` (or corpus end).
    pub fn enclosing_line(&self, start: usize, end: usize) -> &str {
        let line_start = self.text[..start].rfind('\n').map_or(0, |i| i + 1);
        let line_end = self.text[end..]
            .find('\n')
            .map_or(self.text.len(), |i| end + i);
        &self.text[line_start..line_end]
    }

    /// The span `[start - radius, end + radius)`, clamped to the corpus and
    /// widened to character boundaries.
    pub fn window(&self, start: usize, end: usize, radius: usize) -> &str {
        let mut from = start.saturating_sub(radius);
        while !self.text.is_char_boundary(from) {
            from -= 1;
        }
        let mut to = end.saturating_add(radius).min(self.text.len());
        while !self.text.is_char_boundary(to) {
            to += 1;
        }
        &self.text[from..to]
    }
}

/// Collapse blank lines and strip the common indentation.
///
/// `\r\n` becomes `\n`, then every non-overlapping `\n\n` becomes `\n`.
/// Whitespace-only lines are emptied and ignored when computing the margin.
pub fn normalize(raw: &str) -> String {
    let text = raw.replace("\r\n", "\n").replace("\n\n", "\n");
    dedent(&text)
}

fn dedent(text: &str) -> String {
    let text = WHITESPACE_ONLY.replace_all(text, "");

    let mut margin: Option<&str> = None;
    for line in text.split('\n') {
        let indent_len = line.len() - line.trim_start_matches([' ', '\t']).len();
        if indent_len == line.len() {
            continue;
        }
        let indent = &line[..indent_len];
        margin = match margin {
            None => Some(indent),
            Some(current) if indent.starts_with(current) => Some(current),
            Some(current) if current.starts_with(indent) => Some(indent),
            Some(_) => Some(""),
        };
        if margin == Some("") {
            break;
        }
    }

    match margin {
        Some(margin) if !margin.is_empty() => text
            .split('\n')
            .map(|line| line.strip_prefix(margin).unwrap_or(line))
            .collect::<Vec<_>>()
            .join("\n"),
        _ => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_collapses_blank_lines_once() {
        assert_eq!(normalize("a\n\nb"), "a\nb");
        assert_eq!(normalize("a\n\n\n\nb"), "a\n\nb");
        assert_eq!(normalize("a\r\n\r\nb"), "a\nb");
    }

    #[test]
    fn normalize_strips_common_margin() {
        let raw = "    HAMLET\n      To be, or not to be\n    OPHELIA";
        assert_eq!(
            normalize(raw),
            "HAMLET\n  To be, or not to be\nOPHELIA"
        );
    }

    #[test]
    fn normalize_ignores_whitespace_only_lines_for_margin() {
        let raw = "  one\n \n  two";
        assert_eq!(normalize(raw), "one\n\ntwo");
    }

    #[test]
    fn normalize_keeps_text_with_mixed_indentation() {
        let raw = "  one\n\ttwo";
        assert_eq!(normalize(raw), raw);
    }

    #[test]
    fn enclosing_line_expands_to_corpus_end_without_newline() {
        let corpus = Corpus::new("first line\nlast line");
        let start = corpus.text().find("last").expect("present");
        assert_eq!(corpus.enclosing_line(start, start + 4), "last line");
    }

    #[test]
    fn enclosing_line_excludes_newlines() {
        let corpus = Corpus::new("alpha\nbeta gamma\ndelta");
        let start = corpus.text().find("gamma").expect("present");
        assert_eq!(corpus.enclosing_line(start, start + 5), "beta gamma");
    }

    #[test]
    fn window_clamps_at_both_boundaries() {
        let corpus = Corpus::new("short text");
        assert_eq!(corpus.window(0, 5, 250), "short text");
        assert_eq!(corpus.window(6, 10, 2), "t text");
    }

    #[test]
    fn window_respects_char_boundaries() {
        let corpus = Corpus::new("éé needle éé");
        let start = corpus.text().find("needle").expect("present");
        let window = corpus.window(start, start + 6, 2);
        assert!(window.contains("needle"));
        assert!(window.starts_with('é'));
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let err = Corpus::load(&dir.path().join("absent.txt")).expect_err("missing");
        assert!(matches!(err, CorpusError::Read { .. }));
    }
}
