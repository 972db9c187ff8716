// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sorted suffix offsets for O(m log n) substring lookup

use rayon::prelude::*;

use crate::errors::BuildError;

/// Every suffix start of a byte text, in lexicographic order of the suffixes.
///
/// The array does not own the text; `lookup` must be given the same bytes the
/// array was built from.
#[derive(Debug)]
pub struct SuffixArray {
    offsets: Vec<u32>,
}

impl SuffixArray {
    pub fn build(text: &[u8]) -> Result<Self, BuildError> {
        let len = u32::try_from(text.len())
            .map_err(|_| BuildError::CorpusTooLarge { len: text.len() })?;

        let mut offsets: Vec<u32> = (0..len).collect();
        offsets.par_sort_unstable_by(|&a, &b| text[a as usize..].cmp(&text[b as usize..]));

        Ok(Self { offsets })
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Start offsets of every occurrence of `pattern` in `text`, ascending.
    ///
    /// Occurrences may overlap. An empty pattern has no occurrences.
    pub fn lookup(&self, text: &[u8], pattern: &[u8]) -> Vec<usize> {
        debug_assert_eq!(text.len(), self.offsets.len());
        if pattern.is_empty() {
            return Vec::new();
        }

        let suffix = |offset: &u32| &text[*offset as usize..];
        let lo = self.offsets.partition_point(|o| suffix(o) < pattern);
        let hi = lo
            + self.offsets[lo..].partition_point(|o| suffix(o).starts_with(pattern));

        let mut hits: Vec<usize> = self.offsets[lo..hi].iter().map(|&o| o as usize).collect();
        hits.sort_unstable();
        hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_finds_all_occurrences_in_order() {
        let text = b"banana bandana";
        let sa = SuffixArray::build(text).expect("build");
        assert_eq!(sa.lookup(text, b"ana"), vec![1, 3, 11]);
        assert_eq!(sa.lookup(text, b"band"), vec![7]);
    }

    #[test]
    fn lookup_misses_absent_and_overlong_patterns() {
        let text = b"abc";
        let sa = SuffixArray::build(text).expect("build");
        assert!(sa.lookup(text, b"abd").is_empty());
        assert!(sa.lookup(text, b"abcd").is_empty());
        assert!(sa.lookup(text, b"").is_empty());
    }

    #[test]
    fn build_handles_empty_text() {
        let sa = SuffixArray::build(b"").expect("build");
        assert!(sa.is_empty());
        assert!(sa.lookup(b"", b"a").is_empty());
    }
}
