//! Conversions between byte offsets and extended grapheme cluster indices.
//!
//! Every link range in this crate is expressed in grapheme clusters
//! (user-perceived characters) so highlighting never splits a multi-byte
//! or multi-codepoint character. Matchers work on byte offsets; this module
//! is the only place where the two unit systems meet.

use std::ops::Range;

use unicode_segmentation::UnicodeSegmentation;

/// Byte offsets of every grapheme cluster boundary in a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphemeIndex {
    // Start of each cluster, followed by the total byte length.
    boundaries: Vec<usize>,
}

impl GraphemeIndex {
    pub fn new(text: &str) -> Self {
        let mut boundaries: Vec<usize> = text.grapheme_indices(true).map(|(i, _)| i).collect();
        boundaries.push(text.len());
        Self { boundaries }
    }

    /// Number of grapheme clusters.
    pub fn len(&self) -> usize {
        self.boundaries.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Byte offset at which cluster `index` starts. `index == len()` yields
    /// the end of the text.
    pub fn byte_offset(&self, index: usize) -> Option<usize> {
        self.boundaries.get(index).copied()
    }

    /// True when `byte` sits on a cluster boundary (including both ends).
    pub fn is_boundary(&self, byte: usize) -> bool {
        self.boundaries.binary_search(&byte).is_ok()
    }

    /// Convert a grapheme range to a byte range. `None` when the range is
    /// inverted or extends past the text.
    pub fn byte_range(&self, range: Range<usize>) -> Option<Range<usize>> {
        if range.start > range.end {
            return None;
        }
        Some(self.byte_offset(range.start)?..self.byte_offset(range.end)?)
    }

    /// Convert a byte range reported by a matcher into grapheme units.
    ///
    /// The start snaps down to the cluster containing it and the end snaps up
    /// to the next boundary, so a match that lands inside a cluster still
    /// covers the whole cluster.
    pub fn grapheme_range(&self, bytes: Range<usize>) -> Range<usize> {
        let start = self.floor(bytes.start);
        let end = self.ceil(bytes.end).max(start);
        start..end
    }

    /// Substring covered by a grapheme range, if the range fits `text`.
    ///
    /// `text` must be the string this index was built from.
    pub fn substring<'t>(&self, text: &'t str, range: Range<usize>) -> Option<&'t str> {
        text.get(self.byte_range(range)?)
    }

    fn floor(&self, byte: usize) -> usize {
        match self.boundaries.binary_search(&byte) {
            Ok(idx) => idx,
            Err(idx) => idx.saturating_sub(1).min(self.len()),
        }
    }

    fn ceil(&self, byte: usize) -> usize {
        match self.boundaries.binary_search(&byte) {
            Ok(idx) => idx,
            Err(idx) => idx.min(self.len()),
        }
    }
}

/// Number of grapheme clusters in `text`.
pub fn grapheme_len(text: &str) -> usize {
    text.graphemes(true).count()
}

/// Substring of `text` covered by the grapheme range, or `None` when the
/// range does not fit.
pub fn grapheme_substring(text: &str, range: Range<usize>) -> Option<&str> {
    GraphemeIndex::new(text).substring(text, range)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FAMILY: &str = "\u{1F469}\u{200D}\u{1F469}\u{200D}\u{1F467}";

    #[test]
    fn ascii_offsets_match_bytes() {
        let index = GraphemeIndex::new("hello");
        assert_eq!(index.len(), 5);
        assert_eq!(index.byte_range(1..3), Some(1..3));
        assert_eq!(index.grapheme_range(1..3), 1..3);
    }

    #[test]
    fn zwj_sequence_counts_as_one_cluster() {
        let text = format!("{FAMILY} @bob");
        let index = GraphemeIndex::new(&text);
        assert_eq!(index.len(), 6);
        let at = text.find('@').expect("mention present");
        assert_eq!(index.grapheme_range(at..text.len()), 2..6);
        assert_eq!(index.substring(&text, 2..6), Some("@bob"));
    }

    #[test]
    fn combining_marks_stay_with_their_base() {
        let text = "cafe\u{301}!";
        let index = GraphemeIndex::new(text);
        assert_eq!(index.len(), 5);
        // A match ending between `e` and the accent still covers the cluster.
        assert_eq!(index.grapheme_range(0..4), 0..4);
        assert_eq!(index.substring(text, 3..4), Some("e\u{301}"));
    }

    #[test]
    fn out_of_bounds_ranges_are_rejected() {
        let index = GraphemeIndex::new("abc");
        assert_eq!(index.byte_range(2..4), None);
        assert_eq!(index.byte_range(2..1), None);
        assert_eq!(grapheme_substring("abc", 1..9), None);
    }

    #[test]
    fn empty_text_has_no_clusters() {
        let index = GraphemeIndex::new("");
        assert!(index.is_empty());
        assert_eq!(index.byte_offset(0), Some(0));
        assert_eq!(index.grapheme_range(0..0), 0..0);
        assert_eq!(grapheme_len(""), 0);
    }
}
