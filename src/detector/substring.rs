use std::fmt;
use std::ops::Range;

use crate::detector::LinkDetector;
use crate::grapheme::GraphemeIndex;
use crate::link::{LinkCallback, link_callback};

/// Detector that links the first occurrence of a literal string.
///
/// Matching is case-sensitive and only accepts occurrences that begin and
/// end on grapheme boundaries, so `"e"` never matches half of a decomposed
/// `"é"`.
#[derive(Clone)]
pub struct SubstringDetector {
    substring: String,
    callback: Option<LinkCallback>,
}

impl SubstringDetector {
    pub fn new(substring: impl Into<String>) -> Self {
        Self {
            substring: substring.into(),
            callback: None,
        }
    }

    pub fn with_callback<F>(mut self, callback: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.callback = Some(link_callback(callback));
        self
    }

    pub fn substring(&self) -> &str {
        &self.substring
    }

    fn first_occurrence(&self, text: &str) -> Option<Range<usize>> {
        if self.substring.is_empty() {
            return None;
        }
        let index = GraphemeIndex::new(text);
        let mut from = 0;
        while let Some(offset) = text.get(from..)?.find(self.substring.as_str()) {
            let start = from + offset;
            let end = start + self.substring.len();
            if index.is_boundary(start) && index.is_boundary(end) {
                return Some(index.grapheme_range(start..end));
            }
            from = start + text[start..].chars().next().map_or(1, char::len_utf8);
        }
        None
    }
}

impl LinkDetector for SubstringDetector {
    fn detect_links(&self, text: &str) -> Vec<Range<usize>> {
        self.first_occurrence(text).into_iter().collect()
    }

    fn callback(&self) -> Option<&LinkCallback> {
        self.callback.as_ref()
    }
}

impl fmt::Debug for SubstringDetector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubstringDetector")
            .field("substring", &self.substring)
            .field("callback", &self.callback.is_some())
            .finish()
    }
}
