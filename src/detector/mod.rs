//! Link detectors.
//!
//! A detector scans the label text and reports the grapheme ranges that
//! should behave as links. Every range a detector produces shares the
//! detector's single optional callback.
//!
//! - [`RangeDetector`] returns a fixed set of ranges regardless of the text.
//! - [`SubstringDetector`] finds the first occurrence of a literal string.
//! - [`PatternDetector`] reports every match of a regular expression, or of
//!   the structured URL finder.

use std::ops::Range;

use crate::link::LinkCallback;

mod fixed;
mod pattern;
mod substring;

pub use fixed::RangeDetector;
pub use pattern::{HASHTAG_PATTERN, MENTION_PATTERN, PatternDetector, PatternOptions};
pub use substring::SubstringDetector;

pub trait LinkDetector {
    /// Ranges, in grapheme clusters, that should become links in `text`.
    fn detect_links(&self, text: &str) -> Vec<Range<usize>>;

    /// Callback attached to every range this detector produces.
    fn callback(&self) -> Option<&LinkCallback>;
}

impl<D: LinkDetector + ?Sized> LinkDetector for Box<D> {
    fn detect_links(&self, text: &str) -> Vec<Range<usize>> {
        (**self).detect_links(text)
    }

    fn callback(&self) -> Option<&LinkCallback> {
        (**self).callback()
    }
}
