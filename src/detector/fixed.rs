use std::fmt;
use std::ops::Range;

use crate::detector::LinkDetector;
use crate::link::{LinkCallback, link_callback};

/// Detector that reports a precomputed list of ranges.
///
/// The ranges are returned verbatim for any input, so they must be valid for
/// the text that is later passed to [`LinkDetector::detect_links`]. Ranges
/// that no longer fit a shorter text are skipped by styling and hit-testing
/// rather than rejected here.
#[derive(Clone, Default)]
pub struct RangeDetector {
    ranges: Vec<Range<usize>>,
    callback: Option<LinkCallback>,
}

impl RangeDetector {
    pub fn new(ranges: impl IntoIterator<Item = Range<usize>>) -> Self {
        Self {
            ranges: ranges.into_iter().collect(),
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

    pub fn ranges(&self) -> &[Range<usize>] {
        &self.ranges
    }
}

impl LinkDetector for RangeDetector {
    fn detect_links(&self, _text: &str) -> Vec<Range<usize>> {
        self.ranges.clone()
    }

    fn callback(&self) -> Option<&LinkCallback> {
        self.callback.as_ref()
    }
}

impl fmt::Debug for RangeDetector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RangeDetector")
            .field("ranges", &self.ranges)
            .field("callback", &self.callback.is_some())
            .finish()
    }
}
