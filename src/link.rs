use std::fmt;
use std::ops::Range;
use std::sync::Arc;

/// Callback invoked with the exact substring covered by a tapped link.
pub type LinkCallback = Arc<dyn Fn(&str) + Send + Sync + 'static>;

/// Wrap a closure as a [`LinkCallback`].
pub fn link_callback<F>(callback: F) -> LinkCallback
where
    F: Fn(&str) + Send + Sync + 'static,
{
    Arc::new(callback)
}

/// A resolved link: a half-open grapheme range over the label text and the
/// callback of the detector that produced it.
///
/// Two links compare equal when their ranges are equal. The callback is
/// deliberately ignored so a rebuilt registry still recognises the link that
/// is currently highlighted.
#[derive(Clone)]
pub struct Link {
    pub range: Range<usize>,
    pub callback: Option<LinkCallback>,
}

impl Link {
    pub fn new(range: Range<usize>, callback: Option<LinkCallback>) -> Self {
        Self { range, callback }
    }

    /// True when `index` falls inside the range (end-exclusive).
    pub fn contains(&self, index: usize) -> bool {
        self.range.start <= index && index < self.range.end
    }

    /// True when the range is non-empty and ends within a text of
    /// `text_len` graphemes.
    pub fn fits(&self, text_len: usize) -> bool {
        self.range.start < self.range.end && self.range.end <= text_len
    }

    pub(crate) fn invoke(&self, matched: &str) {
        if let Some(callback) = &self.callback {
            callback(matched);
        }
    }
}

impl PartialEq for Link {
    fn eq(&self, other: &Self) -> bool {
        self.range == other.range
    }
}

impl Eq for Link {}

impl fmt::Debug for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Link")
            .field("range", &self.range)
            .field("callback", &self.callback.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn equality_ignores_callbacks() {
        let a = Link::new(2..5, Some(link_callback(|_| {})));
        let b = Link::new(2..5, None);
        let c = Link::new(2..6, None);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn contains_is_end_exclusive() {
        let link = Link::new(3..6, None);
        assert!(!link.contains(2));
        assert!(link.contains(3));
        assert!(link.contains(5));
        assert!(!link.contains(6));
    }

    #[test]
    fn fits_rejects_ranges_past_the_text() {
        let link = Link::new(3..6, None);
        assert!(link.fits(6));
        assert!(!link.fits(5));
        assert!(!Link::new(4..4, None).fits(10));
    }

    #[test]
    fn invoke_passes_the_match_through() {
        let hits = Arc::new(AtomicUsize::new(0));
        let seen = hits.clone();
        let link = Link::new(
            0..4,
            Some(link_callback(move |s| {
                assert_eq!(s, "@bob");
                seen.fetch_add(1, Ordering::SeqCst);
            })),
        );
        link.invoke("@bob");
        Link::new(0..4, None).invoke("@bob");
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
