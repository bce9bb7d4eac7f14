//! Press/drag/release tracking for links.
//!
//! The controller only sees the result of hit-testing, so it stays
//! independent of geometry. A tap fires when the press and the release land
//! on the same link (compared by range); everything else just moves or
//! clears the highlight.

use tracing::debug;

use crate::grapheme::grapheme_substring;
use crate::link::{Link, LinkCallback, link_callback};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
enum Phase {
    #[default]
    Idle,
    Pressed(Link),
}

/// Highlight state for one gesture plus the host's global tap callbacks.
#[derive(Default)]
pub struct LinkInteraction {
    phase: Phase,
    tap_callbacks: Vec<LinkCallback>,
}

impl LinkInteraction {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback that runs for every tapped link, before the
    /// link's own callback. Callbacks run in registration order.
    pub fn when_link_is_tapped<F>(&mut self, callback: F)
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.tap_callbacks.push(link_callback(callback));
    }

    pub fn tap_callback_count(&self) -> usize {
        self.tap_callbacks.len()
    }

    /// The link currently pressed, if any.
    pub fn highlighted_link(&self) -> Option<&Link> {
        match &self.phase {
            Phase::Idle => None,
            Phase::Pressed(link) => Some(link),
        }
    }

    pub fn is_pressed(&self) -> bool {
        matches!(self.phase, Phase::Pressed(_))
    }

    /// Start a gesture over `link`. Returns true when the highlight changed.
    pub fn press(&mut self, link: Option<&Link>) -> bool {
        self.set_highlight(link)
    }

    /// Pointer moved during the gesture; `None` collapses to idle. Returns
    /// true when the highlight changed.
    pub fn drag(&mut self, link: Option<&Link>) -> bool {
        self.set_highlight(link)
    }

    /// Finish the gesture at `link`.
    ///
    /// When it matches the pressed link, every global callback and then the
    /// link's own callback receive the substring of `text` covered by the
    /// link, and that substring is returned. The state is cleared either
    /// way.
    pub fn release(&mut self, link: Option<&Link>, text: &str) -> Option<String> {
        let Phase::Pressed(pressed) = std::mem::take(&mut self.phase) else {
            return None;
        };
        if link != Some(&pressed) {
            debug!(range = ?pressed.range, "link released elsewhere");
            return None;
        }
        let Some(matched) = grapheme_substring(text, pressed.range.clone()) else {
            debug!(range = ?pressed.range, "tapped link no longer fits the text");
            return None;
        };
        debug!(range = ?pressed.range, matched, "link tapped");
        for callback in &self.tap_callbacks {
            callback(matched);
        }
        pressed.invoke(matched);
        Some(matched.to_string())
    }

    /// Abort the gesture without firing anything. Returns true when a link
    /// was highlighted.
    pub fn cancel(&mut self) -> bool {
        self.set_highlight(None)
    }

    fn set_highlight(&mut self, link: Option<&Link>) -> bool {
        let next = match link {
            Some(link) => Phase::Pressed(link.clone()),
            None => Phase::Idle,
        };
        if next == self.phase {
            return false;
        }
        self.phase = next;
        true
    }
}

impl std::fmt::Debug for LinkInteraction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkInteraction")
            .field("phase", &self.phase)
            .field("tap_callbacks", &self.tap_callbacks.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    type Log = Arc<Mutex<Vec<String>>>;

    fn recording(log: &Log, tag: &'static str) -> impl Fn(&str) + Send + Sync + 'static {
        let log = log.clone();
        move |s: &str| log.lock().unwrap().push(format!("{tag}:{s}"))
    }

    fn link(range: std::ops::Range<usize>, log: &Log, tag: &'static str) -> Link {
        Link::new(range, Some(link_callback(recording(log, tag))))
    }

    #[test]
    fn tap_runs_globals_then_link_callback() {
        let log = Log::default();
        let mut state = LinkInteraction::new();
        state.when_link_is_tapped(recording(&log, "first"));
        state.when_link_is_tapped(recording(&log, "second"));
        assert_eq!(state.tap_callback_count(), 2);
        let bob = link(3..7, &log, "bob");

        assert!(state.press(Some(&bob)));
        let tapped = state.release(Some(&bob), "hi @bob");
        assert_eq!(tapped.as_deref(), Some("@bob"));
        assert_eq!(
            *log.lock().unwrap(),
            vec!["first:@bob", "second:@bob", "bob:@bob"]
        );
        assert!(state.highlighted_link().is_none());
    }

    #[test]
    fn release_elsewhere_fires_nothing() {
        let log = Log::default();
        let mut state = LinkInteraction::new();
        state.when_link_is_tapped(recording(&log, "global"));
        let bob = link(3..7, &log, "bob");

        state.press(Some(&bob));
        assert_eq!(state.release(None, "hi @bob"), None);
        assert!(log.lock().unwrap().is_empty());
        assert!(!state.is_pressed());
    }

    #[test]
    fn drag_to_another_link_taps_only_that_link() {
        let log = Log::default();
        let mut state = LinkInteraction::new();
        let text = "hi @bob check http://x.com";
        let bob = link(3..7, &log, "mention");
        let url = link(14..26, &log, "url");

        state.press(Some(&bob));
        assert!(state.drag(Some(&url)));
        assert_eq!(state.highlighted_link(), Some(&url));
        state.release(Some(&url), text);
        assert_eq!(*log.lock().unwrap(), vec!["url:http://x.com"]);
    }

    #[test]
    fn drag_off_then_back_keeps_the_gesture_alive() {
        let log = Log::default();
        let mut state = LinkInteraction::new();
        let bob = link(3..7, &log, "bob");

        state.press(Some(&bob));
        assert!(state.drag(None));
        assert!(!state.drag(None));
        assert!(state.drag(Some(&bob)));
        assert!(!state.drag(Some(&bob)));
        state.release(Some(&bob), "hi @bob");
        assert_eq!(log.lock().unwrap().len(), 1);
    }

    #[test]
    fn equality_by_range_accepts_a_rebuilt_link() {
        let log = Log::default();
        let mut state = LinkInteraction::new();
        let pressed = link(0..3, &log, "old");
        let rebuilt = Link::new(0..3, None);

        state.press(Some(&pressed));
        assert_eq!(state.release(Some(&rebuilt), "abc").as_deref(), Some("abc"));
        assert_eq!(*log.lock().unwrap(), vec!["old:abc"]);
    }

    #[test]
    fn cancel_clears_without_callbacks() {
        let log = Log::default();
        let mut state = LinkInteraction::new();
        state.when_link_is_tapped(recording(&log, "global"));
        let bob = link(3..7, &log, "bob");

        state.press(Some(&bob));
        assert!(state.cancel());
        assert!(!state.cancel());
        assert_eq!(state.release(Some(&bob), "hi @bob"), None);
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn press_on_nothing_stays_idle() {
        let mut state = LinkInteraction::new();
        assert!(!state.press(None));
        assert_eq!(state.release(None, "text"), None);
    }

    #[test]
    fn stale_link_is_not_tapped() {
        let log = Log::default();
        let mut state = LinkInteraction::new();
        let bob = link(3..7, &log, "bob");
        state.press(Some(&bob));
        assert_eq!(state.release(Some(&bob), "hi"), None);
        assert!(log.lock().unwrap().is_empty());
    }
}
