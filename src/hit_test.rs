//! Resolve a pointer location to the link under it.

use ratatui::layout::Position;
use tracing::trace;

use crate::layout::TextLayout;
use crate::link::Link;
use crate::registry::LinkRegistry;

/// Link under `location`, if any.
///
/// The layout maps the location to a grapheme index, then the first record
/// in registry order whose range contains that index and whose on-screen
/// bounding box contains the location wins. The box check rejects points
/// that the layout snapped to a nearby character, such as the empty space
/// after the end of a line.
pub fn link_at<'r, L>(
    registry: &'r LinkRegistry,
    layout: &L,
    text_len: usize,
    location: Position,
) -> Option<&'r Link>
where
    L: TextLayout + ?Sized,
{
    let index = layout.character_index_at(location)?;
    if index > text_len {
        return None;
    }
    let hit = registry.iter().find(|link| {
        link.contains(index)
            && link.fits(text_len)
            && layout
                .bounding_rect(link.range.clone())
                .is_some_and(|rect| rect.contains(location))
    });
    trace!(x = location.x, y = location.y, index, hit = ?hit.map(|l| &l.range), "link hit-test");
    hit
}

#[cfg(test)]
mod tests {
    use std::ops::Range;

    use ratatui::layout::{Alignment, Rect};

    use super::*;
    use crate::detector::{LinkDetector, PatternDetector, RangeDetector};
    use crate::layout::GridLayout;

    /// One cell per grapheme on a single row, every box accepted or vetoed.
    struct LineLayout {
        len: usize,
        veto: bool,
    }

    impl TextLayout for LineLayout {
        fn character_index_at(&self, location: Position) -> Option<usize> {
            Some(location.x as usize)
        }

        fn bounding_rect(&self, range: Range<usize>) -> Option<Rect> {
            if self.veto || range.end > self.len {
                return None;
            }
            Some(Rect::new(range.start as u16, 0, (range.end - range.start) as u16, 1))
        }
    }

    #[test]
    fn midpoint_of_a_link_resolves_to_it() {
        let text = "hi @bob check http://x.com";
        let detectors: Vec<Box<dyn LinkDetector>> = vec![
            Box::new(PatternDetector::mention()),
            Box::new(PatternDetector::url()),
        ];
        let registry = LinkRegistry::build(text, &detectors);
        let layout = LineLayout { len: 26, veto: false };
        for link in registry.iter() {
            let mid = (link.range.start + link.range.end) / 2;
            let hit = link_at(&registry, &layout, 26, Position::new(mid as u16, 0));
            assert_eq!(hit, Some(link));
        }
        assert_eq!(link_at(&registry, &layout, 26, Position::new(9, 0)), None);
    }

    #[test]
    fn bounding_box_can_veto_a_hit() {
        let registry = LinkRegistry::build("abcdef", &[RangeDetector::new([1..4])]);
        let layout = LineLayout { len: 6, veto: true };
        assert_eq!(link_at(&registry, &layout, 6, Position::new(2, 0)), None);
    }

    #[test]
    fn index_past_the_text_is_no_link() {
        let registry = LinkRegistry::build("abc", &[RangeDetector::new([0..10])]);
        let layout = LineLayout { len: 10, veto: false };
        assert_eq!(link_at(&registry, &layout, 3, Position::new(5, 0)), None);
    }

    #[test]
    fn stale_ranges_are_skipped() {
        let registry = LinkRegistry::build("ab", &[RangeDetector::new([0..5])]);
        let layout = LineLayout { len: 5, veto: false };
        assert_eq!(link_at(&registry, &layout, 2, Position::new(1, 0)), None);
    }

    #[test]
    fn space_after_a_wrapped_line_is_not_a_link() {
        let text = "see #rust\nok";
        let registry = LinkRegistry::build(text, &[PatternDetector::hashtag()]);
        let layout = GridLayout::new(text, Rect::new(0, 0, 20, 2), true, Alignment::Left);
        let on_tag = link_at(&registry, &layout, 12, Position::new(5, 0));
        assert_eq!(on_tag.map(|l| l.range.clone()), Some(4..9));
        // Column 15 snaps to the newline, which is outside the tag's box.
        assert_eq!(link_at(&registry, &layout, 12, Position::new(15, 0)), None);
    }
}
