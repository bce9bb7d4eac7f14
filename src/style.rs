//! Styling bridge: link state in, attributed text out.
//!
//! The renderer receives a base style and alignment for the whole string
//! plus one overlay per link. Overlays are applied in registry order, so the
//! later record wins where ranges overlap.

use std::ops::Range;

use ratatui::layout::Alignment;
use ratatui::style::Style;
use ratatui::text::{Line, Span, Text};
use unicode_segmentation::UnicodeSegmentation;

use crate::grapheme::grapheme_len;
use crate::link::Link;
use crate::registry::LinkRegistry;
use crate::theme::LinkTheme;

/// Style overlay for a grapheme range.
#[derive(Debug, Clone, PartialEq)]
pub struct StyledRun {
    pub range: Range<usize>,
    pub style: Style,
}

/// Text with base attributes and per-range overlays, ready for a renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributedText {
    text: String,
    base: Style,
    alignment: Alignment,
    runs: Vec<StyledRun>,
}

impl AttributedText {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn base(&self) -> Style {
        self.base
    }

    pub fn alignment(&self) -> Alignment {
        self.alignment
    }

    pub fn runs(&self) -> &[StyledRun] {
        &self.runs
    }

    /// Effective style of every grapheme, overlays applied in order.
    pub fn grapheme_styles(&self) -> Vec<Style> {
        let mut styles = vec![self.base; grapheme_len(&self.text)];
        for run in &self.runs {
            if let Some(slots) = styles.get_mut(run.range.clone()) {
                slots.fill(run.style);
            }
        }
        styles
    }

    /// Convert into ratatui text: one line per hard break, spans split where
    /// the style changes.
    pub fn to_text(&self) -> Text<'static> {
        let styles = self.grapheme_styles();
        let mut lines = Vec::new();
        let mut spans: Vec<Span<'static>> = Vec::new();
        let mut pending = String::new();
        let mut pending_style = self.base;

        for (grapheme, style) in self.text.graphemes(true).zip(styles) {
            if matches!(grapheme, "\n" | "\r\n") {
                flush_span(&mut spans, &mut pending, pending_style);
                lines.push(Line::from(std::mem::take(&mut spans)).alignment(self.alignment));
                continue;
            }
            if style != pending_style {
                flush_span(&mut spans, &mut pending, pending_style);
                pending_style = style;
            }
            pending.push_str(grapheme);
        }
        flush_span(&mut spans, &mut pending, pending_style);
        lines.push(Line::from(spans).alignment(self.alignment));
        Text::from(lines)
    }
}

fn flush_span(spans: &mut Vec<Span<'static>>, pending: &mut String, style: Style) {
    if !pending.is_empty() {
        spans.push(Span::styled(std::mem::take(pending), style));
    }
}

/// Build the attributed text for `text` with every link in `registry`
/// colored, and `highlighted` in the highlight color.
///
/// Records whose range does not fit the text (left over from a longer
/// text) are skipped.
pub fn restyle(
    text: &str,
    registry: &LinkRegistry,
    highlighted: Option<&Link>,
    theme: &LinkTheme,
) -> AttributedText {
    let len = grapheme_len(text);
    let runs = registry
        .iter()
        .filter(|link| link.fits(len))
        .map(|link| StyledRun {
            range: link.range.clone(),
            style: theme.link_style(highlighted == Some(link)),
        })
        .collect();
    AttributedText {
        text: text.to_string(),
        base: theme.base,
        alignment: theme.alignment,
        runs,
    }
}
