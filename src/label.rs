//! The label host: owns text, detectors, resolved links and gesture state,
//! and keeps the attributed output in sync with them.

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Position;

use crate::detector::LinkDetector;
use crate::grapheme::grapheme_len;
use crate::hit_test::link_at;
use crate::interaction::LinkInteraction;
use crate::layout::TextLayout;
use crate::link::Link;
use crate::registry::LinkRegistry;
use crate::style::{AttributedText, restyle};
use crate::theme::LinkTheme;

/// Pointer lifecycle events in layout coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    Down(Position),
    Moved(Position),
    Up(Position),
    Cancelled,
}

impl PointerEvent {
    /// Map a left-button crossterm mouse event; other buttons and plain
    /// motion are ignored.
    pub fn from_mouse(mouse: &MouseEvent) -> Option<Self> {
        let position = Position::new(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => Some(Self::Down(position)),
            MouseEventKind::Drag(MouseButton::Left) => Some(Self::Moved(position)),
            MouseEventKind::Up(MouseButton::Left) => Some(Self::Up(position)),
            _ => None,
        }
    }
}

/// A label whose text contains tappable links.
///
/// Changing the text or the detectors rebuilds the link registry and the
/// attributed output; pointer events only restyle, and only when the
/// highlighted link actually changes.
pub struct LinkLabel {
    text: String,
    text_len: usize,
    detectors: Vec<Box<dyn LinkDetector>>,
    registry: LinkRegistry,
    interaction: LinkInteraction,
    theme: LinkTheme,
    attributed: AttributedText,
}

impl Default for LinkLabel {
    fn default() -> Self {
        Self::new("")
    }
}

impl LinkLabel {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let theme = LinkTheme::default();
        let registry = LinkRegistry::new();
        let attributed = restyle(&text, &registry, None, &theme);
        Self {
            text_len: grapheme_len(&text),
            text,
            detectors: Vec::new(),
            registry,
            interaction: LinkInteraction::new(),
            theme,
            attributed,
        }
    }

    pub fn with_detector(mut self, detector: impl LinkDetector + 'static) -> Self {
        self.push_detector(detector);
        self
    }

    pub fn with_theme(mut self, theme: LinkTheme) -> Self {
        self.set_theme(theme);
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.text_len = grapheme_len(&self.text);
        self.update_links();
    }

    pub fn detectors(&self) -> &[Box<dyn LinkDetector>] {
        &self.detectors
    }

    pub fn set_detectors(&mut self, detectors: Vec<Box<dyn LinkDetector>>) {
        self.detectors = detectors;
        self.update_links();
    }

    pub fn push_detector(&mut self, detector: impl LinkDetector + 'static) {
        self.detectors.push(Box::new(detector));
        self.update_links();
    }

    pub fn theme(&self) -> &LinkTheme {
        &self.theme
    }

    pub fn set_theme(&mut self, theme: LinkTheme) {
        self.theme = theme;
        self.highlight_links();
    }

    /// Register a callback that runs for every tapped link.
    pub fn when_link_is_tapped<F>(&mut self, callback: F)
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.interaction.when_link_is_tapped(callback);
    }

    pub fn links(&self) -> &[Link] {
        self.registry.links()
    }

    pub fn highlighted_link(&self) -> Option<&Link> {
        self.interaction.highlighted_link()
    }

    pub fn attributed_text(&self) -> &AttributedText {
        &self.attributed
    }

    /// Link under `location` according to `layout`.
    pub fn link_at<L: TextLayout + ?Sized>(&self, layout: &L, location: Position) -> Option<&Link> {
        link_at(&self.registry, layout, self.text_len, location)
    }

    /// Feed one pointer event through hit-testing and the gesture state.
    /// Returns true when the attributed text was restyled.
    pub fn handle_pointer<L: TextLayout + ?Sized>(
        &mut self,
        event: PointerEvent,
        layout: &L,
    ) -> bool {
        let changed = match event {
            PointerEvent::Down(location) => {
                let hit = link_at(&self.registry, layout, self.text_len, location);
                self.interaction.press(hit)
            }
            PointerEvent::Moved(location) => {
                let hit = link_at(&self.registry, layout, self.text_len, location);
                self.interaction.drag(hit)
            }
            PointerEvent::Up(location) => {
                let was_pressed = self.interaction.is_pressed();
                let hit = link_at(&self.registry, layout, self.text_len, location);
                self.interaction.release(hit, &self.text);
                was_pressed
            }
            PointerEvent::Cancelled => self.interaction.cancel(),
        };
        if changed {
            self.highlight_links();
        }
        changed
    }

    fn update_links(&mut self) {
        self.registry.rebuild(&self.text, &self.detectors);
        self.highlight_links();
    }

    fn highlight_links(&mut self) {
        self.attributed = restyle(
            &self.text,
            &self.registry,
            self.interaction.highlighted_link(),
            &self.theme,
        );
    }
}

impl std::fmt::Debug for LinkLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkLabel")
            .field("text", &self.text)
            .field("detectors", &self.detectors.len())
            .field("registry", &self.registry)
            .field("interaction", &self.interaction)
            .finish()
    }
}
