use ratatui::layout::Alignment;
use ratatui::style::{Color, Modifier, Style};

// Accent palette. RGB values are mapped to what the terminal supports via
// `rgb_to_color`.

pub const LINK_RGB: (u8, u8, u8) = (200, 100, 0);
pub const HIGHLIGHTED_LINK_RGB: (u8, u8, u8) = (255, 165, 0);

/// True when `COLORTERM` advertises 24-bit color.
pub fn truecolor_supported() -> bool {
    std::env::var("COLORTERM")
        .map(|value| {
            let value = value.to_lowercase();
            value.contains("truecolor") || value.contains("24bit")
        })
        .unwrap_or(false)
}

/// `Color::Rgb` on truecolor terminals, otherwise the nearest xterm-256
/// palette entry.
pub fn rgb_to_color(rgb: (u8, u8, u8)) -> Color {
    if truecolor_supported() {
        Color::Rgb(rgb.0, rgb.1, rgb.2)
    } else {
        Color::Indexed(xterm_index(rgb))
    }
}

fn xterm_index((r, g, b): (u8, u8, u8)) -> u8 {
    const LEVELS: [u8; 6] = [0, 95, 135, 175, 215, 255];
    let cube = |v: u8| ((v as u16 * 5 + 127) / 255) as u8;
    let (r6, g6, b6) = (cube(r), cube(g), cube(b));
    let cube_rgb = (LEVELS[r6 as usize], LEVELS[g6 as usize], LEVELS[b6 as usize]);

    // Gray ramp 232..=255 covers 8..=238 in steps of 10.
    let avg = (r as u16 + g as u16 + b as u16) / 3;
    let gray_step = (avg.saturating_sub(8) / 10).min(23) as u8;
    let gray = 8 + gray_step * 10;

    if distance_sq((r, g, b), (gray, gray, gray)) < distance_sq((r, g, b), cube_rgb) {
        232 + gray_step
    } else {
        16 + 36 * r6 + 6 * g6 + b6
    }
}

fn distance_sq(a: (u8, u8, u8), b: (u8, u8, u8)) -> u32 {
    let d = |x: u8, y: u8| (x as i32 - y as i32).pow(2) as u32;
    d(a.0, b.0) + d(a.1, b.1) + d(a.2, b.2)
}

/// Colors and alignment used when styling a label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkTheme {
    /// Style applied to the whole text before link overlays.
    pub base: Style,
    pub link_color: Color,
    /// Color of the pressed link; falls back to the accent highlight.
    pub highlighted_link_color: Option<Color>,
    pub underline_links: bool,
    pub alignment: Alignment,
}

impl Default for LinkTheme {
    fn default() -> Self {
        Self {
            base: Style::default(),
            link_color: rgb_to_color(LINK_RGB),
            highlighted_link_color: None,
            underline_links: true,
            alignment: Alignment::Left,
        }
    }
}

impl LinkTheme {
    pub fn effective_highlighted_link_color(&self) -> Color {
        self.highlighted_link_color
            .unwrap_or_else(|| rgb_to_color(HIGHLIGHTED_LINK_RGB))
    }

    /// Base style with the link (or highlighted link) foreground.
    pub fn link_style(&self, highlighted: bool) -> Style {
        let color = if highlighted {
            self.effective_highlighted_link_color()
        } else {
            self.link_color
        };
        let mut style = self.base.fg(color);
        if self.underline_links {
            style = style.add_modifier(Modifier::UNDERLINED);
        }
        style
    }
}
