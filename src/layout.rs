//! Geometry collaborator used by hit-testing.
//!
//! [`TextLayout`] is the seam between the link engine and whatever lays the
//! text out on screen. [`GridLayout`] is the terminal implementation: one
//! grapheme per cell run, `\n` hard breaks, optional character wrapping at
//! the area width and horizontal alignment per row.

use std::ops::Range;

use ratatui::layout::{Alignment, Position, Rect};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Maps screen locations to grapheme indices and grapheme ranges back to
/// screen rectangles.
pub trait TextLayout {
    /// Index of the grapheme nearest to `location`, or `None` when nothing
    /// is laid out.
    fn character_index_at(&self, location: Position) -> Option<usize>;

    /// Rectangle covering every cell of `range`, or `None` when the range is
    /// empty or not laid out.
    fn bounding_rect(&self, range: Range<usize>) -> Option<Rect>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct GlyphCell {
    row: u16,
    col: u16,
    width: u16,
}

/// Monospaced layout of a string inside a terminal area.
#[derive(Debug, Clone, Default)]
pub struct GridLayout {
    area: Rect,
    cells: Vec<GlyphCell>,
    rows: Vec<Range<usize>>,
}

impl GridLayout {
    pub fn new(text: &str, area: Rect, wrap: bool, alignment: Alignment) -> Self {
        let mut cells = Vec::new();
        let mut rows = Vec::new();
        let mut row_start = 0usize;
        let mut row: u16 = 0;
        let mut col: u16 = 0;

        for grapheme in text.graphemes(true) {
            let index = cells.len();
            if is_hard_break(grapheme) {
                cells.push(GlyphCell { row, col, width: 0 });
                rows.push(row_start..index + 1);
                row_start = index + 1;
                row = row.saturating_add(1);
                col = 0;
                continue;
            }
            let width = grapheme.width() as u16;
            if wrap && col > 0 && col.saturating_add(width) > area.width {
                rows.push(row_start..index);
                row_start = index;
                row = row.saturating_add(1);
                col = 0;
            }
            cells.push(GlyphCell { row, col, width });
            col = col.saturating_add(width);
        }
        if row_start < cells.len() {
            rows.push(row_start..cells.len());
        }

        for range in &rows {
            let row_width = range
                .clone()
                .last()
                .map(|last| cells[last].col.saturating_add(cells[last].width))
                .unwrap_or(0);
            let offset = match alignment {
                Alignment::Left => 0,
                Alignment::Center => area.width.saturating_sub(row_width) / 2,
                Alignment::Right => area.width.saturating_sub(row_width),
            };
            for cell in &mut cells[range.clone()] {
                cell.col = cell.col.saturating_add(offset);
            }
        }

        Self { area, cells, rows }
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    /// Number of visual rows, including rows that fall below the area.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Top-left cell of grapheme `index`.
    pub fn position_of(&self, index: usize) -> Option<Position> {
        self.cells.get(index).map(|cell| {
            Position::new(
                self.area.x.saturating_add(cell.col),
                self.area.y.saturating_add(cell.row),
            )
        })
    }

    fn cell_rect(&self, cell: GlyphCell) -> Rect {
        Rect {
            x: self.area.x.saturating_add(cell.col),
            y: self.area.y.saturating_add(cell.row),
            width: cell.width.max(1),
            height: 1,
        }
    }
}

impl TextLayout for GridLayout {
    fn character_index_at(&self, location: Position) -> Option<usize> {
        let last_row = self.rows.len().checked_sub(1)?;
        let row = (location.y.saturating_sub(self.area.y) as usize).min(last_row);
        let x = location.x.saturating_sub(self.area.x);
        let range = self.rows[row].clone();
        range
            .clone()
            .find(|&idx| {
                let cell = self.cells[idx];
                x < cell.col.saturating_add(cell.width)
            })
            .or_else(|| range.last())
    }

    fn bounding_rect(&self, range: Range<usize>) -> Option<Rect> {
        self.cells
            .get(range)?
            .iter()
            .map(|cell| self.cell_rect(*cell))
            .reduce(Rect::union)
    }
}

fn is_hard_break(grapheme: &str) -> bool {
    matches!(grapheme, "\n" | "\r\n")
}
