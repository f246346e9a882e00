//! Render target that lays tile glyphs out as lines of text.

use std::fmt;

use glam::IVec2;
use underworld_core::{PixelRect, VisualHandle};
use underworld_rendering::{visible_span, RenderTarget};
use underworld_world::TileGrid;

const BLANK: char = ' ';
const UNKNOWN: char = '?';

/// One character per visible tile, sized to the camera's view of a grid.
#[derive(Clone, Debug)]
pub(crate) struct TextCanvas {
    origin: (i64, i64),
    tile_width: i64,
    tile_height: i64,
    columns: usize,
    rows: usize,
    glyphs: Vec<char>,
}

impl TextCanvas {
    /// Creates a blank canvas covering the cells of `grid` under `camera`.
    pub(crate) fn new(grid: &TileGrid, camera: PixelRect) -> Self {
        let span = visible_span(grid, camera);
        let tile_width = i64::from(grid.tile_width());
        let tile_height = i64::from(grid.tile_height());
        let origin = (
            i64::from(span.columns.start) * tile_width - i64::from(camera.x()),
            i64::from(span.rows.start) * tile_height - i64::from(camera.y()),
        );
        let (columns, rows) = (span.columns.len(), span.rows.len());

        Self {
            origin,
            tile_width,
            tile_height,
            columns,
            rows,
            glyphs: vec![BLANK; columns * rows],
        }
    }

    fn slot(&self, position: IVec2) -> Option<usize> {
        let column = (i64::from(position.x) - self.origin.0).div_euclid(self.tile_width);
        let row = (i64::from(position.y) - self.origin.1).div_euclid(self.tile_height);
        let column = usize::try_from(column).ok().filter(|c| *c < self.columns)?;
        let row = usize::try_from(row).ok().filter(|r| *r < self.rows)?;
        Some(row * self.columns + column)
    }
}

impl RenderTarget for TextCanvas {
    fn draw(&mut self, visual: VisualHandle, position: IVec2) {
        if let Some(slot) = self.slot(position) {
            self.glyphs[slot] = char::from_u32(visual.get()).unwrap_or(UNKNOWN);
        }
    }
}

impl fmt::Display for TextCanvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.columns == 0 {
            return Ok(());
        }

        for (index, line) in self.glyphs.chunks(self.columns).enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            for glyph in line {
                write!(f, "{glyph}")?;
            }
        }
        Ok(())
    }
}
