#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Swept collision resolution of axis-aligned rectangles against a tile grid.
//!
//! Movement is resolved one axis at a time, horizontal first. Along each axis
//! the resolver walks the tile columns (or rows) the rectangle's leading edge
//! would sweep through, nearest first, and stops the rectangle one pixel short
//! of the first blocking tile. Tiles inside the rectangle's current footprint
//! are never examined, so a rectangle that already overlaps a wall can always
//! leave it. Space outside the grid never blocks.

use std::ops::Range;

use tracing::trace;
use underworld_core::{PixelRect, Resolution};
use underworld_world::TileGrid;

/// Pure system answering "how far can this rectangle move?".
#[derive(Clone, Copy, Debug, Default)]
pub struct Collision;

impl Collision {
    /// Clamps the displacement `(dx, dy)` of `rect` against blocking tiles.
    ///
    /// The rectangle is treated as covering `x..=x + width` and
    /// `y..=y + height`. The returned displacement never exceeds the request
    /// and always keeps its sign (or drops to zero).
    #[must_use]
    pub fn resolve(&self, grid: &TileGrid, rect: PixelRect, dx: i32, dy: i32) -> Resolution {
        if dx == 0 && dy == 0 {
            return Resolution::STILL;
        }

        let tile_width = i64::from(grid.tile_width());
        let tile_height = i64::from(grid.tile_height());
        let (x, y) = (i64::from(rect.x()), i64::from(rect.y()));
        let (width, height) = (i64::from(rect.width()), i64::from(rect.height()));
        let (mut dx, mut dy) = (i64::from(dx), i64::from(dy));
        let mut collided = false;

        let rows = span(
            tile_index(y, tile_height),
            tile_index(y + height, tile_height),
            grid.rows(),
        );
        let column_blocked = |column: u32| rows.clone().any(|row| grid.is_blocked(column, row));

        if dx > 0 {
            let nearest = tile_index(x + width, tile_width) + 1;
            let farthest = tile_index(x + width + dx, tile_width);
            if let Some(column) =
                span(nearest, farthest, grid.columns()).find(|c| column_blocked(*c))
            {
                dx = i64::from(column) * tile_width - width - 1 - x;
                collided = true;
                trace!(column, dx, "blocked moving right");
            }
        } else if dx < 0 {
            let nearest = tile_index(x, tile_width) - 1;
            let farthest = tile_index(x + dx, tile_width);
            if let Some(column) = span(farthest, nearest, grid.columns())
                .rev()
                .find(|c| column_blocked(*c))
            {
                dx = (i64::from(column) + 1) * tile_width - x;
                collided = true;
                trace!(column, dx, "blocked moving left");
            }
        }

        let columns = span(
            tile_index(x + dx, tile_width),
            tile_index(x + dx + width, tile_width),
            grid.columns(),
        );
        let row_blocked = |row: u32| columns.clone().any(|column| grid.is_blocked(column, row));

        if dy > 0 {
            let nearest = tile_index(y + height, tile_height) + 1;
            let farthest = tile_index(y + height + dy, tile_height);
            if let Some(row) = span(nearest, farthest, grid.rows()).find(|r| row_blocked(*r)) {
                dy = i64::from(row) * tile_height - height - 1 - y;
                collided = true;
                trace!(row, dy, "blocked moving down");
            }
        } else if dy < 0 {
            let nearest = tile_index(y, tile_height) - 1;
            let farthest = tile_index(y + dy, tile_height);
            if let Some(row) = span(farthest, nearest, grid.rows())
                .rev()
                .find(|r| row_blocked(*r))
            {
                dy = (i64::from(row) + 1) * tile_height - y;
                collided = true;
                trace!(row, dy, "blocked moving up");
            }
        }

        // Clamped values lie between zero and the i32 request.
        Resolution::new(dx as i32, dy as i32, collided)
    }
}

/// Tile index containing the pixel coordinate (floor division).
fn tile_index(pixel: i64, tile_length: i64) -> i64 {
    pixel.div_euclid(tile_length)
}

/// Inclusive tile range `first..=last` clipped to `0..bound`.
fn span(first: i64, last: i64, bound: u32) -> Range<u32> {
    let start = first.max(0);
    let end = last.saturating_add(1).min(i64::from(bound));
    if end <= start {
        return 0..0;
    }

    start as u32..end as u32
}
