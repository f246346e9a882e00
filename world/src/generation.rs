//! Procedural generators that paint shapes onto a tile map.
//!
//! Shapes may extend past the grid; every write is clamped so partially or
//! fully off-grid shapes simply paint fewer cells.

use std::ops::Range;

use rand::Rng;
use tracing::debug;
use underworld_core::{ConfigError, Tile};

use crate::TileMap;

impl TileMap {
    /// Replaces every cell with a tile picked uniformly at random from `names`.
    ///
    /// Each cell is drawn independently, so the result is noise rather than a
    /// balanced tiling. Repeating a name weights the draw towards it.
    pub fn random_fill<R>(&mut self, rng: &mut R, names: &[&str]) -> Result<(), ConfigError>
    where
        R: Rng + ?Sized,
    {
        if names.is_empty() {
            return Err(ConfigError::EmptyTileList);
        }

        let candidates = names
            .iter()
            .map(|name| self.registry.require_tile(name))
            .collect::<Result<Vec<Tile>, _>>()?;

        for cell in self.grid.cells_mut() {
            *cell = candidates[rng.gen_range(0..candidates.len())];
        }

        debug!(candidates = names.len(), "random fill");
        Ok(())
    }

    /// Draws a one tile thick outline of a `width` by `height` box.
    ///
    /// Corner cells belong to two edges and are written twice.
    pub fn add_box(
        &mut self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        name: &str,
    ) -> Result<(), ConfigError> {
        let tile = self.registry.require_tile(name)?;
        if width <= 0 || height <= 0 {
            return Ok(());
        }

        let (x, y) = (i64::from(x), i64::from(y));
        let right = x + i64::from(width) - 1;
        let bottom = y + i64::from(height) - 1;

        let mut painted = 0;
        for column in clamp_span(x, right + 1, self.grid.columns()) {
            painted += self.paint(i64::from(column), y, tile);
            painted += self.paint(i64::from(column), bottom, tile);
        }
        for row in clamp_span(y, bottom + 1, self.grid.rows()) {
            painted += self.paint(x, i64::from(row), tile);
            painted += self.paint(right, i64::from(row), tile);
        }

        debug!(tile = name, painted, "add box");
        Ok(())
    }

    /// Fills the `width` by `height` rectangle anchored at `(x, y)`.
    pub fn add_filled_box(
        &mut self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        name: &str,
    ) -> Result<(), ConfigError> {
        let tile = self.registry.require_tile(name)?;
        let (x, y) = (i64::from(x), i64::from(y));
        let columns = clamp_span(x, x + i64::from(width), self.grid.columns());
        let rows = clamp_span(y, y + i64::from(height), self.grid.rows());

        let mut painted = 0;
        for row in rows {
            for column in columns.clone() {
                painted += self.paint(i64::from(column), i64::from(row), tile);
            }
        }

        debug!(tile = name, painted, "add filled box");
        Ok(())
    }

    /// Fills every cell within `radius` tiles of `(x, y)`.
    ///
    /// Candidates are limited to `max(0, x - radius) .. min(x + radius,
    /// columns - 1)` (rows alike), so the last column and row of the grid are
    /// never painted by a circle.
    pub fn add_circle(
        &mut self,
        x: i32,
        y: i32,
        radius: i32,
        name: &str,
    ) -> Result<(), ConfigError> {
        let tile = self.registry.require_tile(name)?;
        let (cx, cy, radius) = (i64::from(x), i64::from(y), i64::from(radius));
        let column_limit = i64::from(self.grid.columns()) - 1;
        let row_limit = i64::from(self.grid.rows()) - 1;
        let radius_squared = radius * radius;

        let mut painted = 0;
        for column in (cx - radius).max(0)..(cx + radius).min(column_limit) {
            for row in (cy - radius).max(0)..(cy + radius).min(row_limit) {
                let (dx, dy) = (column - cx, row - cy);
                if dx * dx + dy * dy <= radius_squared {
                    painted += self.paint(column, row, tile);
                }
            }
        }

        debug!(tile = name, painted, "add circle");
        Ok(())
    }

    /// Rasterises the segment from `(x0, y0)` to `(x1, y1)` with Bresenham
    /// stepping; cells outside the grid are skipped.
    ///
    /// Only the stretch of the segment that crosses the grid is walked, so far
    /// away endpoints cost no more than near ones.
    pub fn add_line(
        &mut self,
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        name: &str,
    ) -> Result<(), ConfigError> {
        let tile = self.registry.require_tile(name)?;

        let mut painted = 0;
        let cells = bresenham(x0, y0, x1, y1).within(self.grid.columns(), self.grid.rows());
        for (column, row) in cells {
            painted += self.paint(i64::from(column), i64::from(row), tile);
        }

        debug!(tile = name, painted, "add line");
        Ok(())
    }

    /// Outlines the whole grid border.
    pub fn add_edge_wall(&mut self, name: &str) -> Result<(), ConfigError> {
        let width = i32::try_from(self.grid.columns()).unwrap_or(i32::MAX);
        let height = i32::try_from(self.grid.rows()).unwrap_or(i32::MAX);
        self.add_box(0, 0, width, height, name)
    }

    fn paint(&mut self, column: i64, row: i64, tile: Tile) -> u32 {
        let (Ok(column), Ok(row)) = (u32::try_from(column), u32::try_from(row)) else {
            return 0;
        };
        let Some(index) = self.grid.index(column, row) else {
            return 0;
        };
        self.grid.cells_mut()[index] = tile;
        1
    }
}

/// Cells visited by integer Bresenham stepping between two tiles.
///
/// The first item is the starting tile and the last item is the final tile.
#[derive(Clone, Debug)]
pub struct LineCells {
    origin: (i64, i64),
    x: i64,
    y: i64,
    dx: i64,
    dy: i64,
    sx: i64,
    sy: i64,
    error: i64,
    remaining: i64,
}

/// Walks the tiles of the segment from `(x0, y0)` to `(x1, y1)` inclusive.
#[must_use]
pub fn bresenham(x0: i32, y0: i32, x1: i32, y1: i32) -> LineCells {
    let (x0, y0, x1, y1) = (
        i64::from(x0),
        i64::from(y0),
        i64::from(x1),
        i64::from(y1),
    );
    let dx = (x1 - x0).abs();
    let dy = (y1 - y0).abs();

    LineCells {
        origin: (x0, y0),
        x: x0,
        y: y0,
        dx,
        dy,
        sx: if x0 < x1 { 1 } else { -1 },
        sy: if y0 < y1 { 1 } else { -1 },
        error: dx - dy,
        remaining: dx.max(dy) + 1,
    }
}

impl LineCells {
    /// Restricts the walk to the steps whose major-axis coordinate lies
    /// inside a `columns` by `rows` grid.
    ///
    /// The cells yielded are exactly those of the full walk in that range, in
    /// the same order, but the off-grid prefix is skipped in constant time.
    /// Cells whose minor-axis coordinate is off the grid are still yielded.
    /// Steps are counted from the segment's start, so call this on a walk
    /// fresh from [`bresenham`].
    #[must_use]
    pub fn within(mut self, columns: u32, rows: u32) -> Self {
        let steps = self.remaining - 1;
        let x_major = self.dx >= self.dy;
        let (start, step, bound) = if x_major {
            (self.origin.0, self.sx, columns)
        } else {
            (self.origin.1, self.sy, rows)
        };

        let high = i64::from(bound) - 1;
        let (low, high) = if step > 0 {
            (-start, high - start)
        } else {
            (start - high, start)
        };
        let (first, last) = (low.max(0), high.min(steps));
        if first > last {
            self.remaining = 0;
            return self;
        }

        self.skip_to(first, x_major);
        self.remaining = last - first + 1;
        self
    }

    /// Moves to the state the walk has after `steps` iterations.
    fn skip_to(&mut self, steps: i64, x_major: bool) {
        let (dx, dy) = (i128::from(self.dx), i128::from(self.dy));
        let (major, minor) = (dx.max(dy), dx.min(dy));
        let steps = i128::from(steps);

        // The minor axis has advanced ceil((2 * minor * steps - major) / (2 * major)) times.
        let minor_steps = if major == 0 {
            0
        } else {
            (-((major - 2 * minor * steps).div_euclid(2 * major))).max(0)
        };

        let (origin_x, origin_y) = (i128::from(self.origin.0), i128::from(self.origin.1));
        let (sx, sy) = (i128::from(self.sx), i128::from(self.sy));
        let (x, y, error) = if x_major {
            (
                origin_x + steps * sx,
                origin_y + minor_steps * sy,
                dx - dy - steps * dy + minor_steps * dx,
            )
        } else {
            (
                origin_x + minor_steps * sx,
                origin_y + steps * sy,
                dx - dy + steps * dx - minor_steps * dy,
            )
        };

        // All three stay within the span of the i32 endpoints.
        self.x = narrow(x);
        self.y = narrow(y);
        self.error = narrow(error);
    }
}

impl Iterator for LineCells {
    type Item = (i32, i32);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining <= 0 {
            return None;
        }

        // Coordinates never leave the span between the two i32 endpoints.
        let current = (self.x as i32, self.y as i32);
        self.remaining -= 1;
        if self.remaining == 0 {
            return Some(current);
        }

        let doubled = 2 * self.error;
        if doubled > -self.dy {
            self.error -= self.dy;
            self.x += self.sx;
        }
        if doubled < self.dx {
            self.error += self.dx;
            self.y += self.sy;
        }

        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::try_from(self.remaining.max(0)).ok();
        (remaining.unwrap_or(usize::MAX), remaining)
    }
}

fn narrow(value: i128) -> i64 {
    i64::try_from(value).unwrap_or(if value < 0 { i64::MIN } else { i64::MAX })
}

fn clamp_span(start: i64, end: i64, bound: u32) -> Range<u32> {
    let start = start.max(0);
    let end = end.min(i64::from(bound));
    if end <= start {
        return 0..0;
    }

    // Both ends lie within 0..=bound here.
    start as u32..end as u32
}
