#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Viewport rendering contracts for Underworld adapters.
//!
//! The renderer never touches pixels itself. It works out which cells of a
//! [`TileGrid`] fall under a camera rectangle and hands each visible cell's
//! visual to a [`RenderTarget`] together with its screen position.

use std::ops::Range;

use glam::IVec2;
use tracing::trace;
use underworld_core::{PixelRect, VisualHandle};
use underworld_world::TileGrid;

/// Surface that knows how to draw a tile visual at a screen position.
pub trait RenderTarget {
    /// Draws `visual` with its upper-left corner at `position`, in pixels
    /// relative to the camera origin.
    fn draw(&mut self, visual: VisualHandle, position: IVec2);
}

impl<T: RenderTarget + ?Sized> RenderTarget for &mut T {
    fn draw(&mut self, visual: VisualHandle, position: IVec2) {
        (**self).draw(visual, position);
    }
}

/// Single draw issued by [`render`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DrawCall {
    /// Visual that was drawn.
    pub visual: VisualHandle,
    /// Screen position of the visual's upper-left corner.
    pub position: IVec2,
}

/// Render target that records every draw call in issue order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecordingTarget {
    calls: Vec<DrawCall>,
}

impl RecordingTarget {
    /// Creates an empty recording target.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw calls recorded so far.
    #[must_use]
    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    /// Consumes the target, returning the recorded draw calls.
    #[must_use]
    pub fn into_calls(self) -> Vec<DrawCall> {
        self.calls
    }

    /// Forgets every recorded draw call.
    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl RenderTarget for RecordingTarget {
    fn draw(&mut self, visual: VisualHandle, position: IVec2) {
        self.calls.push(DrawCall { visual, position });
    }
}

/// Columns and rows of a grid that lie under a camera.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileSpan {
    /// Visible column indices.
    pub columns: Range<u32>,
    /// Visible row indices.
    pub rows: Range<u32>,
}

impl TileSpan {
    /// Number of cells covered by the span.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len() * self.rows.len()
    }

    /// Reports whether no cell is visible.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() || self.rows.is_empty()
    }
}

/// Computes which cells of `grid` the `camera` rectangle overlaps.
///
/// Both ranges are clamped to the grid, so a camera that is partly or wholly
/// outside the world yields fewer (or no) cells.
#[must_use]
pub fn visible_span(grid: &TileGrid, camera: PixelRect) -> TileSpan {
    TileSpan {
        columns: axis_span(
            camera.x(),
            camera.width(),
            grid.tile_width(),
            grid.columns(),
        ),
        rows: axis_span(camera.y(), camera.height(), grid.tile_height(), grid.rows()),
    }
}

/// Draws every visible cell of `grid` through `target`, row by row.
///
/// Returns the number of draw calls issued.
pub fn render<T>(target: &mut T, grid: &TileGrid, camera: PixelRect) -> usize
where
    T: RenderTarget + ?Sized,
{
    let span = visible_span(grid, camera);
    let tile_width = i64::from(grid.tile_width());
    let tile_height = i64::from(grid.tile_height());
    let (camera_x, camera_y) = (i64::from(camera.x()), i64::from(camera.y()));

    let mut drawn = 0;
    for row in span.rows.clone() {
        let y = screen_coordinate(i64::from(row) * tile_height - camera_y);
        for column in span.columns.clone() {
            let Ok(tile) = grid.get(column, row) else {
                continue;
            };
            let x = screen_coordinate(i64::from(column) * tile_width - camera_x);
            target.draw(tile.visual(), IVec2::new(x, y));
            drawn += 1;
        }
    }

    trace!(?span, drawn, "rendered viewport");
    drawn
}

fn axis_span(origin: i32, extent: i32, tile_length: u32, bound: u32) -> Range<u32> {
    let tile_length = i64::from(tile_length);
    let origin = i64::from(origin);
    let first = origin.div_euclid(tile_length).max(0);
    let end = (origin + i64::from(extent))
        .div_euclid(tile_length)
        .saturating_add(1)
        .min(i64::from(bound));
    if end <= first {
        return 0..0;
    }

    // Both ends lie within 0..=bound here.
    first as u32..end as u32
}

fn screen_coordinate(value: i64) -> i32 {
    i32::try_from(value).unwrap_or(if value < 0 { i32::MIN } else { i32::MAX })
}
