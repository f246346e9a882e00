//! Dense tile storage backing a tile map.

use underworld_core::{ConfigError, GridError, Tile};

/// Fixed-size grid of tiles stored in row-major order.
///
/// Every cell always holds a tile; the default tile supplied at construction
/// fills the grid until generators overwrite it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileGrid {
    columns: u32,
    rows: u32,
    tile_width: u32,
    tile_height: u32,
    cells: Vec<Tile>,
}

impl TileGrid {
    /// Allocates a `columns` by `rows` grid filled with `default_tile`.
    ///
    /// Returns an error when either tile dimension is zero or when the cells
    /// would not fit in memory.
    pub fn new(
        columns: u32,
        rows: u32,
        tile_width: u32,
        tile_height: u32,
        default_tile: Tile,
    ) -> Result<Self, ConfigError> {
        if tile_width == 0 || tile_height == 0 {
            return Err(ConfigError::InvalidTileSize {
                width: tile_width,
                height: tile_height,
            });
        }

        let capacity =
            cell_count(columns, rows).ok_or(ConfigError::GridTooLarge { columns, rows })?;
        Ok(Self {
            columns,
            rows,
            tile_width,
            tile_height,
            cells: vec![default_tile; capacity],
        })
    }

    /// Number of tile columns.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of tile rows.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Width of a single tile in pixels.
    #[must_use]
    pub const fn tile_width(&self) -> u32 {
        self.tile_width
    }

    /// Height of a single tile in pixels.
    #[must_use]
    pub const fn tile_height(&self) -> u32 {
        self.tile_height
    }

    /// Total width of the grid in pixels.
    #[must_use]
    pub const fn pixel_width(&self) -> u64 {
        self.columns as u64 * self.tile_width as u64
    }

    /// Total height of the grid in pixels.
    #[must_use]
    pub const fn pixel_height(&self) -> u64 {
        self.rows as u64 * self.tile_height as u64
    }

    /// Reports whether the cell lies inside the grid.
    #[must_use]
    pub const fn contains(&self, column: u32, row: u32) -> bool {
        column < self.columns && row < self.rows
    }

    /// Reads the tile stored at the provided cell.
    pub fn get(&self, column: u32, row: u32) -> Result<Tile, GridError> {
        self.index(column, row)
            .and_then(|index| self.cells.get(index).copied())
            .ok_or_else(|| self.out_of_bounds(column, row))
    }

    /// Overwrites the tile stored at the provided cell.
    pub fn set(&mut self, column: u32, row: u32, tile: Tile) -> Result<(), GridError> {
        let error = self.out_of_bounds(column, row);
        let slot = self
            .index(column, row)
            .and_then(|index| self.cells.get_mut(index))
            .ok_or(error)?;
        *slot = tile;
        Ok(())
    }

    /// Reports whether the cell holds a blocking tile.
    ///
    /// Cells outside the grid never block.
    #[must_use]
    pub fn is_blocked(&self, column: u32, row: u32) -> bool {
        self.get(column, row).map_or(false, |tile| tile.is_blocked())
    }

    /// Row-major slice of every stored tile.
    #[must_use]
    pub fn cells(&self) -> &[Tile] {
        &self.cells
    }

    /// Iterates every cell as `(column, row, tile)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32, Tile)> + '_ {
        let columns = self.columns.max(1);
        self.cells.iter().enumerate().map(move |(index, tile)| {
            let index = index as u64;
            let columns = u64::from(columns);
            ((index % columns) as u32, (index / columns) as u32, *tile)
        })
    }

    pub(crate) fn index(&self, column: u32, row: u32) -> Option<usize> {
        if self.contains(column, row) {
            let row = usize::try_from(row).ok()?;
            let column = usize::try_from(column).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [Tile] {
        &mut self.cells
    }

    fn out_of_bounds(&self, column: u32, row: u32) -> GridError {
        GridError::OutOfBounds {
            column,
            row,
            columns: self.columns,
            rows: self.rows,
        }
    }
}

/// Number of cells in the grid, provided their storage fits in an allocation.
fn cell_count(columns: u32, rows: u32) -> Option<usize> {
    let cells = usize::try_from(u64::from(columns) * u64::from(rows)).ok()?;
    let bytes = cells.checked_mul(std::mem::size_of::<Tile>())?;
    (bytes <= isize::MAX as usize).then_some(cells)
}
