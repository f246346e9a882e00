//! Post-generation pass that turns runs of set tiles into edge and corner
//! variants.

use bitflags::bitflags;
use tracing::info;
use underworld_core::Tile;

use crate::{TileGrid, TileMap, TileSet};

bitflags! {
    /// Orthogonal neighbours that do not belong to a cell's tile set.
    ///
    /// The bits double as the index into a 16-variant [`TileSet`].
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct EdgeMask: u8 {
        /// The neighbour to the left is not part of the set.
        const LEFT = 0b0001;
        /// The neighbour below is not part of the set.
        const BELOW = 0b0010;
        /// The neighbour to the right is not part of the set.
        const RIGHT = 0b0100;
        /// The neighbour above is not part of the set.
        const ABOVE = 0b1000;
    }
}

impl EdgeMask {
    /// Position of the matching variant within a tile set.
    #[must_use]
    pub const fn index(self) -> usize {
        self.bits() as usize
    }

    /// Computes the mask of `(column, row)` with respect to `set`.
    ///
    /// Neighbours beyond the grid border count as outside the set.
    #[must_use]
    pub fn of(grid: &TileGrid, set: &TileSet, column: u32, row: u32) -> Self {
        let outside = |neighbour: Option<(u32, u32)>| {
            neighbour
                .and_then(|(column, row)| grid.get(column, row).ok())
                .map_or(true, |tile| !set.contains(tile.key()))
        };

        let mut mask = Self::empty();
        mask.set(
            Self::ABOVE,
            outside(row.checked_sub(1).map(|above| (column, above))),
        );
        mask.set(
            Self::RIGHT,
            outside(column.checked_add(1).map(|right| (right, row))),
        );
        mask.set(
            Self::BELOW,
            outside(row.checked_add(1).map(|below| (column, below))),
        );
        mask.set(
            Self::LEFT,
            outside(column.checked_sub(1).map(|left| (left, row))),
        );
        mask
    }
}

impl TileMap {
    /// Rewrites every tile that belongs to an auto-tiled set into the variant
    /// matching its neighbourhood.
    ///
    /// The registry guarantees a tile belongs to at most one auto-tiled set.
    /// Masks are computed from the grid as it stood before the pass. Returns the number of cells
    /// whose tile changed, which is zero when the grid is already fixed.
    pub fn fix_auto_tiles(&mut self) -> usize {
        let sets: Vec<&TileSet> = self.registry.auto_tile_sets().map(|(_, set)| set).collect();
        if sets.is_empty() {
            return 0;
        }

        let mut updates: Vec<(usize, Tile)> = Vec::new();
        for (column, row, tile) in self.grid.iter() {
            let Some(set) = sets.iter().find(|set| set.contains(tile.key())) else {
                continue;
            };

            let variant = set.variant(EdgeMask::of(&self.grid, set, column, row));
            if variant == tile {
                continue;
            }

            if let Some(index) = self.grid.index(column, row) {
                updates.push((index, variant));
            }
        }

        let rewritten = updates.len();
        let cells = self.grid.cells_mut();
        for (index, variant) in updates {
            cells[index] = variant;
        }

        info!(sets = sets.len(), rewritten, "fixed auto tiles");
        rewritten
    }
}
