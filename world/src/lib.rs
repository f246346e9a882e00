#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative tile world state for Underworld Kerfuffle.
//!
//! A [`TileMap`] owns a [`TileGrid`] and shares the [`TileRegistry`] that
//! issued its tiles. Levels are populated during setup through the generator
//! methods (or by feeding [`Command`] values to [`apply`]), finished with
//! [`TileMap::fix_auto_tiles`], and afterwards only read by collision and
//! rendering.

mod autotile;
mod generation;
mod grid;
mod registry;

use std::sync::Arc;

use rand::Rng;
use underworld_core::{Command, ConfigError, GridError, Tile};

pub use autotile::EdgeMask;
pub use generation::{bresenham, LineCells};
pub use grid::TileGrid;
pub use registry::{TileRegistry, TileSet};

/// Tile grid bound to the registry that defines its tiles.
#[derive(Clone, Debug)]
pub struct TileMap {
    registry: Arc<TileRegistry>,
    grid: TileGrid,
}

impl TileMap {
    /// Creates a `columns` by `rows` map filled with `default_tile`.
    ///
    /// The default tile must have been issued by `registry`.
    pub fn new(
        registry: Arc<TileRegistry>,
        default_tile: Tile,
        columns: u32,
        rows: u32,
        tile_width: u32,
        tile_height: u32,
    ) -> Result<Self, ConfigError> {
        if !registry.issued(&default_tile) {
            return Err(ConfigError::UnregisteredTile(default_tile.key()));
        }

        let grid = TileGrid::new(columns, rows, tile_width, tile_height, default_tile)?;
        Ok(Self { registry, grid })
    }

    /// Registry that issued the map's tiles.
    #[must_use]
    pub fn registry(&self) -> &TileRegistry {
        &self.registry
    }

    /// Read-only access to the underlying grid.
    #[must_use]
    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    /// Reads the tile stored at the provided cell.
    pub fn get(&self, column: u32, row: u32) -> Result<Tile, GridError> {
        self.grid.get(column, row)
    }

    /// Overwrites the tile stored at the provided cell.
    ///
    /// Tiles the map's registry did not issue are refused with
    /// [`GridError::UnregisteredTile`].
    pub fn set(&mut self, column: u32, row: u32, tile: Tile) -> Result<(), GridError> {
        if !self.registry.issued(&tile) {
            return Err(GridError::UnregisteredTile(tile.key()));
        }
        self.grid.set(column, row, tile)
    }
}

/// Executes a single generation command against the map.
///
/// `rng` is only consulted by [`Command::RandomFill`].
pub fn apply<R>(map: &mut TileMap, command: &Command, rng: &mut R) -> Result<(), ConfigError>
where
    R: Rng + ?Sized,
{
    match command {
        Command::RandomFill { tiles } => {
            let names: Vec<&str> = tiles.iter().map(String::as_str).collect();
            map.random_fill(rng, &names)
        }
        Command::AddBox {
            x,
            y,
            width,
            height,
            tile,
        } => map.add_box(*x, *y, *width, *height, tile),
        Command::AddFilledBox {
            x,
            y,
            width,
            height,
            tile,
        } => map.add_filled_box(*x, *y, *width, *height, tile),
        Command::AddCircle { x, y, radius, tile } => map.add_circle(*x, *y, *radius, tile),
        Command::AddLine {
            x0,
            y0,
            x1,
            y1,
            tile,
        } => map.add_line(*x0, *y0, *x1, *y1, tile),
        Command::AddEdgeWall { tile } => map.add_edge_wall(tile),
        Command::FixAutoTiles => {
            let _ = map.fix_auto_tiles();
            Ok(())
        }
    }
}

/// Query functions that provide read-only access to a map.
pub mod query {
    use underworld_core::Tile;

    use super::TileMap;

    /// Counts the cells holding a blocking tile.
    #[must_use]
    pub fn blocked_cells(map: &TileMap) -> usize {
        map.grid()
            .cells()
            .iter()
            .filter(|tile| tile.is_blocked())
            .count()
    }

    /// Counts the cells holding exactly the provided tile.
    #[must_use]
    pub fn count_of(map: &TileMap, tile: Tile) -> usize {
        map.grid()
            .cells()
            .iter()
            .filter(|cell| cell.key() == tile.key())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use underworld_core::{TileKey, VisualHandle};

    fn registry() -> (Arc<TileRegistry>, Tile, Tile) {
        let mut registry = TileRegistry::new();
        let floor = registry
            .define("floor", VisualHandle::new(0), false)
            .expect("floor");
        let wall = registry
            .define("wall", VisualHandle::new(1), true)
            .expect("wall");
        (Arc::new(registry), floor, wall)
    }

    #[test]
    fn new_rejects_default_tile_from_elsewhere() {
        let (registry, _, _) = registry();
        let stranger = Tile::new(TileKey::new(9), VisualHandle::new(0), false);

        let error = TileMap::new(registry, stranger, 4, 4, 16, 16).expect_err("foreign tile");

        assert_eq!(error, ConfigError::UnregisteredTile(TileKey::new(9)));
    }

    #[test]
    fn apply_executes_generation_commands() {
        let (registry, floor, wall) = registry();
        let mut map = TileMap::new(registry, floor, 6, 5, 16, 16).expect("valid map");
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        apply(
            &mut map,
            &Command::AddEdgeWall {
                tile: "wall".to_owned(),
            },
            &mut rng,
        )
        .expect("known tile");

        assert_eq!(query::count_of(&map, wall), 2 * 6 + 2 * 3);
        assert_eq!(query::blocked_cells(&map), 18);
        assert_eq!(map.get(2, 2), Ok(floor));
    }

    #[test]
    fn apply_reports_unknown_tiles() {
        let (registry, floor, _) = registry();
        let mut map = TileMap::new(registry, floor, 6, 5, 16, 16).expect("valid map");
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        let error = apply(
            &mut map,
            &Command::AddLine {
                x0: 0,
                y0: 0,
                x1: 3,
                y1: 3,
                tile: "lava".to_owned(),
            },
            &mut rng,
        )
        .expect_err("lava is not defined");

        assert_eq!(error, ConfigError::UnknownTile("lava".to_owned()));
        assert_eq!(query::count_of(&map, floor), 30);
    }
}
