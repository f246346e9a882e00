use std::{collections::BTreeSet, sync::Arc};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use underworld_core::{ConfigError, GridError, Tile, VisualHandle};
use underworld_world::{bresenham, query, TileMap, TileRegistry};

struct Fixture {
    map: TileMap,
    dirt: Tile,
    floor: Tile,
    gravel: Tile,
    wall: Tile,
}

fn fixture(columns: u32, rows: u32) -> Fixture {
    let mut registry = TileRegistry::new();
    let dirt = registry
        .define("dirt", VisualHandle::new(0), false)
        .expect("dirt");
    let floor = registry
        .define("floor", VisualHandle::new(1), false)
        .expect("floor");
    let gravel = registry
        .define("gravel", VisualHandle::new(2), false)
        .expect("gravel");
    let wall = registry
        .define("wall", VisualHandle::new(3), true)
        .expect("wall");
    let map = TileMap::new(Arc::new(registry), dirt, columns, rows, 16, 16).expect("valid map");

    Fixture {
        map,
        dirt,
        floor,
        gravel,
        wall,
    }
}

fn cells_holding(map: &TileMap, tile: Tile) -> BTreeSet<(u32, u32)> {
    map.grid()
        .iter()
        .filter(|(_, _, cell)| *cell == tile)
        .map(|(column, row, _)| (column, row))
        .collect()
}

#[test]
fn filled_box_paints_exactly_its_area() {
    let mut fixture = fixture(10, 8);

    fixture
        .map
        .add_filled_box(2, 2, 4, 4, "floor")
        .expect("floor is defined");

    let expected: BTreeSet<_> = (2..6)
        .flat_map(|column| (2..6).map(move |row| (column, row)))
        .collect();
    assert_eq!(expected.len(), 16);
    assert_eq!(cells_holding(&fixture.map, fixture.floor), expected);
    assert_eq!(query::count_of(&fixture.map, fixture.dirt), 80 - 16);
}

#[test]
fn box_paints_outline_only() {
    let mut fixture = fixture(10, 8);

    fixture
        .map
        .add_box(1, 1, 4, 3, "wall")
        .expect("wall is defined");

    let expected: BTreeSet<_> = [
        (1, 1),
        (2, 1),
        (3, 1),
        (4, 1),
        (1, 2),
        (4, 2),
        (1, 3),
        (2, 3),
        (3, 3),
        (4, 3),
    ]
    .into_iter()
    .collect();
    assert_eq!(cells_holding(&fixture.map, fixture.wall), expected);
}

#[test]
fn box_partially_off_grid_paints_visible_part() {
    let mut fixture = fixture(10, 8);

    fixture
        .map
        .add_box(-2, 6, 5, 4, "wall")
        .expect("off-grid parts are skipped");

    let expected: BTreeSet<_> = [(0, 6), (1, 6), (2, 6), (2, 7)].into_iter().collect();
    assert_eq!(cells_holding(&fixture.map, fixture.wall), expected);
}

#[test]
fn box_fully_off_grid_paints_nothing() {
    let mut fixture = fixture(10, 8);

    fixture
        .map
        .add_box(20, 20, 3, 3, "wall")
        .expect("nothing to paint");
    fixture
        .map
        .add_filled_box(-10, -10, 5, 5, "wall")
        .expect("nothing to paint");

    assert_eq!(query::count_of(&fixture.map, fixture.wall), 0);
}

#[test]
fn edge_wall_outlines_the_grid() {
    let mut fixture = fixture(10, 8);

    fixture.map.add_edge_wall("wall").expect("wall is defined");

    let walls = cells_holding(&fixture.map, fixture.wall);
    assert_eq!(walls.len(), 2 * 10 + 2 * 6);
    assert!(walls
        .iter()
        .all(|(column, row)| *column == 0 || *column == 9 || *row == 0 || *row == 7));
    assert_eq!(query::blocked_cells(&fixture.map), walls.len());
}

#[test]
fn line_follows_exact_bresenham_sequence() {
    let expected = vec![(0, 0), (1, 1), (2, 1), (3, 2), (4, 2), (5, 3)];

    assert_eq!(bresenham(0, 0, 5, 3).collect::<Vec<_>>(), expected);
    assert_eq!(bresenham(0, 0, 5, 3).collect::<Vec<_>>(), expected);

    let mut fixture = fixture(10, 8);
    fixture
        .map
        .add_line(0, 0, 5, 3, "wall")
        .expect("wall is defined");

    let painted: BTreeSet<_> = expected
        .into_iter()
        .map(|(column, row)| (column as u32, row as u32))
        .collect();
    assert_eq!(cells_holding(&fixture.map, fixture.wall), painted);
}

#[test]
fn line_skips_cells_outside_grid() {
    let mut fixture = fixture(10, 8);

    fixture
        .map
        .add_line(-3, -3, 3, 3, "wall")
        .expect("off-grid cells are skipped");

    let expected: BTreeSet<_> = [(0, 0), (1, 1), (2, 2), (3, 3)].into_iter().collect();
    assert_eq!(cells_holding(&fixture.map, fixture.wall), expected);
}

#[test]
fn line_with_far_endpoints_paints_only_the_crossing() {
    let mut fixture = fixture(10, 8);

    fixture
        .map
        .add_line(-2_000_000_000, -2_000_000_000, 2_000_000_000, 2_000_000_000, "wall")
        .expect("wall is defined");
    fixture
        .map
        .add_line(8, i32::MIN, 8, i32::MAX, "floor")
        .expect("floor is defined");

    let diagonal: BTreeSet<_> = (0..8).map(|cell| (cell, cell)).collect();
    assert_eq!(cells_holding(&fixture.map, fixture.wall), diagonal);
    let column: BTreeSet<_> = (0..8).map(|row| (8, row)).collect();
    assert_eq!(cells_holding(&fixture.map, fixture.floor), column);
}

#[test]
fn circle_keeps_clear_of_last_row_and_column() {
    let mut fixture = fixture(10, 8);

    fixture
        .map
        .add_circle(8, 6, 5, "wall")
        .expect("radius past the edge is clamped");

    let walls = cells_holding(&fixture.map, fixture.wall);
    assert!(walls.contains(&(8, 6)));
    assert!(walls.iter().all(|(column, row)| *column < 9 && *row < 7));
}

#[test]
fn circle_bounding_box_excludes_far_edge() {
    let mut fixture = fixture(10, 8);

    fixture
        .map
        .add_circle(4, 4, 1, "wall")
        .expect("wall is defined");

    let expected: BTreeSet<_> = [(3, 4), (4, 3), (4, 4)].into_iter().collect();
    assert_eq!(cells_holding(&fixture.map, fixture.wall), expected);
}

#[test]
fn random_fill_replays_with_same_seed() {
    let mut first = fixture(10, 8);
    let mut second = fixture(10, 8);

    first
        .map
        .random_fill(&mut ChaCha8Rng::seed_from_u64(99), &["floor", "gravel"])
        .expect("tiles are defined");
    second
        .map
        .random_fill(&mut ChaCha8Rng::seed_from_u64(99), &["floor", "gravel"])
        .expect("tiles are defined");

    assert_eq!(first.map.grid(), second.map.grid());
    assert_eq!(query::count_of(&first.map, first.dirt), 0);
    assert!(query::count_of(&first.map, first.floor) > 0);
    assert!(query::count_of(&first.map, first.gravel) > 0);
    assert_eq!(
        query::count_of(&first.map, first.floor) + query::count_of(&first.map, first.gravel),
        80
    );
}

#[test]
fn random_fill_rejects_bad_tile_lists() {
    let mut fixture = fixture(4, 4);
    let mut rng = ChaCha8Rng::seed_from_u64(1);

    assert_eq!(
        fixture.map.random_fill(&mut rng, &[]),
        Err(ConfigError::EmptyTileList)
    );
    assert_eq!(
        fixture.map.random_fill(&mut rng, &["floor", "lava"]),
        Err(ConfigError::UnknownTile("lava".to_owned()))
    );
    assert_eq!(query::count_of(&fixture.map, fixture.dirt), 16);
}

#[test]
fn direct_access_outside_grid_fails() {
    let mut fixture = fixture(4, 4);

    assert_eq!(
        fixture.map.set(0, 4, fixture.wall),
        Err(GridError::OutOfBounds {
            column: 0,
            row: 4,
            columns: 4,
            rows: 4,
        })
    );
    assert!(fixture.map.get(7, 1).is_err());
    assert_eq!(query::count_of(&fixture.map, fixture.wall), 0);
}

#[test]
fn direct_access_rejects_tiles_from_other_registries() {
    let mut fixture = fixture(4, 4);
    let mut other = TileRegistry::new();
    let _ = other
        .define("first", VisualHandle::new(7), false)
        .expect("first");
    let foreign = other
        .define("lava", VisualHandle::new(9), true)
        .expect("lava");

    assert_eq!(
        fixture.map.set(1, 1, foreign),
        Err(GridError::UnregisteredTile(foreign.key()))
    );
    let forged = Tile::new(fixture.wall.key(), VisualHandle::new(42), false);
    assert_eq!(
        fixture.map.set(1, 1, forged),
        Err(GridError::UnregisteredTile(forged.key()))
    );
    assert_eq!(fixture.map.get(1, 1), Ok(fixture.dirt));

    fixture.map.set(1, 1, fixture.wall).expect("wall is registered");
    assert_eq!(fixture.map.get(1, 1), Ok(fixture.wall));
}
