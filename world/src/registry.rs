//! Named tiles and tile sets shared by every map built from them.

use std::collections::HashMap;

use tracing::debug;
use underworld_core::{ConfigError, Tile, TileKey, VisualHandle, AUTO_TILE_VARIANTS};

use crate::autotile::EdgeMask;

/// Named group of related tiles.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TileSet {
    /// Set made of a single tile.
    Single(Tile),
    /// Sixteen variants indexed by [`EdgeMask`], used for auto-tiling.
    Variants(Box<[Tile; AUTO_TILE_VARIANTS]>),
}

impl TileSet {
    /// Reports whether the tile identified by `key` belongs to the set.
    ///
    /// Every variant counts as a member, so already fixed cells are still
    /// recognised by later passes.
    #[must_use]
    pub fn contains(&self, key: TileKey) -> bool {
        self.tiles().iter().any(|tile| tile.key() == key)
    }

    /// Variant matching the provided edge mask.
    ///
    /// A single-tile set answers with its only tile for every mask.
    #[must_use]
    pub fn variant(&self, mask: EdgeMask) -> Tile {
        match self {
            Self::Single(tile) => *tile,
            Self::Variants(variants) => variants[mask.index()],
        }
    }

    /// Tiles composing the set in registration order.
    #[must_use]
    pub fn tiles(&self) -> &[Tile] {
        match self {
            Self::Single(tile) => std::slice::from_ref(tile),
            Self::Variants(variants) => variants.as_slice(),
        }
    }

    /// Whether the set carries the full variant table needed for auto-tiling.
    #[must_use]
    pub const fn is_auto_tiled(&self) -> bool {
        matches!(self, Self::Variants(_))
    }
}

/// Registry that issues tiles and groups them into named sets.
#[derive(Debug, Default)]
pub struct TileRegistry {
    tiles: Vec<Tile>,
    tile_names: HashMap<String, TileKey>,
    sets: Vec<(String, TileSet)>,
    set_names: HashMap<String, usize>,
}

impl TileRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Defines a new named tile and returns its descriptor.
    pub fn define(
        &mut self,
        name: impl Into<String>,
        visual: VisualHandle,
        blocked: bool,
    ) -> Result<Tile, ConfigError> {
        let name = name.into();
        if self.tile_names.contains_key(&name) {
            return Err(ConfigError::DuplicateTile(name));
        }

        let key = TileKey::new(self.tiles.len() as u32);
        let tile = Tile::new(key, visual, blocked);
        debug!(tile = %name, key = key.get(), blocked, "defined tile");
        self.tiles.push(tile);
        let _ = self.tile_names.insert(name, key);
        Ok(tile)
    }

    /// Groups previously defined tiles under a set name.
    ///
    /// Exactly one tile produces a [`TileSet::Single`]; exactly sixteen
    /// produce a [`TileSet::Variants`] table ordered by edge mask. Two
    /// variant tables may not share a tile, so every tile belongs to at most
    /// one auto-tiled set.
    pub fn define_set(
        &mut self,
        name: impl Into<String>,
        tiles: Vec<Tile>,
    ) -> Result<(), ConfigError> {
        let name = name.into();
        if self.set_names.contains_key(&name) {
            return Err(ConfigError::DuplicateSet(name));
        }

        if let Some(stranger) = tiles.iter().find(|tile| !self.issued(tile)) {
            return Err(ConfigError::UnregisteredTile(stranger.key()));
        }

        let count = tiles.len();
        let set = match count {
            1 => TileSet::Single(tiles[0]),
            AUTO_TILE_VARIANTS => {
                let variants: Box<[Tile; AUTO_TILE_VARIANTS]> = tiles
                    .into_boxed_slice()
                    .try_into()
                    .map_err(|_| ConfigError::InvalidVariantCount {
                        name: name.clone(),
                        count,
                    })?;
                TileSet::Variants(variants)
            }
            _ => return Err(ConfigError::InvalidVariantCount { name, count }),
        };

        if set.is_auto_tiled() {
            let shared = self.auto_tile_sets().find(|(_, existing)| {
                set.tiles()
                    .iter()
                    .any(|tile| existing.contains(tile.key()))
            });
            if let Some((existing, _)) = shared {
                return Err(ConfigError::OverlappingSets {
                    existing: existing.to_owned(),
                    name,
                });
            }
        }

        debug!(set = %name, count, auto_tiled = set.is_auto_tiled(), "defined tile set");
        let _ = self.set_names.insert(name.clone(), self.sets.len());
        self.sets.push((name, set));
        Ok(())
    }

    /// Looks up a tile by name.
    #[must_use]
    pub fn tile(&self, name: &str) -> Option<Tile> {
        self.tile_names
            .get(name)
            .and_then(|key| self.tile_by_key(*key))
    }

    /// Looks up a tile by name, failing when it was never defined.
    pub fn require_tile(&self, name: &str) -> Result<Tile, ConfigError> {
        self.tile(name)
            .ok_or_else(|| ConfigError::UnknownTile(name.to_owned()))
    }

    /// Looks up a tile by the key the registry assigned to it.
    #[must_use]
    pub fn tile_by_key(&self, key: TileKey) -> Option<Tile> {
        usize::try_from(key.get())
            .ok()
            .and_then(|index| self.tiles.get(index).copied())
    }

    /// Looks up a tile set by name.
    #[must_use]
    pub fn set(&self, name: &str) -> Option<&TileSet> {
        self.set_names
            .get(name)
            .and_then(|index| self.sets.get(*index))
            .map(|(_, set)| set)
    }

    /// Sets that participate in auto-tiling, in registration order.
    pub fn auto_tile_sets(&self) -> impl Iterator<Item = (&str, &TileSet)> {
        self.sets
            .iter()
            .filter(|(_, set)| set.is_auto_tiled())
            .map(|(name, set)| (name.as_str(), set))
    }

    /// Number of tiles defined so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Reports whether no tile has been defined yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Reports whether `tile` is exactly the tile this registry issued under
    /// its key.
    pub(crate) fn issued(&self, tile: &Tile) -> bool {
        self.tile_by_key(tile.key()).as_ref() == Some(tile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_with_variants(prefix: &str, count: usize) -> (TileRegistry, Vec<Tile>) {
        let mut registry = TileRegistry::new();
        let tiles = (0..count)
            .map(|index| {
                registry
                    .define(format!("{prefix}.{index}"), VisualHandle::new(index as u32), true)
                    .expect("fresh name")
            })
            .collect();
        (registry, tiles)
    }

    #[test]
    fn define_assigns_sequential_keys() {
        let mut registry = TileRegistry::new();
        let floor = registry
            .define("floor", VisualHandle::new(0), false)
            .expect("floor");
        let wall = registry
            .define("wall", VisualHandle::new(1), true)
            .expect("wall");

        assert_eq!(floor.key(), TileKey::new(0));
        assert_eq!(wall.key(), TileKey::new(1));
        assert_eq!(registry.tile("wall"), Some(wall));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn define_rejects_duplicate_names() {
        let mut registry = TileRegistry::new();
        let _ = registry
            .define("floor", VisualHandle::new(0), false)
            .expect("floor");

        let error = registry
            .define("floor", VisualHandle::new(1), true)
            .expect_err("duplicate name");

        assert_eq!(error, ConfigError::DuplicateTile("floor".to_owned()));
    }

    #[test]
    fn define_set_accepts_single_tile() {
        let (mut registry, tiles) = registry_with_variants("rock", 1);

        registry
            .define_set("rocks", tiles.clone())
            .expect("single entry set");

        let set = registry.set("rocks").expect("set registered");
        assert_eq!(set, &TileSet::Single(tiles[0]));
        assert_eq!(registry.auto_tile_sets().count(), 0);
    }

    #[test]
    fn define_set_accepts_sixteen_variants() {
        let (mut registry, tiles) = registry_with_variants("brick", AUTO_TILE_VARIANTS);

        registry
            .define_set("brick_tiles", tiles.clone())
            .expect("variant set");

        let set = registry.set("brick_tiles").expect("set registered");
        assert!(set.is_auto_tiled());
        assert_eq!(set.variant(EdgeMask::ABOVE | EdgeMask::LEFT), tiles[9]);
        assert!(tiles.iter().all(|tile| set.contains(tile.key())));
        let names: Vec<_> = registry.auto_tile_sets().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["brick_tiles"]);
    }

    #[test]
    fn define_set_rejects_other_counts() {
        let (mut registry, tiles) = registry_with_variants("brick", 3);

        let error = registry
            .define_set("brick_tiles", tiles)
            .expect_err("three entries are invalid");

        assert_eq!(
            error,
            ConfigError::InvalidVariantCount {
                name: "brick_tiles".to_owned(),
                count: 3,
            }
        );
        assert!(registry.set("brick_tiles").is_none());
    }

    #[test]
    fn define_set_rejects_duplicate_names() {
        let (mut registry, tiles) = registry_with_variants("rock", 1);
        registry
            .define_set("rocks", tiles.clone())
            .expect("first definition");

        let error = registry
            .define_set("rocks", tiles)
            .expect_err("redefinition");

        assert_eq!(error, ConfigError::DuplicateSet("rocks".to_owned()));
    }

    #[test]
    fn define_set_rejects_variant_tables_sharing_tiles() {
        let (mut registry, castle) = registry_with_variants("castle", AUTO_TILE_VARIANTS);
        let mut brick: Vec<Tile> = (0..AUTO_TILE_VARIANTS)
            .map(|index| {
                registry
                    .define(format!("brick.{index}"), VisualHandle::new(100), true)
                    .expect("fresh name")
            })
            .collect();
        brick[0] = castle[0];
        registry
            .define_set("castle", castle.clone())
            .expect("first variant table");

        let error = registry
            .define_set("brick", brick)
            .expect_err("castle.0 already belongs to castle");

        assert_eq!(
            error,
            ConfigError::OverlappingSets {
                name: "brick".to_owned(),
                existing: "castle".to_owned(),
            }
        );
        assert!(registry.set("brick").is_none());

        registry
            .define_set("keystone", vec![castle[0]])
            .expect("single tile sets do not auto-tile");
        assert_eq!(registry.auto_tile_sets().count(), 1);
    }

    #[test]
    fn define_set_rejects_foreign_tiles() {
        let mut registry = TileRegistry::new();
        let foreign = Tile::new(TileKey::new(42), VisualHandle::new(0), false);

        let error = registry
            .define_set("strangers", vec![foreign])
            .expect_err("tile was never issued");

        assert_eq!(error, ConfigError::UnregisteredTile(TileKey::new(42)));
    }

    #[test]
    fn require_tile_reports_unknown_names() {
        let registry = TileRegistry::new();

        assert_eq!(
            registry.require_tile("lava"),
            Err(ConfigError::UnknownTile("lava".to_owned()))
        );
    }
}
