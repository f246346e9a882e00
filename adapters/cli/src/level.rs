//! TOML level manifests describing tiles, tile sets and generation steps.

use std::sync::Arc;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};
use underworld_core::{Command, ConfigError, Tile, VisualHandle, AUTO_TILE_VARIANTS};
use underworld_world::{apply, TileMap, TileRegistry};

/// Manifest compiled into the binary and used when no level file is given.
pub(crate) const BUILTIN_LEVEL: &str = include_str!("../levels/keep.toml");

/// Problems encountered while turning a manifest into a tile map.
#[derive(Debug, Error)]
pub(crate) enum LevelError {
    /// The manifest is not valid TOML or does not match the expected layout.
    #[error("level manifest is malformed: {0}")]
    Parse(#[from] toml::de::Error),
    /// Registering tiles or creating the map failed.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// A glyph-defined set did not list one glyph per auto-tile variant.
    #[error("tile set `{set}` lists {count} glyphs, expected 16")]
    GlyphCount {
        /// Name of the offending set.
        set: String,
        /// Number of glyphs found.
        count: usize,
    },
    /// A set listed both or neither of `glyphs` and `tiles`.
    #[error("tile set `{set}` must list exactly one of `glyphs` or `tiles`")]
    SetSource {
        /// Name of the offending set.
        set: String,
    },
    /// A generation step referenced something the registry does not know.
    #[error("generation step {index} failed")]
    Step {
        /// Zero-based position of the step in the manifest.
        index: usize,
        /// Underlying failure.
        source: ConfigError,
    },
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Manifest {
    #[serde(default)]
    seed: u64,
    grid: GridSection,
    #[serde(default)]
    tiles: Vec<TileEntry>,
    #[serde(default)]
    sets: Vec<SetEntry>,
    #[serde(default)]
    steps: Vec<Command>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct GridSection {
    columns: u32,
    rows: u32,
    tile_width: u32,
    tile_height: u32,
    default_tile: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TileEntry {
    name: String,
    glyph: char,
    #[serde(default)]
    blocked: bool,
}

/// Either `glyphs` defines fresh `{name}.{index}` variant tiles (which take
/// `blocked`) or `tiles` groups tiles defined earlier.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SetEntry {
    name: String,
    #[serde(default)]
    blocked: bool,
    glyphs: Option<String>,
    tiles: Option<Vec<String>>,
}

/// Visual handle of a glyph; terminal targets turn it back into the `char`.
pub(crate) fn glyph_visual(glyph: char) -> VisualHandle {
    VisualHandle::new(u32::from(glyph))
}

/// Builds the level described by `source`.
///
/// `seed` overrides the manifest's own seed when present.
pub(crate) fn load(source: &str, seed: Option<u64>) -> Result<TileMap, LevelError> {
    let manifest: Manifest = toml::from_str(source)?;
    let registry = build_registry(&manifest)?;
    let default_tile = registry.require_tile(&manifest.grid.default_tile)?;

    let grid = &manifest.grid;
    let mut map = TileMap::new(
        Arc::new(registry),
        default_tile,
        grid.columns,
        grid.rows,
        grid.tile_width,
        grid.tile_height,
    )?;

    let seed = seed.unwrap_or(manifest.seed);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    for (index, step) in manifest.steps.iter().enumerate() {
        debug!(index, ?step, "applying generation step");
        apply(&mut map, step, &mut rng).map_err(|source| LevelError::Step { index, source })?;
    }

    info!(
        columns = grid.columns,
        rows = grid.rows,
        tiles = map.registry().len(),
        steps = manifest.steps.len(),
        seed,
        "level loaded"
    );
    Ok(map)
}

fn build_registry(manifest: &Manifest) -> Result<TileRegistry, LevelError> {
    let mut registry = TileRegistry::new();
    for entry in &manifest.tiles {
        let _ = registry.define(entry.name.as_str(), glyph_visual(entry.glyph), entry.blocked)?;
    }

    for set in &manifest.sets {
        let members = match (&set.glyphs, &set.tiles) {
            (Some(glyphs), None) => define_variants(&mut registry, set, glyphs)?,
            (None, Some(names)) => names
                .iter()
                .map(|name| registry.require_tile(name))
                .collect::<Result<Vec<Tile>, _>>()?,
            _ => {
                return Err(LevelError::SetSource {
                    set: set.name.clone(),
                })
            }
        };
        registry.define_set(set.name.as_str(), members)?;
    }

    Ok(registry)
}

fn define_variants(
    registry: &mut TileRegistry,
    set: &SetEntry,
    glyphs: &str,
) -> Result<Vec<Tile>, LevelError> {
    let count = glyphs.chars().count();
    if count != AUTO_TILE_VARIANTS {
        return Err(LevelError::GlyphCount {
            set: set.name.clone(),
            count,
        });
    }

    glyphs
        .chars()
        .enumerate()
        .map(|(index, glyph)| {
            registry
                .define(
                    format!("{}.{index}", set.name),
                    glyph_visual(glyph),
                    set.blocked,
                )
                .map_err(LevelError::from)
        })
        .collect()
}
