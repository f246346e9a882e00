#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Underworld Kerfuffle tile world.
//!
//! This crate defines the vocabulary that connects the registry, the tile
//! map, the collision resolver and rendering adapters. Tiles are plain
//! [`Tile`] descriptors identified by a [`TileKey`]; level layouts are
//! expressed as [`Command`] values that the world executes against a map;
//! pixel-space rectangles are exchanged as [`PixelRect`] values and collision
//! answers come back as [`Resolution`] values.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of variants required by a tile set that participates in auto-tiling.
pub const AUTO_TILE_VARIANTS: usize = 16;

/// Stable identifier assigned to every tile by the registry that defined it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileKey(u32);

impl TileKey {
    /// Creates a new tile key with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the key.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Opaque handle to a drawable owned by the orchestration layer.
///
/// The core never interprets the value; rendering targets map it back to
/// whatever image, sprite or glyph the adapter loaded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VisualHandle(u32);

impl VisualHandle {
    /// Creates a new visual handle with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the handle.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Immutable descriptor of a tile's static content.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Tile {
    key: TileKey,
    visual: VisualHandle,
    blocked: bool,
}

impl Tile {
    /// Creates a new tile descriptor.
    ///
    /// Tiles are normally issued by a registry, which guarantees that keys
    /// are unique.
    #[must_use]
    pub const fn new(key: TileKey, visual: VisualHandle, blocked: bool) -> Self {
        Self {
            key,
            visual,
            blocked,
        }
    }

    /// Identifier used for set membership checks.
    #[must_use]
    pub const fn key(&self) -> TileKey {
        self.key
    }

    /// Drawable associated with the tile.
    #[must_use]
    pub const fn visual(&self) -> VisualHandle {
        self.visual
    }

    /// Reports whether moving rectangles are stopped by this tile.
    #[must_use]
    pub const fn is_blocked(&self) -> bool {
        self.blocked
    }
}

/// Axis-aligned rectangle expressed in pixel space.
///
/// The rectangle spans `x..=x + width` for collision purposes: the far edge
/// is treated as touching the tile it lands in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelRect {
    x: i32,
    y: i32,
    width: i32,
    height: i32,
}

impl PixelRect {
    /// Creates a rectangle from its upper-left corner and size.
    #[must_use]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Horizontal position of the left edge.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Vertical position of the top edge.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Width of the rectangle in pixels.
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.width
    }

    /// Height of the rectangle in pixels.
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.height
    }

    /// Position of the right edge (`x + width`).
    #[must_use]
    pub const fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    /// Position of the bottom edge (`y + height`).
    #[must_use]
    pub const fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// Returns a copy of the rectangle moved by the provided displacement.
    #[must_use]
    pub const fn translated(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
            width: self.width,
            height: self.height,
        }
    }
}

/// Outcome of a swept collision query.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Resolution {
    /// Horizontal displacement the rectangle may safely travel.
    pub dx: i32,
    /// Vertical displacement the rectangle may safely travel.
    pub dy: i32,
    /// Whether either axis was shortened by a blocking tile.
    pub collided: bool,
}

impl Resolution {
    /// Resolution describing a rectangle that stays put without colliding.
    pub const STILL: Self = Self {
        dx: 0,
        dy: 0,
        collided: false,
    };

    /// Creates a new resolution.
    #[must_use]
    pub const fn new(dx: i32, dy: i32, collided: bool) -> Self {
        Self { dx, dy, collided }
    }
}

/// Level generation commands that a tile map can execute.
///
/// Every variant mirrors one generator operation. Tile names are resolved
/// through the registry the map was created with when the command runs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Command {
    /// Fills every cell with a tile picked uniformly from the list.
    RandomFill {
        /// Candidate tile names; duplicates weight the draw.
        tiles: Vec<String>,
    },
    /// Draws a one tile thick rectangle outline.
    AddBox {
        /// Column of the upper-left corner.
        x: i32,
        /// Row of the upper-left corner.
        y: i32,
        /// Width of the box in tiles.
        width: i32,
        /// Height of the box in tiles.
        height: i32,
        /// Name of the tile to paint.
        tile: String,
    },
    /// Fills a rectangle completely.
    AddFilledBox {
        /// Column of the upper-left corner.
        x: i32,
        /// Row of the upper-left corner.
        y: i32,
        /// Width of the box in tiles.
        width: i32,
        /// Height of the box in tiles.
        height: i32,
        /// Name of the tile to paint.
        tile: String,
    },
    /// Fills a disc centred on a tile.
    AddCircle {
        /// Column of the centre.
        x: i32,
        /// Row of the centre.
        y: i32,
        /// Radius in tiles.
        radius: i32,
        /// Name of the tile to paint.
        tile: String,
    },
    /// Rasterises a line segment between two tiles.
    AddLine {
        /// Column of the starting tile.
        x0: i32,
        /// Row of the starting tile.
        y0: i32,
        /// Column of the final tile.
        x1: i32,
        /// Row of the final tile.
        y1: i32,
        /// Name of the tile to paint.
        tile: String,
    },
    /// Draws an outline along the grid border.
    AddEdgeWall {
        /// Name of the tile to paint.
        tile: String,
    },
    /// Rewrites auto-tiled sets into their edge and corner variants.
    FixAutoTiles,
}

/// Errors raised while registering tiles or preparing a level.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A tile with the same name was already defined.
    #[error("tile `{0}` is already defined")]
    DuplicateTile(String),
    /// A tile set with the same name was already defined.
    #[error("tile set `{0}` is already defined")]
    DuplicateSet(String),
    /// A tile set was registered with neither 1 nor 16 entries.
    #[error("tile set `{name}` has {count} entries, expected 1 or 16")]
    InvalidVariantCount {
        /// Name of the rejected set.
        name: String,
        /// Number of entries supplied.
        count: usize,
    },
    /// A tile name was not found in the registry.
    #[error("tile `{0}` is not defined")]
    UnknownTile(String),
    /// A tile was not issued by the registry it is used with.
    #[error("tile key {} was not issued by this registry", .0.get())]
    UnregisteredTile(TileKey),
    /// Tile pixel dimensions must both be positive.
    #[error("tile dimensions must be positive (received {width}x{height})")]
    InvalidTileSize {
        /// Requested tile width in pixels.
        width: u32,
        /// Requested tile height in pixels.
        height: u32,
    },
    /// A random fill was requested without any candidate tiles.
    #[error("random fill requires at least one tile")]
    EmptyTileList,
    /// An auto-tiled set reused a tile of an earlier auto-tiled set.
    #[error("tile set `{name}` shares tiles with auto-tiled set `{existing}`")]
    OverlappingSets {
        /// Name of the rejected set.
        name: String,
        /// Name of the set that already owns the shared tile.
        existing: String,
    },
    /// The grid has more cells than can be allocated.
    #[error("a {columns}x{rows} grid is too large to allocate")]
    GridTooLarge {
        /// Requested number of columns.
        columns: u32,
        /// Requested number of rows.
        rows: u32,
    },
}

/// Errors raised by direct grid access.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum GridError {
    /// The requested cell lies outside the grid.
    #[error("cell ({column}, {row}) lies outside the {columns}x{rows} grid")]
    OutOfBounds {
        /// Requested column.
        column: u32,
        /// Requested row.
        row: u32,
        /// Number of columns in the grid.
        columns: u32,
        /// Number of rows in the grid.
        rows: u32,
    },
    /// The tile was not issued by the registry the grid was built from.
    #[error("tile key {} was not issued by this map's registry", .0.get())]
    UnregisteredTile(TileKey),
}
