#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that loads an Underworld level and either prints it
//! or walks a rectangle through it.

mod canvas;
mod level;

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use glam::IVec2;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use underworld_core::PixelRect;
use underworld_rendering::render;
use underworld_system_collision::Collision;
use underworld_world::TileMap;

use crate::canvas::TextCanvas;

/// Generate, render and walk tile-grid levels.
#[derive(Debug, Parser)]
#[command(name = "underworld", version)]
struct Cli {
    /// Level manifest to load instead of the built-in keep.
    #[arg(long, global = true)]
    level: Option<PathBuf>,

    /// Seed overriding the one stored in the level manifest.
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Subcommand)]
enum Mode {
    /// Print the tiles under a camera as text.
    Render {
        /// Camera rectangle in pixels as `X,Y,W,H`; defaults to the whole level.
        #[arg(long, value_parser = parse_rect, allow_hyphen_values = true)]
        camera: Option<PixelRect>,
    },
    /// Move a rectangle through the level and report every resolved step.
    Walk {
        /// Upper-left corner of the rectangle in pixels as `X,Y`.
        #[arg(long, value_parser = parse_vector, allow_hyphen_values = true)]
        from: IVec2,

        /// Rectangle size in pixels as `W,H`.
        #[arg(long, value_parser = parse_vector)]
        size: IVec2,

        /// Displacement requested on every tick as `DX,DY`.
        #[arg(long, value_parser = parse_vector, allow_hyphen_values = true)]
        velocity: IVec2,

        /// Number of ticks to simulate.
        #[arg(long, default_value_t = 10)]
        ticks: u32,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let map = load_level(cli.level.as_deref(), cli.seed)?;

    match cli.mode {
        Mode::Render { camera } => render_level(&map, camera),
        Mode::Walk {
            from,
            size,
            velocity,
            ticks,
        } => walk(&map, PixelRect::new(from.x, from.y, size.x, size.y), velocity, ticks),
    }

    Ok(())
}

/// Filter built from `RUST_LOG` directives, or `info` when they are absent or
/// do not parse.
fn log_filter(directives: Option<String>) -> EnvFilter {
    directives
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

fn load_level(path: Option<&Path>, seed: Option<u64>) -> Result<TileMap> {
    let Some(path) = path else {
        return level::load(level::BUILTIN_LEVEL, seed)
            .context("failed to build the built-in level");
    };

    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read level manifest {}", path.display()))?;
    level::load(&source, seed)
        .with_context(|| format!("failed to build level {}", path.display()))
}

fn render_level(map: &TileMap, camera: Option<PixelRect>) {
    let grid = map.grid();
    let camera = camera.unwrap_or_else(|| {
        PixelRect::new(
            0,
            0,
            i32::try_from(grid.pixel_width()).unwrap_or(i32::MAX),
            i32::try_from(grid.pixel_height()).unwrap_or(i32::MAX),
        )
    });

    let mut canvas = TextCanvas::new(grid, camera);
    let drawn = render(&mut canvas, grid, camera);
    info!(drawn, ?camera, "rendered level");
    println!("{canvas}");
}

fn walk(map: &TileMap, mut rect: PixelRect, velocity: IVec2, ticks: u32) {
    let collision = Collision;
    let mut collisions = 0;

    for tick in 1..=ticks {
        let step = collision.resolve(map.grid(), rect, velocity.x, velocity.y);
        rect = rect.translated(step.dx, step.dy);
        if step.collided {
            collisions += 1;
        }
        println!(
            "tick {tick:>3}: moved ({:>4}, {:>4}) to ({}, {}){}",
            step.dx,
            step.dy,
            rect.x(),
            rect.y(),
            if step.collided { " [blocked]" } else { "" },
        );
    }

    if collisions == ticks && ticks > 0 {
        warn!(?rect, "rectangle was blocked on every tick");
    }
    info!(ticks, collisions, ?rect, "walk finished");
}

fn parse_numbers<const N: usize>(value: &str) -> Result<[i32; N], String> {
    let parts: Vec<&str> = value.split(',').map(str::trim).collect();
    if parts.len() != N {
        return Err(format!(
            "expected {} comma-separated integers, got `{value}`",
            N
        ));
    }

    let mut numbers = [0; N];
    for (slot, part) in numbers.iter_mut().zip(parts) {
        *slot = part
            .parse()
            .map_err(|error| format!("`{part}` is not an integer: {error}"))?;
    }
    Ok(numbers)
}

fn parse_rect(value: &str) -> Result<PixelRect, String> {
    let [x, y, width, height] = parse_numbers::<4>(value)?;
    Ok(PixelRect::new(x, y, width, height))
}

fn parse_vector(value: &str) -> Result<IVec2, String> {
    let [x, y] = parse_numbers::<2>(value)?;
    Ok(IVec2::new(x, y))
}
