//! Sparse tile-based level grid with mask and file loading
//!
//! A `TileGrid` maps integer coordinates to tiles and keeps a palette's spawned
//! representations in step with that mapping. Levels can be built from
//! occupancy masks (usually decoded from images) or coordinate/tile
//! collections, and saved to or loaded from named stores.

#![forbid(unsafe_code)]

/// Input/output: errors, configuration, images, persistence and the CLI
pub mod io;
/// Palette collaborators and change notification
pub mod scene;
/// Coordinates, masks and the tile grid itself
pub mod spatial;

pub use io::error::{GridError, Result};
pub use scene::palette::{LevelSet, Palette};
pub use spatial::coord::{Tile, TileCoord, WorldPosition};
pub use spatial::grid::{CreateOutcome, LoadReport, TileGrid};
pub use spatial::mask::TileMask;
