//! Spatial data structures for levels
//!
//! This module contains:
//! - Tile coordinates and tile records
//! - Occupancy masks for bulk construction
//! - The sparse tile grid

/// Coordinates, tiles and world positions
pub mod coord;
/// Sparse tile grid
pub mod grid;
/// Rectangular occupancy masks
pub mod mask;

pub use grid::TileGrid;
