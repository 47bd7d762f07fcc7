//! Tile coordinates, tile records and world-space positions

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::io::configuration::TILE_CENTER_OFFSET;

/// Integer 2D coordinate keying a tile in the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TileCoord {
    /// Column
    pub x: i32,
    /// Row
    pub y: i32,
}

impl TileCoord {
    /// Create a coordinate
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Tile containing a world position, projected onto the ground plane
    ///
    /// The world `z` axis maps to the tile `y` axis; height is ignored.
    pub fn from_world(position: WorldPosition) -> Self {
        Self::new(position.x.floor() as i32, position.z.floor() as i32)
    }

    /// Tile containing a point in plane coordinates
    pub fn from_planar(point: [f32; 2]) -> Self {
        Self::new(point[0].floor() as i32, point[1].floor() as i32)
    }

    /// World-space anchor where the tile's representation is spawned
    pub fn world_center(self) -> WorldPosition {
        WorldPosition::new(
            TILE_CENTER_OFFSET + self.x as f32,
            0.0,
            TILE_CENTER_OFFSET + self.y as f32,
        )
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x:{} y:{}", self.x, self.y)
    }
}

impl From<(i32, i32)> for TileCoord {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// Record describing what occupies a coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Tile {
    /// Index of the palette archetype this tile materializes as
    #[serde(rename = "prefab")]
    pub prefab_index: usize,
}

impl Tile {
    /// Create a tile referencing a palette entry
    pub const fn new(prefab_index: usize) -> Self {
        Self { prefab_index }
    }
}

/// Position in world space (y is up)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WorldPosition {
    /// East-west component
    pub x: f32,
    /// Height
    pub y: f32,
    /// North-south component
    pub z: f32,
}

impl WorldPosition {
    /// Create a world position
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}
