//! Level start-up: build a grid and fill it according to a load mode

use std::collections::HashMap;
use std::path::PathBuf;

use log::info;

use crate::io::configuration::OCCUPIED_COLOR;
use crate::io::error::Result;
use crate::io::image::mask_from_png;
use crate::io::store::LevelStore;
use crate::scene::palette::Palette;
use crate::spatial::coord::{Tile, TileCoord};
use crate::spatial::grid::TileGrid;

/// Where a level's initial contents come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LevelLoadMode {
    /// Start with an empty grid
    Blank,
    /// Decode a mask image; opaque black pixels become prefab-0 tiles
    Texture(PathBuf),
    /// Load a named level from the store, or start blank if it is missing
    FromFile(String),
    /// Load tiles bundled with the caller
    FromAsset(HashMap<TileCoord, Tile>),
}

/// Create a grid and populate it according to `mode`
///
/// # Errors
///
/// Returns an error if the texture cannot be decoded or a stored level exists
/// but cannot be read
pub fn start_level<P: Palette>(
    palette: P,
    mode: &LevelLoadMode,
    store: &impl LevelStore,
) -> Result<TileGrid<P>> {
    let mut grid = TileGrid::new(palette);

    match mode {
        LevelLoadMode::Blank => {}
        LevelLoadMode::Texture(path) => {
            let mask = mask_from_png(path, OCCUPIED_COLOR)?;
            grid.load_from_mask(&mask);
        }
        LevelLoadMode::FromFile(name) => {
            if store.exists(name) {
                grid.load_from(store, name)?;
            } else {
                info!("Level '{name}' not found, starting blank");
            }
        }
        LevelLoadMode::FromAsset(entries) => {
            grid.load_from_entries(entries.iter().map(|(&pos, &tile)| (pos, tile)));
        }
    }

    Ok(grid)
}
