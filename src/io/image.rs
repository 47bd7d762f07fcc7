//! PNG mask decoding and export
//!
//! Images are read with their bottom row as tile row 0, matching the usual
//! texture convention of an origin in the lower-left corner.

use std::path::Path;

use image::{ImageBuffer, Rgba, RgbaImage};

use crate::io::configuration::EMPTY_COLOR;
use crate::io::error::{GridError, Result};
use crate::spatial::mask::TileMask;

/// Decode a PNG into a mask; pixels exactly matching `occupied` are set
///
/// # Errors
///
/// Returns an error if:
/// - The file cannot be read or decoded
/// - The image exceeds `MAX_MASK_DIMENSION` in either direction
pub fn mask_from_png(path: &Path, occupied: [u8; 4]) -> Result<TileMask> {
    let img = image::open(path).map_err(|e| GridError::ImageLoad {
        path: path.to_path_buf(),
        source: e,
    })?;

    mask_from_image(&img.to_rgba8(), occupied)
}

/// Build a mask from decoded pixels, flipping rows so `y` grows upwards
///
/// # Errors
///
/// Returns an error if the image exceeds `MAX_MASK_DIMENSION` in either direction
pub fn mask_from_image(img: &RgbaImage, occupied: [u8; 4]) -> Result<TileMask> {
    let (width, height) = img.dimensions();

    TileMask::from_fn(width as usize, height as usize, |x, y| {
        let row = height as usize - 1 - y;
        img.get_pixel_checked(x as u32, row as u32)
            .is_some_and(|pixel| pixel.0 == occupied)
    })
}

/// Render a mask as an image, occupied cells in `occupied`, the rest transparent
pub fn mask_to_image(mask: &TileMask, occupied: [u8; 4]) -> RgbaImage {
    let width = mask.width() as u32;
    let height = mask.height() as u32;

    ImageBuffer::from_fn(width, height, |px, py| {
        let y = (height - 1 - py) as usize;
        if mask.get(px as usize, y) {
            Rgba(occupied)
        } else {
            Rgba(EMPTY_COLOR)
        }
    })
}

/// Export a mask as a PNG that `mask_from_png` reads back unchanged
///
/// # Errors
///
/// Returns an error if:
/// - The mask is empty (zero width or height)
/// - The parent directory cannot be created
/// - The image cannot be saved to the specified path
pub fn export_mask_png(mask: &TileMask, occupied: [u8; 4], output_path: &Path) -> Result<()> {
    if mask.width() == 0 || mask.height() == 0 {
        return Err(GridError::InvalidSourceData {
            reason: "Cannot export an empty mask".to_string(),
        });
    }

    if let Some(parent) = output_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| GridError::FileSystem {
            path: parent.to_path_buf(),
            operation: "create directory",
            source: e,
        })?;
    }

    mask_to_image(mask, occupied)
        .save(output_path)
        .map_err(|e| GridError::ImageExport {
            path: output_path.to_path_buf(),
            source: e,
        })
}
