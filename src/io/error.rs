//! Error types for grid mutation, mask decoding and level persistence

use std::fmt;
use std::path::PathBuf;

use crate::spatial::coord::TileCoord;

/// Main error type for all grid and level operations
#[derive(Debug)]
pub enum GridError {
    /// Tile references a prefab outside the current palette
    InvalidPrefabIndex {
        /// The rejected prefab index
        index: usize,
        /// Number of prefabs the palette offers
        palette_size: usize,
    },

    /// No tile is stored at the queried coordinate
    NotFound {
        /// Coordinate that was queried
        position: TileCoord,
    },

    /// No level with the given name exists in the store
    LevelNotFound {
        /// Name the store was asked for
        name: String,
    },

    /// Failed to load a mask image from the filesystem
    ImageLoad {
        /// Path to the image file
        path: PathBuf,
        /// Underlying image loading error
        source: image::ImageError,
    },

    /// Failed to save a mask image to disk
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Level document could not be encoded or decoded
    Serialization {
        /// Path of the level document
        path: PathBuf,
        /// Underlying JSON error
        source: serde_json::Error,
    },

    /// Source data (mask, image or level document) is malformed
    InvalidSourceData {
        /// Description of what's wrong with the source data
        reason: String,
    },

    /// Parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPrefabIndex {
                index,
                palette_size,
            } => {
                write!(
                    f,
                    "Prefab index {index} is not a valid index (palette size: {palette_size})"
                )
            }
            Self::NotFound { position } => write!(f, "No tile at {position}"),
            Self::LevelNotFound { name } => write!(f, "Level '{name}' does not exist"),
            Self::ImageLoad { path, source } => {
                write!(f, "Failed to load image '{}': {source}", path.display())
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
            Self::Serialization { path, source } => {
                write!(f, "Malformed level document '{}': {source}", path.display())
            }
            Self::InvalidSourceData { reason } => {
                write!(f, "Invalid source data: {reason}")
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
        }
    }
}

impl std::error::Error for GridError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageLoad { source, .. } | Self::ImageExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            Self::Serialization { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl GridError {
    /// Whether the error came from the grid core rather than a collaborator
    pub const fn is_grid_error(&self) -> bool {
        matches!(self, Self::InvalidPrefabIndex { .. } | Self::NotFound { .. })
    }
}

/// Convenience type alias for grid results
pub type Result<T> = std::result::Result<T, GridError>;

impl From<std::io::Error> for GridError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> GridError {
    GridError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create an invalid source data error
pub fn invalid_source(reason: &impl ToString) -> GridError {
    GridError::InvalidSourceData {
        reason: reason.to_string(),
    }
}
