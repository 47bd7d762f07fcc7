//! Level persistence through named stores
//!
//! Levels are written as JSON documents:
//!
//! ```json
//! { "version": 1, "tiles": [ { "x": 0, "y": 0, "prefab": 0 } ] }
//! ```
//!
//! Tiles are sorted by `(x, y)` so saving the same level twice produces
//! identical files.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use log::info;
use serde::{Deserialize, Serialize};

use crate::io::configuration::{LEVEL_EXTENSION, LEVEL_FORMAT_VERSION};
use crate::io::error::{GridError, Result, invalid_parameter, invalid_source};
use crate::scene::palette::Palette;
use crate::spatial::coord::{Tile, TileCoord};
use crate::spatial::grid::{LoadReport, TileGrid};

/// Named durable storage for level tile maps
pub trait LevelStore {
    /// Persist `entries` under `name`, replacing any previous level
    ///
    /// # Errors
    ///
    /// Returns an error if the level cannot be encoded or written
    fn save(&mut self, name: &str, entries: &HashMap<TileCoord, Tile>) -> Result<()>;

    /// Read the level stored under `name`
    ///
    /// # Errors
    ///
    /// Returns `GridError::LevelNotFound` if no such level exists, or an
    /// error if it cannot be read or decoded
    fn load(&self, name: &str) -> Result<HashMap<TileCoord, Tile>>;

    /// Whether a level is stored under `name`
    fn exists(&self, name: &str) -> bool;
}

#[derive(Debug, Serialize, Deserialize)]
struct LevelDocument {
    version: u32,
    tiles: Vec<LevelEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
struct LevelEntry {
    #[serde(flatten)]
    position: TileCoord,
    #[serde(flatten)]
    tile: Tile,
}

/// Encode a tile map as a level document
///
/// # Errors
///
/// Returns an error if JSON encoding fails
pub fn encode_level(entries: &HashMap<TileCoord, Tile>, path: &Path) -> Result<String> {
    let mut tiles: Vec<LevelEntry> = entries
        .iter()
        .map(|(&position, &tile)| LevelEntry { position, tile })
        .collect();
    tiles.sort_by_key(|entry| (entry.position.x, entry.position.y));

    let document = LevelDocument {
        version: LEVEL_FORMAT_VERSION,
        tiles,
    };

    serde_json::to_string_pretty(&document).map_err(|e| GridError::Serialization {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Decode a level document into a tile map
///
/// # Errors
///
/// Returns an error if:
/// - The text is not a valid level document
/// - The document version is unsupported
/// - A coordinate appears more than once
pub fn decode_level(text: &str, path: &Path) -> Result<HashMap<TileCoord, Tile>> {
    let document: LevelDocument =
        serde_json::from_str(text).map_err(|e| GridError::Serialization {
            path: path.to_path_buf(),
            source: e,
        })?;

    if document.version != LEVEL_FORMAT_VERSION {
        return Err(invalid_source(&format!(
            "level '{}' has version {}, expected {LEVEL_FORMAT_VERSION}",
            path.display(),
            document.version
        )));
    }

    let mut entries = HashMap::with_capacity(document.tiles.len());
    for LevelEntry { position, tile } in document.tiles {
        if entries.insert(position, tile).is_some() {
            return Err(invalid_source(&format!(
                "level '{}' lists {position} more than once",
                path.display()
            )));
        }
    }

    Ok(entries)
}

/// Stores each level as `<root>/<name>.level`
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Create a store rooted at a directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory holding the level files
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File a level name resolves to
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty or contains a path separator
    pub fn path_for(&self, name: &str) -> Result<PathBuf> {
        if name.is_empty() || name.contains(['/', '\\']) {
            return Err(invalid_parameter(
                "name",
                &name,
                &"level names must be non-empty and contain no path separators",
            ));
        }
        Ok(self.root.join(format!("{name}.{LEVEL_EXTENSION}")))
    }
}

impl LevelStore for FileStore {
    fn save(&mut self, name: &str, entries: &HashMap<TileCoord, Tile>) -> Result<()> {
        let path = self.path_for(name)?;
        let text = encode_level(entries, &path)?;

        std::fs::create_dir_all(&self.root).map_err(|e| GridError::FileSystem {
            path: self.root.clone(),
            operation: "create directory",
            source: e,
        })?;
        std::fs::write(&path, text).map_err(|e| GridError::FileSystem {
            path: path.clone(),
            operation: "write",
            source: e,
        })?;

        info!("Saved {} tiles to {}", entries.len(), path.display());
        Ok(())
    }

    fn load(&self, name: &str) -> Result<HashMap<TileCoord, Tile>> {
        let path = self.path_for(name)?;
        if !path.is_file() {
            return Err(GridError::LevelNotFound {
                name: name.to_string(),
            });
        }

        let text = std::fs::read_to_string(&path).map_err(|e| GridError::FileSystem {
            path: path.clone(),
            operation: "read",
            source: e,
        })?;
        decode_level(&text, &path)
    }

    fn exists(&self, name: &str) -> bool {
        self.path_for(name).is_ok_and(|path| path.is_file())
    }
}

/// Keeps encoded level documents in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    documents: HashMap<String, String>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Encoded document stored under `name`
    pub fn document(&self, name: &str) -> Option<&str> {
        self.documents.get(name).map(String::as_str)
    }

    /// Store a raw document, bypassing encoding
    pub fn insert_document(&mut self, name: &str, text: impl Into<String>) {
        self.documents.insert(name.to_string(), text.into());
    }

    fn virtual_path(name: &str) -> PathBuf {
        PathBuf::from(format!("memory:{name}"))
    }
}

impl LevelStore for MemoryStore {
    fn save(&mut self, name: &str, entries: &HashMap<TileCoord, Tile>) -> Result<()> {
        let text = encode_level(entries, &Self::virtual_path(name))?;
        self.documents.insert(name.to_string(), text);
        Ok(())
    }

    fn load(&self, name: &str) -> Result<HashMap<TileCoord, Tile>> {
        let text = self
            .documents
            .get(name)
            .ok_or_else(|| GridError::LevelNotFound {
                name: name.to_string(),
            })?;
        decode_level(text, &Self::virtual_path(name))
    }

    fn exists(&self, name: &str) -> bool {
        self.documents.contains_key(name)
    }
}

impl<P: Palette> TileGrid<P> {
    /// Persist the current tiles under `name`
    ///
    /// # Errors
    ///
    /// Propagates any error from the store
    pub fn save_to(&self, store: &mut impl LevelStore, name: &str) -> Result<()> {
        store.save(name, self.entries())
    }

    /// Replace the grid's contents with the level stored under `name`
    ///
    /// The grid is cleared before the store is read, so a failed read
    /// leaves it empty.
    ///
    /// # Errors
    ///
    /// Propagates any error from the store
    pub fn load_from(&mut self, store: &impl LevelStore, name: &str) -> Result<LoadReport> {
        self.despawn_all();
        match store.load(name) {
            Ok(entries) => Ok(self.load_from_entries(entries)),
            Err(error) => {
                self.clear();
                Err(error)
            }
        }
    }
}
