//! Sparse tile grid kept in sync with externally materialized representations
//!
//! The grid holds two maps with identical key sets: the authoritative tile
//! records and the handles the palette returned when each tile was spawned.
//! Every coordinate is either absent from both or present in both.
//!
//! Bulk loads clear the grid first and then apply entries one at a time with
//! no rollback. An entry the palette rejects is reported and skipped, so a
//! load containing bad entries leaves the grid cleared and partially
//! populated. Callers that need all-or-nothing loads must validate first.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use log::{debug, info, warn};

use crate::io::configuration::MASK_PREFAB_INDEX;
use crate::io::error::{GridError, Result};
use crate::scene::events::{ChangeNotifier, ObserverId};
use crate::scene::palette::Palette;
use crate::spatial::coord::{Tile, TileCoord};
use crate::spatial::mask::TileMask;

/// Result of a successful `TileGrid::create_tile`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    /// The tile was inserted
    Created,
    /// A tile already occupied the coordinate; nothing changed
    Skipped,
}

/// Summary of a bulk load
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Tiles inserted
    pub created: usize,
    /// Entries ignored because their coordinate was already filled
    pub skipped: usize,
    /// Entries the palette rejected, in application order
    pub rejected: Vec<(TileCoord, GridError)>,
}

impl LoadReport {
    /// Whether every entry was applied
    pub fn is_complete(&self) -> bool {
        self.rejected.is_empty()
    }

    fn record(&mut self, pos: TileCoord, outcome: Result<CreateOutcome>) {
        match outcome {
            Ok(CreateOutcome::Created) => self.created += 1,
            Ok(CreateOutcome::Skipped) => self.skipped += 1,
            Err(error) => self.rejected.push((pos, error)),
        }
    }
}

/// Sparse mapping from coordinates to tiles, backed by a palette
#[derive(Debug)]
pub struct TileGrid<P: Palette> {
    tiles: HashMap<TileCoord, Tile>,
    spawned: HashMap<TileCoord, P::Handle>,
    palette: P,
    on_changed: ChangeNotifier,
}

impl<P: Palette> TileGrid<P> {
    /// Create an empty grid that materializes tiles through `palette`
    pub fn new(palette: P) -> Self {
        Self {
            tiles: HashMap::new(),
            spawned: HashMap::new(),
            palette,
            on_changed: ChangeNotifier::new(),
        }
    }

    /// Insert a tile at an empty coordinate
    ///
    /// Creating over an existing tile leaves the existing tile untouched and
    /// returns `CreateOutcome::Skipped`.
    ///
    /// # Errors
    ///
    /// Returns `GridError::InvalidPrefabIndex` if the tile's prefab is outside
    /// the palette; the grid is not modified
    pub fn create_tile(&mut self, pos: TileCoord, tile: Tile) -> Result<CreateOutcome> {
        let outcome = self.insert(pos, tile)?;
        if outcome == CreateOutcome::Created {
            self.on_changed.notify();
        }
        Ok(outcome)
    }

    /// Remove the tile at `pos`, despawning its representation
    ///
    /// Returns whether a tile was present. Removing an absent coordinate is a no-op.
    pub fn remove_tile(&mut self, pos: TileCoord) -> bool {
        let removed = self.remove(pos);
        if removed {
            self.on_changed.notify();
        }
        removed
    }

    /// Replace whatever is at `pos` with `tile`
    ///
    /// Always despawns the old representation and spawns a new one, even
    /// when the tile is unchanged.
    ///
    /// # Errors
    ///
    /// Returns `GridError::InvalidPrefabIndex` if the new tile is outside the
    /// palette. Any previous tile at `pos` has already been removed by then.
    pub fn set_tile(&mut self, pos: TileCoord, tile: Tile) -> Result<()> {
        let removed = self.remove(pos);
        let inserted = self.insert(pos, tile);
        if removed || inserted.is_ok() {
            self.on_changed.notify();
        }
        inserted.map(|_| ())
    }

    /// Look up the tile at `pos`
    ///
    /// # Errors
    ///
    /// Returns `GridError::NotFound` if no tile is stored there
    pub fn get_tile(&self, pos: TileCoord) -> Result<Tile> {
        self.tiles
            .get(&pos)
            .copied()
            .ok_or(GridError::NotFound { position: pos })
    }

    /// Remove every tile, despawning all representations
    pub fn clear(&mut self) {
        self.despawn_all();
        self.on_changed.notify();
    }

    /// Rebuild the grid from a mask, one prefab-0 tile per occupied cell
    pub fn load_from_mask(&mut self, mask: &TileMask) -> LoadReport {
        self.despawn_all();

        let mut report = LoadReport::default();
        for pos in mask.occupied() {
            let outcome = self.insert(pos, Tile::new(MASK_PREFAB_INDEX));
            report.record(pos, outcome);
        }

        info!(
            "Loaded {} tiles from {}x{} mask",
            report.created,
            mask.width(),
            mask.height()
        );
        self.finish_load(&report);
        report
    }

    /// Rebuild the grid from coordinate/tile pairs, in iteration order
    pub fn load_from_entries(
        &mut self,
        entries: impl IntoIterator<Item = (TileCoord, Tile)>,
    ) -> LoadReport {
        self.despawn_all();

        let mut report = LoadReport::default();
        for (pos, tile) in entries {
            let outcome = self.insert(pos, tile);
            report.record(pos, outcome);
        }

        info!("Loaded {} tiles from entries", report.created);
        self.finish_load(&report);
        report
    }

    /// Snapshot of all tiles for persistence
    pub fn save_entries(&self) -> HashMap<TileCoord, Tile> {
        self.tiles.clone()
    }

    /// Read-only view of all tiles
    pub const fn entries(&self) -> &HashMap<TileCoord, Tile> {
        &self.tiles
    }

    /// Iterate over stored tiles in unspecified order
    pub fn iter(&self) -> impl Iterator<Item = (TileCoord, Tile)> + '_ {
        self.tiles.iter().map(|(&pos, &tile)| (pos, tile))
    }

    /// Whether a tile is stored at `pos`
    pub fn contains(&self, pos: TileCoord) -> bool {
        self.tiles.contains_key(&pos)
    }

    /// Number of stored tiles
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Whether the grid holds no tiles
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Handle of the representation spawned for `pos`
    pub fn handle(&self, pos: TileCoord) -> Option<&P::Handle> {
        self.spawned.get(&pos)
    }

    /// Number of live handles; equals `len()` after every operation
    pub fn spawned_count(&self) -> usize {
        self.spawned.len()
    }

    /// The palette collaborator
    pub const fn palette(&self) -> &P {
        &self.palette
    }

    /// Mutable access to the palette collaborator
    pub const fn palette_mut(&mut self) -> &mut P {
        &mut self.palette
    }

    /// Register an observer called after every state-changing operation
    pub fn subscribe(&mut self, observer: impl FnMut() + 'static) -> ObserverId {
        self.on_changed.subscribe(observer)
    }

    /// Remove an observer, returning whether it was registered
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        self.on_changed.unsubscribe(id)
    }

    fn insert(&mut self, pos: TileCoord, tile: Tile) -> Result<CreateOutcome> {
        let palette_size = self.palette.palette_size();
        if tile.prefab_index >= palette_size {
            warn!(
                "Tile index {} is not a valid index (palette size {palette_size}): skipped {pos}",
                tile.prefab_index
            );
            return Err(GridError::InvalidPrefabIndex {
                index: tile.prefab_index,
                palette_size,
            });
        }

        let Entry::Vacant(slot) = self.tiles.entry(pos) else {
            debug!("Tile already present at {pos}: create ignored");
            return Ok(CreateOutcome::Skipped);
        };

        if let Entry::Vacant(handle_slot) = self.spawned.entry(pos) {
            debug!("Spawning prefab {} at {pos}", tile.prefab_index);
            handle_slot.insert(self.palette.spawn(tile.prefab_index, pos.world_center()));
        }
        slot.insert(tile);

        Ok(CreateOutcome::Created)
    }

    fn remove(&mut self, pos: TileCoord) -> bool {
        let handle = self.spawned.remove(&pos);
        let had_handle = handle.is_some();
        if let Some(handle) = handle {
            self.palette.despawn(handle);
        }
        self.tiles.remove(&pos).is_some() || had_handle
    }

    pub(crate) fn despawn_all(&mut self) {
        for (_, handle) in self.spawned.drain() {
            self.palette.despawn(handle);
        }
        self.tiles.clear();
    }

    fn finish_load(&mut self, report: &LoadReport) {
        if !report.is_complete() {
            warn!(
                "{} entries rejected; grid is partially loaded",
                report.rejected.len()
            );
        }
        self.on_changed.notify();
    }
}
