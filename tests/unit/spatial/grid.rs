//! Tests for tile grid mutation, queries, bulk loads and change notification

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use crate::support::RecordingPalette;
    use tilegrid::{CreateOutcome, GridError, Tile, TileCoord, TileGrid, TileMask};

    fn grid(palette_size: usize) -> TileGrid<RecordingPalette> {
        TileGrid::new(RecordingPalette::new(palette_size))
    }

    fn counter(grid: &mut TileGrid<RecordingPalette>) -> Rc<Cell<usize>> {
        let count = Rc::new(Cell::new(0));
        let observed = Rc::clone(&count);
        grid.subscribe(move || observed.set(observed.get() + 1));
        count
    }

    // Tests create followed by get returns the created tile
    #[test]
    fn test_create_then_get() {
        let mut grid = grid(3);
        let pos = TileCoord::new(4, -1);

        let outcome = grid.create_tile(pos, Tile::new(2)).unwrap();

        assert_eq!(outcome, CreateOutcome::Created);
        assert_eq!(grid.get_tile(pos).unwrap(), Tile::new(2));
        assert_eq!(grid.len(), 1);
        assert_eq!(grid.spawned_count(), 1);
    }

    // Tests the first create spawns once at the tile centre and the second is ignored
    // Verified by overwriting on an occupied coordinate
    #[test]
    fn test_create_twice_keeps_first_and_spawns_once() {
        let mut grid = grid(2);
        let pos = TileCoord::new(0, 0);

        assert_eq!(
            grid.create_tile(pos, Tile::new(0)).unwrap(),
            CreateOutcome::Created
        );
        assert_eq!(
            grid.create_tile(pos, Tile::new(1)).unwrap(),
            CreateOutcome::Skipped
        );

        assert_eq!(grid.get_tile(pos).unwrap(), Tile::new(0));
        assert_eq!(grid.palette().spawned, vec![(0, pos.world_center())]);
    }

    // Tests an out-of-palette prefab is rejected without touching the grid
    // Verified by spawning before validating
    #[test]
    fn test_create_invalid_prefab() {
        let mut grid = grid(2);

        let result = grid.create_tile(TileCoord::new(1, 1), Tile::new(5));

        assert!(matches!(
            result,
            Err(GridError::InvalidPrefabIndex {
                index: 5,
                palette_size: 2
            })
        ));
        assert!(grid.is_empty());
        assert!(grid.palette().spawned.is_empty());
    }

    // Tests removal despawns the handle and makes the coordinate absent
    #[test]
    fn test_remove_then_get_not_found() {
        let mut grid = grid(1);
        let pos = TileCoord::new(2, 2);
        grid.create_tile(pos, Tile::new(0)).unwrap();
        let handle = *grid.handle(pos).unwrap();

        assert!(grid.remove_tile(pos));

        assert!(matches!(
            grid.get_tile(pos),
            Err(GridError::NotFound { position }) if position == pos
        ));
        assert_eq!(grid.palette().despawned, vec![handle]);
        assert!(grid.handle(pos).is_none());
        assert_eq!(grid.palette().live(), 0);
    }

    // Tests removing an absent coordinate is a silent no-op
    #[test]
    fn test_remove_absent_is_idempotent() {
        let mut grid = grid(1);

        assert!(!grid.remove_tile(TileCoord::new(9, 9)));
        assert!(!grid.remove_tile(TileCoord::new(9, 9)));
        assert!(grid.palette().despawned.is_empty());
    }

    // Tests replacing a tile despawns and respawns even when the value is unchanged
    // Verified by short-circuiting when the tile is equal
    #[test]
    fn test_set_tile_always_cycles_representation() {
        let mut grid = grid(2);
        let pos = TileCoord::new(1, 0);
        grid.create_tile(pos, Tile::new(1)).unwrap();

        grid.set_tile(pos, Tile::new(1)).unwrap();

        assert_eq!(grid.palette().spawned.len(), 2);
        assert_eq!(grid.palette().despawned, vec![1]);
        assert_eq!(grid.handle(pos), Some(&2));
        assert_eq!(grid.get_tile(pos).unwrap(), Tile::new(1));
    }

    #[test]
    fn test_set_tile_on_empty_coordinate() {
        let mut grid = grid(3);
        let pos = TileCoord::new(-5, 7);

        grid.set_tile(pos, Tile::new(2)).unwrap();

        assert_eq!(grid.get_tile(pos).unwrap(), Tile::new(2));
        assert!(grid.palette().despawned.is_empty());
    }

    // Tests an invalid replacement still removes the previous tile
    // Verified by validating before removal
    #[test]
    fn test_set_tile_invalid_removes_previous() {
        let mut grid = grid(1);
        let pos = TileCoord::new(0, 3);
        grid.create_tile(pos, Tile::new(0)).unwrap();

        let result = grid.set_tile(pos, Tile::new(4));

        assert!(matches!(result, Err(GridError::InvalidPrefabIndex { .. })));
        assert!(!grid.contains(pos));
        assert_eq!(grid.spawned_count(), 0);
    }

    // Tests clear despawns every handle and empties both maps
    #[test]
    fn test_clear() {
        let mut grid = grid(1);
        let coords = [TileCoord::new(0, 0), TileCoord::new(1, 0), TileCoord::new(0, 1)];
        for pos in coords {
            grid.create_tile(pos, Tile::new(0)).unwrap();
        }

        grid.clear();

        assert_eq!(grid.palette().despawned.len(), 3);
        assert_eq!(grid.spawned_count(), 0);
        for pos in coords {
            assert!(grid.get_tile(pos).is_err());
        }
    }

    // Tests a diagonal mask yields exactly the diagonal tiles
    // Verified by transposing mask coordinates
    #[test]
    fn test_load_from_mask_diagonal() {
        let mut grid = grid(1);
        let mask = TileMask::from_columns(&[vec![true, false], vec![false, true]]).unwrap();

        let report = grid.load_from_mask(&mask);

        assert_eq!(report.created, 2);
        assert!(report.is_complete());
        assert_eq!(grid.len(), 2);
        assert_eq!(grid.get_tile(TileCoord::new(0, 0)).unwrap(), Tile::new(0));
        assert_eq!(grid.get_tile(TileCoord::new(1, 1)).unwrap(), Tile::new(0));
    }

    // Tests mask loading spawns in column-major order
    #[test]
    fn test_load_from_mask_spawn_order() {
        let mut grid = grid(1);
        let mask = TileMask::from_fn(2, 2, |_, _| true).unwrap();

        grid.load_from_mask(&mask);

        let order: Vec<TileCoord> = grid
            .palette()
            .spawned
            .iter()
            .map(|&(_, position)| TileCoord::from_world(position))
            .collect();
        assert_eq!(
            order,
            vec![
                TileCoord::new(0, 0),
                TileCoord::new(0, 1),
                TileCoord::new(1, 0),
                TileCoord::new(1, 1),
            ]
        );
    }

    // Tests a bulk load replaces previous contents
    #[test]
    fn test_load_clears_previous_tiles() {
        let mut grid = grid(2);
        grid.create_tile(TileCoord::new(10, 10), Tile::new(1)).unwrap();

        grid.load_from_entries([(TileCoord::new(0, 0), Tile::new(0))]);

        assert!(!grid.contains(TileCoord::new(10, 10)));
        assert_eq!(grid.len(), 1);
        assert_eq!(grid.palette().live(), 1);
    }

    // Tests a mask load with an empty palette rejects every tile after clearing
    #[test]
    fn test_load_from_mask_with_empty_palette() {
        let mut grid = grid(0);
        let mask = TileMask::from_fn(3, 1, |_, _| true).unwrap();

        let report = grid.load_from_mask(&mask);

        assert_eq!(report.rejected.len(), 3);
        assert!(grid.is_empty());
    }

    // Tests invalid entries are skipped and the rest still load
    // Verified by aborting at the first rejection
    #[test]
    fn test_load_from_entries_partial() {
        let mut grid = grid(2);
        grid.create_tile(TileCoord::new(7, 7), Tile::new(0)).unwrap();

        let report = grid.load_from_entries([
            (TileCoord::new(0, 0), Tile::new(1)),
            (TileCoord::new(1, 0), Tile::new(9)),
            (TileCoord::new(2, 0), Tile::new(0)),
        ]);

        assert_eq!(report.created, 2);
        assert_eq!(report.rejected.len(), 1);
        assert_eq!(report.rejected[0].0, TileCoord::new(1, 0));
        assert!(!report.is_complete());
        assert!(!grid.contains(TileCoord::new(7, 7)));
        assert!(!grid.contains(TileCoord::new(1, 0)));
        assert_eq!(grid.len(), 2);
        assert_eq!(grid.spawned_count(), 2);
    }

    // Tests duplicate coordinates in an entry list keep the first tile
    #[test]
    fn test_load_from_entries_duplicate_keeps_first() {
        let mut grid = grid(2);

        let report = grid.load_from_entries([
            (TileCoord::new(0, 0), Tile::new(1)),
            (TileCoord::new(0, 0), Tile::new(0)),
        ]);

        assert_eq!(report.created, 1);
        assert_eq!(report.skipped, 1);
        assert_eq!(grid.get_tile(TileCoord::new(0, 0)).unwrap(), Tile::new(1));
    }

    // Tests the saved snapshot is independent of later edits
    #[test]
    fn test_save_entries_snapshot() {
        let mut grid = grid(1);
        grid.create_tile(TileCoord::new(3, 3), Tile::new(0)).unwrap();

        let snapshot = grid.save_entries();
        grid.clear();

        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.get(&TileCoord::new(3, 3)), Some(&Tile::new(0)));
        assert!(grid.entries().is_empty());
    }

    #[test]
    fn test_iter_matches_entries() {
        let mut grid = grid(2);
        grid.create_tile(TileCoord::new(0, 1), Tile::new(1)).unwrap();
        grid.create_tile(TileCoord::new(1, 0), Tile::new(0)).unwrap();

        let mut tiles: Vec<(TileCoord, Tile)> = grid.iter().collect();
        tiles.sort_by_key(|(pos, _)| (pos.x, pos.y));

        assert_eq!(
            tiles,
            vec![
                (TileCoord::new(0, 1), Tile::new(1)),
                (TileCoord::new(1, 0), Tile::new(0)),
            ]
        );
    }

    // Tests observers fire once per state change and never for no-ops
    // Verified by notifying on skipped creation
    #[test]
    fn test_change_notifications() {
        let mut grid = grid(1);
        let count = counter(&mut grid);
        let pos = TileCoord::new(0, 0);

        grid.create_tile(pos, Tile::new(0)).unwrap();
        assert_eq!(count.get(), 1);

        grid.create_tile(pos, Tile::new(0)).unwrap();
        assert!(grid.create_tile(pos, Tile::new(3)).is_err());
        grid.remove_tile(TileCoord::new(5, 5));
        assert_eq!(count.get(), 1);

        grid.set_tile(pos, Tile::new(0)).unwrap();
        assert_eq!(count.get(), 2);

        grid.remove_tile(pos);
        assert_eq!(count.get(), 3);

        grid.load_from_mask(&TileMask::from_fn(4, 4, |_, _| true).unwrap());
        assert_eq!(count.get(), 4);

        grid.clear();
        assert_eq!(count.get(), 5);
    }

    #[test]
    fn test_unsubscribe() {
        let mut grid = grid(1);
        let count = Rc::new(Cell::new(0));
        let observed = Rc::clone(&count);
        let id = grid.subscribe(move || observed.set(observed.get() + 1));

        assert!(grid.unsubscribe(id));
        assert!(!grid.unsubscribe(id));
        grid.create_tile(TileCoord::new(0, 0), Tile::new(0)).unwrap();

        assert_eq!(count.get(), 0);
    }

    // Tests both maps keep identical key sets through a mixed sequence
    #[test]
    fn test_handles_track_tiles() {
        let mut grid = grid(2);
        for x in 0..5 {
            grid.create_tile(TileCoord::new(x, 0), Tile::new(0)).unwrap();
        }
        grid.remove_tile(TileCoord::new(1, 0));
        grid.set_tile(TileCoord::new(2, 0), Tile::new(1)).unwrap();
        grid.set_tile(TileCoord::new(8, 0), Tile::new(1)).unwrap();

        assert_eq!(grid.len(), grid.spawned_count());
        for (pos, _) in grid.iter() {
            assert!(grid.handle(pos).is_some(), "missing handle at {pos}");
        }
        assert_eq!(grid.palette().live(), grid.len());
    }
}
