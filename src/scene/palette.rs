//! Palette collaborators that validate prefab indices and materialize tiles
//!
//! The grid only talks to a `Palette`: it asks how many prefabs exist, spawns
//! a representation for each new tile and hands the handle back on removal.
//! `LevelSet` is the headless implementation used by the CLI and tests; it
//! keeps live instances in a slot arena instead of creating scene objects.

use crate::spatial::coord::WorldPosition;

/// External collaborator enumerating prefabs and owning their instances
pub trait Palette {
    /// Opaque reference to a spawned representation
    type Handle;

    /// Number of valid prefab indices, `0..palette_size()`
    fn palette_size(&self) -> usize;

    /// Materialize prefab `prefab_index` at `position`
    ///
    /// Only called with indices below `palette_size()`.
    fn spawn(&mut self, prefab_index: usize, position: WorldPosition) -> Self::Handle;

    /// Destroy a representation previously returned by `spawn`
    fn despawn(&mut self, handle: Self::Handle);
}

/// One archetype a tile can reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelItem {
    /// Display name of the prefab
    pub name: String,
}

/// Handle to a live instance inside a `LevelSet`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstanceId(usize);

impl InstanceId {
    /// Arena slot backing this instance
    pub const fn slot(self) -> usize {
        self.0
    }
}

/// A spawned tile representation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Instance {
    /// Prefab the instance was spawned from
    pub prefab_index: usize,
    /// Where it was placed
    pub position: WorldPosition,
}

/// Headless palette: named prefabs plus an arena of live instances
#[derive(Debug, Clone, Default)]
pub struct LevelSet {
    items: Vec<LevelItem>,
    instances: Vec<Option<Instance>>,
    free_slots: Vec<usize>,
}

impl LevelSet {
    /// Create a palette from prefab names
    pub fn new<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Self {
        Self {
            items: names
                .into_iter()
                .map(|name| LevelItem { name: name.into() })
                .collect(),
            ..Self::default()
        }
    }

    /// Create a palette of `size` anonymous prefabs named `prefab_<index>`
    pub fn with_size(size: usize) -> Self {
        Self::new((0..size).map(|index| format!("prefab_{index}")))
    }

    /// Prefab definitions
    pub fn items(&self) -> &[LevelItem] {
        &self.items
    }

    /// Look up a live instance
    pub fn instance(&self, id: InstanceId) -> Option<&Instance> {
        self.instances.get(id.0).and_then(Option::as_ref)
    }

    /// All live instances
    pub fn live_instances(&self) -> impl Iterator<Item = (InstanceId, &Instance)> + '_ {
        self.instances
            .iter()
            .enumerate()
            .filter_map(|(slot, instance)| instance.as_ref().map(|i| (InstanceId(slot), i)))
    }

    /// Number of live instances
    pub fn live_count(&self) -> usize {
        self.instances.len() - self.free_slots.len()
    }
}

impl Palette for LevelSet {
    type Handle = InstanceId;

    fn palette_size(&self) -> usize {
        self.items.len()
    }

    fn spawn(&mut self, prefab_index: usize, position: WorldPosition) -> InstanceId {
        let instance = Some(Instance {
            prefab_index,
            position,
        });

        if let Some(slot) = self.free_slots.pop() {
            if let Some(entry) = self.instances.get_mut(slot) {
                *entry = instance;
            }
            InstanceId(slot)
        } else {
            self.instances.push(instance);
            InstanceId(self.instances.len() - 1)
        }
    }

    fn despawn(&mut self, handle: InstanceId) {
        // Stale handles are ignored so a slot is never freed twice
        if let Some(entry) = self.instances.get_mut(handle.0) {
            if entry.take().is_some() {
                self.free_slots.push(handle.0);
            }
        }
    }
}
