//! Walkability classification of decoded cells

use ahash::AHashSet;
use serde::Serialize;
use tracing::debug;

use crate::codec::Cell;
use crate::error::{Error, Result};
use crate::scene::PropertyMap;

/// Tile-set source ids that carry at least one collision shape
#[derive(Debug, Clone, Default)]
pub struct CollisionSourceSet {
    ids: AHashSet<u32>,
}

impl CollisionSourceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect source ids from a tile set's flat property bag.
    ///
    /// Every key containing `shapes` with a truthy value marks the id
    /// written before its first `/` (`3/shapes = [ ... ]` marks 3). Only
    /// the value's truthiness is checked, never the shape geometry.
    pub fn from_properties(properties: &PropertyMap) -> Result<Self> {
        let mut set = Self::new();
        for (key, value) in properties {
            if !key.contains("shapes") || !value.is_truthy() {
                continue;
            }
            let prefix = key.split('/').next().unwrap_or(key);
            let id = prefix
                .trim()
                .parse::<u32>()
                .map_err(|_| Error::InvalidSourceId(key.clone()))?;
            set.insert(id);
        }
        debug!(sources = set.len(), "collision sources");
        Ok(set)
    }

    pub fn insert(&mut self, id: u32) -> bool {
        self.ids.insert(id)
    }

    pub fn contains(&self, id: u32) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Ids in ascending order
    pub fn sorted(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self.ids.iter().copied().collect();
        ids.sort_unstable();
        ids
    }
}

impl FromIterator<u32> for CollisionSourceSet {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        Self { ids: iter.into_iter().collect() }
    }
}

/// One output row per decoded cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Row {
    pub x: i16,
    pub y: i16,
    pub walkable: bool,
}

/// Map every cell to a row, in order. Cells sharing a position each get
/// their own row.
pub fn classify(cells: &[Cell], collision_sources: &CollisionSourceSet) -> Vec<Row> {
    cells
        .iter()
        .map(|cell| Row {
            x: cell.x,
            y: cell.y,
            walkable: !collision_sources.contains(u32::from(cell.source_id)),
        })
        .collect()
}
