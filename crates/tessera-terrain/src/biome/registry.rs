//! Tile registry: ordered tiles with O(1) lookup by [`TileId`] and by name.
//!
//! Resolution is first-match in registration order. Because two tiles with
//! identical tag-sets are rejected, at most one tile can match a tag-set, but
//! the order is still part of the configuration contract.

use hashbrown::HashMap;

use super::{TagSet, Tile, TileId};

/// Errors that can occur when declaring or registering tiles.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TileError {
    /// The same tag appears twice in one tile declaration.
    #[error("tile {tile:?} lists tag {tag:?} more than once")]
    DuplicateTag { tile: String, tag: String },
    /// A tile with this name is already registered.
    #[error("duplicate tile name: {0}")]
    DuplicateName(String),
    /// Another tile already claims the exact same tag-set.
    #[error("tile {tile:?} has the same tag set as {existing:?}")]
    DuplicateTagSet { tile: String, existing: String },
    /// All `u16` ids are in use.
    #[error("tile registry is full (max 65536 tiles)")]
    RegistryFull,
}

/// Stores all tiles in declaration order.
#[derive(Clone, Debug, Default)]
pub struct TileRegistry {
    tiles: Vec<Tile>,
    name_to_id: HashMap<String, TileId>,
}

impl TileRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a tile, returning its assigned [`TileId`].
    ///
    /// # Errors
    ///
    /// Returns [`TileError::DuplicateName`] or [`TileError::DuplicateTagSet`]
    /// on configuration conflicts, and [`TileError::RegistryFull`] when no ids
    /// remain.
    pub fn register(&mut self, tile: Tile) -> Result<TileId, TileError> {
        if self.name_to_id.contains_key(&tile.name) {
            return Err(TileError::DuplicateName(tile.name));
        }
        if let Some(existing) = self.tiles.iter().find(|t| t.tags() == tile.tags()) {
            return Err(TileError::DuplicateTagSet {
                tile: tile.name,
                existing: existing.name.clone(),
            });
        }
        if self.tiles.len() > u16::MAX as usize {
            return Err(TileError::RegistryFull);
        }
        let id = TileId(self.tiles.len() as u16);
        self.name_to_id.insert(tile.name.clone(), id);
        self.tiles.push(tile);
        Ok(id)
    }

    /// Returns the tile for the given id.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of range. Ids are only produced by the registry,
    /// so this indicates a programming error.
    pub fn get(&self, id: TileId) -> &Tile {
        &self.tiles[id.0 as usize]
    }

    pub fn try_get(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(id.0 as usize)
    }

    /// Looks up a tile id by name.
    pub fn lookup_by_name(&self, name: &str) -> Option<TileId> {
        self.name_to_id.get(name).copied()
    }

    /// First tile, in registration order, whose tag-set equals `tags`.
    pub fn find_exact(&self, tags: &TagSet) -> Option<TileId> {
        self.tiles
            .iter()
            .position(|tile| tile.matches(tags))
            .map(|i| TileId(i as u16))
    }

    /// Iterates `(id, tile)` pairs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (TileId, &Tile)> {
        self.tiles
            .iter()
            .enumerate()
            .map(|(i, tile)| (TileId(i as u16), tile))
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}
