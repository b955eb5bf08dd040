//! Tile definition: a named, colored terrain unit identified by an exact tag-set.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::TileError;

/// An unordered set of tag names. Sorted iteration keeps keys canonical.
pub type TagSet = BTreeSet<String>;

/// Display color, 8 bits per channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Compact handle into a [`TileRegistry`](super::TileRegistry).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId(pub u16);

/// A renderable terrain unit.
#[derive(Clone, Debug, PartialEq)]
pub struct Tile {
    /// Human-readable name (e.g. "Base Tile").
    pub name: String,
    /// Short symbol used by text views (e.g. "B").
    pub symbol: String,
    pub color: Rgb,
    tags: TagSet,
}

impl Tile {
    /// Create a tile that matches exactly the given tags.
    ///
    /// # Errors
    ///
    /// Returns [`TileError::DuplicateTag`] if a tag is listed more than once.
    pub fn new<I, S>(
        name: impl Into<String>,
        symbol: impl Into<String>,
        color: Rgb,
        tags: I,
    ) -> Result<Self, TileError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.into();
        let mut set = TagSet::new();
        for tag in tags {
            let tag = tag.into();
            if set.contains(&tag) {
                return Err(TileError::DuplicateTag { tile: name, tag });
            }
            set.insert(tag);
        }
        Ok(Self {
            name,
            symbol: symbol.into(),
            color,
            tags: set,
        })
    }

    /// The exact tag-set this tile stands for.
    pub fn tags(&self) -> &TagSet {
        &self.tags
    }

    /// Exclusive match: `true` only if `tags` equals this tile's tag-set.
    /// A subset or superset never matches.
    pub fn matches(&self, tags: &TagSet) -> bool {
        self.tags == *tags
    }
}
