//! Biome system: climate-range modifiers, tag scoring, and exact tag-set
//! tile resolution.
//!
//! Modifiers match boxes in climate space and contribute signed tag weights.
//! The positive-scoring tags form a tag-set that must equal a registered
//! tile's tag-set exactly.

mod classifier;
mod modifier;
mod registry;
mod tile;

pub use classifier::{
    BiomeClassifier, CacheStats, Classification, NoMatchingTile, ResolutionCache, ResolutionKey,
    aggregate_tags,
};
pub use modifier::{BiomeModifier, ModifierError, ValueRange};
pub use registry::{TileError, TileRegistry};
pub use tile::{Rgb, TagSet, Tile, TileId};
