//! Procedural 2D tile worlds: coherent climate noise, tag-scoring biome
//! modifiers, exact tag-set tile resolution, and lazily generated chunks.

mod chunk;
mod climate;
mod noise_field;
mod ruleset;
mod shared;
mod world;

pub mod biome;

pub use biome::{
    BiomeClassifier, BiomeModifier, CacheStats, Classification, ModifierError, NoMatchingTile,
    ResolutionCache, ResolutionKey, Rgb, TagSet, Tile, TileError, TileId, TileRegistry, ValueRange,
    aggregate_tags,
};
pub use chunk::{CHUNK_AREA, CHUNK_SIZE, Chunk, ChunkCoord, ChunkError};
pub use climate::{Climate, ClimateAxis, ClimateOverlay, ClimateSampler, NOISE_SCALE};
pub use noise_field::NoiseField;
pub use ruleset::{ModifierDef, Ruleset, RulesetError, TileDef};
pub use shared::{SharedWorld, default_worker_count};
pub use world::{GenerationError, ParamsError, World, WorldParams};
