//! The world: climate fields, biome rules, tile registry, and the two
//! permanent caches (tag resolution and generated chunks).
//!
//! Chunks are generated lazily and kept for the lifetime of the world.
//! Nothing is evicted automatically; [`World::unload_chunk`] is the only way
//! a chunk leaves the cache.

use rustc_hash::FxHashMap;

use crate::biome::{
    BiomeClassifier, BiomeModifier, CacheStats, Classification, ResolutionCache, Tile, TileError,
    TileId, TileRegistry,
};
use crate::chunk::{CHUNK_SIZE, Chunk, ChunkCoord, ChunkError};
use crate::climate::{Climate, ClimateSampler, NOISE_SCALE};
use crate::ruleset::{Ruleset, RulesetError};
use crate::shared::SharedWorld;

/// Parameters fixed at world construction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldParams {
    /// Master seed. The four climate fields use `seed * 1..=4`.
    pub seed: u32,
    /// Scale applied to tile coordinates before noise sampling.
    pub noise_scale: f64,
}

impl WorldParams {
    /// Validated parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ParamsError::InvalidNoiseScale`] unless `noise_scale` is
    /// finite and greater than zero.
    pub fn new(seed: u32, noise_scale: f64) -> Result<Self, ParamsError> {
        if !noise_scale.is_finite() || noise_scale <= 0.0 {
            return Err(ParamsError::InvalidNoiseScale(noise_scale));
        }
        Ok(Self { seed, noise_scale })
    }
}

impl Default for WorldParams {
    fn default() -> Self {
        Self {
            seed: 0,
            noise_scale: NOISE_SCALE,
        }
    }
}

/// Rejected [`WorldParams`].
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum ParamsError {
    #[error("noise scale must be finite and greater than zero, got {0}")]
    InvalidNoiseScale(f64),
}

/// Errors raised while generating tiles or chunks.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    /// The tag-set computed at `(x, y)` matches no registered tile.
    #[error("no tile matches tags {tags:?} at ({x}, {y}) (active modifiers: {modifiers:?})")]
    NoMatchingTile {
        x: i64,
        y: i64,
        tags: Vec<String>,
        modifiers: Vec<String>,
    },

    #[error(transparent)]
    Chunk(#[from] ChunkError),
}

/// Owns every piece of world state and generates chunks on demand.
#[derive(Debug)]
pub struct World {
    params: WorldParams,
    classifier: BiomeClassifier,
    tiles: TileRegistry,
    cache: ResolutionCache,
    chunks: FxHashMap<ChunkCoord, Chunk>,
}

impl World {
    /// Create an empty world (no modifiers, no tiles) for `seed`.
    pub fn new(seed: u32) -> Self {
        Self::with_params(WorldParams {
            seed,
            ..WorldParams::default()
        })
    }

    pub fn with_params(params: WorldParams) -> Self {
        Self {
            params,
            classifier: BiomeClassifier::new(ClimateSampler::new(params.seed, params.noise_scale)),
            tiles: TileRegistry::new(),
            cache: ResolutionCache::new(),
            chunks: FxHashMap::default(),
        }
    }

    /// Create a world and load every modifier and tile from `ruleset`.
    ///
    /// # Errors
    ///
    /// Returns [`RulesetError`] if any modifier or tile fails validation.
    pub fn from_ruleset(params: WorldParams, ruleset: &Ruleset) -> Result<Self, RulesetError> {
        let (modifiers, tiles) = ruleset.build()?;
        let mut world = Self::with_params(params);
        for modifier in modifiers {
            world.add_biome_modifier(modifier);
        }
        world.tiles = tiles;
        Ok(world)
    }

    pub fn params(&self) -> WorldParams {
        self.params
    }

    pub fn seed(&self) -> u32 {
        self.params.seed
    }

    /// Append a biome modifier.
    ///
    /// Chunks generated earlier are not regenerated, so modifiers should be
    /// added before the first chunk is requested.
    pub fn add_biome_modifier(&mut self, modifier: BiomeModifier) {
        if !self.chunks.is_empty() {
            tracing::warn!(
                modifier = modifier.name(),
                loaded = self.chunks.len(),
                "biome modifier added after chunks were generated; existing chunks keep old tiles"
            );
        }
        self.classifier.add_modifier(modifier);
    }

    /// Append a tile. Registration order decides first-match resolution.
    ///
    /// # Errors
    ///
    /// See [`TileRegistry::register`].
    pub fn register_tile(&mut self, tile: Tile) -> Result<TileId, TileError> {
        self.tiles.register(tile)
    }

    pub fn modifiers(&self) -> &[BiomeModifier] {
        self.classifier.modifiers()
    }

    pub fn tiles(&self) -> &TileRegistry {
        &self.tiles
    }

    /// Shorthand for `self.tiles().get(id)`.
    pub fn tile(&self, id: TileId) -> &Tile {
        self.tiles.get(id)
    }

    /// Raw climate sample at tile coordinate `(x, y)`.
    pub fn climate_at(&self, x: i64, y: i64) -> Climate {
        self.classifier.climate_sampler().sample(x, y)
    }

    /// Climate, active modifiers and final tag-set at `(x, y)`, without
    /// resolving a tile.
    pub fn classify(&self, x: i64, y: i64) -> Classification {
        self.classifier.classify(x, y)
    }

    /// Classify `(x, y)` and resolve it to a tile through the cache.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::NoMatchingTile`] if the tag-set has no tile.
    pub fn generate(&mut self, x: i64, y: i64) -> Result<TileId, GenerationError> {
        resolve_at(&self.classifier, &self.tiles, &mut self.cache, x, y)
    }

    /// Generate the chunk at `coord` unless it already exists.
    ///
    /// Either the whole chunk is stored or, on error, nothing is.
    ///
    /// # Errors
    ///
    /// Propagates the first [`GenerationError`] hit inside the chunk, or
    /// [`ChunkError::CoordinateOutOfRange`] if `coord` has no tile origin.
    pub fn new_chunk(&mut self, coord: ChunkCoord) -> Result<(), GenerationError> {
        if self.chunks.contains_key(&coord) {
            return Ok(());
        }
        let chunk = Chunk::generate(coord, |x, y| {
            resolve_at(&self.classifier, &self.tiles, &mut self.cache, x, y)
        })?;
        tracing::debug!(x = coord.x, y = coord.y, "generated chunk");
        self.chunks.insert(coord, chunk);
        Ok(())
    }

    /// Returns a previously generated chunk. Never generates.
    pub fn get_chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }

    /// Returns the chunk at `coord`, generating it first if needed.
    ///
    /// # Errors
    ///
    /// See [`World::new_chunk`].
    pub fn load_chunk(&mut self, coord: ChunkCoord) -> Result<&Chunk, GenerationError> {
        self.new_chunk(coord)?;
        Ok(&self.chunks[&coord])
    }

    /// Tile at world coordinate `(x, y)`, generating the containing chunk if
    /// needed.
    ///
    /// # Errors
    ///
    /// See [`World::new_chunk`].
    pub fn tile_at(&mut self, x: i64, y: i64) -> Result<TileId, GenerationError> {
        let coord = ChunkCoord::containing(x, y);
        let chunk = self.load_chunk(coord)?;
        let size = CHUNK_SIZE as i64;
        let lx = x.rem_euclid(size) as usize;
        let ly = y.rem_euclid(size) as usize;
        Ok(chunk.tiles()[ly * CHUNK_SIZE + lx])
    }

    /// Removes and returns a chunk. Returns `None` if it was never generated.
    pub fn unload_chunk(&mut self, coord: ChunkCoord) -> Option<Chunk> {
        self.chunks.remove(&coord)
    }

    pub fn loaded_chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Iterates all generated chunk coordinates.
    pub fn loaded_coords(&self) -> impl Iterator<Item = &ChunkCoord> {
        self.chunks.keys()
    }

    pub fn resolution_cache(&self) -> &ResolutionCache {
        &self.cache
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Freeze the configuration and move all state into a [`SharedWorld`]
    /// for multi-threaded generation.
    pub fn into_shared(self) -> SharedWorld {
        SharedWorld::from_parts(
            self.params,
            self.classifier,
            self.tiles,
            self.cache,
            self.chunks,
        )
    }
}

fn resolve_at(
    classifier: &BiomeClassifier,
    tiles: &TileRegistry,
    cache: &mut ResolutionCache,
    x: i64,
    y: i64,
) -> Result<TileId, GenerationError> {
    let Classification {
        tags,
        active_modifiers,
        ..
    } = classifier.classify(x, y);
    cache
        .resolve(tiles, &tags, &active_modifiers)
        .map_err(|e| GenerationError::NoMatchingTile {
            x,
            y,
            tags: e.tags,
            modifiers: active_modifiers,
        })
}
