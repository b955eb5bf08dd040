//! Thread-safe world for generating many chunks in parallel.
//!
//! Modifiers and tiles are frozen. Both caches move into [`DashMap`]s.
//!
//! Each coordinate being generated gets its own mutex in `generating`. A
//! thread holds that mutex, not a map shard, while it builds the chunk, so
//! unrelated coordinates generate in parallel and one coordinate is
//! generated at most once even when several threads request it together.

use std::sync::{Arc, Mutex, PoisonError};

use dashmap::DashMap;
use rustc_hash::FxHashMap;

use crate::biome::{
    BiomeClassifier, BiomeModifier, Classification, ResolutionCache, ResolutionKey, TileId,
    TileRegistry,
};
use crate::chunk::{Chunk, ChunkCoord};
use crate::climate::Climate;
use crate::world::{GenerationError, WorldParams};

/// A world that can be shared across threads (`&SharedWorld` is `Sync`).
#[derive(Debug)]
pub struct SharedWorld {
    params: WorldParams,
    classifier: BiomeClassifier,
    tiles: TileRegistry,
    cache: DashMap<ResolutionKey, TileId>,
    chunks: DashMap<ChunkCoord, Arc<Chunk>>,
    /// Per-coordinate generation locks. Removed once the chunk is stored.
    generating: DashMap<ChunkCoord, Arc<Mutex<()>>>,
}

impl SharedWorld {
    pub(crate) fn from_parts(
        params: WorldParams,
        classifier: BiomeClassifier,
        tiles: TileRegistry,
        cache: ResolutionCache,
        chunks: FxHashMap<ChunkCoord, Chunk>,
    ) -> Self {
        Self {
            params,
            classifier,
            tiles,
            cache: cache.iter().map(|(k, v)| (k.clone(), *v)).collect(),
            chunks: chunks
                .into_iter()
                .map(|(coord, chunk)| (coord, Arc::new(chunk)))
                .collect(),
            generating: DashMap::new(),
        }
    }

    pub fn params(&self) -> WorldParams {
        self.params
    }

    pub fn modifiers(&self) -> &[BiomeModifier] {
        self.classifier.modifiers()
    }

    pub fn tiles(&self) -> &TileRegistry {
        &self.tiles
    }

    /// Raw climate sample at tile coordinate `(x, y)`.
    pub fn climate_at(&self, x: i64, y: i64) -> Climate {
        self.classifier.climate_sampler().sample(x, y)
    }

    /// Classify and resolve `(x, y)`.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::NoMatchingTile`] if the tag-set has no tile.
    pub fn generate(&self, x: i64, y: i64) -> Result<TileId, GenerationError> {
        let Classification {
            tags,
            active_modifiers,
            ..
        } = self.classifier.classify(x, y);
        let key = ResolutionKey::new(&tags, &active_modifiers);
        if let Some(id) = self.cache.get(&key) {
            return Ok(*id);
        }
        let id = self
            .tiles
            .find_exact(&tags)
            .ok_or_else(|| GenerationError::NoMatchingTile {
                x,
                y,
                tags: key.tags().to_vec(),
                modifiers: active_modifiers,
            })?;
        // Racing inserts of one key always carry the same id.
        self.cache.insert(key, id);
        Ok(id)
    }

    /// Generate the chunk at `coord` unless it exists, and return it.
    ///
    /// # Errors
    ///
    /// Propagates the first [`GenerationError`]; nothing is stored on failure.
    pub fn new_chunk(&self, coord: ChunkCoord) -> Result<Arc<Chunk>, GenerationError> {
        if let Some(chunk) = self.get_chunk(coord) {
            return Ok(chunk);
        }
        // The shard guard from `entry` is dropped at the end of this statement.
        let lock = Arc::clone(self.generating.entry(coord).or_default().value());
        // The mutex guards no data, so a poisoned lock is still usable.
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        // Another thread may have finished while this one waited.
        if let Some(chunk) = self.get_chunk(coord) {
            return Ok(chunk);
        }
        let chunk = Arc::new(Chunk::generate(coord, |x, y| self.generate(x, y))?);
        tracing::debug!(x = coord.x, y = coord.y, "generated chunk");
        self.chunks.insert(coord, Arc::clone(&chunk));
        self.generating.remove(&coord);
        Ok(chunk)
    }

    /// Returns a previously generated chunk. Never generates.
    pub fn get_chunk(&self, coord: ChunkCoord) -> Option<Arc<Chunk>> {
        self.chunks.get(&coord).map(|c| Arc::clone(c.value()))
    }

    /// Generate every coordinate in `coords` using `threads` workers.
    ///
    /// Already-generated chunks are skipped. Workers stop picking up new work
    /// after the first failure, and that error is returned.
    pub fn generate_area(
        &self,
        coords: &[ChunkCoord],
        threads: usize,
    ) -> Result<(), GenerationError> {
        let (sender, receiver) = crossbeam_channel::unbounded();
        for &coord in coords {
            if !self.chunks.contains_key(&coord) && sender.send(coord).is_err() {
                break;
            }
        }
        drop(sender);

        let threads = threads.clamp(1, coords.len().max(1));
        tracing::debug!(chunks = receiver.len(), threads, "generating area");
        std::thread::scope(|scope| {
            let workers: Vec<_> = (0..threads)
                .map(|_| {
                    let receiver = receiver.clone();
                    scope.spawn(move || {
                        while let Ok(coord) = receiver.recv() {
                            if let Err(err) = self.new_chunk(coord) {
                                // Drain so the other workers wind down.
                                while receiver.try_recv().is_ok() {}
                                return Err(err);
                            }
                        }
                        Ok(())
                    })
                })
                .collect();

            let mut result = Ok(());
            for worker in workers {
                match worker.join() {
                    Ok(Err(err)) if result.is_ok() => result = Err(err),
                    Ok(_) => {}
                    Err(panic) => std::panic::resume_unwind(panic),
                }
            }
            result
        })
    }

    pub fn loaded_chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn resolution_cache_len(&self) -> usize {
        self.cache.len()
    }
}

/// Worker count for [`SharedWorld::generate_area`]: one per logical CPU.
pub fn default_worker_count() -> usize {
    num_cpus::get().max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biome::{Rgb, Tile};
    use crate::ruleset::Ruleset;
    use crate::world::World;

    fn reference_shared(seed: u32) -> SharedWorld {
        World::from_ruleset(
            WorldParams {
                seed,
                ..WorldParams::default()
            },
            &Ruleset::reference(),
        )
        .unwrap()
        .into_shared()
    }

    fn square(radius: i64) -> Vec<ChunkCoord> {
        let mut coords = Vec::new();
        for y in -radius..=radius {
            for x in -radius..=radius {
                coords.push(ChunkCoord::new(x, y));
            }
        }
        coords
    }

    #[test]
    fn test_shared_matches_single_threaded() {
        let mut world = World::from_ruleset(
            WorldParams {
                seed: 42,
                ..WorldParams::default()
            },
            &Ruleset::reference(),
        )
        .unwrap();
        let expected = world.load_chunk(ChunkCoord::new(1, -1)).unwrap().clone();

        let shared = reference_shared(42);
        let chunk = shared.new_chunk(ChunkCoord::new(1, -1)).unwrap();
        assert_eq!(*chunk, expected);
    }

    #[test]
    fn test_into_shared_keeps_existing_chunks() {
        let mut world = World::from_ruleset(WorldParams::default(), &Ruleset::reference()).unwrap();
        world.new_chunk(ChunkCoord::new(0, 0)).unwrap();
        let cached = world.resolution_cache().len();

        let shared = world.into_shared();
        assert_eq!(shared.loaded_chunk_count(), 1);
        assert_eq!(shared.resolution_cache_len(), cached);
        assert!(shared.get_chunk(ChunkCoord::new(0, 0)).is_some());
        assert!(shared.get_chunk(ChunkCoord::new(0, 1)).is_none());
    }

    #[test]
    fn test_concurrent_requests_generate_once() {
        let shared = reference_shared(7);
        let coord = ChunkCoord::new(3, 3);
        let chunks: Vec<Arc<Chunk>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| shared.new_chunk(coord).unwrap()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert_eq!(shared.loaded_chunk_count(), 1);
        for chunk in &chunks[1..] {
            assert!(Arc::ptr_eq(chunk, &chunks[0]), "chunk was generated twice");
        }
    }

    #[test]
    fn test_concurrent_requests_across_coords_generate_once_each() {
        let shared = reference_shared(7);
        let coords = square(2);
        let chunks: Vec<Vec<Arc<Chunk>>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..6)
                .map(|_| {
                    scope.spawn(|| {
                        coords
                            .iter()
                            .map(|&coord| shared.new_chunk(coord).unwrap())
                            .collect::<Vec<_>>()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert_eq!(shared.loaded_chunk_count(), coords.len());
        for per_thread in &chunks[1..] {
            for (chunk, first) in per_thread.iter().zip(&chunks[0]) {
                assert!(Arc::ptr_eq(chunk, first), "chunk was generated twice");
            }
        }
        assert!(shared.generating.is_empty());
    }

    #[test]
    fn test_chunk_beyond_addressable_world_is_error() {
        let shared = reference_shared(1);
        let coords = [ChunkCoord::new(0, 0), ChunkCoord::new(i64::MAX, 0)];
        let err = shared.generate_area(&coords, 2).unwrap_err();
        assert!(matches!(err, GenerationError::Chunk(_)));
        assert!(shared.get_chunk(ChunkCoord::new(i64::MAX, 0)).is_none());
    }

    #[test]
    fn test_generate_area_fills_every_coord() {
        let shared = reference_shared(42);
        let coords = square(1);
        shared.generate_area(&coords, 4).unwrap();
        assert_eq!(shared.loaded_chunk_count(), coords.len());
        for coord in coords {
            assert_eq!(shared.get_chunk(coord).unwrap().coord(), coord);
        }
    }

    #[test]
    fn test_generate_area_is_deterministic_across_thread_counts() {
        let a = reference_shared(11);
        let b = reference_shared(11);
        let coords = square(1);
        a.generate_area(&coords, 1).unwrap();
        b.generate_area(&coords, default_worker_count()).unwrap();
        for coord in coords {
            assert_eq!(a.get_chunk(coord), b.get_chunk(coord));
        }
    }

    #[test]
    fn test_generate_area_reports_error_and_stores_nothing_partial() {
        let mut world = World::new(42);
        world.add_biome_modifier(
            BiomeModifier::everywhere("Orphan", vec![("Orphan".into(), 1.0)]).unwrap(),
        );
        world
            .register_tile(Tile::new("Unused", "U", Rgb(1, 1, 1), ["Unused"]).unwrap())
            .unwrap();
        let shared = world.into_shared();

        let err = shared.generate_area(&square(1), 3).unwrap_err();
        assert!(matches!(err, GenerationError::NoMatchingTile { .. }));
        assert_eq!(shared.loaded_chunk_count(), 0);
    }

    #[test]
    fn test_climate_matches_world() {
        let world = World::new(42);
        let expected = world.climate_at(-70, 310);
        assert_eq!(world.into_shared().climate_at(-70, 310), expected);
    }

    #[test]
    fn test_generate_area_empty_is_ok() {
        let shared = reference_shared(1);
        shared.generate_area(&[], 4).unwrap();
        assert_eq!(shared.loaded_chunk_count(), 0);
        assert!(shared.modifiers().len() == 4 && shared.tiles().len() == 3);
        assert_eq!(shared.params().seed, 1);
    }
}
