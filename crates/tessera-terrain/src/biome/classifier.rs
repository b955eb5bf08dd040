//! Biome classification: climate sample → active modifiers → weighted tag
//! scores → exclusive tag-set → tile.

use rustc_hash::FxHashMap;

use super::{BiomeModifier, TagSet, TileId, TileRegistry};
use crate::climate::{Climate, ClimateSampler};

/// Sums the tag weights of `active` modifiers and keeps every tag whose total
/// is strictly greater than zero.
///
/// A total of exactly `0.0` is excluded, so `+5` and `-5` on the same tag
/// cancel out.
pub fn aggregate_tags<'a, I>(active: I) -> TagSet
where
    I: IntoIterator<Item = &'a BiomeModifier>,
{
    let mut scores: FxHashMap<&str, f64> = FxHashMap::default();
    for modifier in active {
        for (tag, weight) in modifier.tags() {
            *scores.entry(tag.as_str()).or_insert(0.0) += *weight;
        }
    }
    scores
        .into_iter()
        .filter(|(_, score)| *score > 0.0)
        .map(|(tag, _)| tag.to_string())
        .collect()
}

/// Result of classifying one coordinate, before tile resolution.
#[derive(Clone, Debug, PartialEq)]
pub struct Classification {
    pub climate: Climate,
    /// Names of active modifiers, in modifier declaration order.
    pub active_modifiers: Vec<String>,
    /// Final tag-set after score aggregation.
    pub tags: TagSet,
}

/// Samples the climate and scores modifiers for a coordinate.
#[derive(Debug)]
pub struct BiomeClassifier {
    climate: ClimateSampler,
    modifiers: Vec<BiomeModifier>,
}

impl BiomeClassifier {
    pub fn new(climate: ClimateSampler) -> Self {
        Self {
            climate,
            modifiers: Vec::new(),
        }
    }

    /// Appends a modifier. Scores are order-independent, so order only
    /// affects the listing in [`Classification::active_modifiers`].
    pub fn add_modifier(&mut self, modifier: BiomeModifier) {
        self.modifiers.push(modifier);
    }

    pub fn modifiers(&self) -> &[BiomeModifier] {
        &self.modifiers
    }

    pub fn climate_sampler(&self) -> &ClimateSampler {
        &self.climate
    }

    /// Classify tile coordinate `(x, y)`.
    pub fn classify(&self, x: i64, y: i64) -> Classification {
        let climate = self.climate.sample(x, y);
        let active: Vec<&BiomeModifier> = self
            .modifiers
            .iter()
            .filter(|m| m.is_valid(&climate))
            .collect();
        let tags = aggregate_tags(active.iter().copied());
        Classification {
            climate,
            active_modifiers: active.iter().map(|m| m.name().to_string()).collect(),
            tags,
        }
    }
}

/// Canonical resolution cache key: sorted tags and sorted active modifier
/// names kept as separate lists, so distinct inputs never alias.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ResolutionKey {
    tags: Vec<String>,
    modifiers: Vec<String>,
}

impl ResolutionKey {
    pub fn new(tags: &TagSet, active_modifiers: &[String]) -> Self {
        let mut modifiers = active_modifiers.to_vec();
        modifiers.sort_unstable();
        Self {
            tags: tags.iter().cloned().collect(),
            modifiers,
        }
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn modifiers(&self) -> &[String] {
        &self.modifiers
    }
}

/// No registered tile has exactly the requested tag-set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("no tile matches tag set {tags:?}")]
pub struct NoMatchingTile {
    pub tags: Vec<String>,
}

/// Hit and miss counters for a [`ResolutionCache`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

/// Memoizes tag-set → tile resolution. Entries are never evicted.
#[derive(Clone, Debug, Default)]
pub struct ResolutionCache {
    entries: FxHashMap<ResolutionKey, TileId>,
    stats: CacheStats,
}

impl ResolutionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `tags` to a tile, scanning `registry` in declaration order on
    /// a miss and caching the first exact match.
    ///
    /// # Errors
    ///
    /// Returns [`NoMatchingTile`] if no tile has exactly this tag-set. Failed
    /// lookups are not cached.
    pub fn resolve(
        &mut self,
        registry: &TileRegistry,
        tags: &TagSet,
        active_modifiers: &[String],
    ) -> Result<TileId, NoMatchingTile> {
        let key = ResolutionKey::new(tags, active_modifiers);
        if let Some(&id) = self.entries.get(&key) {
            self.stats.hits += 1;
            return Ok(id);
        }
        self.stats.misses += 1;
        let id = registry.find_exact(tags).ok_or_else(|| NoMatchingTile {
            tags: key.tags.clone(),
        })?;
        tracing::trace!(?key, tile = %registry.get(id).name, "resolution cache miss");
        self.entries.insert(key, id);
        Ok(id)
    }

    pub fn get(&self, key: &ResolutionKey) -> Option<TileId> {
        self.entries.get(key).copied()
    }

    /// Iterates all cached entries.
    pub fn iter(&self) -> impl Iterator<Item = (&ResolutionKey, &TileId)> {
        self.entries.iter()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
