//! Biome rule manifests: modifiers and tiles declared in a RON file.
//!
//! ```ron
//! (
//!     modifiers: [
//!         (name: "Base", tags: [("Base", 1.0)]),
//!         (name: "Warm", temperature: (min: 0.5, max: 1.0), tags: [("Warm", 2.0)]),
//!     ],
//!     tiles: [
//!         (name: "Base Tile", symbol: "B", color: (0, 150, 25), tags: ["Base"]),
//!     ],
//! )
//! ```
//!
//! Omitted ranges default to the full `[-1, 1]` domain. Tile order in the
//! manifest is registration order.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::biome::{BiomeModifier, ModifierError, Rgb, Tile, TileError, TileRegistry, ValueRange};

/// Errors produced while loading or building a [`Ruleset`].
#[derive(Debug, thiserror::Error)]
pub enum RulesetError {
    #[error("failed to read ruleset: {0}")]
    Read(#[source] std::io::Error),
    #[error("failed to parse ruleset: {0}")]
    Parse(#[source] ron::error::SpannedError),
    #[error("failed to serialize ruleset: {0}")]
    Serialize(#[source] ron::Error),
    #[error(transparent)]
    Modifier(#[from] ModifierError),
    #[error(transparent)]
    Tile(#[from] TileError),
}

/// One modifier entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModifierDef {
    pub name: String,
    #[serde(default)]
    pub height: ValueRange,
    #[serde(default)]
    pub temperature: ValueRange,
    #[serde(default)]
    pub humidity: ValueRange,
    #[serde(default)]
    pub rainfall: ValueRange,
    pub tags: Vec<(String, f64)>,
}

/// One tile entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TileDef {
    pub name: String,
    pub symbol: String,
    pub color: Rgb,
    pub tags: Vec<String>,
}

/// A complete set of biome modifiers and tiles.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Ruleset {
    #[serde(default)]
    pub modifiers: Vec<ModifierDef>,
    #[serde(default)]
    pub tiles: Vec<TileDef>,
}

impl Ruleset {
    /// The built-in rule set: an always-on "Base" modifier, two overlapping
    /// "Simple" contributors and an "Anti Base" suppressor.
    pub fn reference() -> Self {
        let modifier = |name: &str, ranges: [(f64, f64); 4], tags: &[(&str, f64)]| ModifierDef {
            name: name.to_string(),
            height: ValueRange::new(ranges[0].0, ranges[0].1),
            temperature: ValueRange::new(ranges[1].0, ranges[1].1),
            humidity: ValueRange::new(ranges[2].0, ranges[2].1),
            rainfall: ValueRange::new(ranges[3].0, ranges[3].1),
            tags: tags.iter().map(|(t, w)| (t.to_string(), *w)).collect(),
        };
        let tile = |name: &str, symbol: &str, color: Rgb, tags: &[&str]| TileDef {
            name: name.to_string(),
            symbol: symbol.to_string(),
            color,
            tags: tags.iter().map(|t| t.to_string()).collect(),
        };
        Self {
            modifiers: vec![
                modifier(
                    "Base",
                    [(-1.0, 1.0), (-1.0, 1.0), (-1.0, 1.0), (-1.0, 1.0)],
                    &[("Base", 1.0)],
                ),
                modifier(
                    "Simple",
                    [(0.0, 1.0), (0.5, 1.0), (0.2, 0.5), (0.05, 0.1)],
                    &[("Simple", 5.0)],
                ),
                modifier(
                    "Shrimple",
                    [(-0.5, 1.0), (0.5, 1.0), (0.2, 0.5), (-0.25, 0.1)],
                    &[("Simple", 1.5)],
                ),
                modifier(
                    "Anti Base",
                    [(0.2, 0.5), (0.5, 0.8), (0.3, 0.4), (0.05, 0.1)],
                    &[("Base", -1.0)],
                ),
            ],
            tiles: vec![
                tile("Simple Tile", "S", Rgb(25, 25, 25), &["Simple"]),
                tile("Base Tile", "B", Rgb(0, 150, 25), &["Base"]),
                tile("Simple Base Tile", "$", Rgb(50, 100, 50), &["Simple", "Base"]),
            ],
        }
    }

    /// Parse a ruleset from RON text.
    pub fn from_ron_str(text: &str) -> Result<Self, RulesetError> {
        ron::from_str(text).map_err(RulesetError::Parse)
    }

    /// Load a ruleset from a RON file.
    pub fn load(path: &Path) -> Result<Self, RulesetError> {
        let text = std::fs::read_to_string(path).map_err(RulesetError::Read)?;
        let ruleset = Self::from_ron_str(&text)?;
        tracing::info!(
            path = %path.display(),
            modifiers = ruleset.modifiers.len(),
            tiles = ruleset.tiles.len(),
            "loaded ruleset"
        );
        Ok(ruleset)
    }

    /// Serialize to pretty-printed RON.
    pub fn to_ron_string(&self) -> Result<String, RulesetError> {
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .enumerate_arrays(false);
        ron::ser::to_string_pretty(self, pretty).map_err(RulesetError::Serialize)
    }

    /// Validate every entry and build the modifier list and tile registry.
    ///
    /// # Errors
    ///
    /// Returns the first [`ModifierError`] or [`TileError`] encountered.
    pub fn build(&self) -> Result<(Vec<BiomeModifier>, TileRegistry), RulesetError> {
        let modifiers = self
            .modifiers
            .iter()
            .map(|def| {
                BiomeModifier::new(
                    def.name.clone(),
                    def.height,
                    def.temperature,
                    def.humidity,
                    def.rainfall,
                    def.tags.clone(),
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut registry = TileRegistry::new();
        for def in &self.tiles {
            let tile = Tile::new(def.name.clone(), def.symbol.clone(), def.color, &def.tags)?;
            registry.register(tile)?;
        }
        Ok((modifiers, registry))
    }
}
