//! Biome modifiers: rectangular regions of climate space that contribute
//! weighted tags when a sample falls inside them.

use serde::{Deserialize, Serialize};

use crate::climate::{Climate, ClimateAxis};

/// A closed interval `[min, max]` on one climate axis.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    /// The whole noise domain, `[-1, 1]`.
    pub const FULL: Self = Self {
        min: -1.0,
        max: 1.0,
    };

    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Inclusive on both ends.
    #[inline]
    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }
}

impl Default for ValueRange {
    fn default() -> Self {
        Self::FULL
    }
}

/// Errors raised while constructing a [`BiomeModifier`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModifierError {
    /// `min > max` (or a bound is NaN) on an axis.
    #[error("modifier {modifier:?}: {axis} range is inverted (min {min} > max {max})")]
    InvalidRange {
        modifier: String,
        axis: ClimateAxis,
        min: f64,
        max: f64,
    },
    /// A bound lies outside the noise domain `[-1, 1]`.
    #[error("modifier {modifier:?}: {axis} bound {value} is outside [-1, 1]")]
    OutOfDomain {
        modifier: String,
        axis: ClimateAxis,
        value: f64,
    },
    /// A tag weight is NaN or infinite.
    #[error("modifier {modifier:?}: weight for tag {tag:?} is not finite")]
    NonFiniteWeight { modifier: String, tag: String },
}

/// A named rule matching a box in (height, temperature, humidity, rainfall)
/// space.
///
/// While a sample lies inside all four ranges the modifier is *active* and
/// adds each of its tag weights to the running score. Weights may be
/// negative, letting one modifier cancel a tag contributed by another.
#[derive(Clone, Debug, PartialEq)]
pub struct BiomeModifier {
    name: String,
    height: ValueRange,
    temperature: ValueRange,
    humidity: ValueRange,
    rainfall: ValueRange,
    tags: Vec<(String, f64)>,
}

impl BiomeModifier {
    /// Build a modifier, validating every range and weight.
    ///
    /// # Errors
    ///
    /// Returns [`ModifierError`] if a range is inverted, a bound leaves
    /// `[-1, 1]`, or a weight is not finite.
    pub fn new(
        name: impl Into<String>,
        height: ValueRange,
        temperature: ValueRange,
        humidity: ValueRange,
        rainfall: ValueRange,
        tags: Vec<(String, f64)>,
    ) -> Result<Self, ModifierError> {
        let modifier = Self {
            name: name.into(),
            height,
            temperature,
            humidity,
            rainfall,
            tags,
        };
        modifier.validate()?;
        Ok(modifier)
    }

    /// A modifier whose ranges cover the entire noise domain, so it is
    /// active at every coordinate.
    pub fn everywhere(
        name: impl Into<String>,
        tags: Vec<(String, f64)>,
    ) -> Result<Self, ModifierError> {
        Self::new(
            name,
            ValueRange::FULL,
            ValueRange::FULL,
            ValueRange::FULL,
            ValueRange::FULL,
            tags,
        )
    }

    fn validate(&self) -> Result<(), ModifierError> {
        for axis in ClimateAxis::ALL {
            let range = self.range(axis);
            for value in [range.min, range.max] {
                if !(-1.0..=1.0).contains(&value) && !value.is_nan() {
                    return Err(ModifierError::OutOfDomain {
                        modifier: self.name.clone(),
                        axis,
                        value,
                    });
                }
            }
            if range.min.is_nan() || range.max.is_nan() || range.min > range.max {
                return Err(ModifierError::InvalidRange {
                    modifier: self.name.clone(),
                    axis,
                    min: range.min,
                    max: range.max,
                });
            }
        }
        if let Some((tag, _)) = self.tags.iter().find(|(_, w)| !w.is_finite()) {
            return Err(ModifierError::NonFiniteWeight {
                modifier: self.name.clone(),
                tag: tag.clone(),
            });
        }
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tag contributions in declaration order.
    pub fn tags(&self) -> &[(String, f64)] {
        &self.tags
    }

    /// Returns the range for one axis.
    pub fn range(&self, axis: ClimateAxis) -> ValueRange {
        match axis {
            ClimateAxis::Height => self.height,
            ClimateAxis::Temperature => self.temperature,
            ClimateAxis::Humidity => self.humidity,
            ClimateAxis::Rainfall => self.rainfall,
        }
    }

    /// Returns `true` if every climate value lies within its inclusive range.
    pub fn is_valid(&self, climate: &Climate) -> bool {
        self.height.contains(climate.height)
            && self.temperature.contains(climate.temperature)
            && self.humidity.contains(climate.humidity)
            && self.rainfall.contains(climate.rainfall)
    }
}
