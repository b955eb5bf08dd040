//! Climate sampling: four independent noise fields (height, temperature,
//! humidity, rainfall) evaluated at a tile coordinate.

use crate::biome::Rgb;
use crate::noise_field::NoiseField;

/// Default scale applied to tile coordinates before sampling noise.
///
/// Smaller values stretch the noise and produce larger, smoother biome regions.
pub const NOISE_SCALE: f64 = 0.01;

/// The four environmental axes a biome modifier is matched against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ClimateAxis {
    Height,
    Temperature,
    Humidity,
    Rainfall,
}

impl ClimateAxis {
    /// All axes in declaration order.
    pub const ALL: [ClimateAxis; 4] = [
        ClimateAxis::Height,
        ClimateAxis::Temperature,
        ClimateAxis::Humidity,
        ClimateAxis::Rainfall,
    ];

    /// Lowercase axis name.
    pub fn name(self) -> &'static str {
        match self {
            ClimateAxis::Height => "height",
            ClimateAxis::Temperature => "temperature",
            ClimateAxis::Humidity => "humidity",
            ClimateAxis::Rainfall => "rainfall",
        }
    }
}

impl std::fmt::Display for ClimateAxis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One climate sample. Every value lies in `[-1, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Climate {
    pub height: f64,
    pub temperature: f64,
    pub humidity: f64,
    pub rainfall: f64,
}

impl Climate {
    /// Returns the value for a single axis.
    pub fn get(&self, axis: ClimateAxis) -> f64 {
        match axis {
            ClimateAxis::Height => self.height,
            ClimateAxis::Temperature => self.temperature,
            ClimateAxis::Humidity => self.humidity,
            ClimateAxis::Rainfall => self.rainfall,
        }
    }
}

/// Samples all four climate fields for a world.
///
/// Field seeds are derived from one world seed as `seed`, `2 * seed`,
/// `3 * seed` and `4 * seed` (wrapping), so the same seed always reproduces
/// the same climate.
#[derive(Debug)]
pub struct ClimateSampler {
    seed: u32,
    scale: f64,
    height: NoiseField,
    temperature: NoiseField,
    humidity: NoiseField,
    rainfall: NoiseField,
}

impl ClimateSampler {
    /// Create a sampler for `seed`, scaling tile coordinates by `scale`.
    pub fn new(seed: u32, scale: f64) -> Self {
        Self {
            seed,
            scale,
            height: NoiseField::new(seed),
            temperature: NoiseField::new(seed.wrapping_mul(2)),
            humidity: NoiseField::new(seed.wrapping_mul(3)),
            rainfall: NoiseField::new(seed.wrapping_mul(4)),
        }
    }

    /// The world seed the fields were derived from.
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// The coordinate scale shared by all four fields.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Returns the noise field backing an axis.
    pub fn field(&self, axis: ClimateAxis) -> &NoiseField {
        match axis {
            ClimateAxis::Height => &self.height,
            ClimateAxis::Temperature => &self.temperature,
            ClimateAxis::Humidity => &self.humidity,
            ClimateAxis::Rainfall => &self.rainfall,
        }
    }

    /// Sample the climate at tile coordinate `(x, y)`.
    pub fn sample(&self, x: i64, y: i64) -> Climate {
        let nx = x as f64 * self.scale;
        let ny = y as f64 * self.scale;
        Climate {
            height: self.height.sample(nx, ny),
            temperature: self.temperature.sample(nx, ny),
            humidity: self.humidity.sample(nx, ny),
            rainfall: self.rainfall.sample(nx, ny),
        }
    }
}

/// Debug overlay that visualizes raw climate values as a color.
///
/// Temperature drives red, rainfall drives green and humidity drives blue.
/// Disabled channels contribute 0.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ClimateOverlay {
    pub temperature: bool,
    pub rainfall: bool,
    pub humidity: bool,
}

impl ClimateOverlay {
    /// Returns `true` if at least one channel is enabled.
    pub fn is_active(&self) -> bool {
        self.temperature || self.rainfall || self.humidity
    }

    /// Overlay color for a sample, or `None` when every channel is off.
    pub fn color(&self, climate: &Climate) -> Option<Rgb> {
        if !self.is_active() {
            return None;
        }
        let channel = |enabled: bool, v: f64| {
            if enabled {
                ((v + 1.0) * 128.0).clamp(0.0, 255.0) as u8
            } else {
                0
            }
        };
        Some(Rgb(
            channel(self.temperature, climate.temperature),
            channel(self.rainfall, climate.rainfall),
            channel(self.humidity, climate.humidity),
        ))
    }
}
