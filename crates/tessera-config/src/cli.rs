//! Command-line argument parsing for Tessera.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;
use crate::config::is_valid_noise_scale;

/// Tessera command-line arguments.
///
/// World and debug values override settings loaded from `config.ron`; the
/// view options (chunk position, radius, threads) are per-run only.
#[derive(Parser, Debug)]
#[command(name = "tessera", about = "Procedural tile world generator")]
pub struct CliArgs {
    /// World seed.
    #[arg(long)]
    pub seed: Option<u32>,

    /// Noise scale applied to tile coordinates (finite, greater than zero).
    #[arg(long, value_parser = parse_noise_scale)]
    pub noise_scale: Option<f64>,

    /// RON file with biome modifiers and tiles.
    #[arg(long)]
    pub ruleset: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Chunk X coordinate to display.
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub chunk_x: i64,

    /// Chunk Y coordinate to display.
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub chunk_y: i64,

    /// Also display every chunk within this many chunks of the centre.
    #[arg(long, default_value_t = 0)]
    pub radius: u32,

    /// Worker threads for generation (defaults to the CPU count).
    #[arg(long)]
    pub threads: Option<usize>,
}

fn parse_noise_scale(arg: &str) -> Result<f64, String> {
    let scale: f64 = arg.parse().map_err(|e| format!("{e}"))?;
    if is_valid_noise_scale(scale) {
        Ok(scale)
    } else {
        Err(format!("must be finite and greater than zero, got {scale}"))
    }
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(seed) = args.seed {
            self.world.seed = seed;
        }
        if let Some(scale) = args.noise_scale {
            self.world.noise_scale = scale;
        }
        if let Some(ref path) = args.ruleset {
            self.world.ruleset = Some(path.clone());
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
