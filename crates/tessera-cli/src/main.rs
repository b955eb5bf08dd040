//! `tessera`: generate a world from a seed and print chunks as text.

mod view;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tessera_config::{CliArgs, Config, default_config_dir};
use tessera_terrain::{
    ChunkCoord, ClimateOverlay, GenerationError, ParamsError, Ruleset, RulesetError, World,
    WorldParams, default_worker_count,
};
use tracing::info;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("ruleset: {0}")]
    Ruleset(#[from] RulesetError),
    #[error(transparent)]
    Params(#[from] ParamsError),
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error("radius {radius} around chunk ({x}, {y}) leaves the addressable world")]
    AreaOutOfRange { x: i64, y: i64, radius: u32 },
}

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let config_dir = match args.config.clone().map_or_else(default_config_dir, Ok) {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Load or create config, then apply CLI overrides
    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.join("logs");
    tessera_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    match run(&args, &config, &config_dir) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &CliArgs, config: &Config, config_dir: &Path) -> Result<(), CliError> {
    let ruleset = load_ruleset(config.ruleset_path(config_dir))?;
    let params = WorldParams::new(config.world.seed, config.world.noise_scale)?;
    let world = World::from_ruleset(params, &ruleset)?.into_shared();
    info!(
        seed = params.seed,
        modifiers = world.modifiers().len(),
        tiles = world.tiles().len(),
        "world ready"
    );

    let center = ChunkCoord::new(args.chunk_x, args.chunk_y);
    let coords = area(center, args.radius).ok_or(CliError::AreaOutOfRange {
        x: center.x,
        y: center.y,
        radius: args.radius,
    })?;
    let threads = args.threads.unwrap_or_else(default_worker_count);
    world.generate_area(&coords, threads)?;

    let overlay = ClimateOverlay {
        temperature: config.debug.show_temperature,
        rainfall: config.debug.show_rainfall,
        humidity: config.debug.show_humidity,
    };
    for coord in coords {
        let chunk = world.new_chunk(coord)?;
        println!("Chunk ({}, {})", coord.x, coord.y);
        print!("{}", view::render_chunk(&world, &chunk, overlay));
        println!();
    }
    print!("{}", view::legend(world.tiles()));
    info!(
        chunks = world.loaded_chunk_count(),
        cached_tag_sets = world.resolution_cache_len(),
        "done"
    );
    Ok(())
}

fn load_ruleset(path: Option<PathBuf>) -> Result<Ruleset, RulesetError> {
    match path {
        Some(path) => Ruleset::load(&path),
        None => Ok(Ruleset::reference()),
    }
}

/// Chunks in the square of side `2 * radius + 1` around `center`, row by row.
/// `None` if part of the square overflows the chunk grid.
fn area(center: ChunkCoord, radius: u32) -> Option<Vec<ChunkCoord>> {
    let r = i64::from(radius);
    (-r..=r)
        .flat_map(|dy| (-r..=r).map(move |dx| center.offset(dx, dy)))
        .collect()
}
