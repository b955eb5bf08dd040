//! Configuration for the Tessera world generator.
//!
//! Settings persist to disk as `config.ron`. CLI flags parsed with clap
//! override the loaded values, and [`Config::reload`] detects on-disk edits.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{Config, DebugConfig, WorldConfig, default_config_dir};
pub use error::ConfigError;
