//! Errors raised while configuring or running level generation.
//!
//! Only misconfiguration is an error. Short room lists, exhausted placement
//! and empty levels are all legal outcomes of a run.

use std::path::PathBuf;
use thiserror::Error;

/// A configuration that cannot produce a level.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("refusing to run the cellular automaton for {0} rounds; at least 1 is required")]
    InvalidRoundCount(u32),

    #[error("fill percentage {0} is outside [0, 1]")]
    InvalidFillPercentage(f64),

    #[error("weighted choice probabilities sum to {0}, expected 1.0")]
    ProbabilitiesDoNotSumToOne(f64),

    #[error("weighted choice probability {0} is outside [0, 1]")]
    InvalidProbability(f64),

    #[error("weighted choice needs at least one carver")]
    EmptyWeightedChoice,

    #[error("room size range {min_width}x{min_height}..{max_width}x{max_height} is empty or degenerate")]
    InvalidRoomSize {
        min_width: i32,
        min_height: i32,
        max_width: i32,
        max_height: i32,
    },

    #[error("side ratio ({horizontal}, {vertical}) must be at least 1.0 on both axes")]
    InvalidSizeRatio { horizontal: f64, vertical: f64 },

    #[error("{name} percentage {value} is outside (0, 1]")]
    InvalidPercentage { name: &'static str, value: f64 },

    #[error("map size {width}x{height} must be positive")]
    InvalidMapSize { width: i32, height: i32 },

    #[error("could not read config '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse config '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Failure of a generation run. Every variant is fatal to that attempt.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("point ({x}, {y}) is outside the map")]
    OutOfBounds { x: i32, y: i32 },
}
