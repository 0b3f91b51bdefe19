//! Configuration errors
//!
//! The only fatal failures in the engine happen while building the rank
//! table, spawn range or field from settings. Everything at runtime is a
//! silent no-op.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("rank table must contain at least one rank")]
    EmptyRankTable,
    #[error("rank {index} has invalid radius {radius}")]
    InvalidRadius { index: usize, radius: f32 },
    #[error("rank {index} radius {radius} does not exceed previous radius {previous}")]
    RadiusNotIncreasing {
        index: usize,
        radius: f32,
        previous: f32,
    },
    #[error("{reserved} reserved top ranks leave nothing to spawn from {rank_count} ranks")]
    NoSpawnableRanks { rank_count: usize, reserved: usize },
    #[error("invalid color: {0}")]
    InvalidColor(String),
    #[error("invalid field: {0}")]
    InvalidField(&'static str),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid settings json: {0}")]
    Json(#[from] serde_json::Error),
}
