//! Error types.
//!
//! [`ContentError`] covers data bugs detected while building the world
//! (unknown ids, malformed maps). These are fatal: construction paths return
//! them and callers propagate with `?`. Runtime shortfalls (missing items, not
//! enough hunger) are *not* errors and never show up here.

use thiserror::Error;

/// A content/data bug detected while constructing game objects.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContentError {
    #[error("unknown species `{0}`")]
    UnknownSpecies(String),

    #[error("species `{species}` evolves into unknown species `{target}`")]
    UnknownEvolutionTarget { species: String, target: String },

    #[error("species `{0}` has no attacks")]
    NoAttacks(String),

    #[error("attack `{attack}` has success rate {rate} outside [0, 1]")]
    InvalidSuccessRate { attack: String, rate: String },

    #[error("malformed tile map: {0}")]
    MalformedTileMap(String),

    #[error("unknown item `{0}`")]
    UnknownItem(String),

    #[error("unknown quest `{0}`")]
    UnknownQuest(String),
}

/// Failure to load an [`EngineConfig`](crate::config::EngineConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}
