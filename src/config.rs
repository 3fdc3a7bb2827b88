//! Tunable simulation parameters.
//!
//! Geometry (tile size, player box) is fixed at compile time in
//! [`crate::world::tiles`]; everything here can be overridden from a JSON file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

use crate::error::ConfigError;

/// How many evolutions a single experience grant may trigger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EvolutionPolicy {
    /// Apply the first satisfied rule, at most once per grant.
    #[default]
    Once,
    /// Keep re-evaluating against the new species until no rule matches.
    Fixpoint,
}

/// Engine-wide tuning. Every field has a default, so partial files are fine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Seed for the engine RNG; battles derive their own streams from it.
    pub seed: u64,
    /// Upper bound for a single tick, in seconds.
    pub max_dt: f32,
    /// Player walking speed in pixels per second.
    pub walk_speed: f32,
    /// Distance below which an idle wild creature starts a battle.
    pub encounter_radius: f32,
    /// Reach for NPCs, training stations and starter pedestals.
    pub interact_radius: f32,
    /// Seconds spent in the intro phase before the first player turn.
    pub battle_settle_delay: f32,
    /// Delay before a scheduled enemy turn resolves.
    pub enemy_turn_delay: f32,
    /// Cooldown given to a creature after the player escapes or loses.
    pub escape_cooldown: f32,
    /// Capacity of the player-facing log ring buffer.
    pub log_capacity: usize,
    pub evolution_policy: EvolutionPolicy,
    /// Seconds between two hunger decrements.
    pub hunger_interval: f32,
    pub hunger_decrease: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: 0x5EED_CAFE,
            max_dt: 0.1,
            walk_speed: 120.0,
            encounter_radius: 32.0,
            interact_radius: 40.0,
            battle_settle_delay: 1.0,
            enemy_turn_delay: 0.4,
            escape_cooldown: 3.0,
            log_capacity: 8,
            evolution_policy: EvolutionPolicy::Once,
            hunger_interval: 6.0,
            hunger_decrease: 4,
        }
    }
}

impl EngineConfig {
    /// Parse a config from JSON. Missing fields keep their defaults.
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] if the text is not a valid config.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load a config file, falling back to defaults when it does not exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(text) => Self::from_json(&text),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!("no config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
