//! Tunable parameters for a simulation run.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::DEFAULT_BADDIE_DAMAGE;

/// Parameters fixed for the lifetime of a simulation run.
///
/// Missing TOML keys fall back to [`SimulationConfig::default`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of board columns.
    pub columns: u32,
    /// Number of board rows; row zero is the spawn row.
    pub rows: u32,
    /// Number of waves kept queued at all times.
    pub num_waves: usize,
    /// Smallest number of baddies in a synthesized wave.
    pub wave_size_min: u32,
    /// Largest number of baddies in a synthesized wave.
    pub wave_size_max: u32,
    /// Points debited for each turret placement.
    pub place_turret_cooldown: u32,
    /// Points available before the first tick.
    pub starting_points: u32,
    /// Multiplier applied to turret health and divided into turret cooldown.
    pub turret_strength: f32,
    /// Health removed from a turret by each baddie retaliation.
    pub baddie_damage: i32,
    /// Seed of the random stream driving waves and turret rolls.
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            columns: 6,
            rows: 8,
            num_waves: 1,
            wave_size_min: 3,
            wave_size_max: 12,
            place_turret_cooldown: 10,
            starting_points: 10,
            turret_strength: 1.0,
            baddie_damage: DEFAULT_BADDIE_DAMAGE,
            seed: 0x7c3a_91d2_5e08_b4f1,
        }
    }
}

impl SimulationConfig {
    /// Parses a configuration from TOML text and validates it.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the parameters describe a playable board.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.columns == 0 {
            return Err(ConfigError::ZeroColumns);
        }
        if self.rows == 0 {
            return Err(ConfigError::ZeroRows);
        }
        if i32::try_from(self.columns).is_err() || i32::try_from(self.rows).is_err() {
            return Err(ConfigError::BoardTooLarge {
                columns: self.columns,
                rows: self.rows,
            });
        }
        if self.num_waves == 0 {
            return Err(ConfigError::NoWaves);
        }
        if self.wave_size_min == 0 {
            return Err(ConfigError::EmptyWaves);
        }
        if self.wave_size_min > self.wave_size_max {
            return Err(ConfigError::InvertedWaveRange {
                min: self.wave_size_min,
                max: self.wave_size_max,
            });
        }
        if !(self.turret_strength.is_finite() && self.turret_strength > 0.0) {
            return Err(ConfigError::NonPositiveStrength(self.turret_strength));
        }
        Ok(())
    }
}

/// Reasons a configuration may be refused.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The board has no columns.
    #[error("board must have at least one column")]
    ZeroColumns,
    /// The board has no rows.
    #[error("board must have at least one row")]
    ZeroRows,
    /// The board dimensions do not fit signed cell coordinates.
    #[error("board of {columns}x{rows} cells is too large")]
    BoardTooLarge {
        /// Requested column count.
        columns: u32,
        /// Requested row count.
        rows: u32,
    },
    /// No wave would ever be queued.
    #[error("num_waves must be at least 1")]
    NoWaves,
    /// Synthesized waves would contain no baddies.
    #[error("wave_size_min must be at least 1")]
    EmptyWaves,
    /// The wave size bounds are reversed.
    #[error("wave_size_min ({min}) exceeds wave_size_max ({max})")]
    InvertedWaveRange {
        /// Configured lower bound.
        min: u32,
        /// Configured upper bound.
        max: u32,
    },
    /// Turret strength must scale stats by a positive finite factor.
    #[error("turret_strength must be positive and finite, got {0}")]
    NonPositiveStrength(f32),
    /// The TOML text could not be parsed.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
}
