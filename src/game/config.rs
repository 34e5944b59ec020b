use serde::{Deserialize, Serialize};

use super::error::ConfigError;

/// Configuration for the simulation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Side of the square grid, centred on the origin
    pub grid_size: i32,

    /// Move interval at the start of a run, in milliseconds
    pub initial_move_interval_ms: u64,
    /// Fastest the snake can get
    pub min_move_interval_ms: u64,
    /// Speed-up applied on every food pickup
    pub move_interval_step_ms: u64,

    /// How long a picked-up power-up stays active
    pub power_up_duration_ms: u64,
    /// Foods eaten before a power-up appears, drawn from min..=max
    pub power_up_threshold_min: u32,
    pub power_up_threshold_max: u32,

    /// Random draws before falling back to enumerating free cells
    pub spawn_attempts: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: 20,
            initial_move_interval_ms: 200,
            min_move_interval_ms: 100,
            move_interval_step_ms: 5,
            power_up_duration_ms: 10_000,
            power_up_threshold_min: 3,
            power_up_threshold_max: 6,
            spawn_attempts: 64,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(grid_size: i32) -> Self {
        Self {
            grid_size,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size <= 0 {
            return Err(ConfigError::NonPositiveGridSize(self.grid_size));
        }
        if self.min_move_interval_ms == 0 {
            return Err(ConfigError::ZeroMoveInterval);
        }
        if self.initial_move_interval_ms < self.min_move_interval_ms {
            return Err(ConfigError::IntervalBelowFloor {
                initial: self.initial_move_interval_ms,
                min: self.min_move_interval_ms,
            });
        }
        if self.power_up_threshold_min == 0
            || self.power_up_threshold_min > self.power_up_threshold_max
        {
            return Err(ConfigError::InvalidThresholdRange {
                min: self.power_up_threshold_min,
                max: self.power_up_threshold_max,
            });
        }
        if self.spawn_attempts == 0 {
            return Err(ConfigError::ZeroSpawnAttempts);
        }
        Ok(())
    }
}
