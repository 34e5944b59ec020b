use thiserror::Error;

/// Invalid engine configuration. These are setup bugs, so the engine refuses
/// to start instead of running in a broken state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("grid size must be positive, got {0}")]
    NonPositiveGridSize(i32),

    #[error("minimum move interval must be positive")]
    ZeroMoveInterval,

    #[error("initial move interval {initial}ms is below the minimum {min}ms")]
    IntervalBelowFloor { initial: u64, min: u64 },

    #[error("power-up threshold range {min}..={max} is invalid")]
    InvalidThresholdRange { min: u32, max: u32 },

    #[error("spawn attempts must be at least 1")]
    ZeroSpawnAttempts,
}
