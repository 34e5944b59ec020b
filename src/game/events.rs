use super::state::{Cell, GameOverReason};

/// Notifications emitted by the engine for audio, HUD and logging consumers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimulationEvent {
    /// Food at `cell` was eaten; `points` were added to reach `score`
    FoodEaten { cell: Cell, points: u32, score: u32 },
    /// A power-up pickup appeared on the board
    PowerUpSpawned { cell: Cell },
    /// The power-up was picked up and doubles points until `ends_at_ms`
    PowerUpStarted { ends_at_ms: u64 },
    PowerUpEnded,
    GameOver {
        reason: GameOverReason,
        score: u32,
        high_score: u32,
        new_high_score: bool,
    },
}

/// Something that wants to hear about simulation events
pub trait EventSink {
    fn notify(&mut self, event: &SimulationEvent);
}
