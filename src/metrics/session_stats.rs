//! Per-run and per-session tallies built from simulation events

use crate::game::{EventSink, GameOverReason, SimulationEvent};

/// How the finished runs of a session ended
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Endings {
    pub wall: u32,
    pub self_collision: u32,
    pub board_full: u32,
}

impl Endings {
    fn record(&mut self, reason: GameOverReason) {
        match reason {
            GameOverReason::Wall => self.wall += 1,
            GameOverReason::SelfCollision => self.self_collision += 1,
            GameOverReason::BoardFull => self.board_full += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.wall + self.self_collision + self.board_full
    }
}

/// Statistics fed by [`SimulationEvent`]s.
///
/// Run counters restart with [`SessionStats::start_run`]; session counters
/// live until the program exits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Foods eaten this run
    pub foods_eaten: u32,
    /// Foods eaten while points were doubled, this run
    pub doubled_foods: u32,
    /// Power-ups picked up this run
    pub power_ups_taken: u32,
    /// Run clock in engine milliseconds, frozen once the run ends
    pub run_time_ms: u64,
    /// Best final score this session
    pub best_score: u32,
    pub endings: Endings,
    run_over: bool,
}

impl SessionStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear the run counters for a fresh run
    pub fn start_run(&mut self) {
        self.foods_eaten = 0;
        self.doubled_foods = 0;
        self.power_ups_taken = 0;
        self.run_time_ms = 0;
        self.run_over = false;
    }

    /// Advance the run clock to the engine time of the current frame
    pub fn on_frame(&mut self, now_ms: u64) {
        if !self.run_over {
            self.run_time_ms = now_ms;
        }
    }

    pub fn runs_finished(&self) -> u32 {
        self.endings.total()
    }

    pub fn format_run_time(&self) -> String {
        let total_secs = self.run_time_ms / 1000;
        format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
    }
}

impl EventSink for SessionStats {
    fn notify(&mut self, event: &SimulationEvent) {
        match event {
            SimulationEvent::FoodEaten { points, .. } => {
                self.foods_eaten += 1;
                if *points > 1 {
                    self.doubled_foods += 1;
                }
            }
            SimulationEvent::PowerUpStarted { .. } => self.power_ups_taken += 1,
            SimulationEvent::GameOver { reason, score, .. } => {
                self.run_over = true;
                self.endings.record(*reason);
                self.best_score = self.best_score.max(*score);
                log::info!(
                    "Run ended: {} foods ({} doubled), {} power-ups, {}",
                    self.foods_eaten,
                    self.doubled_foods,
                    self.power_ups_taken,
                    self.format_run_time()
                );
            }
            SimulationEvent::PowerUpSpawned { .. } | SimulationEvent::PowerUpEnded => {}
        }
    }
}
