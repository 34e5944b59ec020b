use rand::rngs::StdRng;
use rand::seq::IteratorRandom;
use rand::{Rng, SeedableRng};

use super::state::{Cell, Snake};

/// Random placement of food and power-ups, plus the power-up threshold draws.
///
/// Candidates come from the `grid_size x grid_size` cells centred on the
/// origin, i.e. `-n/2 .. n - n/2` per axis.
pub struct Spawner {
    rng: StdRng,
    attempts: u32,
}

impl Spawner {
    pub fn new(attempts: u32) -> Self {
        Self {
            rng: StdRng::from_entropy(),
            attempts,
        }
    }

    /// Deterministic spawner for replays and tests
    pub fn with_seed(seed: u64, attempts: u32) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            attempts,
        }
    }

    /// Pick a cell that is not on the snake.
    ///
    /// Samples up to `attempts` times, then falls back to choosing among the
    /// free cells directly. Returns `None` when the snake covers every cell.
    pub fn spawn_cell(&mut self, grid_size: i32, snake: &Snake) -> Option<Cell> {
        let (low, high) = axis_range(grid_size);
        if low >= high {
            return None;
        }

        for _ in 0..self.attempts {
            let cell = Cell::new(
                self.rng.gen_range(low..high),
                self.rng.gen_range(low..high),
            );
            if !snake.contains(cell) {
                return Some(cell);
            }
        }

        log::debug!(
            "spawn sampling exhausted after {} attempts, enumerating free cells",
            self.attempts
        );
        (low..high)
            .flat_map(|x| (low..high).map(move |z| Cell::new(x, z)))
            .filter(|cell| !snake.contains(*cell))
            .choose(&mut self.rng)
    }

    /// Uniform draw in `min..=max`
    pub fn threshold(&mut self, min: u32, max: u32) -> u32 {
        self.rng.gen_range(min..=max)
    }
}

fn axis_range(grid_size: i32) -> (i32, i32) {
    let low = -(grid_size / 2);
    (low, low + grid_size)
}
