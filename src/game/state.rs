use serde::{Deserialize, Serialize};

use super::action::Direction;

/// A cell on the game grid. The grid lies on the x/z plane, centred on the origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub z: i32,
}

impl Cell {
    pub const ORIGIN: Cell = Cell { x: 0, z: 0 };

    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Move cell by delta
    pub fn moved_by(&self, dx: i32, dz: i32) -> Self {
        Self {
            x: self.x + dx,
            z: self.z + dz,
        }
    }

    /// Move cell in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dz) = direction.delta();
        self.moved_by(dx, dz)
    }
}

/// The snake, head first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snake {
    body: Vec<Cell>,
}

impl Snake {
    /// A single-segment snake
    pub fn new(head: Cell) -> Self {
        Self { body: vec![head] }
    }

    /// Build a snake from explicit segments.
    ///
    /// Panics if `body` is empty: a snake without a head is a setup bug.
    pub fn from_cells(body: Vec<Cell>) -> Self {
        assert!(!body.is_empty(), "snake must have at least one segment");
        Self { body }
    }

    pub fn head(&self) -> Cell {
        self.body[0]
    }

    pub fn cells(&self) -> &[Cell] {
        &self.body
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    /// Put a new head in front of the current one
    pub fn push_head(&mut self, head: Cell) {
        self.body.insert(0, head);
    }

    /// Drop the last segment. The head is never removed.
    pub fn pop_tail(&mut self) -> Option<Cell> {
        if self.body.len() > 1 {
            self.body.pop()
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Always false; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverReason {
    /// Snake left the playfield
    Wall,
    /// Snake ran into itself
    SelfCollision,
    /// No free cell left to place food on
    BoardFull,
}

/// Power-up bookkeeping: the pickup item on the board and the active multiplier
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PowerUpState {
    /// Pickup waiting on the board
    pub item: Option<Cell>,
    pub active: bool,
    /// Absolute expiry, meaningful while `active`
    pub end_time_ms: u64,
    /// Foods eaten since the last power-up spawn
    pub count: u32,
    /// Count at which the next power-up spawns
    pub threshold: u32,
}

/// Complete simulation state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationState {
    pub grid_size: i32,
    /// Direction applied on the last move
    pub direction: Direction,
    /// Buffered turn, applied on the next move
    pub next_direction: Direction,
    pub snake: Snake,
    pub food: Option<Cell>,
    pub power_up: PowerUpState,
    pub score: u32,
    pub high_score: u32,
    pub move_interval_ms: u64,
    pub last_move_time_ms: u64,
    pub game_over: Option<GameOverReason>,
    /// Set when the finished run beat the previous high score
    pub new_high_score: bool,
}

impl SimulationState {
    /// Fresh run: one segment at the origin heading right, nothing on the board
    pub fn new(grid_size: i32, move_interval_ms: u64, high_score: u32) -> Self {
        Self {
            grid_size,
            direction: Direction::Right,
            next_direction: Direction::Right,
            snake: Snake::new(Cell::ORIGIN),
            food: None,
            power_up: PowerUpState::default(),
            score: 0,
            high_score,
            move_interval_ms,
            last_move_time_ms: 0,
            game_over: None,
            new_high_score: false,
        }
    }

    /// A cell is on the playfield while neither coordinate exceeds half the grid size
    pub fn is_in_bounds(&self, cell: Cell) -> bool {
        2 * cell.x.abs() <= self.grid_size && 2 * cell.z.abs() <= self.grid_size
    }

    pub fn is_occupied_by_snake(&self, cell: Cell) -> bool {
        self.snake.contains(cell)
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over.is_some()
    }

    /// Milliseconds of power-up left at `now`, if one is active
    pub fn power_up_remaining_ms(&self, now_ms: u64) -> Option<u64> {
        self.power_up
            .active
            .then(|| self.power_up.end_time_ms.saturating_sub(now_ms))
    }
}
