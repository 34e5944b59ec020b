use std::sync::Arc;

use super::{
    action::Direction,
    config::GameConfig,
    error::ConfigError,
    events::SimulationEvent,
    spawn::Spawner,
    state::{Cell, GameOverReason, SimulationState, Snake},
};
use crate::persistence::ScoreStore;

/// Outcome of a call to [`Simulation::tick`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepResult {
    /// Whether the movement gate opened and a grid step was evaluated
    pub stepped: bool,
    /// Whether the snake ate food this step
    pub ate_food: bool,
    /// Events in the order they happened
    pub events: Vec<SimulationEvent>,
}

/// The game engine that owns the state and applies all game rules
pub struct Simulation {
    config: GameConfig,
    state: SimulationState,
    spawner: Spawner,
    store: Arc<dyn ScoreStore>,
}

impl Simulation {
    /// Create a new simulation and place the first food
    pub fn new(config: GameConfig, store: Arc<dyn ScoreStore>) -> Result<Self, ConfigError> {
        config.validate()?;
        let spawner = Spawner::new(config.spawn_attempts);
        Ok(Self::init(config, store, spawner))
    }

    /// Like [`Simulation::new`] with a fixed random seed
    pub fn with_seed(
        config: GameConfig,
        store: Arc<dyn ScoreStore>,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let spawner = Spawner::with_seed(seed, config.spawn_attempts);
        Ok(Self::init(config, store, spawner))
    }

    fn init(config: GameConfig, store: Arc<dyn ScoreStore>, spawner: Spawner) -> Self {
        let state = SimulationState::new(config.grid_size, config.initial_move_interval_ms, 0);
        let mut simulation = Self {
            config,
            state,
            spawner,
            store,
        };
        simulation.restart();
        simulation
    }

    /// Reinitialise every field for a new run. The board is left empty and the
    /// high score is reloaded from the store.
    pub fn reset(&mut self) {
        let high_score = self.reload_high_score();
        self.state = SimulationState::new(
            self.config.grid_size,
            self.config.initial_move_interval_ms,
            high_score,
        );
        self.state.power_up.threshold = self.draw_threshold();
    }

    /// Reset and place the first food
    pub fn restart(&mut self) {
        self.reset();
        self.state.food = self
            .spawner
            .spawn_cell(self.config.grid_size, &self.state.snake);
        if self.state.food.is_none() {
            log::warn!("No free cell for the first food, grid is too small to play");
            self.state.game_over = Some(GameOverReason::BoardFull);
        }
    }

    /// Buffer a turn for the next step.
    ///
    /// Rejected when it would reverse the active direction, or after game over.
    pub fn handle_input(&mut self, direction: Direction) -> bool {
        if self.state.is_game_over() || direction.is_opposite(self.state.direction) {
            return false;
        }
        self.state.next_direction = direction;
        true
    }

    /// Advance the game to `now_ms`, moving at most one cell.
    pub fn tick(&mut self, now_ms: u64) -> StepResult {
        let mut result = StepResult::default();
        if self.state.is_game_over() {
            return result;
        }

        // Expiry runs at frame granularity, not gated by the move interval
        if self.state.power_up.active && now_ms >= self.state.power_up.end_time_ms {
            self.state.power_up.active = false;
            log::debug!("Power-up ended at {}ms", now_ms);
            result.events.push(SimulationEvent::PowerUpEnded);
        }

        if now_ms.saturating_sub(self.state.last_move_time_ms) < self.state.move_interval_ms {
            return result;
        }

        self.state.last_move_time_ms = now_ms;
        self.step(now_ms, &mut result);
        result
    }

    fn step(&mut self, now_ms: u64, result: &mut StepResult) {
        result.stepped = true;
        self.state.direction = self.state.next_direction;
        let new_head = self
            .state
            .snake
            .head()
            .moved_in_direction(self.state.direction);

        if !self.state.is_in_bounds(new_head) {
            self.end_game(GameOverReason::Wall, result);
            return;
        }
        if self.state.is_occupied_by_snake(new_head) {
            self.end_game(GameOverReason::SelfCollision, result);
            return;
        }

        self.state.snake.push_head(new_head);

        if self.state.power_up.item == Some(new_head) {
            let ends_at_ms = now_ms + self.config.power_up_duration_ms;
            self.state.power_up.item = None;
            self.state.power_up.active = true;
            self.state.power_up.end_time_ms = ends_at_ms;
            log::debug!("Power-up active until {}ms", ends_at_ms);
            result
                .events
                .push(SimulationEvent::PowerUpStarted { ends_at_ms });
        }

        if self.state.food == Some(new_head) {
            result.ate_food = true;
            self.eat_food(new_head, result);
        } else {
            self.state.snake.pop_tail();
        }
    }

    fn eat_food(&mut self, cell: Cell, result: &mut StepResult) {
        let next_food = self
            .spawner
            .spawn_cell(self.config.grid_size, &self.state.snake);
        self.state.food = next_food;

        self.state.power_up.count += 1;
        if self.state.power_up.count >= self.state.power_up.threshold
            && !self.state.power_up.active
        {
            if let Some(item) = self
                .spawner
                .spawn_cell(self.config.grid_size, &self.state.snake)
            {
                self.state.power_up.item = Some(item);
                result
                    .events
                    .push(SimulationEvent::PowerUpSpawned { cell: item });
            }
            self.state.power_up.count = 0;
            self.state.power_up.threshold = self.draw_threshold();
        }

        let points = if self.state.power_up.active { 2 } else { 1 };
        self.state.score += points;

        // Speed-up applies whether or not points were doubled
        self.state.move_interval_ms = self
            .state
            .move_interval_ms
            .saturating_sub(self.config.move_interval_step_ms)
            .max(self.config.min_move_interval_ms);

        result.events.push(SimulationEvent::FoodEaten {
            cell,
            points,
            score: self.state.score,
        });

        if next_food.is_none() {
            self.end_game(GameOverReason::BoardFull, result);
        }
    }

    fn end_game(&mut self, reason: GameOverReason, result: &mut StepResult) {
        let state = &mut self.state;
        state.game_over = Some(reason);

        let new_high_score = state.score > state.high_score;
        state.new_high_score = new_high_score;
        if new_high_score {
            state.high_score = state.score;
            if let Err(err) = self.store.save_high_score(state.score) {
                log::warn!("Failed to save high score {}: {:#}", state.score, err);
            }
        }

        log::info!(
            "Game over ({:?}): score {}, high score {}",
            reason,
            state.score,
            state.high_score
        );
        result.events.push(SimulationEvent::GameOver {
            reason,
            score: state.score,
            high_score: state.high_score,
            new_high_score,
        });
    }

    /// Stored high score, or the one already in memory if the store fails
    fn reload_high_score(&self) -> u32 {
        match self.store.load_high_score() {
            Ok(score) => score,
            Err(err) => {
                log::warn!("Failed to load high score: {:#}", err);
                self.state.high_score
            }
        }
    }

    fn draw_threshold(&mut self) -> u32 {
        self.spawner.threshold(
            self.config.power_up_threshold_min,
            self.config.power_up_threshold_max,
        )
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn snake(&self) -> &Snake {
        &self.state.snake
    }

    pub fn food(&self) -> Option<Cell> {
        self.state.food
    }

    pub fn power_up_item(&self) -> Option<Cell> {
        self.state.power_up.item
    }

    pub fn is_power_up_active(&self) -> bool {
        self.state.power_up.active
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn high_score(&self) -> u32 {
        self.state.high_score
    }

    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }

    pub fn game_over_reason(&self) -> Option<GameOverReason> {
        self.state.game_over
    }

    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut SimulationState {
        &mut self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    fn simulation_with(config: GameConfig, store: Arc<MemoryStore>) -> Simulation {
        Simulation::with_seed(config, store, 1234).unwrap()
    }

    fn simulation() -> Simulation {
        simulation_with(GameConfig::default(), Arc::new(MemoryStore::new()))
    }

    /// Place food where it cannot interfere with a test
    fn park_food(sim: &mut Simulation) {
        sim.state_mut().food = Some(Cell::new(-9, -9));
    }

    #[test]
    fn test_new_simulation() {
        let sim = simulation();

        assert!(!sim.is_game_over());
        assert_eq!(sim.score(), 0);
        assert_eq!(sim.snake().cells(), &[Cell::ORIGIN]);
        assert_eq!(sim.state().direction, Direction::Right);
        let food = sim.food().expect("first food is placed");
        assert!(!sim.snake().contains(food));
        assert!((3..=6).contains(&sim.state().power_up.threshold));
    }

    #[test]
    fn test_invalid_config_fails_fast() {
        let result = Simulation::new(GameConfig::new(0), Arc::new(MemoryStore::new()));
        assert!(matches!(result, Err(ConfigError::NonPositiveGridSize(0))));
    }

    #[test]
    fn test_movement_gate() {
        let mut sim = simulation();
        park_food(&mut sim);

        let result = sim.tick(199);
        assert!(!result.stepped);
        assert_eq!(sim.snake().head(), Cell::ORIGIN);

        let result = sim.tick(200);
        assert!(result.stepped);
        assert_eq!(sim.snake().head(), Cell::new(1, 0));
        assert_eq!(sim.state().last_move_time_ms, 200);

        // Next move needs another full interval
        assert!(!sim.tick(399).stepped);
        assert!(sim.tick(400).stepped);
        assert_eq!(sim.snake().head(), Cell::new(2, 0));
    }

    #[test]
    fn test_food_consumption_scenario() {
        let mut sim = simulation();
        sim.state_mut().food = Some(Cell::new(1, 0));

        let result = sim.tick(200);

        assert!(result.ate_food);
        assert_eq!(sim.snake().cells(), &[Cell::new(1, 0), Cell::ORIGIN]);
        assert_eq!(sim.score(), 1);
        assert_eq!(sim.state().move_interval_ms, 195);
        let food = sim.food().unwrap();
        assert_ne!(food, Cell::new(1, 0));
        assert!(!sim.snake().contains(food));
        assert!(result.events.contains(&SimulationEvent::FoodEaten {
            cell: Cell::new(1, 0),
            points: 1,
            score: 1,
        }));
    }

    #[test]
    fn test_length_unchanged_without_food() {
        let mut sim = simulation();
        sim.state_mut().snake =
            Snake::from_cells(vec![Cell::new(0, 0), Cell::new(-1, 0), Cell::new(-2, 0)]);
        park_food(&mut sim);

        let result = sim.tick(200);

        assert!(!result.ate_food);
        assert_eq!(
            sim.snake().cells(),
            &[Cell::new(1, 0), Cell::new(0, 0), Cell::new(-1, 0)]
        );
    }

    #[test]
    fn test_wall_collision_scenario() {
        let mut sim = simulation();
        sim.state_mut().snake = Snake::new(Cell::new(10, 0));
        park_food(&mut sim);

        let result = sim.tick(200);

        assert!(sim.is_game_over());
        assert_eq!(sim.game_over_reason(), Some(GameOverReason::Wall));
        assert_eq!(sim.snake().cells(), &[Cell::new(10, 0)]);
        assert!(matches!(
            result.events.last(),
            Some(SimulationEvent::GameOver {
                reason: GameOverReason::Wall,
                ..
            })
        ));
    }

    #[test]
    fn test_edge_of_grid_is_playable() {
        let mut sim = simulation();
        sim.state_mut().snake = Snake::new(Cell::new(9, 0));
        park_food(&mut sim);

        sim.tick(200);

        assert!(!sim.is_game_over());
        assert_eq!(sim.snake().head(), Cell::new(10, 0));
    }

    #[test]
    fn test_self_collision() {
        let mut sim = simulation();
        // Head at (0,0) arrived moving left; the body curls below it
        sim.state_mut().snake = Snake::from_cells(vec![
            Cell::new(0, 0),
            Cell::new(1, 0),
            Cell::new(1, 1),
            Cell::new(0, 1),
            Cell::new(-1, 1),
        ]);
        sim.state_mut().direction = Direction::Left;
        sim.state_mut().next_direction = Direction::Left;
        park_food(&mut sim);

        assert!(sim.handle_input(Direction::Down));
        sim.tick(200);

        assert_eq!(sim.game_over_reason(), Some(GameOverReason::SelfCollision));
    }

    #[test]
    fn test_moving_into_tail_is_a_collision() {
        let mut sim = simulation();
        sim.state_mut().snake = Snake::from_cells(vec![
            Cell::new(0, 0),
            Cell::new(1, 0),
            Cell::new(1, 1),
            Cell::new(0, 1),
        ]);
        sim.state_mut().direction = Direction::Left;
        sim.state_mut().next_direction = Direction::Left;
        park_food(&mut sim);

        sim.handle_input(Direction::Down);
        sim.tick(200);

        assert_eq!(sim.game_over_reason(), Some(GameOverReason::SelfCollision));
    }

    #[test]
    fn test_prevent_180_degree_turn() {
        let mut sim = simulation();

        assert!(!sim.handle_input(Direction::Left));
        assert_eq!(sim.state().next_direction, Direction::Right);
    }

    #[test]
    fn test_reversal_guard_uses_active_direction() {
        let mut sim = simulation();

        assert!(sim.handle_input(Direction::Up));
        // Opposite of the pending turn but not of the active direction
        assert!(sim.handle_input(Direction::Down));
        assert_eq!(sim.state().next_direction, Direction::Down);
        assert_eq!(sim.state().direction, Direction::Right);
    }

    #[test]
    fn test_turn_applies_on_next_step() {
        let mut sim = simulation();
        park_food(&mut sim);

        sim.handle_input(Direction::Down);
        assert_eq!(sim.state().direction, Direction::Right);

        sim.tick(200);
        assert_eq!(sim.state().direction, Direction::Down);
        assert_eq!(sim.snake().head(), Cell::new(0, 1));
    }

    #[test]
    fn test_terminated_game_no_update() {
        let mut sim = simulation();
        sim.state_mut().snake = Snake::new(Cell::new(10, 0));
        sim.tick(200);
        assert!(sim.is_game_over());

        let frozen = sim.state().clone();
        for now in [400, 600, 5_000, 60_000] {
            let result = sim.tick(now);
            assert!(!result.stepped);
            assert!(result.events.is_empty());
        }
        assert!(!sim.handle_input(Direction::Up));
        assert_eq!(sim.state(), &frozen);
    }

    #[test]
    fn test_power_up_pickup() {
        let mut sim = simulation();
        park_food(&mut sim);
        sim.state_mut().power_up.item = Some(Cell::new(1, 0));

        let result = sim.tick(300);

        assert!(sim.is_power_up_active());
        assert_eq!(sim.power_up_item(), None);
        assert_eq!(sim.state().power_up.end_time_ms, 10_300);
        assert_eq!(sim.snake().len(), 1);
        assert_eq!(
            result.events,
            vec![SimulationEvent::PowerUpStarted { ends_at_ms: 10_300 }]
        );
    }

    #[test]
    fn test_power_up_doubles_points() {
        let mut sim = simulation();
        sim.state_mut().power_up.active = true;
        sim.state_mut().power_up.end_time_ms = 50_000;
        sim.state_mut().food = Some(Cell::new(1, 0));

        sim.tick(200);

        assert_eq!(sim.score(), 2);
        assert_eq!(sim.state().move_interval_ms, 195);
    }

    #[test]
    fn test_power_up_and_food_on_same_tick() {
        let mut sim = simulation();
        sim.state_mut().power_up.item = Some(Cell::new(1, 0));
        sim.state_mut().food = Some(Cell::new(1, 0));

        sim.tick(200);

        // Pickup is applied first, so the food already scores double
        assert!(sim.is_power_up_active());
        assert_eq!(sim.score(), 2);
    }

    #[test]
    fn test_power_up_expires_regardless_of_gate() {
        let mut sim = simulation();
        park_food(&mut sim);
        sim.state_mut().power_up.active = true;
        sim.state_mut().power_up.end_time_ms = 5_000;
        sim.state_mut().last_move_time_ms = 4_990;

        let result = sim.tick(5_000);

        assert!(!result.stepped);
        assert!(!sim.is_power_up_active());
        assert_eq!(result.events, vec![SimulationEvent::PowerUpEnded]);
        assert_eq!(sim.snake().head(), Cell::ORIGIN);
    }

    #[test]
    fn test_power_up_still_active_before_end() {
        let mut sim = simulation();
        sim.state_mut().power_up.active = true;
        sim.state_mut().power_up.end_time_ms = 5_000;

        sim.tick(4_999);
        assert!(sim.is_power_up_active());
    }

    #[test]
    fn test_power_up_spawns_at_threshold() {
        let mut sim = simulation();
        sim.state_mut().power_up.threshold = 3;
        sim.state_mut().power_up.count = 2;
        sim.state_mut().food = Some(Cell::new(1, 0));

        let result = sim.tick(200);

        let item = sim.power_up_item().expect("power-up spawned");
        assert!(!sim.snake().contains(item));
        assert_eq!(sim.state().power_up.count, 0);
        assert!((3..=6).contains(&sim.state().power_up.threshold));
        assert!(result
            .events
            .contains(&SimulationEvent::PowerUpSpawned { cell: item }));
    }

    #[test]
    fn test_no_power_up_spawn_while_active() {
        let mut sim = simulation();
        sim.state_mut().power_up.active = true;
        sim.state_mut().power_up.end_time_ms = 50_000;
        sim.state_mut().power_up.threshold = 3;
        sim.state_mut().power_up.count = 2;
        sim.state_mut().food = Some(Cell::new(1, 0));

        sim.tick(200);

        assert_eq!(sim.power_up_item(), None);
        assert_eq!(sim.state().power_up.count, 3);
    }

    #[test]
    fn test_speed_floor() {
        let mut sim = simulation();
        sim.state_mut().move_interval_ms = 102;
        sim.state_mut().food = Some(Cell::new(1, 0));

        sim.tick(200);
        assert_eq!(sim.state().move_interval_ms, 100);

        let food = Cell::new(2, 0);
        sim.state_mut().food = Some(food);
        sim.tick(300);
        assert_eq!(sim.score(), 2);
        assert_eq!(sim.state().move_interval_ms, 100);
    }

    #[test]
    fn test_game_over_saves_new_high_score() {
        let store = Arc::new(MemoryStore::new());
        let mut sim = simulation_with(GameConfig::default(), store.clone());
        sim.state_mut().score = 3;
        sim.state_mut().snake = Snake::new(Cell::new(10, 0));

        let result = sim.tick(200);

        assert_eq!(sim.high_score(), 3);
        assert!(sim.state().new_high_score);
        assert_eq!(store.load_high_score().unwrap(), 3);
        assert_eq!(
            result.events.last(),
            Some(&SimulationEvent::GameOver {
                reason: GameOverReason::Wall,
                score: 3,
                high_score: 3,
                new_high_score: true,
            })
        );
    }

    #[test]
    fn test_game_over_keeps_higher_stored_score() {
        let store = Arc::new(MemoryStore::with_high_score(10));
        let mut sim = simulation_with(GameConfig::default(), store.clone());
        assert_eq!(sim.high_score(), 10);
        sim.state_mut().score = 3;
        sim.state_mut().snake = Snake::new(Cell::new(10, 0));

        let result = sim.tick(200);

        assert_eq!(sim.high_score(), 10);
        assert_eq!(store.load_high_score().unwrap(), 10);
        assert!(matches!(
            result.events.last(),
            Some(SimulationEvent::GameOver {
                new_high_score: false,
                ..
            })
        ));
    }

    #[test]
    fn test_tying_high_score_is_not_new() {
        let store = Arc::new(MemoryStore::with_high_score(5));
        let mut sim = simulation_with(GameConfig::default(), store.clone());
        sim.state_mut().score = 5;
        sim.state_mut().snake = Snake::new(Cell::new(10, 0));

        sim.tick(200);

        assert!(sim.is_game_over());
        assert!(!sim.state().new_high_score);
        assert_eq!(sim.high_score(), 5);

        sim.restart();
        assert!(!sim.state().new_high_score);
    }

    #[test]
    fn test_reset() {
        let store = Arc::new(MemoryStore::new());
        let mut sim = simulation_with(GameConfig::default(), store.clone());
        {
            let state = sim.state_mut();
            state.snake = Snake::from_cells(vec![Cell::new(3, 3), Cell::new(3, 4)]);
            state.direction = Direction::Up;
            state.next_direction = Direction::Left;
            state.score = 12;
            state.move_interval_ms = 150;
            state.power_up.active = true;
            state.power_up.item = Some(Cell::new(2, 2));
            state.game_over = Some(GameOverReason::Wall);
        }
        store.save_high_score(7).unwrap();

        sim.reset();

        let state = sim.state();
        assert_eq!(state.snake.cells(), &[Cell::ORIGIN]);
        assert_eq!(state.direction, Direction::Right);
        assert_eq!(state.next_direction, Direction::Right);
        assert_eq!(state.score, 0);
        assert!(!state.is_game_over());
        assert_eq!(state.food, None);
        assert!(!state.power_up.active);
        assert_eq!(state.power_up.item, None);
        assert_eq!(state.move_interval_ms, 200);
        assert_eq!(state.last_move_time_ms, 0);
        assert_eq!(state.high_score, 7);
    }

    #[test]
    fn test_restart_places_food() {
        let mut sim = simulation();
        sim.state_mut().game_over = Some(GameOverReason::Wall);

        sim.restart();

        assert!(!sim.is_game_over());
        assert!(sim.food().is_some());
    }

    #[test]
    fn test_board_full_ends_game() {
        // A 2x2 spawn area: x, z in {-1, 0}
        let mut sim = simulation_with(GameConfig::new(2), Arc::new(MemoryStore::new()));
        {
            let state = sim.state_mut();
            state.snake =
                Snake::from_cells(vec![Cell::new(0, -1), Cell::new(-1, -1), Cell::new(-1, 0)]);
            state.direction = Direction::Right;
            state.next_direction = Direction::Right;
            state.food = Some(Cell::new(0, 0));
        }

        sim.handle_input(Direction::Down);
        let result = sim.tick(200);

        assert!(result.ate_food);
        assert_eq!(sim.snake().len(), 4);
        assert_eq!(sim.food(), None);
        assert_eq!(sim.game_over_reason(), Some(GameOverReason::BoardFull));
        assert_eq!(sim.score(), 1);
    }

    #[test]
    fn test_length_invariant_over_random_run() {
        let mut sim = simulation_with(GameConfig::small(), Arc::new(MemoryStore::new()));
        let turns = [
            Direction::Down,
            Direction::Left,
            Direction::Up,
            Direction::Right,
        ];
        let mut now = 0;

        for i in 0..400 {
            if sim.is_game_over() {
                sim.restart();
                now = 0;
            }
            // Steer toward the food on alternating axes to eat now and then
            if let Some(food) = sim.food() {
                let head = sim.snake().head();
                let wanted = if i % 2 == 0 {
                    if food.x > head.x {
                        Direction::Right
                    } else {
                        Direction::Left
                    }
                } else if food.z > head.z {
                    Direction::Down
                } else {
                    Direction::Up
                };
                sim.handle_input(wanted);
            } else {
                sim.handle_input(turns[i % turns.len()]);
            }

            let before = sim.snake().len();
            now += sim.state().move_interval_ms;
            let result = sim.tick(now);

            if sim.is_game_over() && !result.ate_food {
                assert_eq!(sim.snake().len(), before);
            } else if result.ate_food {
                assert_eq!(sim.snake().len(), before + 1);
            } else {
                assert_eq!(sim.snake().len(), before);
            }

            let cells = sim.snake().cells();
            for (i, a) in cells.iter().enumerate() {
                assert!(!cells[i + 1..].contains(a), "snake overlaps itself");
            }
            if let Some(food) = sim.food() {
                assert!(!sim.snake().contains(food));
            }
        }
    }
}
