use super::{
    action::{Action, Direction},
    config::GameConfig,
    state::{CollisionType, GameState, Position, RunStatus, Snake, to_coord},
};
use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};
use tracing::debug;

/// Outcome of a single simulation step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepResult {
    /// The snake moved without eating
    Moved,
    /// The snake ate food; score went up by one
    Grew,
    /// The run has ended; repeated until reset
    GameOver(CollisionType),
    /// The snake filled the board
    Cleared,
}

/// The game engine that handles all game logic
pub struct GameEngine {
    config: GameConfig,
    rng: StdRng,
}

impl GameEngine {
    /// Create a new game engine with an entropy-seeded food generator
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            rng: StdRng::from_entropy(),
        }
    }

    /// Create an engine whose food placement is reproducible
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Start a fresh run: centered snake heading right, new food, zero score
    pub fn reset(&mut self) -> GameState {
        let center_x = to_coord(self.config.grid_width / 2);
        let center_y = to_coord(self.config.grid_height / 2);

        let snake = Snake::new(
            Position::new(center_x, center_y),
            Direction::Right,
            self.config.initial_snake_length,
        );

        let mut state = GameState::new(
            snake,
            Position::new(0, 0),
            self.config.grid_width,
            self.config.grid_height,
        );
        match self.spawn_food(&state) {
            Some(food) => state.food = food,
            None => state.status = RunStatus::Cleared,
        }
        state
    }

    /// Advance the simulation by one tick.
    ///
    /// A finished run is frozen: the terminal result is reported again and
    /// nothing is mutated until [`GameEngine::reset`].
    pub fn step(&mut self, state: &mut GameState, action: Action) -> StepResult {
        match state.status {
            RunStatus::Over(collision) => return StepResult::GameOver(collision),
            RunStatus::Cleared => return StepResult::Cleared,
            RunStatus::Running => {}
        }

        // Reversing onto the neck is ignored, not fatal
        if let Action::Move(new_direction) = action {
            if !state.snake.direction.is_opposite(new_direction) {
                state.snake.direction = new_direction;
            }
        }

        let new_head = state.snake.head().moved_in_direction(state.snake.direction);
        state.steps += 1;

        if let Some(collision) = self.check_collision(state, new_head) {
            state.status = RunStatus::Over(collision);
            return StepResult::GameOver(collision);
        }

        let ate_food = new_head == state.food;
        if ate_food {
            state.snake.pending_growth += self.config.growth_per_food;
            state.score += 1;
        }

        state.snake.advance();

        if !ate_food {
            return StepResult::Moved;
        }

        debug!(score = state.score, length = state.snake.len(), "food eaten");
        match self.spawn_food(state) {
            Some(food) => {
                state.food = food;
                StepResult::Grew
            }
            None => {
                state.status = RunStatus::Cleared;
                StepResult::Cleared
            }
        }
    }

    /// Check if the new head position causes a collision
    fn check_collision(&self, state: &GameState, pos: Position) -> Option<CollisionType> {
        if !state.is_in_bounds(pos) {
            return Some(CollisionType::Wall);
        }

        if state.snake.blocks(pos) {
            return Some(CollisionType::SelfCollision);
        }

        None
    }

    /// Pick a uniformly random cell not covered by the snake
    fn spawn_food(&mut self, state: &GameState) -> Option<Position> {
        state.empty_cells().choose(&mut self.rng).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> GameEngine {
        GameEngine::with_seed(GameConfig::small(), 7)
    }

    #[test]
    fn test_reset() {
        let mut engine = GameEngine::new(GameConfig::default());
        let state = engine.reset();

        assert!(state.is_running());
        assert_eq!(state.score, 0);
        assert_eq!(state.steps, 0);
        assert_eq!(state.snake.len(), 3);
        assert_eq!(state.snake.direction, Direction::Right);
        assert!(!state.is_occupied_by_snake(state.food));
    }

    #[test]
    fn test_basic_movement() {
        let mut engine = engine();
        let mut state = engine.reset();
        state.food = Position::new(0, 0);
        let initial_head = state.snake.head();

        let result = engine.step(&mut state, Action::Continue);

        assert_eq!(result, StepResult::Moved);
        assert_eq!(state.steps, 1);
        assert_eq!(state.snake.head(), initial_head.moved_by(1, 0));
        assert_eq!(state.snake.len(), 3);
    }

    #[test]
    fn test_food_consumption() {
        let mut engine = engine();
        let mut state = engine.reset();

        let head = state.snake.head();
        state.food = head.moved_in_direction(state.snake.direction);
        let initial_length = state.snake.len();

        let result = engine.step(&mut state, Action::Continue);

        assert_eq!(result, StepResult::Grew);
        assert_eq!(state.score, 1);
        assert_eq!(state.snake.len(), initial_length + 1);
        assert!(!state.is_occupied_by_snake(state.food));
    }

    #[test]
    fn test_growth_per_food_spreads_over_ticks() {
        let config = GameConfig {
            growth_per_food: 3,
            ..GameConfig::small()
        };
        let mut engine = GameEngine::with_seed(config, 1);
        let mut state = engine.reset();
        state.food = state.snake.head().moved_by(1, 0);

        engine.step(&mut state, Action::Continue);
        assert_eq!(state.snake.len(), 4);
        assert_eq!(state.snake.pending_growth, 2);

        state.food = Position::new(0, 0);
        engine.step(&mut state, Action::Move(Direction::Down));
        engine.step(&mut state, Action::Continue);
        assert_eq!(state.snake.len(), 6);
        assert_eq!(state.score, 1);
    }

    #[test]
    fn test_wall_collision() {
        let mut engine = engine();
        let mut state = GameState::new(
            Snake::new(Position::new(0, 5), Direction::Left, 1),
            Position::new(5, 5),
            10,
            10,
        );

        let result = engine.step(&mut state, Action::Continue);

        assert_eq!(result, StepResult::GameOver(CollisionType::Wall));
        assert_eq!(state.status, RunStatus::Over(CollisionType::Wall));
    }

    #[test]
    fn test_self_collision() {
        let mut engine = engine();

        // Body: (5,5), (4,5), (3,5), (2,5), (1,5)
        let snake = Snake::new(Position::new(5, 5), Direction::Right, 5);
        let mut state = GameState::new(snake, Position::new(8, 8), 10, 10);

        // (6,5) -> (6,6) -> (5,6) -> up into (5,5)
        engine.step(&mut state, Action::Continue);
        engine.step(&mut state, Action::Move(Direction::Down));
        engine.step(&mut state, Action::Move(Direction::Left));
        let result = engine.step(&mut state, Action::Move(Direction::Up));

        assert_eq!(result, StepResult::GameOver(CollisionType::SelfCollision));
    }

    #[test]
    fn test_chasing_own_tail_is_legal() {
        let mut engine = engine();
        let snake = Snake::from_segments(
            vec![
                Position::new(5, 5),
                Position::new(5, 6),
                Position::new(4, 6),
                Position::new(4, 5),
            ],
            Direction::Up,
        );
        let mut state = GameState::new(snake, Position::new(0, 0), 10, 10);

        let result = engine.step(&mut state, Action::Move(Direction::Left));

        assert_eq!(result, StepResult::Moved);
        assert_eq!(state.snake.head(), Position::new(4, 5));
    }

    #[test]
    fn test_prevent_180_degree_turn() {
        let mut engine = engine();
        let mut state = engine.reset();
        state.food = Position::new(0, 0);

        let result = engine.step(&mut state, Action::Move(Direction::Left));

        assert_eq!(result, StepResult::Moved);
        assert_eq!(state.snake.direction, Direction::Right);
    }

    #[test]
    fn test_terminated_game_is_frozen() {
        let mut engine = engine();
        let mut state = engine.reset();
        state.status = RunStatus::Over(CollisionType::Wall);
        let before = state.clone();

        let result = engine.step(&mut state, Action::Move(Direction::Up));

        assert_eq!(result, StepResult::GameOver(CollisionType::Wall));
        assert_eq!(state, before);
    }

    #[test]
    fn test_filling_board_clears_run() {
        let mut engine = GameEngine::with_seed(GameConfig::new(3, 1), 3);
        let snake = Snake::new(Position::new(1, 0), Direction::Right, 2);
        let mut state = GameState::new(snake, Position::new(2, 0), 3, 1);

        let result = engine.step(&mut state, Action::Continue);

        assert_eq!(result, StepResult::Cleared);
        assert_eq!(state.status, RunStatus::Cleared);
        assert_eq!(state.snake.len(), 3);
        assert_eq!(engine.step(&mut state, Action::Continue), StepResult::Cleared);
    }

    #[test]
    fn test_seeded_engines_agree() {
        let mut a = GameEngine::with_seed(GameConfig::default(), 42);
        let mut b = GameEngine::with_seed(GameConfig::default(), 42);
        assert_eq!(a.reset().food, b.reset().food);
    }
}
