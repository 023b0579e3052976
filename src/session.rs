use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use tracing::debug;

use crate::config::SessionConfig;
use crate::food::Food;
use crate::grid::Grid;
use crate::snake::Snake;

/// Current high-level gameplay state.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
pub enum SessionStatus {
    Running,
    Paused,
    Terminated,
}

/// Why a session ended.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
pub enum Outcome {
    SelfCollision,
    WallCollision,
    /// The snake fills the board and no food can be placed.
    BoardFull,
}

/// Complete mutable game state for one session.
///
/// A session is never revived once terminated; the controller builds a new one.
#[derive(Debug, Clone)]
pub struct Session {
    pub snake: Snake,
    pub food: Food,
    pub status: SessionStatus,
    pub tick_count: u64,
    outcome: Option<Outcome>,
    tick_interval_ms: u64,
    grid: Grid,
    config: SessionConfig,
    rng: StdRng,
}

impl Session {
    /// Creates a deterministic session for tests and reproducible simulations.
    ///
    /// The snake starts as a single cell at a random position.
    #[must_use]
    pub fn new_with_seed(grid: Grid, config: SessionConfig, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let snake = Snake::new(grid.random_cell(&mut rng), config.initial_heading);
        let mut session = Self {
            food: Food::at(snake.head()),
            snake,
            status: if config.start_paused {
                SessionStatus::Paused
            } else {
                SessionStatus::Running
            },
            tick_count: 0,
            outcome: None,
            tick_interval_ms: config.initial_tick_interval_ms,
            grid,
            config,
            rng,
        };

        // `Grid` guarantees two cells, so a one-cell snake always leaves room.
        session.place_food();
        session
    }

    /// Advances the simulation by one tick.
    ///
    /// Returns the outcome when this tick ended the session. Ticks outside the
    /// running state are no-ops.
    pub fn tick(&mut self) -> Option<Outcome> {
        if self.status != SessionStatus::Running {
            return None;
        }

        // Food stranded by a resize while paused moves once play resumes.
        if !self.grid.contains(self.food.position) && !self.place_food() {
            return Some(self.terminate(Outcome::BoardFull));
        }

        self.tick_count += 1;
        let head = self.snake.advance();

        if !self.grid.contains(head) {
            return Some(self.terminate(Outcome::WallCollision));
        }

        if self.snake.head_overlaps_body() {
            return Some(self.terminate(Outcome::SelfCollision));
        }

        if head == self.food.position {
            self.snake.grow(self.config.growth_per_food);
            self.tick_interval_ms = self.config.ramped_interval_ms(self.tick_interval_ms);
            debug!(
                length = self.snake.len(),
                tick_interval_ms = self.tick_interval_ms,
                "food eaten"
            );

            if !self.place_food() {
                return Some(self.terminate(Outcome::BoardFull));
            }
        }

        None
    }

    /// Flips between running and paused. Terminated sessions stay terminated.
    pub fn toggle_pause(&mut self) {
        self.status = match self.status {
            SessionStatus::Running => SessionStatus::Paused,
            SessionStatus::Paused => SessionStatus::Running,
            SessionStatus::Terminated => SessionStatus::Terminated,
        };
    }

    /// Applies new playfield bounds between ticks.
    ///
    /// Food left outside the new bounds is moved while running; a paused
    /// session keeps it until the next tick. A snake left outside dies on its
    /// next tick. Returns the outcome when the resize ended the session.
    pub fn resize(&mut self, grid: Grid) -> Option<Outcome> {
        self.grid = grid;

        if self.status != SessionStatus::Running || grid.contains(self.food.position) {
            return None;
        }

        if self.place_food() {
            None
        } else {
            Some(self.terminate(Outcome::BoardFull))
        }
    }

    /// Score is the snake's length.
    #[must_use]
    pub fn score(&self) -> u32 {
        u32::try_from(self.snake.len()).unwrap_or(u32::MAX)
    }

    #[must_use]
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    #[must_use]
    pub fn tick_interval_ms(&self) -> u64 {
        self.tick_interval_ms
    }

    #[must_use]
    pub fn grid(&self) -> Grid {
        self.grid
    }

    fn place_food(&mut self) -> bool {
        self.food
            .respawn(&mut self.rng, self.grid, self.snake.segments())
            .is_some()
    }

    fn terminate(&mut self, outcome: Outcome) -> Outcome {
        self.status = SessionStatus::Terminated;
        self.outcome = Some(outcome);
        outcome
    }
}
