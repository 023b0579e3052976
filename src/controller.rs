use std::time::Duration;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::Serialize;
use tracing::{info, warn};

use crate::config::SessionConfig;
use crate::grid::{Cell, Grid};
use crate::input::Command;
use crate::score::ScoreStore;
use crate::session::{Outcome, Session, SessionStatus};

/// Reported once when a session ends.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
pub struct TerminalEvent {
    pub outcome: Outcome,
    pub score: u32,
    /// High score after this session was accounted for.
    pub high_score: u32,
    pub new_high_score: bool,
}

/// Immutable per-frame view handed to the presentation layer.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct Snapshot {
    /// Body cells, head first.
    pub body: Vec<Cell>,
    pub food: Cell,
    pub score: u32,
    pub high_score: Option<u32>,
    pub status: SessionStatus,
    pub outcome: Option<Outcome>,
    pub width: u16,
    pub height: u16,
    pub tick_interval_ms: u64,
}

/// Drives sessions: applies commands, runs ticks, resets, and keeps the high score.
#[derive(Debug)]
pub struct Controller<S> {
    session: Session,
    grid: Grid,
    config: SessionConfig,
    store: S,
    high_score: Option<u32>,
    last_event: Option<TerminalEvent>,
    rng: StdRng,
}

impl<S: ScoreStore> Controller<S> {
    /// Creates a controller seeded from OS entropy.
    pub fn new(grid: Grid, config: SessionConfig, store: S) -> Self {
        Self::with_seed(grid, config, store, rand::thread_rng().next_u64())
    }

    /// Creates a controller whose sessions are reproducible from `seed`.
    pub fn with_seed(grid: Grid, config: SessionConfig, store: S, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let session = Session::new_with_seed(grid, config, rng.next_u64());
        let high_score = load_high_score(&store);
        info!(
            width = grid.width(),
            height = grid.height(),
            ?high_score,
            "session started"
        );

        Self {
            session,
            grid,
            config,
            store,
            high_score,
            last_event: None,
            rng,
        }
    }

    /// Applies one external command. `Quit` is left to the runtime loop.
    pub fn handle(&mut self, command: Command) {
        match command {
            Command::Turn(direction) => {
                if self.session.status == SessionStatus::Running {
                    self.session.snake.change_direction(direction);
                }
            }
            Command::TogglePause => self.session.toggle_pause(),
            Command::Reset => self.reset(),
            Command::Quit => {}
        }
    }

    /// Runs one tick; returns the terminal event when the session ends on it.
    pub fn tick(&mut self) -> Option<TerminalEvent> {
        let outcome = self.session.tick()?;
        Some(self.finish(outcome))
    }

    /// Replaces the current session with a fresh one.
    pub fn reset(&mut self) {
        self.session = Session::new_with_seed(self.grid, self.config, self.rng.next_u64());
        self.last_event = None;
        info!("session reset");
    }

    /// Applies new playfield bounds. Must be called between ticks.
    pub fn resize(&mut self, grid: Grid) -> Option<TerminalEvent> {
        if grid == self.grid {
            return None;
        }

        info!(
            width = grid.width(),
            height = grid.height(),
            "playfield resized"
        );
        self.grid = grid;
        let outcome = self.session.resize(grid)?;
        Some(self.finish(outcome))
    }

    /// Interval the tick driver should wait before the next tick.
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.session.tick_interval_ms())
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Mutable access for scripted setups.
    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    #[must_use]
    pub fn high_score(&self) -> Option<u32> {
        self.high_score
    }

    /// Terminal event of the current session, if it has ended.
    #[must_use]
    pub fn last_event(&self) -> Option<TerminalEvent> {
        self.last_event
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            body: self.session.snake.segments().copied().collect(),
            food: self.session.food.position,
            score: self.session.score(),
            high_score: self.high_score,
            status: self.session.status,
            outcome: self.session.outcome(),
            width: self.grid.width(),
            height: self.grid.height(),
            tick_interval_ms: self.session.tick_interval_ms(),
        }
    }

    fn finish(&mut self, outcome: Outcome) -> TerminalEvent {
        let score = self.session.score();

        // Another process may have raised the stored value meanwhile.
        let stored = load_high_score(&self.store).or(self.high_score);
        let new_high_score = stored.is_none_or(|stored| score > stored);

        if new_high_score {
            if let Err(error) = self.store.save(score) {
                warn!(%error, score, "failed to save high score");
            }
            self.high_score = Some(score);
        } else {
            self.high_score = stored;
        }

        let event = TerminalEvent {
            outcome,
            score,
            high_score: self.high_score.unwrap_or(score),
            new_high_score,
        };
        info!(?outcome, score, new_high_score, "session terminated");
        self.last_event = Some(event);
        event
    }
}

fn load_high_score<S: ScoreStore>(store: &S) -> Option<u32> {
    store.load().unwrap_or_else(|error| {
        warn!(%error, "failed to load high score");
        None
    })
}

#[cfg(test)]
mod tests {
    use crate::config::SessionConfig;
    use crate::food::Food;
    use crate::grid::{Cell, Grid};
    use crate::input::{Command, Direction};
    use crate::score::MemoryScoreStore;
    use crate::session::{Outcome, SessionStatus};
    use crate::snake::Snake;

    use super::Controller;

    fn controller(store: MemoryScoreStore) -> Controller<MemoryScoreStore> {
        let grid = Grid::new(20, 20).expect("grid should be valid");
        Controller::with_seed(grid, SessionConfig::default(), store, 21)
    }

    /// A snake of `length` cells on row 0, head at the right edge, heading right.
    fn doomed_snake(length: i32) -> Snake {
        Snake::from_segments(
            (0..length).map(|i| Cell::new(19 - i, 0)).collect(),
            Some(Direction::Right),
        )
    }

    #[test]
    fn first_termination_sets_high_score() {
        let mut game = controller(MemoryScoreStore::default());
        game.session_mut().snake = doomed_snake(12);
        game.session_mut().food = Food::at(Cell::new(0, 10));

        let event = game.tick().expect("snake hits the wall");

        assert_eq!(event.outcome, Outcome::WallCollision);
        assert_eq!(event.score, 12);
        assert!(event.new_high_score);
        assert_eq!(game.store().value, Some(12));
        assert_eq!(game.high_score(), Some(12));
    }

    #[test]
    fn lower_score_keeps_stored_high_score() {
        let mut game = controller(MemoryScoreStore { value: Some(30) });
        game.session_mut().snake = doomed_snake(12);
        game.session_mut().food = Food::at(Cell::new(0, 10));

        let event = game.tick().expect("snake hits the wall");

        assert!(!event.new_high_score);
        assert_eq!(event.high_score, 30);
        assert_eq!(game.store().value, Some(30));
    }

    #[test]
    fn equal_score_is_not_a_new_high_score() {
        let mut game = controller(MemoryScoreStore { value: Some(12) });
        game.session_mut().snake = doomed_snake(12);
        game.session_mut().food = Food::at(Cell::new(0, 10));

        let event = game.tick().expect("snake hits the wall");

        assert!(!event.new_high_score);
    }

    #[test]
    fn terminated_session_waits_for_reset() {
        let mut game = controller(MemoryScoreStore::default());
        game.session_mut().snake = doomed_snake(3);
        game.session_mut().food = Food::at(Cell::new(0, 10));
        game.tick();

        assert_eq!(game.tick(), None);
        assert_eq!(game.session().status, SessionStatus::Terminated);
        assert!(game.last_event().is_some());

        game.handle(Command::Reset);

        assert_eq!(game.session().status, SessionStatus::Running);
        assert_eq!(game.session().snake.len(), 1);
        assert_eq!(game.session().snake.heading(), None);
        assert!(game.last_event().is_none());
    }

    #[test]
    fn turns_are_dropped_while_paused() {
        let mut game = controller(MemoryScoreStore::default());
        game.session_mut().snake = Snake::new(Cell::new(5, 5), Some(Direction::Up));

        game.handle(Command::TogglePause);
        game.handle(Command::Turn(Direction::Left));
        assert!(game.session().snake.pending().is_empty());

        game.handle(Command::TogglePause);
        game.handle(Command::Turn(Direction::Left));
        assert_eq!(game.session().snake.pending(), &[Direction::Left]);
    }

    #[test]
    fn snapshot_reflects_session() {
        let mut game = controller(MemoryScoreStore { value: Some(4) });
        game.session_mut().snake = Snake::from_segments(
            vec![Cell::new(2, 2), Cell::new(1, 2)],
            Some(Direction::Right),
        );
        game.session_mut().food = Food::at(Cell::new(7, 7));

        let snapshot = game.snapshot();

        assert_eq!(snapshot.body, vec![Cell::new(2, 2), Cell::new(1, 2)]);
        assert_eq!(snapshot.food, Cell::new(7, 7));
        assert_eq!(snapshot.score, 2);
        assert_eq!(snapshot.high_score, Some(4));
        assert_eq!(snapshot.status, SessionStatus::Running);
        assert_eq!((snapshot.width, snapshot.height), (20, 20));

        let json = serde_json::to_value(&snapshot).expect("snapshot should serialize");
        assert_eq!(json["body"][0]["x"], 2);
        assert_eq!(json["status"], "Running");
    }

    #[test]
    fn tick_interval_tracks_speed_ramp() {
        let mut game = controller(MemoryScoreStore::default());
        game.session_mut().snake = Snake::new(Cell::new(5, 5), Some(Direction::Right));
        game.session_mut().food = Food::at(Cell::new(6, 5));

        assert_eq!(game.tick_interval().as_millis(), 80);
        game.tick();
        assert_eq!(game.tick_interval().as_millis(), 78);
    }

    #[test]
    fn resize_keeps_session_running() {
        let mut game = controller(MemoryScoreStore::default());
        game.session_mut().snake = Snake::new(Cell::new(1, 1), Some(Direction::Right));
        game.session_mut().food = Food::at(Cell::new(18, 18));

        let grid = Grid::new(6, 6).expect("grid should be valid");
        assert_eq!(game.resize(grid), None);

        let snapshot = game.snapshot();
        assert_eq!((snapshot.width, snapshot.height), (6, 6));
        assert!(grid.contains(snapshot.food));
        assert_eq!(snapshot.status, SessionStatus::Running);
    }
}
