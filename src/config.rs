use ratatui::style::Color;

use crate::input::Direction;

/// Grid width used when the terminal size cannot be queried.
pub const DEFAULT_GRID_WIDTH: u16 = 40;

/// Grid height used when the terminal size cannot be queried.
pub const DEFAULT_GRID_HEIGHT: u16 = 20;

/// Base tick interval in milliseconds.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 80;

/// Minimum tick interval in milliseconds.
pub const MIN_TICK_INTERVAL_MS: u64 = 40;

/// Tick interval reduction per food eaten.
pub const TICK_INTERVAL_STEP_MS: u64 = 2;

/// Segments added per food eaten.
pub const GROWTH_PER_FOOD: u32 = 5;

/// Input poll timeout of the runtime loop.
pub const FRAME_POLL_INTERVAL_MS: u64 = 16;

/// Terminal columns drawn per grid cell, so cells look roughly square.
pub const CELL_COLUMNS: u16 = 2;

/// Rows reserved below the play area for the score line.
pub const HUD_HEIGHT: u16 = 1;

pub const GLYPH_CELL: &str = "██";

pub const SNAKE_HEAD_COLOR: Color = Color::White;
pub const SNAKE_BODY_COLOR: Color = Color::Gray;
pub const FOOD_COLOR: Color = Color::Rgb(0x00, 0xcc, 0x88);
pub const BORDER_COLOR: Color = Color::DarkGray;
pub const HUD_COLOR: Color = Color::White;

/// Tunables for one game session.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct SessionConfig {
    /// Segments added per food eaten.
    pub growth_per_food: u32,
    pub initial_tick_interval_ms: u64,
    pub min_tick_interval_ms: u64,
    pub tick_interval_step_ms: u64,
    /// Heading of a freshly spawned snake; `None` waits for the first turn.
    pub initial_heading: Option<Direction>,
    /// Start (and restart) sessions paused instead of running.
    pub start_paused: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            growth_per_food: GROWTH_PER_FOOD,
            initial_tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            min_tick_interval_ms: MIN_TICK_INTERVAL_MS,
            tick_interval_step_ms: TICK_INTERVAL_STEP_MS,
            initial_heading: None,
            start_paused: false,
        }
    }
}

impl SessionConfig {
    /// Returns the interval that follows `current` after one food is eaten.
    #[must_use]
    pub fn ramped_interval_ms(&self, current: u64) -> u64 {
        current
            .saturating_sub(self.tick_interval_step_ms)
            .max(self.min_tick_interval_ms)
    }
}
