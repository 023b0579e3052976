//! Grid-based snake: a tick-driven movement, growth and collision engine with
//! a ratatui terminal frontend.
//!
//! The engine (`grid`, `snake`, `food`, `session`, `controller`) never touches
//! the terminal. Frontends feed it [`input::Command`]s, call
//! [`controller::Controller::tick`] at the interval it asks for, and draw the
//! [`controller::Snapshot`] it hands back.

pub mod config;
pub mod controller;
pub mod error;
pub mod food;
pub mod grid;
pub mod input;
pub mod renderer;
pub mod score;
pub mod session;
pub mod snake;
pub mod terminal_runtime;
