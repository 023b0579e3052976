use std::io;

use thiserror::Error;

/// Rejected playfield dimensions.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Error)]
pub enum GridError {
    /// The grid cannot hold both a one-cell snake and a food.
    #[error("grid {width}x{height} is too small, at least two cells are required")]
    TooSmall { width: u16, height: u16 },
}

/// Failure while reading or writing the persisted high score.
#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("high score file i/o failed: {0}")]
    Io(#[from] io::Error),
    #[error("high score file is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}
