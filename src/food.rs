use std::collections::HashSet;

use rand::Rng;

use crate::grid::{Cell, Grid};

/// Food entity currently active on the board.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Food {
    pub position: Cell,
}

impl Food {
    /// Creates food at `position`.
    #[must_use]
    pub fn at(position: Cell) -> Self {
        Self { position }
    }

    /// Spawns food in a cell not listed in `occupied`.
    ///
    /// Returns `None` when no free cell remains.
    pub fn spawn<'a, R, I>(rng: &mut R, grid: Grid, occupied: I) -> Option<Self>
    where
        R: Rng + ?Sized,
        I: IntoIterator<Item = &'a Cell>,
    {
        let excluded: HashSet<Cell> = occupied.into_iter().copied().collect();
        grid.random_free_cell(rng, &excluded).map(Self::at)
    }

    /// Moves the food to a cell not listed in `occupied` and returns it.
    ///
    /// On a full board the position is left untouched and `None` is returned.
    pub fn respawn<'a, R, I>(&mut self, rng: &mut R, grid: Grid, occupied: I) -> Option<Cell>
    where
        R: Rng + ?Sized,
        I: IntoIterator<Item = &'a Cell>,
    {
        let next = Self::spawn(rng, grid, occupied)?;
        self.position = next.position;
        Some(self.position)
    }
}
