use std::collections::HashSet;

use rand::Rng;
use serde::Serialize;

use crate::error::GridError;
use crate::input::Direction;

/// Sampling attempts before falling back to enumerating free cells.
const MAX_REJECTION_ATTEMPTS: usize = 64;

/// Grid position in logical cell coordinates.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    #[must_use]
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the neighbouring cell one step along `heading`.
    ///
    /// A stationary heading yields the same cell.
    #[must_use]
    pub fn step(self, heading: Option<Direction>) -> Self {
        let (dx, dy) = heading.map_or((0, 0), Direction::delta);
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Playfield bounds in whole cells.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
pub struct Grid {
    width: u16,
    height: u16,
}

impl Grid {
    /// Creates a grid, rejecting boards that cannot hold a snake and a food.
    pub fn new(width: u16, height: u16) -> Result<Self, GridError> {
        if usize::from(width) * usize::from(height) < 2 {
            return Err(GridError::TooSmall { width, height });
        }

        Ok(Self { width, height })
    }

    #[must_use]
    pub fn width(self) -> u16 {
        self.width
    }

    #[must_use]
    pub fn height(self) -> u16 {
        self.height
    }

    /// Returns the total number of cells in the grid.
    #[must_use]
    pub fn total_cells(self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }

    /// Returns true when the cell lies inside the bounds.
    #[must_use]
    pub fn contains(self, cell: Cell) -> bool {
        cell.x >= 0
            && cell.y >= 0
            && cell.x < i32::from(self.width)
            && cell.y < i32::from(self.height)
    }

    /// Returns a uniformly random in-bounds cell.
    #[must_use]
    pub fn random_cell<R: Rng + ?Sized>(self, rng: &mut R) -> Cell {
        Cell::new(
            rng.gen_range(0..i32::from(self.width)),
            rng.gen_range(0..i32::from(self.height)),
        )
    }

    /// Returns a uniformly random in-bounds cell not in `excluded`.
    ///
    /// Sparse boards are served by rejection sampling; once that runs out of
    /// attempts the free cells are enumerated and one is drawn directly, so the
    /// call terminates even on a nearly full board. `None` means every cell is
    /// excluded.
    pub fn random_free_cell<R: Rng + ?Sized>(
        self,
        rng: &mut R,
        excluded: &HashSet<Cell>,
    ) -> Option<Cell> {
        for _ in 0..MAX_REJECTION_ATTEMPTS {
            let candidate = self.random_cell(rng);
            if !excluded.contains(&candidate) {
                return Some(candidate);
            }
        }

        let free: Vec<Cell> = self.cells().filter(|cell| !excluded.contains(cell)).collect();
        if free.is_empty() {
            return None;
        }

        Some(free[rng.gen_range(0..free.len())])
    }

    /// Iterates over all cells in row-major order.
    pub fn cells(self) -> impl Iterator<Item = Cell> {
        (0..i32::from(self.height))
            .flat_map(move |y| (0..i32::from(self.width)).map(move |x| Cell::new(x, y)))
    }
}
