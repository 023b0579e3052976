use std::collections::VecDeque;

use crate::grid::Cell;
use crate::input::{Direction, direction_change_is_valid};

/// Mutable snake state and movement buffering behavior.
#[derive(Debug, Clone)]
pub struct Snake {
    body: VecDeque<Cell>,
    heading: Option<Direction>,
    pending: VecDeque<Direction>,
    growth_remaining: u32,
}

impl Snake {
    /// Creates a one-cell snake at `start`. `None` leaves it stationary.
    #[must_use]
    pub fn new(start: Cell, heading: Option<Direction>) -> Self {
        let mut body = VecDeque::new();
        body.push_front(start);

        Self {
            body,
            heading,
            pending: VecDeque::new(),
            growth_remaining: 0,
        }
    }

    /// Creates a snake from explicit body segments (front is head).
    ///
    /// An empty `segments` list is not a snake; callers must pass at least one cell.
    #[must_use]
    pub fn from_segments(segments: Vec<Cell>, heading: Option<Direction>) -> Self {
        debug_assert!(!segments.is_empty());

        Self {
            body: VecDeque::from(segments),
            heading,
            pending: VecDeque::new(),
            growth_remaining: 0,
        }
    }

    /// Queues `amount` cells of growth, one per upcoming tick.
    pub fn grow(&mut self, amount: u32) {
        self.growth_remaining = self.growth_remaining.saturating_add(amount);
    }

    /// Buffers a turn for an upcoming tick.
    ///
    /// The request is dropped when it reverses the active heading or repeats
    /// the most recently queued turn. While stationary everything is accepted.
    /// Only the active heading is checked, so a reversal can still be queued
    /// behind a valid turn; `advance` discards it when it comes up.
    pub fn change_direction(&mut self, requested: Direction) {
        if self.heading.is_some()
            && (!direction_change_is_valid(self.heading, requested)
                || self.pending.back() == Some(&requested))
        {
            return;
        }

        self.pending.push_back(requested);
    }

    /// Applies one movement step and returns the new head.
    ///
    /// Queued turns apply oldest first, one per tick, so two quick presses
    /// become two consecutive turns. A turn that would now reverse the heading
    /// is dropped and the next one is tried.
    pub fn advance(&mut self) -> Cell {
        while let Some(next) = self.pending.pop_front() {
            if direction_change_is_valid(self.heading, next) {
                self.heading = Some(next);
                break;
            }
        }

        let new_head = self.head().step(self.heading);
        self.body.push_front(new_head);

        if self.growth_remaining > 0 {
            self.growth_remaining -= 1;
        } else {
            let _ = self.body.pop_back();
        }

        new_head
    }

    /// Returns the current head position.
    #[must_use]
    pub fn head(&self) -> Cell {
        // `body` is never empty: `advance` pushes before it pops.
        self.body.front().copied().unwrap_or(Cell::new(0, 0))
    }

    /// Returns true if any segment occupies `cell`.
    #[must_use]
    pub fn occupies(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    /// Returns true if the head overlaps any non-head segment.
    #[must_use]
    pub fn head_overlaps_body(&self) -> bool {
        let head = self.head();
        self.body.iter().skip(1).any(|segment| *segment == head)
    }

    /// Returns current segment count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Returns true when there are no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    #[must_use]
    pub fn heading(&self) -> Option<Direction> {
        self.heading
    }

    /// Queued turns, oldest first; the front entry is applied next.
    #[must_use]
    pub fn pending(&self) -> &VecDeque<Direction> {
        &self.pending
    }

    #[must_use]
    pub fn growth_remaining(&self) -> u32 {
        self.growth_remaining
    }

    /// Iterates over body segments from head to tail.
    pub fn segments(&self) -> impl Iterator<Item = &Cell> {
        self.body.iter()
    }
}
