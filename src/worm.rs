use std::convert::TryFrom;

use Direction::*;
use MoveResult::*;

/// A cell of the square grid, 0-indexed from the top-left corner.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    pub row: u16,
    pub col: u16,
}

impl Cell {
    pub fn new(row: u16, col: u16) -> Self {
        Cell { row, col }
    }

    /// The cell one step away in `direction`, or `None` if that step leaves
    /// an `size` x `size` grid.
    pub fn step(self, direction: Direction, size: u16) -> Option<Cell> {
        let (d_row, d_col) = direction.delta();
        let row = i32::from(self.row) + d_row;
        let col = i32::from(self.col) + d_col;

        let in_bounds = |v: i32| v >= 0 && v < i32::from(size);
        if !in_bounds(row) || !in_bounds(col) {
            return None;
        }

        // Both values are inside [0, size), so they fit back into u16
        Some(Cell::new(u16::try_from(row).ok()?, u16::try_from(col).ok()?))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Still,
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Unit vector as (d_row, d_col).
    pub fn delta(self) -> (i32, i32) {
        match self {
            Still => (0, 0),
            Up => (-1, 0),
            Down => (1, 0),
            Left => (0, -1),
            Right => (0, 1),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MoveResult {
    Moved { from: Cell, to: Cell },
    Stayed,
    Crashed,
}

/// The worm occupies exactly one cell; it never grows a tail.
pub struct Worm {
    position: Cell,
    direction: Direction,
}

impl Worm {
    pub fn new(position: Cell) -> Self {
        Worm { position, direction: Still }
    }

    pub fn position(&self) -> Cell {
        self.position
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Overwrites the heading unconditionally. Reversing is legal with a
    /// single cell body.
    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    pub fn move_step(&mut self, size: u16) -> MoveResult {
        if self.direction == Still {
            return Stayed;
        }

        match self.position.step(self.direction, size) {
            Some(next) => {
                let from = self.position;
                self.position = next;
                Moved { from, to: next }
            }
            None => Crashed,
        }
    }
}
