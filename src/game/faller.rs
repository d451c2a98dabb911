use std::ops::Range;

use rand::Rng;

use crate::constants::FALLER_LENGTH;
use crate::game::board::Jewel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    pub fn delta(self) -> isize {
        match self {
            Direction::Left => -1,
            Direction::Right => 1,
        }
    }

    /// The neighbouring column, if it exists on a board `columns` wide.
    pub fn apply(self, column: usize, columns: usize) -> Option<usize> {
        column
            .checked_add_signed(self.delta())
            .filter(|&next| next < columns)
    }
}

/// Where the active faller sits. Its jewels live on the board; this only
/// tracks the column and the row of its lowest cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Faller {
    column: usize,
    bottom: usize,
}

impl Faller {
    /// A freshly spawned faller occupies rows `0..FALLER_LENGTH`.
    pub fn spawned(column: usize) -> Self {
        Self {
            column,
            bottom: FALLER_LENGTH - 1,
        }
    }

    pub fn column(&self) -> usize {
        self.column
    }

    pub fn top(&self) -> usize {
        self.bottom + 1 - FALLER_LENGTH
    }

    pub fn bottom(&self) -> usize {
        self.bottom
    }

    /// The row directly beneath the faller. Rotation counts back from it.
    pub fn leading_index(&self) -> usize {
        self.bottom + 1
    }

    pub fn rows(&self) -> Range<usize> {
        self.top()..self.leading_index()
    }

    pub(crate) fn descended(self) -> Self {
        Self {
            bottom: self.bottom + 1,
            ..self
        }
    }

    pub(crate) fn moved_to(self, column: usize) -> Self {
        Self { column, ..self }
    }
}

/// Jewels for a new faller, top first.
pub fn random_jewels<R: Rng + ?Sized>(rng: &mut R) -> [Jewel; FALLER_LENGTH] {
    [Jewel::random(rng), Jewel::random(rng), Jewel::random(rng)]
}
