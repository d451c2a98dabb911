//! The jewel grid.
//!
//! Cells are stored column-major in a flat vector so that a whole column can be
//! borrowed as one slice; almost every rule of the game (descent, landing,
//! gravity after a match) works on a single column at a time.
//! Coordinates are `(column, row)` with row 0 at the top. The first
//! `HIDDEN_ROWS` rows are the spawn buffer and are never drawn.

use rand::Rng;

use crate::constants::HIDDEN_ROWS;
use crate::game::error::{GameError, GameResult};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Jewel {
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Indigo,
    Violet,
}

impl Jewel {
    pub const ALL: [Jewel; 7] = [
        Jewel::Red,
        Jewel::Orange,
        Jewel::Yellow,
        Jewel::Green,
        Jewel::Blue,
        Jewel::Indigo,
        Jewel::Violet,
    ];

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    /// One-letter code used in board layouts and logs.
    pub fn code(self) -> char {
        match self {
            Jewel::Red => 'R',
            Jewel::Orange => 'O',
            Jewel::Yellow => 'Y',
            Jewel::Green => 'G',
            Jewel::Blue => 'B',
            Jewel::Indigo => 'I',
            Jewel::Violet => 'V',
        }
    }

    pub fn from_code(code: char) -> Option<Self> {
        Self::ALL.into_iter().find(|jewel| jewel.code() == code)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Cell {
    #[default]
    Empty,
    Falling(Jewel),
    Landed(Jewel),
    Frozen(Jewel),
    Signaled(Jewel),
}

impl Cell {
    pub fn jewel(self) -> Option<Jewel> {
        match self {
            Cell::Empty => None,
            Cell::Falling(jewel)
            | Cell::Landed(jewel)
            | Cell::Frozen(jewel)
            | Cell::Signaled(jewel) => Some(jewel),
        }
    }

    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    /// Part of the active faller.
    pub fn is_faller(self) -> bool {
        matches!(self, Cell::Falling(_) | Cell::Landed(_))
    }

    /// Part of the static board, i.e. eligible for matching.
    pub fn is_settled(self) -> bool {
        matches!(self, Cell::Frozen(_) | Cell::Signaled(_))
    }

    /// Same tag, different jewel. `Empty` stays empty.
    pub(crate) fn with_jewel(self, jewel: Jewel) -> Cell {
        match self {
            Cell::Empty => Cell::Empty,
            Cell::Falling(_) => Cell::Falling(jewel),
            Cell::Landed(_) => Cell::Landed(jewel),
            Cell::Frozen(_) => Cell::Frozen(jewel),
            Cell::Signaled(_) => Cell::Signaled(jewel),
        }
    }
}

/// A board coordinate. Ordering is by row first, so sorted positions read
/// top-to-bottom, left-to-right.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord)]
pub struct Position {
    pub row: usize,
    pub column: usize,
}

impl Position {
    pub fn new(column: usize, row: usize) -> Self {
        Self { row, column }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    columns: usize,
    /// Total rows, hidden rows included
    rows: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Create an empty board with `visible_rows` visible rows plus the hidden
    /// spawn rows on top.
    pub fn new(visible_rows: usize, columns: usize) -> Self {
        let rows = visible_rows + HIDDEN_ROWS;
        Self {
            columns,
            rows,
            cells: vec![Cell::Empty; rows * columns],
        }
    }

    /// Build a board from text rows, top row first, hidden rows included.
    /// `.` is an empty cell and a jewel code (`R`, `O`, ...) a frozen jewel.
    pub fn from_layout(layout: &[&str]) -> GameResult<Self> {
        let columns = layout.first().map_or(0, |row| row.chars().count());
        let visible_rows = layout.len().saturating_sub(HIDDEN_ROWS);
        if visible_rows == 0
            || columns == 0
            || layout.iter().any(|row| row.chars().count() != columns)
        {
            return Err(GameError::InvalidDimensions {
                rows: visible_rows,
                columns,
            });
        }

        let mut board = Self::new(visible_rows, columns);
        for (row, line) in layout.iter().enumerate() {
            for (column, code) in line.chars().enumerate() {
                let cell = match Jewel::from_code(code) {
                    Some(jewel) => Cell::Frozen(jewel),
                    None if code == '.' => Cell::Empty,
                    None => return Err(GameError::InvalidLayout(code)),
                };
                board.set(column, row, cell)?;
            }
        }
        Ok(board)
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn visible_rows(&self) -> usize {
        self.rows - HIDDEN_ROWS
    }

    #[inline]
    fn index(&self, column: usize, row: usize) -> GameResult<usize> {
        if column >= self.columns || row >= self.rows {
            return Err(GameError::InvalidPosition { column, row });
        }
        Ok(column * self.rows + row)
    }

    pub fn get(&self, column: usize, row: usize) -> GameResult<Cell> {
        self.index(column, row).map(|idx| self.cells[idx])
    }

    pub fn set(&mut self, column: usize, row: usize, cell: Cell) -> GameResult<()> {
        let idx = self.index(column, row)?;
        self.cells[idx] = cell;
        Ok(())
    }

    pub fn contains(&self, position: Position) -> bool {
        position.column < self.columns && position.row < self.rows
    }

    /// All cells of one column, top to bottom.
    pub fn column(&self, column: usize) -> GameResult<&[Cell]> {
        let start = self.index(column, 0)?;
        Ok(&self.cells[start..start + self.rows])
    }

    pub(crate) fn column_mut(&mut self, column: usize) -> GameResult<&mut [Cell]> {
        let start = self.index(column, 0)?;
        Ok(&mut self.cells[start..start + self.rows])
    }

    /// Every visible cell of the column is occupied.
    pub fn column_is_full(&self, column: usize) -> GameResult<bool> {
        Ok(self.column(column)?[HIDDEN_ROWS..]
            .iter()
            .all(|cell| !cell.is_empty()))
    }

    /// Nothing in the column can fall any further: there is no empty cell with
    /// an occupied cell somewhere above it.
    pub fn is_descent_blocked(&self, column: usize) -> GameResult<bool> {
        let mut seen_occupied = false;
        for cell in self.column(column)? {
            if !cell.is_empty() {
                seen_occupied = true;
            } else if seen_occupied {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// The stack has grown into the spawn buffer.
    pub fn hidden_rows_occupied(&self) -> bool {
        (0..self.columns).any(|column| {
            let start = column * self.rows;
            self.cells[start..start + HIDDEN_ROWS]
                .iter()
                .any(|cell| !cell.is_empty())
        })
    }

    pub fn any(&self, predicate: impl Fn(Cell) -> bool) -> bool {
        self.cells.iter().any(|&cell| predicate(cell))
    }

    /// Every position on the board, column by column.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.columns)
            .flat_map(move |column| (0..self.rows).map(move |row| Position::new(column, row)))
    }

    /// The cell at `position`, treating anything off the board as empty.
    pub(crate) fn cell_at(&self, position: Position) -> Cell {
        self.get(position.column, position.row).unwrap_or(Cell::Empty)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(crate::constants::VISIBLE_ROWS, crate::constants::BOARD_COLUMNS)
    }
}
