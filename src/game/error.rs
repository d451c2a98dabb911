use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
pub enum GameError {
    #[error("position (column {column}, row {row}) is outside the board")]
    InvalidPosition { column: usize, row: usize },
    #[error("precondition violated: {0}")]
    PreconditionViolation(&'static str),
    #[error("a board needs at least one visible row and one column (got {rows} rows, {columns} columns)")]
    InvalidDimensions { rows: usize, columns: usize },
    #[error("unknown cell code {0:?} in board layout")]
    InvalidLayout(char),
}

pub type GameResult<T> = Result<T, GameError>;
