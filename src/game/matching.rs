//! Match detection and removal.
//!
//! A match is a straight run of at least `MIN_MATCH_LENGTH` settled jewels of
//! one color, horizontally, vertically or along either diagonal. Only settled
//! cells (frozen or already signaled) take part; the faller never matches.

use std::collections::{BTreeMap, BTreeSet};

use crate::constants::MIN_MATCH_LENGTH;
use crate::game::board::{Board, Cell, Jewel, Position};
use crate::game::error::{GameError, GameResult};

/// `(column, row)` steps. Each axis is walked in one direction only; every run
/// has a first cell, so the reverse directions find nothing new.
const DIRECTIONS: [(isize, isize); 4] = [(1, 0), (0, 1), (1, 1), (1, -1)];

fn settled_jewel(board: &Board, position: Position) -> Option<Jewel> {
    let cell = board.cell_at(position);
    if cell.is_settled() {
        cell.jewel()
    } else {
        None
    }
}

fn step(board: &Board, position: Position, (dc, dr): (isize, isize)) -> Option<Position> {
    let next = Position::new(
        position.column.checked_add_signed(dc)?,
        position.row.checked_add_signed(dr)?,
    );
    board.contains(next).then_some(next)
}

/// The same-colored run starting at `start`, `start` included.
fn run_from(board: &Board, start: Position, direction: (isize, isize)) -> Vec<Position> {
    let mut run = Vec::new();
    let Some(jewel) = settled_jewel(board, start) else {
        return run;
    };
    let mut current = Some(start);
    while let Some(position) = current {
        if settled_jewel(board, position) != Some(jewel) {
            break;
        }
        run.push(position);
        current = step(board, position, direction);
    }
    run
}

/// Every position that belongs to some match, deduplicated and ordered by
/// row, then column.
pub fn detect_matches(board: &Board) -> Vec<Position> {
    let mut matched = BTreeSet::new();
    for start in board.positions() {
        for direction in DIRECTIONS {
            let run = run_from(board, start, direction);
            if run.len() >= MIN_MATCH_LENGTH {
                matched.extend(run);
            }
        }
    }
    matched.into_iter().collect()
}

pub fn has_matches(board: &Board) -> bool {
    board.positions().any(|start| {
        DIRECTIONS
            .into_iter()
            .any(|direction| run_from(board, start, direction).len() >= MIN_MATCH_LENGTH)
    })
}

fn check_position(board: &Board, position: Position) -> GameResult<Cell> {
    board.get(position.column, position.row)
}

/// Mark every position as signaled. Nothing is changed unless every position
/// holds a settled jewel.
pub fn signal(board: &mut Board, positions: &[Position]) -> GameResult<()> {
    for &position in positions {
        if !check_position(board, position)?.is_settled() {
            return Err(GameError::PreconditionViolation(
                "only settled jewels can be signaled",
            ));
        }
    }
    for &position in positions {
        if let Some(jewel) = board.cell_at(position).jewel() {
            board.set(position.column, position.row, Cell::Signaled(jewel))?;
        }
    }
    Ok(())
}

/// Remove the given signaled cells and let everything above them fall.
///
/// Rows are original indices: each column drops all of its listed rows at
/// once and is padded on top with the same number of empty cells.
/// Returns the number of cells removed.
pub fn remove_and_collapse(board: &mut Board, positions: &[Position]) -> GameResult<usize> {
    let mut by_column: BTreeMap<usize, BTreeSet<usize>> = BTreeMap::new();
    for &position in positions {
        if !matches!(check_position(board, position)?, Cell::Signaled(_)) {
            return Err(GameError::PreconditionViolation(
                "only signaled jewels can be removed",
            ));
        }
        by_column
            .entry(position.column)
            .or_default()
            .insert(position.row);
    }

    let mut removed_total = 0;
    for (column, rows) in by_column {
        let cells = board.column_mut(column)?;
        let kept: Vec<Cell> = cells
            .iter()
            .enumerate()
            .filter(|(row, _)| !rows.contains(row))
            .map(|(_, &cell)| cell)
            .collect();
        let removed = cells.len() - kept.len();
        cells[..removed].fill(Cell::Empty);
        cells[removed..].copy_from_slice(&kept);
        removed_total += removed;
    }
    Ok(removed_total)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(layout: &[&str]) -> Board {
        Board::from_layout(layout).unwrap()
    }

    fn positions(pairs: &[(usize, usize)]) -> Vec<Position> {
        let mut positions: Vec<Position> = pairs
            .iter()
            .map(|&(column, row)| Position::new(column, row))
            .collect();
        positions.sort();
        positions
    }

    #[test]
    fn test_horizontal_match() {
        let board = board(&["....", "....", "....", "RRRB"]);
        assert_eq!(detect_matches(&board), positions(&[(0, 3), (1, 3), (2, 3)]));
    }

    #[test]
    fn test_vertical_match() {
        let board = board(&["...", "...", ".G.", ".G.", ".G."]);
        assert_eq!(detect_matches(&board), positions(&[(1, 2), (1, 3), (1, 4)]));
    }

    #[test]
    fn test_both_diagonals() {
        let down_right = board(&["...", "...", "Y..", ".Y.", "..Y"]);
        assert_eq!(
            detect_matches(&down_right),
            positions(&[(0, 2), (1, 3), (2, 4)])
        );

        let up_right = board(&["...", "...", "..V", ".V.", "V.."]);
        assert_eq!(
            detect_matches(&up_right),
            positions(&[(0, 4), (1, 3), (2, 2)])
        );
    }

    #[test]
    fn test_long_run_is_fully_captured() {
        let board = board(&["......", "......", "......", "BBBBBO"]);
        assert_eq!(
            detect_matches(&board),
            positions(&[(0, 3), (1, 3), (2, 3), (3, 3), (4, 3)])
        );
    }

    #[test]
    fn test_two_in_a_row_is_not_a_match() {
        let board = board(&["....", "....", "R...", "RR.R"]);
        assert!(detect_matches(&board).is_empty());
        assert!(!has_matches(&board));
    }

    #[test]
    fn test_crossing_runs_are_deduplicated() {
        let board = board(&["...", "...", ".O.", "OOO", ".O."]);
        assert_eq!(
            detect_matches(&board),
            positions(&[(1, 2), (0, 3), (1, 3), (2, 3), (1, 4)])
        );
    }

    #[test]
    fn test_faller_cells_do_not_match() {
        let mut board = board(&["...", "...", "...", "...", "..."]);
        for row in 2..5 {
            board.set(0, row, Cell::Landed(Jewel::Red)).unwrap();
        }
        assert!(detect_matches(&board).is_empty());
    }

    #[test]
    fn test_signaled_cells_still_match() {
        let mut board = board(&["...", "...", "...", "...", "III"]);
        let matched = detect_matches(&board);
        signal(&mut board, &matched).unwrap();
        assert_eq!(board.get(1, 4), Ok(Cell::Signaled(Jewel::Indigo)));
        assert_eq!(detect_matches(&board), matched);
    }

    #[test]
    fn test_signal_rejects_empty_cell_without_mutation() {
        let mut board = board(&["...", "...", "...", "...", "RR."]);
        let before = board.clone();
        let result = signal(&mut board, &positions(&[(0, 4), (2, 4)]));
        assert!(matches!(result, Err(GameError::PreconditionViolation(_))));
        assert_eq!(board, before);
    }

    #[test]
    fn test_remove_collapses_column() {
        let mut board = board(&[".", "O", "Y", "G", "R", "R", "R", "B"]);
        let matched = detect_matches(&board);
        assert_eq!(matched, positions(&[(0, 4), (0, 5), (0, 6)]));
        signal(&mut board, &matched).unwrap();
        assert_eq!(remove_and_collapse(&mut board, &matched), Ok(3));
        assert_eq!(
            board.column(0).unwrap(),
            &[
                Cell::Empty,
                Cell::Empty,
                Cell::Empty,
                Cell::Empty,
                Cell::Frozen(Jewel::Orange),
                Cell::Frozen(Jewel::Yellow),
                Cell::Frozen(Jewel::Green),
                Cell::Frozen(Jewel::Blue),
            ]
        );
    }

    #[test]
    fn test_remove_non_contiguous_rows_in_one_column() {
        let mut board = board(&[".", ".", "Y", "R", "G", "R", "B"]);
        for row in [3, 5] {
            board.set(0, row, Cell::Signaled(Jewel::Red)).unwrap();
        }
        remove_and_collapse(&mut board, &positions(&[(0, 3), (0, 5)])).unwrap();
        assert_eq!(
            board.column(0).unwrap(),
            &[
                Cell::Empty,
                Cell::Empty,
                Cell::Empty,
                Cell::Empty,
                Cell::Frozen(Jewel::Yellow),
                Cell::Frozen(Jewel::Green),
                Cell::Frozen(Jewel::Blue),
            ]
        );
    }

    #[test]
    fn test_remove_rejects_unsignaled() {
        let mut board = board(&["...", "...", "...", "...", "RRR"]);
        let before = board.clone();
        let result = remove_and_collapse(&mut board, &detect_matches(&before));
        assert!(matches!(result, Err(GameError::PreconditionViolation(_))));
        assert_eq!(board, before);
    }

    #[test]
    fn test_remove_out_of_range() {
        let mut board = board(&["...", "...", "..."]);
        let result = remove_and_collapse(&mut board, &[Position::new(3, 0)]);
        assert_eq!(result, Err(GameError::InvalidPosition { column: 3, row: 0 }));
    }
}
