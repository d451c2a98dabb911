use crate::constants::{BOARD_COLUMNS, FALLER_LENGTH, VISIBLE_ROWS};
use crate::game::board::{Board, Cell, Jewel, Position};
use crate::game::error::{GameError, GameResult};
use crate::game::faller::{Direction, Faller};
use crate::game::matching;
use crate::vlog;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Spawning, // No faller, waiting for the next one
    Falling,
    Landed,
    Matching, // Signal/remove cycle until no matches remain
    GameOver,
}

/// The rules engine. Owns the board; every mutation goes through a command
/// below, and a command that fails leaves the board untouched.
#[derive(Clone, Debug)]
pub struct GameState {
    board: Board,
    faller: Option<Faller>,
    phase: Phase,
}

impl GameState {
    pub fn new(rows: usize, columns: usize) -> GameResult<Self> {
        if rows == 0 || columns == 0 {
            return Err(GameError::InvalidDimensions { rows, columns });
        }
        Ok(Self {
            board: Board::new(rows, columns),
            faller: None,
            phase: Phase::Spawning,
        })
    }

    /// Start from an existing board of settled jewels. The phase is derived
    /// from the board: pending matches are resolved first.
    pub fn from_board(board: Board) -> GameResult<Self> {
        if board.visible_rows() == 0 || board.columns() == 0 {
            return Err(GameError::InvalidDimensions {
                rows: board.visible_rows(),
                columns: board.columns(),
            });
        }
        if board.any(Cell::is_faller) {
            return Err(GameError::PreconditionViolation(
                "a starting board cannot contain a faller",
            ));
        }
        let mut state = Self {
            board,
            faller: None,
            phase: Phase::Spawning,
        };
        state.settle();
        Ok(state)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn board_snapshot(&self) -> Board {
        self.board.clone()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn faller(&self) -> Option<Faller> {
        self.faller
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    pub fn column_is_full(&self, column: usize) -> GameResult<bool> {
        self.board.column_is_full(column)
    }

    pub fn all_columns_full(&self) -> bool {
        (0..self.board.columns()).all(|column| self.board.column_is_full(column).unwrap_or(true))
    }

    pub fn is_descent_blocked(&self, column: usize) -> GameResult<bool> {
        self.board.is_descent_blocked(column)
    }

    pub fn any_faller_falling(&self) -> bool {
        self.board.any(|cell| matches!(cell, Cell::Falling(_)))
    }

    pub fn any_faller_landed(&self) -> bool {
        self.board.any(|cell| matches!(cell, Cell::Landed(_)))
    }

    pub fn any_cell_signaled(&self) -> bool {
        self.board.any(|cell| matches!(cell, Cell::Signaled(_)))
    }

    pub fn still_has_matches(&self) -> bool {
        matching::has_matches(&self.board)
    }

    /// The stack reaches into the hidden rows, with nothing left to fall or
    /// to be matched away.
    pub fn check_if_dead(&self) -> bool {
        self.faller.is_none()
            && !self.any_cell_signaled()
            && !self.still_has_matches()
            && self.board.hidden_rows_occupied()
    }

    pub fn spawn_faller(&mut self, column: usize, jewels: [Jewel; FALLER_LENGTH]) -> GameResult<()> {
        if self.phase != Phase::Spawning {
            return Err(GameError::PreconditionViolation(
                "a faller can only spawn when the board is at rest",
            ));
        }
        if self.board.column_is_full(column)? {
            return Err(GameError::PreconditionViolation("cannot spawn into a full column"));
        }

        let faller = Faller::spawned(column);
        let cells = &mut self.board.column_mut(column)?[faller.rows()];
        if cells.iter().any(|cell| !cell.is_empty()) {
            return Err(GameError::PreconditionViolation("spawn rows are occupied"));
        }
        for (cell, jewel) in cells.iter_mut().zip(jewels) {
            *cell = Cell::Falling(jewel);
        }
        self.faller = Some(faller);
        self.phase = Phase::Falling;

        vlog!(
            "spawn: column {} jewels {}{}{}",
            column,
            jewels[0].code(),
            jewels[1].code(),
            jewels[2].code()
        );
        self.update_landing()
    }

    /// One gravity step. A landed faller freezes in place instead of moving.
    pub fn tick_descent(&mut self) -> GameResult<()> {
        let faller = self.active_faller()?;
        if self.phase == Phase::Landed {
            return self.freeze(faller);
        }
        if self.faller_is_blocked(faller)? {
            return self.update_landing();
        }

        // The empty cell below the faller moves to its top.
        let cells = self.board.column_mut(faller.column())?;
        cells[faller.top()..=faller.leading_index()].rotate_right(1);
        self.faller = Some(faller.descended());
        self.update_landing()
    }

    /// Shift the faller one column. Returns the column it ends up in, which is
    /// the original column when the move is blocked.
    pub fn move_lateral(&mut self, direction: Direction) -> GameResult<usize> {
        let faller = self.active_faller()?;
        let from = faller.column();
        let rows = faller.rows();

        let target = match direction.apply(from, self.board.columns()) {
            Some(to) if self.board.column(to)?[rows.clone()].iter().all(|cell| cell.is_empty()) => {
                Some(to)
            }
            _ => None,
        };

        if let Some(to) = target {
            let mut moving = [Cell::Empty; FALLER_LENGTH];
            moving.copy_from_slice(&self.board.column(from)?[rows.clone()]);
            self.board.column_mut(from)?[rows.clone()].fill(Cell::Empty);
            self.board.column_mut(to)?[rows].copy_from_slice(&moving);
            self.faller = Some(faller.moved_to(to));
        }

        self.update_landing()?;
        Ok(target.unwrap_or(from))
    }

    /// Cycle the faller's jewels one step downwards; the bottom jewel wraps
    /// to the top. Cell tags stay where they are.
    pub fn rotate(&mut self) -> GameResult<()> {
        let faller = self.active_faller()?;
        let cells = &mut self.board.column_mut(faller.column())?[faller.rows()];

        let mut jewels = [Jewel::Red; FALLER_LENGTH];
        for (jewel, cell) in jewels.iter_mut().zip(cells.iter()) {
            *jewel = cell
                .jewel()
                .ok_or(GameError::PreconditionViolation("faller cell is empty"))?;
        }
        jewels.rotate_right(1);
        for (cell, jewel) in cells.iter_mut().zip(jewels) {
            *cell = cell.with_jewel(jewel);
        }
        Ok(())
    }

    pub fn detect_matches(&self) -> Vec<Position> {
        matching::detect_matches(&self.board)
    }

    pub fn signal(&mut self, positions: &[Position]) -> GameResult<()> {
        self.ensure_board_at_rest()?;
        matching::signal(&mut self.board, positions)?;
        vlog!("signal: {} jewels {:?}", positions.len(), positions);
        self.settle();
        Ok(())
    }

    pub fn remove_and_collapse(&mut self, positions: &[Position]) -> GameResult<usize> {
        self.ensure_board_at_rest()?;
        let removed = matching::remove_and_collapse(&mut self.board, positions)?;
        vlog!("remove: {} jewels", removed);
        self.settle();
        Ok(removed)
    }

    /// Run the timed event for the current phase: descend or freeze the
    /// faller, or take the next matching step (signal, then remove).
    pub fn advance(&mut self) -> GameResult<()> {
        match self.phase {
            Phase::Falling | Phase::Landed => self.tick_descent(),
            Phase::Matching => {
                if self.any_cell_signaled() {
                    let signaled: Vec<Position> = self
                        .board
                        .positions()
                        .filter(|&position| matches!(self.board.cell_at(position), Cell::Signaled(_)))
                        .collect();
                    self.remove_and_collapse(&signaled).map(|_| ())
                } else {
                    let matched = self.detect_matches();
                    self.signal(&matched)
                }
            }
            Phase::Spawning | Phase::GameOver => Ok(()),
        }
    }

    fn active_faller(&self) -> GameResult<Faller> {
        match (self.phase, self.faller) {
            (Phase::Falling | Phase::Landed, Some(faller)) => Ok(faller),
            _ => Err(GameError::PreconditionViolation("no active faller")),
        }
    }

    fn ensure_board_at_rest(&self) -> GameResult<()> {
        if self.phase == Phase::GameOver {
            return Err(GameError::PreconditionViolation("the game is over"));
        }
        if self.faller.is_some() {
            return Err(GameError::PreconditionViolation("the faller has not frozen yet"));
        }
        Ok(())
    }

    fn faller_is_blocked(&self, faller: Faller) -> GameResult<bool> {
        let below = faller.leading_index();
        if below >= self.board.rows() {
            return Ok(true);
        }
        Ok(!self.board.get(faller.column(), below)?.is_empty())
    }

    /// Mark the faller landed if it cannot descend, otherwise (back to) falling.
    fn update_landing(&mut self) -> GameResult<()> {
        let Some(faller) = self.faller else {
            return Ok(());
        };
        let landed = self.faller_is_blocked(faller)?;
        for cell in &mut self.board.column_mut(faller.column())?[faller.rows()] {
            *cell = match *cell {
                Cell::Falling(jewel) | Cell::Landed(jewel) if landed => Cell::Landed(jewel),
                Cell::Falling(jewel) | Cell::Landed(jewel) => Cell::Falling(jewel),
                other => other,
            };
        }

        let phase = if landed { Phase::Landed } else { Phase::Falling };
        if phase != self.phase {
            vlog!("faller in column {}: {:?} -> {:?}", faller.column(), self.phase, phase);
        }
        self.phase = phase;
        Ok(())
    }

    fn freeze(&mut self, faller: Faller) -> GameResult<()> {
        for cell in &mut self.board.column_mut(faller.column())?[faller.rows()] {
            if let Some(jewel) = cell.jewel() {
                *cell = Cell::Frozen(jewel);
            }
        }
        self.faller = None;
        vlog!("freeze: column {} rows {:?}", faller.column(), faller.rows());
        self.settle();
        Ok(())
    }

    /// Pick the phase for a board with no faller on it.
    fn settle(&mut self) {
        self.phase = if self.any_cell_signaled() || self.still_has_matches() {
            Phase::Matching
        } else if self.board.hidden_rows_occupied() || self.all_columns_full() {
            Phase::GameOver
        } else {
            Phase::Spawning
        };
        if self.phase == Phase::GameOver {
            vlog!("game over");
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            board: Board::new(VISIBLE_ROWS, BOARD_COLUMNS),
            faller: None,
            phase: Phase::Spawning,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::board::Jewel::*;

    fn column_cells(state: &GameState, column: usize) -> Vec<Cell> {
        state.board().column(column).unwrap().to_vec()
    }

    #[test]
    fn test_spawn_into_empty_column_is_falling() {
        let mut state = GameState::new(13, 6).unwrap();
        state.spawn_faller(3, [Red, Green, Blue]).unwrap();
        assert_eq!(state.phase(), Phase::Falling);
        assert_eq!(state.board().get(3, 0), Ok(Cell::Falling(Red)));
        assert_eq!(state.board().get(3, 1), Ok(Cell::Falling(Green)));
        assert_eq!(state.board().get(3, 2), Ok(Cell::Falling(Blue)));
        assert_eq!(state.faller().map(|f| f.column()), Some(3));
    }

    #[test]
    fn test_spawn_onto_stack_lands_immediately() {
        let board = Board::from_layout(&[".", ".", ".", "R", "O", "Y"]).unwrap();
        let mut state = GameState::from_board(board).unwrap();
        state.spawn_faller(0, [Blue, Blue, Green]).unwrap();
        assert_eq!(state.phase(), Phase::Landed);
        assert!(state.any_faller_landed());
        assert!(!state.any_faller_falling());
    }

    #[test]
    fn test_spawn_requires_rest() {
        let mut state = GameState::new(13, 6).unwrap();
        state.spawn_faller(0, [Red, Red, Red]).unwrap();
        let before = state.board_snapshot();
        assert!(matches!(
            state.spawn_faller(1, [Red, Red, Red]),
            Err(GameError::PreconditionViolation(_))
        ));
        assert_eq!(state.board(), &before);
    }

    #[test]
    fn test_spawn_out_of_range_column() {
        let mut state = GameState::new(13, 6).unwrap();
        assert_eq!(
            state.spawn_faller(6, [Red, Red, Red]),
            Err(GameError::InvalidPosition { column: 6, row: 0 })
        );
        assert_eq!(state.phase(), Phase::Spawning);
    }

    #[test]
    fn test_descent_shifts_faller_down() {
        let mut state = GameState::new(13, 6).unwrap();
        state.spawn_faller(2, [Red, Green, Blue]).unwrap();
        state.tick_descent().unwrap();
        let column = column_cells(&state, 2);
        assert_eq!(column[0], Cell::Empty);
        assert_eq!(column[1], Cell::Falling(Red));
        assert_eq!(column[3], Cell::Falling(Blue));
        assert_eq!(state.faller().map(|f| f.bottom()), Some(3));
    }

    #[test]
    fn test_rotate_cycles_downwards() {
        let mut state = GameState::new(13, 6).unwrap();
        state.spawn_faller(0, [Red, Green, Blue]).unwrap();
        state.rotate().unwrap();
        let column = column_cells(&state, 0);
        assert_eq!(
            &column[..3],
            &[Cell::Falling(Blue), Cell::Falling(Red), Cell::Falling(Green)]
        );
    }

    #[test]
    fn test_commands_without_faller_fail() {
        let mut state = GameState::new(13, 6).unwrap();
        assert!(matches!(state.rotate(), Err(GameError::PreconditionViolation(_))));
        assert!(matches!(state.tick_descent(), Err(GameError::PreconditionViolation(_))));
        assert!(matches!(
            state.move_lateral(Direction::Left),
            Err(GameError::PreconditionViolation(_))
        ));
    }

    #[test]
    fn test_new_rejects_degenerate_dimensions() {
        assert_eq!(
            GameState::new(0, 6).err(),
            Some(GameError::InvalidDimensions { rows: 0, columns: 6 })
        );
        assert!(GameState::new(13, 0).is_err());
    }

    #[test]
    fn test_advance_resolves_matches_then_spawns() {
        let board = Board::from_layout(&["...", "...", "...", "GGG"]).unwrap();
        let mut state = GameState::from_board(board).unwrap();
        assert_eq!(state.phase(), Phase::Matching);

        state.advance().unwrap();
        assert!(state.any_cell_signaled());
        assert_eq!(state.phase(), Phase::Matching);

        state.advance().unwrap();
        assert!(!state.any_cell_signaled());
        assert_eq!(state.phase(), Phase::Spawning);
        assert!(state.board().positions().all(|p| state.board().get(p.column, p.row) == Ok(Cell::Empty)));
    }
}
