use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::game::error::GameResult;
use crate::game::faller::{random_jewels, Direction};
use crate::game::state::{GameState, Phase};
use crate::vlog;

/// Player commands that reach the rules engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    MoveLeft,
    MoveRight,
    Rotate,
}

/// Drives a `GameState` in real time: spawns random fallers and runs one
/// timed event per tick.
pub struct Session {
    state: GameState,
    rng: StdRng,
    tick_delay: Duration,
    last_tick: Instant,
}

impl Session {
    pub fn new(state: GameState, seed: Option<u64>, tick_delay: Duration, now: Instant) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            state,
            rng,
            tick_delay,
            last_tick: now,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn update(&mut self, now: Instant) -> GameResult<()> {
        if self.state.phase() == Phase::Spawning {
            self.spawn_random_faller()?;
            self.last_tick = now;
            return Ok(());
        }

        if now.duration_since(self.last_tick) >= self.tick_delay {
            self.last_tick = now;
            self.state.advance()?;
        }
        Ok(())
    }

    /// Apply a player command. Commands only act on an active faller and are
    /// dropped while the board is resolving matches or the game is over.
    pub fn apply(&mut self, command: Command) -> GameResult<()> {
        if self.state.faller().is_none() {
            return Ok(());
        }
        match command {
            Command::MoveLeft => self.state.move_lateral(Direction::Left).map(|_| ()),
            Command::MoveRight => self.state.move_lateral(Direction::Right).map(|_| ()),
            Command::Rotate => self.state.rotate(),
        }
    }

    /// New empty board of the same size. The random stream carries on.
    pub fn restart(&mut self, now: Instant) -> GameResult<()> {
        let board = self.state.board();
        self.state = GameState::new(board.visible_rows(), board.columns())?;
        self.last_tick = now;
        vlog!("restart");
        Ok(())
    }

    fn spawn_random_faller(&mut self) -> GameResult<()> {
        let candidates: Vec<usize> = (0..self.state.board().columns())
            .filter(|&column| matches!(self.state.column_is_full(column), Ok(false)))
            .collect();
        let Some(&column) = candidates.choose(&mut self.rng) else {
            return Ok(());
        };
        let jewels = random_jewels(&mut self.rng);
        self.state.spawn_faller(column, jewels)
    }
}
