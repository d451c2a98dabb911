use std::time::Instant;

use crossterm::event::{KeyCode, KeyEventKind};

use crate::game::{Command, GameResult, Session};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Game(Command),
    Restart,
    Quit,
}

/// Translate a key event. Only presses count; repeats and releases are
/// ignored so that one key press moves the faller exactly once.
pub fn map_key(key_code: KeyCode, kind: KeyEventKind) -> Option<Action> {
    if kind != KeyEventKind::Press {
        return None;
    }
    match key_code {
        KeyCode::Left => Some(Action::Game(Command::MoveLeft)),
        KeyCode::Right => Some(Action::Game(Command::MoveRight)),
        KeyCode::Up | KeyCode::Char(' ') => Some(Action::Game(Command::Rotate)),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(Action::Restart),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Action::Quit),
        _ => None,
    }
}

/// Apply a key event to the session. Returns `false` once the player quits.
pub fn handle_input(
    session: &mut Session,
    key_code: KeyCode,
    kind: KeyEventKind,
    now: Instant,
) -> GameResult<bool> {
    match map_key(key_code, kind) {
        Some(Action::Game(command)) => session.apply(command)?,
        Some(Action::Restart) => session.restart(now)?,
        Some(Action::Quit) => return Ok(false),
        None => {}
    }
    Ok(true)
}
