//! tcolumns: the rules engine of a Columns-style jewel matching game, plus
//! the terminal front end that drives it.
//!
//! [`game::GameState`] owns the board and implements every rule: spawning
//! fallers, descent, landing and freezing, lateral movement, rotation, and the
//! match/signal/remove/collapse cycle. [`game::Session`] runs it in real time.

pub mod logging;

pub mod config;
pub mod constants;
pub mod game;
pub mod input;
pub mod ui;
