pub mod board;
pub mod error;
pub mod faller;
pub mod matching;
pub mod session;
pub mod state;

pub use board::{Board, Cell, Jewel, Position};
pub use error::{GameError, GameResult};
pub use faller::{Direction, Faller};
pub use session::{Command, Session};
pub use state::{GameState, Phase};
