pub const BOARD_COLUMNS: usize = 6;
pub const VISIBLE_ROWS: usize = 13;
// Spawn buffer above the play field, never drawn
pub const HIDDEN_ROWS: usize = 2;

pub const FALLER_LENGTH: usize = 3;
pub const MIN_MATCH_LENGTH: usize = 3;

// Timing (in milliseconds)
pub const TICK_DELAY: u64 = 1000; // One logical event (descend, freeze, signal, remove) per tick
pub const FRAME_DELAY: u64 = 16;  // Terminal poll interval between draws
