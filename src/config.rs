use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::constants::{BOARD_COLUMNS, FRAME_DELAY, TICK_DELAY, VISIBLE_ROWS};

#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Number of visible rows (two hidden spawn rows are added on top).
    #[arg(long, default_value_t = VISIBLE_ROWS as u16, value_parser = clap::value_parser!(u16).range(1..=64))]
    pub rows: u16,
    /// Number of columns.
    #[arg(long, default_value_t = BOARD_COLUMNS as u16, value_parser = clap::value_parser!(u16).range(1..=32))]
    pub columns: u16,
    /// Milliseconds between timed events (descend, freeze, signal, remove).
    #[arg(long, default_value_t = TICK_DELAY, value_parser = clap::value_parser!(u64).range(10..=60_000))]
    pub tick_ms: u64,
    /// Milliseconds to wait for input between redraws.
    #[arg(long, default_value_t = FRAME_DELAY, value_parser = clap::value_parser!(u64).range(1..=1000))]
    pub frame_ms: u64,
    /// Seed for the faller sequence, to replay the same game.
    /// Example: `./tcolumns --seed=42` or `./tcolumns -s 42`.
    #[arg(short, long)]
    pub seed: Option<u64>,
    /// Write a log of game events to this file.
    #[arg(long)]
    pub log_file: Option<PathBuf>,
    /// Log every game event (requires --log-file).
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn tick_delay(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn frame_delay(&self) -> Duration {
        Duration::from_millis(self.frame_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["tcolumns"]).unwrap();
        assert_eq!(args.rows, 13);
        assert_eq!(args.columns, 6);
        assert_eq!(args.tick_delay(), Duration::from_secs(1));
        assert_eq!(args.seed, None);
        assert!(!args.verbose);
    }

    #[test]
    fn test_overrides() {
        let args = Args::try_parse_from([
            "tcolumns", "--rows", "20", "--columns", "8", "-s", "42", "--tick-ms", "250", "-v",
        ])
        .unwrap();
        assert_eq!(args.rows, 20);
        assert_eq!(args.columns, 8);
        assert_eq!(args.seed, Some(42));
        assert_eq!(args.tick_delay(), Duration::from_millis(250));
        assert!(args.verbose);
    }

    #[test]
    fn test_zero_columns_rejected() {
        assert!(Args::try_parse_from(["tcolumns", "--columns", "0"]).is_err());
    }
}
