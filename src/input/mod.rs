pub mod handler;

pub use handler::{handle_input, map_key, Action};
