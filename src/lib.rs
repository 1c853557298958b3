//! Bubble Buster - A falling-rows bubble puzzle
//!
//! Core modules:
//! - `sim`: Deterministic game engine (board, gravity, pacing, lifecycle)
//! - `game`: Driver that binds the engine to a clock and storage
//! - `platform`: Browser/native platform abstraction
//! - `persistence`: Save/load with validation
//! - `tuning`: Data-driven game balance

pub mod error;
pub mod game;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod sim;
pub mod tuning;

pub use game::Game;
pub use highscores::{HighScores, LeaderboardRow};
pub use tuning::{Tuning, TuningPreset};

/// Game configuration constants
pub mod consts {
    /// Board columns (one bubble per column per spawned row)
    pub const BOARD_WIDTH: u8 = 14;
    /// Board rows. Row 0 is the spawn row, `BOARD_HEIGHT - 1` is the game-over line
    pub const BOARD_HEIGHT: u8 = 10;

    /// Rows spawned when a new session starts
    pub const INITIAL_ROWS: u32 = 4;
    /// Milliseconds between forced row spawns at score 0
    pub const INITIAL_TICK_RATE_MS: f64 = 5_200.0;
}

/// Wall-clock time in milliseconds since the Unix epoch
pub type Millis = f64;
