//! Deterministic game engine
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time comes in as an argument, never read from a clock
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod board;
pub mod gravity;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use gravity::GravityReport;
pub use snapshot::{BubbleSnapshot, GameSnapshot, RecordSnapshot};
pub use state::{
    Animation, Bubble, BubbleKind, Color, GamePhase, GameRecord, GameState, Key, Pacing, Position,
    RngState,
};
pub use tick::{
    ClickOutcome, SpawnOutcome, add_bubble_line, apply_gravity, click_bubble, reset, tick,
    tick_progress, toggle_pause,
};
