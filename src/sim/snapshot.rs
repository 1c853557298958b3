//! Read-only view handed to the renderer
//!
//! Unlike the persisted state this carries animation hints and tick progress.

use serde::Serialize;

use super::state::{Animation, BubbleKind, Color, GamePhase, GameRecord, GameState, Pacing};
use super::tick::tick_progress;
use crate::Millis;
use crate::consts::{BOARD_HEIGHT, BOARD_WIDTH};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BubbleSnapshot {
    /// Opaque key string, passed back on click
    pub key: String,
    pub kind: BubbleKind,
    pub x: u8,
    pub y: u8,
    pub color: Color,
    pub animation: Animation,
}

/// Session record with its key in the same string form as bubble keys
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordSnapshot {
    pub key: String,
    pub score: u64,
    pub started_at: Millis,
}

impl From<&GameRecord> for RecordSnapshot {
    fn from(record: &GameRecord) -> Self {
        Self {
            key: record.key.to_string(),
            score: record.score,
            started_at: record.started_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameSnapshot {
    pub board_width: u8,
    pub board_height: u8,
    pub phase: GamePhase,
    pub current_game: RecordSnapshot,
    pub old_games: Vec<RecordSnapshot>,
    pub bubbles: Vec<BubbleSnapshot>,
    pub pacing: Pacing,
    /// Fraction of the current tick elapsed (running/paused only)
    pub tick_progress: Option<f32>,
}

impl GameSnapshot {
    pub fn capture(state: &GameState, now: Millis) -> Self {
        Self {
            board_width: BOARD_WIDTH,
            board_height: BOARD_HEIGHT,
            phase: state.phase,
            current_game: RecordSnapshot::from(&state.current_game),
            old_games: state.old_games.iter().map(RecordSnapshot::from).collect(),
            bubbles: state
                .bubbles
                .iter()
                .map(|b| BubbleSnapshot {
                    key: b.key.to_string(),
                    kind: b.kind,
                    x: b.pos.x,
                    y: b.pos.y,
                    color: b.color,
                    animation: b.animation,
                })
                .collect(),
            pacing: state.pacing,
            tick_progress: tick_progress(state, now),
        }
    }

    pub fn playable(&self) -> bool {
        self.phase == GamePhase::Running
    }
}
