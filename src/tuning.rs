//! Game balance parameters
//!
//! Stored alongside the game state so a saved session keeps its pacing.

use serde::{Deserialize, Serialize};

use crate::consts::{INITIAL_ROWS, INITIAL_TICK_RATE_MS};

/// Difficulty presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TuningPreset {
    Casual,
    #[default]
    Standard,
    Frantic,
}

impl TuningPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            TuningPreset::Casual => "Casual",
            TuningPreset::Standard => "Standard",
            TuningPreset::Frantic => "Frantic",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "casual" | "easy" => Some(TuningPreset::Casual),
            "standard" | "normal" => Some(TuningPreset::Standard),
            "frantic" | "hard" => Some(TuningPreset::Frantic),
            _ => None,
        }
    }
}

/// Tunable balance values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Tick length at score 0 (ms)
    pub initial_tick_rate_ms: f64,
    /// Tick length never drops below this (ms)
    pub min_tick_rate_ms: f64,
    /// Tick length shaved off per point scored (ms)
    pub tick_rate_decay_per_point_ms: f64,
    /// Chance that a spawned bubble is a bomb (0.0 - 1.0)
    pub bomb_chance: f64,
    /// Smallest connected group a click removes
    pub min_group_size: usize,
    /// Rows spawned on reset
    pub initial_rows: u32,
    /// Archive the placeholder session when resetting from the main menu
    pub archive_unplayed_sessions: bool,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            initial_tick_rate_ms: INITIAL_TICK_RATE_MS,
            min_tick_rate_ms: 1_500.0,
            tick_rate_decay_per_point_ms: 10.0,
            bomb_chance: 0.015,
            min_group_size: 3,
            initial_rows: INITIAL_ROWS,
            archive_unplayed_sessions: false,
        }
    }
}

impl Tuning {
    /// Create tuning from a difficulty preset
    pub fn from_preset(preset: TuningPreset) -> Self {
        let base = Self::default();
        match preset {
            TuningPreset::Casual => Self {
                initial_tick_rate_ms: 7_000.0,
                min_tick_rate_ms: 2_500.0,
                tick_rate_decay_per_point_ms: 5.0,
                bomb_chance: 0.03,
                ..base
            },
            TuningPreset::Standard => base,
            TuningPreset::Frantic => Self {
                initial_tick_rate_ms: 3_500.0,
                min_tick_rate_ms: 800.0,
                tick_rate_decay_per_point_ms: 15.0,
                bomb_chance: 0.01,
                ..base
            },
        }
    }

    /// Tick length for a given score: `max(min, initial - decay * score)`
    pub fn tick_rate_for_score(&self, score: u64) -> f64 {
        let decayed = self.initial_tick_rate_ms - self.tick_rate_decay_per_point_ms * score as f64;
        decayed.max(self.min_tick_rate_ms)
    }
}
