//! Game state and core engine types
//!
//! All state that must be persisted for Continue/determinism lives here.

use std::fmt;

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::Millis;
use crate::consts::*;
use crate::tuning::Tuning;

/// Lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GamePhase {
    /// No session started yet
    MainMenu,
    /// Rows spawn on every tick
    Running,
    /// Game is paused, tick progress frozen
    Paused,
    /// A spawn overflowed the board
    GameOver,
}

/// Bubble colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Yellow,
    Blue,
    Green,
}

impl Color {
    /// The full palette, in spawn-index order
    pub const ALL: [Color; 4] = [Color::Red, Color::Yellow, Color::Blue, Color::Green];
}

/// Bubble variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BubbleKind {
    /// Removed in connected groups
    #[default]
    Normal,
    /// Clears every normal bubble of its color
    Bomb,
}

/// Why a bubble last moved. Renderer-only, never read by game logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Animation {
    #[default]
    Spawning,
    PushedUp,
    Fall,
}

/// Stable identity for bubbles and sessions. Never reused within a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Key(pub(crate) u64);

impl Key {
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08x}", self.0)
    }
}

impl std::str::FromStr for Key {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        u64::from_str_radix(s, 16).map(Key)
    }
}

/// A grid cell. `x` is the column, `y` grows away from the spawn row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: u8,
    pub y: u8,
}

impl Position {
    /// Checked constructor, `None` if the cell is off the board
    pub fn new(x: u8, y: u8) -> Option<Self> {
        Self::in_bounds(x, y).then_some(Self { x, y })
    }

    /// Whether `(x, y)` lies on the board
    #[inline]
    pub fn in_bounds(x: u8, y: u8) -> bool {
        x < BOARD_WIDTH && y < BOARD_HEIGHT
    }

    /// Orthogonal neighbors that are on the board
    pub fn neighbors(self) -> impl Iterator<Item = Position> {
        let Position { x, y } = self;
        [
            x.checked_sub(1).map(|x| (x, y)),
            x.checked_add(1).map(|x| (x, y)),
            y.checked_sub(1).map(|y| (x, y)),
            y.checked_add(1).map(|y| (x, y)),
        ]
        .into_iter()
        .flatten()
        .filter_map(|(x, y)| Position::new(x, y))
    }
}

/// A token on the board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bubble {
    pub key: Key,
    #[serde(default)]
    pub kind: BubbleKind,
    pub pos: Position,
    pub color: Color,
    /// Renderer hint, not persisted
    #[serde(skip)]
    pub animation: Animation,
}

/// One session's record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub key: Key,
    pub score: u64,
    /// Unix timestamp (ms) when the session began
    pub started_at: Millis,
}

/// Timing for forced row spawns
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pacing {
    pub prev_tick_time: Millis,
    pub next_tick_time: Millis,
    /// Milliseconds between forced row spawns
    pub tick_rate: f64,
    /// Elapsed time into the current tick when paused
    #[serde(default)]
    pub paused_tick_delta: f64,
}

impl Pacing {
    /// Pacing whose current tick starts at `now`
    pub fn starting_at(now: Millis, tick_rate: f64) -> Self {
        Self {
            prev_tick_time: now,
            next_tick_time: now + tick_rate,
            tick_rate,
            paused_tick_delta: 0.0,
        }
    }
}

/// RNG state wrapper for serialization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub stream: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed, stream: 0 }
    }

    /// Generator for the next draw sequence; advances the stream
    pub fn next_rng(&mut self) -> Pcg32 {
        let mixed = self
            .seed
            .wrapping_add(self.stream.wrapping_mul(0x9E37_79B9_7F4A_7C15));
        self.stream = self.stream.wrapping_add(1);
        Pcg32::seed_from_u64(mixed)
    }
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed and draw position
    pub(crate) rng_state: RngState,
    pub(crate) phase: GamePhase,
    pub(crate) current_game: GameRecord,
    /// Archived sessions, most recent first
    pub(crate) old_games: Vec<GameRecord>,
    pub(crate) bubbles: Vec<Bubble>,
    pub(crate) pacing: Pacing,
    #[serde(default)]
    pub(crate) tuning: Tuning,
    /// Next key to hand out
    pub(crate) next_key: u64,
}

impl GameState {
    /// Create a main-menu state with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    /// Create a main-menu state with the given tuning
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let tick_rate = tuning.initial_tick_rate_ms;
        let mut state = Self {
            rng_state: RngState::new(seed),
            phase: GamePhase::MainMenu,
            current_game: GameRecord {
                key: Key(0),
                score: 0,
                started_at: 0.0,
            },
            old_games: Vec::new(),
            bubbles: Vec::new(),
            pacing: Pacing::starting_at(0.0, tick_rate),
            tuning,
            next_key: 0,
        };
        state.current_game.key = state.next_key();
        state
    }

    /// Allocate a new key
    pub(crate) fn next_key(&mut self) -> Key {
        let key = Key(self.next_key);
        self.next_key = self.next_key.saturating_add(1);
        key
    }

    /// Run seed for reproducibility
    pub fn seed(&self) -> u64 {
        self.rng_state.seed
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn current_game(&self) -> &GameRecord {
        &self.current_game
    }

    pub fn score(&self) -> u64 {
        self.current_game.score
    }

    /// Archived sessions, most recent first
    pub fn old_games(&self) -> &[GameRecord] {
        &self.old_games
    }

    pub fn bubbles(&self) -> &[Bubble] {
        &self.bubbles
    }

    pub fn bubble(&self, key: Key) -> Option<&Bubble> {
        self.bubbles.iter().find(|b| b.key == key)
    }

    pub fn bubble_at(&self, pos: Position) -> Option<&Bubble> {
        self.bubbles.iter().find(|b| b.pos == pos)
    }

    pub fn pacing(&self) -> &Pacing {
        &self.pacing
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Drop all but the `keep` most recent archived sessions
    pub fn truncate_history(&mut self, keep: usize) {
        self.old_games.truncate(keep);
    }

    /// Running state holding exactly the given bubbles (for tests)
    #[cfg(test)]
    pub(crate) fn running_with(cells: &[(u8, u8, Color, BubbleKind)]) -> Self {
        let mut state = Self::new(7);
        state.phase = GamePhase::Running;
        for &(x, y, color, kind) in cells {
            let pos = Position::new(x, y).expect("test cell out of bounds");
            assert!(state.bubble_at(pos).is_none(), "test cell occupied twice");
            let key = state.next_key();
            state.bubbles.push(Bubble {
                key,
                kind,
                pos,
                color,
                animation: Animation::Spawning,
            });
        }
        state
    }

    /// Key of the bubble at `(x, y)` (for tests)
    #[cfg(test)]
    pub(crate) fn key_at(&self, x: u8, y: u8) -> Key {
        let pos = Position::new(x, y).expect("test cell out of bounds");
        self.bubble_at(pos).expect("no bubble at test cell").key
    }
}
