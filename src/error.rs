//! Error types for the save/load boundary.
//!
//! The engine itself never fails: invalid clicks and lifecycle misuse are
//! no-ops. Errors only arise where untrusted data enters (a save read back
//! from storage) or where the storage backend itself refuses an operation.
//!
//! Small focused types ([`ValidationError`], [`StorageError`]) convert into the
//! aggregate [`PersistenceError`] via `From`, so persistence code can use `?`.

use std::fmt;

use crate::sim::Key;

/// A persisted state that parsed but breaks a board or pacing invariant.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Bubble outside `[0, BOARD_WIDTH) x [0, BOARD_HEIGHT)`
    OutOfBounds { key: Key, x: u8, y: u8 },
    /// Two bubbles in one cell
    CellCollision { x: u8, y: u8 },
    /// Key used by more than one bubble or session
    DuplicateKey(Key),
    /// Key not below the allocation counter, so it could be handed out again
    KeyNotAllocated { key: Key, next_key: u64 },
    /// Tick rate missing, zero, negative or not finite
    TickRate(f64),
    /// Paused delta outside `[0, tick_rate]`
    PausedDelta { delta: f64, tick_rate: f64 },
    /// `next_tick_time - prev_tick_time != tick_rate`
    PacingDrift { prev: f64, next: f64, tick_rate: f64 },
    /// A tuning field outside its sane range
    Tuning(&'static str),
    /// A counter or score too close to overflow to keep counting
    CounterOverflow { field: &'static str, value: u64 },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::OutOfBounds { key, x, y } => {
                write!(f, "bubble {key} at ({x}, {y}) is off the board")
            }
            ValidationError::CellCollision { x, y } => {
                write!(f, "more than one bubble at ({x}, {y})")
            }
            ValidationError::DuplicateKey(key) => write!(f, "key {key} used more than once"),
            ValidationError::KeyNotAllocated { key, next_key } => {
                write!(f, "key {key} not below allocation counter {next_key}")
            }
            ValidationError::TickRate(rate) => write!(f, "invalid tick rate {rate}"),
            ValidationError::PausedDelta { delta, tick_rate } => {
                write!(f, "paused delta {delta} outside [0, {tick_rate}]")
            }
            ValidationError::PacingDrift {
                prev,
                next,
                tick_rate,
            } => write!(
                f,
                "tick window {prev}..{next} does not match tick rate {tick_rate}"
            ),
            ValidationError::Tuning(field) => write!(f, "tuning value `{field}` out of range"),
            ValidationError::CounterOverflow { field, value } => {
                write!(f, "`{field}` value {value} exceeds the counter limit")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// The storage backend refused or failed an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageError {
    /// `get_item`, `set_item`, ...
    pub op: &'static str,
    pub message: String,
}

impl StorageError {
    pub fn new(op: &'static str, message: impl Into<String>) -> Self {
        Self {
            op,
            message: message.into(),
        }
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "storage {} failed: {}", self.op, self.message)
    }
}

impl std::error::Error for StorageError {}

/// Aggregate error for saving and loading game state.
#[derive(Debug)]
pub enum PersistenceError {
    Storage(StorageError),
    /// Malformed JSON or a field of the wrong type/variant
    Json(serde_json::Error),
    /// Envelope written by an incompatible build
    UnsupportedVersion { found: u32, expected: u32 },
    Invalid(ValidationError),
}

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistenceError::Storage(e) => write!(f, "{e}"),
            PersistenceError::Json(e) => write!(f, "save data malformed: {e}"),
            PersistenceError::UnsupportedVersion { found, expected } => {
                write!(f, "save version {found} unsupported (expected {expected})")
            }
            PersistenceError::Invalid(e) => write!(f, "save data invalid: {e}"),
        }
    }
}

impl std::error::Error for PersistenceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PersistenceError::Storage(e) => Some(e),
            PersistenceError::Json(e) => Some(e),
            PersistenceError::Invalid(e) => Some(e),
            PersistenceError::UnsupportedVersion { .. } => None,
        }
    }
}

impl From<StorageError> for PersistenceError {
    fn from(e: StorageError) -> Self {
        PersistenceError::Storage(e)
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(e: serde_json::Error) -> Self {
        PersistenceError::Json(e)
    }
}

impl From<ValidationError> for PersistenceError {
    fn from(e: ValidationError) -> Self {
        PersistenceError::Invalid(e)
    }
}
