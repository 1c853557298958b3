//! Save/load persistence with validation
//!
//! Features:
//! - Versioned JSON envelope
//! - Range and invariant checks on load
//! - Corruption detection and recovery (bad saves are discarded)

pub mod envelope;
pub mod validation;

use crate::error::PersistenceError;
use crate::platform::Storage;
use crate::sim::GameState;

pub use envelope::SAVE_VERSION;
pub use validation::validate;

/// Storage namespace for the saved game
pub const STORAGE_KEY: &str = "bubble_buster_v0";

/// Write `state` to storage
pub fn save(storage: &mut impl Storage, state: &GameState) -> Result<(), PersistenceError> {
    let json = envelope::encode(state)?;
    storage.set_item(STORAGE_KEY, &json)?;
    log::debug!("Game saved ({} bytes)", json.len());
    Ok(())
}

/// Parse and validate a saved game from JSON
pub fn from_json(json: &str) -> Result<GameState, PersistenceError> {
    let state = envelope::decode(json)?;
    validate(&state)?;
    Ok(state)
}

/// Load the saved game, `Ok(None)` if nothing was saved
pub fn load(storage: &impl Storage) -> Result<Option<GameState>, PersistenceError> {
    match storage.get_item(STORAGE_KEY)? {
        Some(json) => from_json(&json).map(Some),
        None => Ok(None),
    }
}

/// Load the saved game or start fresh. Corrupt saves are removed.
pub fn load_or_new(storage: &mut impl Storage, seed: u64) -> GameState {
    match load(storage) {
        Ok(Some(state)) => {
            log::info!(
                "Loaded saved game ({:?}, score {})",
                state.phase(),
                state.score()
            );
            state
        }
        Ok(None) => {
            log::info!("No saved game found, starting fresh");
            GameState::new(seed)
        }
        Err(e) => {
            log::warn!("Discarding saved game: {e}");
            if let Err(e) = clear(storage) {
                log::warn!("Could not clear saved game: {e}");
            }
            GameState::new(seed)
        }
    }
}

/// Remove the saved game
pub fn clear(storage: &mut impl Storage) -> Result<(), PersistenceError> {
    storage.remove_item(STORAGE_KEY)?;
    log::info!("Saved game cleared");
    Ok(())
}
