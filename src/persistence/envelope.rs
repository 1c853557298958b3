//! Versioned save envelope

use serde::{Deserialize, Serialize};

use crate::error::PersistenceError;
use crate::sim::GameState;

/// Current save format version
pub const SAVE_VERSION: u32 = 1;

#[derive(Debug, Serialize)]
struct EnvelopeRef<'a> {
    version: u32,
    state: &'a GameState,
}

#[derive(Debug, Deserialize)]
struct Envelope {
    version: u32,
    state: serde_json::Value,
}

/// Wrap `state` in a versioned JSON envelope
pub fn encode(state: &GameState) -> Result<String, PersistenceError> {
    Ok(serde_json::to_string(&EnvelopeRef {
        version: SAVE_VERSION,
        state,
    })?)
}

/// Unwrap an envelope, checking the version before parsing the state
pub fn decode(json: &str) -> Result<GameState, PersistenceError> {
    let envelope: Envelope = serde_json::from_str(json)?;
    if envelope.version != SAVE_VERSION {
        return Err(PersistenceError::UnsupportedVersion {
            found: envelope.version,
            expected: SAVE_VERSION,
        });
    }
    Ok(serde_json::from_value(envelope.state)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_mismatch_rejected() {
        let json = r#"{"version": 99, "state": {}}"#;
        match decode(json) {
            Err(PersistenceError::UnsupportedVersion { found, expected }) => {
                assert_eq!(found, 99);
                assert_eq!(expected, SAVE_VERSION);
            }
            other => panic!("expected version error, got {other:?}"),
        }
    }

    #[test]
    fn test_garbage_is_json_error() {
        assert!(matches!(decode("not json"), Err(PersistenceError::Json(_))));
        assert!(matches!(
            decode(r#"{"version": 1, "state": {"seed": "x"}}"#),
            Err(PersistenceError::Json(_))
        ));
    }

    #[test]
    fn test_envelope_carries_version() {
        let json = encode(&GameState::new(1)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["version"], SAVE_VERSION);
        assert_eq!(value["state"]["phase"], "main-menu");
    }
}
