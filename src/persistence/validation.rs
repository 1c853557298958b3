//! Load-time validation
//!
//! The only place persisted values are checked. Serde already rejects wrong
//! types and unknown enum variants; this pass covers ranges and cross-field
//! invariants the type system cannot express.

use std::collections::HashSet;

use crate::consts::BOARD_HEIGHT;
use crate::error::ValidationError;
use crate::sim::{GameState, Position};

/// Allowed slack between the tick window and the tick rate (ms)
const PACING_TOLERANCE_MS: f64 = 1.0;

/// Ceiling for loaded counters and scores: the largest integer a JS number holds exactly
pub const COUNTER_LIMIT: u64 = 1 << 53;

pub fn validate(state: &GameState) -> Result<(), ValidationError> {
    validate_tuning(state)?;
    validate_counters(state)?;
    validate_board(state)?;
    validate_keys(state)?;
    validate_pacing(state)
}

fn validate_counters(state: &GameState) -> Result<(), ValidationError> {
    let counters = [
        ("next_key", state.next_key),
        ("rng_state.stream", state.rng_state.stream),
        ("current_game.score", state.current_game().score),
    ];
    let archived = state
        .old_games()
        .iter()
        .map(|g| ("old_games.score", g.score));
    for (field, value) in counters.into_iter().chain(archived) {
        if value > COUNTER_LIMIT {
            return Err(ValidationError::CounterOverflow { field, value });
        }
    }
    Ok(())
}

fn validate_board(state: &GameState) -> Result<(), ValidationError> {
    let mut cells = HashSet::new();
    for bubble in state.bubbles() {
        let Position { x, y } = bubble.pos;
        if !Position::in_bounds(x, y) {
            return Err(ValidationError::OutOfBounds {
                key: bubble.key,
                x,
                y,
            });
        }
        if !cells.insert((x, y)) {
            return Err(ValidationError::CellCollision { x, y });
        }
    }
    Ok(())
}

fn validate_keys(state: &GameState) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    let keys = state
        .bubbles()
        .iter()
        .map(|b| b.key)
        .chain(state.old_games().iter().map(|g| g.key))
        .chain(std::iter::once(state.current_game().key));
    for key in keys {
        if key.as_u64() >= state.next_key {
            return Err(ValidationError::KeyNotAllocated {
                key,
                next_key: state.next_key,
            });
        }
        if !seen.insert(key) {
            return Err(ValidationError::DuplicateKey(key));
        }
    }
    Ok(())
}

fn validate_pacing(state: &GameState) -> Result<(), ValidationError> {
    let pacing = state.pacing();
    if !(pacing.tick_rate.is_finite() && pacing.tick_rate > 0.0) {
        return Err(ValidationError::TickRate(pacing.tick_rate));
    }
    if !(0.0..=pacing.tick_rate).contains(&pacing.paused_tick_delta) {
        return Err(ValidationError::PausedDelta {
            delta: pacing.paused_tick_delta,
            tick_rate: pacing.tick_rate,
        });
    }
    let window = pacing.next_tick_time - pacing.prev_tick_time;
    if !((window - pacing.tick_rate).abs() <= PACING_TOLERANCE_MS) {
        return Err(ValidationError::PacingDrift {
            prev: pacing.prev_tick_time,
            next: pacing.next_tick_time,
            tick_rate: pacing.tick_rate,
        });
    }
    Ok(())
}

fn validate_tuning(state: &GameState) -> Result<(), ValidationError> {
    let tuning = state.tuning();
    let positive = |v: f64| v.is_finite() && v > 0.0;
    if !(0.0..=1.0).contains(&tuning.bomb_chance) {
        return Err(ValidationError::Tuning("bomb_chance"));
    }
    if !positive(tuning.initial_tick_rate_ms) {
        return Err(ValidationError::Tuning("initial_tick_rate_ms"));
    }
    if !positive(tuning.min_tick_rate_ms) {
        return Err(ValidationError::Tuning("min_tick_rate_ms"));
    }
    if !(tuning.tick_rate_decay_per_point_ms.is_finite() && tuning.tick_rate_decay_per_point_ms >= 0.0)
    {
        return Err(ValidationError::Tuning("tick_rate_decay_per_point_ms"));
    }
    if tuning.min_group_size == 0 {
        return Err(ValidationError::Tuning("min_group_size"));
    }
    if tuning.initial_rows > BOARD_HEIGHT as u32 {
        return Err(ValidationError::Tuning("initial_rows"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{BubbleKind, Color, GamePhase, Key, reset, toggle_pause};

    fn running() -> GameState {
        let mut state = GameState::new(11);
        reset(&mut state, 5_000.0);
        state
    }

    #[test]
    fn test_fresh_and_running_states_pass() {
        assert_eq!(validate(&GameState::new(1)), Ok(()));
        let mut state = running();
        assert_eq!(validate(&state), Ok(()));
        toggle_pause(&mut state, 6_000.0);
        assert_eq!(state.phase(), GamePhase::Paused);
        assert_eq!(validate(&state), Ok(()));
    }

    #[test]
    fn test_out_of_bounds_bubble() {
        let mut state = running();
        state.bubbles[0].pos.y = 200;
        assert!(matches!(validate(&state), Err(ValidationError::OutOfBounds { y: 200, .. })));
    }

    #[test]
    fn test_cell_collision() {
        let mut state = GameState::running_with(&[
            (0, 0, Color::Red, BubbleKind::Normal),
            (1, 0, Color::Red, BubbleKind::Normal),
        ]);
        state.bubbles[1].pos.x = 0;
        assert_eq!(validate(&state), Err(ValidationError::CellCollision { x: 0, y: 0 }));
    }

    #[test]
    fn test_duplicate_and_unallocated_keys() {
        let mut state = running();
        let dup = state.bubbles[0].key;
        state.bubbles[1].key = dup;
        assert_eq!(validate(&state), Err(ValidationError::DuplicateKey(dup)));

        let mut state = running();
        state.bubbles[0].key = Key(state.next_key + 5);
        assert!(matches!(validate(&state), Err(ValidationError::KeyNotAllocated { .. })));
    }

    #[test]
    fn test_bad_pacing() {
        let mut state = running();
        state.pacing.tick_rate = 0.0;
        assert_eq!(validate(&state), Err(ValidationError::TickRate(0.0)));

        let mut state = running();
        state.pacing.paused_tick_delta = -1.0;
        assert!(matches!(validate(&state), Err(ValidationError::PausedDelta { .. })));

        let mut state = running();
        state.pacing.next_tick_time += 500.0;
        assert!(matches!(validate(&state), Err(ValidationError::PacingDrift { .. })));
    }

    #[test]
    fn test_bad_tuning() {
        let mut state = running();
        state.tuning.bomb_chance = 1.5;
        assert_eq!(validate(&state), Err(ValidationError::Tuning("bomb_chance")));

        let mut state = running();
        state.tuning.min_group_size = 0;
        assert_eq!(validate(&state), Err(ValidationError::Tuning("min_group_size")));

        let mut state = running();
        state.tuning.bomb_chance = f64::NAN;
        assert_eq!(validate(&state), Err(ValidationError::Tuning("bomb_chance")));

        let mut state = running();
        state.tuning.initial_rows = u32::MAX;
        assert_eq!(validate(&state), Err(ValidationError::Tuning("initial_rows")));
    }

    #[test]
    fn test_counters_near_overflow() {
        let mut state = running();
        state.next_key = u64::MAX;
        assert_eq!(
            validate(&state),
            Err(ValidationError::CounterOverflow {
                field: "next_key",
                value: u64::MAX
            })
        );

        let mut state = running();
        state.rng_state.stream = u64::MAX - 1;
        assert!(matches!(
            validate(&state),
            Err(ValidationError::CounterOverflow { field: "rng_state.stream", .. })
        ));

        let mut state = running();
        state.current_game.score = u64::MAX;
        assert!(matches!(
            validate(&state),
            Err(ValidationError::CounterOverflow { field: "current_game.score", .. })
        ));

        let mut state = running();
        state.old_games.push(crate::sim::GameRecord {
            key: Key(0),
            score: COUNTER_LIMIT + 1,
            started_at: 0.0,
        });
        assert!(matches!(
            validate(&state),
            Err(ValidationError::CounterOverflow { field: "old_games.score", .. })
        ));

        let mut state = running();
        state.current_game.score = COUNTER_LIMIT;
        assert_eq!(validate(&state), Ok(()));
    }
}
