//! Engine operations
//!
//! Every input from the outside world (row tick, bubble click, pause, reset)
//! lands here as one synchronous call that runs to completion.

use rand::Rng;

use super::board::{Grid, bomb_blast, connected_group};
use super::gravity::{self, GravityReport};
use super::state::{
    Animation, Bubble, BubbleKind, Color, GamePhase, GameRecord, GameState, Key, Pacing, Position,
};
use crate::Millis;
use crate::consts::{BOARD_HEIGHT, BOARD_WIDTH};

/// Result of a row spawn attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnOutcome {
    /// A full row entered at y = 0
    Spawned,
    /// The shift would overflow; the board is untouched and the game ended
    GameOver,
    /// Not running
    Ignored,
}

/// Result of a bubble click
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Unknown key or not running
    Ignored,
    /// Connected group smaller than the removal threshold
    TooSmall(usize),
    /// Bubbles removed and scored
    Removed { count: usize },
}

/// Push every bubble up one row and spawn a fresh row at y = 0.
///
/// Ends the game instead when any bubble already sits on the last row.
pub fn add_bubble_line(state: &mut GameState, now: Millis) -> SpawnOutcome {
    if state.phase != GamePhase::Running {
        return SpawnOutcome::Ignored;
    }

    if state.bubbles.iter().any(|b| b.pos.y + 1 >= BOARD_HEIGHT) {
        state.phase = GamePhase::GameOver;
        log::info!(
            "Game over: session {} finished with score {}",
            state.current_game.key,
            state.current_game.score
        );
        return SpawnOutcome::GameOver;
    }

    for bubble in &mut state.bubbles {
        bubble.pos.y += 1;
        bubble.animation = Animation::PushedUp;
    }

    let mut rng = state.rng_state.next_rng();
    // NaN falls back to no bombs
    let bomb_chance = state.tuning.bomb_chance.max(0.0).min(1.0);
    for x in 0..BOARD_WIDTH {
        let color = Color::ALL[rng.random_range(0..Color::ALL.len())];
        let kind = if rng.random_bool(bomb_chance) {
            BubbleKind::Bomb
        } else {
            BubbleKind::Normal
        };
        let key = state.next_key();
        state.bubbles.push(Bubble {
            key,
            kind,
            pos: Position { x, y: 0 },
            color,
            animation: Animation::Spawning,
        });
    }

    let tick_rate = state.tuning.tick_rate_for_score(state.current_game.score);
    state.pacing = Pacing::starting_at(now, tick_rate);

    log::debug!(
        "Spawned row: {} bubbles, next tick in {}ms",
        state.bubbles.len(),
        tick_rate
    );
    SpawnOutcome::Spawned
}

/// Remove the clicked bubble's group (normal) or blast its color (bomb)
pub fn click_bubble(state: &mut GameState, key: Key) -> ClickOutcome {
    if state.phase != GamePhase::Running {
        return ClickOutcome::Ignored;
    }
    let Some(clicked) = state.bubbles.iter().position(|b| b.key == key) else {
        return ClickOutcome::Ignored;
    };

    let doomed = match state.bubbles[clicked].kind {
        BubbleKind::Normal => {
            let grid = Grid::build(&state.bubbles);
            let group = connected_group(&state.bubbles, &grid, clicked);
            if group.len() < state.tuning.min_group_size {
                return ClickOutcome::TooSmall(group.len());
            }
            group
        }
        BubbleKind::Bomb => bomb_blast(&state.bubbles, clicked),
    };

    let mut remove = vec![false; state.bubbles.len()];
    for i in doomed {
        remove[i] = true;
    }
    let mut idx = 0;
    state.bubbles.retain(|_| {
        let keep = !remove[idx];
        idx += 1;
        keep
    });

    let count = remove.iter().filter(|&&r| r).count();
    state.current_game.score = state.current_game.score.saturating_add(count as u64);
    log::debug!("Click {} removed {} (score {})", key, count, state.current_game.score);

    apply_gravity(state);
    ClickOutcome::Removed { count }
}

/// Settle bubbles downward until nothing can fall
pub fn apply_gravity(state: &mut GameState) -> GravityReport {
    gravity::settle(&mut state.bubbles)
}

/// Flip between running and paused, preserving progress through the current tick
pub fn toggle_pause(state: &mut GameState, now: Millis) -> GamePhase {
    match state.phase {
        GamePhase::Running => {
            let pacing = &mut state.pacing;
            let elapsed = now - pacing.prev_tick_time;
            // Clock went backwards or overshot the tick: restart the tick on resume
            pacing.paused_tick_delta = if (0.0..=pacing.tick_rate).contains(&elapsed) {
                elapsed
            } else {
                0.0
            };
            state.phase = GamePhase::Paused;
            log::info!("Paused {}ms into tick", pacing.paused_tick_delta);
        }
        GamePhase::Paused => {
            let pacing = &mut state.pacing;
            pacing.prev_tick_time = now - pacing.paused_tick_delta;
            pacing.next_tick_time = pacing.prev_tick_time + pacing.tick_rate;
            pacing.paused_tick_delta = 0.0;
            state.phase = GamePhase::Running;
            log::info!("Resumed, next tick in {}ms", pacing.next_tick_time - now);
        }
        GamePhase::MainMenu | GamePhase::GameOver => {}
    }
    state.phase
}

/// Archive the current session and start a fresh one with seeded rows
pub fn reset(state: &mut GameState, now: Millis) {
    let played = state.phase != GamePhase::MainMenu;
    let key = state.next_key();
    let outgoing = std::mem::replace(
        &mut state.current_game,
        GameRecord {
            key,
            score: 0,
            started_at: now,
        },
    );
    if played || state.tuning.archive_unplayed_sessions {
        state.old_games.insert(0, outgoing);
    }

    state.bubbles.clear();
    state.pacing = Pacing::starting_at(now, state.tuning.initial_tick_rate_ms);
    state.phase = GamePhase::Running;
    log::info!("New session {} (history: {})", key, state.old_games.len());

    for _ in 0..state.tuning.initial_rows.min(BOARD_HEIGHT as u32) {
        add_bubble_line(state, now);
    }
}

/// Auto-tick poll: spawn a row when the current tick has elapsed.
///
/// Returns true when a spawn was attempted.
pub fn tick(state: &mut GameState, now: Millis) -> bool {
    if state.phase != GamePhase::Running || now < state.pacing.next_tick_time {
        return false;
    }
    add_bubble_line(state, now);
    true
}

/// Fraction of the current tick elapsed, for progress displays
pub fn tick_progress(state: &GameState, now: Millis) -> Option<f32> {
    let pacing = &state.pacing;
    let elapsed = match state.phase {
        GamePhase::Running => now - pacing.prev_tick_time,
        GamePhase::Paused => pacing.paused_tick_delta,
        GamePhase::MainMenu | GamePhase::GameOver => return None,
    };
    if pacing.tick_rate <= 0.0 {
        return Some(1.0);
    }
    Some((elapsed / pacing.tick_rate).clamp(0.0, 1.0) as f32)
}
