//! Game driver
//!
//! The single context object the outside world talks to. It owns the engine
//! state, reads time from an injected clock and saves through an injected
//! storage backend. Operations mirror the engine's but take no timestamps.

use crate::Millis;
use crate::error::PersistenceError;
use crate::highscores::HighScores;
use crate::persistence;
use crate::platform::{Clock, Storage};
use crate::sim::{
    self, ClickOutcome, GamePhase, GameSnapshot, GameState, GravityReport, Key, SpawnOutcome,
};

/// Auto-tick scheduling: armed exactly while the game is running
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AutoTick {
    armed: bool,
}

/// Scheduling change produced by [`AutoTick::sync`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    Arm,
    Disarm,
    Unchanged,
}

impl AutoTick {
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Bring scheduling in line with `phase`
    pub fn sync(&mut self, phase: GamePhase) -> Schedule {
        let want = phase == GamePhase::Running;
        match (self.armed, want) {
            (false, true) => {
                self.armed = true;
                Schedule::Arm
            }
            (true, false) => {
                self.armed = false;
                Schedule::Disarm
            }
            _ => Schedule::Unchanged,
        }
    }
}

/// Game instance holding state, clock and storage
pub struct Game<C: Clock, S: Storage> {
    state: GameState,
    clock: C,
    storage: S,
    auto_tick: AutoTick,
    last_phase: GamePhase,
}

impl<C: Clock, S: Storage> Game<C, S> {
    /// Wrap an existing state
    pub fn new(state: GameState, clock: C, storage: S) -> Self {
        let mut auto_tick = AutoTick::default();
        auto_tick.sync(state.phase());
        let last_phase = state.phase();
        Self {
            state,
            clock,
            storage,
            auto_tick,
            last_phase,
        }
    }

    /// Continue the saved game, or start at the main menu with `seed`
    pub fn restore(clock: C, mut storage: S, seed: u64) -> Self {
        let state = persistence::load_or_new(&mut storage, seed);
        Self::new(state, clock, storage)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase()
    }

    pub fn now(&self) -> Millis {
        self.clock.now()
    }

    /// Whether the auto-tick should currently be polled
    pub fn is_ticking(&self) -> bool {
        self.auto_tick.is_armed()
    }

    pub fn reset(&mut self) {
        let now = self.clock.now();
        sim::reset(&mut self.state, now);
        self.after_op(true);
    }

    pub fn add_bubble_line(&mut self) -> SpawnOutcome {
        let now = self.clock.now();
        let outcome = sim::add_bubble_line(&mut self.state, now);
        self.after_op(outcome != SpawnOutcome::Ignored);
        outcome
    }

    pub fn click_bubble(&mut self, key: Key) -> ClickOutcome {
        let outcome = sim::click_bubble(&mut self.state, key);
        self.after_op(matches!(outcome, ClickOutcome::Removed { .. }));
        outcome
    }

    /// Click by the opaque key string the renderer was given
    pub fn click_bubble_str(&mut self, key: &str) -> ClickOutcome {
        match key.parse::<Key>() {
            Ok(key) => self.click_bubble(key),
            Err(_) => ClickOutcome::Ignored,
        }
    }

    pub fn apply_gravity(&mut self) -> GravityReport {
        let report = sim::apply_gravity(&mut self.state);
        self.after_op(report.moved > 0);
        report
    }

    pub fn toggle_pause(&mut self) -> GamePhase {
        let now = self.clock.now();
        let phase = sim::toggle_pause(&mut self.state, now);
        self.after_op(false);
        phase
    }

    /// Per-frame poll: spawn a row if the tick is due. Returns true on a spawn attempt.
    pub fn frame(&mut self) -> bool {
        if !self.auto_tick.is_armed() {
            return false;
        }
        let now = self.clock.now();
        let ticked = sim::tick(&mut self.state, now);
        if ticked {
            self.after_op(true);
        }
        ticked
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot::capture(&self.state, self.clock.now())
    }

    pub fn high_scores(&self) -> HighScores {
        HighScores::from_state(&self.state)
    }

    pub fn save(&mut self) -> Result<(), PersistenceError> {
        persistence::save(&mut self.storage, &self.state)
    }

    /// Reschedule, then auto-save when `changed` or the lifecycle moved
    fn after_op(&mut self, changed: bool) {
        match self.auto_tick.sync(self.state.phase()) {
            Schedule::Arm => log::debug!("Auto-tick armed"),
            Schedule::Disarm => log::debug!("Auto-tick disarmed"),
            Schedule::Unchanged => {}
        }

        let phase = self.state.phase();
        let phase_changed = phase != self.last_phase;
        self.last_phase = phase;
        if changed || phase_changed {
            if let Err(e) = self.save() {
                log::warn!("Auto-save failed: {e}");
            }
        }
    }
}
