//! Bubble Buster entry point
//!
//! On the web this exports a handle the JS renderer drives. Natively it runs
//! a headless autoplay session.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use wasm_bindgen::prelude::*;

    use bubble_buster::Game;
    use bubble_buster::platform::{Clock, LocalStorage, MemoryStorage, Storage, SystemClock};
    use bubble_buster::sim::ClickOutcome;

    /// Storage that falls back to memory when LocalStorage is blocked
    enum WebStorage {
        Local(LocalStorage),
        Memory(MemoryStorage),
    }

    impl Storage for WebStorage {
        fn get_item(&self, key: &str) -> Result<Option<String>, bubble_buster::error::StorageError> {
            match self {
                WebStorage::Local(s) => s.get_item(key),
                WebStorage::Memory(s) => s.get_item(key),
            }
        }

        fn set_item(&mut self, key: &str, value: &str) -> Result<(), bubble_buster::error::StorageError> {
            match self {
                WebStorage::Local(s) => s.set_item(key, value),
                WebStorage::Memory(s) => s.set_item(key, value),
            }
        }

        fn remove_item(&mut self, key: &str) -> Result<(), bubble_buster::error::StorageError> {
            match self {
                WebStorage::Local(s) => s.remove_item(key),
                WebStorage::Memory(s) => s.remove_item(key),
            }
        }
    }

    /// Handle owned by the JS renderer. Every method returns after the
    /// operation has fully completed; call `snapshot` to re-render.
    #[wasm_bindgen]
    pub struct BubbleBuster {
        game: Game<SystemClock, WebStorage>,
    }

    #[wasm_bindgen]
    impl BubbleBuster {
        #[wasm_bindgen(constructor)]
        pub fn new() -> BubbleBuster {
            let storage = match LocalStorage::open() {
                Ok(s) => WebStorage::Local(s),
                Err(e) => {
                    log::warn!("{e}, progress will not persist");
                    WebStorage::Memory(MemoryStorage::new())
                }
            };
            let seed = SystemClock.now() as u64;
            let game = Game::restore(SystemClock, storage, seed);
            log::info!("Game initialized ({:?}) with seed: {}", game.phase(), seed);
            BubbleBuster { game }
        }

        pub fn reset(&mut self) {
            self.game.reset();
        }

        #[wasm_bindgen(js_name = addBubbleLine)]
        pub fn add_bubble_line(&mut self) {
            self.game.add_bubble_line();
        }

        /// Returns the number of bubbles removed
        #[wasm_bindgen(js_name = clickBubble)]
        pub fn click_bubble(&mut self, key: &str) -> u32 {
            match self.game.click_bubble_str(key) {
                ClickOutcome::Removed { count } => count as u32,
                ClickOutcome::TooSmall(_) | ClickOutcome::Ignored => 0,
            }
        }

        #[wasm_bindgen(js_name = applyGravity)]
        pub fn apply_gravity(&mut self) {
            self.game.apply_gravity();
        }

        #[wasm_bindgen(js_name = togglePause)]
        pub fn toggle_pause(&mut self) {
            self.game.toggle_pause();
        }

        /// Poll from requestAnimationFrame; true when a row spawn was attempted
        pub fn frame(&mut self) -> bool {
            self.game.frame()
        }

        /// Save explicitly (e.g. on page hide)
        pub fn save(&mut self) {
            if let Err(e) = self.game.save() {
                log::warn!("Save failed: {e}");
            }
        }

        /// Current state as JSON for the renderer
        pub fn snapshot(&self) -> String {
            serde_json::to_string(&self.game.snapshot()).unwrap_or_default()
        }

        #[wasm_bindgen(js_name = highScores)]
        pub fn high_scores(&self) -> String {
            serde_json::to_string(&self.game.high_scores()).unwrap_or_default()
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");
        log::info!("Bubble Buster starting...");
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Bubble Buster (native) starting...");
    log::info!("The browser build is the playable one - running a headless autoplay session");

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(12345);
    let preset = args
        .next()
        .and_then(|s| bubble_buster::TuningPreset::from_str(&s))
        .unwrap_or_default();

    autoplay(seed, preset);
}

/// Greedy bot: each tick, click the biggest removable group, then wait for the next row
#[cfg(not(target_arch = "wasm32"))]
fn autoplay(seed: u64, preset: bubble_buster::TuningPreset) {
    use bubble_buster::Game;
    use bubble_buster::platform::{ManualClock, MemoryStorage};
    use bubble_buster::sim::{ClickOutcome, GamePhase, GameState, board::removable_groups};
    use bubble_buster::tuning::Tuning;

    /// Stop even if the bot never loses
    const MAX_TICKS: u32 = 2_000;

    let clock = ManualClock::new(0.0);
    let state = GameState::with_tuning(seed, Tuning::from_preset(preset));
    let mut game = Game::new(state, &clock, MemoryStorage::new());

    println!("Seed {seed}, preset {}", preset.as_str());

    for session in 1..=3 {
        game.reset();
        let mut ticks = 0;
        while game.phase() == GamePhase::Running && ticks < MAX_TICKS {
            let min_group = game.state().tuning().min_group_size;
            let target = removable_groups(game.state().bubbles(), min_group)
                .first()
                .map(|&(i, _)| game.state().bubbles()[i].key);
            if let Some(key) = target {
                if let ClickOutcome::Removed { count } = game.click_bubble(key) {
                    log::debug!("Bot removed {count}");
                }
            }

            clock.set(game.state().pacing().next_tick_time);
            game.frame();
            ticks += 1;
        }
        println!(
            "Session {session}: score {} after {ticks} ticks ({:?})",
            game.state().score(),
            game.phase()
        );
    }

    println!("\nHigh scores:");
    for row in game.high_scores().rows {
        let marker = if row.current { " <- current" } else { "" };
        println!("{:>2}. {:>6}{marker}", row.rank, row.score);
    }
}
