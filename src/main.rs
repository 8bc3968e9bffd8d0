//! Catch the Fish entry point
//!
//! In the browser this hands over to the platform layer. Natively it plays a
//! headless session against the in-memory stage, which is handy for checking
//! the game logic without a page.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    if let Err(e) = catch_the_fish::platform::run() {
        log::error!("Failed to start: {:?}", e);
        web_sys::console::error_1(&e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Catch the Fish (native) starting...");
    log::info!("Native mode is headless - run with `trunk serve` for the web version");

    let score = headless_session(42);
    println!("Headless session finished with score {}", score);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Autoplay one timed session: click the lowest-numbered fish every 700 ms
#[cfg(not(target_arch = "wasm32"))]
fn headless_session(seed: u64) -> u32 {
    use catch_the_fish::sim::{GameMode, GameState, RecordingStage, Viewport};
    use catch_the_fish::GameConfig;

    const FRAME_MS: f64 = 100.0;
    const CLICK_EVERY: u32 = 7;

    let mut state = GameState::new(GameConfig::load(), GameMode::Timed, seed);
    let mut stage = RecordingStage::new(Viewport::default());
    state.run(&mut stage);

    let mut frame = 0u32;
    while !state.is_over() {
        state.advance(FRAME_MS, &mut stage);
        frame += 1;

        if frame % CLICK_EVERY == 0 {
            let target = state.fishes.keys().min().cloned();
            if let Some(id) = target {
                if let Err(e) = state.catch_fish(&id, &mut stage) {
                    log::warn!("Click on {} rejected: {}", id, e);
                }
            }
        }
    }

    log::info!(
        "{} fish caught in {:.0} s, {} stage ops",
        state.caught,
        state.scheduler.now_ms() / 1000.0,
        stage.ops.len()
    );
    state.score
}
