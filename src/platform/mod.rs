//! Browser platform layer
//!
//! Handles everything the simulation must not know about:
//! - DOM elements for fish, clock, score and overlay
//! - Frame loop (`requestAnimationFrame`)
//! - Input events (clicks, space bar, visibility/focus)
//!
//! Only compiled for wasm32; native builds drive `sim` through
//! `sim::RecordingStage` instead.

#[cfg(target_arch = "wasm32")]
pub mod dom;
#[cfg(target_arch = "wasm32")]
pub mod game;

#[cfg(target_arch = "wasm32")]
pub use game::run;
