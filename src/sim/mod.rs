//! Deterministic game logic
//!
//! All gameplay lives here. This module must stay platform-free:
//! - Virtual time only (the scheduler advances when told to)
//! - Seeded RNG only
//! - Visible effects go through the `Stage` trait, never the DOM

pub mod countdown;
pub mod error;
pub mod fish;
pub mod scheduler;
pub mod stage;
pub mod state;
pub mod tick;

pub use countdown::{Clock, Countdown, CountdownEvent};
pub use error::GameError;
pub use fish::{Direction, Facing, Fish, FishId, MotionPlan, MotionStep, Tier, Viewport};
pub use scheduler::{IntervalId, Scheduler, Task};
pub use stage::{OverlayContent, RecordingStage, Stage, StageOp};
pub use state::{GameMode, GamePhase, GameState};
