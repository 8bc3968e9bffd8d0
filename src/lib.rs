//! Catch the Fish - a browser arcade game
//!
//! Core modules:
//! - `sim`: Deterministic game logic (countdown, fish motion, spawning, scoring)
//! - `platform`: Browser DOM layer (sprites, input, frame loop), wasm32 only
//! - `config`: Data-driven game configuration

pub mod config;
pub mod platform;
pub mod sim;

pub use config::{ConfigError, GameConfig};
pub use sim::{GameError, GameMode, GamePhase, GameState};

/// Game constants
pub mod consts {
    /// Countdown tick period (ms)
    pub const COUNTDOWN_TICK_MS: f64 = 1000.0;

    /// Number of visual fish variants (`fish1` .. `fish6` CSS classes)
    pub const FISH_VARIANTS: u8 = 6;

    /// Class every fish sprite carries
    pub const FISH_CLASS: &str = "fish";

    /// Largest frame delta fed into the simulation (ms)
    pub const MAX_FRAME_MS: f64 = 1000.0;

    /// Score points per tier
    pub const SMALL_POINTS: u32 = 30;
    pub const MEDIUM_POINTS: u32 = 20;
    pub const BIG_POINTS: u32 = 10;
}

/// Zero-pad a clock component to two digits
#[inline]
pub fn align_number(n: u32) -> String {
    format!("{:02}", n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_align_number() {
        assert_eq!(align_number(0), "00");
        assert_eq!(align_number(7), "07");
        assert_eq!(align_number(10), "10");
        assert_eq!(align_number(59), "59");
    }
}
