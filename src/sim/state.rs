//! Game state and core session types

use std::collections::HashMap;

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::countdown::Countdown;
use super::fish::{Fish, FishId};
use super::scheduler::{IntervalId, Scheduler};
use crate::config::GameConfig;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Constructed, `run` not called yet
    Ready,
    /// Countdown (if any) ticking, fish catchable
    Running,
    /// Countdown stopped, overlay shown
    Paused,
    /// Countdown expired
    GameOver,
}

/// Session flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameMode {
    /// Regular game against the countdown
    #[default]
    Timed,
    /// Fish only, no countdown (`#test` in the URL)
    Practice,
}

impl GameMode {
    /// Mode selected by a URL fragment
    pub fn from_hash(hash: &str) -> Self {
        if hash == "#test" {
            GameMode::Practice
        } else {
            GameMode::Timed
        }
    }
}

/// Complete session state
#[derive(Debug)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub config: GameConfig,
    pub mode: GameMode,
    pub phase: GamePhase,
    /// Absent in practice mode and before `run`
    pub countdown: Option<Countdown>,
    /// Live, clickable fish
    pub fishes: HashMap<FishId, Fish>,
    /// Running total, never decreases
    pub score: u32,
    /// Fish caught this session
    pub caught: u32,
    pub scheduler: Scheduler,
    /// Spawner interval, cleared once the fish cap is reached
    pub spawner: Option<IntervalId>,
    pub rng: Pcg32,
}

impl GameState {
    /// Create a session with the given seed
    pub fn new(config: GameConfig, mode: GameMode, seed: u64) -> Self {
        Self {
            seed,
            config,
            mode,
            phase: GamePhase::Ready,
            countdown: None,
            fishes: HashMap::new(),
            score: 0,
            caught: 0,
            scheduler: Scheduler::new(),
            spawner: None,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn is_paused(&self) -> bool {
        self.phase == GamePhase::Paused
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn live_count(&self) -> usize {
        self.fishes.len()
    }

    /// Id for a new fish: `fish{live count}`, or the next free index
    pub fn next_fish_id(&self) -> FishId {
        (self.fishes.len()..)
            .map(FishId::from_index)
            .find(|id| !self.fishes.contains_key(id))
            .unwrap_or_else(|| FishId::from_index(self.fishes.len()))
    }
}
