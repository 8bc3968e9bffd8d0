//! Session orchestration
//!
//! Starting the game, advancing virtual time, spawning, catching, pausing and
//! ending. Every visible effect is pushed through the [`Stage`].

use rand::Rng;

use super::countdown::{Countdown, CountdownEvent};
use super::error::GameError;
use super::fish::{Fish, FishId, MotionPlan, Tier};
use super::scheduler::Task;
use super::stage::{OverlayContent, Stage};
use super::state::{GameMode, GamePhase, GameState};
use crate::consts::*;

impl GameState {
    /// Start the session: hide the overlay, start the countdown (timed mode)
    /// and the spawner. Only valid once, from `Ready`.
    pub fn run(&mut self, stage: &mut impl Stage) {
        if self.phase != GamePhase::Ready {
            log::warn!("run() ignored in phase {:?}", self.phase);
            return;
        }

        stage.hide_overlay();

        if self.mode == GameMode::Timed {
            let mut countdown =
                Countdown::new(self.config.timer.minutes, self.config.timer.seconds);
            countdown.run(&mut self.scheduler);
            self.countdown = Some(countdown);
        }

        self.spawner = Some(
            self.scheduler
                .set_interval(self.config.fishes.spawn_interval_ms, Task::Spawn),
        );
        self.phase = GamePhase::Running;

        log::info!(
            "Game started ({:?} mode, up to {} fish)",
            self.mode,
            self.config.fishes.max_count
        );
    }

    /// Advance virtual time by `elapsed_ms`, firing every interval that
    /// falls due, in time order
    pub fn advance(&mut self, elapsed_ms: f64, stage: &mut impl Stage) {
        let until = self.scheduler.now_ms() + elapsed_ms.max(0.0);
        while let Some((id, task)) = self.scheduler.pop_due(until) {
            match task {
                Task::Countdown => self.on_countdown_tick(stage),
                Task::Spawn => {
                    self.generate_fish(None, stage);
                }
                Task::Motion(fish_id) => match self.fishes.get_mut(&fish_id) {
                    Some(fish) => {
                        if let Some(step) = fish.step() {
                            stage.offset_sprite(&fish_id, step.offset, step.facing);
                        }
                    }
                    None => {
                        // Orphaned interval; removal normally clears it first
                        self.scheduler.clear_interval(id);
                    }
                },
            }
        }
        self.scheduler.settle(until);
    }

    fn on_countdown_tick(&mut self, stage: &mut impl Stage) {
        let Some(countdown) = self.countdown.as_mut() else {
            return;
        };
        match countdown.tick(&mut self.scheduler) {
            CountdownEvent::Updated(clock) => stage.show_clock(&clock.to_string()),
            CountdownEvent::Ended => self.game_over(stage),
        }
    }

    /// Spawn a fish.
    ///
    /// Without an id this is a spawner attempt: at the cap it cancels the
    /// spawner and returns `None`. With an id (a replacement after a catch)
    /// the cap is not checked. Returns the id of the new fish.
    pub fn generate_fish(&mut self, id: Option<FishId>, stage: &mut impl Stage) -> Option<FishId> {
        if id.is_none() && self.fishes.len() >= self.config.fishes.max_count {
            if let Some(spawner) = self.spawner.take() {
                self.scheduler.clear_interval(spawner);
                log::debug!("Fish cap {} reached, spawner stopped", self.config.fishes.max_count);
            }
            return None;
        }

        let tier = Tier::random(&mut self.rng);
        let size_class = self.config.fishes.sizes.get(tier).clone();
        let reward = *self.config.fishes.rewards.get(tier);
        let id = id.unwrap_or_else(|| self.next_fish_id());
        let variant = self.rng.random_range(1..=FISH_VARIANTS);

        let mut fish = Fish::new(id.clone(), tier, &size_class, reward, variant);
        let width = stage.spawn_sprite(&id, fish.classes());

        let viewport = stage.viewport();
        let bounds = self.config.bounds(viewport);
        let plan = MotionPlan::random(
            &mut self.rng,
            viewport,
            width,
            bounds,
            self.config.fishes.min_vel,
            self.config.fishes.max_vel,
        );
        stage.place_sprite(&id, plan.start, plan.duration_ms);
        fish.set_motion(plan);

        // First leg starts immediately, then one leg per period
        if let Some(step) = fish.step() {
            stage.offset_sprite(&id, step.offset, step.facing);
        }
        fish.interval = Some(
            self.scheduler
                .set_interval(plan.duration_ms, Task::Motion(id.clone())),
        );

        log::debug!("Spawned {} ({:?}, {:.0} ms legs)", id, tier, plan.duration_ms);
        self.fishes.insert(id.clone(), fish);
        Some(id)
    }

    /// Remove a live fish: cancel its motion and detach its sprite
    pub fn remove_fish(&mut self, id: &FishId, stage: &mut impl Stage) -> Option<Fish> {
        let fish = self.fishes.remove(id)?;
        if let Some(interval) = fish.interval {
            self.scheduler.clear_interval(interval);
        }
        stage.remove_sprite(id);
        Some(fish)
    }

    /// Player clicked a fish. Scores it, then spawns a replacement under the
    /// same id. Returns the points added.
    pub fn catch_fish(&mut self, id: &FishId, stage: &mut impl Stage) -> Result<u32, GameError> {
        if self.phase != GamePhase::Running {
            // The click listener is spent; keep the fish catchable
            if self.fishes.contains_key(id) {
                stage.arm_sprite(id);
            }
            return Err(GameError::NotRunning(self.phase));
        }
        let fish = self
            .fishes
            .get(id)
            .ok_or_else(|| GameError::UnknownFish(id.clone()))?;
        let tier = self
            .config
            .fishes
            .sizes
            .tier_of(fish.size_class())
            .ok_or_else(|| GameError::UnknownSizeClass(fish.size_class().to_string()))?;
        let points = tier.points();

        self.remove_fish(id, stage);
        self.score += points;
        self.caught += 1;
        stage.show_score(&format!("Score: {}", self.score));

        log::debug!("Caught {} ({:?}) for {}, score {}", id, tier, points, self.score);
        self.generate_fish(Some(id.clone()), stage);
        Ok(points)
    }

    /// Stop the countdown and show the pause overlay
    pub fn pause(&mut self, stage: &mut impl Stage) {
        if self.phase != GamePhase::Running {
            return;
        }
        if let Some(countdown) = self.countdown.as_mut() {
            countdown.pause(&mut self.scheduler);
        }
        stage.show_overlay(OverlayContent::Unchanged);
        self.phase = GamePhase::Paused;
        log::info!("Paused");
    }

    /// Restart the countdown and hide the overlay
    pub fn resume(&mut self, stage: &mut impl Stage) {
        if self.phase != GamePhase::Paused {
            return;
        }
        if let Some(countdown) = self.countdown.as_mut() {
            countdown.run(&mut self.scheduler);
        }
        stage.hide_overlay();
        self.phase = GamePhase::Running;
        log::info!("Resumed");
    }

    /// Space bar: whichever of pause/resume applies
    pub fn toggle_pause(&mut self, stage: &mut impl Stage) {
        match self.phase {
            GamePhase::Running => self.pause(stage),
            GamePhase::Paused => self.resume(stage),
            _ => {}
        }
    }

    /// Countdown expired. Fish keep swimming behind the overlay.
    fn game_over(&mut self, stage: &mut impl Stage) {
        if self.phase == GamePhase::GameOver {
            return;
        }
        if let Some(spawner) = self.spawner.take() {
            self.scheduler.clear_interval(spawner);
        }
        if let Some(countdown) = self.countdown.as_mut() {
            countdown.pause(&mut self.scheduler);
        }
        self.phase = GamePhase::GameOver;

        stage.show_overlay(OverlayContent::GameOver {
            message: format!("Game over! Score: {}", self.score),
            restart_href: self.config.ui.restart_href.clone(),
        });
        log::info!("Game over: score {} ({} fish caught)", self.score, self.caught);
    }
}
