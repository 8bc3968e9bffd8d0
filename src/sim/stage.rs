//! Rendering seam between the simulation and whatever displays it
//!
//! `sim` never touches the DOM. Every visible effect goes through [`Stage`];
//! the browser implementation lives in `platform::dom`, and
//! [`RecordingStage`] keeps an in-memory log for tests and headless runs.

use std::collections::HashMap;

use glam::Vec2;

use super::fish::{Facing, FishId, Viewport};

/// Overlay body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayContent {
    /// Keep whatever the overlay already shows (the pause menu)
    Unchanged,
    /// End of game message with a restart link
    GameOver { message: String, restart_href: String },
}

/// Side-effect sink for the simulation
pub trait Stage {
    /// Current visible area
    fn viewport(&self) -> Viewport;

    /// Create and attach a sprite, returning its rendered width (px)
    fn spawn_sprite(&mut self, id: &FishId, classes: &[String]) -> f32;

    /// Put a sprite at its start point and set its transition duration
    fn place_sprite(&mut self, id: &FishId, start: Vec2, duration_ms: f64);

    /// Move a sprite by a margin offset relative to its start point
    fn offset_sprite(&mut self, id: &FishId, offset: Vec2, facing: Facing);

    /// Make a sprite catchable again after a click was spent on it
    fn arm_sprite(&mut self, id: &FishId);

    /// Detach a sprite
    fn remove_sprite(&mut self, id: &FishId);

    /// Render the countdown text
    fn show_clock(&mut self, text: &str);

    /// Render the score line
    fn show_score(&mut self, text: &str);

    fn show_overlay(&mut self, content: OverlayContent);

    fn hide_overlay(&mut self);
}

/// One recorded stage call
#[derive(Debug, Clone, PartialEq)]
pub enum StageOp {
    Spawn { id: FishId, classes: Vec<String> },
    Place { id: FishId, start: Vec2, duration_ms: f64 },
    Offset { id: FishId, offset: Vec2, facing: Facing },
    Arm { id: FishId },
    Remove { id: FishId },
    Clock(String),
    Score(String),
    ShowOverlay(OverlayContent),
    HideOverlay,
}

/// In-memory stage
#[derive(Debug, Clone)]
pub struct RecordingStage {
    pub viewport: Viewport,
    /// Width reported for every spawned sprite
    pub sprite_width: f32,
    /// Every call, oldest first
    pub ops: Vec<StageOp>,
    /// Sprites currently attached, with their class lists
    pub sprites: HashMap<FishId, Vec<String>>,
    pub overlay_visible: bool,
}

impl RecordingStage {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            sprite_width: 60.0,
            ops: Vec::new(),
            sprites: HashMap::new(),
            overlay_visible: true,
        }
    }

    /// Forget recorded ops (sprites stay attached)
    pub fn clear_ops(&mut self) {
        self.ops.clear();
    }

    /// Clock texts in order
    pub fn clock_texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                StageOp::Clock(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Offsets applied to one sprite, in order
    pub fn offsets_of(&self, id: &FishId) -> Vec<Vec2> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                StageOp::Offset { id: op_id, offset, .. } if op_id == id => Some(*offset),
                _ => None,
            })
            .collect()
    }
}

impl Default for RecordingStage {
    fn default() -> Self {
        Self::new(Viewport::default())
    }
}

impl Stage for RecordingStage {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn spawn_sprite(&mut self, id: &FishId, classes: &[String]) -> f32 {
        self.sprites.insert(id.clone(), classes.to_vec());
        self.ops.push(StageOp::Spawn {
            id: id.clone(),
            classes: classes.to_vec(),
        });
        self.sprite_width
    }

    fn place_sprite(&mut self, id: &FishId, start: Vec2, duration_ms: f64) {
        self.ops.push(StageOp::Place {
            id: id.clone(),
            start,
            duration_ms,
        });
    }

    fn offset_sprite(&mut self, id: &FishId, offset: Vec2, facing: Facing) {
        self.ops.push(StageOp::Offset {
            id: id.clone(),
            offset,
            facing,
        });
    }

    fn arm_sprite(&mut self, id: &FishId) {
        self.ops.push(StageOp::Arm { id: id.clone() });
    }

    fn remove_sprite(&mut self, id: &FishId) {
        self.sprites.remove(id);
        self.ops.push(StageOp::Remove { id: id.clone() });
    }

    fn show_clock(&mut self, text: &str) {
        self.ops.push(StageOp::Clock(text.to_string()));
    }

    fn show_score(&mut self, text: &str) {
        self.ops.push(StageOp::Score(text.to_string()));
    }

    fn show_overlay(&mut self, content: OverlayContent) {
        self.overlay_visible = true;
        self.ops.push(StageOp::ShowOverlay(content));
    }

    fn hide_overlay(&mut self) {
        self.overlay_visible = false;
        self.ops.push(StageOp::HideOverlay);
    }
}
