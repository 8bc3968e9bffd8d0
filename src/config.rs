//! Game configuration
//!
//! Immutable after construction. In the browser it is read from a JSON
//! `<script id="game-config" type="application/json">` block.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::{Tier, Viewport};

/// Configuration errors
#[derive(Debug)]
pub enum ConfigError {
    /// Malformed JSON
    Json(serde_json::Error),
    /// Well-formed but unusable values
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Json(e) => write!(f, "config parse error: {}", e),
            ConfigError::Invalid(msg) => write!(f, "invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Json(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Json(e)
    }
}

/// One value per fish tier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierTable<T> {
    pub small: T,
    pub medium: T,
    pub big: T,
}

impl<T> TierTable<T> {
    pub fn get(&self, tier: Tier) -> &T {
        match tier {
            Tier::Small => &self.small,
            Tier::Medium => &self.medium,
            Tier::Big => &self.big,
        }
    }
}

impl TierTable<String> {
    /// Reverse lookup: which tier does this CSS class belong to
    pub fn tier_of(&self, class: &str) -> Option<Tier> {
        Tier::ALL.into_iter().find(|t| self.get(*t) == class)
    }
}

/// Countdown settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerConfig {
    pub minutes: u32,
    pub seconds: u32,
    /// Classes added to the clock element
    pub classes: Vec<String>,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            minutes: 2,
            seconds: 0,
            classes: vec!["timer-text".to_string()],
        }
    }
}

/// Fish spawning and motion settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FishConfig {
    /// Spawner period (ms)
    pub spawn_interval_ms: f64,
    /// Spawner stops once this many fish are live
    pub max_count: usize,
    /// Shortest leg duration (ms)
    pub min_vel: f64,
    /// Longest leg duration (ms)
    pub max_vel: f64,
    /// CSS size class per tier
    pub sizes: TierTable<String>,
    /// Reward carried by each tier's fish
    pub rewards: TierTable<u32>,
}

impl Default for FishConfig {
    fn default() -> Self {
        Self {
            spawn_interval_ms: 1000.0,
            max_count: 10,
            min_vel: 5000.0,
            max_vel: 10000.0,
            sizes: TierTable {
                small: "small".to_string(),
                medium: "medium".to_string(),
                big: "big".to_string(),
            },
            rewards: TierTable {
                small: 30,
                medium: 20,
                big: 10,
            },
        }
    }
}

/// Destination bounding box for fish legs (px)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenBounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl ScreenBounds {
    /// Whole viewport
    pub fn of_viewport(viewport: Viewport) -> Self {
        Self {
            min: Vec2::ZERO,
            max: Vec2::new(viewport.width, viewport.height),
        }
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// DOM element ids the platform layer binds to
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub timer_parent: String,
    pub fish_parent: String,
    pub score: String,
    pub holder: String,
    pub holder_content: String,
    pub pause: String,
    #[serde(rename = "continue")]
    pub resume: String,
    /// Where the restart link points
    pub restart_href: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            timer_parent: "timer".to_string(),
            fish_parent: "fishes".to_string(),
            score: "score".to_string(),
            holder: "holder".to_string(),
            holder_content: "holder-content".to_string(),
            pause: "pause".to_string(),
            resume: "continue".to_string(),
            restart_href: "index.html".to_string(),
        }
    }
}

/// Complete game configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub timer: TimerConfig,
    pub fishes: FishConfig,
    /// `None` means the whole viewport
    pub screen: Option<ScreenBounds>,
    pub ui: UiConfig,
}

impl GameConfig {
    /// Parse and validate
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let f = &self.fishes;
        if f.max_count == 0 {
            return Err(ConfigError::Invalid("fishes.max_count must be positive"));
        }
        if !(f.spawn_interval_ms > 0.0) {
            return Err(ConfigError::Invalid("fishes.spawn_interval_ms must be positive"));
        }
        if !(f.min_vel > 0.0) || !(f.max_vel >= f.min_vel) {
            return Err(ConfigError::Invalid("fishes.min_vel..max_vel must be a positive range"));
        }
        if f.sizes.small == f.sizes.medium
            || f.sizes.small == f.sizes.big
            || f.sizes.medium == f.sizes.big
        {
            return Err(ConfigError::Invalid("fishes.sizes must be distinct classes"));
        }
        if let Some(bounds) = self.screen {
            if bounds.min.x > bounds.max.x || bounds.min.y > bounds.max.y {
                return Err(ConfigError::Invalid("screen.min must not exceed screen.max"));
            }
        }
        if self.timer.seconds > 59 {
            return Err(ConfigError::Invalid("timer.seconds must be below 60"));
        }
        Ok(())
    }

    /// Destination box for the given viewport
    pub fn bounds(&self, viewport: Viewport) -> ScreenBounds {
        self.screen.unwrap_or_else(|| ScreenBounds::of_viewport(viewport))
    }

    /// Element id of the config script block
    const SCRIPT_ID: &'static str = "game-config";

    /// Load configuration from the page (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let json = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(Self::SCRIPT_ID))
            .and_then(|el| el.text_content());

        if let Some(json) = json {
            match Self::from_json(&json) {
                Ok(config) => {
                    log::info!("Loaded game config from #{}", Self::SCRIPT_ID);
                    return config;
                }
                Err(e) => log::warn!("{}; falling back to defaults", e),
            }
        }

        log::info!("Using default game config");
        Self::default()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        log::debug!("No #{} outside the browser, using defaults", Self::SCRIPT_ID);
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.fishes.rewards, TierTable { small: 30, medium: 20, big: 10 });
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = GameConfig::from_json(
            r#"{ "timer": { "minutes": 0, "seconds": 30 }, "fishes": { "max_count": 4 } }"#,
        )
        .unwrap();
        assert_eq!(config.timer.minutes, 0);
        assert_eq!(config.timer.seconds, 30);
        assert_eq!(config.timer.classes, vec!["timer-text".to_string()]);
        assert_eq!(config.fishes.max_count, 4);
        assert_eq!(config.fishes.min_vel, 5000.0);
        assert!(config.screen.is_none());
    }

    #[test]
    fn test_screen_and_ui_fields() {
        let config = GameConfig::from_json(
            r#"{
                "screen": { "min": [10.0, 20.0], "max": [300.0, 200.0] },
                "ui": { "continue": "resume-btn" }
            }"#,
        )
        .unwrap();
        let bounds = config.bounds(Viewport::new(1000.0, 800.0));
        assert_eq!(bounds.min, Vec2::new(10.0, 20.0));
        assert_eq!(bounds.max, Vec2::new(300.0, 200.0));
        assert_eq!(config.ui.resume, "resume-btn");
        assert_eq!(config.ui.pause, "pause");
    }

    #[test]
    fn test_bounds_default_to_viewport() {
        let config = GameConfig::default();
        let bounds = config.bounds(Viewport::new(640.0, 480.0));
        assert_eq!(bounds.min, Vec2::ZERO);
        assert_eq!(bounds.max, Vec2::new(640.0, 480.0));
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            GameConfig::from_json(r#"{ "fishes": { "max_count": 0 } }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            GameConfig::from_json(r#"{ "fishes": { "min_vel": 900, "max_vel": 100 } }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            GameConfig::from_json(
                r#"{ "fishes": { "sizes": { "small": "a", "medium": "a", "big": "b" } } }"#
            ),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            GameConfig::from_json(r#"{ "screen": { "min": [50, 0], "max": [10, 10] } }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(GameConfig::from_json("{ nope"), Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_tier_of_class() {
        let sizes = GameConfig::default().fishes.sizes;
        assert_eq!(sizes.tier_of("small"), Some(Tier::Small));
        assert_eq!(sizes.tier_of("medium"), Some(Tier::Medium));
        assert_eq!(sizes.tier_of("big"), Some(Tier::Big));
        assert_eq!(sizes.tier_of("huge"), None);
    }
}
