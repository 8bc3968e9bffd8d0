//! Fish entities and their back-and-forth motion

use std::fmt;

use glam::Vec2;
use rand::Rng;

use super::scheduler::IntervalId;
use crate::config::ScreenBounds;
use crate::consts::*;

/// Size / reward category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    Small,
    Medium,
    Big,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Small, Tier::Medium, Tier::Big];

    /// Uniform pick over the three tiers
    pub fn random(rng: &mut impl Rng) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    /// Score for catching a fish of this tier
    pub fn points(&self) -> u32 {
        match self {
            Tier::Small => SMALL_POINTS,
            Tier::Medium => MEDIUM_POINTS,
            Tier::Big => BIG_POINTS,
        }
    }
}

/// Fish identity, `fish0`, `fish1`, ...
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FishId(String);

impl FishId {
    pub fn from_index(index: usize) -> Self {
        Self(format!("{}{}", FISH_CLASS, index))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for FishId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for FishId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Visible area (px)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 720.0)
    }
}

/// Horizontal mirroring of the sprite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    #[default]
    Right,
    Left,
}

impl Facing {
    fn of_travel(dx: f32) -> Self {
        if dx < 0.0 { Facing::Left } else { Facing::Right }
    }

    /// CSS `scale` x factor
    pub fn scale_x(&self) -> i32 {
        match self {
            Facing::Right => 1,
            Facing::Left => -1,
        }
    }
}

/// Which leg the next motion tick starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Start point toward end point
    #[default]
    Outbound,
    /// End point back to start point
    Return,
}

/// Randomized route of one fish
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionPlan {
    /// Off-screen entry point (absolute position)
    pub start: Vec2,
    /// Turnaround point inside the bounding box
    pub end: Vec2,
    /// `end - start`, applied as margin offset
    pub delta: Vec2,
    /// Duration of one leg (ms), also the motion tick period
    pub duration_ms: f64,
}

impl MotionPlan {
    /// Pick a random route.
    ///
    /// Start is just past the left or right edge (sprite fully hidden), at a
    /// random height; end is anywhere inside `bounds`.
    pub fn random(
        rng: &mut impl Rng,
        viewport: Viewport,
        sprite_width: f32,
        bounds: ScreenBounds,
        min_vel: f64,
        max_vel: f64,
    ) -> Self {
        let start_x = if rng.random_bool(0.5) {
            -sprite_width
        } else {
            viewport.width + sprite_width
        };
        let start = Vec2::new(start_x, random_between(rng, 0.0, viewport.height).round());
        let end = Vec2::new(
            whole_px_within(rng, bounds.min.x, bounds.max.x),
            whole_px_within(rng, bounds.min.y, bounds.max.y),
        );
        let duration_ms = if max_vel > min_vel {
            rng.random_range(min_vel..=max_vel)
        } else {
            min_vel
        };

        Self {
            start,
            end,
            delta: end - start,
            duration_ms,
        }
    }
}

/// Uniform in `[lo, hi]`, tolerating an empty range
fn random_between(rng: &mut impl Rng, lo: f32, hi: f32) -> f32 {
    if hi > lo { rng.random_range(lo..=hi) } else { lo }
}

/// Rounded to a whole pixel, but never outside `[lo, hi]`
fn whole_px_within(rng: &mut impl Rng, lo: f32, hi: f32) -> f32 {
    let v = random_between(rng, lo, hi).round();
    if hi > lo { v.clamp(lo, hi) } else { lo }
}

/// Result of one motion tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionStep {
    /// Margin offset relative to the start point
    pub offset: Vec2,
    pub facing: Facing,
}

/// A catchable fish
#[derive(Debug, Clone)]
pub struct Fish {
    pub id: FishId,
    pub tier: Tier,
    /// Configured reward for the tier
    pub reward: u32,
    /// Visual variant, 1..=FISH_VARIANTS
    pub variant: u8,
    classes: Vec<String>,
    motion: Option<MotionPlan>,
    direction: Direction,
    facing: Facing,
    /// Motion interval, set once the fish is swimming
    pub interval: Option<IntervalId>,
}

impl Fish {
    pub fn new(id: FishId, tier: Tier, size_class: &str, reward: u32, variant: u8) -> Self {
        Self {
            id,
            tier,
            reward,
            variant,
            classes: vec![
                FISH_CLASS.to_string(),
                size_class.to_string(),
                format!("{}{}", FISH_CLASS, variant),
            ],
            motion: None,
            direction: Direction::default(),
            facing: Facing::default(),
            interval: None,
        }
    }

    /// CSS classes: `fish`, size class, variant class
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn size_class(&self) -> &str {
        &self.classes[1]
    }

    pub fn motion(&self) -> Option<&MotionPlan> {
        self.motion.as_ref()
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn set_motion(&mut self, plan: MotionPlan) {
        self.motion = Some(plan);
        self.direction = Direction::Outbound;
    }

    /// Advance one leg: compute the new offset and facing, flip direction.
    ///
    /// Offsets alternate `delta` and zero, so the fish swims start to end and
    /// back again rather than swinging by `±delta` past its start point.
    /// Returns `None` before a motion plan is set.
    pub fn step(&mut self) -> Option<MotionStep> {
        let plan = self.motion?;
        let (offset, travel) = match self.direction {
            Direction::Outbound => (plan.delta, plan.delta),
            Direction::Return => (Vec2::ZERO, -plan.delta),
        };
        self.facing = Facing::of_travel(travel.x);
        self.direction = match self.direction {
            Direction::Outbound => Direction::Return,
            Direction::Return => Direction::Outbound,
        };
        Some(MotionStep {
            offset,
            facing: self.facing,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn bounds(min: (f32, f32), max: (f32, f32)) -> ScreenBounds {
        ScreenBounds {
            min: Vec2::new(min.0, min.1),
            max: Vec2::new(max.0, max.1),
        }
    }

    #[test]
    fn test_classes() {
        let fish = Fish::new(FishId::from_index(3), Tier::Medium, "medium", 20, 4);
        assert_eq!(fish.id.as_str(), "fish3");
        assert_eq!(fish.classes(), &["fish", "medium", "fish4"]);
        assert_eq!(fish.size_class(), "medium");
    }

    #[test]
    fn test_points() {
        assert_eq!(Tier::Small.points(), 30);
        assert_eq!(Tier::Medium.points(), 20);
        assert_eq!(Tier::Big.points(), 10);
    }

    #[test]
    fn test_step_without_plan() {
        let mut fish = Fish::new(FishId::from_index(0), Tier::Big, "big", 10, 1);
        assert!(fish.step().is_none());
    }

    #[test]
    fn test_step_oscillates() {
        let mut fish = Fish::new(FishId::from_index(0), Tier::Small, "small", 30, 2);
        fish.set_motion(MotionPlan {
            start: Vec2::new(-50.0, 100.0),
            end: Vec2::new(300.0, 250.0),
            delta: Vec2::new(350.0, 150.0),
            duration_ms: 6000.0,
        });

        let out = fish.step().unwrap();
        assert_eq!(out.offset, Vec2::new(350.0, 150.0));
        assert_eq!(out.facing, Facing::Right);
        assert_eq!(fish.direction(), Direction::Return);

        let back = fish.step().unwrap();
        assert_eq!(back.offset, Vec2::ZERO);
        assert_eq!(back.facing, Facing::Left);
        assert_eq!(fish.direction(), Direction::Outbound);

        assert_eq!(fish.step().unwrap(), out);
    }

    #[test]
    fn test_step_from_right_edge_faces_left_first() {
        let mut fish = Fish::new(FishId::from_index(1), Tier::Big, "big", 10, 6);
        fish.set_motion(MotionPlan {
            start: Vec2::new(1380.0, 10.0),
            end: Vec2::new(400.0, 400.0),
            delta: Vec2::new(-980.0, 390.0),
            duration_ms: 5000.0,
        });
        assert_eq!(fish.step().unwrap().facing, Facing::Left);
        assert_eq!(fish.step().unwrap().facing, Facing::Right);
        assert_eq!(Facing::Left.scale_x(), -1);
    }

    #[test]
    fn test_both_edges_are_used() {
        let mut rng = Pcg32::seed_from_u64(7);
        let viewport = Viewport::new(800.0, 600.0);
        let b = ScreenBounds::of_viewport(viewport);
        let mut left = 0;
        let trials = 2000;
        for _ in 0..trials {
            let plan = MotionPlan::random(&mut rng, viewport, 40.0, b, 5000.0, 10000.0);
            if plan.start.x < 0.0 {
                left += 1;
            }
        }
        let ratio = left as f64 / trials as f64;
        assert!((0.45..0.55).contains(&ratio), "left ratio {}", ratio);
    }

    #[test]
    fn test_tier_distribution() {
        let mut rng = Pcg32::seed_from_u64(2024);
        let mut counts = [0usize; 3];
        let trials = 30_000;
        for _ in 0..trials {
            let tier = Tier::random(&mut rng);
            let idx = Tier::ALL.iter().position(|t| *t == tier).unwrap();
            counts[idx] += 1;
        }
        for c in counts {
            let p = c as f64 / trials as f64;
            assert!((p - 1.0 / 3.0).abs() < 0.02, "tier share {}", p);
        }
    }

    #[test]
    fn test_end_stays_inside_fractional_bounds() {
        let mut rng = Pcg32::seed_from_u64(11);
        let viewport = Viewport::new(800.0, 600.0);
        let b = bounds((10.3, 20.3), (10.45, 20.45));
        for _ in 0..1000 {
            let plan = MotionPlan::random(&mut rng, viewport, 40.0, b, 5000.0, 10000.0);
            assert!(b.contains(plan.end), "end {:?} outside {:?}", plan.end, b);
        }
    }

    #[test]
    fn test_end_is_whole_px_when_box_allows() {
        let mut rng = Pcg32::seed_from_u64(12);
        let viewport = Viewport::new(800.0, 600.0);
        let b = bounds((0.6, 0.6), (500.4, 300.4));
        for _ in 0..200 {
            let plan = MotionPlan::random(&mut rng, viewport, 40.0, b, 5000.0, 10000.0);
            assert!(b.contains(plan.end));
            assert_eq!(plan.end, plan.end.round());
        }
    }

    proptest! {
        #[test]
        fn prop_plan_geometry(
            seed in any::<u64>(),
            width in 100.0f32..4000.0,
            height in 100.0f32..3000.0,
            sprite in 1.0f32..300.0,
            min_x in 0.0f32..500.0,
            min_y in 0.0f32..500.0,
            span_x in 0.0f32..1000.0,
            span_y in 0.0f32..1000.0,
            min_vel in 100.0f64..5000.0,
            extra_vel in 0.0f64..5000.0,
        ) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let viewport = Viewport::new(width, height);
            let b = bounds((min_x, min_y), (min_x + span_x, min_y + span_y));
            let plan =
                MotionPlan::random(&mut rng, viewport, sprite, b, min_vel, min_vel + extra_vel);

            prop_assert!(plan.start.x == -sprite || plan.start.x == width + sprite);
            prop_assert!(plan.start.y >= 0.0 && plan.start.y <= height.round());
            prop_assert!(b.contains(plan.end));
            prop_assert_eq!(plan.delta, plan.end - plan.start);
            prop_assert!(plan.duration_ms >= min_vel && plan.duration_ms <= min_vel + extra_vel);
        }
    }
}
