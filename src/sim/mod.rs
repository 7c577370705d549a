//! Entity simulation
//!
//! Frame-driven and single-threaded. Every entity advances by the frame's
//! wall-clock delta; deferred effects (invulnerability, delayed removal) are
//! deadlines compared against `Frame::now`.

pub mod asteroids;
pub mod clock;
pub mod snake;

use glam::Vec2;

use crate::consts::{VIEWPORT_HEIGHT, VIEWPORT_WIDTH};
use crate::controls::Controls;
use crate::scene::Scene;

pub use asteroids::AsteroidsGame;
pub use clock::FrameClock;
pub use snake::SnakeGame;

/// Wrap-around play area
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            min: Vec2::ZERO,
            max: Vec2::new(VIEWPORT_WIDTH, VIEWPORT_HEIGHT),
        }
    }
}

impl Bounds {
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Teleport a position that left the area to the opposite edge
    pub fn wrap(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            wrap_axis(p.x, self.min.x, self.max.x),
            wrap_axis(p.y, self.min.y, self.max.y),
        )
    }
}

fn wrap_axis(v: f32, min: f32, max: f32) -> f32 {
    if v < min {
        max
    } else if v > max {
        min
    } else {
        v
    }
}

/// Per-frame inputs shared by every entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    /// Milliseconds since the game started
    pub now: f64,
    /// Seconds since the game started
    pub time: f32,
    /// Milliseconds since the previous frame
    pub delta_time: f32,
    pub bounds: Bounds,
}

impl Frame {
    pub fn new(now: f64, delta_time: f32) -> Self {
        Self {
            now,
            time: (now / 1000.0) as f32,
            delta_time,
            bounds: Bounds::default(),
        }
    }
}

/// Capabilities shared by simulated actors
pub trait Entity {
    /// Advance one frame
    fn update(&mut self, frame: &Frame, controls: &mut Controls, scene: &mut Scene);

    /// Dead entities are skipped by collision checks
    fn is_removed(&self) -> bool;
}

/// Axis-aligned box in viewport space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn contains_strict(&self, p: Vec2) -> bool {
        p.x > self.min.x && p.x < self.max.x && p.y > self.min.y && p.y < self.max.y
    }
}

/// Collision volume handed to the player
#[derive(Debug, Clone, PartialEq)]
pub struct HitInfo {
    pub center: Vec2,
    pub radius: f32,
    /// Per-ring boxes; only consulted when `radius` is large
    pub boxes: Vec<Rect>,
}
