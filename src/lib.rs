//! Map Station - arcade mini-games built from map polygons
//!
//! Core modules:
//! - `geo`: GeoJSON ingestion, simplification and viewport projection
//! - `scene`: Typed SVG visual tree and transform primitives
//! - `controls`: Debounced key probes and key-binding persistence
//! - `screen`: Screen init/teardown container
//! - `sim`: Entity simulation and game orchestrators (asteroids, snake)
//! - `persistence`: Host storage abstraction
//! - `platform`: Host session trait and browser entry points

pub mod controls;
pub mod error;
pub mod geo;
pub mod persistence;
pub mod platform;
pub mod scene;
pub mod screen;
pub mod settings;
pub mod sim;

pub use controls::{Action, Controls, KeyBindings};
pub use error::MapError;
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Logical viewport size shared by both games
    pub const VIEWPORT_WIDTH: f32 = 1024.0;
    pub const VIEWPORT_HEIGHT: f32 = 1024.0;
    /// Frame around the play area in the outer SVG
    pub const MARGIN: f32 = 16.0;

    /// Frame loop throttle (~60 updates per second)
    pub const FRAME_INTERVAL_MS: f64 = 1000.0 / 60.0;

    /// Default debounce for action probes
    pub const DEFAULT_DEBOUNCE_MS: f64 = 100.0;
    /// Debounce for screen transitions
    pub const MODE_DEBOUNCE_MS: f64 = 1000.0;

    /// Divisor turning `speed * delta_time` into units
    pub const TIME_SCALE: f32 = 25.0;
}

/// Degrees to radians
#[inline]
pub fn rad(degrees: f32) -> f32 {
    degrees * (std::f32::consts::PI / 180.0)
}

/// Unit heading for a rotation in degrees (0° points up the screen)
#[inline]
pub fn heading(rotation_deg: f32) -> Vec2 {
    let r = rad(rotation_deg);
    Vec2::new(r.sin(), -r.cos())
}

/// Linearly remap `value` from `[from_lo, from_hi]` to `[to_lo, to_hi]`
#[inline]
pub fn map_range(value: f64, from_lo: f64, from_hi: f64, to_lo: f64, to_hi: f64) -> f64 {
    to_lo + (to_hi - to_lo) * ((value - from_lo) / (from_hi - from_lo))
}
