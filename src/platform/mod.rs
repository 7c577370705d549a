//! Host integration
//!
//! [`Session`] is what a host loop drives: raw key codes in, throttled
//! frames, SVG out. The browser glue in `web` (wasm32 only) wires it to
//! `keydown`/`keyup` and `requestAnimationFrame`.

#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::{LocalStorage, map_asteroids, map_snake, map_station_controller};

use crate::settings::Settings;
use crate::sim::{AsteroidsGame, SnakeGame};

/// A running game as seen by the host
pub trait Session {
    /// Animation callback; false when throttled
    fn frame(&mut self, now_ms: f64) -> bool;
    fn key_down(&mut self, code: u32);
    fn key_up(&mut self, code: u32);
    fn to_svg(&self) -> String;
}

impl Session for AsteroidsGame {
    fn frame(&mut self, now_ms: f64) -> bool {
        AsteroidsGame::frame(self, now_ms)
    }

    fn key_down(&mut self, code: u32) {
        AsteroidsGame::key_down(self, code);
    }

    fn key_up(&mut self, code: u32) {
        AsteroidsGame::key_up(self, code);
    }

    fn to_svg(&self) -> String {
        AsteroidsGame::to_svg(self)
    }
}

impl Session for SnakeGame {
    fn frame(&mut self, now_ms: f64) -> bool {
        SnakeGame::frame(self, now_ms)
    }

    fn key_down(&mut self, code: u32) {
        SnakeGame::key_down(self, code);
    }

    fn key_up(&mut self, code: u32) {
        SnakeGame::key_up(self, code);
    }

    fn to_svg(&self) -> String {
        SnakeGame::to_svg(self)
    }
}

/// Settings from host options. Options without an explicit `seed` get
/// `fallback_seed` so each page load plays differently.
pub fn session_settings(options: Option<&str>, fallback_seed: u64) -> Settings {
    let Some(json) = options.filter(|s| !s.trim().is_empty()) else {
        return Settings::default().with_seed(fallback_seed);
    };
    let settings = Settings::from_json_or_default(json);
    let has_seed = serde_json::from_str::<serde_json::Value>(json)
        .ok()
        .is_some_and(|v| v.get("seed").is_some());
    if has_seed {
        settings
    } else {
        settings.with_seed(fallback_seed)
    }
}
