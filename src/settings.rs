//! Game settings supplied by the host page
//!
//! Passed as a JSON object next to the feature collection. Every field is
//! optional and falls back to its default.

use serde::{Deserialize, Serialize};

use crate::error::MapError;

/// Grid cell size for snake food and movement
pub const DEFAULT_CELL_SIZE: f32 = 8.0;

/// Simplification tolerance applied to asteroids input (source units)
pub const DEFAULT_SIMPLIFY_TOLERANCE: f64 = 1.0;

/// Session options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Feature property displayed as the rock/food label
    pub property_name: String,
    /// Source data has Y growing downward
    pub flip_y_coords: bool,
    /// Snake wraps vertically like a torus instead of crossing the pole
    pub warp_pole: bool,

    // === Geometry ===
    /// Douglas-Peucker tolerance for asteroids input (0 disables)
    pub simplify_tolerance: f64,
    /// Snake grid cell size in viewport units
    pub cell_size: f32,

    /// RNG seed for rock angles, food colors and shuffling
    pub seed: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            property_name: "name".to_string(),
            flip_y_coords: false,
            warp_pole: false,

            simplify_tolerance: DEFAULT_SIMPLIFY_TOLERANCE,
            cell_size: DEFAULT_CELL_SIZE,

            seed: 0x6d61_7073,
        }
    }
}

impl Settings {
    /// Parse settings from a JSON object
    pub fn from_json(json: &str) -> Result<Self, MapError> {
        let settings: Settings = serde_json::from_str(json).map_err(MapError::InvalidSettings)?;
        Ok(settings.sanitized())
    }

    /// Parse settings, logging and falling back to defaults on error
    pub fn from_json_or_default(json: &str) -> Self {
        if json.trim().is_empty() {
            return Self::default();
        }
        match Self::from_json(json) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("{e}; using default settings");
                Self::default()
            }
        }
    }

    /// Same settings with a different seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Replace values that would break the grid or the simplifier
    fn sanitized(mut self) -> Self {
        if !(self.cell_size.is_finite() && self.cell_size > 0.0) {
            log::warn!("cell_size {} is not usable, using {}", self.cell_size, DEFAULT_CELL_SIZE);
            self.cell_size = DEFAULT_CELL_SIZE;
        }
        if !self.simplify_tolerance.is_finite() || self.simplify_tolerance < 0.0 {
            self.simplify_tolerance = 0.0;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{ "propertyName": "NAME_EN", "warpPole": true }"#)
            .unwrap();
        assert_eq!(settings.property_name, "NAME_EN");
        assert!(settings.warp_pole);
        assert!(!settings.flip_y_coords);
        assert_eq!(settings.cell_size, DEFAULT_CELL_SIZE);
    }

    #[test]
    fn test_bad_json_falls_back() {
        assert_eq!(Settings::from_json_or_default("{ nope"), Settings::default());
        assert_eq!(Settings::from_json_or_default(""), Settings::default());
    }

    #[test]
    fn test_sanitize_cell_size() {
        let settings = Settings::from_json(r#"{ "cellSize": 0 }"#).unwrap();
        assert_eq!(settings.cell_size, DEFAULT_CELL_SIZE);
    }
}
