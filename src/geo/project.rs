//! Fit features into a fixed viewport
//!
//! The bounding box of every input position is remapped into the viewport
//! without distortion: the axis whose aspect dominates fills the viewport and
//! the other is scaled by the same factor.

use glam::DVec2;

use super::{BBox, Feature};
use crate::map_range;

/// Feature whose positions live in viewport space
pub type ProjectedFeature = Feature;

/// Target rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    /// Center the fitted rectangle instead of anchoring it at the origin
    pub centered: bool,
}

impl Viewport {
    pub fn centered(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            centered: true,
        }
    }
}

/// Project `features` into `viewport`.
///
/// `projection` is applied to every raw position first. Without `flip_y`
/// the source max Y maps to the top of the viewport. A zero-extent axis is
/// pinned to the viewport center.
pub fn project(
    features: &[Feature],
    viewport: Viewport,
    projection: Option<&dyn Fn(DVec2) -> DVec2>,
    flip_y: bool,
) -> Vec<ProjectedFeature> {
    let source: Vec<Feature> = features
        .iter()
        .filter_map(|f| f.map_coords(|c| projection.map_or(c, |p| p(c))))
        .collect();

    let Some(extent) = BBox::of(source.iter().flat_map(|f| f.coords())) else {
        return Vec::new();
    };

    let (w, h) = (extent.width(), extent.height());
    let (vw, vh) = (viewport.width, viewport.height);

    let is_horizontal = if h > 0.0 { w / h > vw / vh } else { w > 0.0 };
    let (fit_w, fit_h) = if is_horizontal {
        (vw, vw * h / w)
    } else if h > 0.0 {
        (vh * w / h, vh)
    } else {
        (0.0, 0.0)
    };

    let (x0, x1) = if viewport.centered {
        (vw / 2.0 - fit_w / 2.0, vw / 2.0 + fit_w / 2.0)
    } else {
        (0.0, fit_w)
    };
    let (y0, y1) = if viewport.centered {
        (vh / 2.0 - fit_h / 2.0, vh / 2.0 + fit_h / 2.0)
    } else {
        (0.0, fit_h)
    };
    let (from_y0, from_y1) = if flip_y {
        (extent.min.y, extent.max.y)
    } else {
        (extent.max.y, extent.min.y)
    };

    let remap = |c: DVec2| {
        let x = if w > 0.0 {
            map_range(c.x, extent.min.x, extent.max.x, x0, x1)
        } else {
            vw / 2.0
        };
        let y = if h > 0.0 {
            map_range(c.y, from_y0, from_y1, y0, y1)
        } else {
            vh / 2.0
        };
        DVec2::new(x, y)
    };

    source.iter().filter_map(|f| f.map_coords(remap)).collect()
}
