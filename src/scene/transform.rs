//! Transform and path primitives
//!
//! `rotate(r x y) translate(x, y) scale(s)`: a local point `p` lands at
//! `(x, y) + R(r) * (s * p)`, so entities spin in place while translating.

use std::fmt;

use glam::{Affine2, Vec2};

use crate::rad;

/// Rotation about a target point, translation to it, then uniform scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec2,
    /// Degrees, clockwise on screen
    pub rotation: f32,
    pub scale: f32,
}

impl Transform {
    /// Local -> world matrix
    pub fn to_affine(&self) -> Affine2 {
        Affine2::from_translation(self.position)
            * Affine2::from_angle(rad(self.rotation))
            * Affine2::from_scale(Vec2::splat(self.scale))
    }

    /// Map a local point to world space
    pub fn apply(&self, local: Vec2) -> Vec2 {
        self.to_affine().transform_point2(local)
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Vec2 { x, y } = self.position;
        write!(
            f,
            "rotate({} {} {}) translate({}, {}) scale({})",
            self.rotation, x, y, x, y, self.scale
        )
    }
}

/// Compose a transform placing local geometry at `(x, y)`
pub fn compose_transform(x: f32, y: f32, rotation: f32, scale: f32) -> Transform {
    Transform {
        position: Vec2::new(x, y),
        rotation,
        scale,
    }
}

/// SVG path data through `points`, optionally closed
pub fn build_closed_path<P>(points: &[P], close: bool) -> String
where
    P: Copy + Into<[f64; 2]>,
{
    let mut d = String::with_capacity(points.len() * 12);
    for (i, &point) in points.iter().enumerate() {
        let [x, y] = point.into();
        d.push(if i == 0 { 'M' } else { 'L' });
        d.push_str(&format!("{x} {y}"));
    }
    if close && !points.is_empty() {
        d.push('Z');
    }
    d
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn test_transform_string() {
        let t = compose_transform(10.0, 20.0, 0.0, 1.0);
        assert_eq!(t.to_string(), "rotate(0 10 20) translate(10, 20) scale(1)");
        let t = compose_transform(1.5, 2.0, 90.0, 0.5);
        assert_eq!(t.to_string(), "rotate(90 1.5 2) translate(1.5, 2) scale(0.5)");
    }

    #[test]
    fn test_rotation_about_target_point() {
        // origin of local space always lands on the target point
        let t = compose_transform(100.0, 50.0, 73.0, 2.0);
        assert!(close(t.apply(Vec2::ZERO), Vec2::new(100.0, 50.0)));

        // ship nose (0, -16) rotated 90° points to +x
        let t = compose_transform(100.0, 50.0, 90.0, 1.0);
        assert!(close(t.apply(Vec2::new(0.0, -16.0)), Vec2::new(116.0, 50.0)));
    }

    #[test]
    fn test_scale_applies_before_translation() {
        let t = compose_transform(10.0, 10.0, 0.0, 3.0);
        assert!(close(t.apply(Vec2::new(1.0, 1.0)), Vec2::new(13.0, 13.0)));
    }

    #[test]
    fn test_build_closed_path() {
        let pts: [[f64; 2]; 3] = [[0.0, 0.0], [10.0, 0.0], [10.0, 5.5]];
        assert_eq!(build_closed_path(&pts, false), "M0 0L10 0L10 5.5");
        assert_eq!(build_closed_path(&pts, true), "M0 0L10 0L10 5.5Z");
        let empty: [[f64; 2]; 0] = [];
        assert_eq!(build_closed_path(&empty, true), "");
    }
}
