//! Ring simplification
//!
//! Radial-distance pre-pass followed by Douglas-Peucker. Rings that would
//! fall under four positions keep their original coordinates so polygons
//! never collapse.

use glam::DVec2;

use super::{Feature, Ring};

/// Smallest ring that still encloses an area (closing position included)
const MIN_RING_LEN: usize = 4;

/// Simplify every ring of every feature
pub fn simplify_features(features: &[Feature], tolerance: f64) -> Vec<Feature> {
    if tolerance <= 0.0 {
        return features.to_vec();
    }
    features
        .iter()
        .filter_map(|f| f.map_rings(|ring| simplify_ring(ring, tolerance)))
        .collect()
}

/// Simplify one ring, falling back to the input when too few points remain
pub fn simplify_ring(ring: &Ring, tolerance: f64) -> Ring {
    if ring.len() <= MIN_RING_LEN {
        return ring.clone();
    }
    let sq_tolerance = tolerance * tolerance;
    let simplified = douglas_peucker(&radial_distance(ring, sq_tolerance), sq_tolerance);
    if simplified.len() < MIN_RING_LEN {
        ring.clone()
    } else {
        simplified
    }
}

fn radial_distance(points: &[DVec2], sq_tolerance: f64) -> Vec<DVec2> {
    let Some((&first, rest)) = points.split_first() else {
        return Vec::new();
    };
    let mut prev = first;
    let mut out = vec![first];
    for &point in rest {
        if point.distance_squared(prev) > sq_tolerance {
            out.push(point);
            prev = point;
        }
    }
    if let Some(&last) = points.last() {
        if prev != last {
            out.push(last);
        }
    }
    out
}

fn douglas_peucker(points: &[DVec2], sq_tolerance: f64) -> Vec<DVec2> {
    if points.len() < 3 {
        return points.to_vec();
    }
    let last = points.len() - 1;
    let mut keep = vec![false; points.len()];
    keep[0] = true;
    keep[last] = true;

    let mut stack = vec![(0, last)];
    while let Some((first, end)) = stack.pop() {
        let mut max_sq = sq_tolerance;
        let mut index = None;
        for i in first + 1..end {
            let sq = segment_distance_squared(points[i], points[first], points[end]);
            if sq > max_sq {
                max_sq = sq;
                index = Some(i);
            }
        }
        if let Some(i) = index {
            keep[i] = true;
            stack.push((first, i));
            stack.push((i, end));
        }
    }

    points
        .iter()
        .zip(keep)
        .filter_map(|(&p, k)| k.then_some(p))
        .collect()
}

fn segment_distance_squared(p: DVec2, a: DVec2, b: DVec2) -> f64 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq == 0.0 {
        return p.distance_squared(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance_squared(a + ab * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collinear_points_removed() {
        let ring = vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(5.0, 0.0),
            DVec2::new(10.0, 0.0),
            DVec2::new(10.0, 10.0),
            DVec2::new(0.0, 10.0),
            DVec2::new(0.0, 0.0),
        ];
        let out = simplify_ring(&ring, 1.0);
        assert_eq!(out.len(), 5);
        assert!(!out.contains(&DVec2::new(5.0, 0.0)));
        assert_eq!(out.first(), out.last());
    }

    #[test]
    fn test_small_ring_kept() {
        let ring = vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(0.1, 0.0),
            DVec2::new(0.1, 0.1),
            DVec2::new(0.0, 0.1),
            DVec2::new(0.0, 0.05),
            DVec2::new(0.0, 0.0),
        ];
        // everything lies within tolerance; the ring survives untouched
        assert_eq!(simplify_ring(&ring, 1.0), ring);
    }

    #[test]
    fn test_zero_tolerance_is_identity() {
        let f = Feature::polygon(vec![vec![DVec2::ZERO, DVec2::X, DVec2::ONE, DVec2::ZERO]]);
        assert_eq!(simplify_features(&[f.clone()], 0.0), vec![f]);
    }
}
