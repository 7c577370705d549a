//! Point-in-polygon
//!
//! Even-odd ray casting. Points on a ring boundary count as inside the
//! polygon, including points on a hole's edge.

use glam::DVec2;

use super::{Feature, Polygon};

/// Whether `p` lies inside any polygon of `feature`
pub fn point_in_feature(p: DVec2, feature: &Feature) -> bool {
    feature.polygons.iter().any(|polygon| point_in_polygon(p, polygon))
}

pub fn point_in_polygon(p: DVec2, polygon: &Polygon) -> bool {
    let Some((outer, holes)) = polygon.split_first() else {
        return false;
    };
    match in_ring(p, outer) {
        RingSide::Outside => false,
        RingSide::Boundary => true,
        RingSide::Inside => holes.iter().all(|hole| in_ring(p, hole) != RingSide::Inside),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RingSide {
    Inside,
    Boundary,
    Outside,
}

fn in_ring(p: DVec2, ring: &[DVec2]) -> RingSide {
    let ring = match ring {
        [first, .., last] if first == last => &ring[..ring.len() - 1],
        _ => ring,
    };
    if ring.is_empty() {
        return RingSide::Outside;
    }

    let mut inside = false;
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        let (a, b) = (ring[i], ring[j]);
        let on_boundary = p.y * (a.x - b.x) + a.y * (b.x - p.x) + b.y * (p.x - a.x) == 0.0
            && (a.x - p.x) * (b.x - p.x) <= 0.0
            && (a.y - p.y) * (b.y - p.y) <= 0.0;
        if on_boundary {
            return RingSide::Boundary;
        }
        let crosses = (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x;
        if crosses {
            inside = !inside;
        }
        j = i;
    }
    if inside {
        RingSide::Inside
    } else {
        RingSide::Outside
    }
}
