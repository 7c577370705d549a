//! Per-session occupancy grid
//!
//! Food claims grid cells as it rasterizes; the first food to claim a cell
//! owns it, so overlapping features never stack blocks.

use std::collections::HashSet;

use glam::Vec2;

#[derive(Debug, Clone)]
pub struct OccupancyGrid {
    size: f32,
    cells: HashSet<(i64, i64)>,
}

impl OccupancyGrid {
    pub fn new(size: f32) -> Self {
        Self {
            size,
            cells: HashSet::new(),
        }
    }

    /// Cell index of a cell-center position
    fn cell(&self, center: Vec2) -> (i64, i64) {
        let index = |v: f32| ((v - self.size / 2.0) / self.size).round() as i64;
        (index(center.x), index(center.y))
    }

    /// Claim the cell at `center`; false when already taken
    pub fn claim(&mut self, center: Vec2) -> bool {
        let cell = self.cell(center);
        self.cells.insert(cell)
    }

    pub fn is_claimed(&self, center: Vec2) -> bool {
        self.cells.contains(&self.cell(center))
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_once() {
        let mut grid = OccupancyGrid::new(8.0);
        assert!(grid.claim(Vec2::new(4.0, 12.0)));
        assert!(!grid.claim(Vec2::new(4.0, 12.0)));
        assert!(grid.is_claimed(Vec2::new(4.0, 12.0)));
        assert!(!grid.is_claimed(Vec2::new(12.0, 12.0)));
        assert_eq!(grid.len(), 1);

        grid.clear();
        assert!(grid.is_empty());
        assert!(grid.claim(Vec2::new(4.0, 12.0)));
    }
}
