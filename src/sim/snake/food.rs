//! Food: a feature rasterized into grid blocks

use glam::{DVec2, Vec2};

use super::block::Block;
use super::grid::OccupancyGrid;
use crate::controls::Controls;
use crate::geo::{Feature, point_in_feature};
use crate::scene::{NodeId, Scene};
use crate::sim::{Entity, Frame, Rect};

/// JS-style rounding to the nearest grid line
fn snap(v: f64, size: f64) -> f64 {
    (v / size + 0.5).floor() * size
}

#[derive(Debug, Clone)]
pub struct Food {
    name: String,
    /// Grid-snapped bounding box
    bounds: Rect,
    /// Zero-width or zero-height bounding box
    degenerate: bool,
    blocks: Vec<Block>,
}

impl Food {
    /// Rasterize `feature` into cell-center blocks inside the polygon.
    /// Cells already claimed in `grid` are skipped.
    pub fn new(
        scene: &mut Scene,
        parent: NodeId,
        feature: &Feature,
        name: String,
        size: f32,
        palette: (&str, &str),
        grid: &mut OccupancyGrid,
    ) -> Self {
        let (fill, stroke) = palette;
        let Some(bbox) = feature.bbox() else {
            return Self {
                name,
                bounds: Rect::new(Vec2::ZERO, Vec2::ZERO),
                degenerate: true,
                blocks: Vec::new(),
            };
        };

        let s = size as f64;
        let min = DVec2::new(snap(bbox.min.x, s), snap(bbox.min.y, s));
        let max = DVec2::new(snap(bbox.max.x, s), snap(bbox.max.y, s));
        let (width, height) = (max.x - min.x, max.y - min.y);
        let center = (min + max) / 2.0;
        let cols = (width / s).round() as usize;
        let rows = (height / s).round() as usize;
        let cell_center = |x: usize, y: usize| {
            DVec2::new(
                -width / 2.0 + x as f64 * s + s / 2.0 + center.x,
                -height / 2.0 + y as f64 * s + s / 2.0 + center.y,
            )
        };

        let degenerate = cols == 0 || rows == 0;
        let mut blocks = Vec::new();
        if degenerate {
            let p = cell_center(cols, rows).as_vec2();
            if grid.claim(p) {
                blocks.push(Block::new(scene, parent, p, size, fill, stroke));
            }
        } else {
            for idx in 0..rows * cols {
                let c = cell_center(idx % cols, idx / cols);
                let p = c.as_vec2();
                if point_in_feature(c, feature) && grid.claim(p) {
                    blocks.push(Block::new(scene, parent, p, size, fill, stroke));
                }
            }
        }

        Self {
            name,
            bounds: Rect::new(min.as_vec2(), max.as_vec2()),
            degenerate,
            blocks,
        }
    }

    /// Food made of explicit cell centers
    pub fn with_blocks(
        scene: &mut Scene,
        parent: NodeId,
        name: String,
        size: f32,
        centers: &[Vec2],
        palette: (&str, &str),
        grid: &mut OccupancyGrid,
    ) -> Self {
        let (fill, stroke) = palette;
        let half = Vec2::splat(size / 2.0);
        let mut bounds = Rect::new(Vec2::splat(f32::INFINITY), Vec2::splat(f32::NEG_INFINITY));
        let mut blocks = Vec::new();
        for &p in centers {
            bounds.min = bounds.min.min(p - half);
            bounds.max = bounds.max.max(p + half);
            if grid.claim(p) {
                blocks.push(Block::new(scene, parent, p, size, fill, stroke));
            }
        }
        Self {
            name,
            bounds,
            degenerate: false,
            blocks,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Hand over the block sitting exactly at `position`, if any
    pub fn collide(&mut self, position: Vec2) -> Option<Block> {
        if !(self.degenerate || self.bounds.contains_strict(position)) {
            return None;
        }
        let idx = self.blocks.iter().position(|b| b.position() == position)?;
        Some(self.blocks.remove(idx))
    }
}

impl Entity for Food {
    /// Food is static
    fn update(&mut self, _frame: &Frame, _controls: &mut Controls, _scene: &mut Scene) {}

    fn is_removed(&self) -> bool {
        self.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::tests::square;
    use crate::scene::{Element, Tag, colors};

    fn scene() -> Scene {
        Scene::new(Element::new(Tag::Svg))
    }

    #[test]
    fn test_square_rasterizes_to_cell_centers() {
        let mut scene = scene();
        let root = scene.root();
        let mut grid = OccupancyGrid::new(8.0);
        let f = Feature::polygon(vec![square(0.0, 0.0, 32.0)]);
        let food = Food::new(&mut scene, root, &f, "A".into(), 8.0, colors::FOOD[0], &mut grid);
        assert_eq!(food.blocks().len(), 16);
        assert_eq!(food.blocks()[0].position(), Vec2::new(4.0, 4.0));
        assert_eq!(food.blocks()[15].position(), Vec2::new(28.0, 28.0));
        assert_eq!(grid.len(), 16);
    }

    #[test]
    fn test_overlap_is_deduplicated() {
        let mut scene = scene();
        let root = scene.root();
        let mut grid = OccupancyGrid::new(8.0);
        let a = Feature::polygon(vec![square(0.0, 0.0, 32.0)]);
        let b = Feature::polygon(vec![square(16.0, 16.0, 32.0)]);
        Food::new(&mut scene, root, &a, "A".into(), 8.0, colors::FOOD[0], &mut grid);
        let second = Food::new(&mut scene, root, &b, "B".into(), 8.0, colors::FOOD[1], &mut grid);
        assert_eq!(second.blocks().len(), 12);
    }

    #[test]
    fn test_degenerate_polygon_yields_one_block() {
        let mut scene = scene();
        let root = scene.root();
        let mut grid = OccupancyGrid::new(8.0);
        let line = Feature::polygon(vec![vec![
            DVec2::new(0.0, 100.0),
            DVec2::new(40.0, 100.0),
            DVec2::new(0.0, 100.0),
        ]]);
        let food = Food::new(&mut scene, root, &line, "L".into(), 8.0, colors::FOOD[2], &mut grid);
        assert_eq!(food.blocks().len(), 1);

        // same cell again is already claimed
        let again = Food::new(&mut scene, root, &line, "L".into(), 8.0, colors::FOOD[2], &mut grid);
        assert!(again.is_empty());
        assert!(again.is_removed());
    }

    #[test]
    fn test_collide_takes_exact_block() {
        let mut scene = scene();
        let root = scene.root();
        let mut grid = OccupancyGrid::new(8.0);
        let mut food = Food::with_blocks(
            &mut scene,
            root,
            "Alpha".into(),
            8.0,
            &[Vec2::new(520.0, 520.0), Vec2::new(528.0, 520.0)],
            colors::FOOD[3],
            &mut grid,
        );
        assert!(food.collide(Vec2::new(512.0, 520.0)).is_none());
        assert!(food.collide(Vec2::new(521.0, 520.0)).is_none());
        let block = food.collide(Vec2::new(520.0, 520.0)).unwrap();
        assert_eq!(block.position(), Vec2::new(520.0, 520.0));
        assert_eq!(food.blocks().len(), 1);
        assert!(food.collide(Vec2::new(520.0, 520.0)).is_none());
    }
}
