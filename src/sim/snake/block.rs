//! Grid blocks: food cells, snake segments and walls

use glam::Vec2;

use crate::scene::{Element, NodeId, Scene, Tag, compose_transform};

const FROZEN_FILL: &str = "#000";
const FROZEN_STROKE: &str = "#333";

#[derive(Debug, Clone)]
pub struct Block {
    node: NodeId,
    position: Vec2,
    last_position: Vec2,
    moved: bool,
}

impl Block {
    pub fn new(scene: &mut Scene, parent: NodeId, position: Vec2, size: f32, fill: &str, stroke: &str) -> Self {
        let node = scene.append(
            parent,
            Element::group()
                .attr("fill", fill)
                .attr("stroke", stroke)
                .attr("stroke-width", 0.5)
                .attr("transform", compose_transform(position.x, position.y, 0.0, 1.0)),
        );
        scene.append(
            node,
            Element::new(Tag::Rect)
                .attr("x", -size / 2.0)
                .attr("y", -size / 2.0)
                .attr("width", size)
                .attr("height", size),
        );
        Self {
            node,
            position,
            last_position: position,
            moved: false,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Position before the latest change
    pub fn last_position(&self) -> Vec2 {
        self.last_position
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Part of a snake
    pub fn is_moved(&self) -> bool {
        self.moved
    }

    pub fn set_moved(&mut self, scene: &mut Scene) {
        self.moved = true;
        scene.set_attr(self.node, "stroke-width", 3);
    }

    /// Draw above its siblings
    pub fn raise(&self, scene: &mut Scene) {
        scene.raise(self.node);
    }

    /// Follow to `position`; `last_position` only changes on a real move
    pub fn move_to(&mut self, scene: &mut Scene, position: Vec2) {
        if position != self.position {
            self.last_position = self.position;
            self.position = position;
        }
        scene.set_attr(
            self.node,
            "transform",
            compose_transform(self.position.x, self.position.y, 0.0, 1.0),
        );
    }

    /// Turn into an inert wall
    pub fn freeze(&mut self, scene: &mut Scene) {
        self.moved = false;
        scene.set_attr(self.node, "fill", FROZEN_FILL);
        scene.set_attr(self.node, "stroke", FROZEN_STROKE);
        scene.set_attr(self.node, "stroke-width", 0.5);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_position_tracks_real_moves() {
        let mut scene = Scene::new(Element::new(Tag::Svg));
        let root = scene.root();
        let mut block = Block::new(&mut scene, root, Vec2::new(4.0, 4.0), 8.0, "#fff", "#000");
        block.move_to(&mut scene, Vec2::new(12.0, 4.0));
        assert_eq!(block.last_position(), Vec2::new(4.0, 4.0));
        block.move_to(&mut scene, Vec2::new(12.0, 4.0));
        assert_eq!(block.last_position(), Vec2::new(4.0, 4.0));
        assert_eq!(
            scene.attr(block.node(), "transform"),
            Some("rotate(0 12 4) translate(12, 4) scale(1)")
        );
    }

    #[test]
    fn test_moved_and_freeze() {
        let mut scene = Scene::new(Element::new(Tag::Svg));
        let root = scene.root();
        let mut block = Block::new(&mut scene, root, Vec2::ZERO, 8.0, "#fff", "#000");
        block.set_moved(&mut scene);
        assert!(block.is_moved());
        assert_eq!(scene.attr(block.node(), "stroke-width"), Some("3"));
        block.freeze(&mut scene);
        assert!(!block.is_moved());
        assert_eq!(scene.attr(block.node(), "fill"), Some("#000"));
    }
}
