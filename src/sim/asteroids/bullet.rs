//! Player bullets

use glam::Vec2;

use crate::controls::Controls;
use crate::heading;
use crate::scene::{Element, NodeId, Scene, Tag, colors, compose_transform};
use crate::sim::{Entity, Frame, HitInfo};

/// Lifetime before self-destruction (ms)
pub const BULLET_LIFETIME_MS: f32 = 5000.0;
pub const BULLET_RADIUS: f32 = 3.0;
/// Age after which a bullet can hit the ship (ms)
const ARMED_AFTER_MS: f32 = 1000.0;

#[derive(Debug, Clone)]
pub struct Bullet {
    position: Vec2,
    /// Firing heading in degrees
    rotation: f32,
    remaining: f32,
    removed: bool,
    node: NodeId,
}

impl Bullet {
    pub fn new(scene: &mut Scene, parent: NodeId, position: Vec2, rotation: f32) -> Self {
        let node = scene.append(
            parent,
            Element::group()
                .attr("fill", colors::WHITE)
                .attr("transform", compose_transform(position.x, position.y, 0.0, 1.0)),
        );
        scene.append(node, Element::new(Tag::Circle).attr("r", BULLET_RADIUS));
        Self {
            position,
            rotation,
            remaining: BULLET_LIFETIME_MS,
            removed: false,
            node,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Collision volume against the ship, once armed
    pub fn info(&self) -> Option<HitInfo> {
        if self.removed || self.remaining >= BULLET_LIFETIME_MS - ARMED_AFTER_MS {
            return None;
        }
        Some(HitInfo {
            center: self.position,
            radius: BULLET_RADIUS,
            boxes: Vec::new(),
        })
    }

    pub fn remove(&mut self, scene: &mut Scene) {
        if self.removed {
            return;
        }
        self.removed = true;
        scene.remove(self.node);
    }
}

impl Entity for Bullet {
    fn update(&mut self, frame: &Frame, _controls: &mut Controls, scene: &mut Scene) {
        if self.removed {
            return;
        }
        self.position = frame
            .bounds
            .wrap(self.position + heading(self.rotation) * frame.delta_time);
        scene.set_attr(
            self.node,
            "transform",
            compose_transform(self.position.x, self.position.y, 0.0, 1.0),
        );

        self.remaining -= frame.delta_time;
        if self.remaining < 0.0 {
            self.remove(scene);
        }
    }

    fn is_removed(&self) -> bool {
        self.removed
    }
}
