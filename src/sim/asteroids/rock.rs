//! Rocks: one per projected feature

use glam::{DVec2, Vec2};

use crate::consts::TIME_SCALE;
use crate::controls::Controls;
use crate::geo::{BBox, ProjectedFeature};
use crate::scene::{Element, NodeId, Scene, Tag, build_closed_path, colors, compose_transform};
use crate::sim::{Entity, Frame, HitInfo, Rect};

/// Scale a rock spawns at before shrinking into place
pub const SPAWN_SCALE: f32 = 2.0;
const SETTLED_SCALE: f32 = 1.0;
/// Scale units lost per millisecond while forming
const SHRINK_RATE: f32 = 1.0 / 6000.0;
/// Delay between destruction and leaving the scene
const DETACH_DELAY_MS: f64 = 200.0;
/// Rocks thinner than this also accept hits near their center
const TINY_SIDE: f32 = 10.0;
const TINY_HIT_DISTANCE: f32 = 10.0;

#[derive(Debug, Clone)]
pub struct Rock {
    node: NodeId,
    marker: NodeId,
    center: Vec2,
    width: f32,
    height: f32,
    min_side: f32,
    radius: f32,
    /// Per-ring boxes relative to the center, unscaled
    boxes: Vec<Rect>,
    /// Drift heading (radians)
    angle: f32,
    scale: f32,
    removed: bool,
    detach_at: Option<f64>,
    name: String,
}

impl Rock {
    /// Build the rock for `feature`; `None` for a feature without positions
    pub fn new(
        scene: &mut Scene,
        parent: NodeId,
        feature: &ProjectedFeature,
        name: String,
        angle_deg: f32,
    ) -> Option<Self> {
        let bbox = feature.bbox()?;
        let origin = bbox.center();
        let width = bbox.width() as f32;
        let height = bbox.height() as f32;
        let center = origin.as_vec2();

        let node = scene.append(
            parent,
            Element::group()
                .attr("stroke", colors::WHITE)
                .attr("fill", colors::ROCK_FILL)
                .attr("transform", compose_transform(center.x, center.y, 0.0, SPAWN_SCALE)),
        );

        let mut boxes = Vec::new();
        for ring in feature.rings() {
            let local: Vec<DVec2> = ring.iter().map(|&c| c - origin).collect();
            if let Some(b) = BBox::of(local.iter().copied()) {
                boxes.push(Rect::new(b.min.as_vec2(), b.max.as_vec2()));
            }
            scene.append(
                node,
                Element::new(Tag::Path).attr("d", build_closed_path(&local, false)),
            );
        }

        let radius = width.max(height) * std::f32::consts::SQRT_2 / 2.0;
        let marker = scene.append(
            node,
            Element::new(Tag::Circle)
                .attr("r", 4)
                .attr("fill", "transparent")
                .attr("stroke", if radius < 2.0 { colors::OFF_WHITE } else { "transparent" }),
        );

        Some(Self {
            node,
            marker,
            center,
            width,
            height,
            min_side: width.min(height),
            radius,
            boxes,
            angle: crate::rad(angle_deg),
            scale: SPAWN_SCALE,
            removed: false,
            detach_at: None,
            name,
        })
    }

    /// Skip the forming phase (static preview)
    pub fn settle(&mut self, scene: &mut Scene) {
        self.scale = SETTLED_SCALE;
        self.redraw(scene);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn center(&self) -> Vec2 {
        self.center
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    fn scaled_box(&self, b: &Rect) -> Rect {
        Rect::new(b.min * self.scale + self.center, b.max * self.scale + self.center)
    }

    /// Collision volume for the ship
    pub fn info(&self) -> HitInfo {
        HitInfo {
            center: self.center,
            radius: self.radius,
            boxes: self.boxes.iter().map(|b| self.scaled_box(b)).collect(),
        }
    }

    /// Test a bullet position. A hit marks the rock destroyed and schedules
    /// its removal from the scene.
    pub fn collide(&mut self, point: Vec2, now: f64, scene: &mut Scene) -> bool {
        if self.removed {
            return false;
        }
        let half = Vec2::new(self.width, self.height) * self.scale / 2.0;
        let outer = Rect::new(self.center - half, self.center + half);

        let tiny_hit = self.min_side < TINY_SIDE && self.center.distance(point) < TINY_HIT_DISTANCE;
        let box_hit = outer.contains_strict(point)
            && (self.boxes.len() == 1 || self.boxes.iter().any(|b| self.scaled_box(b).contains_strict(point)));
        if !(tiny_hit || box_hit) {
            return false;
        }

        self.removed = true;
        self.detach_at = Some(now + DETACH_DELAY_MS);
        scene.set_attr(self.node, "stroke-dasharray", 10);
        scene.set_attr(self.node, "stroke-width", 2);
        scene.set_attr(self.node, "fill", "transparent");
        scene.set_attr(self.node, "stroke", colors::DESTROYED);
        scene.set_attr(self.marker, "fill", colors::DESTROYED);
        scene.set_attr(self.marker, "stroke", "transparent");
        log::debug!("Rock {:?} destroyed", self.name);
        true
    }

    fn redraw(&self, scene: &mut Scene) {
        scene.set_attr(
            self.node,
            "transform",
            compose_transform(self.center.x, self.center.y, 0.0, self.scale),
        );
    }
}

impl Entity for Rock {
    fn update(&mut self, frame: &Frame, _controls: &mut Controls, scene: &mut Scene) {
        if self.removed {
            if self.detach_at.is_some_and(|at| frame.now >= at) {
                scene.remove(self.node);
                self.detach_at = None;
            }
            return;
        }
        if self.scale > SETTLED_SCALE {
            self.scale = (self.scale - frame.delta_time * SHRINK_RATE).max(SETTLED_SCALE);
        } else {
            let drift = Vec2::new(self.angle.sin(), self.angle.cos()) * frame.delta_time / TIME_SCALE;
            self.center = frame.bounds.wrap(self.center + drift);
        }
        self.redraw(scene);
    }

    fn is_removed(&self) -> bool {
        self.removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controls::KeyBindings;
    use crate::geo::Feature;
    use crate::geo::tests::square;

    fn setup(feature: &Feature) -> (Scene, Rock, Controls) {
        let mut scene = Scene::new(Element::new(Tag::Svg));
        let root = scene.root();
        let rock = Rock::new(&mut scene, root, feature, "Alpha".into(), 90.0).unwrap();
        (scene, rock, Controls::new(&KeyBindings::default()))
    }

    #[test]
    fn test_geometry_from_bbox() {
        let f = Feature::polygon(vec![square(100.0, 200.0, 40.0)]);
        let (_scene, rock, _) = setup(&f);
        assert_eq!(rock.center(), Vec2::new(120.0, 220.0));
        assert!((rock.radius() - 40.0 * std::f32::consts::SQRT_2 / 2.0).abs() < 1e-4);
        assert_eq!(rock.scale(), SPAWN_SCALE);
        let info = rock.info();
        // scaled by 2 around the center
        assert_eq!(info.boxes, vec![Rect::new(Vec2::new(80.0, 180.0), Vec2::new(160.0, 260.0))]);
    }

    #[test]
    fn test_forms_then_drifts() {
        let f = Feature::polygon(vec![square(100.0, 100.0, 40.0)]);
        let (mut scene, mut rock, mut controls) = setup(&f);
        rock.update(&Frame::new(3000.0, 3000.0), &mut controls, &mut scene);
        assert!((rock.scale() - 1.5).abs() < 1e-5);
        assert_eq!(rock.center(), Vec2::new(120.0, 120.0));

        rock.update(&Frame::new(9000.0, 6000.0), &mut controls, &mut scene);
        assert_eq!(rock.scale(), 1.0);

        // angle 90 degrees drifts along +x
        rock.update(&Frame::new(9250.0, 250.0), &mut controls, &mut scene);
        assert!((rock.center() - Vec2::new(130.0, 120.0)).length() < 1e-3);
    }

    #[test]
    fn test_collide_point_and_delayed_detach() {
        let f = Feature::polygon(vec![square(100.0, 100.0, 40.0)]);
        let (mut scene, mut rock, mut controls) = setup(&f);
        let root = scene.root();

        assert!(!rock.collide(Vec2::new(300.0, 300.0), 0.0, &mut scene));
        // inside the doubled box but outside the settled one
        assert!(rock.collide(Vec2::new(85.0, 120.0), 0.0, &mut scene));
        assert!(rock.is_removed());
        assert_eq!(scene.attr(rock.node(), "stroke"), Some(colors::DESTROYED));
        assert_eq!(scene.attr(rock.node(), "stroke-dasharray"), Some("10"));
        assert!(!rock.collide(Vec2::new(120.0, 120.0), 0.0, &mut scene));

        rock.update(&Frame::new(150.0, 150.0), &mut controls, &mut scene);
        assert!(scene.is_alive(rock.node()));
        rock.update(&Frame::new(200.0, 50.0), &mut controls, &mut scene);
        assert!(!scene.is_alive(rock.node()));
        assert!(scene.children(root).is_empty());
    }

    #[test]
    fn test_multi_ring_needs_ring_box() {
        let f = Feature::multi_polygon(vec![
            vec![square(0.0, 0.0, 20.0)],
            vec![square(80.0, 80.0, 20.0)],
        ]);
        let (mut scene, mut rock, _) = setup(&f);
        rock.settle(&mut scene);
        // gap between the two parts, inside the overall box
        assert!(!rock.collide(Vec2::new(50.0, 50.0), 0.0, &mut scene));
        assert!(rock.collide(Vec2::new(90.0, 90.0), 0.0, &mut scene));
    }

    #[test]
    fn test_tiny_rock_center_distance() {
        let f = Feature::polygon(vec![square(100.0, 100.0, 2.0)]);
        let (mut scene, mut rock, _) = setup(&f);
        // outside the box but within 10 units of the center
        assert!(rock.collide(Vec2::new(108.0, 101.0), 0.0, &mut scene));
    }
}
