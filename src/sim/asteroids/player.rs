//! Player ship

use glam::Vec2;

use super::bullet::Bullet;
use crate::consts::TIME_SCALE;
use crate::controls::{Action, Controls};
use crate::heading;
use crate::scene::{Element, NodeId, Scene, Tag, build_closed_path, colors, compose_transform};
use crate::sim::{Entity, Frame, HitInfo};

/// Half extent of the ship outline
pub const PLAYER_SIZE: f32 = 16.0;
pub const PLAYER_MAX_HP: u32 = 100;

const HIT_DAMAGE: u32 = 10;
const INVULNERABLE_MS: f64 = 1000.0;
/// Rocks smaller than this hit on the broad-phase radius alone
const SMALL_ROCK_RADIUS: f32 = 20.0;

const TURN_DEG: f32 = 10.0;
const THRUST_STEP: f32 = 0.5;
const THRUST_MAX: f32 = 10.0;
const THRUST_DECAY: f32 = 0.1;
const FIRE_DEBOUNCE_MS: f64 = 400.0;
/// Spawn distance above the bottom edge
const SPAWN_OFFSET: f32 = 64.0;

#[derive(Debug, Clone)]
pub struct Player {
    parent: NodeId,
    node: NodeId,
    /// Unset until the first update places the ship
    position: Option<Vec2>,
    /// Degrees, 0 points up
    rotation: f32,
    thrust: f32,
    hp: u32,
    invulnerable_until: Option<f64>,
    bullets: Vec<Bullet>,
}

impl Player {
    pub fn new(scene: &mut Scene, parent: NodeId) -> Self {
        let s = PLAYER_SIZE;
        let outline = [[-s, s], [0.0, s / 2.0], [s, s], [0.0, -s]].map(|[x, y]| [x as f64, y as f64]);
        let node = scene.append(
            parent,
            Element::group()
                .attr("fill", "transparent")
                .attr("stroke", colors::WHITE)
                .attr("stroke-width", 3),
        );
        scene.append(
            node,
            Element::new(Tag::Path).attr("d", build_closed_path(&outline, true)),
        );
        Self {
            parent,
            node,
            position: None,
            rotation: 0.0,
            thrust: 0.0,
            hp: PLAYER_MAX_HP,
            invulnerable_until: None,
            bullets: Vec::new(),
        }
    }

    /// Put the ship at a position and heading
    pub fn place(&mut self, position: Vec2, rotation: f32) {
        self.position = Some(position);
        self.rotation = rotation;
    }

    pub fn position(&self) -> Option<Vec2> {
        self.position
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn thrust(&self) -> f32 {
        self.thrust
    }

    pub fn hp(&self) -> u32 {
        self.hp
    }

    pub fn bullets(&self) -> &[Bullet] {
        &self.bullets
    }

    pub fn bullets_mut(&mut self) -> &mut [Bullet] {
        &mut self.bullets
    }

    /// Inside the post-hit invulnerability window
    pub fn is_hit(&self, now: f64) -> bool {
        self.invulnerable_until.is_some_and(|until| now < until)
    }

    /// Test the ship against a rock or an armed bullet. A hit costs hp and
    /// starts the invulnerability window.
    pub fn collide(&mut self, info: &HitInfo, now: f64) -> bool {
        if self.is_hit(now) {
            return false;
        }
        let Some(position) = self.position else {
            return false;
        };
        if position.distance(info.center) >= info.radius + PLAYER_SIZE {
            return false;
        }
        let hit = info.radius < SMALL_ROCK_RADIUS || info.boxes.iter().any(|b| b.contains_strict(position));
        if hit {
            self.hp = self.hp.saturating_sub(HIT_DAMAGE);
            self.invulnerable_until = Some(now + INVULNERABLE_MS);
            log::debug!("Player hit, hp {}", self.hp);
        }
        hit
    }
}

impl Entity for Player {
    fn update(&mut self, frame: &Frame, controls: &mut Controls, scene: &mut Scene) {
        self.bullets.retain(|b| !b.is_removed());

        let bounds = frame.bounds;
        let position = *self.position.get_or_insert_with(|| {
            Vec2::new((bounds.min.x + bounds.max.x) / 2.0, bounds.max.y - SPAWN_OFFSET)
        });

        if controls.probe(Action::Left, 0.0) {
            self.rotation -= TURN_DEG;
        } else if controls.probe(Action::Right, 0.0) {
            self.rotation += TURN_DEG;
        }

        let hit = self.is_hit(frame.now);
        if !hit && controls.probe(Action::ButtonA, FIRE_DEBOUNCE_MS) {
            self.bullets
                .push(Bullet::new(scene, self.parent, position, self.rotation));
        }
        for bullet in &mut self.bullets {
            bullet.update(frame, controls, scene);
        }

        if controls.probe(Action::Up, 0.0) {
            if self.thrust < THRUST_MAX {
                self.thrust += THRUST_STEP;
            }
        } else if self.thrust > THRUST_DECAY {
            self.thrust -= THRUST_DECAY;
        } else {
            self.thrust = 0.0;
        }

        let moved = position + heading(self.rotation) * self.thrust * frame.delta_time / TIME_SCALE;
        let position = bounds.wrap(moved);
        self.position = Some(position);

        scene.set_attr(
            self.node,
            "transform",
            compose_transform(position.x, position.y, self.rotation, 1.0),
        );
        if hit {
            scene.set_attr(self.node, "stroke", colors::HIT);
            scene.set_attr(self.node, "stroke-opacity", (frame.time * 10.0).sin().abs());
        } else {
            scene.set_attr(self.node, "stroke", colors::WHITE);
            scene.set_attr(self.node, "stroke-opacity", 1);
        }
    }

    fn is_removed(&self) -> bool {
        self.hp == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controls::KeyBindings;
    use crate::sim::Rect;

    fn setup() -> (Scene, Player, Controls) {
        let mut scene = Scene::new(Element::new(Tag::Svg));
        let root = scene.root();
        let player = Player::new(&mut scene, root);
        (scene, player, Controls::new(&KeyBindings::default()))
    }

    fn rock(center: Vec2, radius: f32, boxes: Vec<Rect>) -> HitInfo {
        HitInfo { center, radius, boxes }
    }

    #[test]
    fn test_spawns_bottom_center() {
        let (mut scene, mut player, mut controls) = setup();
        assert!(player.position().is_none());
        player.update(&Frame::new(0.0, 0.0), &mut controls, &mut scene);
        assert_eq!(player.position(), Some(Vec2::new(512.0, 960.0)));
    }

    #[test]
    fn test_rotation_left_wins() {
        let (mut scene, mut player, mut controls) = setup();
        controls.key_down(65);
        controls.key_down(68);
        player.update(&Frame::new(16.0, 16.0), &mut controls, &mut scene);
        assert_eq!(player.rotation(), -10.0);
        controls.key_up(65);
        player.update(&Frame::new(32.0, 16.0), &mut controls, &mut scene);
        assert_eq!(player.rotation(), 0.0);
    }

    #[test]
    fn test_thrust_builds_caps_and_decays() {
        let (mut scene, mut player, mut controls) = setup();
        player.place(Vec2::new(512.0, 512.0), 0.0);
        controls.key_down(87);
        for i in 0..30 {
            controls.set_time(i as f64 * 16.0);
            player.update(&Frame::new(i as f64 * 16.0, 16.0), &mut controls, &mut scene);
        }
        assert_eq!(player.thrust(), 10.0);
        // moving up the screen
        assert!(player.position().unwrap().y < 512.0);

        controls.key_up(87);
        for _ in 0..200 {
            player.update(&Frame::new(1000.0, 16.0), &mut controls, &mut scene);
        }
        assert_eq!(player.thrust(), 0.0);
    }

    #[test]
    fn test_fire_debounced() {
        let (mut scene, mut player, mut controls) = setup();
        controls.key_down(32);
        for i in 0..25 {
            let now = i as f64 * 20.0;
            controls.set_time(now);
            player.update(&Frame::new(now, 20.0), &mut controls, &mut scene);
        }
        // fired at 0 and 400
        assert_eq!(player.bullets().len(), 2);
    }

    #[test]
    fn test_hit_costs_hp_then_invulnerable() {
        let (mut scene, mut player, mut controls) = setup();
        player.place(Vec2::new(100.0, 100.0), 0.0);
        let small = rock(Vec2::new(110.0, 100.0), 5.0, Vec::new());

        assert!(player.collide(&small, 0.0));
        assert_eq!(player.hp(), 90);
        assert!(!player.collide(&small, 500.0));
        assert_eq!(player.hp(), 90);

        // no firing while hit
        controls.key_down(32);
        player.update(&Frame::new(500.0, 16.0), &mut controls, &mut scene);
        assert!(player.bullets().is_empty());

        assert!(player.collide(&small, 1000.0));
        assert_eq!(player.hp(), 80);
    }

    #[test]
    fn test_large_rock_needs_box() {
        let (_scene, mut player, _controls) = setup();
        player.place(Vec2::new(100.0, 100.0), 0.0);
        let miss = rock(
            Vec2::new(130.0, 100.0),
            40.0,
            vec![Rect::new(Vec2::new(110.0, 60.0), Vec2::new(170.0, 140.0))],
        );
        assert!(!player.collide(&miss, 0.0));
        let hit = rock(
            Vec2::new(130.0, 100.0),
            40.0,
            vec![Rect::new(Vec2::new(90.0, 60.0), Vec2::new(170.0, 140.0))],
        );
        assert!(player.collide(&hit, 0.0));
        // broad phase rejects far rocks
        let far = rock(Vec2::new(400.0, 400.0), 40.0, Vec::new());
        assert!(!player.collide(&far, 5000.0));
    }

    #[test]
    fn test_hp_never_underflows() {
        let (_scene, mut player, _controls) = setup();
        player.place(Vec2::ZERO, 0.0);
        let small = rock(Vec2::ZERO, 1.0, Vec::new());
        for i in 0..15 {
            player.collide(&small, i as f64 * 1000.0);
        }
        assert_eq!(player.hp(), 0);
        assert!(player.is_removed());
    }
}
