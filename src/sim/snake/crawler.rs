//! The snake

use glam::Vec2;

use super::block::Block;
use crate::consts::{DEFAULT_DEBOUNCE_MS, VIEWPORT_WIDTH};
use crate::controls::{Action, Controls};
use crate::scene::{NodeId, Scene, colors};
use crate::sim::{Entity, Frame};

/// Tail length at which the back half turns into walls
pub const MAX_LENGTH: usize = 512;
/// Leading segments never counted as self-collision
const HEAD_LENGTH: usize = 3;
/// Accumulated delta (ms) before the head advances one cell
const STEP_MS: f32 = 25.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    fn step(self, size: f32) -> Vec2 {
        match self {
            Direction::Left => Vec2::new(-size, 0.0),
            Direction::Right => Vec2::new(size, 0.0),
            Direction::Up => Vec2::new(0.0, -size),
            Direction::Down => Vec2::new(0.0, size),
        }
    }
}

/// Spawn parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnakeParams {
    pub start: Vec2,
    pub direction: Direction,
    pub size: f32,
    /// Wrap vertically instead of crossing the pole
    pub warp_pole: bool,
}

impl SnakeParams {
    /// Start heading left on the cell center nearest the board center
    pub fn new(size: f32, warp_pole: bool) -> Self {
        let center = ((VIEWPORT_WIDTH / 2.0) / size).round() * size + size / 2.0;
        Self {
            start: Vec2::splat(center),
            direction: Direction::Left,
            size,
            warp_pole,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Snake {
    size: f32,
    warp_pole: bool,
    position: Vec2,
    direction: Direction,
    update_time: f32,
    score: usize,
    tail: Vec<Block>,
    walls: Vec<Block>,
    stopped: bool,
}

impl Snake {
    pub fn new(scene: &mut Scene, parent: NodeId, params: SnakeParams) -> Self {
        let tail = (0..HEAD_LENGTH)
            .map(|_| {
                let mut block = Block::new(
                    scene,
                    parent,
                    params.start,
                    params.size,
                    colors::BLOCK_FILL,
                    colors::BLOCK_STROKE,
                );
                block.set_moved(scene);
                block
            })
            .collect();
        Self {
            size: params.size,
            warp_pole: params.warp_pole,
            position: params.start,
            direction: params.direction,
            update_time: 0.0,
            score: 0,
            tail,
            walls: Vec::new(),
            stopped: false,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn tail(&self) -> &[Block] {
        &self.tail
    }

    pub fn walls(&self) -> &[Block] {
        &self.walls
    }

    /// Grow by an eaten food block
    pub fn append(&mut self, scene: &mut Scene, mut block: Block) {
        block.set_moved(scene);
        block.raise(scene);
        self.tail.push(block);
        self.score += 1;
    }

    pub fn score(&self) -> String {
        format!("score {}", self.score)
    }

    pub fn label(&self) -> String {
        format!("max length {}/{MAX_LENGTH}", self.tail.len())
    }

    fn steer(&mut self, controls: &mut Controls) {
        let d = DEFAULT_DEBOUNCE_MS;
        self.direction = if controls.probe(Action::Left, d) && self.direction != Direction::Right {
            Direction::Left
        } else if controls.probe(Action::Right, d) && self.direction != Direction::Left {
            Direction::Right
        } else if controls.probe(Action::Up, d) && self.direction != Direction::Down {
            Direction::Up
        } else if controls.probe(Action::Down, d) && self.direction != Direction::Up {
            Direction::Down
        } else {
            self.direction
        };
    }

    /// Nearest cell center; food is rasterized on centers `k * size + size / 2`
    fn snap(&self, v: f32) -> f32 {
        let half = self.size / 2.0;
        ((v - half) / self.size).round() * self.size + half
    }

    /// First and last cell centers inside `[min, max]`
    fn edge_cells(&self, min: f32, max: f32) -> (f32, f32) {
        let half = self.size / 2.0;
        (
            (min / self.size).ceil() * self.size + half,
            (max / self.size).floor() * self.size - half,
        )
    }

    /// Keep the head on the board: x wraps, y either wraps or crosses the
    /// pole to the opposite meridian and turns back
    fn wrap(&mut self, frame: &Frame) {
        let (min, max) = (frame.bounds.min, frame.bounds.max);
        let (first_x, last_x) = self.edge_cells(min.x, max.x);
        let (first_y, last_y) = self.edge_cells(min.y, max.y);
        let Vec2 { x, y } = self.position;

        if x < min.x {
            self.position.x = last_x;
        } else if x > max.x {
            self.position.x = first_x;
        }

        if self.warp_pole {
            if y < min.y {
                self.position.y = last_y;
            } else if y > max.y {
                self.position.y = first_y;
            }
            return;
        }

        let width = frame.bounds.width();
        if y < min.y || y > max.y {
            let shift = self.position.x - min.x + width / 2.0;
            let x = min.x + if shift > width { shift - width } else { shift };
            self.position.x = self.snap(x).clamp(first_x, last_x);
            if y < min.y {
                self.position.y += self.size;
                self.direction = Direction::Down;
            } else {
                self.position.y -= self.size;
                self.direction = Direction::Up;
            }
        }
    }

    fn follow(&mut self, scene: &mut Scene) {
        let mut target = self.position;
        for block in &mut self.tail {
            block.move_to(scene, target);
            target = block.last_position();
        }
    }

    fn build_walls(&mut self, scene: &mut Scene) {
        if self.tail.len() < MAX_LENGTH {
            return;
        }
        let mut wall = self.tail.split_off(MAX_LENGTH / 2 + 1);
        for block in &mut wall {
            block.freeze(scene);
        }
        log::debug!("Snake reached {MAX_LENGTH}; {} blocks became walls", wall.len());
        self.walls.append(&mut wall);
    }

    fn hits_itself(&self) -> bool {
        let Some(head) = self.tail.first().map(Block::position) else {
            return false;
        };
        let body = self
            .tail
            .get(HEAD_LENGTH..self.tail.len().saturating_sub(1))
            .unwrap_or_default();
        body.iter().chain(&self.walls).any(|b| b.position() == head)
    }
}

impl Entity for Snake {
    fn update(&mut self, frame: &Frame, controls: &mut Controls, scene: &mut Scene) {
        if self.stopped {
            return;
        }
        self.steer(controls);

        if self.update_time > STEP_MS {
            self.position += self.direction.step(self.size);
            self.update_time = 0.0;
        }
        self.update_time += frame.delta_time;

        self.wrap(frame);
        self.follow(scene);
        self.build_walls(scene);

        if self.hits_itself() {
            self.stopped = true;
            for block in &mut self.tail {
                block.freeze(scene);
            }
            log::info!("Snake stopped with {}", self.score());
        }
    }

    fn is_removed(&self) -> bool {
        self.stopped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controls::KeyBindings;
    use crate::scene::{Element, Tag};

    const LEFT: u32 = 65;
    const RIGHT: u32 = 68;
    const UP: u32 = 87;
    const DOWN: u32 = 83;

    struct Rig {
        scene: Scene,
        controls: Controls,
        now: f64,
    }

    impl Rig {
        fn new() -> Self {
            Self {
                scene: Scene::new(Element::new(Tag::Svg)),
                controls: Controls::new(&KeyBindings::default()),
                now: 0.0,
            }
        }

        fn snake(&mut self, params: SnakeParams) -> Snake {
            let root = self.scene.root();
            Snake::new(&mut self.scene, root, params)
        }

        fn step(&mut self, snake: &mut Snake, dt: f64) {
            self.now += dt;
            self.controls.set_time(self.now);
            snake.update(&Frame::new(self.now, dt as f32), &mut self.controls, &mut self.scene);
        }

        fn press(&mut self, code: u32) {
            for key in [LEFT, RIGHT, UP, DOWN] {
                self.controls.key_up(key);
            }
            self.controls.key_down(code);
        }
    }

    #[test]
    fn test_starts_centered_with_three_segments() {
        let mut rig = Rig::new();
        let snake = rig.snake(SnakeParams::new(8.0, false));
        assert_eq!(snake.position(), Vec2::new(516.0, 516.0));
        assert_eq!(snake.tail().len(), 3);
        assert!(snake.tail().iter().all(Block::is_moved));
        assert_eq!(snake.label(), "max length 3/512");
        assert_eq!(snake.score(), "score 0");
    }

    #[test]
    fn test_moves_after_25ms_accumulate() {
        let mut rig = Rig::new();
        let mut snake = rig.snake(SnakeParams::new(8.0, false));
        rig.step(&mut snake, 16.0);
        rig.step(&mut snake, 16.0);
        assert_eq!(snake.position(), Vec2::new(516.0, 516.0));
        rig.step(&mut snake, 16.0);
        assert_eq!(snake.position(), Vec2::new(508.0, 516.0));
    }

    #[test]
    fn test_body_follows_head() {
        let mut rig = Rig::new();
        let mut snake = rig.snake(SnakeParams::new(8.0, false));
        rig.step(&mut snake, 30.0);
        for _ in 0..3 {
            rig.step(&mut snake, 30.0);
        }
        let positions: Vec<Vec2> = snake.tail().iter().map(Block::position).collect();
        assert_eq!(
            positions,
            vec![Vec2::new(492.0, 516.0), Vec2::new(500.0, 516.0), Vec2::new(508.0, 516.0)]
        );
    }

    #[test]
    fn test_no_direct_reversal() {
        let mut rig = Rig::new();
        let mut snake = rig.snake(SnakeParams::new(8.0, false));
        rig.press(RIGHT);
        rig.step(&mut snake, 30.0);
        assert_eq!(snake.direction(), Direction::Left);
        rig.press(UP);
        rig.step(&mut snake, 30.0);
        assert_eq!(snake.direction(), Direction::Up);
    }

    #[test]
    fn test_x_wraps_to_opposite_edge() {
        let mut rig = Rig::new();
        let mut snake = rig.snake(SnakeParams {
            start: Vec2::new(4.0, 100.0),
            ..SnakeParams::new(8.0, false)
        });
        rig.step(&mut snake, 30.0);
        rig.step(&mut snake, 30.0);
        assert_eq!(snake.position(), Vec2::new(1020.0, 100.0));
    }

    #[test]
    fn test_crossing_the_pole_shifts_and_turns() {
        let mut rig = Rig::new();
        let mut snake = rig.snake(SnakeParams {
            start: Vec2::new(100.0, 4.0),
            direction: Direction::Up,
            ..SnakeParams::new(8.0, false)
        });
        rig.step(&mut snake, 30.0);
        rig.step(&mut snake, 30.0);
        assert_eq!(snake.position(), Vec2::new(612.0, 4.0));
        assert_eq!(snake.direction(), Direction::Down);

        let mut snake = rig.snake(SnakeParams {
            start: Vec2::new(700.0, 1020.0),
            direction: Direction::Down,
            ..SnakeParams::new(8.0, false)
        });
        rig.step(&mut snake, 30.0);
        rig.step(&mut snake, 30.0);
        assert_eq!(snake.position(), Vec2::new(188.0, 1020.0));
        assert_eq!(snake.direction(), Direction::Up);
    }

    #[test]
    fn test_odd_cell_size_stays_on_food_lattice() {
        let mut rig = Rig::new();
        let params = SnakeParams::new(12.0, false);
        assert_eq!(params.start, Vec2::new(522.0, 522.0));

        let mut snake = rig.snake(SnakeParams {
            start: Vec2::new(6.0, 102.0),
            ..params
        });
        rig.step(&mut snake, 30.0);
        rig.step(&mut snake, 30.0);
        assert_eq!(snake.position(), Vec2::new(1014.0, 102.0));

        let mut snake = rig.snake(SnakeParams {
            start: Vec2::new(1014.0, 102.0),
            direction: Direction::Right,
            ..params
        });
        rig.step(&mut snake, 30.0);
        rig.step(&mut snake, 30.0);
        assert_eq!(snake.position(), Vec2::new(6.0, 102.0));

        // half a board over is not a whole number of cells; snap to one
        let mut snake = rig.snake(SnakeParams {
            start: Vec2::new(102.0, 6.0),
            direction: Direction::Up,
            ..params
        });
        rig.step(&mut snake, 30.0);
        rig.step(&mut snake, 30.0);
        assert_eq!(snake.position(), Vec2::new(618.0, 6.0));
        assert_eq!(snake.direction(), Direction::Down);
    }

    #[test]
    fn test_warp_pole_wraps_vertically() {
        let mut rig = Rig::new();
        let mut snake = rig.snake(SnakeParams {
            start: Vec2::new(100.0, 4.0),
            direction: Direction::Up,
            ..SnakeParams::new(8.0, true)
        });
        rig.step(&mut snake, 30.0);
        rig.step(&mut snake, 30.0);
        assert_eq!(snake.position(), Vec2::new(100.0, 1020.0));
        assert_eq!(snake.direction(), Direction::Up);
    }

    #[test]
    fn test_running_into_itself_stops() {
        let mut rig = Rig::new();
        let mut snake = rig.snake(SnakeParams::new(8.0, false));
        rig.step(&mut snake, 30.0);
        for _ in 0..3 {
            rig.step(&mut snake, 30.0);
        }
        let root = rig.scene.root();
        for i in 0..4 {
            let block = Block::new(&mut rig.scene, root, Vec2::new(100.0, 100.0 + 8.0 * i as f32), 8.0, "#fff", "#000");
            snake.append(&mut rig.scene, block);
        }
        assert_eq!(snake.tail().len(), 7);

        rig.press(UP);
        rig.step(&mut snake, 30.0);
        rig.press(RIGHT);
        rig.step(&mut snake, 30.0);
        assert!(!snake.is_stopped());
        rig.press(DOWN);
        rig.step(&mut snake, 30.0);

        assert!(snake.is_stopped());
        assert_eq!(snake.position(), Vec2::new(500.0, 516.0));
        let head = snake.tail()[0].node();
        assert_eq!(rig.scene.attr(head, "fill"), Some("#000"));

        // stopped snakes ignore further updates
        rig.step(&mut snake, 30.0);
        assert_eq!(snake.position(), Vec2::new(500.0, 516.0));
    }

    #[test]
    fn test_long_tail_freezes_into_walls() {
        let mut rig = Rig::new();
        let mut snake = rig.snake(SnakeParams::new(8.0, false));
        rig.step(&mut snake, 30.0);
        for _ in 0..3 {
            rig.step(&mut snake, 30.0);
        }
        let root = rig.scene.root();
        for i in 0..(MAX_LENGTH - 3) {
            let p = Vec2::new(4.0 + 8.0 * (i % 100) as f32, 4.0 + 8.0 * (i / 100) as f32);
            let block = Block::new(&mut rig.scene, root, p, 8.0, "#fff", "#000");
            snake.append(&mut rig.scene, block);
        }
        assert_eq!(snake.tail().len(), MAX_LENGTH);

        rig.step(&mut snake, 30.0);
        assert!(!snake.is_stopped());
        assert_eq!(snake.tail().len(), MAX_LENGTH / 2 + 1);
        assert_eq!(snake.walls().len(), MAX_LENGTH - (MAX_LENGTH / 2 + 1));
        assert!(snake.walls().iter().all(|b| !b.is_moved()));
        assert_eq!(snake.label(), "max length 257/512");
        assert_eq!(snake.score(), "score 509");
    }
}
