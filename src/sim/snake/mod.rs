//! Map Snake
//!
//! Features become food rasterized on the snake's grid. Screens: cover
//! (static food preview) and main; the main screen shows its own game over
//! once the snake stops.

pub mod block;
pub mod crawler;
pub mod food;
pub mod grid;

use glam::DVec2;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

pub use block::Block;
pub use crawler::{Direction, MAX_LENGTH, Snake, SnakeParams};
pub use food::Food;
pub use grid::OccupancyGrid;

use super::{Entity, Frame, FrameClock};
use crate::consts::{MARGIN, MODE_DEBOUNCE_MS, VIEWPORT_HEIGHT, VIEWPORT_WIDTH};
use crate::controls::{Action, Controls, KeyBindings};
use crate::geo::{FeatureCollection, ProjectedFeature, Viewport, project};
use crate::scene::{Element, NodeId, Scene, colors};
use crate::screen::Screen;
use crate::settings::Settings;

/// Active screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Cover,
    Main,
}

fn hud_label(x: f32, y: f32, size: u32) -> Element {
    Element::label(x, y, size, colors::DARK)
        .attr("font-weight", "bold")
        .attr("stroke", colors::WHITE)
}

fn spawn_feed(
    scene: &mut Scene,
    group: NodeId,
    features: &[ProjectedFeature],
    settings: &Settings,
    grid: &mut OccupancyGrid,
    rng: &mut Pcg32,
) -> Vec<Food> {
    features
        .iter()
        .map(|f| {
            let palette = colors::FOOD[rng.random_range(0..colors::FOOD.len())];
            let name = f.name(&settings.property_name);
            Food::new(scene, group, f, name, settings.cell_size, palette, grid)
        })
        .filter(|food| !food.is_empty())
        .collect()
}

/// Entities and HUD handles of one play session
#[derive(Debug)]
pub struct SnakeRound {
    pub feed: Vec<Food>,
    pub snake: Snake,
    score_label: NodeId,
    name_label: NodeId,
    max_length_label: NodeId,
    game_over_label: NodeId,
    press_start_label: NodeId,
    game_over: bool,
}

impl SnakeRound {
    /// Lay out the HUD, then let `spawn` fill the play layer before the
    /// snake is placed on top
    pub fn new<F>(scene: &mut Scene, group: NodeId, params: SnakeParams, spawn: F) -> Self
    where
        F: FnOnce(&mut Scene, NodeId) -> Vec<Food>,
    {
        let (w, h) = (VIEWPORT_WIDTH, VIEWPORT_HEIGHT);
        let background = scene.append(group, Element::group());
        let score_label = scene.append(group, hud_label(w / 2.0, 32.0, 16));
        let name_label = scene.append(group, hud_label(w / 2.0, 64.0, 16).text(""));
        let game_over_label = scene.append(
            group,
            hud_label(w / 2.0, h / 2.0, 64)
                .style("display", "none")
                .text("GAME OVER"),
        );
        let press_start_label = scene.append(
            group,
            hud_label(w / 2.0, h / 2.0 + 64.0, 32)
                .style("display", "none")
                .text("PRESS START"),
        );
        let max_length_label = scene.append(group, hud_label(w / 2.0, h - 32.0, 16));

        let feed = spawn(scene, background);
        let snake = Snake::new(scene, background, params);
        scene.set_text(max_length_label, snake.label());
        scene.set_text(score_label, snake.score());

        Self {
            feed,
            snake,
            score_label,
            name_label,
            max_length_label,
            game_over_label,
            press_start_label,
            game_over: false,
        }
    }

    /// The game-over labels are showing
    pub fn is_over(&self) -> bool {
        self.game_over
    }

    pub fn score_label(&self) -> NodeId {
        self.score_label
    }

    pub fn name_label(&self) -> NodeId {
        self.name_label
    }

    pub fn game_over_label(&self) -> NodeId {
        self.game_over_label
    }

    pub fn update(&mut self, frame: &Frame, controls: &mut Controls, scene: &mut Scene) {
        if self.snake.is_stopped() {
            if !self.game_over {
                scene.set_style(self.game_over_label, "display", "block");
                scene.set_style(self.press_start_label, "display", "block");
                self.game_over = true;
            }
            return;
        }

        let head = self.snake.position();
        for food in &mut self.feed {
            if let Some(block) = food.collide(head) {
                self.snake.append(scene, block);
                scene.set_text(self.name_label, food.name());
                scene.set_text(self.max_length_label, self.snake.label());
                scene.set_text(self.score_label, self.snake.score());
            }
        }
        self.snake.update(frame, controls, scene);
    }
}

/// Snake session: orchestrates screens and the per-frame update
#[derive(Debug)]
pub struct SnakeGame {
    settings: Settings,
    features: Vec<ProjectedFeature>,
    controls: Controls,
    scene: Scene,
    cover: Screen<Vec<Food>>,
    main: Screen<SnakeRound>,
    mode: Mode,
    grid: OccupancyGrid,
    rng: Pcg32,
    now: f64,
    clock: FrameClock,
}

impl SnakeGame {
    pub fn new(
        collection: &FeatureCollection,
        settings: Settings,
        bindings: &KeyBindings,
        projection: Option<&dyn Fn(DVec2) -> DVec2>,
    ) -> Self {
        let mut rng = Pcg32::seed_from_u64(settings.seed);
        let mut features = project(
            &collection.features,
            Viewport::centered(VIEWPORT_WIDTH as f64, VIEWPORT_HEIGHT as f64),
            projection,
            settings.flip_y_coords,
        );
        features.shuffle(&mut rng);
        log::info!("Snake session with {} features", features.len());

        let (mut scene, layer) = Scene::framed(
            VIEWPORT_WIDTH,
            VIEWPORT_HEIGHT,
            MARGIN,
            colors::OFF_WHITE,
            colors::DARK,
        );
        let cover = Screen::new(&mut scene, layer);
        let main = Screen::new(&mut scene, layer);

        let mut game = Self {
            grid: OccupancyGrid::new(settings.cell_size),
            settings,
            features,
            controls: Controls::new(bindings),
            scene,
            cover,
            main,
            mode: Mode::Cover,
            rng,
            now: 0.0,
            clock: FrameClock::new(),
        };
        game.init_cover();
        game
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn controls_mut(&mut self) -> &mut Controls {
        &mut self.controls
    }

    pub fn set_bindings(&mut self, bindings: &KeyBindings) {
        self.controls.set_keys(bindings);
    }

    pub fn key_down(&mut self, code: u32) {
        self.controls.key_down(code);
    }

    pub fn key_up(&mut self, code: u32) {
        self.controls.key_up(code);
    }

    pub fn round(&self) -> Option<&SnakeRound> {
        self.main.state()
    }

    pub fn round_mut(&mut self) -> Option<&mut SnakeRound> {
        self.main.state_mut()
    }

    /// Food shown on the cover screen
    pub fn preview(&self) -> Option<&[Food]> {
        self.cover.state().map(Vec::as_slice)
    }

    pub fn screen_group(&self, mode: Mode) -> NodeId {
        match mode {
            Mode::Cover => self.cover.group(),
            Mode::Main => self.main.group(),
        }
    }

    pub fn to_svg(&self) -> String {
        self.scene.to_svg()
    }

    /// Host animation callback; throttled to the frame rate
    pub fn frame(&mut self, now_ms: f64) -> bool {
        match self.clock.tick(now_ms) {
            Some(delta) => {
                self.step(delta);
                true
            }
            None => false,
        }
    }

    pub fn step(&mut self, delta_ms: f64) {
        self.now += delta_ms;
        self.controls.set_time(self.now);

        let last = self.mode;
        let mut current = last;
        if current == Mode::Cover && self.mode_key() {
            current = Mode::Main;
        }
        let over = self.main.state().is_some_and(SnakeRound::is_over);
        if current == Mode::Main && over && self.mode_key() {
            current = Mode::Cover;
        }

        if last != current {
            log::info!("Snake: {last:?} -> {current:?}");
            match current {
                Mode::Main => {
                    self.cover.remove(&mut self.scene);
                    self.init_main();
                }
                Mode::Cover => {
                    self.main.remove(&mut self.scene);
                    self.init_cover();
                }
            }
        }
        self.mode = current;

        let frame = Frame::new(self.now, delta_ms as f32);
        if let Some(round) = self.main.state_mut() {
            round.update(&frame, &mut self.controls, &mut self.scene);
        }
    }

    fn mode_key(&mut self) -> bool {
        self.controls.probe(Action::Start, MODE_DEBOUNCE_MS)
            || self.controls.probe(Action::Select, MODE_DEBOUNCE_MS)
            || self.controls.probe(Action::ButtonA, MODE_DEBOUNCE_MS)
    }

    fn init_cover(&mut self) {
        self.grid.clear();
        let features = &self.features;
        let settings = &self.settings;
        let grid = &mut self.grid;
        let rng = &mut self.rng;
        self.cover.init(&mut self.scene, |scene, group| {
            let feed = spawn_feed(scene, group, features, settings, grid, rng);
            let (w, h) = (VIEWPORT_WIDTH, VIEWPORT_HEIGHT);
            scene.append(group, Element::label(w / 2.0, h / 2.0, 64, colors::DARK).text("MAP SNAKE"));
            scene.append(group, hud_label(w / 2.0, h / 2.0 + 64.0, 32).text("PRESS START"));
            feed
        });
    }

    fn init_main(&mut self) {
        self.controls.reset();
        self.grid.clear();
        let params = SnakeParams::new(self.settings.cell_size, self.settings.warp_pole);
        let features = &self.features;
        let settings = &self.settings;
        let grid = &mut self.grid;
        let rng = &mut self.rng;
        self.main.init(&mut self.scene, |scene, group| {
            SnakeRound::new(scene, group, params, |scene, background| {
                spawn_feed(scene, background, features, settings, grid, rng)
            })
        });
    }
}
