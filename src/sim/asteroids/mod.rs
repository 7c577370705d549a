//! Map Asteroids
//!
//! Every feature becomes a rock; the ship clears the map by shooting them
//! all. Screens: cover (static preview), main, gameover and win.

pub mod bullet;
pub mod player;
pub mod rock;

use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

pub use bullet::Bullet;
pub use player::Player;
pub use rock::Rock;

use super::{Entity, Frame, FrameClock, HitInfo};
use crate::consts::{MARGIN, MODE_DEBOUNCE_MS, VIEWPORT_HEIGHT, VIEWPORT_WIDTH};
use crate::controls::{Action, Controls, KeyBindings};
use crate::geo::{FeatureCollection, ProjectedFeature, Viewport, project, simplify_features};
use crate::scene::{Element, NodeId, Scene, Tag, colors};
use crate::screen::Screen;
use crate::settings::Settings;

/// Active screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Cover,
    Main,
    GameOver,
    Win,
}

/// Entities and HUD handles of one play session
#[derive(Debug)]
pub struct Round {
    pub rocks: Vec<Rock>,
    pub player: Player,
    name_label: NodeId,
    hp_bar: NodeId,
}

/// What a main frame changed in the session totals
#[derive(Debug, Default)]
struct RoundOutcome {
    destroyed: usize,
    hp: Option<u32>,
}

impl Round {
    fn new(
        scene: &mut Scene,
        group: NodeId,
        features: &[ProjectedFeature],
        property: &str,
        rng: &mut Pcg32,
    ) -> Self {
        let rocks = spawn_rocks(scene, group, features, property, rng);
        let player = Player::new(scene, group);

        let (w, h) = (VIEWPORT_WIDTH, VIEWPORT_HEIGHT);
        let name_label = scene.append(
            group,
            Element::label(w / 2.0, 32.0, 16, colors::WHITE)
                .attr("fill-opacity", 0.75)
                .text(""),
        );
        scene.append(
            group,
            Element::label(16.0, h - 24.0, 16, colors::WHITE)
                .attr("fill-opacity", 0.75)
                .attr("text-anchor", "start")
                .text("HP:"),
        );
        scene.append(
            group,
            Element::new(Tag::Rect)
                .attr("x", 76)
                .attr("y", h - 32.0)
                .attr("width", w - 92.0)
                .attr("height", 16)
                .attr("stroke", colors::WHITE)
                .attr("fill", "transparent")
                .attr("rx", 8),
        );
        let hp_bar = scene.append(
            group,
            Element::new(Tag::Rect)
                .attr("x", 80)
                .attr("y", h - 28.0)
                .attr("width", hp_bar_width(player.hp()))
                .attr("height", 8)
                .attr("fill-opacity", 0.75)
                .attr("fill", colors::OFF_WHITE)
                .attr("rx", 4),
        );

        Self {
            rocks,
            player,
            name_label,
            hp_bar,
        }
    }

    pub fn name_label(&self) -> NodeId {
        self.name_label
    }

    pub fn hp_bar(&self) -> NodeId {
        self.hp_bar
    }

    fn update(&mut self, frame: &Frame, controls: &mut Controls, scene: &mut Scene) -> RoundOutcome {
        let mut outcome = RoundOutcome::default();
        let mut player_hit = false;

        for rock in &mut self.rocks {
            rock.update(frame, controls, scene);
            for bullet in self.player.bullets_mut() {
                if bullet.is_removed() {
                    continue;
                }
                if rock.collide(bullet.position(), frame.now, scene) {
                    bullet.remove(scene);
                    outcome.destroyed += 1;
                    scene.set_text(self.name_label, rock.name());
                }
            }
            if !rock.is_removed() && self.player.collide(&rock.info(), frame.now) {
                player_hit = true;
            }
        }

        let armed: Vec<HitInfo> = self.player.bullets().iter().filter_map(Bullet::info).collect();
        for info in &armed {
            if self.player.collide(info, frame.now) {
                player_hit = true;
            }
        }

        if player_hit {
            scene.set_attr(self.hp_bar, "width", hp_bar_width(self.player.hp()));
            outcome.hp = Some(self.player.hp());
        }

        self.player.update(frame, controls, scene);
        outcome
    }
}

fn hp_bar_width(hp: u32) -> f32 {
    hp as f32 * (VIEWPORT_WIDTH - 100.0) / 100.0
}

fn spawn_rocks(
    scene: &mut Scene,
    group: NodeId,
    features: &[ProjectedFeature],
    property: &str,
    rng: &mut Pcg32,
) -> Vec<Rock> {
    features
        .iter()
        .filter_map(|f| {
            let angle = rng.random_range(0.0..360.0);
            Rock::new(scene, group, f, f.name(property), angle)
        })
        .collect()
}

fn title_screen(scene: &mut Scene, group: NodeId, lines: &[(&str, f32, u32, bool)]) {
    for &(text, y, size, bold) in lines {
        let mut label = Element::label(VIEWPORT_WIDTH / 2.0, y, size, colors::WHITE).text(text);
        if bold {
            label = label.attr("font-weight", "bold");
        }
        scene.append(group, label);
    }
}

/// Asteroids session: orchestrates screens and the per-frame update
#[derive(Debug)]
pub struct AsteroidsGame {
    settings: Settings,
    features: Vec<ProjectedFeature>,
    controls: Controls,
    scene: Scene,
    cover: Screen<Vec<Rock>>,
    main: Screen<Round>,
    gameover: Screen<()>,
    win: Screen<()>,
    mode: Mode,
    score: usize,
    hp: u32,
    rng: Pcg32,
    now: f64,
    clock: FrameClock,
}

impl AsteroidsGame {
    pub fn new(
        collection: &FeatureCollection,
        settings: Settings,
        bindings: &KeyBindings,
        projection: Option<&dyn Fn(DVec2) -> DVec2>,
    ) -> Self {
        let simplified = simplify_features(&collection.features, settings.simplify_tolerance);
        let features = project(
            &simplified,
            Viewport::centered(VIEWPORT_WIDTH as f64, VIEWPORT_HEIGHT as f64),
            projection,
            settings.flip_y_coords,
        );
        log::info!("Asteroids session with {} rocks", features.len());

        let (mut scene, layer) = Scene::framed(
            VIEWPORT_WIDTH,
            VIEWPORT_HEIGHT,
            MARGIN,
            colors::BLACK,
            colors::OFF_WHITE,
        );
        let cover = Screen::new(&mut scene, layer);
        let main = Screen::new(&mut scene, layer);
        let gameover = Screen::new(&mut scene, layer);
        let win = Screen::new(&mut scene, layer);

        let mut game = Self {
            rng: Pcg32::seed_from_u64(settings.seed),
            settings,
            features,
            controls: Controls::new(bindings),
            scene,
            cover,
            main,
            gameover,
            win,
            mode: Mode::Cover,
            score: 0,
            hp: player::PLAYER_MAX_HP,
            now: 0.0,
            clock: FrameClock::new(),
        };
        game.init_cover();
        game
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn hp(&self) -> u32 {
        self.hp
    }

    /// Rocks to destroy for a win
    pub fn total(&self) -> usize {
        self.features.len()
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

    /// Play state while the main screen is active
    pub fn round(&self) -> Option<&Round> {
        self.main.state()
    }

    pub fn round_mut(&mut self) -> Option<&mut Round> {
        self.main.state_mut()
    }

    /// Scene group owned by a screen
    pub fn screen_group(&self, mode: Mode) -> NodeId {
        match mode {
            Mode::Cover => self.cover.group(),
            Mode::Main => self.main.group(),
            Mode::GameOver => self.gameover.group(),
            Mode::Win => self.win.group(),
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

    /// Advance the game by `delta_ms`
    pub fn step(&mut self, delta_ms: f64) {
        self.now += delta_ms;
        self.controls.set_time(self.now);

        let last = self.mode;
        let current = self.next_mode(last);
        self.apply_transition(last, current);
        self.mode = current;

        let frame = Frame::new(self.now, delta_ms as f32);
        if let Some(round) = self.main.state_mut() {
            let outcome = round.update(&frame, &mut self.controls, &mut self.scene);
            self.score += outcome.destroyed;
            if let Some(hp) = outcome.hp {
                self.hp = hp;
            }
        }
    }

    fn mode_key(&mut self) -> bool {
        self.controls.probe(Action::Start, MODE_DEBOUNCE_MS)
            || self.controls.probe(Action::Select, MODE_DEBOUNCE_MS)
    }

    fn next_mode(&mut self, mut current: Mode) -> Mode {
        if current == Mode::Cover && self.mode_key() {
            current = Mode::Main;
        }
        if current == Mode::Main
            && (self.controls.probe(Action::Select, MODE_DEBOUNCE_MS) || self.hp == 0)
        {
            current = Mode::GameOver;
        }
        if current == Mode::GameOver && self.mode_key() {
            current = Mode::Cover;
        }
        if current == Mode::Win && self.mode_key() {
            current = Mode::Cover;
        }
        if current == Mode::Main && self.score == self.total() {
            current = Mode::Win;
        }
        current
    }

    fn apply_transition(&mut self, last: Mode, current: Mode) {
        if last == current {
            return;
        }
        log::info!("Asteroids: {last:?} -> {current:?}");
        if last == Mode::Cover {
            self.cover.remove(&mut self.scene);
            self.gameover.remove(&mut self.scene);
            self.win.remove(&mut self.scene);
            self.init_main();
        }
        if current == Mode::Cover {
            self.main.remove(&mut self.scene);
            self.win.remove(&mut self.scene);
            self.gameover.remove(&mut self.scene);
            self.init_cover();
        }
        if last == Mode::Main && current == Mode::GameOver {
            self.main.remove(&mut self.scene);
            self.win.remove(&mut self.scene);
            self.cover.remove(&mut self.scene);
            self.init_gameover();
        }
        if current == Mode::Win {
            self.main.remove(&mut self.scene);
            self.cover.remove(&mut self.scene);
            self.gameover.remove(&mut self.scene);
            self.init_win();
        }
    }

    fn init_cover(&mut self) {
        self.score = 0;
        self.hp = player::PLAYER_MAX_HP;
        let features = &self.features;
        let property = &self.settings.property_name;
        let rng = &mut self.rng;
        self.cover.init(&mut self.scene, |scene, group| {
            let mut rocks = spawn_rocks(scene, group, features, property, rng);
            for rock in &mut rocks {
                rock.settle(scene);
            }
            let h = VIEWPORT_HEIGHT;
            title_screen(
                scene,
                group,
                &[("MAP ASTEROIDS", h / 2.0, 64, false), ("PRESS START", h / 2.0 + 64.0, 32, true)],
            );
            rocks
        });
    }

    fn init_main(&mut self) {
        self.controls.reset();
        self.score = 0;
        self.hp = player::PLAYER_MAX_HP;
        let features = &self.features;
        let property = &self.settings.property_name;
        let rng = &mut self.rng;
        self.main.init(&mut self.scene, |scene, group| {
            Round::new(scene, group, features, property, rng)
        });
    }

    fn score_line(&self) -> String {
        format!("{} / {}", self.score, self.total())
    }

    fn init_gameover(&mut self) {
        let score = self.score_line();
        self.gameover.init(&mut self.scene, |scene, group| {
            let h = VIEWPORT_HEIGHT;
            title_screen(
                scene,
                group,
                &[
                    ("GAME OVER", h / 2.0 - 32.0, 64, false),
                    ("PRESS START", h / 2.0 + 64.0, 32, true),
                    ("SCORE", h - 128.0, 24, false),
                    (score.as_str(), h - 64.0, 32, false),
                ],
            );
        });
    }

    fn init_win(&mut self) {
        let score = self.score_line();
        self.win.init(&mut self.scene, |scene, group| {
            let h = VIEWPORT_HEIGHT;
            title_screen(
                scene,
                group,
                &[
                    ("YOU WIN", h / 2.0 - 32.0, 64, false),
                    ("SCORE", h / 2.0 + 64.0, 32, false),
                    (score.as_str(), h / 2.0 + 128.0, 32, false),
                ],
            );
        });
    }
}
