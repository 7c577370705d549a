//! Key-binding editor screen
//!
//! Draws a gamepad with one clickable shape per action. Clicking a shape
//! selects the action; the next key press rebinds it and saves the map.
//! Without a selection, key presses just show their code and highlight the
//! bound button.

use std::collections::HashMap;

use super::{Action, KeyBindings};
use crate::consts::{MARGIN, VIEWPORT_HEIGHT, VIEWPORT_WIDTH};
use crate::persistence::Storage;
use crate::scene::{Element, NodeId, Scene, Tag, colors, compose_transform};

const BASE_TITLE: &str = "CLICK ON A BUTTON TO CHANGE KEY BINDING";
const TEXT_FILL: &str = "#555555";
const BUTTON_FILL: &str = "#333333";
const BUTTON_STROKE: &str = "#888888";

/// Attribute carrying the action name on clickable shapes
pub const ACTION_ATTR: &str = "data-action";

fn label_text(action: Action, code: u32) -> String {
    format!("{} -> key code: {code}", action.as_str())
}

/// Controller configuration screen
#[derive(Debug, Clone)]
pub struct KeyBindingEditor {
    bindings: KeyBindings,
    scene: Scene,
    layer: NodeId,
    buttons: HashMap<Action, NodeId>,
    labels: HashMap<Action, NodeId>,
    title: NodeId,
    key_code: NodeId,
    selected: Option<Action>,
}

impl KeyBindingEditor {
    pub fn new(bindings: KeyBindings) -> Self {
        let (w, h) = (VIEWPORT_WIDTH, VIEWPORT_HEIGHT);
        let (mut scene, layer) = Scene::framed(w, h, MARGIN, colors::OFF_WHITE, colors::DARK);

        // pad body and grips
        let body = scene.append(layer, Element::group());
        scene.append(
            body,
            Element::new(Tag::Rect)
                .attr("transform", compose_transform(w / 2.0, h / 2.0, 0.0, 1.0))
                .attr("fill", "#777777")
                .attr("x", -w / 4.0)
                .attr("y", -h / 8.0)
                .attr("width", w / 2.0)
                .attr("height", h / 4.0),
        );
        for x in [w / 4.0, w * 3.0 / 4.0] {
            scene.append(
                body,
                Element::new(Tag::Circle)
                    .attr("transform", compose_transform(x, h / 2.0, 0.0, 1.0))
                    .attr("fill", "#999999")
                    .attr("r", h / 7.0),
            );
        }

        let mut buttons = HashMap::new();
        for action in Action::ALL {
            let id = scene.append(layer, button_shape(action, w, h));
            buttons.insert(action, id);
        }
        for (text, x, y) in [("A", w * 3.0 / 4.0 - 48.0, h / 2.0 + 16.0), ("B", w * 3.0 / 4.0 + 48.0, h / 2.0 - 16.0)] {
            scene.append(
                layer,
                Element::label(x, y, 24, colors::WHITE)
                    .style("pointer-events", "none")
                    .text(text),
            );
        }

        let title = scene.append(layer, Element::label(w / 2.0, h - 64.0, 24, TEXT_FILL).text(BASE_TITLE));
        scene.append(layer, Element::label(w / 2.0, 96.0, 64, TEXT_FILL).text("MAP STATION"));

        let mut labels = HashMap::new();
        for (idx, binding) in bindings.iter().enumerate() {
            let id = scene.append(
                layer,
                Element::label(w / 2.0, label_y(idx, h), 16, TEXT_FILL).text(label_text(binding.name, binding.code)),
            );
            labels.insert(binding.name, id);
        }

        let key_code = scene.append(layer, Element::label(w / 2.0, h / 4.0, 32, TEXT_FILL).text(""));

        Self {
            bindings,
            scene,
            layer,
            buttons,
            labels,
            title,
            key_code,
            selected: None,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    pub fn selected(&self) -> Option<Action> {
        self.selected
    }

    pub fn button(&self, action: Action) -> Option<NodeId> {
        self.buttons.get(&action).copied()
    }

    pub fn label(&self, action: Action) -> Option<NodeId> {
        self.labels.get(&action).copied()
    }

    /// Current title line, including the selected action name
    pub fn title(&self) -> String {
        let mut title = self.scene.text(self.title).unwrap_or_default().to_string();
        for &child in self.scene.children(self.title) {
            title.push_str(self.scene.text(child).unwrap_or_default());
        }
        title
    }

    pub fn key_code_text(&self) -> &str {
        self.scene.text(self.key_code).unwrap_or_default()
    }

    /// Button clicked. Ignored while another action awaits its key.
    pub fn select(&mut self, action: Action) {
        if self.selected.is_some() {
            return;
        }
        self.selected = Some(action);
        self.scene.set_text(self.title, "TYPE ON THE KEYBOARD TO SET ");
        self.scene.append(
            self.title,
            Element::new(Tag::Tspan)
                .attr("fill", colors::BLACK)
                .attr("stroke", colors::SELECTED)
                .attr("alignment-baseline", "central")
                .style("font-weight", "bold")
                .text(action.as_str().to_uppercase()),
        );
        self.outline(action, colors::SELECTED);
    }

    /// Key pressed on the editor page
    pub fn key_down(&mut self, code: u32, storage: &mut dyn Storage) {
        let Some(action) = self.selected.take() else {
            self.scene.set_text(self.key_code, format!("key code: {code}"));
            if let Some(action) = self.bindings.action_for(code) {
                self.outline(action, colors::HIGHLIGHT);
            }
            return;
        };

        self.bindings.rebind(action, code);
        if let Err(e) = self.bindings.save(storage) {
            log::warn!("Could not save key bindings: {e}");
        }
        log::info!("Bound {} to key code {code}", action.as_str());

        self.reset_title();
        self.clear_outline(action);
        let text = label_text(action, code);
        match self.labels.get(&action) {
            Some(&label) => {
                self.scene.set_text(label, text);
            }
            None => {
                let idx = self.labels.len();
                let (w, h) = (VIEWPORT_WIDTH, VIEWPORT_HEIGHT);
                let label = self
                    .scene
                    .append(self.layer, Element::label(w / 2.0, label_y(idx, h), 16, TEXT_FILL).text(text));
                self.labels.insert(action, label);
            }
        }
    }

    /// Key released: drop every highlight and the key-code readout
    pub fn key_up(&mut self) {
        let buttons: Vec<Action> = self.buttons.keys().copied().collect();
        for action in buttons {
            if Some(action) != self.selected {
                self.clear_outline(action);
            }
        }
        self.scene.set_text(self.key_code, "");
    }

    /// Background clicked: abandon the pending selection
    pub fn cancel(&mut self) {
        let Some(action) = self.selected.take() else {
            return;
        };
        self.reset_title();
        self.clear_outline(action);
        self.scene.set_text(self.key_code, "");
    }

    fn reset_title(&mut self) {
        self.scene.clear(self.title);
        self.scene.set_text(self.title, BASE_TITLE);
    }

    fn outline(&mut self, action: Action, color: &str) {
        if let Some(&button) = self.buttons.get(&action) {
            self.scene.set_attr(button, "stroke", color);
            self.scene.set_attr(button, "stroke-width", 4);
        }
        if let Some(&label) = self.labels.get(&action) {
            self.scene.set_attr(label, "stroke", color);
        }
    }

    fn clear_outline(&mut self, action: Action) {
        if let Some(&button) = self.buttons.get(&action) {
            self.scene.set_attr(button, "stroke", "none");
            self.scene.set_attr(button, "stroke-width", 0);
        }
        if let Some(&label) = self.labels.get(&action) {
            self.scene.set_attr(label, "stroke", "transparent");
        }
    }
}

fn label_y(idx: usize, h: f32) -> f32 {
    h * 3.3 / 5.0 + idx as f32 * 32.0
}

fn button_shape(action: Action, w: f32, h: f32) -> Element {
    let (cx, cy) = (w / 2.0, h / 2.0);
    let rect = |x: f32, y: f32, bw: f32, bh: f32| {
        Element::new(Tag::Rect)
            .attr("transform", compose_transform(x, y, 0.0, 1.0))
            .attr("x", -bw / 2.0)
            .attr("y", -bh / 2.0)
            .attr("width", bw)
            .attr("height", bh)
            .attr("rx", 8)
    };
    let circle = |x: f32, y: f32| {
        Element::new(Tag::Circle)
            .attr("transform", compose_transform(x, y, 0.0, 1.0))
            .attr("r", 32)
    };
    let shape = match action {
        Action::Up => rect(w / 4.0, cy - 64.0, 48.0, 64.0),
        Action::Down => rect(w / 4.0, cy + 64.0, 48.0, 64.0),
        Action::Left => rect(w / 4.0 - 64.0, cy, 64.0, 48.0),
        Action::Right => rect(w / 4.0 + 64.0, cy, 64.0, 48.0),
        Action::Start => rect(cx - 48.0, cy + 64.0, 64.0, 16.0),
        Action::Select => rect(cx + 48.0, cy + 64.0, 64.0, 16.0),
        Action::ButtonA => circle(w * 3.0 / 4.0 - 48.0, cy + 16.0),
        Action::ButtonB => circle(w * 3.0 / 4.0 + 48.0, cy - 16.0),
    };
    shape
        .attr("fill", BUTTON_FILL)
        .attr("stroke", BUTTON_STROKE)
        .attr(ACTION_ATTR, action.as_str())
}
