//! Keyboard controls
//!
//! Raw key events only flip "held" flags. Games query logical actions through
//! [`Controls::probe`], which fires at most once per debounce window while
//! the bound key stays held. Cooldowns are deadlines on the frame clock, so
//! the sampler is deterministic under an injected time source.

pub mod bindings;
pub mod editor;

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

pub use bindings::{KeyBinding, KeyBindings};
pub use editor::KeyBindingEditor;

/// Logical game action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Action {
    Left,
    Right,
    Up,
    Down,
    ButtonA,
    ButtonB,
    Start,
    Select,
}

impl Action {
    pub const ALL: [Action; 8] = [
        Action::Left,
        Action::Right,
        Action::Up,
        Action::Down,
        Action::ButtonA,
        Action::ButtonB,
        Action::Start,
        Action::Select,
    ];

    /// Serialized name (`buttonA`, `select`, ...)
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Left => "left",
            Action::Right => "right",
            Action::Up => "up",
            Action::Down => "down",
            Action::ButtonA => "buttonA",
            Action::ButtonB => "buttonB",
            Action::Start => "start",
            Action::Select => "select",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Action::ALL.into_iter().find(|a| a.as_str() == s)
    }
}

/// Debounced key-state sampler
#[derive(Debug, Clone, Default)]
pub struct Controls {
    /// Action -> key code
    keys: HashMap<Action, u32>,
    /// Key codes currently held down
    held: HashSet<u32>,
    /// Key code -> time (ms) until which probes return false
    cooldowns: HashMap<u32, f64>,
    /// Current clock (ms)
    now: f64,
}

impl Controls {
    pub fn new(bindings: &KeyBindings) -> Self {
        let mut controls = Self::default();
        controls.set_keys(bindings);
        controls
    }

    /// Replace the action -> key code map
    pub fn set_keys(&mut self, bindings: &KeyBindings) {
        self.keys = bindings.iter().map(|b| (b.name, b.code)).collect();
    }

    /// Key code bound to an action
    pub fn code(&self, action: Action) -> Option<u32> {
        self.keys.get(&action).copied()
    }

    pub fn key_down(&mut self, code: u32) {
        self.held.insert(code);
    }

    pub fn key_up(&mut self, code: u32) {
        self.held.remove(&code);
    }

    /// Whether a raw key is currently held
    pub fn is_held(&self, code: u32) -> bool {
        self.held.contains(&code)
    }

    /// Advance the clock used for cooldown deadlines
    pub fn set_time(&mut self, now_ms: f64) {
        self.now = now_ms;
    }

    pub fn time(&self) -> f64 {
        self.now
    }

    /// True when the action's key is held and its cooldown has expired.
    /// A true result starts a new cooldown of `debounce_ms`.
    pub fn probe(&mut self, action: Action, debounce_ms: f64) -> bool {
        let Some(code) = self.code(action) else {
            return false;
        };
        if !self.held.contains(&code) {
            return false;
        }
        if let Some(&until) = self.cooldowns.get(&code) {
            if self.now < until {
                return false;
            }
        }
        self.cooldowns.insert(code, self.now + debounce_ms);
        true
    }

    /// Clear all cooldowns, keeping held keys
    pub fn reset(&mut self) {
        self.cooldowns.clear();
    }
}
