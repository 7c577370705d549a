//! Key-binding map
//!
//! Persisted as a JSON list of `{ "name": action, "code": keyCode }` under
//! [`KeyBindings::STORAGE_KEY`].

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::Action;
use crate::error::MapError;
use crate::persistence::{self, Storage};

/// One action -> key code pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBinding {
    pub name: Action,
    pub code: u32,
}

/// Ordered list of bindings with unique action names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyBindings {
    entries: Vec<KeyBinding>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            entries: vec![
                KeyBinding { name: Action::Left, code: 65 },
                KeyBinding { name: Action::Right, code: 68 },
                KeyBinding { name: Action::Up, code: 87 },
                KeyBinding { name: Action::Down, code: 83 },
                KeyBinding { name: Action::ButtonA, code: 32 },
                KeyBinding { name: Action::ButtonB, code: 77 },
                KeyBinding { name: Action::Start, code: 13 },
                KeyBinding { name: Action::Select, code: 27 },
            ],
        }
    }
}

impl KeyBindings {
    /// Storage key shared with the key-binding editor
    pub const STORAGE_KEY: &'static str = "mapStationControlsKeys";

    /// Build from pairs, rejecting duplicate actions
    pub fn from_pairs(pairs: &[(Action, u32)]) -> Result<Self, MapError> {
        let entries = pairs
            .iter()
            .map(|&(name, code)| KeyBinding { name, code })
            .collect();
        Self::validated(entries)
    }

    /// Parse the persisted JSON form
    pub fn parse(json: &str) -> Result<Self, MapError> {
        let entries: Vec<KeyBinding> =
            serde_json::from_str(json).map_err(MapError::InvalidBindings)?;
        Self::validated(entries)
    }

    fn validated(entries: Vec<KeyBinding>) -> Result<Self, MapError> {
        let mut seen = HashSet::new();
        for binding in &entries {
            if !seen.insert(binding.name) {
                return Err(MapError::DuplicateAction {
                    name: binding.name.as_str(),
                });
            }
        }
        Ok(Self { entries })
    }

    /// Load from storage; missing or corrupt data yields the defaults
    pub fn load(storage: &dyn Storage) -> Self {
        let loaded = persistence::load_json::<Vec<KeyBinding>, _>(
            storage,
            Self::STORAGE_KEY,
            MapError::InvalidBindings,
        )
        .and_then(|entries| entries.map(Self::validated).transpose());

        match loaded {
            Ok(Some(bindings)) => {
                log::info!("Loaded {} key bindings", bindings.entries.len());
                bindings
            }
            Ok(None) => {
                log::info!("No stored key bindings, using defaults");
                Self::default()
            }
            Err(e) => {
                log::warn!("{e}; using default key bindings");
                Self::default()
            }
        }
    }

    pub fn save(&self, storage: &mut dyn Storage) -> Result<(), MapError> {
        persistence::save_json(storage, Self::STORAGE_KEY, self)?;
        log::info!("Key bindings saved");
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &KeyBinding> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Key code bound to an action
    pub fn code(&self, action: Action) -> Option<u32> {
        self.entries.iter().find(|b| b.name == action).map(|b| b.code)
    }

    /// First action bound to a key code
    pub fn action_for(&self, code: u32) -> Option<Action> {
        self.entries.iter().find(|b| b.code == code).map(|b| b.name)
    }

    /// Bind `action` to `code`, appending the action if it was unbound
    pub fn rebind(&mut self, action: Action, code: u32) {
        match self.entries.iter_mut().find(|b| b.name == action) {
            Some(binding) => binding.code = code,
            None => self.entries.push(KeyBinding { name: action, code }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStorage;

    #[test]
    fn test_default_bindings() {
        let bindings = KeyBindings::default();
        assert_eq!(bindings.len(), 8);
        assert_eq!(bindings.code(Action::ButtonA), Some(32));
        assert_eq!(bindings.code(Action::Select), Some(27));
        assert_eq!(bindings.action_for(13), Some(Action::Start));
    }

    #[test]
    fn test_parse_persisted_form() {
        let bindings = KeyBindings::parse(r#"[{"name":"left","code":37},{"name":"buttonA","code":90}]"#)
            .unwrap();
        assert_eq!(bindings.code(Action::Left), Some(37));
        assert_eq!(bindings.code(Action::ButtonA), Some(90));
        assert_eq!(bindings.code(Action::Right), None);
    }

    #[test]
    fn test_duplicate_action_rejected() {
        let err = KeyBindings::parse(r#"[{"name":"left","code":37},{"name":"left","code":65}]"#)
            .unwrap_err();
        assert!(matches!(err, MapError::DuplicateAction { name: "left" }));
    }

    #[test]
    fn test_load_falls_back_on_corrupt_data() {
        let mut storage = MemoryStorage::new();
        assert_eq!(KeyBindings::load(&storage), KeyBindings::default());

        storage.set_item(KeyBindings::STORAGE_KEY, "not json").unwrap();
        assert_eq!(KeyBindings::load(&storage), KeyBindings::default());

        storage
            .set_item(KeyBindings::STORAGE_KEY, r#"[{"name":"jump","code":1}]"#)
            .unwrap();
        assert_eq!(KeyBindings::load(&storage), KeyBindings::default());
    }

    #[test]
    fn test_save_then_load() {
        let mut storage = MemoryStorage::new();
        let mut bindings = KeyBindings::default();
        bindings.rebind(Action::Up, 38);
        bindings.save(&mut storage).unwrap();

        let json = storage.get_item(KeyBindings::STORAGE_KEY).unwrap().unwrap();
        assert!(json.contains(r#"{"name":"up","code":38}"#));
        assert_eq!(KeyBindings::load(&storage), bindings);
    }
}
