//! Crate error type.
//!
//! Parsers return `Result<_, MapError>`; best-effort loaders log the error
//! and fall back to defaults instead of surfacing it.

use std::fmt;

/// Errors produced while reading host-provided data
#[derive(Debug)]
pub enum MapError {
    /// The feature collection is not valid GeoJSON.
    InvalidGeoJson(serde_json::Error),

    /// The settings object could not be deserialized.
    InvalidSettings(serde_json::Error),

    /// Persisted key bindings could not be deserialized.
    InvalidBindings(serde_json::Error),

    /// The same action appears twice in a key-binding list.
    DuplicateAction {
        /// Serialized action name.
        name: &'static str,
    },

    /// The host storage rejected a read or write.
    Storage(String),
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapError::InvalidGeoJson(e) => write!(f, "invalid GeoJSON: {e}"),
            MapError::InvalidSettings(e) => write!(f, "invalid settings: {e}"),
            MapError::InvalidBindings(e) => write!(f, "invalid key bindings: {e}"),
            MapError::DuplicateAction { name } => {
                write!(f, "action `{name}` is bound more than once")
            }
            MapError::Storage(msg) => write!(f, "storage error: {msg}"),
        }
    }
}

impl std::error::Error for MapError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MapError::InvalidGeoJson(e)
            | MapError::InvalidSettings(e)
            | MapError::InvalidBindings(e) => Some(e),
            _ => None,
        }
    }
}
