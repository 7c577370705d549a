//! Screen container
//!
//! A screen owns one group in the scene plus the state built for it. Only
//! one screen per game is active at a time: `init` builds fresh state into
//! the group, `remove` clears the group's children and drops the state.

use crate::scene::{Element, NodeId, Scene};

#[derive(Debug)]
pub struct Screen<S> {
    group: NodeId,
    state: Option<S>,
}

impl<S> Screen<S> {
    /// Create an empty, inactive screen under `parent`
    pub fn new(scene: &mut Scene, parent: NodeId) -> Self {
        Self {
            group: scene.append(parent, Element::group()),
            state: None,
        }
    }

    /// Tear down any previous content and build new state into the group
    pub fn init<F>(&mut self, scene: &mut Scene, build: F)
    where
        F: FnOnce(&mut Scene, NodeId) -> S,
    {
        self.remove(scene);
        self.state = Some(build(scene, self.group));
    }

    /// Clear visuals and drop state. Inactive screens stay inert.
    pub fn remove(&mut self, scene: &mut Scene) {
        scene.clear(self.group);
        self.state = None;
    }

    pub fn is_active(&self) -> bool {
        self.state.is_some()
    }

    pub fn state(&self) -> Option<&S> {
        self.state.as_ref()
    }

    pub fn state_mut(&mut self) -> Option<&mut S> {
        self.state.as_mut()
    }

    pub fn group(&self) -> NodeId {
        self.group
    }
}
