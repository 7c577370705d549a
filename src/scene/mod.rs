//! Visual tree
//!
//! Games build and mutate a tree of SVG elements through typed handles. The
//! host renders it by serializing to markup ([`Scene::to_svg`]). Handles are
//! generational: once a node is removed, every operation through an old
//! handle is a silent no-op, so deferred effects cannot touch a recycled
//! node.

pub mod svg;
pub mod transform;

use std::collections::BTreeMap;
use std::fmt::Display;

pub use transform::{Transform, build_closed_path, compose_transform};

/// SVG element kinds used by the games
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Svg,
    Group,
    Path,
    Circle,
    Rect,
    Text,
    Tspan,
}

impl Tag {
    pub fn name(&self) -> &'static str {
        match self {
            Tag::Svg => "svg",
            Tag::Group => "g",
            Tag::Path => "path",
            Tag::Circle => "circle",
            Tag::Rect => "rect",
            Tag::Text => "text",
            Tag::Tspan => "tspan",
        }
    }
}

/// Element description used to create a node
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: Tag,
    pub attrs: BTreeMap<&'static str, String>,
    pub style: BTreeMap<&'static str, String>,
    pub text: Option<String>,
}

impl Element {
    pub fn new(tag: Tag) -> Self {
        Self {
            tag,
            attrs: BTreeMap::new(),
            style: BTreeMap::new(),
            text: None,
        }
    }

    pub fn group() -> Self {
        Self::new(Tag::Group)
    }

    pub fn attr(mut self, key: &'static str, value: impl Display) -> Self {
        self.attrs.insert(key, value.to_string());
        self
    }

    pub fn style(mut self, key: &'static str, value: impl Display) -> Self {
        self.style.insert(key, value.to_string());
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Centered label in the arcade font
    pub fn label(x: f32, y: f32, size: u32, fill: &str) -> Self {
        Self::new(Tag::Text)
            .attr("x", x)
            .attr("y", y)
            .attr("fill", fill)
            .attr("font-size", size)
            .attr("font-family", "PressStart2P")
            .attr("text-anchor", "middle")
            .attr("alignment-baseline", "central")
    }
}

/// Handle to a node in a [`Scene`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

#[derive(Debug, Clone)]
struct Node {
    element: Element,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// Arena-backed element tree
#[derive(Debug, Clone)]
pub struct Scene {
    slots: Vec<Slot>,
    free: Vec<u32>,
    root: NodeId,
}

impl Scene {
    pub fn new(root: Element) -> Self {
        let mut scene = Self {
            slots: Vec::new(),
            free: Vec::new(),
            root: NodeId { index: 0, generation: 0 },
        };
        scene.root = scene.alloc(root, None);
        scene
    }

    /// Game frame: an outer SVG with a background and double border around a
    /// `width` x `height` play layer. Returns the scene and the play layer.
    pub fn framed(width: f32, height: f32, margin: f32, background: &str, border: &str) -> (Self, NodeId) {
        let outer = width + margin * 2.0;
        let mut scene = Self::new(
            Element::new(Tag::Svg)
                .attr("viewBox", format!("0 0 {outer} {}", height + margin * 2.0))
                .style("position", "relative")
                .style("width", "100%")
                .style("height", "100%"),
        );
        let root = scene.root();
        scene.append(
            root,
            Element::new(Tag::Rect)
                .attr("x", -margin)
                .attr("y", -margin)
                .attr("width", width + margin * 4.0)
                .attr("height", height + margin * 4.0)
                .attr("fill", background),
        );
        scene.append(
            root,
            Element::new(Tag::Rect)
                .attr("x", -margin / 2.0)
                .attr("y", -margin / 2.0)
                .attr("width", width + margin * 3.0)
                .attr("height", height + margin * 3.0)
                .attr("stroke", border)
                .attr("stroke-width", 0.5)
                .attr("fill", "transparent"),
        );
        scene.append(
            root,
            Element::new(Tag::Rect)
                .attr("x", 0)
                .attr("y", 0)
                .attr("width", outer)
                .attr("height", height + margin * 2.0)
                .attr("stroke", border)
                .attr("stroke-width", 3)
                .attr("fill", "transparent"),
        );
        let layer = scene.append(
            root,
            Element::new(Tag::Svg)
                .attr("x", margin)
                .attr("y", margin)
                .attr("width", width)
                .attr("height", height)
                .attr("viewBox", format!("0 0 {width} {height}")),
        );
        (scene, layer)
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    fn alloc(&mut self, element: Element, parent: Option<NodeId>) -> NodeId {
        let node = Node {
            element,
            parent,
            children: Vec::new(),
        };
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.generation += 1;
                slot.node = Some(node);
                NodeId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    node: Some(node),
                });
                NodeId { index, generation: 0 }
            }
        }
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
    }

    pub fn is_alive(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    /// Create `element` as the last child of `parent`. A dead parent yields a
    /// detached node.
    pub fn append(&mut self, parent: NodeId, element: Element) -> NodeId {
        let parent_alive = self.is_alive(parent);
        let id = self.alloc(element, parent_alive.then_some(parent));
        if let Some(parent) = self.node_mut(parent) {
            parent.children.push(id);
        } else {
            log::debug!("append to a removed node; element left detached");
        }
        id
    }

    /// Set an attribute. Returns false for a stale handle.
    pub fn set_attr(&mut self, id: NodeId, key: &'static str, value: impl Display) -> bool {
        match self.node_mut(id) {
            Some(node) => {
                node.element.attrs.insert(key, value.to_string());
                true
            }
            None => false,
        }
    }

    pub fn set_style(&mut self, id: NodeId, key: &'static str, value: impl Display) -> bool {
        match self.node_mut(id) {
            Some(node) => {
                node.element.style.insert(key, value.to_string());
                true
            }
            None => false,
        }
    }

    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) -> bool {
        match self.node_mut(id) {
            Some(node) => {
                node.element.text = Some(text.into());
                true
            }
            None => false,
        }
    }

    pub fn attr(&self, id: NodeId, key: &str) -> Option<&str> {
        self.node(id)?.element.attrs.get(key).map(String::as_str)
    }

    pub fn style(&self, id: NodeId, key: &str) -> Option<&str> {
        self.node(id)?.element.style.get(key).map(String::as_str)
    }

    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.node(id)?.element.text.as_deref()
    }

    pub fn tag(&self, id: NodeId) -> Option<Tag> {
        self.node(id).map(|n| n.element.tag)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Number of live nodes, root included
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.node.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Detach `id` from its parent and free its subtree
    pub fn remove(&mut self, id: NodeId) {
        if id == self.root {
            self.clear(id);
            return;
        }
        let Some(parent) = self.node(id).map(|n| n.parent) else {
            return;
        };
        if let Some(parent) = parent.and_then(|p| self.node_mut(p)) {
            parent.children.retain(|&c| c != id);
        }
        self.free_subtree(id);
    }

    /// Free every child of `id`
    pub fn clear(&mut self, id: NodeId) {
        let children = match self.node_mut(id) {
            Some(node) => std::mem::take(&mut node.children),
            None => return,
        };
        for child in children {
            self.free_subtree(child);
        }
    }

    /// Move `id` to the end of its parent's children (drawn on top)
    pub fn raise(&mut self, id: NodeId) {
        let Some(parent) = self.parent(id) else {
            return;
        };
        if let Some(parent) = self.node_mut(parent) {
            parent.children.retain(|&c| c != id);
            parent.children.push(id);
        }
    }

    fn free_subtree(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            let Some(slot) = self.slots.get_mut(id.index as usize) else {
                continue;
            };
            if slot.generation != id.generation {
                continue;
            }
            if let Some(node) = slot.node.take() {
                stack.extend(node.children);
                self.free.push(id.index);
            }
        }
    }

    /// Serialize the whole tree as SVG markup
    pub fn to_svg(&self) -> String {
        svg::render(self, self.root)
    }

    pub(crate) fn element(&self, id: NodeId) -> Option<&Element> {
        self.node(id).map(|n| &n.element)
    }
}

/// Colors for game elements
pub mod colors {
    pub const WHITE: &str = "#ffffff";
    pub const OFF_WHITE: &str = "#f2f2f2";
    pub const BLACK: &str = "#000000";
    pub const DARK: &str = "#333333";
    pub const ROCK_FILL: &str = "#111111";
    pub const HIT: &str = "#ff00ff";
    pub const DESTROYED: &str = "#ff33aa";
    pub const HIGHLIGHT: &str = "#aaff33";
    pub const SELECTED: &str = "#ffaa00";

    /// Food palette as (fill, stroke): base colors lightened and darkened
    pub const FOOD: [(&str, &str); 4] = [
        ("#ffa3a3", "#ff0909"),
        ("#cff48e", "#80c411"),
        ("#94b8f5", "#1453c0"),
        ("#d29eff", "#8d00ff"),
    ];

    /// Block colors when no palette entry applies
    pub const BLOCK_FILL: &str = "#777777";
    pub const BLOCK_STROKE: &str = "#333333";
}
