//! Scene graph capability interface
//!
//! The simulation never talks to a renderer directly. The runner mirrors
//! entity lifecycles onto whatever implements [`SceneGraph`].

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use glam::Vec3;

use crate::sim::{Aabb, EntityKind};

/// Minimal set of operations the runner needs from a retained-mode scene
pub trait SceneGraph {
    type Handle: Copy + Eq + Hash + Debug;

    /// Create the visual for `kind` at `position`
    fn create(&mut self, kind: EntityKind, position: Vec3) -> Self::Handle;

    fn set_position(&mut self, handle: Self::Handle, position: Vec3);

    /// Release the visual and everything it owns
    fn destroy(&mut self, handle: Self::Handle);

    /// World-space bounds of the visual, if the scene can measure it
    fn bounds_of(&self, handle: Self::Handle) -> Option<Aabb>;
}

#[derive(Debug, Clone)]
struct Node {
    kind: EntityKind,
    position: Vec3,
}

/// Scene without a renderer: tracks nodes so lifecycles can be checked
#[derive(Debug, Default)]
pub struct HeadlessScene {
    nodes: HashMap<u32, Node>,
    next_handle: u32,
    /// Nodes created over the scene's lifetime
    pub created: u64,
    /// Nodes destroyed over the scene's lifetime
    pub destroyed: u64,
}

impl HeadlessScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Nodes currently alive
    pub fn live_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn position_of(&self, handle: u32) -> Option<Vec3> {
        self.nodes.get(&handle).map(|n| n.position)
    }

    pub fn kind_of(&self, handle: u32) -> Option<EntityKind> {
        self.nodes.get(&handle).map(|n| n.kind)
    }
}

impl SceneGraph for HeadlessScene {
    type Handle = u32;

    fn create(&mut self, kind: EntityKind, position: Vec3) -> u32 {
        let handle = self.next_handle;
        self.next_handle += 1;
        self.nodes.insert(handle, Node { kind, position });
        self.created += 1;
        handle
    }

    fn set_position(&mut self, handle: u32, position: Vec3) {
        if let Some(node) = self.nodes.get_mut(&handle) {
            node.position = position;
        }
    }

    fn destroy(&mut self, handle: u32) {
        if self.nodes.remove(&handle).is_some() {
            self.destroyed += 1;
        } else {
            log::warn!("destroy() on unknown scene handle {}", handle);
        }
    }

    fn bounds_of(&self, handle: u32) -> Option<Aabb> {
        self.nodes
            .get(&handle)
            .map(|n| n.kind.default_bounds().translated(n.position))
    }
}
