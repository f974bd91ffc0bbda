// extensions/hierarchy.rs
//
// Transform hierarchy extension — tracks parent-child relationships by EntityId.
// Completely decoupled from Entity/Scene internals.
//
// Usage:
//   let mut graph = TransformGraph::new();
//   graph.set_parent(moon_id, Some(planet_id));
//   graph.propagate(&mut scene);  // Writes world transforms into the scene

use std::collections::HashMap;

use glam::{Quat, Vec3};

use crate::api::types::EntityId;
use crate::core::scene::Scene;

/// Local transform data for entities in a hierarchy.
#[derive(Debug, Clone, Copy)]
pub struct LocalTransform {
    /// Position relative to parent (or world if no parent).
    pub offset: Vec3,
    /// Rotation relative to parent.
    pub rotation: Quat,
    /// Uniform scale multiplier relative to parent.
    pub scale: f32,
}

impl Default for LocalTransform {
    fn default() -> Self {
        Self {
            offset: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: 1.0,
        }
    }
}

impl LocalTransform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_offset(mut self, offset: Vec3) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }
}

#[derive(Debug, Clone, Default)]
struct TransformNode {
    parent: Option<EntityId>,
    children: Vec<EntityId>,
    local: LocalTransform,
}

/// Transform hierarchy graph — manages parent-child relationships.
///
/// Exists separately from Scene to keep the registry flat; the session owns
/// one of these alongside its Scene.
#[derive(Debug, Default)]
pub struct TransformGraph {
    nodes: HashMap<EntityId, TransformNode>,
    /// Entities with no parent (top-level).
    roots: Vec<EntityId>,
    /// Dirty flag — set when hierarchy changes, cleared after propagate.
    dirty: bool,
}

impl TransformGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entity in the hierarchy with default local transform.
    pub fn register(&mut self, id: EntityId) {
        self.nodes.entry(id).or_default();
        if !self.roots.contains(&id) {
            self.roots.push(id);
        }
        self.dirty = true;
    }

    /// Register an entity with a specific local transform.
    pub fn register_with(&mut self, id: EntityId, local: LocalTransform) {
        let node = self.nodes.entry(id).or_default();
        node.local = local;
        if !self.roots.contains(&id) {
            self.roots.push(id);
        }
        self.dirty = true;
    }

    /// Set the parent of an entity. Pass `None` to make it a root.
    pub fn set_parent(&mut self, child: EntityId, parent: Option<EntityId>) {
        self.nodes.entry(child).or_default();
        if let Some(p) = parent {
            self.nodes.entry(p).or_default();
        }

        // Remove from old parent's children
        if let Some(old_parent) = self.nodes.get(&child).and_then(|n| n.parent) {
            if let Some(old_node) = self.nodes.get_mut(&old_parent) {
                old_node.children.retain(|&c| c != child);
            }
        }

        if let Some(node) = self.nodes.get_mut(&child) {
            node.parent = parent;
        }

        if let Some(p) = parent {
            if let Some(parent_node) = self.nodes.get_mut(&p) {
                if !parent_node.children.contains(&child) {
                    parent_node.children.push(child);
                }
            }
            self.roots.retain(|&r| r != child);
        } else if !self.roots.contains(&child) {
            self.roots.push(child);
        }

        self.dirty = true;
    }

    /// Set the local transform for an entity.
    pub fn set_local(&mut self, id: EntityId, local: LocalTransform) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.local = local;
            self.dirty = true;
        }
    }

    /// Get the local transform for an entity.
    pub fn get_local(&self, id: EntityId) -> Option<&LocalTransform> {
        self.nodes.get(&id).map(|n| &n.local)
    }

    /// Get the parent of an entity.
    pub fn get_parent(&self, id: EntityId) -> Option<EntityId> {
        self.nodes.get(&id).and_then(|n| n.parent)
    }

    /// Get the children of an entity.
    pub fn get_children(&self, id: EntityId) -> Option<&[EntityId]> {
        self.nodes.get(&id).map(|n| n.children.as_slice())
    }

    /// Whether `root` is `node` itself or one of its transitive parents.
    pub fn is_ancestor(&self, root: EntityId, node: EntityId) -> bool {
        let mut cur = Some(node);
        while let Some(id) = cur {
            if id == root {
                return true;
            }
            cur = self.get_parent(id);
        }
        false
    }

    /// Walk up from `node` and return the first entity (including `node`
    /// itself) accepted by `owns`. Maps a renderer-picked child node back to
    /// the registered entity that owns it.
    pub fn resolve_owner(&self, node: EntityId, owns: impl Fn(EntityId) -> bool) -> Option<EntityId> {
        let mut cur = Some(node);
        while let Some(id) = cur {
            if owns(id) {
                return Some(id);
            }
            cur = self.get_parent(id);
        }
        None
    }

    /// Remove an entity from the hierarchy.
    /// Children become roots (orphaned).
    pub fn remove(&mut self, id: EntityId) {
        if let Some(node) = self.nodes.remove(&id) {
            if let Some(parent) = node.parent {
                if let Some(parent_node) = self.nodes.get_mut(&parent) {
                    parent_node.children.retain(|&c| c != id);
                }
            }

            for child in node.children {
                if let Some(child_node) = self.nodes.get_mut(&child) {
                    child_node.parent = None;
                }
                if !self.roots.contains(&child) {
                    self.roots.push(child);
                }
            }

            self.roots.retain(|&r| r != id);
        }
        self.dirty = true;
    }

    /// Propagate transforms from roots down through the hierarchy.
    /// Updates Entity.pos/rotation based on parent transforms.
    pub fn propagate(&mut self, scene: &mut Scene) {
        if !self.dirty {
            return;
        }

        let roots: Vec<EntityId> = self.roots.clone();
        for root in roots {
            self.propagate_recursive(root, Vec3::ZERO, Quat::IDENTITY, 1.0, scene);
        }

        self.dirty = false;
    }

    fn propagate_recursive(
        &self,
        id: EntityId,
        parent_pos: Vec3,
        parent_rot: Quat,
        parent_scale: f32,
        scene: &mut Scene,
    ) {
        let Some(node) = self.nodes.get(&id) else { return };
        let local = &node.local;

        let world_pos = parent_pos + parent_rot * (local.offset * parent_scale);
        let world_rot = parent_rot * local.rotation;
        let world_scale = parent_scale * local.scale;

        if let Some(entity) = scene.get_mut(id) {
            entity.pos = world_pos;
            entity.rotation = world_rot;
        }

        let children: Vec<EntityId> = node.children.clone();
        for child in children {
            self.propagate_recursive(child, world_pos, world_rot, world_scale, scene);
        }
    }

    /// Mark the hierarchy as needing propagation.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Number of entities in the hierarchy.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the hierarchy is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scene::Entity;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn ancestor_holds_for_self_and_transitive_parents() {
        let mut graph = TransformGraph::new();
        let root = EntityId(1);
        let child = EntityId(2);
        let grandchild = EntityId(3);
        let stranger = EntityId(4);

        graph.register(root);
        graph.register(stranger);
        graph.set_parent(child, Some(root));
        graph.set_parent(grandchild, Some(child));

        assert!(graph.is_ancestor(root, root));
        assert!(graph.is_ancestor(root, child));
        assert!(graph.is_ancestor(root, grandchild));
        assert!(!graph.is_ancestor(root, stranger));
        assert!(!graph.is_ancestor(child, root));
    }

    #[test]
    fn resolve_owner_walks_to_registered_entity() {
        let mut graph = TransformGraph::new();
        let body = EntityId(10);
        let sub_mesh = EntityId(11);
        graph.register(body);
        graph.set_parent(sub_mesh, Some(body));

        let owner = graph.resolve_owner(sub_mesh, |id| id == body);
        assert_eq!(owner, Some(body));
        assert_eq!(graph.resolve_owner(sub_mesh, |_| false), None);
    }

    #[test]
    fn propagate_applies_parent_rotation_to_offsets() {
        let mut graph = TransformGraph::new();
        let mut scene = Scene::new();

        let parent = EntityId(1);
        let child = EntityId(2);

        scene.spawn(Entity::new(parent));
        scene.spawn(Entity::new(child));

        // Parent rotated 90° about Y: child's +X offset lands on -Z.
        graph.register_with(
            parent,
            LocalTransform::new().with_rotation(Quat::from_rotation_y(FRAC_PI_2)),
        );
        graph.register_with(child, LocalTransform::new().with_offset(Vec3::new(5.0, 0.0, 0.0)));
        graph.set_parent(child, Some(parent));

        graph.propagate(&mut scene);

        let child_entity = scene.get(child).unwrap();
        assert!(child_entity.pos.abs_diff_eq(Vec3::new(0.0, 0.0, -5.0), 1e-5));
    }

    #[test]
    fn remove_orphans_children() {
        let mut graph = TransformGraph::new();
        let parent = EntityId(1);
        let child = EntityId(2);

        graph.register(parent);
        graph.register(child);
        graph.set_parent(child, Some(parent));

        graph.remove(parent);

        assert_eq!(graph.get_parent(child), None);
        assert!(!graph.is_ancestor(parent, child));
    }
}
