use glam::{Quat, Vec3};

use crate::api::types::EntityId;

/// Visual properties handed through to the external renderer, which owns
/// meshes and materials. The core never interprets them.
#[derive(Debug, Clone, Copy)]
pub struct BodyVisual {
    /// Base color as linear RGB in [0, 1].
    pub color: (f32, f32, f32),
    /// Emissive intensity (0 = unlit surface).
    pub emissive: f32,
}

impl BodyVisual {
    pub fn new(color: (f32, f32, f32)) -> Self {
        Self {
            color,
            emissive: 0.0,
        }
    }

    pub fn with_emissive(mut self, emissive: f32) -> Self {
        self.emissive = emissive;
        self
    }
}

/// Fat entity — a celestial body or the spaceship.
///
/// `name` is the stable identity used for content lookup and must be unique
/// within a scene. `radius` is the approximate bounding radius, derived once
/// at spawn; world transforms are written by the transform hierarchy and may
/// lag a reparent by at most one propagate call.
#[derive(Debug, Clone)]
pub struct Entity {
    /// Unique identifier.
    pub id: EntityId,
    /// Stable name for content lookup and UI display.
    pub name: String,
    /// Whether this entity participates in ticks and frames.
    pub active: bool,
    /// Position in world space.
    pub pos: Vec3,
    /// Orientation in world space.
    pub rotation: Quat,
    /// Approximate bounding radius in world units.
    pub radius: f32,
    /// Renderer-facing appearance (None for the ship — it is selected by
    /// variant index instead).
    pub visual: Option<BodyVisual>,
}

impl Entity {
    /// Create a new entity with the given ID at the origin.
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            name: String::new(),
            active: true,
            pos: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            radius: 0.0,
            visual: None,
        }
    }

    // -- Builder pattern --

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_pos(mut self, pos: Vec3) -> Self {
        self.pos = pos;
        self
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_visual(mut self, visual: BodyVisual) -> Self {
        self.visual = Some(visual);
        self
    }
}

/// Simple entity storage using a flat Vec.
/// Designed for small entity counts (a solar system, not a galaxy).
pub struct Scene {
    entities: Vec<Entity>,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            entities: Vec::with_capacity(32),
        }
    }

    /// Add an entity to the scene.
    pub fn spawn(&mut self, entity: Entity) {
        self.entities.push(entity);
    }

    /// Remove an entity by ID. Returns the removed entity if found.
    pub fn despawn(&mut self, id: EntityId) -> Option<Entity> {
        self.entities
            .iter()
            .position(|e| e.id == id)
            .map(|idx| self.entities.swap_remove(idx))
    }

    /// Get a reference to an entity by ID.
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    /// Get a mutable reference to an entity by ID.
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    /// Find the first entity with the given name.
    pub fn find_by_name(&self, name: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.name == name)
    }

    /// Iterate over all entities.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    /// Iterate over all entities mutably.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.iter_mut()
    }

    /// Number of entities in the scene.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the scene is empty.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Clear all entities.
    pub fn clear(&mut self) {
        self.entities.clear();
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_and_get() {
        let mut scene = Scene::new();
        let id = EntityId(1);
        scene.spawn(Entity::new(id).with_pos(Vec3::new(10.0, 0.0, 20.0)));
        let e = scene.get(id).unwrap();
        assert_eq!(e.pos, Vec3::new(10.0, 0.0, 20.0));
    }

    #[test]
    fn despawn_removes_entity() {
        let mut scene = Scene::new();
        let id = EntityId(1);
        scene.spawn(Entity::new(id));
        assert_eq!(scene.len(), 1);
        scene.despawn(id);
        assert!(scene.is_empty());
    }

    #[test]
    fn find_by_name() {
        let mut scene = Scene::new();
        scene.spawn(Entity::new(EntityId(1)).with_name("earth"));
        scene.spawn(Entity::new(EntityId(2)).with_name("mars"));
        let earth = scene.find_by_name("earth").unwrap();
        assert_eq!(earth.id, EntityId(1));
    }

    #[test]
    fn absent_name_is_none() {
        let scene = Scene::new();
        assert!(scene.find_by_name("pluto").is_none());
    }
}
