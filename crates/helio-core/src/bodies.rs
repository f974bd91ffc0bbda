/// Celestial body catalog — names, layout and visual properties.
///
/// Distances and sizes are presentation-scaled, not astronomical; the catalog
/// is the procedural fallback that keeps the scene working when no external
/// assets resolve.

use glam::Vec3;

use crate::api::types::EntityId;
use crate::core::scene::{BodyVisual, Entity, Scene};
use crate::extensions::hierarchy::{LocalTransform, TransformGraph};

/// One catalog row.
pub struct BodySpec {
    pub name: &'static str,
    /// Distance from the sun along +X, in world units.
    pub distance: f32,
    /// Bounding radius in world units.
    pub radius: f32,
    pub color: (f32, f32, f32),
    pub emissive: f32,
}

pub const BODY_COUNT: usize = 7;

/// The default system, sun first.
pub const BODIES: [BodySpec; BODY_COUNT] = [
    BodySpec { name: "Sun", distance: 0.0, radius: 2.0, color: (1.0, 1.0, 0.0), emissive: 1.5 },
    BodySpec { name: "Mercury", distance: 10.0, radius: 0.5, color: (0.53, 0.53, 0.53), emissive: 0.0 },
    BodySpec { name: "Venus", distance: 15.0, radius: 0.7, color: (1.0, 1.0, 0.53), emissive: 0.0 },
    BodySpec { name: "Earth", distance: 20.0, radius: 0.8, color: (0.27, 0.27, 1.0), emissive: 0.0 },
    BodySpec { name: "Mars", distance: 25.0, radius: 0.6, color: (1.0, 0.27, 0.27), emissive: 0.0 },
    BodySpec { name: "Jupiter", distance: 40.0, radius: 1.5, color: (1.0, 0.67, 0.27), emissive: 0.0 },
    BodySpec { name: "Saturn", distance: 50.0, radius: 1.3, color: (1.0, 0.87, 0.53), emissive: 0.0 },
];

/// Where the ship starts, outside the outermost orbit.
pub const SHIP_START: Vec3 = Vec3::new(0.0, 0.0, 50.0);
pub const SHIP_NAME: &str = "ship";
pub const SHIP_RADIUS: f32 = 1.0;

/// Spawn the body catalog into the scene and hierarchy: one root group node
/// with every body parented under it at its catalog offset. Returns the body
/// ids in catalog order (the default tour route).
pub fn spawn_system(scene: &mut Scene, graph: &mut TransformGraph, next_id: &mut u32) -> Vec<EntityId> {
    let root = alloc(next_id);
    scene.spawn(Entity::new(root).with_name("solar_system"));
    graph.register(root);

    let mut ids = Vec::with_capacity(BODY_COUNT);
    for spec in &BODIES {
        let id = alloc(next_id);
        scene.spawn(
            Entity::new(id)
                .with_name(spec.name)
                .with_radius(spec.radius)
                .with_visual(BodyVisual::new(spec.color).with_emissive(spec.emissive)),
        );
        graph.register_with(
            id,
            LocalTransform::new().with_offset(Vec3::new(spec.distance, 0.0, 0.0)),
        );
        graph.set_parent(id, Some(root));
        ids.push(id);
    }

    graph.propagate(scene);
    ids
}

/// Spawn the spaceship at its start position. The ship has no catalog visual;
/// the renderer picks a model by variant index.
pub fn spawn_ship(scene: &mut Scene, next_id: &mut u32) -> EntityId {
    let id = alloc(next_id);
    scene.spawn(
        Entity::new(id)
            .with_name(SHIP_NAME)
            .with_pos(SHIP_START)
            .with_radius(SHIP_RADIUS),
    );
    id
}

fn alloc(next_id: &mut u32) -> EntityId {
    let id = EntityId(*next_id);
    *next_id += 1;
    id
}
