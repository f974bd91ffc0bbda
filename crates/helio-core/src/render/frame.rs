use bytemuck::{Pod, Zeroable};

use crate::api::types::EntityId;
use crate::core::scene::Scene;
use crate::systems::camera::CameraPose;

/// Per-body data written to a flat buffer for the external renderer.
/// Must match the TypeScript protocol: 12 floats = 48 bytes stride.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, Pod, Zeroable)]
pub struct BodyInstance {
    /// Entity id (stable across frames; the renderer keys meshes on it).
    pub id: f32,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// Bounding radius — the renderer scales its sphere to this.
    pub radius: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    /// Emissive intensity (0 = unlit).
    pub emissive: f32,
    /// 1.0 when visible.
    pub active: f32,
    pub _pad0: f32,
    pub _pad1: f32,
}

impl BodyInstance {
    pub const FLOATS: usize = 12;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;
}

/// Ship transform for the renderer: position, orientation quaternion,
/// appearance variant. 8 floats = 32 bytes.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, Pod, Zeroable)]
pub struct ShipInstance {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub qx: f32,
    pub qy: f32,
    pub qz: f32,
    pub qw: f32,
    pub variant: f32,
}

impl ShipInstance {
    pub const FLOATS: usize = 8;
}

/// Camera pose for the renderer: position, look target, vertical FOV in
/// degrees, effective mode code. 8 floats = 32 bytes.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, Pod, Zeroable)]
pub struct CameraInstance {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub look_x: f32,
    pub look_y: f32,
    pub look_z: f32,
    pub fov: f32,
    pub mode: f32,
}

impl CameraInstance {
    pub const FLOATS: usize = 8;
}

/// All render-facing output for one tick. The bridge exposes raw pointers
/// into this; JS copies the sections it needs and requests a redraw.
pub struct FrameBuffer {
    pub bodies: Vec<BodyInstance>,
    pub ship: ShipInstance,
    pub camera: CameraInstance,
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self {
            bodies: Vec::with_capacity(32),
            ship: ShipInstance::default(),
            camera: CameraInstance::default(),
        }
    }

    pub fn clear(&mut self) {
        self.bodies.clear();
    }

    pub fn body_count(&self) -> u32 {
        self.bodies.len() as u32
    }

    /// Raw pointer to body data for SharedArrayBuffer reads.
    pub fn bodies_ptr(&self) -> *const f32 {
        self.bodies.as_ptr() as *const f32
    }

    pub fn ship_ptr(&self) -> *const f32 {
        &self.ship as *const ShipInstance as *const f32
    }

    pub fn camera_ptr(&self) -> *const f32 {
        &self.camera as *const CameraInstance as *const f32
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Fill the frame buffer from the scene and the camera pose. Runs after the
/// session tick, every frame, so renderer state lags the simulation by at
/// most one tick.
pub fn build_frame(
    scene: &Scene,
    ship: Option<EntityId>,
    ship_variant: u32,
    pose: &CameraPose,
    camera_mode_code: f32,
    buffer: &mut FrameBuffer,
) {
    buffer.clear();

    for entity in scene.iter() {
        let Some(visual) = entity.visual else { continue };
        buffer.bodies.push(BodyInstance {
            id: entity.id.0 as f32,
            x: entity.pos.x,
            y: entity.pos.y,
            z: entity.pos.z,
            radius: entity.radius,
            r: visual.color.0,
            g: visual.color.1,
            b: visual.color.2,
            emissive: visual.emissive,
            active: if entity.active { 1.0 } else { 0.0 },
            _pad0: 0.0,
            _pad1: 0.0,
        });
    }

    if let Some(ship_entity) = ship.and_then(|id| scene.get(id)) {
        buffer.ship = ShipInstance {
            x: ship_entity.pos.x,
            y: ship_entity.pos.y,
            z: ship_entity.pos.z,
            qx: ship_entity.rotation.x,
            qy: ship_entity.rotation.y,
            qz: ship_entity.rotation.z,
            qw: ship_entity.rotation.w,
            variant: ship_variant as f32,
        };
    }

    buffer.camera = CameraInstance {
        x: pose.pos.x,
        y: pose.pos.y,
        z: pose.pos.z,
        look_x: pose.look.x,
        look_y: pose.look.y,
        look_z: pose.look.z,
        fov: pose.fov,
        mode: camera_mode_code,
    };
}
