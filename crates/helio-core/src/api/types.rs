use bytemuck::{Pod, Zeroable};

/// Unique identifier for an entity in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityId(pub u32);

/// An event communicated from the core to the page (overlay presenter, HUD).
/// Generic container: `kind` identifies the event, `a/b/c` carry payload.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, Pod, Zeroable)]
pub struct UiEvent {
    pub kind: f32,
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl UiEvent {
    pub const FLOATS: usize = 4;
}

// ── Event kinds to the page ──────────────────────────────────────────

/// Autopilot reached its target. a = entity id.
pub const EVENT_ARRIVED: f32 = 1.0;
/// Nearest-body report. a = entity id (-1 = none), b = strength in [0, 1].
pub const EVENT_PROXIMITY: f32 = 2.0;
/// Present the overlay for an entity. a = entity id, b = 1 while touring.
pub const EVENT_SHOW_OVERLAY: f32 = 3.0;
/// Dismiss the overlay (tour advancing, tour cancelled).
pub const EVENT_CLOSE_OVERLAY: f32 = 4.0;
/// Flight mode changed. a = mode code.
pub const EVENT_FLIGHT_MODE: f32 = 5.0;
/// Camera mode changed. a = mode code.
pub const EVENT_CAMERA_MODE: f32 = 6.0;
/// Tour state. a = 1 active / 0 inactive, b = stop index, c = route length.
pub const EVENT_TOUR_STATE: f32 = 7.0;
/// Ship appearance selection changed. a = variant index.
pub const EVENT_SHIP_VARIANT: f32 = 8.0;
/// Cinematic intro progress. a = step index, b = 1 running / 0 finished.
pub const EVENT_INTRO_STEP: f32 = 9.0;
