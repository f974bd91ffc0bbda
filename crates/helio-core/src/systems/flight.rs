use glam::{EulerRot, Quat, Vec3};

use crate::api::config::{AutopilotTuning, BoostTuning, FlightTuning};
use crate::api::types::EntityId;
use crate::core::scene::Scene;
use crate::input::state::{InputState, Key};

/// Flight mode — one tagged variant instead of overlapping booleans, so
/// invalid combinations (touring while manually flying, say) cannot exist.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FlightMode {
    /// Direct pilot control.
    Manual,
    /// Interpolating toward a commanded target point, facing `entity`.
    Autopilot { target: Vec3, entity: EntityId },
    /// Ship at rest; the renderer's orbit controls may drive the camera.
    Idle,
}

impl FlightMode {
    /// Numeric code for event payloads and the frame header.
    pub fn code(&self) -> f32 {
        match self {
            FlightMode::Manual => 0.0,
            FlightMode::Autopilot { .. } => 1.0,
            FlightMode::Idle => 2.0,
        }
    }

    pub fn is_autopilot(&self) -> bool {
        matches!(self, FlightMode::Autopilot { .. })
    }
}

/// Computes the ship transform each tick from input (manual) or from a
/// commanded target (autopilot). Owns velocity, attitude and boost state;
/// writes position/rotation into the ship entity.
pub struct FlightController {
    tuning: FlightTuning,
    autopilot: AutopilotTuning,
    boost: BoostTuning,
    mode: FlightMode,
    ship: Option<EntityId>,
    /// Blended velocity in ship-local axes, world units per second.
    velocity: Vec3,
    yaw: f32,
    pitch: f32,
    /// Smoothed boost engagement in [0, 1].
    boost_level: f32,
    /// Entity arrived at this tick, drained by the session. Set at most once
    /// per commanded flight: the Autopilot -> Idle transition is the only
    /// writer.
    arrived: Option<EntityId>,
}

impl FlightController {
    pub fn new(tuning: FlightTuning, autopilot: AutopilotTuning, boost: BoostTuning) -> Self {
        Self {
            tuning,
            autopilot,
            boost,
            mode: FlightMode::Manual,
            ship: None,
            velocity: Vec3::ZERO,
            yaw: 0.0,
            pitch: 0.0,
            boost_level: 0.0,
            arrived: None,
        }
    }

    /// Attach the controller to the ship entity.
    pub fn set_ship(&mut self, ship: EntityId) {
        self.ship = Some(ship);
    }

    pub fn ship(&self) -> Option<EntityId> {
        self.ship
    }

    pub fn mode(&self) -> FlightMode {
        self.mode
    }

    /// Switch to manual control, cancelling any autopilot flight.
    pub fn set_manual(&mut self) {
        self.mode = FlightMode::Manual;
    }

    /// Release the ship: no control input, orbit camera allowed.
    pub fn set_idle(&mut self) {
        self.mode = FlightMode::Idle;
        self.velocity = Vec3::ZERO;
    }

    /// Current speed cap, boost included.
    pub fn speed_cap(&self) -> f32 {
        self.tuning.max_speed * (1.0 + (self.boost.multiplier - 1.0) * self.boost_level)
    }

    /// Smoothed boost engagement in [0, 1], read by the camera for FOV.
    pub fn boost_level(&self) -> f32 {
        self.boost_level
    }

    /// Command a flight to an entity. The stop point backs off from the body
    /// center toward the ship by the clamped bounding radius plus a margin,
    /// so the ship parks near the surface instead of inside it.
    ///
    /// Returns false (no state change) when no ship exists — the caller
    /// degrades to presenting the entity's overlay directly.
    pub fn command_fly_to(&mut self, scene: &Scene, entity: EntityId) -> bool {
        let Some(ship_id) = self.ship else { return false };
        let Some(ship_pos) = scene.get(ship_id).map(|e| e.pos) else {
            return false;
        };
        let Some(body) = scene.get(entity) else { return false };

        let stand_off = body.radius.min(self.autopilot.max_stop_radius) + self.autopilot.approach_margin;
        let dir = (body.pos - ship_pos).normalize_or_zero();
        let target = if dir == Vec3::ZERO {
            body.pos
        } else {
            body.pos - dir * stand_off
        };

        self.velocity = Vec3::ZERO;
        self.mode = FlightMode::Autopilot { target, entity };
        true
    }

    /// Advance one tick. Reads input only in manual mode; writes the ship's
    /// transform into the scene.
    pub fn tick(&mut self, dt: f32, input: &mut InputState, suppress_ascend: bool, scene: &mut Scene) {
        // Boost engagement blends toward held/released in every mode, so the
        // cap decays back smoothly after release.
        let boost_target = if self.mode == FlightMode::Manual && input.is_pressed(Key::Boost) {
            1.0
        } else {
            0.0
        };
        let boost_blend = (self.boost.response * dt).min(1.0);
        self.boost_level += (boost_target - self.boost_level) * boost_blend;

        // Drain drag every tick; stale deltas from a non-manual stretch must
        // not slam the attitude when manual control resumes.
        let look = input.take_look_delta();

        match self.mode {
            FlightMode::Manual => self.tick_manual(dt, look, input, suppress_ascend, scene),
            FlightMode::Autopilot { target, entity } => self.tick_autopilot(target, entity, scene),
            FlightMode::Idle => {
                // Coast to rest through the same blend as manual deceleration.
                let blend = (self.tuning.accel * dt).min(1.0);
                self.velocity += (Vec3::ZERO - self.velocity) * blend;
            }
        }
    }

    /// The arrival fired this tick, if any. Draining resets it, so each
    /// commanded flight reports exactly once.
    pub fn take_arrival(&mut self) -> Option<EntityId> {
        self.arrived.take()
    }

    fn tick_manual(
        &mut self,
        dt: f32,
        (dx, dy): (f32, f32),
        input: &InputState,
        suppress_ascend: bool,
        scene: &mut Scene,
    ) {
        // Attitude: pointer drag plus dedicated rotate keys.
        self.yaw -= dx * self.tuning.look_sensitivity;
        self.pitch -= dy * self.tuning.look_sensitivity;

        if input.is_pressed(Key::YawLeft) {
            self.yaw += self.tuning.rotate_speed * dt;
        }
        if input.is_pressed(Key::YawRight) {
            self.yaw -= self.tuning.rotate_speed * dt;
        }
        let pitch_rate = self.tuning.rotate_speed * self.tuning.key_pitch_factor * dt;
        if input.is_pressed(Key::PitchUp) {
            self.pitch += pitch_rate;
        }
        if input.is_pressed(Key::PitchDown) {
            self.pitch -= pitch_rate;
        }
        self.pitch = self.pitch.clamp(-self.tuning.pitch_limit, self.tuning.pitch_limit);

        // Target velocity from pressed axes, capped; zero input leaves the
        // target at zero and the ship decelerates through the same blend.
        let axes = input.axes(suppress_ascend);
        let target_velocity = if axes == Vec3::ZERO {
            Vec3::ZERO
        } else {
            axes.normalize() * self.speed_cap()
        };
        let blend = (self.tuning.accel * dt).min(1.0);
        self.velocity += (target_velocity - self.velocity) * blend;

        let rotation = Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0);
        // Forward/strafe follow the nose; vertical thrust stays world-space.
        let delta = rotation * Vec3::new(self.velocity.x, 0.0, self.velocity.z) * dt
            + Vec3::new(0.0, self.velocity.y, 0.0) * dt;

        if let Some(ship) = self.ship.and_then(|id| scene.get_mut(id)) {
            ship.pos += delta;
            ship.rotation = rotation;
        }
    }

    fn tick_autopilot(&mut self, target: Vec3, entity: EntityId, scene: &mut Scene) {
        let Some(ship_id) = self.ship else {
            self.mode = FlightMode::Idle;
            return;
        };
        let body_pos = scene.get(entity).map(|e| e.pos);
        let Some(ship) = scene.get_mut(ship_id) else {
            self.mode = FlightMode::Idle;
            return;
        };

        // Fractional approach: closing speed decays with remaining distance,
        // so arrival is a threshold, never an equality.
        ship.pos = ship.pos.lerp(target, self.autopilot.closing_rate.min(1.0));

        let mut facing = None;
        if let Some(body_pos) = body_pos {
            let dir = (body_pos - ship.pos).normalize_or_zero();
            if dir != Vec3::ZERO {
                let desired = Quat::from_rotation_arc(Vec3::NEG_Z, dir);
                ship.rotation = ship.rotation.slerp(desired, self.autopilot.slew_rate.min(1.0));
                facing = Some(dir);
            }
        }

        if ship.pos.distance(target) < self.autopilot.arrive_distance {
            // Keep manual attitude continuous with where autopilot left the nose.
            if let Some(dir) = facing {
                self.yaw = (-dir.x).atan2(-dir.z);
                self.pitch = dir.y.clamp(-1.0, 1.0).asin();
            }
            self.velocity = Vec3::ZERO;
            self.mode = FlightMode::Idle;
            self.arrived = Some(entity);
        }
    }
}
