use glam::{EulerRot, Vec3};

use crate::api::config::CameraTuning;
use crate::core::scene::Entity;
use crate::systems::flight::FlightMode;

/// Camera view, switched by explicit toggle. Orbit hands the camera to the
/// renderer's own controls and is only available while flight is idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMode {
    ThirdPerson,
    Cockpit,
    Orbit,
}

impl CameraMode {
    /// Numeric code for the frame buffer and event payloads.
    pub fn code(&self) -> f32 {
        match self {
            CameraMode::ThirdPerson => 0.0,
            CameraMode::Cockpit => 1.0,
            CameraMode::Orbit => 2.0,
        }
    }
}

/// Desired camera transform, consumed by the external renderer.
#[derive(Debug, Clone, Copy)]
pub struct CameraPose {
    pub pos: Vec3,
    pub look: Vec3,
    pub fov: f32,
}

/// Computes the camera pose each tick from the ship transform and the
/// current flight situation.
pub struct CameraRig {
    tuning: CameraTuning,
    mode: CameraMode,
    /// View actually in effect this tick (orbit falls back to third-person
    /// while flight is active).
    effective: CameraMode,
    pose: CameraPose,
    fov_target: f32,
}

impl CameraRig {
    pub fn new(tuning: CameraTuning) -> Self {
        let fov = tuning.base_fov;
        Self {
            tuning,
            mode: CameraMode::ThirdPerson,
            effective: CameraMode::ThirdPerson,
            pose: CameraPose {
                pos: Vec3::new(0.0, 15.0, 30.0),
                look: Vec3::ZERO,
                fov,
            },
            fov_target: fov,
        }
    }

    pub fn mode(&self) -> CameraMode {
        self.mode
    }

    /// The view in effect after the orbit gate, as of the last tick.
    pub fn effective_mode(&self) -> CameraMode {
        self.effective
    }

    pub fn set_mode(&mut self, mode: CameraMode) {
        self.mode = mode;
    }

    /// Toggle between the two flight views.
    pub fn toggle_view(&mut self) {
        self.mode = match self.mode {
            CameraMode::Cockpit => CameraMode::ThirdPerson,
            _ => CameraMode::Cockpit,
        };
    }

    pub fn pose(&self) -> &CameraPose {
        &self.pose
    }

    /// Override the pose directly (scripted sequences).
    pub fn set_pose(&mut self, pos: Vec3, look: Vec3) {
        self.pose.pos = pos;
        self.pose.look = look;
    }

    /// Where the FOV should blend toward (boost widens it).
    pub fn set_fov_target(&mut self, fov: f32) {
        self.fov_target = fov;
    }

    pub fn base_fov(&self) -> f32 {
        self.tuning.base_fov
    }

    /// Advance one tick. `chase_target` is the commanded entity while
    /// autopilot is active; `touring` selects the tighter cinematic framing.
    pub fn tick(&mut self, flight: &FlightMode, touring: bool, ship: &Entity, chase_target: Option<&Entity>) {
        self.pose.fov += (self.fov_target - self.pose.fov) * self.tuning.fov_rate.min(1.0);

        // Orbit is gated on idle flight; otherwise fall back to third-person.
        self.effective = match (self.mode, flight) {
            (CameraMode::Orbit, FlightMode::Idle) => CameraMode::Orbit,
            (CameraMode::Orbit, _) => CameraMode::ThirdPerson,
            (mode, _) => mode,
        };

        if flight.is_autopilot() {
            self.tick_chase(touring, ship, chase_target);
            return;
        }

        match self.effective {
            CameraMode::Cockpit => self.tick_cockpit(ship),
            CameraMode::ThirdPerson => self.tick_third_person(ship),
            // External controls own the camera; keep the last pose.
            CameraMode::Orbit => {}
        }
    }

    /// Chase framing: closer and lower during a tour than during a
    /// free-flight command, looking at the commanded body.
    fn tick_chase(&mut self, touring: bool, ship: &Entity, chase_target: Option<&Entity>) {
        let offset = if touring {
            self.tuning.tour_chase_offset
        } else {
            self.tuning.chase_offset
        };
        let desired = ship.pos + ship.rotation * offset;
        self.pose.pos = self.pose.pos.lerp(desired, self.tuning.chase_rate.min(1.0));
        self.pose.look = chase_target.map(|e| e.pos).unwrap_or(ship.pos);
    }

    /// Cockpit snaps every tick — any lag here reads as simulator sickness.
    fn tick_cockpit(&mut self, ship: &Entity) {
        self.pose.pos = ship.pos + ship.rotation * self.tuning.cockpit_offset;
        self.pose.look = ship.pos + ship.rotation * (Vec3::NEG_Z * self.tuning.look_ahead);
    }

    fn tick_third_person(&mut self, ship: &Entity) {
        let desired = ship.pos + ship.rotation * self.tuning.third_person_offset;
        self.pose.pos = self.pose.pos.lerp(desired, self.tuning.follow_rate.min(1.0));

        let (_, pitch, _) = ship.rotation.to_euler(EulerRot::YXZ);
        let mut look = ship.pos;
        look.y += pitch.sin() * self.tuning.look_pitch_bias;
        self.pose.look = look;
    }
}
