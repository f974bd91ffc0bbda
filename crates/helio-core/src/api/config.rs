use glam::Vec3;

/// Top-level configuration for a session.
///
/// Every rate and threshold the update loop reads lives here — the tuning
/// values are presentation feel, not behavior, and pages may override them.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Fixed timestep in seconds (default: 1/60).
    pub fixed_dt: f32,
    /// Maximum number of UI events buffered per frame (default: 32).
    pub max_events: usize,
    pub flight: FlightTuning,
    pub autopilot: AutopilotTuning,
    pub boost: BoostTuning,
    pub camera: CameraTuning,
    pub proximity: ProximityTuning,
    pub tour: TourTuning,
    pub intro: IntroTuning,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            max_events: 32,
            flight: FlightTuning::default(),
            autopilot: AutopilotTuning::default(),
            boost: BoostTuning::default(),
            camera: CameraTuning::default(),
            proximity: ProximityTuning::default(),
            tour: TourTuning::default(),
            intro: IntroTuning::default(),
        }
    }
}

/// Manual flight feel.
#[derive(Debug, Clone)]
pub struct FlightTuning {
    /// Speed cap in world units per second.
    pub max_speed: f32,
    /// Velocity blend rate per second (higher = snappier, never instant).
    pub accel: f32,
    /// Yaw/pitch rate from rotate keys, radians per second.
    pub rotate_speed: f32,
    /// Pitch rate from pitch keys, as a fraction of `rotate_speed`.
    pub key_pitch_factor: f32,
    /// Radians of look per pixel of pointer drag.
    pub look_sensitivity: f32,
    /// Pitch clamp in radians (prevents inversion).
    pub pitch_limit: f32,
}

impl Default for FlightTuning {
    fn default() -> Self {
        Self {
            max_speed: 36.0,
            accel: 8.0,
            rotate_speed: 4.8,
            key_pitch_factor: 0.5,
            look_sensitivity: 0.005,
            pitch_limit: std::f32::consts::FRAC_PI_2,
        }
    }
}

/// Autopilot (fly-to-target) feel.
#[derive(Debug, Clone)]
pub struct AutopilotTuning {
    /// Fraction of the remaining distance closed per tick.
    pub closing_rate: f32,
    /// Orientation slerp factor per tick toward facing the target.
    pub slew_rate: f32,
    /// Arrival threshold in world units. Must be generous: the fractional
    /// lerp approaches the target asymptotically and never reaches it.
    pub arrive_distance: f32,
    /// Extra stand-off beyond the body surface at the stop point.
    pub approach_margin: f32,
    /// Bounding radii above this are clamped when computing the stop point,
    /// so oversized bodies do not force an unreasonably distant stop.
    pub max_stop_radius: f32,
}

impl Default for AutopilotTuning {
    fn default() -> Self {
        Self {
            closing_rate: 0.1,
            slew_rate: 0.1,
            arrive_distance: 0.5,
            approach_margin: 0.5,
            max_stop_radius: 5.0,
        }
    }
}

/// Boost modifier feel.
#[derive(Debug, Clone)]
pub struct BoostTuning {
    /// Speed-cap multiplier at full boost.
    pub multiplier: f32,
    /// Blend rate per second for the boost level (rise and decay).
    pub response: f32,
    /// Degrees added to the FOV target at full boost.
    pub fov_gain: f32,
}

impl Default for BoostTuning {
    fn default() -> Self {
        Self {
            multiplier: 3.0,
            response: 4.0,
            fov_gain: 15.0,
        }
    }
}

/// Camera rig feel. Offsets are in ship-local space with -Z forward.
#[derive(Debug, Clone)]
pub struct CameraTuning {
    /// Third-person offset (behind and above the ship).
    pub third_person_offset: Vec3,
    /// Third-person position blend factor per tick.
    pub follow_rate: f32,
    /// Vertical look-target bias applied per radian of pitch.
    pub look_pitch_bias: f32,
    /// Cockpit offset (snapped, never smoothed).
    pub cockpit_offset: Vec3,
    /// Distance ahead of the nose the cockpit view looks at.
    pub look_ahead: f32,
    /// Chase offset during a free-flight autopilot command.
    pub chase_offset: Vec3,
    /// Chase offset during a tour (closer and lower, cinematic).
    pub tour_chase_offset: Vec3,
    /// Chase position blend factor per tick.
    pub chase_rate: f32,
    /// Base vertical field of view in degrees.
    pub base_fov: f32,
    /// FOV blend factor per tick toward the current target.
    pub fov_rate: f32,
}

impl Default for CameraTuning {
    fn default() -> Self {
        Self {
            third_person_offset: Vec3::new(0.0, 3.0, 10.0),
            follow_rate: 0.35,
            look_pitch_bias: 2.0,
            cockpit_offset: Vec3::new(0.0, 0.5, -1.5),
            look_ahead: 10.0,
            chase_offset: Vec3::new(0.0, 4.0, 12.0),
            tour_chase_offset: Vec3::new(0.0, 1.5, 3.0),
            chase_rate: 0.1,
            base_fov: 60.0,
            fov_rate: 0.1,
        }
    }
}

/// Proximity detector tuning.
#[derive(Debug, Clone)]
pub struct ProximityTuning {
    /// Interaction distance in world units.
    pub threshold: f32,
    /// Run the scan every Nth tick (cost control).
    pub interval_ticks: u32,
}

impl Default for ProximityTuning {
    fn default() -> Self {
        Self {
            threshold: 25.0,
            interval_ticks: 3,
        }
    }
}

/// Tour sequencer tuning.
#[derive(Debug, Clone)]
pub struct TourTuning {
    /// Seconds the overlay stays up at each stop before auto-advancing.
    pub dwell: f32,
    /// Per-leg guard in seconds: if autopilot has not arrived by then, the
    /// leg is forced to its terminal state so the tour cannot stall.
    pub leg_timeout: f32,
}

impl Default for TourTuning {
    fn default() -> Self {
        Self {
            dwell: 3.0,
            leg_timeout: 20.0,
        }
    }
}

/// Cinematic intro tuning.
#[derive(Debug, Clone)]
pub struct IntroTuning {
    /// Seconds spent orbiting each body.
    pub step_duration: f32,
    /// Total guard in seconds; on expiry the intro jumps to its terminal state.
    pub max_duration: f32,
    /// Camera orbit radius around each body.
    pub orbit_distance: f32,
    /// Camera height above each body.
    pub orbit_height: f32,
    /// Camera position blend factor per tick.
    pub follow_rate: f32,
}

impl Default for IntroTuning {
    fn default() -> Self {
        Self {
            step_duration: 3.0,
            max_duration: 30.0,
            orbit_distance: 30.0,
            orbit_height: 10.0,
            follow_rate: 0.05,
        }
    }
}
