use std::f32::consts::TAU;

use glam::Vec3;

use crate::api::config::IntroTuning;
use crate::api::types::EntityId;
use crate::core::scene::Scene;
use crate::extensions::easing::Easing;
use crate::systems::camera::CameraRig;

/// Signal from an intro tick that the session turns into UI events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntroSignal {
    /// Moved on to the body at this route index.
    Advanced(usize),
    /// The pass is over (route exhausted or guard expired).
    Finished,
}

#[derive(Debug)]
struct ActiveIntro {
    step: usize,
    step_timer: f32,
    total: f32,
}

/// Cinematic intro — a scripted camera pass that orbits each body in turn
/// before handing control back. While active it overrides the camera rig's
/// pose and manual flight is suppressed.
pub struct IntroSequencer {
    tuning: IntroTuning,
    active: Option<ActiveIntro>,
}

impl IntroSequencer {
    pub fn new(tuning: IntroTuning) -> Self {
        Self {
            tuning,
            active: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn step(&self) -> Option<usize> {
        self.active.as_ref().map(|i| i.step)
    }

    /// Begin the pass. Returns false for an empty route.
    pub fn start(&mut self, body_count: usize) -> bool {
        if body_count == 0 {
            return false;
        }
        self.active = Some(ActiveIntro {
            step: 0,
            step_timer: 0.0,
            total: 0.0,
        });
        true
    }

    pub fn cancel(&mut self) {
        self.active = None;
    }

    /// Advance one tick, steering the rig around the current body.
    pub fn tick(
        &mut self,
        dt: f32,
        route: &[EntityId],
        scene: &Scene,
        rig: &mut CameraRig,
    ) -> Option<IntroSignal> {
        let intro = self.active.as_mut()?;

        intro.total += dt;
        if intro.total >= self.tuning.max_duration {
            // Guard: an unreachable step must not stall interaction forever.
            self.active = None;
            return Some(IntroSignal::Finished);
        }

        intro.step_timer += dt;
        if intro.step_timer >= self.tuning.step_duration {
            intro.step_timer = 0.0;
            intro.step += 1;
            if intro.step >= route.len() {
                self.active = None;
                return Some(IntroSignal::Finished);
            }
            return Some(IntroSignal::Advanced(intro.step));
        }

        // Bodies missing from the scene are skipped on the next step change.
        let body_pos = route
            .get(intro.step)
            .and_then(|id| scene.get(*id))
            .map(|e| e.pos);
        if let Some(center) = body_pos {
            let progress = intro.step_timer / self.tuning.step_duration;
            let angle = Easing::SineInOut.apply(progress) * TAU;
            let desired = center
                + Vec3::new(
                    angle.cos() * self.tuning.orbit_distance,
                    self.tuning.orbit_height,
                    angle.sin() * self.tuning.orbit_distance,
                );
            let pos = rig.pose().pos.lerp(desired, self.tuning.follow_rate.min(1.0));
            rig.set_pose(pos, center);
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::config::SessionConfig;
    use crate::core::scene::Entity;

    const DT: f32 = 1.0 / 60.0;

    fn tuning() -> IntroTuning {
        IntroTuning {
            step_duration: 0.5,
            max_duration: 2.0,
            ..SessionConfig::default().intro
        }
    }

    fn scene_with_bodies(positions: &[Vec3]) -> (Scene, Vec<EntityId>) {
        let mut scene = Scene::new();
        let mut ids = Vec::new();
        for (i, pos) in positions.iter().enumerate() {
            let id = EntityId(i as u32 + 1);
            scene.spawn(Entity::new(id).with_pos(*pos));
            ids.push(id);
        }
        (scene, ids)
    }

    #[test]
    fn empty_route_does_not_start() {
        let mut intro = IntroSequencer::new(tuning());
        assert!(!intro.start(0));
        assert!(!intro.is_active());
    }

    #[test]
    fn steps_advance_and_finish() {
        let (scene, ids) = scene_with_bodies(&[Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0)]);
        let mut rig = CameraRig::new(SessionConfig::default().camera);
        let mut intro = IntroSequencer::new(tuning());
        intro.start(ids.len());

        let mut signals = Vec::new();
        for _ in 0..80 {
            if let Some(sig) = intro.tick(DT, &ids, &scene, &mut rig) {
                signals.push(sig);
            }
        }
        assert_eq!(signals, vec![IntroSignal::Advanced(1), IntroSignal::Finished]);
        assert!(!intro.is_active());
    }

    #[test]
    fn guard_forces_completion() {
        let (scene, ids) = scene_with_bodies(&[Vec3::ZERO]);
        let mut rig = CameraRig::new(SessionConfig::default().camera);
        // A step longer than the whole guard window.
        let mut intro = IntroSequencer::new(IntroTuning {
            step_duration: 100.0,
            max_duration: 1.0,
            ..SessionConfig::default().intro
        });
        intro.start(ids.len());

        let mut finished = false;
        for _ in 0..120 {
            if intro.tick(DT, &ids, &scene, &mut rig) == Some(IntroSignal::Finished) {
                finished = true;
                break;
            }
        }
        assert!(finished);
        assert!(!intro.is_active());
    }

    #[test]
    fn camera_orbits_the_current_body() {
        let center = Vec3::new(100.0, 0.0, 0.0);
        let (scene, ids) = scene_with_bodies(&[center]);
        let cfg = SessionConfig::default();
        let mut rig = CameraRig::new(cfg.camera);
        let mut intro = IntroSequencer::new(IntroTuning {
            step_duration: 10.0,
            max_duration: 60.0,
            ..cfg.intro
        });
        intro.start(1);

        for _ in 0..300 {
            intro.tick(DT, &ids, &scene, &mut rig);
        }
        // The pose converges onto the orbit ring and looks at the body.
        let radial = rig.pose().pos - center;
        assert!((radial.y - cfg.intro.orbit_height).abs() < 2.0);
        let ring = Vec3::new(radial.x, 0.0, radial.z).length();
        assert!((ring - cfg.intro.orbit_distance).abs() < 6.0, "ring was {ring}");
        assert_eq!(rig.pose().look, center);
    }
}
