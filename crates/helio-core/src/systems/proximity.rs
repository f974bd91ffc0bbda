use crate::api::config::ProximityTuning;
use crate::api::types::EntityId;
use crate::core::scene::Scene;

/// The single entity within interaction range, with a 0..1 closeness value
/// for the UI meter (1 = touching, 0 = at the threshold).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProximityReport {
    pub entity: EntityId,
    pub strength: f32,
}

/// Finds the nearest body to the ship and reports whether it is within the
/// interaction threshold. Runs on a fraction of ticks — the scan is linear in
/// the body count and nothing downstream needs per-frame precision.
pub struct ProximityDetector {
    tuning: ProximityTuning,
    ticks: u32,
    nearby: Option<ProximityReport>,
}

impl ProximityDetector {
    pub fn new(tuning: ProximityTuning) -> Self {
        Self {
            tuning,
            ticks: 0,
            nearby: None,
        }
    }

    /// The current nearby entity, if any. Only one entity can be nearby at a
    /// time — nearest wins.
    pub fn nearby(&self) -> Option<ProximityReport> {
        self.nearby
    }

    /// Advance one tick. Returns true when a scan actually ran.
    pub fn tick(&mut self, scene: &Scene, ship: EntityId) -> bool {
        self.ticks = self.ticks.wrapping_add(1);
        if self.ticks % self.tuning.interval_ticks.max(1) != 0 {
            return false;
        }

        let Some(ship_pos) = scene.get(ship).map(|e| e.pos) else {
            self.nearby = None;
            return true;
        };

        let mut best: Option<(EntityId, f32)> = None;
        for entity in scene.iter() {
            if entity.id == ship || !entity.active || entity.visual.is_none() {
                continue;
            }
            let dist = entity.pos.distance(ship_pos);
            if best.map_or(true, |(_, d)| dist < d) {
                best = Some((entity.id, dist));
            }
        }

        self.nearby = best.and_then(|(entity, dist)| {
            (dist < self.tuning.threshold).then(|| ProximityReport {
                entity,
                strength: (1.0 - dist / self.tuning.threshold).clamp(0.0, 1.0),
            })
        });
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scene::{BodyVisual, Entity};
    use glam::Vec3;

    fn tuning(interval: u32) -> ProximityTuning {
        ProximityTuning {
            threshold: 25.0,
            interval_ticks: interval,
        }
    }

    fn body(id: u32, name: &str, pos: Vec3) -> Entity {
        Entity::new(EntityId(id))
            .with_name(name)
            .with_pos(pos)
            .with_visual(BodyVisual::new((1.0, 1.0, 1.0)))
    }

    #[test]
    fn body_within_threshold_becomes_nearby() {
        let mut scene = Scene::new();
        let ship = EntityId(1);
        scene.spawn(Entity::new(ship).with_pos(Vec3::new(10.0, 0.0, 0.0)));
        scene.spawn(body(2, "mercury", Vec3::new(10.0, 0.0, 0.0)));

        let mut det = ProximityDetector::new(tuning(1));
        assert!(det.tick(&scene, ship));
        let report = det.nearby().unwrap();
        assert_eq!(report.entity, EntityId(2));
        assert!((report.strength - 1.0).abs() < 1e-5);
    }

    #[test]
    fn moving_out_of_range_clears_nearby() {
        let mut scene = Scene::new();
        let ship = EntityId(1);
        scene.spawn(Entity::new(ship).with_pos(Vec3::new(10.0, 0.0, 0.0)));
        scene.spawn(body(2, "mercury", Vec3::new(12.0, 0.0, 0.0)));

        let mut det = ProximityDetector::new(tuning(1));
        det.tick(&scene, ship);
        assert!(det.nearby().is_some());

        scene.get_mut(ship).unwrap().pos = Vec3::new(50.0, 0.0, 0.0);
        det.tick(&scene, ship);
        assert!(det.nearby().is_none());
    }

    #[test]
    fn nearest_body_wins() {
        let mut scene = Scene::new();
        let ship = EntityId(1);
        scene.spawn(Entity::new(ship).with_pos(Vec3::ZERO));
        scene.spawn(body(2, "far", Vec3::new(20.0, 0.0, 0.0)));
        scene.spawn(body(3, "near", Vec3::new(5.0, 0.0, 0.0)));

        let mut det = ProximityDetector::new(tuning(1));
        det.tick(&scene, ship);
        assert_eq!(det.nearby().unwrap().entity, EntityId(3));
    }

    #[test]
    fn scan_is_throttled() {
        let mut scene = Scene::new();
        let ship = EntityId(1);
        scene.spawn(Entity::new(ship));
        scene.spawn(body(2, "mercury", Vec3::ZERO));

        let mut det = ProximityDetector::new(tuning(3));
        let scans = (0..9).filter(|_| det.tick(&scene, ship)).count();
        assert_eq!(scans, 3);
    }

    #[test]
    fn strength_is_clamped_to_unit_range() {
        let mut scene = Scene::new();
        let ship = EntityId(1);
        scene.spawn(Entity::new(ship).with_pos(Vec3::ZERO));
        scene.spawn(body(2, "close", Vec3::new(24.9, 0.0, 0.0)));

        let mut det = ProximityDetector::new(tuning(1));
        det.tick(&scene, ship);
        let s = det.nearby().unwrap().strength;
        assert!((0.0..=1.0).contains(&s));
        assert!(s < 0.01);
    }
}
