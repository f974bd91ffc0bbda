use crate::api::config::TourTuning;

/// What the session must do after a tour tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TourStep {
    /// Command autopilot to the route entry at this index.
    FlyTo(usize),
    /// The leg guard expired before arrival: treat the current stop as
    /// reached (present its overlay, idle the flight).
    ForcedArrival(usize),
    /// Route exhausted; the tour returned to inactive.
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Autopilot en route to the current stop.
    Flying,
    /// Overlay up at the current stop, dwell timer running.
    Dwelling,
}

#[derive(Debug)]
struct ActiveTour {
    index: usize,
    phase: Phase,
    timer: f32,
}

/// Drives the flight controller through an ordered route of entities,
/// pausing at each stop before advancing. Inactive -> Active(index) ->
/// Inactive; cancellation drops straight back to inactive.
pub struct TourSequencer {
    tuning: TourTuning,
    active: Option<ActiveTour>,
}

impl TourSequencer {
    pub fn new(tuning: TourTuning) -> Self {
        Self {
            tuning,
            active: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Current stop index while active.
    pub fn index(&self) -> Option<usize> {
        self.active.as_ref().map(|t| t.index)
    }

    /// Begin a tour over a route of `route_len` stops. Returns the first
    /// stop to fly to, or None when the route is empty.
    pub fn start(&mut self, route_len: usize) -> Option<usize> {
        if route_len == 0 {
            return None;
        }
        self.active = Some(ActiveTour {
            index: 0,
            phase: Phase::Flying,
            timer: 0.0,
        });
        Some(0)
    }

    /// Note an autopilot arrival. Returns true when the tour consumed it
    /// (overlay should be presented and the dwell starts).
    pub fn on_arrival(&mut self) -> bool {
        match self.active.as_mut() {
            Some(tour) if tour.phase == Phase::Flying => {
                tour.phase = Phase::Dwelling;
                tour.timer = 0.0;
                true
            }
            _ => false,
        }
    }

    /// Explicit "next" action — skips whatever remains of the dwell.
    pub fn next(&mut self, route_len: usize) -> Option<TourStep> {
        self.active.as_ref()?;
        Some(self.advance(route_len))
    }

    /// Cancel immediately without completing remaining stops.
    pub fn cancel(&mut self) {
        self.active = None;
    }

    /// Advance timers. Returns a step when the dwell expires or the leg
    /// guard trips.
    pub fn tick(&mut self, dt: f32, route_len: usize) -> Option<TourStep> {
        let tour = self.active.as_mut()?;
        tour.timer += dt;
        match tour.phase {
            Phase::Flying if tour.timer >= self.tuning.leg_timeout => {
                let index = tour.index;
                tour.phase = Phase::Dwelling;
                tour.timer = 0.0;
                Some(TourStep::ForcedArrival(index))
            }
            Phase::Dwelling if tour.timer >= self.tuning.dwell => Some(self.advance(route_len)),
            _ => None,
        }
    }

    fn advance(&mut self, route_len: usize) -> TourStep {
        let Some(tour) = self.active.as_mut() else {
            return TourStep::Finished;
        };
        tour.index += 1;
        if tour.index >= route_len {
            self.active = None;
            TourStep::Finished
        } else {
            tour.phase = Phase::Flying;
            tour.timer = 0.0;
            TourStep::FlyTo(tour.index)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn tuning() -> TourTuning {
        TourTuning {
            dwell: 1.0,
            leg_timeout: 10.0,
        }
    }

    fn run_dwell(tour: &mut TourSequencer, route_len: usize) -> Option<TourStep> {
        for _ in 0..70 {
            if let Some(step) = tour.tick(DT, route_len) {
                return Some(step);
            }
        }
        None
    }

    #[test]
    fn empty_route_does_not_start() {
        let mut tour = TourSequencer::new(tuning());
        assert_eq!(tour.start(0), None);
        assert!(!tour.is_active());
    }

    #[test]
    fn n_arrivals_complete_the_tour() {
        let route_len = 3;
        let mut tour = TourSequencer::new(tuning());
        assert_eq!(tour.start(route_len), Some(0));

        for expected_next in 1..=route_len {
            assert!(tour.on_arrival());
            let step = run_dwell(&mut tour, route_len).unwrap();
            if expected_next < route_len {
                assert_eq!(step, TourStep::FlyTo(expected_next));
            } else {
                assert_eq!(step, TourStep::Finished);
            }
        }
        assert!(!tour.is_active());
        assert_eq!(tour.index(), None);
    }

    #[test]
    fn explicit_next_skips_the_dwell() {
        let mut tour = TourSequencer::new(tuning());
        tour.start(2);
        tour.on_arrival();
        assert_eq!(tour.next(2), Some(TourStep::FlyTo(1)));
    }

    #[test]
    fn cancel_mid_flight_ignores_later_arrival() {
        let mut tour = TourSequencer::new(tuning());
        tour.start(3);
        tour.cancel();
        assert!(!tour.is_active());
        assert!(!tour.on_arrival());
        assert_eq!(tour.tick(DT, 3), None);
    }

    #[test]
    fn leg_guard_forces_a_stalled_leg() {
        let mut tour = TourSequencer::new(tuning());
        tour.start(2);

        // Never arrives: the guard must fire once the timeout elapses.
        let mut forced = None;
        for _ in 0..700 {
            if let Some(step) = tour.tick(DT, 2) {
                forced = Some(step);
                break;
            }
        }
        assert_eq!(forced, Some(TourStep::ForcedArrival(0)));

        // After the forced arrival the dwell runs as usual.
        assert_eq!(run_dwell(&mut tour, 2), Some(TourStep::FlyTo(1)));
    }

    #[test]
    fn arrival_outside_flying_phase_is_ignored() {
        let mut tour = TourSequencer::new(tuning());
        tour.start(2);
        assert!(tour.on_arrival());
        // A duplicate arrival during the dwell must not restart the timer's
        // phase machine.
        assert!(!tour.on_arrival());
    }
}
