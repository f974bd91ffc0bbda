use log::{info, warn};

use crate::api::config::SessionConfig;
use crate::api::types::{
    EntityId, UiEvent, EVENT_ARRIVED, EVENT_CAMERA_MODE, EVENT_CLOSE_OVERLAY, EVENT_FLIGHT_MODE,
    EVENT_INTRO_STEP, EVENT_PROXIMITY, EVENT_SHIP_VARIANT, EVENT_SHOW_OVERLAY, EVENT_TOUR_STATE,
};
use crate::bodies;
use crate::content::ContentStore;
use crate::core::scene::Scene;
use crate::extensions::hierarchy::TransformGraph;
use crate::input::queue::{InputEvent, InputQueue};
use crate::input::state::{Action, Bindings, InputState, Key};
use crate::systems::camera::{CameraMode, CameraPose, CameraRig};
use crate::systems::flight::{FlightController, FlightMode};
use crate::systems::intro::{IntroSequencer, IntroSignal};
use crate::systems::proximity::ProximityDetector;
use crate::systems::tour::{TourSequencer, TourStep};

// ── Command kinds from the UI layer ──────────────────────────────────

/// Fly to an entity. a = entity id ("Travel Here" button).
pub const CUSTOM_FLY_TO: u32 = 1;
pub const CUSTOM_START_TOUR: u32 = 2;
pub const CUSTOM_CANCEL_TOUR: u32 = 3;
/// Explicit "next stop" while touring.
pub const CUSTOM_TOUR_NEXT: u32 = 4;
/// The overlay presenter reports the overlay was dismissed.
pub const CUSTOM_OVERLAY_CLOSED: u32 = 5;
pub const CUSTOM_START_INTRO: u32 = 6;
/// Renderer raycast hit. a = node id, b = 1 to also travel (shift-click).
pub const CUSTOM_PICK: u32 = 7;
/// Touch-tap interact with the nearby body.
pub const CUSTOM_INTERACT: u32 = 8;
/// Select an alternate ship appearance. a = variant index.
pub const CUSTOM_SELECT_SHIP: u32 = 9;

/// Number of selectable ship appearances.
pub const SHIP_VARIANTS: u32 = 4;

/// The whole simulation behind one explicit context object — no module
/// globals, so tests (and pages) can run any number of independent sessions.
///
/// Tick order is fixed: input is applied, flight moves the ship, the camera
/// follows (the intro may override it), proximity scans at its throttled
/// cadence, and the tour reacts to this tick's arrival. Mode switches take
/// effect on the next tick; nothing here blocks.
pub struct Session {
    config: SessionConfig,
    pub scene: Scene,
    pub graph: TransformGraph,
    pub content: ContentStore,
    input: InputState,
    bindings: Bindings,
    flight: FlightController,
    rig: CameraRig,
    proximity: ProximityDetector,
    tour: TourSequencer,
    intro: IntroSequencer,
    /// Body ids in catalog order — the tour route.
    route: Vec<EntityId>,
    ship: EntityId,
    ship_variant: u32,
    last_nearby: Option<EntityId>,
    events: Vec<UiEvent>,
    next_id: u32,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        let mut scene = Scene::new();
        let mut graph = TransformGraph::new();
        let mut next_id = 1;

        let route = bodies::spawn_system(&mut scene, &mut graph, &mut next_id);
        let ship = bodies::spawn_ship(&mut scene, &mut next_id);

        let content = ContentStore::from_defaults(bodies::BODIES.iter().map(|b| b.name));

        let mut flight = FlightController::new(
            config.flight.clone(),
            config.autopilot.clone(),
            config.boost.clone(),
        );
        flight.set_ship(ship);

        let rig = CameraRig::new(config.camera.clone());
        let proximity = ProximityDetector::new(config.proximity.clone());
        let tour = TourSequencer::new(config.tour.clone());
        let intro = IntroSequencer::new(config.intro.clone());

        info!(
            "session: {} bodies spawned, manual control",
            route.len()
        );

        Self {
            config,
            scene,
            graph,
            content,
            input: InputState::new(),
            bindings: Bindings::default(),
            flight,
            rig,
            proximity,
            tour,
            intro,
            route,
            ship,
            ship_variant: 0,
            last_nearby: None,
            events: Vec::new(),
            next_id,
        }
    }

    // ── Accessors for the bridge ─────────────────────────────────────

    pub fn events(&self) -> &[UiEvent] {
        &self.events
    }

    /// Clear per-frame transient data. The runner calls this before ticking.
    pub fn clear_frame_data(&mut self) {
        self.events.clear();
    }

    pub fn ship(&self) -> EntityId {
        self.ship
    }

    pub fn ship_variant(&self) -> u32 {
        self.ship_variant
    }

    pub fn camera_pose(&self) -> &CameraPose {
        self.rig.pose()
    }

    pub fn camera_mode_code(&self) -> f32 {
        self.rig.effective_mode().code()
    }

    pub fn flight_mode(&self) -> FlightMode {
        self.flight.mode()
    }

    pub fn route(&self) -> &[EntityId] {
        &self.route
    }

    /// Allocate an entity id (kept monotonic with the spawned world).
    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    // ── Content document plumbing ────────────────────────────────────

    /// Merge an externally fetched document over the defaults. Failure is
    /// logged and leaves the store unchanged — startup never depends on it.
    pub fn merge_content(&mut self, json: &str) -> Result<usize, serde_json::Error> {
        match self.content.merge_document(json) {
            Ok(count) => {
                info!("content: merged {count} external entries");
                Ok(count)
            }
            Err(err) => {
                warn!("content: external document rejected: {err}");
                Err(err)
            }
        }
    }

    /// Editor "apply": replace the whole document, or keep the store
    /// untouched and hand the parse error back for inline display.
    pub fn apply_content(&mut self, json: &str) -> Result<(), serde_json::Error> {
        self.content.apply_document(json)
    }

    // ── Tick ─────────────────────────────────────────────────────────

    pub fn tick(&mut self, dt: f32, queue: &InputQueue) {
        self.apply_input(queue);

        let suppress_ascend = self.proximity.nearby().is_some();
        if !self.intro.is_active() {
            self.flight
                .tick(dt, &mut self.input, suppress_ascend, &mut self.scene);
        }

        self.tick_camera(dt);
        self.tick_proximity();

        // Arrival resolves after flight and camera so the chase framing held
        // through the final approach; the tour reacts on the same tick.
        if let Some(entity) = self.flight.take_arrival() {
            self.handle_arrival(entity);
        }

        match self.tour.tick(dt, self.route.len()) {
            Some(TourStep::FlyTo(index)) => {
                self.emit(EVENT_CLOSE_OVERLAY, 0.0, 0.0, 0.0);
                self.fly_to_stop(index);
            }
            Some(TourStep::ForcedArrival(index)) => {
                warn!("tour: leg {index} timed out, forcing arrival");
                self.flight.set_idle();
                if let Some(&entity) = self.route.get(index) {
                    self.tour.on_arrival();
                    self.show_overlay(entity);
                }
            }
            Some(TourStep::Finished) => self.finish_tour(),
            None => {}
        }
    }

    fn tick_camera(&mut self, dt: f32) {
        let fov = self.rig.base_fov() + self.config.boost.fov_gain * self.flight.boost_level();
        self.rig.set_fov_target(fov);

        if self.intro.is_active() {
            // Blend the FOV even while scripted; the intro owns position/look.
            match self.intro.tick(dt, &self.route, &self.scene, &mut self.rig) {
                Some(IntroSignal::Advanced(step)) => {
                    self.emit(EVENT_INTRO_STEP, step as f32, 1.0, 0.0);
                }
                Some(IntroSignal::Finished) => {
                    self.emit(EVENT_INTRO_STEP, -1.0, 0.0, 0.0);
                    info!("intro: finished");
                }
                None => {}
            }
            return;
        }

        let mode = self.flight.mode();
        let touring = self.tour.is_active();
        let Some(ship) = self.scene.get(self.ship) else {
            return;
        };
        let chase_target = match mode {
            FlightMode::Autopilot { entity, .. } => self.scene.get(entity),
            _ => None,
        };
        // Split borrow: rig only needs immutable scene entities.
        let ship = ship.clone();
        self.rig.tick(&mode, touring, &ship, chase_target);
    }

    fn tick_proximity(&mut self) {
        if !self.proximity.tick(&self.scene, self.ship) {
            return;
        }
        let now = self.proximity.nearby();
        match (self.last_nearby, now) {
            (_, Some(report)) => {
                // Re-emit every scan while nearby: the UI meter tracks the
                // continuous closeness value.
                self.emit(EVENT_PROXIMITY, report.entity.0 as f32, report.strength, 0.0);
                self.last_nearby = Some(report.entity);
            }
            (Some(_), None) => {
                self.emit(EVENT_PROXIMITY, -1.0, 0.0, 0.0);
                self.last_nearby = None;
            }
            (None, None) => {}
        }
    }

    fn handle_arrival(&mut self, entity: EntityId) {
        self.emit(EVENT_ARRIVED, entity.0 as f32, 0.0, 0.0);
        self.emit_flight_mode();

        if self.tour.on_arrival() {
            self.show_overlay(entity);
        } else {
            // Free-flight arrival: hand the camera back to orbit controls
            // and leave the overlay up until the user dismisses it.
            self.rig.set_mode(CameraMode::Orbit);
            self.emit(EVENT_CAMERA_MODE, CameraMode::Orbit.code(), 0.0, 0.0);
            self.show_overlay(entity);
        }
    }

    // ── Input application ────────────────────────────────────────────

    fn apply_input(&mut self, queue: &InputQueue) {
        for event in queue.iter() {
            match *event {
                InputEvent::PointerDown { x, y, button } => self.input.pointer_down(x, y, button),
                InputEvent::PointerMove { x, y } => self.input.pointer_move(x, y),
                InputEvent::PointerUp { button, .. } => self.input.pointer_up(button),
                InputEvent::KeyDown { key_code } => self.key_down(key_code),
                InputEvent::KeyUp { key_code } => {
                    if let Some(key) = self.bindings.key(key_code) {
                        self.input.release(key);
                    }
                }
                InputEvent::Custom { kind, a, b, .. } => self.command(kind, a, b),
            }
        }
    }

    fn key_down(&mut self, key_code: u32) {
        if let Some(action) = self.bindings.action(key_code) {
            match action {
                Action::ToggleControlMode => self.toggle_control_mode(),
                Action::ToggleCameraView => {
                    self.rig.toggle_view();
                    self.emit(EVENT_CAMERA_MODE, self.rig.mode().code(), 0.0, 0.0);
                }
                Action::SelectShip(index) => self.select_ship(index as u32),
            }
        }
        if let Some(key) = self.bindings.key(key_code) {
            // Ascend doubles as interact: near a body it opens the overlay
            // instead of thrusting.
            if key == Key::Interact || key == Key::Ascend {
                if let Some(report) = self.proximity.nearby() {
                    self.show_overlay(report.entity);
                }
            }
            self.input.press(key);
        }
    }

    fn command(&mut self, kind: u32, a: f32, b: f32) {
        match kind {
            CUSTOM_FLY_TO => self.command_fly_to(EntityId(a as u32)),
            CUSTOM_START_TOUR => self.start_tour(),
            CUSTOM_CANCEL_TOUR => self.cancel_tour(),
            CUSTOM_TOUR_NEXT | CUSTOM_OVERLAY_CLOSED => {
                if self.tour.is_active() {
                    match self.tour.next(self.route.len()) {
                        Some(TourStep::FlyTo(index)) => {
                            self.emit(EVENT_CLOSE_OVERLAY, 0.0, 0.0, 0.0);
                            self.fly_to_stop(index);
                        }
                        Some(TourStep::Finished) => self.finish_tour(),
                        _ => {}
                    }
                }
            }
            CUSTOM_START_INTRO => self.start_intro(),
            CUSTOM_PICK => self.pick(EntityId(a as u32), b != 0.0),
            CUSTOM_INTERACT => {
                if let Some(report) = self.proximity.nearby() {
                    self.show_overlay(report.entity);
                }
            }
            CUSTOM_SELECT_SHIP => self.select_ship(a as u32),
            other => warn!("unknown UI command kind {other}"),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Fly to an entity. Degrades to just presenting the overlay when the
    /// flight cannot be commanded (no ship, unknown entity).
    pub fn command_fly_to(&mut self, entity: EntityId) {
        if self.scene.get(entity).is_none() {
            warn!("fly-to ignored: unknown entity {}", entity.0);
            return;
        }
        if self.flight.command_fly_to(&self.scene, entity) {
            self.rig.set_mode(CameraMode::ThirdPerson);
            self.emit_flight_mode();
        } else {
            self.show_overlay(entity);
        }
    }

    fn fly_to_stop(&mut self, index: usize) {
        if let Some(&entity) = self.route.get(index) {
            self.command_fly_to(entity);
            self.emit_tour_state();
        }
    }

    pub fn start_tour(&mut self) {
        if self.intro.is_active() {
            self.intro.cancel();
        }
        match self.tour.start(self.route.len()) {
            Some(first) => {
                info!("tour: started, {} stops", self.route.len());
                self.rig.set_mode(CameraMode::ThirdPerson);
                self.fly_to_stop(first);
            }
            None => warn!("tour: no bodies to visit"),
        }
    }

    pub fn cancel_tour(&mut self) {
        if !self.tour.is_active() {
            return;
        }
        self.tour.cancel();
        if self.flight.mode().is_autopilot() {
            self.flight.set_idle();
        }
        self.emit(EVENT_CLOSE_OVERLAY, 0.0, 0.0, 0.0);
        self.emit_tour_state();
        self.emit_flight_mode();
        info!("tour: cancelled");
    }

    fn finish_tour(&mut self) {
        self.emit(EVENT_CLOSE_OVERLAY, 0.0, 0.0, 0.0);
        self.emit_tour_state();
        info!("tour: completed");
    }

    pub fn start_intro(&mut self) {
        self.cancel_tour();
        if self.intro.start(self.route.len()) {
            self.flight.set_idle();
            self.emit_flight_mode();
            self.emit(EVENT_INTRO_STEP, 0.0, 1.0, 0.0);
            info!("intro: started");
        }
    }

    /// Resolve a renderer-picked node to the body that owns it and present
    /// its overlay; optionally command a flight there too.
    fn pick(&mut self, node: EntityId, travel: bool) {
        let route = &self.route;
        let Some(owner) = self.graph.resolve_owner(node, |id| route.contains(&id)) else {
            return;
        };
        self.show_overlay(owner);
        if travel {
            self.command_fly_to(owner);
        }
    }

    fn toggle_control_mode(&mut self) {
        // Switching control modes abandons any scripted travel.
        self.cancel_tour();
        self.intro.cancel();
        match self.flight.mode() {
            FlightMode::Manual => {
                self.flight.set_idle();
                self.rig.set_mode(CameraMode::Orbit);
            }
            _ => {
                self.flight.set_manual();
                self.rig.set_mode(CameraMode::ThirdPerson);
            }
        }
        self.emit_flight_mode();
        self.emit(EVENT_CAMERA_MODE, self.rig.mode().code(), 0.0, 0.0);
    }

    fn select_ship(&mut self, variant: u32) {
        if variant >= SHIP_VARIANTS {
            return;
        }
        self.ship_variant = variant;
        self.emit(EVENT_SHIP_VARIANT, variant as f32, 0.0, 0.0);
    }

    fn show_overlay(&mut self, entity: EntityId) {
        let touring = if self.tour.is_active() { 1.0 } else { 0.0 };
        self.emit(EVENT_SHOW_OVERLAY, entity.0 as f32, touring, 0.0);
    }

    // ── Event plumbing ───────────────────────────────────────────────

    fn emit(&mut self, kind: f32, a: f32, b: f32, c: f32) {
        if self.events.len() >= self.config.max_events {
            warn!("event buffer full, dropping kind {kind}");
            return;
        }
        self.events.push(UiEvent { kind, a, b, c });
    }

    fn emit_flight_mode(&mut self) {
        self.emit(EVENT_FLIGHT_MODE, self.flight.mode().code(), 0.0, 0.0);
    }

    fn emit_tour_state(&mut self) {
        let (active, index) = match self.tour.index() {
            Some(index) => (1.0, index as f32),
            None => (0.0, 0.0),
        };
        self.emit(EVENT_TOUR_STATE, active, index, self.route.len() as f32);
    }

    pub fn is_touring(&self) -> bool {
        self.tour.is_active()
    }

    pub fn is_intro_active(&self) -> bool {
        self.intro.is_active()
    }

    pub fn nearby(&self) -> Option<EntityId> {
        self.proximity.nearby().map(|r| r.entity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    const DT: f32 = 1.0 / 60.0;

    fn fast_config() -> SessionConfig {
        let mut cfg = SessionConfig::default();
        cfg.tour.dwell = 0.2;
        cfg.tour.leg_timeout = 60.0;
        cfg
    }

    fn tick_n(session: &mut Session, queue: &mut InputQueue, n: usize) -> Vec<UiEvent> {
        let mut seen = Vec::new();
        for _ in 0..n {
            session.clear_frame_data();
            session.tick(DT, queue);
            queue.drain();
            seen.extend_from_slice(session.events());
        }
        seen
    }

    fn count_kind(events: &[UiEvent], kind: f32) -> usize {
        events.iter().filter(|e| e.kind == kind).count()
    }

    #[test]
    fn fly_to_command_arrives_exactly_once() {
        let mut session = Session::new(SessionConfig::default());
        let earth = *session
            .route()
            .iter()
            .find(|id| session.scene.get(**id).unwrap().name == "Earth")
            .unwrap();

        let mut queue = InputQueue::new();
        queue.push(InputEvent::Custom {
            kind: CUSTOM_FLY_TO,
            a: earth.0 as f32,
            b: 0.0,
            c: 0.0,
        });

        let events = tick_n(&mut session, &mut queue, 600);
        assert_eq!(count_kind(&events, EVENT_ARRIVED), 1);
        assert_eq!(session.flight_mode(), FlightMode::Idle);
        // Free-flight arrival hands the camera back to orbit controls.
        assert_eq!(session.camera_mode_code(), CameraMode::Orbit.code());
        assert!(count_kind(&events, EVENT_SHOW_OVERLAY) >= 1);
    }

    #[test]
    fn fly_to_unknown_entity_is_a_noop() {
        let mut session = Session::new(SessionConfig::default());
        let mut queue = InputQueue::new();
        queue.push(InputEvent::Custom {
            kind: CUSTOM_FLY_TO,
            a: 9999.0,
            b: 0.0,
            c: 0.0,
        });
        let events = tick_n(&mut session, &mut queue, 2);
        assert_eq!(count_kind(&events, EVENT_ARRIVED), 0);
        assert_eq!(session.flight_mode(), FlightMode::Manual);
    }

    #[test]
    fn tour_visits_every_stop_then_goes_inactive() {
        let mut session = Session::new(fast_config());
        let stops = session.route().len();

        let mut queue = InputQueue::new();
        queue.push(InputEvent::Custom {
            kind: CUSTOM_START_TOUR,
            a: 0.0,
            b: 0.0,
            c: 0.0,
        });

        let events = tick_n(&mut session, &mut queue, 8000);
        assert_eq!(count_kind(&events, EVENT_ARRIVED), stops);
        assert!(!session.is_touring());
        // Final tour-state event reports inactive.
        let last_state = events
            .iter()
            .rev()
            .find(|e| e.kind == EVENT_TOUR_STATE)
            .unwrap();
        assert_eq!(last_state.a, 0.0);
    }

    #[test]
    fn mode_toggle_cancels_the_tour() {
        let mut session = Session::new(fast_config());
        let mut queue = InputQueue::new();
        queue.push(InputEvent::Custom {
            kind: CUSTOM_START_TOUR,
            a: 0.0,
            b: 0.0,
            c: 0.0,
        });
        tick_n(&mut session, &mut queue, 5);
        assert!(session.is_touring());

        queue.push(InputEvent::KeyDown { key_code: 77 }); // M
        tick_n(&mut session, &mut queue, 2);
        assert!(!session.is_touring());
        assert!(!session.flight_mode().is_autopilot());
    }

    #[test]
    fn interact_key_presents_overlay_when_nearby() {
        let mut session = Session::new(SessionConfig::default());
        let mercury = *session
            .route()
            .iter()
            .find(|id| session.scene.get(**id).unwrap().name == "Mercury")
            .unwrap();
        let mercury_pos = session.scene.get(mercury).unwrap().pos;
        let ship = session.ship();
        session.scene.get_mut(ship).unwrap().pos = mercury_pos + Vec3::new(2.0, 0.0, 0.0);

        let mut queue = InputQueue::new();
        // Let a proximity scan run first.
        tick_n(&mut session, &mut queue, 5);
        assert_eq!(session.nearby(), Some(mercury));

        queue.push(InputEvent::KeyDown { key_code: 32 }); // Space
        let events = tick_n(&mut session, &mut queue, 1);
        let show = events
            .iter()
            .find(|e| e.kind == EVENT_SHOW_OVERLAY)
            .unwrap();
        assert_eq!(show.a, mercury.0 as f32);
    }

    #[test]
    fn proximity_events_report_enter_and_exit() {
        let mut session = Session::new(SessionConfig::default());
        let mercury = *session
            .route()
            .iter()
            .find(|id| session.scene.get(**id).unwrap().name == "Mercury")
            .unwrap();
        let mercury_pos = session.scene.get(mercury).unwrap().pos;
        let ship = session.ship();

        session.scene.get_mut(ship).unwrap().pos = mercury_pos;
        let mut queue = InputQueue::new();
        let events = tick_n(&mut session, &mut queue, 5);
        let enter = events.iter().find(|e| e.kind == EVENT_PROXIMITY).unwrap();
        assert_eq!(enter.a, mercury.0 as f32);
        assert!(enter.b > 0.9);

        session.scene.get_mut(ship).unwrap().pos = Vec3::new(500.0, 0.0, 0.0);
        let events = tick_n(&mut session, &mut queue, 5);
        let exit = events.iter().find(|e| e.kind == EVENT_PROXIMITY).unwrap();
        assert_eq!(exit.a, -1.0);
    }

    #[test]
    fn number_key_selects_ship_variant() {
        let mut session = Session::new(SessionConfig::default());
        let mut queue = InputQueue::new();
        queue.push(InputEvent::KeyDown { key_code: 51 }); // "3"
        let events = tick_n(&mut session, &mut queue, 1);
        assert_eq!(session.ship_variant(), 2);
        assert_eq!(count_kind(&events, EVENT_SHIP_VARIANT), 1);
    }

    #[test]
    fn pick_resolves_through_the_hierarchy() {
        let mut session = Session::new(SessionConfig::default());
        let earth = *session
            .route()
            .iter()
            .find(|id| session.scene.get(**id).unwrap().name == "Earth")
            .unwrap();
        // A renderer sub-node parented under Earth.
        let node = session.next_id();
        session.graph.set_parent(node, Some(earth));

        let mut queue = InputQueue::new();
        queue.push(InputEvent::Custom {
            kind: CUSTOM_PICK,
            a: node.0 as f32,
            b: 0.0,
            c: 0.0,
        });
        let events = tick_n(&mut session, &mut queue, 1);
        let show = events
            .iter()
            .find(|e| e.kind == EVENT_SHOW_OVERLAY)
            .unwrap();
        assert_eq!(show.a, earth.0 as f32);
    }

    #[test]
    fn intro_runs_to_completion_under_guard() {
        let mut cfg = SessionConfig::default();
        cfg.intro.step_duration = 0.1;
        cfg.intro.max_duration = 10.0;
        let mut session = Session::new(cfg);

        let mut queue = InputQueue::new();
        queue.push(InputEvent::Custom {
            kind: CUSTOM_START_INTRO,
            a: 0.0,
            b: 0.0,
            c: 0.0,
        });
        let events = tick_n(&mut session, &mut queue, 120);
        assert!(!session.is_intro_active());
        // Start step plus advances plus the terminal event.
        assert!(count_kind(&events, EVENT_INTRO_STEP) >= 3);
        let last = events
            .iter()
            .rev()
            .find(|e| e.kind == EVENT_INTRO_STEP)
            .unwrap();
        assert_eq!(last.a, -1.0);
    }

    #[test]
    fn editor_error_leaves_content_intact() {
        let mut session = Session::new(SessionConfig::default());
        let before = session.content.export_json().unwrap();
        assert!(session.apply_content("{ bad").is_err());
        assert_eq!(session.content.export_json().unwrap(), before);
    }
}
