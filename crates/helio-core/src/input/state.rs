use std::collections::HashMap;

use glam::Vec3;

/// Logical flight keys. Physical key codes are mapped through [`Bindings`] so
/// a page can rebind without touching the controllers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Forward,
    Back,
    StrafeLeft,
    StrafeRight,
    Ascend,
    Descend,
    YawLeft,
    YawRight,
    PitchUp,
    PitchDown,
    Boost,
    Interact,
}

/// Discrete actions triggered on key-down rather than held.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Toggle between manual flight and the idle/orbit mode.
    ToggleControlMode,
    /// Toggle between third-person and cockpit views.
    ToggleCameraView,
    /// Select an alternate ship appearance (0-based index).
    SelectShip(u8),
}

/// Physical-to-logical key map with browser `keyCode` defaults:
/// WASD/arrows to move, Space/Ctrl for up/down, Q/E yaw, R/F pitch,
/// Shift boost, Enter interact, M/C toggles, 1-4 ship variants.
#[derive(Debug, Clone)]
pub struct Bindings {
    keys: HashMap<u32, Key>,
}

impl Default for Bindings {
    fn default() -> Self {
        let mut keys = HashMap::new();
        keys.insert(87, Key::Forward); // W
        keys.insert(38, Key::Forward); // ArrowUp
        keys.insert(83, Key::Back); // S
        keys.insert(40, Key::Back); // ArrowDown
        keys.insert(65, Key::StrafeLeft); // A
        keys.insert(37, Key::StrafeLeft); // ArrowLeft
        keys.insert(68, Key::StrafeRight); // D
        keys.insert(39, Key::StrafeRight); // ArrowRight
        keys.insert(32, Key::Ascend); // Space (doubles as Interact near a body)
        keys.insert(17, Key::Descend); // Ctrl
        keys.insert(81, Key::YawLeft); // Q
        keys.insert(69, Key::YawRight); // E
        keys.insert(82, Key::PitchUp); // R
        keys.insert(70, Key::PitchDown); // F
        keys.insert(16, Key::Boost); // Shift
        keys.insert(13, Key::Interact); // Enter
        Self { keys }
    }
}

impl Bindings {
    /// Resolve a held-key code to its logical key.
    pub fn key(&self, code: u32) -> Option<Key> {
        self.keys.get(&code).copied()
    }

    /// Resolve a key-down code to a discrete action.
    pub fn action(&self, code: u32) -> Option<Action> {
        match code {
            77 => Some(Action::ToggleControlMode), // M
            67 => Some(Action::ToggleCameraView),  // C
            49..=52 => Some(Action::SelectShip((code - 49) as u8)), // 1-4
            _ => None,
        }
    }

    /// Rebind a physical key code.
    pub fn bind(&mut self, code: u32, key: Key) {
        self.keys.insert(code, key);
    }
}

/// Pressed/released state plus pointer-drag look deltas.
///
/// Written only while applying the event queue, read only by the flight tick —
/// single writer, single reader, same thread, per §5 of the design. Absence of
/// a key means not pressed.
#[derive(Debug, Default)]
pub struct InputState {
    pressed: HashMap<Key, bool>,
    /// Active look-drag: last pointer position.
    drag_from: Option<(f32, f32)>,
    /// Accumulated drag since the last take, in pixels.
    look_dx: f32,
    look_dy: f32,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, key: Key) {
        self.pressed.insert(key, true);
    }

    pub fn release(&mut self, key: Key) {
        self.pressed.insert(key, false);
    }

    pub fn is_pressed(&self, key: Key) -> bool {
        self.pressed.get(&key).copied().unwrap_or(false)
    }

    /// Begin a look-drag (primary button only).
    pub fn pointer_down(&mut self, x: f32, y: f32, button: u32) {
        if button == 0 {
            self.drag_from = Some((x, y));
        }
    }

    /// Accumulate drag deltas while a look-drag is active.
    pub fn pointer_move(&mut self, x: f32, y: f32) {
        if let Some((lx, ly)) = self.drag_from {
            self.look_dx += x - lx;
            self.look_dy += y - ly;
            self.drag_from = Some((x, y));
        }
    }

    pub fn pointer_up(&mut self, button: u32) {
        if button == 0 {
            self.drag_from = None;
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_from.is_some()
    }

    /// Drain the accumulated look deltas in pixels (dx, dy).
    pub fn take_look_delta(&mut self) -> (f32, f32) {
        let delta = (self.look_dx, self.look_dy);
        self.look_dx = 0.0;
        self.look_dy = 0.0;
        delta
    }

    /// Fold pressed keys into a ship-local movement vector:
    /// +X strafe right, +Y up, -Z forward. Unnormalized.
    ///
    /// The ascend key doubles as the interact key, so it only thrusts while
    /// no entity is nearby (`suppress_ascend`).
    pub fn axes(&self, suppress_ascend: bool) -> Vec3 {
        let mut v = Vec3::ZERO;
        if self.is_pressed(Key::Forward) {
            v.z -= 1.0;
        }
        if self.is_pressed(Key::Back) {
            v.z += 1.0;
        }
        if self.is_pressed(Key::StrafeLeft) {
            v.x -= 1.0;
        }
        if self.is_pressed(Key::StrafeRight) {
            v.x += 1.0;
        }
        if self.is_pressed(Key::Ascend) && !suppress_ascend {
            v.y += 1.0;
        }
        if self.is_pressed(Key::Descend) {
            v.y -= 1.0;
        }
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_key_is_not_pressed() {
        let state = InputState::new();
        assert!(!state.is_pressed(Key::Forward));
    }

    #[test]
    fn press_release_roundtrip() {
        let mut state = InputState::new();
        state.press(Key::Boost);
        assert!(state.is_pressed(Key::Boost));
        state.release(Key::Boost);
        assert!(!state.is_pressed(Key::Boost));
    }

    #[test]
    fn axes_compose_and_cancel() {
        let mut state = InputState::new();
        state.press(Key::Forward);
        state.press(Key::StrafeRight);
        let v = state.axes(false);
        assert_eq!(v, Vec3::new(1.0, 0.0, -1.0));

        state.press(Key::Back);
        assert_eq!(state.axes(false).z, 0.0);
    }

    #[test]
    fn ascend_suppressed_near_body() {
        let mut state = InputState::new();
        state.press(Key::Ascend);
        assert_eq!(state.axes(false).y, 1.0);
        assert_eq!(state.axes(true).y, 0.0);
    }

    #[test]
    fn drag_accumulates_and_drains() {
        let mut state = InputState::new();
        state.pointer_down(100.0, 100.0, 0);
        state.pointer_move(110.0, 95.0);
        state.pointer_move(115.0, 90.0);
        state.pointer_up(0);
        assert_eq!(state.take_look_delta(), (15.0, -10.0));
        assert_eq!(state.take_look_delta(), (0.0, 0.0));
    }

    #[test]
    fn secondary_button_does_not_drag() {
        let mut state = InputState::new();
        state.pointer_down(0.0, 0.0, 2);
        state.pointer_move(50.0, 50.0);
        assert_eq!(state.take_look_delta(), (0.0, 0.0));
    }

    #[test]
    fn default_bindings_cover_movement() {
        let b = Bindings::default();
        assert_eq!(b.key(87), Some(Key::Forward));
        assert_eq!(b.key(16), Some(Key::Boost));
        assert_eq!(b.action(77), Some(Action::ToggleControlMode));
        assert_eq!(b.action(50), Some(Action::SelectShip(1)));
        assert_eq!(b.action(1000), None);
    }
}
