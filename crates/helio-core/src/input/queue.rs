/// Input event types the core understands.
/// Raw and page-agnostic — screen coordinates and browser key codes; the
/// logical meaning is resolved by [`crate::input::state::Bindings`].
#[derive(Debug, Clone, Copy)]
pub enum InputEvent {
    /// A pointer button was pressed at screen coordinates (x, y).
    PointerDown { x: f32, y: f32, button: u32 },
    /// A pointer button was released at screen coordinates (x, y).
    PointerUp { x: f32, y: f32, button: u32 },
    /// The pointer moved to screen coordinates (x, y).
    PointerMove { x: f32, y: f32 },
    /// A key was pressed (browser `keyCode`).
    KeyDown { key_code: u32 },
    /// A key was released.
    KeyUp { key_code: u32 },
    /// A command from the UI layer (buttons, editor, renderer raycast).
    /// `kind` identifies the command; `a`, `b`, `c` carry payload.
    Custom { kind: u32, a: f32, b: f32, c: f32 },
}

/// A queue of input events.
/// JS writes events into the queue; the session reads them each frame and the
/// runner drains the queue after the tick.
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
        }
    }

    /// Push a new input event (called from JS via wasm-bindgen).
    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Drain all pending events, clearing the queue.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    /// Iterate over pending events without consuming them.
    pub fn iter(&self) -> impl Iterator<Item = &InputEvent> {
        self.events.iter()
    }

    /// Check if there are pending events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of pending events.
    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_drain() {
        let mut q = InputQueue::new();
        q.push(InputEvent::PointerDown { x: 10.0, y: 20.0, button: 0 });
        q.push(InputEvent::KeyDown { key_code: 87 });
        assert_eq!(q.len(), 2);
        let events = q.drain();
        assert_eq!(events.len(), 2);
        assert!(q.is_empty());
    }

    #[test]
    fn custom_event_payload() {
        let mut q = InputQueue::new();
        q.push(InputEvent::Custom { kind: 7, a: 1.5, b: 2.5, c: 3.5 });
        match q.drain()[0] {
            InputEvent::Custom { kind, a, b, c } => {
                assert_eq!(kind, 7);
                assert_eq!((a, b, c), (1.5, 2.5, 3.5));
            }
            _ => panic!("Expected Custom event"),
        }
    }
}
