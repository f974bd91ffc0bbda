use helio_core::{
    build_frame, FixedTimestep, FrameBuffer, InputEvent, InputQueue, Session, SessionConfig,
    UiEvent,
};

/// Drives a [`Session`] from the browser's animation callback.
///
/// The page creates one of these behind a `thread_local!` (wasm-bindgen
/// cannot export stateful generics), pushes input events as they happen, and
/// calls [`tick`](Self::tick) once per displayed frame. Fixed-timestep
/// accumulation keeps simulation speed independent of the display rate.
pub struct SessionRunner {
    session: Session,
    input: InputQueue,
    frame: FrameBuffer,
    timestep: FixedTimestep,
}

impl SessionRunner {
    pub fn new(config: SessionConfig) -> Self {
        let timestep = FixedTimestep::new(config.fixed_dt);
        Self {
            session: Session::new(config),
            input: InputQueue::new(),
            frame: FrameBuffer::new(),
            timestep,
        }
    }

    /// Push an input event into the queue.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Run one frame: step the session zero or more fixed ticks, drain
    /// input, rebuild the render-facing frame buffer.
    pub fn tick(&mut self, dt: f32) {
        self.session.clear_frame_data();

        let steps = self.timestep.accumulate(dt);
        for _ in 0..steps {
            self.session.tick(self.timestep.dt(), &self.input);
        }

        // Input is consumed by the ticks above; late events wait a frame.
        self.input.drain();

        build_frame(
            &self.session.scene,
            Some(self.session.ship()),
            self.session.ship_variant(),
            self.session.camera_pose(),
            self.session.camera_mode_code(),
            &mut self.frame,
        );
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    // ---- Pointer accessors for SharedArrayBuffer reads ----

    pub fn bodies_ptr(&self) -> *const f32 {
        self.frame.bodies_ptr()
    }

    pub fn body_count(&self) -> u32 {
        self.frame.body_count()
    }

    pub fn ship_ptr(&self) -> *const f32 {
        self.frame.ship_ptr()
    }

    pub fn camera_ptr(&self) -> *const f32 {
        self.frame.camera_ptr()
    }

    pub fn events_ptr(&self) -> *const f32 {
        self.session.events().as_ptr() as *const f32
    }

    pub fn events_len(&self) -> u32 {
        self.session.events().len() as u32
    }

    pub fn events(&self) -> &[UiEvent] {
        self.session.events()
    }

    // ---- Content document API (editor + startup fetch) ----

    /// Current document as pretty JSON (editor textarea, download).
    pub fn content_json(&self) -> String {
        self.session
            .content
            .export_json()
            .unwrap_or_else(|_| "{}".to_string())
    }

    /// Merge an externally fetched document over the defaults.
    /// Returns false (store unchanged) when the document does not parse.
    pub fn merge_content_json(&mut self, json: &str) -> bool {
        self.session.merge_content(json).is_ok()
    }

    /// Editor "apply". Returns the parse error for inline display, or None
    /// on success.
    pub fn apply_content_json(&mut self, json: &str) -> Option<String> {
        self.session.apply_content(json).err().map(|e| e.to_string())
    }
}
