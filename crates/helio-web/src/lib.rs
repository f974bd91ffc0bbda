use std::cell::RefCell;

use wasm_bindgen::prelude::*;

use helio_core::{InputEvent, SessionConfig, UiEvent};

pub mod runner;

pub use runner::SessionRunner;

thread_local! {
    static RUNNER: RefCell<Option<SessionRunner>> = RefCell::new(None);
}

fn with_runner<R>(f: impl FnOnce(&mut SessionRunner) -> R) -> R {
    RUNNER.with(|cell| {
        let mut borrow = cell.borrow_mut();
        let runner = borrow
            .as_mut()
            .expect("Session not initialized. Call session_init() first.");
        f(runner)
    })
}

/// Create the session. Call once before anything else.
#[wasm_bindgen]
pub fn session_init() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    RUNNER.with(|cell| {
        *cell.borrow_mut() = Some(SessionRunner::new(SessionConfig::default()));
    });
    log::info!("helio: session initialized");
}

/// Advance the simulation by one displayed frame.
#[wasm_bindgen]
pub fn session_tick(dt: f32) {
    with_runner(|r| r.tick(dt));
}

// ---- Input ----

#[wasm_bindgen]
pub fn input_pointer_down(x: f32, y: f32, button: u32) {
    with_runner(|r| r.push_input(InputEvent::PointerDown { x, y, button }));
}

#[wasm_bindgen]
pub fn input_pointer_move(x: f32, y: f32) {
    with_runner(|r| r.push_input(InputEvent::PointerMove { x, y }));
}

#[wasm_bindgen]
pub fn input_pointer_up(x: f32, y: f32, button: u32) {
    with_runner(|r| r.push_input(InputEvent::PointerUp { x, y, button }));
}

#[wasm_bindgen]
pub fn input_key_down(key_code: u32) {
    with_runner(|r| r.push_input(InputEvent::KeyDown { key_code }));
}

#[wasm_bindgen]
pub fn input_key_up(key_code: u32) {
    with_runner(|r| r.push_input(InputEvent::KeyUp { key_code }));
}

/// UI-layer command (overlay buttons, editor, renderer raycast results).
#[wasm_bindgen]
pub fn input_custom(kind: u32, a: f32, b: f32, c: f32) {
    with_runner(|r| r.push_input(InputEvent::Custom { kind, a, b, c }));
}

// ---- Frame data accessors ----

#[wasm_bindgen]
pub fn bodies_ptr() -> *const f32 {
    with_runner(|r| r.bodies_ptr())
}

#[wasm_bindgen]
pub fn body_count() -> u32 {
    with_runner(|r| r.body_count())
}

#[wasm_bindgen]
pub fn ship_ptr() -> *const f32 {
    with_runner(|r| r.ship_ptr())
}

#[wasm_bindgen]
pub fn camera_ptr() -> *const f32 {
    with_runner(|r| r.camera_ptr())
}

#[wasm_bindgen]
pub fn events_ptr() -> *const f32 {
    with_runner(|r| r.events_ptr())
}

#[wasm_bindgen]
pub fn events_len() -> u32 {
    with_runner(|r| r.events_len())
}

/// Copy of this frame's UI events as flat floats (kind, a, b, c per event),
/// for pages that prefer not to read WASM memory directly.
#[wasm_bindgen]
pub fn events_flat() -> js_sys::Float32Array {
    with_runner(|r| {
        let events = r.events();
        let mut flat = Vec::with_capacity(events.len() * UiEvent::FLOATS);
        for e in events {
            flat.extend_from_slice(&[e.kind, e.a, e.b, e.c]);
        }
        js_sys::Float32Array::from(flat.as_slice())
    })
}

// ---- Content document API ----

/// Current content document as pretty JSON (editor open, download).
#[wasm_bindgen]
pub fn content_json() -> String {
    with_runner(|r| r.content_json())
}

/// Merge an externally fetched document over the generated defaults.
/// Returns false when the document does not parse (store unchanged).
#[wasm_bindgen]
pub fn merge_content_json(json: &str) -> bool {
    with_runner(|r| r.merge_content_json(json))
}

/// Editor "apply". Returns a parse-error message for inline display, or
/// undefined on success.
#[wasm_bindgen]
pub fn apply_content_json(json: &str) -> Option<String> {
    with_runner(|r| r.apply_content_json(json))
}
