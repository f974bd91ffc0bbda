pub mod api;
pub mod bodies;
pub mod content;
pub mod core;
pub mod extensions;
pub mod input;
pub mod render;
pub mod session;
pub mod systems;

// Re-export key types at crate root for convenience
pub use api::config::{
    AutopilotTuning, BoostTuning, CameraTuning, FlightTuning, IntroTuning, ProximityTuning,
    SessionConfig, TourTuning,
};
pub use api::types::{EntityId, UiEvent};
pub use content::{ContentEntry, ContentStore, ResolvedContent};
pub use core::scene::{BodyVisual, Entity, Scene};
pub use core::time::FixedTimestep;
pub use extensions::{Easing, LocalTransform, TransformGraph};
pub use input::queue::{InputEvent, InputQueue};
pub use input::state::{Bindings, InputState, Key};
pub use render::frame::{build_frame, BodyInstance, CameraInstance, FrameBuffer, ShipInstance};
pub use session::Session;
pub use systems::camera::{CameraMode, CameraPose, CameraRig};
pub use systems::flight::{FlightController, FlightMode};
pub use systems::intro::IntroSequencer;
pub use systems::proximity::{ProximityDetector, ProximityReport};
pub use systems::tour::{TourSequencer, TourStep};
