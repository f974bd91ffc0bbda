// Extensions — decoupled optional systems

pub mod easing;
pub mod hierarchy;

pub use easing::{ease, lerp, Easing};
pub use hierarchy::{LocalTransform, TransformGraph};
