//! Simulation module
//!
//! All motion lives here. Every tick runs in a fixed order over a stable
//! circle list, and randomness comes only from the scene's seeded RNG.

pub mod bounds;
pub mod circle;
pub mod scene;

pub use bounds::{Bounds, SizeRange};
pub use circle::{Circle, FrameContext};
pub use scene::{Scene, SceneState};
