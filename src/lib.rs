//! Mitosys - a generative field of drifting, overlapping cells
//!
//! Core modules:
//! - `sim`: Circle physics and scene orchestration
//! - `surface`: Drawing surface abstraction (in-memory SVG, live DOM on web)
//! - `settings`: Tunable parameters and their persistence
//! - `panel`: Control panel model (fields, randomize)
//! - `pointer`: Pointer coordinate resolution
//! - `export`: Standalone SVG export
//! - `host`: Headless frame loop for native runs

pub mod color;
pub mod export;
pub mod host;
pub mod panel;
pub mod pointer;
pub mod settings;
pub mod sim;
pub mod surface;

pub use settings::{Settings, SettingsChange};
pub use sim::{Bounds, Circle, FrameContext, Scene, SceneState};
pub use surface::{Surface, SvgDocument};

/// Simulation and layout constants
pub mod consts {
    /// Constant speed applied along a circle's direction each tick
    pub const CIRCLE_SPEED: f32 = 0.5;
    /// Per-tick acceleration damping factor
    pub const ACCEL_DAMPING: f32 = 0.96;
    /// Acceleration injected on the wrapped axis when a circle re-enters
    pub const WRAP_IMPULSE: f32 = 7.0;

    /// Label font size is `min(width / LABEL_FONT_DIVISOR, LABEL_FONT_MAX)`
    pub const LABEL_FONT_DIVISOR: f32 = 40.0;
    pub const LABEL_FONT_MAX: f32 = 20.0;
    /// Label text is stretched to `width / LABEL_WIDTH_DIVISOR`
    pub const LABEL_WIDTH_DIVISOR: f32 = 1.3;
    pub const LABEL_TEXT: &str = "MITOSYS";

    /// Ids of the shared gradient definitions
    pub const RADIAL_GRADIENT_ID: &str = "radialGradient";
    pub const LINEAR_GRADIENT_ID: &str = "linearGradient";
    /// Classes of the user-colored linear gradient stops
    pub const GRADIENT_START_CLASS: &str = "gradient-start";
    pub const GRADIENT_END_CLASS: &str = "gradient-end";
    pub const BACKGROUND_CLASS: &str = "rect-bg";

    /// File name offered for the exported document
    pub const EXPORT_FILE_NAME: &str = "mitosys.svg";
}
