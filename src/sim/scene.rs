//! Scene orchestration
//!
//! The scene owns the surface, the settings and the current generation of
//! circles. Count or size changes and resizes regenerate every circle. Color
//! and sensibility changes are applied to the live surface.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::bounds::Bounds;
use super::circle::{Circle, FrameContext};
use crate::consts::*;
use crate::panel;
use crate::settings::{Settings, SettingsChange};
use crate::surface::{
    BlendMode, Gradient, GradientStop, Paint, Placement, Primitive, PrimitiveId, Surface,
};

/// Lifecycle of a scene. `Running` is re-entered on every rebuild.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneState {
    Uninitialized,
    Running,
}

pub struct Scene<S: Surface> {
    surface: S,
    settings: Settings,
    bounds: Bounds,
    circles: Vec<Circle>,
    state: SceneState,
    rng: Pcg32,
    background: Option<PrimitiveId>,
    /// Number of completed (re)initializations
    generation: u64,
}

impl<S: Surface> Scene<S> {
    /// Create an uninitialized scene. Call [`Scene::initialize`] before ticking.
    pub fn new(surface: S, settings: Settings, seed: u64) -> Self {
        Self {
            surface,
            settings: settings.clamped(),
            bounds: Bounds::default(),
            circles: Vec::new(),
            state: SceneState::Uninitialized,
            rng: Pcg32::seed_from_u64(seed),
            background: None,
            generation: 0,
        }
    }

    pub fn state(&self) -> SceneState {
        self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn circles(&self) -> &[Circle] {
        &self.circles
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Clear the surface and build a fresh generation of circles
    pub fn initialize(&mut self, bounds: Bounds) {
        self.bounds = bounds;
        for circle in self.circles.drain(..) {
            if let Some(id) = circle.primitive() {
                self.surface.remove(id);
            }
        }
        self.surface.reset(bounds);

        self.define_gradients();

        let sizes = self.settings.size_range();
        self.circles = (0..self.settings.cells as usize)
            .map(|i| Circle::create(i, bounds, sizes, &mut self.rng, &mut self.surface))
            .collect();

        self.background = Some(self.surface.add(
            &Primitive::FullRect {
                class: Some(BACKGROUND_CLASS),
                fill: Paint::Solid(self.settings.background.clone()),
                blend: BlendMode::Normal,
            },
            Placement::Back,
        ));
        self.surface.add(
            &Primitive::FullRect {
                class: None,
                fill: Paint::Gradient(LINEAR_GRADIENT_ID),
                blend: BlendMode::HardLight,
            },
            Placement::Front,
        );
        self.surface.add(&label(bounds), Placement::Front);

        self.state = SceneState::Running;
        self.generation += 1;
        log::info!(
            "Scene initialized: {}x{}, {} cells, radius {}..{} (generation {})",
            bounds.width,
            bounds.height,
            self.circles.len(),
            self.settings.min_size,
            self.settings.max_size,
            self.generation
        );
    }

    fn define_gradients(&mut self) {
        self.surface.define_gradient(&Gradient::Radial {
            id: RADIAL_GRADIENT_ID,
            spread: "reflect",
            cx: 50.0,
            cy: 50.0,
            r: 50.0,
            fx: 55.0,
            fy: 65.0,
            fr: 100.0,
            stops: vec![GradientStop::new(0.0, "#fff"), GradientStop::new(100.0, "#000")],
        });
        self.surface.define_gradient(&Gradient::Linear {
            id: LINEAR_GRADIENT_ID,
            x1: 0.0,
            y1: 100.0,
            x2: 100.0,
            y2: 0.0,
            stops: vec![
                GradientStop::new(0.0, self.settings.gradient_start.clone())
                    .with_class(GRADIENT_START_CLASS),
                GradientStop::new(100.0, self.settings.gradient_end.clone())
                    .with_class(GRADIENT_END_CLASS),
            ],
        });
    }

    /// Advance every circle one frame
    pub fn tick(&mut self, pointer: Vec2) {
        let ctx = FrameContext {
            pointer,
            sensibility: self.settings.sensibility,
            bounds: self.bounds,
        };
        for circle in &mut self.circles {
            circle.advance(&ctx, &mut self.surface);
        }
    }

    /// Apply new settings, rebuilding only when the circle set is invalidated
    pub fn reconfigure(&mut self, next: Settings) -> SettingsChange {
        let next = next.clamped();
        let change = self.settings.classify(&next);
        let previous = std::mem::replace(&mut self.settings, next);

        if self.state == SceneState::Uninitialized {
            return change;
        }

        match change {
            SettingsChange::Rebuild => self.initialize(self.bounds),
            SettingsChange::InPlace => self.apply_live(&previous),
            SettingsChange::Unchanged => {}
        }
        change
    }

    /// Push color changes to the live surface. Sensibility is read next tick.
    fn apply_live(&mut self, previous: &Settings) {
        if previous.gradient_start != self.settings.gradient_start {
            self.surface
                .set_stop_color(GRADIENT_START_CLASS, &self.settings.gradient_start);
        }
        if previous.gradient_end != self.settings.gradient_end {
            self.surface
                .set_stop_color(GRADIENT_END_CLASS, &self.settings.gradient_end);
        }
        if previous.background != self.settings.background {
            if let Some(id) = self.background {
                self.surface
                    .set_fill(id, &Paint::Solid(self.settings.background.clone()));
            }
        }
    }

    /// Surface size changed; always a full rebuild
    pub fn resize(&mut self, bounds: Bounds) {
        log::info!("Resize to {}x{}", bounds.width, bounds.height);
        self.initialize(bounds);
    }

    /// Randomize palette and size parameters, then rebuild.
    ///
    /// The count is written to the unused `cell` field, so the number of
    /// circles survives randomization.
    pub fn random(&mut self) {
        panel::randomize(&mut self.settings, &mut self.rng);
        log::info!(
            "Randomized: {} -> {}, radius {}..{}",
            self.settings.gradient_start,
            self.settings.gradient_end,
            self.settings.min_size,
            self.settings.max_size
        );
        if self.state == SceneState::Running {
            self.initialize(self.bounds);
        }
    }
}

fn label(bounds: Bounds) -> Primitive {
    Primitive::Label {
        text: LABEL_TEXT.to_string(),
        font_size: (bounds.width / LABEL_FONT_DIVISOR).min(LABEL_FONT_MAX),
        text_length: bounds.width / LABEL_WIDTH_DIVISOR,
        fill: Paint::Solid("#fff".to_string()),
        blend: BlendMode::SoftLight,
    }
}
