//! Control panel model
//!
//! The panel widget is provided by the host page. This module defines the
//! fields it edits, their ranges, and the randomize action.

use rand::Rng;

use crate::color;
use crate::settings::Settings;

/// Editable range of a numeric panel field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldRange {
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

impl FieldRange {
    /// Clamp into range and snap to the nearest step from `min`
    pub fn snap(&self, value: f32) -> f32 {
        let clamped = value.clamp(self.min, self.max);
        let steps = ((clamped - self.min) / self.step).round();
        (self.min + steps * self.step).min(self.max)
    }
}

pub const CELLS_RANGE: FieldRange = FieldRange { min: 5.0, max: 100.0, step: 5.0 };
pub const SIZE_RANGE: FieldRange = FieldRange { min: 5.0, max: 200.0, step: 1.0 };
pub const SENSIBILITY_RANGE: FieldRange = FieldRange { min: 0.0, max: 2.0, step: 0.1 };

/// Inclusive integer ranges drawn by randomize
pub const RANDOM_CELL_RANGE: (u32, u32) = (5, 100);
pub const RANDOM_SIZE_RANGE: (u32, u32) = (5, 200);

/// A single edit coming from the panel
#[derive(Debug, Clone, PartialEq)]
pub enum PanelField {
    Background(String),
    GradientStart(String),
    GradientEnd(String),
    Cells(u32),
    MinSize(f32),
    MaxSize(f32),
    Sensibility(f32),
}

impl PanelField {
    /// Parse a `(name, value)` pair using the panel's field names
    pub fn parse(name: &str, value: &str) -> Option<Self> {
        let value = value.trim();
        match name {
            "background" => Some(PanelField::Background(value.to_string())),
            "gradientStart" => Some(PanelField::GradientStart(value.to_string())),
            "gradientEnd" => Some(PanelField::GradientEnd(value.to_string())),
            "cells" => value.parse::<f32>().ok().map(|v| PanelField::Cells(v.max(0.0) as u32)),
            "minSize" => value.parse().ok().map(PanelField::MinSize),
            "maxSize" => value.parse().ok().map(PanelField::MaxSize),
            "sensibility" => value.parse().ok().map(PanelField::Sensibility),
            _ => None,
        }
    }

    /// Apply the edit to a copy of `settings`, clamped to the panel's ranges.
    ///
    /// Returns None for invalid colors or non-finite numbers.
    pub fn apply(&self, settings: &Settings) -> Option<Settings> {
        let mut next = settings.clone();
        match self {
            PanelField::Background(c) | PanelField::GradientStart(c) | PanelField::GradientEnd(c) => {
                if !color::is_hex(c) {
                    log::warn!("Ignoring invalid color {:?}", c);
                    return None;
                }
                let slot = match self {
                    PanelField::Background(_) => &mut next.background,
                    PanelField::GradientStart(_) => &mut next.gradient_start,
                    _ => &mut next.gradient_end,
                };
                *slot = c.clone();
            }
            PanelField::Cells(n) => next.cells = CELLS_RANGE.snap(*n as f32) as u32,
            PanelField::MinSize(v) => next.min_size = finite(*v).map(|v| SIZE_RANGE.snap(v))?,
            PanelField::MaxSize(v) => next.max_size = finite(*v).map(|v| SIZE_RANGE.snap(v))?,
            PanelField::Sensibility(v) => {
                next.sensibility = finite(*v).map(|v| SENSIBILITY_RANGE.snap(v))?
            }
        }
        Some(next)
    }
}

fn finite(v: f32) -> Option<f32> {
    v.is_finite().then_some(v)
}

/// Randomize gradient colors, `cell`, and the radius range.
///
/// The count goes to `cell`, which nothing reads, so `cells` (and
/// `sensibility`, `background`) are left as they were. Sizes are drawn
/// independently and may come out with `min_size > max_size`.
pub fn randomize<R: Rng + ?Sized>(settings: &mut Settings, rng: &mut R) {
    settings.gradient_start = color::random_hex(rng);
    settings.gradient_end = color::random_hex(rng);
    settings.cell = Some(rng.random_range(RANDOM_CELL_RANGE.0..=RANDOM_CELL_RANGE.1));
    settings.min_size = rng.random_range(RANDOM_SIZE_RANGE.0..=RANDOM_SIZE_RANGE.1) as f32;
    settings.max_size = rng.random_range(RANDOM_SIZE_RANGE.0..=RANDOM_SIZE_RANGE.1) as f32;
}
