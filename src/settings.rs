//! Scene settings
//!
//! Persisted in LocalStorage on web. Field names match the control panel's.

use serde::{Deserialize, Serialize};

use crate::panel::{CELLS_RANGE, SENSIBILITY_RANGE, SIZE_RANGE};
use crate::sim::SizeRange;

/// What a settings change requires of a running scene
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsChange {
    /// Nothing the scene reads changed
    Unchanged,
    /// Colors or sensibility changed; update live values without rebuilding
    InPlace,
    /// Circle count or radius range changed; regenerate all circles
    Rebuild,
}

/// Visual parameters read by the scene every tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub background: String,
    pub gradient_start: String,
    pub gradient_end: String,
    /// Number of circles
    pub cells: u32,
    pub min_size: f32,
    pub max_size: f32,
    /// Multiplier on pointer repulsion strength
    pub sensibility: f32,
    /// Written by randomize, read by nothing (the count lives in `cells`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cell: Option<u32>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            background: "#0a0117".to_string(),
            gradient_start: "#60000e".to_string(),
            gradient_end: "#6616d4".to_string(),
            cells: 30,
            min_size: 80.0,
            max_size: 160.0,
            sensibility: 0.2,
            cell: None,
        }
    }
}

impl Settings {
    pub fn size_range(&self) -> SizeRange {
        SizeRange::new(self.min_size, self.max_size)
    }

    /// Classify the move from `self` to `next`
    pub fn classify(&self, next: &Settings) -> SettingsChange {
        if self.cells != next.cells
            || self.min_size != next.min_size
            || self.max_size != next.max_size
        {
            SettingsChange::Rebuild
        } else if self.background != next.background
            || self.gradient_start != next.gradient_start
            || self.gradient_end != next.gradient_end
            || self.sensibility != next.sensibility
        {
            SettingsChange::InPlace
        } else {
            SettingsChange::Unchanged
        }
    }

    /// Bound numeric fields to the panel's ranges.
    ///
    /// Counts below the panel minimum are kept (a single cell is a valid
    /// scene); only the upper bound applies. Non-finite values fall back to
    /// the defaults. Values are not snapped to panel steps.
    pub fn clamped(self) -> Self {
        let defaults = Self::default();
        let bound = |value: f32, fallback: f32, min: f32, max: f32| {
            if value.is_finite() {
                value.clamp(min, max)
            } else {
                fallback
            }
        };
        Self {
            cells: self.cells.min(CELLS_RANGE.max as u32),
            min_size: bound(self.min_size, defaults.min_size, SIZE_RANGE.min, SIZE_RANGE.max),
            max_size: bound(self.max_size, defaults.max_size, SIZE_RANGE.min, SIZE_RANGE.max),
            sensibility: bound(
                self.sensibility,
                defaults.sensibility,
                SENSIBILITY_RANGE.min,
                SENSIBILITY_RANGE.max,
            ),
            ..self
        }
    }

    /// Parse and clamp settings coming from JSON (LocalStorage, the JS
    /// panel, or the native settings file)
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Self>(json).map(Self::clamped)
    }

    pub fn to_json(&self) -> String {
        // Plain strings and numbers only, serialization cannot fail
        serde_json::to_string(self).unwrap_or_default()
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "mitosys_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if storage.set_item(Self::STORAGE_KEY, &self.to_json()).is_err() {
                log::warn!("Failed to save settings");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
