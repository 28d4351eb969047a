//! Headless host for native runs
//!
//! Stands in for the browser: a plain frame loop drives the scene and a
//! scripted pointer orbits the surface center.

use std::path::PathBuf;

use glam::Vec2;

use crate::settings::Settings;
use crate::sim::Bounds;

/// Drive `step` once per frame until `should_continue` returns false.
///
/// Returns the number of frames run.
pub fn run<F, C>(mut step: F, mut should_continue: C) -> u64
where
    F: FnMut(u64),
    C: FnMut(u64) -> bool,
{
    let mut frame = 0;
    while should_continue(frame) {
        step(frame);
        frame += 1;
    }
    frame
}

/// Scripted pointer: a slow orbit around the center, wobbling in radius
pub fn orbit_pointer(bounds: Bounds, frame: u64) -> Vec2 {
    let t = frame as f32 / 120.0;
    let reach = bounds.width.min(bounds.height) * (0.25 + 0.1 * (t * 0.7).sin());
    bounds.center() + Vec2::new(t.cos(), t.sin()) * reach
}

/// Parse `WIDTHxHEIGHT`
pub fn parse_size(s: &str) -> Option<Bounds> {
    let (w, h) = s.trim().split_once(['x', 'X'])?;
    let w: f32 = w.trim().parse().ok()?;
    let h: f32 = h.trim().parse().ok()?;
    (w > 0.0 && h > 0.0 && w.is_finite() && h.is_finite()).then(|| Bounds::new(w, h))
}

/// Native run configuration, read from `MITOSYS_*` environment variables
#[derive(Debug, Clone)]
pub struct HeadlessConfig {
    pub settings: Settings,
    pub bounds: Bounds,
    pub frames: u64,
    pub seed: u64,
    /// Directory the export is written to
    pub out_dir: PathBuf,
}

impl Default for HeadlessConfig {
    fn default() -> Self {
        Self {
            settings: Settings::default(),
            bounds: Bounds::default(),
            frames: 600,
            seed: 0x6d69_746f,
            out_dir: PathBuf::from("."),
        }
    }
}

impl HeadlessConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup. Bad values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(path) = lookup("MITOSYS_SETTINGS") {
            match std::fs::read_to_string(&path) {
                Ok(json) => match Settings::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from {}", path);
                        config.settings = settings;
                    }
                    Err(e) => log::warn!("Ignoring settings file {}: {}", path, e),
                },
                Err(e) => log::warn!("Cannot read settings file {}: {}", path, e),
            }
        }

        if let Some(v) = lookup("MITOSYS_FRAMES") {
            match v.trim().parse() {
                Ok(frames) => config.frames = frames,
                Err(_) => log::warn!("Ignoring MITOSYS_FRAMES={:?}", v),
            }
        }

        if let Some(v) = lookup("MITOSYS_SEED") {
            match v.trim().parse() {
                Ok(seed) => config.seed = seed,
                Err(_) => log::warn!("Ignoring MITOSYS_SEED={:?}", v),
            }
        }

        if let Some(v) = lookup("MITOSYS_SIZE") {
            match parse_size(&v) {
                Some(bounds) => config.bounds = bounds,
                None => log::warn!("Ignoring MITOSYS_SIZE={:?}", v),
            }
        }

        if let Some(dir) = lookup("MITOSYS_OUT_DIR") {
            config.out_dir = PathBuf::from(dir);
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_run_counts_frames() {
        let mut seen = Vec::new();
        let frames = run(|f| seen.push(f), |f| f < 5);
        assert_eq!(frames, 5);
        assert_eq!(seen, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_run_can_stop_immediately() {
        let mut called = false;
        assert_eq!(run(|_| called = true, |_| false), 0);
        assert!(!called);
    }

    #[test]
    fn test_orbit_stays_on_surface() {
        let bounds = Bounds::new(1280.0, 720.0);
        for frame in (0..5000).step_by(37) {
            let p = orbit_pointer(bounds, frame);
            assert!(p.x >= 0.0 && p.x <= bounds.width);
            assert!(p.y >= 0.0 && p.y <= bounds.height);
        }
    }

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("800x600"), Some(Bounds::new(800.0, 600.0)));
        assert_eq!(parse_size(" 1024 X 768 "), Some(Bounds::new(1024.0, 768.0)));
        assert_eq!(parse_size("800"), None);
        assert_eq!(parse_size("0x600"), None);
        assert_eq!(parse_size("axb"), None);
    }

    #[test]
    fn test_config_from_lookup() {
        let vars: HashMap<&str, &str> = [
            ("MITOSYS_FRAMES", "42"),
            ("MITOSYS_SEED", "7"),
            ("MITOSYS_SIZE", "320x240"),
            ("MITOSYS_OUT_DIR", "/tmp/out"),
        ]
        .into_iter()
        .collect();
        let config = HeadlessConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(config.frames, 42);
        assert_eq!(config.seed, 7);
        assert_eq!(config.bounds, Bounds::new(320.0, 240.0));
        assert_eq!(config.out_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.settings, Settings::default());
    }

    #[test]
    fn test_config_bad_values_fall_back() {
        let vars: HashMap<&str, &str> = [
            ("MITOSYS_FRAMES", "lots"),
            ("MITOSYS_SIZE", "big"),
            ("MITOSYS_SETTINGS", "/nonexistent/mitosys.json"),
        ]
        .into_iter()
        .collect();
        let config = HeadlessConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        let defaults = HeadlessConfig::default();
        assert_eq!(config.frames, defaults.frames);
        assert_eq!(config.bounds, defaults.bounds);
        assert_eq!(config.settings, defaults.settings);
    }
}
