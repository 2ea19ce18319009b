//! Viewer configuration

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Configuration for the viewer
///
/// Loaded from an optional JSON file; every field falls back to the
/// defaults below, which reproduce the classic demo scene: a 10x10 grid of
/// boxes 10 units apart, a 1024x768 window, and a 60 degree vertical FOV.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Window width in pixels
    pub window_width: u32,
    /// Window height in pixels
    pub window_height: u32,
    /// Vertical field of view in degrees
    pub fov_y_degrees: f32,
    /// Objects per grid side
    pub grid_size: u32,
    /// World-space distance between neighboring objects
    pub grid_spacing: f32,
    /// Camera translation per frame per held key (no delta-time scaling,
    /// matching the original fixed-step behavior)
    pub move_speed: f32,
    /// Milliseconds the streaming worker sleeps between passes
    pub stream_interval_ms: u64,
    /// Directory holding (or receiving) the two streaming source images
    pub asset_dir: PathBuf,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            window_width: 1024,
            window_height: 768,
            fov_y_degrees: 60.0,
            grid_size: 10,
            grid_spacing: 10.0,
            move_speed: 0.1,
            stream_interval_ms: 10,
            asset_dir: PathBuf::from("assets"),
        }
    }
}

impl ViewerConfig {
    /// Aspect ratio of the configured window
    pub fn aspect(&self) -> f32 {
        self.window_width as f32 / self.window_height.max(1) as f32
    }

    /// Load from a JSON file, falling back to defaults when the file is
    /// missing or malformed (a broken config should not keep the viewer
    /// from starting)
    pub fn load_or_default(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(config) => {
                    log::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    log::warn!("Ignoring malformed config {}: {e}", path.display());
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_demo_scene() {
        let config = ViewerConfig::default();
        assert_eq!(config.grid_size, 10);
        assert_eq!(config.window_width, 1024);
        assert_eq!(config.window_height, 768);
        assert!((config.aspect() - 4.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_json_round_trip() {
        let config = ViewerConfig {
            grid_size: 4,
            move_speed: 0.25,
            ..Default::default()
        };
        let text = serde_json::to_string(&config).unwrap();
        let back: ViewerConfig = serde_json::from_str(&text).unwrap();
        assert_eq!(back.grid_size, 4);
        assert_eq!(back.move_speed, 0.25);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let back: ViewerConfig = serde_json::from_str(r#"{"grid_size": 3}"#).unwrap();
        assert_eq!(back.grid_size, 3);
        assert_eq!(back.window_width, 1024);
    }

    #[test]
    fn test_load_missing_or_malformed_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let missing = ViewerConfig::load_or_default(&dir.path().join("none.json"));
        assert_eq!(missing.grid_size, 10);

        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, "not json").unwrap();
        let malformed = ViewerConfig::load_or_default(&bad);
        assert_eq!(malformed.grid_size, 10);
    }
}
