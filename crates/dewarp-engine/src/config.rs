//! Per-instance player configuration.
//!
//! One explicit `PlayerConfig` is constructed at player creation time; there
//! are no shared mutable defaults between instances. Loaded from
//! `assets/player.json` when present, otherwise every field falls back to
//! its serde default. Unknown fields are ignored, keeping configs
//! forward-compatible.

use std::path::{Path, PathBuf};

use crate::assets::{load_json, AssetsRoot};
use crate::error::EngineError;

#[derive(Debug, Clone, serde::Deserialize)]
pub struct PlayerConfig {
    /// Canvas pixel width.
    #[serde(default = "default_width")]
    pub width: u32,

    /// Canvas pixel height.
    #[serde(default = "default_height")]
    pub height: u32,

    /// Media resource locator. The shipped synthetic pipeline only logs it;
    /// a real decoder would fetch it (expected container "video/mp4").
    #[serde(default)]
    pub source: String,

    /// Virtual camera field of view, degrees, exclusive (0, 180).
    #[serde(default = "default_fov")]
    pub fov_degrees: f32,

    /// Initial media volume, 0.0-1.0.
    #[serde(default = "default_volume")]
    pub volume: f32,

    /// Synthetic source: stream duration in seconds.
    #[serde(default = "default_duration")]
    pub duration_seconds: f64,

    /// Register the demo auto-pan hook at startup.
    #[serde(default)]
    pub autopan: bool,
}

fn default_width() -> u32 {
    900
}
fn default_height() -> u32 {
    504
}
fn default_fov() -> f32 {
    45.0
}
fn default_volume() -> f32 {
    1.0
}
fn default_duration() -> f64 {
    10.0
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            source: String::new(),
            fov_degrees: default_fov(),
            volume: default_volume(),
            duration_seconds: default_duration(),
            autopan: false,
        }
    }
}

impl PlayerConfig {
    /// Load `assets/player.json`, falling back to defaults when no assets
    /// directory or config file exists. A present-but-broken file is an
    /// error; silently ignoring it would hide typos.
    pub fn load(start_dir: &Path) -> Result<(Self, Option<PathBuf>), EngineError> {
        let Ok(assets) = AssetsRoot::discover(start_dir) else {
            return Ok((Self::default(), None));
        };
        let path = assets.join("player.json");
        if !path.exists() {
            return Ok((Self::default(), None));
        }
        let cfg: Self = load_json(&path)?;
        cfg.validate(&path)?;
        Ok((cfg, Some(path)))
    }

    /// Semantic validation on top of the serde shape check.
    pub fn validate(&self, path: &Path) -> Result<(), EngineError> {
        let invalid = |msg: String| EngineError::InvalidConfig {
            path: path.to_path_buf(),
            msg,
        };
        if self.width == 0 || self.height == 0 {
            return Err(invalid(format!(
                "canvas size {}x{} must be non-zero",
                self.width, self.height
            )));
        }
        if !(self.fov_degrees > 0.0 && self.fov_degrees < 180.0) {
            return Err(invalid(format!(
                "fov_degrees {} outside (0, 180)",
                self.fov_degrees
            )));
        }
        if !(0.0..=1.0).contains(&self.volume) {
            return Err(invalid(format!("volume {} outside [0, 1]", self.volume)));
        }
        if self.duration_seconds < 0.0 {
            return Err(invalid(format!(
                "duration_seconds {} is negative",
                self.duration_seconds
            )));
        }
        Ok(())
    }
}
