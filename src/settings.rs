//! Game settings and preferences
//!
//! Persisted separately from the high-score ledger, as JSON.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Background music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Global sound switch; off means every cue pans to silence
    pub sound_enabled: bool,

    // === HUD ===
    /// Show the FPS counter at startup
    pub show_fps: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 1.0,
            sfx_volume: 0.5,
            music_volume: 0.5,
            sound_enabled: true,
            show_fps: false,
        }
    }
}

impl Settings {
    /// Load settings; missing or unreadable files fall back to defaults
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(settings) => settings,
                Err(err) => {
                    log::warn!("Malformed settings in {path:?}: {err}; using defaults");
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("No settings at {path:?}, using defaults");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(io::Error::other)?;
        fs::write(path, json)
    }
}
