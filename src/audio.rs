//! Sound-cue intent with stereo pan by screen position
//!
//! The simulation only decides *what* to play and *where* on screen it
//! happened; device output is the frontend's problem. The mixer turns a cue's
//! horizontal position into left/right gains (`pan = x / screen width`) and
//! collapses to silence when sound is globally muted.

use serde::{Deserialize, Serialize};

use crate::consts::SCREEN_W;
use crate::settings::Settings;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundCue {
    /// Player fires the star
    PlayerShoot,
    /// An enemy cell drops a present
    EnemyShoot,
    /// Any destructive impact
    Explosion,
    /// Sleigh crossing the top of the screen (loops while active)
    SleighFlyby,
    /// Guided bag alarm (loops while active)
    BagAlarm,
}

impl SoundCue {
    /// Cues that keep playing until an explicit stop event
    pub fn is_looping(&self) -> bool {
        matches!(self, SoundCue::SleighFlyby | SoundCue::BagAlarm)
    }
}

/// Stereo gain computation for sound cues
#[derive(Debug, Clone)]
pub struct Mixer {
    pub master_volume: f32,
    pub sfx_volume: f32,
    pub muted: bool,
}

impl Default for Mixer {
    fn default() -> Self {
        Self {
            master_volume: 1.0,
            sfx_volume: 1.0,
            muted: false,
        }
    }
}

impl Mixer {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            master_volume: settings.master_volume,
            sfx_volume: settings.sfx_volume,
            muted: !settings.sound_enabled,
        }
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        }
    }

    /// Pan position for a screen x-coordinate: 0.0 = hard left, 1.0 = hard right
    pub fn pan(x: f32) -> f32 {
        (x / SCREEN_W).clamp(0.0, 1.0)
    }

    /// (left, right) gains for a cue originating at screen x
    pub fn stereo_gains(&self, x: f32) -> (f32, f32) {
        let vol = self.effective_volume();
        let pan = Self::pan(x);
        (vol * (1.0 - pan), vol * pan)
    }
}
