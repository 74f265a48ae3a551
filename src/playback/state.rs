use serde::{Deserialize, Serialize};

pub const MIN_BRIGHTNESS: f64 = 0.2;
pub const MAX_BRIGHTNESS: f64 = 1.5;

/// Playback snapshot. `current_time` and `duration` are only written by
/// [`super::PlaybackClock`]; the remaining fields follow session intents.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackState {
    pub current_time: f64,
    /// Zero until the media reports its duration
    pub duration: f64,
    pub playing: bool,
    pub volume: f64,
    pub muted: bool,
    /// Multiplier applied to the video surface by the renderer
    pub brightness: f64,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            current_time: 0.0,
            duration: 0.0,
            playing: false,
            volume: 1.0,
            muted: false,
            brightness: 1.0,
        }
    }
}

impl PlaybackState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_duration(&self) -> bool {
        self.duration > 0.0
    }

    /// Fraction of the media already played, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        if !self.has_duration() {
            return 0.0;
        }
        (self.current_time / self.duration).clamp(0.0, 1.0)
    }
}
