use anyhow::Result;
use serde::Deserialize;

use super::state::{PlaybackState, MAX_BRIGHTNESS, MIN_BRIGHTNESS};

const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_error};

/// The native media element the player drives. Implemented by the embedding
/// shell; the clock is its only user.
pub trait MediaElement: Send {
    fn play(&mut self) -> Result<()>;
    fn pause(&mut self);
    fn set_current_time(&mut self, secs: f64);
    fn set_volume(&mut self, volume: f64);
    fn set_muted(&mut self, muted: bool);
    fn load(&mut self, source: &str);
}

/// Lifecycle notifications coming back from the media element.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum MediaEvent {
    #[serde(rename_all = "camelCase")]
    TimeUpdate { current_time: f64 },
    DurationChanged { duration: f64 },
    PlayingChanged { playing: bool },
    Ended,
}

/// What a [`MediaEvent`] changed in the playback state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClockChange {
    Time(f64),
    Duration(f64),
    Playing(bool),
    Ended,
    Ignored,
}

/// Owns the media binding and keeps [`PlaybackState`] authoritative.
pub struct PlaybackClock {
    media: Option<Box<dyn MediaElement>>,
    state: PlaybackState,
}

impl Default for PlaybackClock {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaybackClock {
    pub fn new() -> Self {
        Self {
            media: None,
            state: PlaybackState::new(),
        }
    }

    /// Binds a media element and pushes the current volume settings into it.
    pub fn attach(&mut self, mut media: Box<dyn MediaElement>) {
        media.set_volume(self.state.volume);
        media.set_muted(self.state.muted);
        self.media = Some(media);
    }

    pub fn detach(&mut self) -> Option<Box<dyn MediaElement>> {
        self.state.playing = false;
        self.media.take()
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn play(&mut self) -> bool {
        let Some(media) = self.media.as_mut() else {
            return false;
        };
        match media.play() {
            Ok(()) => {
                self.state.playing = true;
                true
            }
            Err(err) => {
                log_error!("media play failed: {err:?}");
                false
            }
        }
    }

    pub fn pause(&mut self) -> bool {
        let Some(media) = self.media.as_mut() else {
            return false;
        };
        media.pause();
        self.state.playing = false;
        true
    }

    pub fn toggle_play(&mut self) -> bool {
        if self.state.playing {
            self.pause()
        } else {
            self.play()
        }
    }

    /// Seeks to `secs` clamped to `[0, duration]`. Returns the applied
    /// position, or `None` when there is no media or no known duration.
    pub fn seek(&mut self, secs: f64) -> Option<f64> {
        if !self.state.has_duration() || secs.is_nan() {
            return None;
        }
        let media = self.media.as_mut()?;
        let clamped = secs.clamp(0.0, self.state.duration);
        media.set_current_time(clamped);
        self.state.current_time = clamped;
        Some(clamped)
    }

    pub fn seek_by(&mut self, delta_secs: f64) -> Option<f64> {
        self.seek(self.state.current_time + delta_secs)
    }

    /// Sets volume clamped to `[0, 1]`; a volume of exactly zero is the muted state.
    pub fn set_volume(&mut self, volume: f64) -> f64 {
        let volume = if volume.is_nan() {
            self.state.volume
        } else {
            volume.clamp(0.0, 1.0)
        };
        self.state.volume = volume;
        self.state.muted = volume == 0.0;
        if let Some(media) = self.media.as_mut() {
            media.set_volume(volume);
            media.set_muted(self.state.muted);
        }
        volume
    }

    pub fn toggle_mute(&mut self) -> bool {
        let Some(media) = self.media.as_mut() else {
            return false;
        };
        let muted = !self.state.muted;
        self.state.muted = muted;
        media.set_muted(muted);
        if !muted && self.state.volume == 0.0 {
            self.state.volume = 1.0;
            media.set_volume(1.0);
        }
        true
    }

    pub fn set_brightness(&mut self, brightness: f64) -> f64 {
        if !brightness.is_nan() {
            self.state.brightness = brightness.clamp(MIN_BRIGHTNESS, MAX_BRIGHTNESS);
        }
        self.state.brightness
    }

    /// Switches the media source. Duration is unknown again until reported.
    pub fn load(&mut self, source: &str) {
        self.state.current_time = 0.0;
        self.state.duration = 0.0;
        self.state.playing = false;
        if let Some(media) = self.media.as_mut() {
            media.load(source);
            media.set_current_time(0.0);
        }
    }

    pub fn handle_event(&mut self, event: MediaEvent) -> ClockChange {
        log_debug!("media event {event:?}");
        match event {
            MediaEvent::TimeUpdate { current_time } => {
                if !current_time.is_finite() {
                    return ClockChange::Ignored;
                }
                let mut time = current_time.max(0.0);
                if self.state.has_duration() {
                    time = time.min(self.state.duration);
                }
                self.state.current_time = time;
                ClockChange::Time(time)
            }
            MediaEvent::DurationChanged { duration } => {
                if !duration.is_finite() || duration <= 0.0 {
                    return ClockChange::Ignored;
                }
                self.state.duration = duration;
                ClockChange::Duration(duration)
            }
            MediaEvent::PlayingChanged { playing } => {
                self.state.playing = playing;
                ClockChange::Playing(playing)
            }
            MediaEvent::Ended => {
                self.state.playing = false;
                ClockChange::Ended
            }
        }
    }
}
