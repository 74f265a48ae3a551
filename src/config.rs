use std::time::Duration;

use serde::Deserialize;

/// Timings and thresholds for the player controller.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlayerConfig {
    /// Delay between `ended` and the automatic move to the next lesson
    pub auto_advance_delay_ms: u64,
    /// Controls hide after this long without pointer movement while playing
    pub controls_hide_delay_ms: u64,
    /// Shorter hide delay used when the pointer leaves the player
    pub controls_leave_hide_delay_ms: u64,
    pub volume_indicator_ms: u64,
    pub completion_banner_ms: u64,
    pub particle_lifetime_ms: u64,
    /// Offsets of the three celebration bursts after `mark_complete`
    pub celebration_burst_offsets_ms: [u64; 3],
    pub scroll_debounce_paused_ms: u64,
    pub scroll_debounce_playing_ms: u64,
    /// Viewports narrower than this use the compact transcript scroll
    pub narrow_breakpoint: f64,
    pub seek_step_secs: f64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            auto_advance_delay_ms: 2000,
            controls_hide_delay_ms: 3000,
            controls_leave_hide_delay_ms: 1000,
            volume_indicator_ms: 2000,
            completion_banner_ms: 3500,
            particle_lifetime_ms: 1500,
            celebration_burst_offsets_ms: [100, 300, 500],
            scroll_debounce_paused_ms: 50,
            scroll_debounce_playing_ms: 100,
            narrow_breakpoint: 768.0,
            seek_step_secs: 10.0,
        }
    }
}

impl PlayerConfig {
    /// Defaults, with `LESSON_PLAYER_DEBUG=1` collapsing the auto-advance wait.
    pub fn from_env() -> Self {
        let debug_mode = std::env::var("LESSON_PLAYER_DEBUG")
            .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let mut config = Self::default();
        if debug_mode {
            config.auto_advance_delay_ms = 0;
        }
        config
    }

    pub fn scroll_debounce(&self, playing: bool) -> Duration {
        if playing {
            Duration::from_millis(self.scroll_debounce_playing_ms)
        } else {
            Duration::from_millis(self.scroll_debounce_paused_ms)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_remaining_defaults() {
        let config: PlayerConfig =
            serde_json::from_str(r#"{ "autoAdvanceDelayMs": 500, "seekStepSecs": 5.0 }"#).unwrap();
        assert_eq!(config.auto_advance_delay_ms, 500);
        assert_eq!(config.seek_step_secs, 5.0);
        assert_eq!(config.particle_lifetime_ms, 1500);
        assert_eq!(config.scroll_debounce(true), Duration::from_millis(100));
        assert_eq!(config.scroll_debounce(false), Duration::from_millis(50));
    }
}
