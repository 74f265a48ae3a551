use serde::{Deserialize, Serialize};

use crate::gesture::NavDirection;

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct KeyInput {
    /// Key value as reported by the platform, e.g. `" "`, `"ArrowLeft"`, `"N"`
    pub key: String,
    #[serde(default)]
    pub shift: bool,
    /// Set when a text field owns focus; the shortcut layer stays out of the way.
    #[serde(default)]
    pub text_input_focused: bool,
}

impl KeyInput {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            shift: false,
            text_input_focused: false,
        }
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeyCommand {
    TogglePlay,
    SeekBackward,
    SeekForward,
    ToggleMute,
    ToggleImmersive,
    ShowShortcutGuide,
    /// Jump to `n` tenths of the duration
    SeekDecile(u8),
    Navigate(NavDirection),
}

impl KeyCommand {
    pub fn from_input(input: &KeyInput) -> Option<Self> {
        if input.text_input_focused {
            return None;
        }
        let key = input.key.to_lowercase();
        let command = match key.as_str() {
            " " => KeyCommand::TogglePlay,
            "arrowleft" => KeyCommand::SeekBackward,
            "arrowright" => KeyCommand::SeekForward,
            "m" => KeyCommand::ToggleMute,
            "f" => KeyCommand::ToggleImmersive,
            "k" => KeyCommand::ShowShortcutGuide,
            "n" if input.shift => KeyCommand::Navigate(NavDirection::Next),
            "p" if input.shift => KeyCommand::Navigate(NavDirection::Prev),
            digit if digit.len() == 1 => {
                let value = digit.chars().next()?.to_digit(10)?;
                KeyCommand::SeekDecile(value as u8)
            }
            _ => return None,
        };
        Some(command)
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Shortcut {
    pub keys: &'static str,
    pub action: &'static str,
}

/// Contents of the shortcut guide overlay.
pub const SHORTCUTS: &[Shortcut] = &[
    Shortcut { keys: "Space", action: "Play/Pause" },
    Shortcut { keys: "←/→", action: "Seek -/+ 10s" },
    Shortcut { keys: "M", action: "Mute/Unmute" },
    Shortcut { keys: "F", action: "Fullscreen" },
    Shortcut { keys: "0-9", action: "Jump to 0-90%" },
    Shortcut { keys: "Shift+N/P", action: "Next/Previous" },
    Shortcut { keys: "K", action: "Keyboard Guide" },
];
