use serde::Deserialize;

use super::{
    keyboard::KeyInput,
    state::{PanelMode, PlayerSession},
};
use crate::gesture::{NavDirection, Point, Viewport};

#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
pub struct RowOffset {
    pub id: u32,
    pub offset: f64,
}

/// One renderer-originated input, as it arrives over the wire.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PlayerInput {
    // Player surface
    TouchStart {
        touches: Vec<Point>,
    },
    TouchMove {
        touches: Vec<Point>,
    },
    TouchEnd {
        #[serde(default)]
        lifted: Option<Point>,
    },
    PointerDown {
        point: Point,
    },
    PointerMove {
        point: Point,
    },
    PointerUp,
    PointerLeave,

    // Whiteboard surface
    WhiteboardTouchStart {
        touches: Vec<Point>,
    },
    WhiteboardTouchMove {
        touches: Vec<Point>,
    },
    #[serde(rename_all = "camelCase")]
    WhiteboardTouchEnd {
        #[serde(default)]
        remaining_touches: usize,
    },
    WhiteboardPointerDown {
        point: Point,
    },
    WhiteboardPointerMove {
        point: Point,
    },
    WhiteboardPointerUp,
    #[serde(rename_all = "camelCase")]
    WhiteboardWheel {
        delta_y: f64,
    },

    Key(KeyInput),

    // Controls
    TogglePlay,
    Seek {
        secs: f64,
    },
    SeekFraction {
        fraction: f64,
    },
    SeekToTranscript {
        id: u32,
    },
    SeekToChapter {
        id: u32,
    },
    SetVolume {
        volume: f64,
    },
    ToggleMute,
    Navigate {
        direction: NavDirection,
    },
    MarkComplete,
    ToggleImmersive,
    ToggleDetached,
    SetPanelMode {
        mode: PanelMode,
    },
    ToggleSettingsMenu,
    OpenKeyboardGuide,
    CloseKeyboardGuide,
    ToggleHighContrast,
    HoverProgress {
        fraction: f64,
    },
    LeaveProgress,
    NextTutorialStep,
    PreviousTutorialStep,
    CompleteTutorial,
    #[serde(rename_all = "camelCase")]
    Ripple {
        control_id: String,
        point: Point,
    },
    RippleFinished {
        id: u64,
    },

    // Layout
    SetViewport {
        viewport: Viewport,
    },
    TranscriptLayout {
        rows: Vec<RowOffset>,
    },
}

impl PlayerSession {
    pub fn apply_input(&mut self, input: PlayerInput) {
        match input {
            PlayerInput::TouchStart { touches } => self.touch_start(&touches),
            PlayerInput::TouchMove { touches } => self.touch_move(&touches),
            PlayerInput::TouchEnd { lifted } => self.touch_end(lifted),
            PlayerInput::PointerDown { point } => self.pointer_down(point),
            PlayerInput::PointerMove { point } => self.pointer_move(point),
            PlayerInput::PointerUp => self.pointer_up(),
            PlayerInput::PointerLeave => self.pointer_leave(),

            PlayerInput::WhiteboardTouchStart { touches } => self.whiteboard_touch_start(&touches),
            PlayerInput::WhiteboardTouchMove { touches } => self.whiteboard_touch_move(&touches),
            PlayerInput::WhiteboardTouchEnd { remaining_touches } => {
                self.whiteboard_touch_end(remaining_touches)
            }
            PlayerInput::WhiteboardPointerDown { point } => self.whiteboard_pointer_down(point),
            PlayerInput::WhiteboardPointerMove { point } => self.whiteboard_pointer_move(point),
            PlayerInput::WhiteboardPointerUp => self.whiteboard_pointer_up(),
            PlayerInput::WhiteboardWheel { delta_y } => self.whiteboard_wheel(delta_y),

            PlayerInput::Key(key) => {
                self.handle_key(&key);
            }

            PlayerInput::TogglePlay => {
                self.toggle_play();
            }
            PlayerInput::Seek { secs } => {
                self.seek(secs);
            }
            PlayerInput::SeekFraction { fraction } => {
                self.seek_fraction(fraction);
            }
            PlayerInput::SeekToTranscript { id } => {
                self.seek_to_transcript(id);
            }
            PlayerInput::SeekToChapter { id } => {
                self.seek_to_chapter(id);
            }
            PlayerInput::SetVolume { volume } => {
                self.set_volume(volume);
            }
            PlayerInput::ToggleMute => {
                self.toggle_mute();
            }
            PlayerInput::Navigate { direction } => {
                self.navigate(direction);
            }
            PlayerInput::MarkComplete => {
                self.mark_complete();
            }
            PlayerInput::ToggleImmersive => self.toggle_immersive(),
            PlayerInput::ToggleDetached => self.toggle_detached(),
            PlayerInput::SetPanelMode { mode } => self.set_panel_mode(mode),
            PlayerInput::ToggleSettingsMenu => self.toggle_settings_menu(),
            PlayerInput::OpenKeyboardGuide => self.open_keyboard_guide(),
            PlayerInput::CloseKeyboardGuide => self.close_keyboard_guide(),
            PlayerInput::ToggleHighContrast => self.toggle_high_contrast(),
            PlayerInput::HoverProgress { fraction } => self.hover_progress(fraction),
            PlayerInput::LeaveProgress => self.leave_progress(),
            PlayerInput::NextTutorialStep => self.next_tutorial_step(),
            PlayerInput::PreviousTutorialStep => self.previous_tutorial_step(),
            PlayerInput::CompleteTutorial => self.complete_tutorial(),
            PlayerInput::Ripple { control_id, point } => {
                self.add_ripple(&control_id, point);
            }
            PlayerInput::RippleFinished { id } => {
                self.ripple_finished(id);
            }

            PlayerInput::SetViewport { viewport } => self.set_viewport(viewport),
            PlayerInput::TranscriptLayout { rows } => {
                self.set_transcript_layout(rows.into_iter().map(|row| (row.id, row.offset)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> PlayerInput {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn parses_tagged_inputs() {
        assert_eq!(
            parse(r#"{"type":"touchStart","touches":[{"x":1,"y":2}]}"#),
            PlayerInput::TouchStart {
                touches: vec![Point::new(1.0, 2.0)]
            }
        );
        assert_eq!(
            parse(r#"{"type":"whiteboardWheel","deltaY":-3}"#),
            PlayerInput::WhiteboardWheel { delta_y: -3.0 }
        );
        assert_eq!(
            parse(r#"{"type":"navigate","direction":"next"}"#),
            PlayerInput::Navigate {
                direction: NavDirection::Next
            }
        );
        assert_eq!(
            parse(r#"{"type":"setPanelMode","mode":"none"}"#),
            PlayerInput::SetPanelMode {
                mode: PanelMode::Hidden
            }
        );
        assert_eq!(parse(r#"{"type":"touchEnd"}"#), PlayerInput::TouchEnd { lifted: None });
    }

    #[test]
    fn key_input_fields_sit_beside_the_tag() {
        let input = parse(r#"{"type":"key","key":"N","shift":true}"#);
        assert_eq!(input, PlayerInput::Key(KeyInput::new("N").with_shift()));
    }
}
