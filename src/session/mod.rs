pub mod controller;
pub mod events;
pub mod input;
pub mod keyboard;
pub mod state;

pub use controller::PlayerController;
pub use events::{ChannelSink, EventSink, NullSink, PlayerEvent};
pub use input::{PlayerInput, RowOffset};
pub use keyboard::{KeyCommand, KeyInput, Shortcut, SHORTCUTS};
pub use state::{
    ControlsHide, DragIndicator, Followup, PanelMode, PlayerSession, PlayerSnapshot,
    TutorialState, TUTORIAL_STEPS,
};
