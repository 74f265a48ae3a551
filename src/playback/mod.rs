pub mod clock;
pub mod state;

pub use clock::{ClockChange, MediaElement, MediaEvent, PlaybackClock};
pub use state::{PlaybackState, MAX_BRIGHTNESS, MIN_BRIGHTNESS};
