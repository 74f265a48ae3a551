//! Keeps the transcript and chapter lists in step with playback time.

pub mod end_marker;
pub mod interval;
pub mod scroll;

pub use end_marker::{sync_end_marker, MarkerUpdate, END_MARKER_TEXT};
pub use interval::{find_active, ActiveSelection, TimedInterval};
pub use scroll::{ScrollBehavior, ScrollRequest, TranscriptLayout};
