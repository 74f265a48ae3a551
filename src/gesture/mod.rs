pub mod geometry;
pub mod immersive;
pub mod swipe;
pub mod zoom_pan;

pub use geometry::{Point, Viewport};
pub use immersive::{DragAxis, DragGesture, DragIntent, LevelSnapshot};
pub use swipe::{classify_swipe, NavDirection, SwipeTracker};
pub use zoom_pan::{SurfaceGesture, ZoomPanMachine, ZoomPanState};
