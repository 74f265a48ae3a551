//! Vertical drag-to-adjust while the player is immersive: the left edge
//! drives brightness, the right edge drives volume.

use serde::Serialize;

use super::geometry::{Point, Viewport};
use crate::playback::{MAX_BRIGHTNESS, MIN_BRIGHTNESS};

/// Vertical travel before a potential drag becomes an adjustment.
pub const DRAG_ACTIVATION_THRESHOLD: f64 = 10.0;
/// Value change per unit of vertical travel.
pub const DRAG_SENSITIVITY: f64 = 0.005;

const LEFT_EDGE_FRACTION: f64 = 0.33;
const RIGHT_EDGE_FRACTION: f64 = 0.67;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum DragAxis {
    Brightness,
    Volume,
}

/// Brightness and volume captured when the drag began.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelSnapshot {
    pub brightness: f64,
    pub volume: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragGesture {
    #[default]
    None,
    PotentialDrag {
        start: Point,
        snapshot: LevelSnapshot,
    },
    ActiveDrag {
        start: Point,
        snapshot: LevelSnapshot,
        axis: DragAxis,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragIntent {
    SetBrightness(f64),
    SetVolume(f64),
}

impl DragGesture {
    /// Starts a potential drag if `point` lies in the outer third on either side.
    pub fn begin(&mut self, point: Point, viewport: Viewport, snapshot: LevelSnapshot) -> bool {
        let in_edge_zone = point.x < viewport.width * LEFT_EDGE_FRACTION
            || point.x > viewport.width * RIGHT_EDGE_FRACTION;
        if !in_edge_zone {
            return false;
        }
        *self = DragGesture::PotentialDrag { start: point, snapshot };
        true
    }

    pub fn update(&mut self, point: Point, viewport: Viewport) -> Option<DragIntent> {
        let (start, snapshot, axis) = match *self {
            DragGesture::None => return None,
            DragGesture::PotentialDrag { start, snapshot } => {
                if (start.y - point.y).abs() <= DRAG_ACTIVATION_THRESHOLD {
                    return None;
                }
                let axis = if point.x < viewport.width * 0.5 {
                    DragAxis::Brightness
                } else {
                    DragAxis::Volume
                };
                *self = DragGesture::ActiveDrag {
                    start,
                    snapshot,
                    axis,
                };
                (start, snapshot, axis)
            }
            DragGesture::ActiveDrag {
                start,
                snapshot,
                axis,
            } => (start, snapshot, axis),
        };

        // Upward movement raises the value.
        let delta = (start.y - point.y) * DRAG_SENSITIVITY;
        Some(match axis {
            DragAxis::Brightness => DragIntent::SetBrightness(
                (snapshot.brightness + delta).clamp(MIN_BRIGHTNESS, MAX_BRIGHTNESS),
            ),
            DragAxis::Volume => DragIntent::SetVolume((snapshot.volume + delta).clamp(0.0, 1.0)),
        })
    }

    /// Resets to `None`; returns whether a drag was in progress.
    pub fn end(&mut self) -> bool {
        let engaged = !matches!(self, DragGesture::None);
        *self = DragGesture::None;
        engaged
    }

    pub fn indicator(&self) -> Option<DragAxis> {
        match self {
            DragGesture::ActiveDrag { axis, .. } => Some(*axis),
            _ => None,
        }
    }

    pub fn is_engaged(&self) -> bool {
        !matches!(self, DragGesture::None)
    }
}
