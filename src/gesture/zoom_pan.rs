//! Pinch, drag and wheel handling for the whiteboard surface.

use serde::Serialize;

use super::geometry::Point;

pub const MIN_ZOOM: f64 = 0.5;
pub const MAX_ZOOM: f64 = 3.0;
/// Pan allowance per unit of zoom above 1.
pub const PAN_PER_ZOOM: f64 = 50.0;
pub const WHEEL_ZOOM_IN: f64 = 1.1;
pub const WHEEL_ZOOM_OUT: f64 = 0.9;

/// Zoom factor and pan offset. Pan is pinned to the origin while zoom <= 1.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ZoomPanState {
    pub zoom: f64,
    pub pan: Point,
}

impl Default for ZoomPanState {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan: Point::ORIGIN,
        }
    }
}

impl ZoomPanState {
    pub fn max_pan(&self) -> f64 {
        ((self.zoom - 1.0) * PAN_PER_ZOOM).max(0.0)
    }

    pub fn set_zoom(&mut self, zoom: f64) -> f64 {
        if zoom.is_nan() {
            return self.zoom;
        }
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        if self.zoom <= 1.0 {
            self.pan = Point::ORIGIN;
        } else {
            self.pan = self.clamp_pan(self.pan);
        }
        self.zoom
    }

    fn clamp_pan(&self, pan: Point) -> Point {
        let limit = self.max_pan();
        Point::new(pan.x.clamp(-limit, limit), pan.y.clamp(-limit, limit))
    }

    pub fn pan_from(&mut self, start_offset: Point, delta: Point) {
        if self.zoom <= 1.0 {
            return;
        }
        self.pan = self.clamp_pan(Point::new(
            start_offset.x + delta.x,
            start_offset.y + delta.y,
        ));
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SurfaceGesture {
    #[default]
    Idle,
    Pinch {
        initial_distance: f64,
        initial_zoom: f64,
    },
    Pan {
        start_point: Point,
        start_offset: Point,
    },
}

#[derive(Debug, Clone, Default)]
pub struct ZoomPanMachine {
    view: ZoomPanState,
    gesture: SurfaceGesture,
}

impl ZoomPanMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> ZoomPanState {
        self.view
    }

    pub fn gesture(&self) -> SurfaceGesture {
        self.gesture
    }

    pub fn touch_start(&mut self, touches: &[Point]) {
        match touches {
            [first, second] => {
                self.gesture = SurfaceGesture::Pinch {
                    initial_distance: first.distance_to(*second),
                    initial_zoom: self.view.zoom,
                };
            }
            [only] => self.begin_pan(*only),
            _ => {}
        }
    }

    /// Returns true when zoom or pan changed.
    pub fn touch_move(&mut self, touches: &[Point]) -> bool {
        match (self.gesture, touches) {
            (
                SurfaceGesture::Pinch {
                    initial_distance,
                    initial_zoom,
                },
                [first, second],
            ) => {
                if initial_distance <= 0.0 {
                    return false;
                }
                let scale = first.distance_to(*second) / initial_distance;
                let before = self.view;
                self.view.set_zoom(initial_zoom * scale);
                before != self.view
            }
            (SurfaceGesture::Pan { .. }, [only]) => self.continue_pan(*only),
            _ => false,
        }
    }

    pub fn touch_end(&mut self, remaining_touches: usize) {
        match self.gesture {
            SurfaceGesture::Pinch { .. } if remaining_touches < 2 => {
                self.gesture = SurfaceGesture::Idle;
            }
            SurfaceGesture::Pan { .. } if remaining_touches == 0 => {
                self.gesture = SurfaceGesture::Idle;
            }
            _ => {}
        }
    }

    pub fn pointer_down(&mut self, point: Point) {
        self.begin_pan(point);
    }

    pub fn pointer_move(&mut self, point: Point) -> bool {
        self.continue_pan(point)
    }

    pub fn pointer_up(&mut self) {
        if matches!(self.gesture, SurfaceGesture::Pan { .. }) {
            self.gesture = SurfaceGesture::Idle;
        }
    }

    /// Positive `delta_y` (scrolling down) zooms out.
    pub fn wheel(&mut self, delta_y: f64) -> f64 {
        let factor = if delta_y > 0.0 {
            WHEEL_ZOOM_OUT
        } else {
            WHEEL_ZOOM_IN
        };
        self.view.set_zoom(self.view.zoom * factor)
    }

    pub fn reset(&mut self) {
        self.view.reset();
        self.gesture = SurfaceGesture::Idle;
    }

    fn begin_pan(&mut self, point: Point) {
        if self.view.zoom > 1.0 {
            self.gesture = SurfaceGesture::Pan {
                start_point: point,
                start_offset: self.view.pan,
            };
        }
    }

    fn continue_pan(&mut self, point: Point) -> bool {
        let SurfaceGesture::Pan {
            start_point,
            start_offset,
        } = self.gesture
        else {
            return false;
        };
        if self.view.zoom <= 1.0 {
            return false;
        }
        let before = self.view.pan;
        self.view.pan_from(
            start_offset,
            Point::new(point.x - start_point.x, point.y - start_point.y),
        );
        before != self.view.pan
    }
}
