use serde::{Deserialize, Serialize};

use super::geometry::Point;

/// Minimum horizontal travel for a swipe to change lessons.
pub const SWIPE_THRESHOLD: f64 = 50.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum NavDirection {
    Prev,
    Next,
}

/// Swiping right goes back, swiping left goes forward.
pub fn classify_swipe(origin: Point, end: Point) -> Option<NavDirection> {
    let delta_x = end.x - origin.x;
    let delta_y = end.y - origin.y;
    if delta_x.abs() > delta_y.abs() && delta_x.abs() > SWIPE_THRESHOLD {
        Some(if delta_x > 0.0 {
            NavDirection::Prev
        } else {
            NavDirection::Next
        })
    } else {
        None
    }
}

/// Remembers where the current single-finger touch started.
#[derive(Debug, Clone, Copy, Default)]
pub struct SwipeTracker {
    origin: Option<Point>,
}

impl SwipeTracker {
    pub fn touch_start(&mut self, point: Point) {
        self.origin = Some(point);
    }

    pub fn touch_end(&mut self, point: Point) -> Option<NavDirection> {
        let origin = self.origin.take()?;
        classify_swipe(origin, point)
    }

    pub fn clear(&mut self) {
        self.origin = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn left_swipe_moves_forward() {
        let origin = Point::new(200.0, 300.0);
        assert_eq!(
            classify_swipe(origin, Point::new(140.0, 310.0)),
            Some(NavDirection::Next)
        );
        assert_eq!(
            classify_swipe(origin, Point::new(260.0, 290.0)),
            Some(NavDirection::Prev)
        );
    }

    #[test]
    fn short_or_vertical_swipes_are_ignored() {
        let origin = Point::new(200.0, 300.0);
        assert_eq!(classify_swipe(origin, Point::new(150.0, 300.0)), None);
        assert_eq!(classify_swipe(origin, Point::new(120.0, 400.0)), None);
    }

    #[test]
    fn tracker_needs_a_start() {
        let mut tracker = SwipeTracker::default();
        assert_eq!(tracker.touch_end(Point::new(0.0, 0.0)), None);
        tracker.touch_start(Point::new(100.0, 100.0));
        assert_eq!(
            tracker.touch_end(Point::new(20.0, 100.0)),
            Some(NavDirection::Next)
        );
        assert_eq!(tracker.touch_end(Point::new(20.0, 100.0)), None);
    }
}
