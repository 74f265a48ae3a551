use std::f64::consts::PI;

use rand::Rng;

use super::queue::{AMBER, CYAN, TEAL};
use crate::gesture::Point;

/// The three waves of particles played after a lesson is marked complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CelebrationStage {
    /// Eight points on a wide ring
    OuterRing,
    /// Six points on a tighter ring, rotated by a twelfth of a turn
    InnerRing,
    /// Four points scattered at random around the center
    Scatter,
}

impl CelebrationStage {
    pub const ALL: [CelebrationStage; 3] = [
        CelebrationStage::OuterRing,
        CelebrationStage::InnerRing,
        CelebrationStage::Scatter,
    ];

    pub fn color(&self) -> &'static str {
        match self {
            CelebrationStage::OuterRing => TEAL,
            CelebrationStage::InnerRing => CYAN,
            CelebrationStage::Scatter => AMBER,
        }
    }

    pub fn burst_points<R: Rng>(&self, center: Point, rng: &mut R) -> Vec<Point> {
        match self {
            CelebrationStage::OuterRing => ring(center, 8, 120.0, 0.0),
            CelebrationStage::InnerRing => ring(center, 6, 80.0, PI / 6.0),
            CelebrationStage::Scatter => (0..4)
                .map(|_| {
                    Point::new(
                        center.x + rng.gen_range(-100.0..100.0),
                        center.y + rng.gen_range(-100.0..100.0),
                    )
                })
                .collect(),
        }
    }
}

fn ring(center: Point, count: usize, radius: f64, phase: f64) -> Vec<Point> {
    (0..count)
        .map(|i| {
            let angle = (i as f64 / count as f64) * PI * 2.0 + phase;
            Point::new(
                center.x + angle.cos() * radius,
                center.y + angle.sin() * radius,
            )
        })
        .collect()
}
