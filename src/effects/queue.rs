use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::gesture::Point;

pub const PARTICLES_PER_BURST: usize = 5;
/// Only the most recent trail points are kept.
pub const TRAIL_CAPACITY: usize = 20;

pub const TEAL: &str = "#14b8a6";
pub const CYAN: &str = "#06b6d4";
pub const AMBER: &str = "#f59e0b";

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EffectKind {
    /// Press feedback on a control; the renderer reports when it has finished.
    #[serde(rename_all = "camelCase")]
    Ripple { control_id: String },
    /// Celebration particle with a fixed lifetime.
    Particle { color: String },
    TrailPoint,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransientEffect {
    pub id: u64,
    pub kind: EffectKind,
    pub position: Point,
    pub created_at: DateTime<Utc>,
}

/// Short-lived decorations. Producers are never blocked or dropped; only the
/// trail is bounded.
#[derive(Debug, Clone, Default)]
pub struct EffectsQueue {
    next_id: u64,
    effects: Vec<TransientEffect>,
    trail: VecDeque<TransientEffect>,
}

impl EffectsQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_effect(&mut self, kind: EffectKind, position: Point) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        let effect = TransientEffect {
            id,
            kind,
            position,
            created_at: Utc::now(),
        };

        if matches!(effect.kind, EffectKind::TrailPoint) {
            self.trail.push_back(effect);
            while self.trail.len() > TRAIL_CAPACITY {
                self.trail.pop_front();
            }
        } else {
            self.effects.push(effect);
        }
        id
    }

    pub fn add_ripple(&mut self, control_id: impl Into<String>, position: Point) -> u64 {
        self.add_effect(
            EffectKind::Ripple {
                control_id: control_id.into(),
            },
            position,
        )
    }

    /// Adds a burst of particles at one point and returns their ids.
    pub fn add_particle_burst(&mut self, position: Point, color: &str) -> Vec<u64> {
        (0..PARTICLES_PER_BURST)
            .map(|_| {
                self.add_effect(
                    EffectKind::Particle {
                        color: color.to_string(),
                    },
                    position,
                )
            })
            .collect()
    }

    pub fn push_trail(&mut self, position: Point) -> u64 {
        self.add_effect(EffectKind::TrailPoint, position)
    }

    pub fn clear_trail(&mut self) -> bool {
        let had_points = !self.trail.is_empty();
        self.trail.clear();
        had_points
    }

    /// Removing an unknown or already expired id is a no-op.
    pub fn remove(&mut self, id: u64) -> bool {
        if let Some(index) = self.effects.iter().position(|effect| effect.id == id) {
            self.effects.remove(index);
            return true;
        }
        if let Some(index) = self.trail.iter().position(|effect| effect.id == id) {
            self.trail.remove(index);
            return true;
        }
        false
    }

    pub fn remove_all(&mut self, ids: &[u64]) -> usize {
        let before = self.len();
        self.effects.retain(|effect| !ids.contains(&effect.id));
        self.trail.retain(|effect| !ids.contains(&effect.id));
        before - self.len()
    }

    pub fn len(&self) -> usize {
        self.effects.len() + self.trail.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn trail(&self) -> impl Iterator<Item = &TransientEffect> {
        self.trail.iter()
    }

    pub fn count_particles(&self) -> usize {
        self.effects
            .iter()
            .filter(|effect| matches!(effect.kind, EffectKind::Particle { .. }))
            .count()
    }

    /// Ripples and particles followed by the trail, oldest first.
    pub fn snapshot(&self) -> Vec<TransientEffect> {
        self.effects.iter().chain(self.trail.iter()).cloned().collect()
    }

    pub fn clear(&mut self) {
        self.effects.clear();
        self.trail.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_monotonic_across_kinds() {
        let mut queue = EffectsQueue::new();
        let ripple = queue.add_ripple("play-pause", Point::new(4.0, 4.0));
        let burst = queue.add_particle_burst(Point::new(10.0, 10.0), TEAL);
        let trail = queue.push_trail(Point::new(1.0, 1.0));

        assert_eq!(ripple, 0);
        assert_eq!(burst, vec![1, 2, 3, 4, 5]);
        assert_eq!(trail, 6);
        assert_eq!(queue.len(), 7);
        assert_eq!(queue.count_particles(), PARTICLES_PER_BURST);
    }

    #[test]
    fn remove_is_idempotent() {
        let mut queue = EffectsQueue::new();
        let id = queue.add_ripple("forward", Point::ORIGIN);
        assert!(queue.remove(id));
        assert!(!queue.remove(id));
        assert!(!queue.remove(999));
        assert!(queue.is_empty());
    }

    #[test]
    fn trail_keeps_only_recent_points() {
        let mut queue = EffectsQueue::new();
        for step in 0..30 {
            queue.push_trail(Point::new(step as f64, 0.0));
        }
        let xs: Vec<f64> = queue.trail().map(|point| point.position.x).collect();
        assert_eq!(xs.len(), TRAIL_CAPACITY);
        assert_eq!(xs[0], 10.0);
        assert_eq!(xs[TRAIL_CAPACITY - 1], 29.0);

        assert!(queue.clear_trail());
        assert!(!queue.clear_trail());
    }

    #[test]
    fn rapid_bursts_are_all_queued() {
        let mut queue = EffectsQueue::new();
        let mut ids = Vec::new();
        for _ in 0..18 {
            ids.extend(queue.add_particle_burst(Point::ORIGIN, AMBER));
        }
        assert_eq!(queue.count_particles(), 90);
        assert_eq!(queue.remove_all(&ids[..45]), 45);
        assert_eq!(queue.count_particles(), 45);
    }
}
