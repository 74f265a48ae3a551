use serde::Serialize;

use crate::models::{Chapter, Lesson, TranscriptItem};

/// Anything active over a half-open time interval `[start, end)`.
pub trait TimedInterval {
    fn start(&self) -> f64;
    fn end(&self) -> f64;

    fn contains(&self, time: f64) -> bool {
        self.start() <= time && time < self.end()
    }
}

impl TimedInterval for TranscriptItem {
    fn start(&self) -> f64 {
        self.start
    }

    fn end(&self) -> f64 {
        self.end
    }
}

impl TimedInterval for Chapter {
    fn start(&self) -> f64 {
        self.start
    }

    fn end(&self) -> f64 {
        self.end
    }
}

/// First entry containing `time`.
pub fn find_active<T: TimedInterval>(items: &[T], time: f64) -> Option<&T> {
    items.iter().find(|item| item.contains(time))
}

/// Transcript row and chapter active at a given instant.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ActiveSelection {
    pub transcript_id: Option<u32>,
    pub chapter_id: Option<u32>,
}

impl ActiveSelection {
    pub fn at(lesson: &Lesson, time: f64) -> Self {
        Self {
            transcript_id: find_active(&lesson.transcript, time).map(|item| item.id),
            chapter_id: find_active(&lesson.chapters, time).map(|chapter| chapter.id),
        }
    }
}
