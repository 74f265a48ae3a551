pub mod catalog;
pub mod lesson;

pub use catalog::Course;
pub use lesson::{Chapter, Lesson, TranscriptItem, TranscriptKind};
