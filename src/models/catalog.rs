use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use super::Lesson;

const BUILTIN_COURSE: &str = include_str!("../../assets/course.json");

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub title: String,
    pub lessons: Vec<Lesson>,
}

impl Course {
    pub fn from_json(contents: &str) -> Result<Self> {
        let course: Course =
            serde_json::from_str(contents).context("Failed to parse course definition")?;
        if course.lessons.is_empty() {
            bail!("course '{}' has no lessons", course.title);
        }
        Ok(course)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read course from {}", path.display()))?;
        Self::from_json(&contents)
    }

    /// The course bundled with the crate.
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_COURSE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_course_parses_with_ordered_transcripts() {
        let course = Course::builtin().unwrap();
        assert_eq!(course.lessons.len(), 3);
        for lesson in &course.lessons {
            assert!(!lesson.completed);
            for pair in lesson.transcript.windows(2) {
                assert!(pair[0].end <= pair[1].start);
            }
        }
        assert!(course.lessons[2].whiteboard_uri.is_none());
    }

    #[test]
    fn empty_course_is_rejected() {
        let err = Course::from_json(r#"{ "title": "Empty", "lessons": [] }"#).unwrap_err();
        assert!(err.to_string().contains("no lessons"));
    }
}
