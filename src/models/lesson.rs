use serde::{Deserialize, Serialize};

/// Whether a transcript row is spoken text or the synthetic end-of-media marker.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum TranscriptKind {
    #[default]
    Line,
    EndOfMedia,
}

/// One transcript row, active over the half-open interval `[start, end)`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptItem {
    pub id: u32,
    pub start: f64,
    pub end: f64,
    pub text: String,
    #[serde(default)]
    pub kind: TranscriptKind,
}

impl TranscriptItem {
    pub fn line(id: u32, start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            id,
            start,
            end,
            text: text.into(),
            kind: TranscriptKind::Line,
        }
    }

    pub fn is_end_marker(&self) -> bool {
        self.kind == TranscriptKind::EndOfMedia
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    pub id: u32,
    pub title: String,
    pub start: f64,
    pub end: f64,
}

impl Chapter {
    pub fn new(id: u32, title: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            id,
            title: title.into(),
            start,
            end,
        }
    }
}

/// A lesson in the course. Duration is not stored; it comes from the media.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: u32,
    pub title: String,
    pub media_uri: String,
    #[serde(default)]
    pub transcript: Vec<TranscriptItem>,
    #[serde(default)]
    pub chapters: Vec<Chapter>,
    /// Still image shown on the zoomable whiteboard panel
    #[serde(default)]
    pub whiteboard_uri: Option<String>,
    #[serde(default)]
    pub completed: bool,
}

impl Lesson {
    pub fn transcript_item(&self, id: u32) -> Option<&TranscriptItem> {
        self.transcript.iter().find(|item| item.id == id)
    }

    pub fn chapter(&self, id: u32) -> Option<&Chapter> {
        self.chapters.iter().find(|chapter| chapter.id == id)
    }
}
