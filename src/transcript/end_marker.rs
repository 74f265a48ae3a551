use crate::models::{TranscriptItem, TranscriptKind};

pub const END_MARKER_TEXT: &str = "video end";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerUpdate {
    Appended,
    Moved,
    Unchanged,
}

/// Keeps exactly one end-of-media row at `[duration, duration]`.
///
/// The row has an empty interval, so it is never selected as active; it only
/// gives the transcript list a trailing anchor once the duration is known.
pub fn sync_end_marker(transcript: &mut Vec<TranscriptItem>, duration: f64) -> MarkerUpdate {
    if !duration.is_finite() || duration <= 0.0 {
        return MarkerUpdate::Unchanged;
    }

    if let Some(marker) = transcript.iter_mut().find(|item| item.is_end_marker()) {
        if marker.start == duration && marker.end == duration {
            return MarkerUpdate::Unchanged;
        }
        marker.start = duration;
        marker.end = duration;
        return MarkerUpdate::Moved;
    }

    let id = transcript.iter().map(|item| item.id).max().unwrap_or(0) + 1;
    transcript.push(TranscriptItem {
        id,
        start: duration,
        end: duration,
        text: END_MARKER_TEXT.to_string(),
        kind: TranscriptKind::EndOfMedia,
    });
    MarkerUpdate::Appended
}
