use serde::Serialize;
use tokio::sync::mpsc::UnboundedSender;

use super::state::PlayerSnapshot;
use crate::transcript::ScrollRequest;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", content = "payload", rename_all = "kebab-case")]
pub enum PlayerEvent {
    PlayerStateChanged(Box<PlayerSnapshot>),
    TranscriptScroll(ScrollRequest),
    #[serde(rename_all = "camelCase")]
    LessonCompleted { lesson_id: u32 },
}

impl PlayerEvent {
    pub fn name(&self) -> &'static str {
        match self {
            PlayerEvent::PlayerStateChanged(_) => "player-state-changed",
            PlayerEvent::TranscriptScroll(_) => "transcript-scroll",
            PlayerEvent::LessonCompleted { .. } => "lesson-completed",
        }
    }
}

/// Where the controller publishes state for the renderer.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: PlayerEvent);
}

/// Forwards events into a tokio channel.
pub struct ChannelSink {
    tx: UnboundedSender<PlayerEvent>,
}

impl ChannelSink {
    pub fn new(tx: UnboundedSender<PlayerEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelSink {
    fn emit(&self, event: PlayerEvent) {
        // A closed receiver means the renderer is gone; nothing left to notify.
        let _ = self.tx.send(event);
    }
}

pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: PlayerEvent) {}
}
