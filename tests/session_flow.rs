use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use anyhow::Result;
use lesson_player_lib::{
    config::PlayerConfig,
    environment::{EnvironmentNotice, HeadlessEnvironment},
    gesture::{NavDirection, Point, Viewport},
    models::{Chapter, Course, Lesson, TranscriptItem},
    playback::{MediaElement, MediaEvent},
    session::{ChannelSink, KeyInput, PanelMode, PlayerController, PlayerEvent, PlayerInput},
    settings::SettingsStore,
    PlayerSession,
};
use tokio::sync::mpsc;

#[derive(Clone, Default)]
struct LoggedMedia {
    sources: Arc<Mutex<Vec<String>>>,
}

impl MediaElement for LoggedMedia {
    fn play(&mut self) -> Result<()> {
        Ok(())
    }
    fn pause(&mut self) {}
    fn set_current_time(&mut self, _secs: f64) {}
    fn set_volume(&mut self, _volume: f64) {}
    fn set_muted(&mut self, _muted: bool) {}
    fn load(&mut self, source: &str) {
        self.sources.lock().unwrap().push(source.to_string());
    }
}

fn lesson(id: u32) -> Lesson {
    Lesson {
        id,
        title: format!("Lesson {id}"),
        media_uri: format!("https://cdn.example/lesson-{id}.mp4"),
        transcript: vec![
            TranscriptItem::line(1, 0.0, 5.0, "a"),
            TranscriptItem::line(2, 5.0, 10.0, "b"),
        ],
        chapters: vec![
            Chapter::new(1, "Intro", 0.0, 5.0),
            Chapter::new(2, "Body", 5.0, 10.0),
        ],
        whiteboard_uri: Some("board.png".into()),
        completed: false,
    }
}

struct Player {
    controller: PlayerController,
    media: LoggedMedia,
    events: mpsc::UnboundedReceiver<PlayerEvent>,
    notices: mpsc::UnboundedReceiver<EnvironmentNotice>,
}

impl Player {
    async fn new(lessons: u32) -> Self {
        let course = Course {
            title: "Flow".into(),
            lessons: (1..=lessons).map(lesson).collect(),
        };
        let (event_tx, events) = mpsc::unbounded_channel();
        let (notice_tx, notices) = mpsc::unbounded_channel();
        let session = PlayerSession::new(course, PlayerConfig::default(), true);
        let controller = PlayerController::new(
            session,
            Arc::new(HeadlessEnvironment::new(Some(notice_tx))),
            Arc::new(SettingsStore::in_memory()),
            Arc::new(ChannelSink::new(event_tx)),
        );
        let media = LoggedMedia::default();
        controller.attach_media(Box::new(media.clone())).await;
        controller
            .apply(PlayerInput::SetViewport {
                viewport: Viewport::new(1000.0, 600.0),
            })
            .await;
        controller
            .handle_media_event(MediaEvent::DurationChanged { duration: 10.0 })
            .await;
        Self {
            controller,
            media,
            events,
            notices,
        }
    }

    async fn input(&self, input: PlayerInput) {
        self.controller.apply(input).await;
    }

    async fn forward_notices(&mut self) {
        while let Ok(notice) = self.notices.try_recv() {
            self.controller.handle_environment(notice).await;
        }
    }

    fn drain(&mut self) -> Vec<PlayerEvent> {
        let mut drained = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            drained.push(event);
        }
        drained
    }
}

#[tokio::test(start_paused = true)]
async fn seeking_tracks_half_open_intervals() {
    let player = Player::new(1).await;

    player.input(PlayerInput::Seek { secs: 6.0 }).await;
    let active = player.controller.snapshot().await.active;
    assert_eq!(active.transcript_id, Some(2));
    assert_eq!(active.chapter_id, Some(2));

    player.input(PlayerInput::Seek { secs: 10.0 }).await;
    let active = player.controller.snapshot().await.active;
    assert_eq!(active.transcript_id, None);
    assert_eq!(active.chapter_id, None);

    player.input(PlayerInput::SeekToChapter { id: 1 }).await;
    assert_eq!(player.controller.snapshot().await.playback.current_time, 0.0);
}

#[tokio::test(start_paused = true)]
async fn immersive_drag_adjusts_brightness() {
    let mut player = Player::new(1).await;
    player.input(PlayerInput::ToggleImmersive).await;
    player.forward_notices().await;
    assert!(player.controller.snapshot().await.immersive);

    player
        .input(PlayerInput::TouchStart {
            touches: vec![Point::new(50.0, 300.0)],
        })
        .await;
    player
        .input(PlayerInput::TouchMove {
            touches: vec![Point::new(50.0, 260.0)],
        })
        .await;
    let snapshot = player.controller.snapshot().await;
    assert!((snapshot.playback.brightness - 1.2).abs() < 1e-9);
    assert!(snapshot.drag_indicator.is_some());

    player.input(PlayerInput::TouchEnd { lifted: None }).await;
    assert!(player.controller.snapshot().await.drag_indicator.is_none());
}

#[tokio::test(start_paused = true)]
async fn swipe_navigates_and_resets_the_lesson() {
    let player = Player::new(2).await;
    player
        .input(PlayerInput::SetPanelMode {
            mode: PanelMode::Whiteboard,
        })
        .await;
    player.input(PlayerInput::WhiteboardWheel { delta_y: -1.0 }).await;
    player.input(PlayerInput::Seek { secs: 4.0 }).await;

    player
        .input(PlayerInput::TouchStart {
            touches: vec![Point::new(500.0, 300.0)],
        })
        .await;
    player
        .input(PlayerInput::TouchEnd {
            lifted: Some(Point::new(440.0, 310.0)),
        })
        .await;

    let snapshot = player.controller.snapshot().await;
    assert_eq!(snapshot.lesson_index, 1);
    assert_eq!(snapshot.playback.current_time, 0.0);
    assert_eq!(snapshot.panel_mode, PanelMode::Transcript);
    assert_eq!(snapshot.whiteboard.zoom, 1.0);
    assert_eq!(snapshot.effects.len(), 5);
    assert_eq!(
        player.media.sources.lock().unwrap().last().map(String::as_str),
        Some("https://cdn.example/lesson-2.mp4")
    );

    tokio::time::sleep(Duration::from_millis(1600)).await;
    assert!(player.controller.snapshot().await.effects.is_empty());
}

#[tokio::test(start_paused = true)]
async fn completing_twice_reports_once() {
    let mut player = Player::new(1).await;
    player.drain();

    player.input(PlayerInput::MarkComplete).await;
    player.input(PlayerInput::MarkComplete).await;

    let completions = player
        .drain()
        .into_iter()
        .filter(|event| matches!(event, PlayerEvent::LessonCompleted { lesson_id: 1 }))
        .count();
    assert_eq!(completions, 1);
    assert_eq!(player.controller.snapshot().await.completed, vec![true]);
}

#[tokio::test(start_paused = true)]
async fn keyboard_shortcuts_drive_the_player() {
    let player = Player::new(2).await;

    player.input(PlayerInput::Key(KeyInput::new(" "))).await;
    assert!(player.controller.snapshot().await.playback.playing);

    player.input(PlayerInput::Key(KeyInput::new("m"))).await;
    assert!(player.controller.snapshot().await.playback.muted);

    player
        .input(PlayerInput::Key(KeyInput::new("N").with_shift()))
        .await;
    assert_eq!(player.controller.snapshot().await.lesson_index, 1);

    player
        .input(PlayerInput::Navigate {
            direction: NavDirection::Next,
        })
        .await;
    assert_eq!(player.controller.snapshot().await.lesson_index, 1);
}

#[tokio::test(start_paused = true)]
async fn lesson_end_rolls_into_the_next_lesson() {
    let player = Player::new(2).await;
    player.input(PlayerInput::TogglePlay).await;
    player.controller.handle_media_event(MediaEvent::Ended).await;

    tokio::time::sleep(Duration::from_millis(2100)).await;
    let snapshot = player.controller.snapshot().await;
    assert_eq!(snapshot.lesson_index, 1);
    assert!(!snapshot.playback.playing);
}
