//! JSON-lines front end: renderer messages arrive on stdin, events and media
//! commands leave on stdout, one JSON object per line.

use std::{
    future::Future,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader},
    sync::mpsc::{self, UnboundedSender},
};

use crate::{
    config::PlayerConfig,
    environment::{EnvironmentNotice, HeadlessEnvironment},
    models::Course,
    playback::{MediaElement, MediaEvent},
    session::{EventSink, PlayerController, PlayerEvent, PlayerInput, PlayerSession},
    settings::SettingsStore,
};

const ENABLE_LOGS: bool = true;

use crate::{log_error, log_info, log_warn};

#[derive(Debug, Deserialize)]
#[serde(tag = "channel", content = "message", rename_all = "camelCase")]
enum ShellMessage {
    Input(PlayerInput),
    Media(MediaEvent),
    Environment(EnvironmentNotice),
}

#[derive(Debug, Serialize)]
#[serde(tag = "command", rename_all = "camelCase")]
enum MediaCommand<'a> {
    Play,
    Pause,
    Seek { secs: f64 },
    SetVolume { volume: f64 },
    SetMuted { muted: bool },
    Load { source: &'a str },
}

#[derive(Serialize)]
struct Outbound<'a, T: Serialize> {
    event: &'a str,
    payload: T,
}

fn encode<T: Serialize>(event: &str, payload: T) -> Option<String> {
    match serde_json::to_string(&Outbound { event, payload }) {
        Ok(line) => Some(line),
        Err(err) => {
            log_error!("failed to encode {event}: {err}");
            None
        }
    }
}

/// Publishes controller events as output lines.
struct LineSink {
    lines: UnboundedSender<String>,
}

impl EventSink for LineSink {
    fn emit(&self, event: PlayerEvent) {
        let line = match serde_json::to_string(&event) {
            Ok(line) => line,
            Err(err) => {
                log_error!("failed to encode {}: {err}", event.name());
                return;
            }
        };
        let _ = self.lines.send(line);
    }
}

/// Media element living on the other end of stdout. It only forwards
/// commands; the renderer reports the outcome as media events.
struct ShellMedia {
    lines: UnboundedSender<String>,
}

impl ShellMedia {
    fn send(&self, command: MediaCommand<'_>) {
        if let Some(line) = encode("media-command", command) {
            let _ = self.lines.send(line);
        }
    }
}

impl MediaElement for ShellMedia {
    fn play(&mut self) -> Result<()> {
        self.send(MediaCommand::Play);
        Ok(())
    }

    fn pause(&mut self) {
        self.send(MediaCommand::Pause);
    }

    fn set_current_time(&mut self, secs: f64) {
        self.send(MediaCommand::Seek { secs });
    }

    fn set_volume(&mut self, volume: f64) {
        self.send(MediaCommand::SetVolume { volume });
    }

    fn set_muted(&mut self, muted: bool) {
        self.send(MediaCommand::SetMuted { muted });
    }

    fn load(&mut self, source: &str) {
        self.send(MediaCommand::Load { source });
    }
}

fn data_dir() -> PathBuf {
    std::env::var_os("LESSON_PLAYER_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(".lesson-player"))
}

fn load_course() -> Result<Course> {
    match std::env::var_os("LESSON_PLAYER_COURSE") {
        Some(path) => Course::load(Path::new(&path)),
        None => Course::builtin(),
    }
}

pub(crate) async fn serve_stdio(config: PlayerConfig) -> Result<()> {
    let course = load_course()?;
    log_info!(
        "loaded course '{}' with {} lessons",
        course.title,
        course.lessons.len()
    );

    let data_dir = data_dir();
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create data directory {}", data_dir.display()))?;
    let settings = Arc::new(SettingsStore::new(data_dir.join("settings.json"))?);

    let interrupt = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            log_warn!("ctrl-c handler unavailable: {err}");
            std::future::pending::<()>().await;
        }
        log_info!("interrupted");
    };
    serve(
        config,
        course,
        settings,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
        interrupt,
    )
    .await?;
    Ok(())
}

/// Runs one player over a line reader until EOF or `interrupt`, then drains
/// every queued line into `output` and hands it back.
async fn serve<R, W>(
    config: PlayerConfig,
    course: Course,
    settings: Arc<SettingsStore>,
    input: R,
    mut output: W,
    interrupt: impl Future<Output = ()>,
) -> Result<W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (line_tx, mut line_rx) = mpsc::unbounded_channel::<String>();
    let (notice_tx, mut notice_rx) = mpsc::unbounded_channel();

    let writer = tokio::spawn(async move {
        while let Some(line) = line_rx.recv().await {
            let written = async {
                output.write_all(line.as_bytes()).await?;
                output.write_all(b"\n").await?;
                output.flush().await
            };
            if let Err(err) = written.await {
                log_error!("output closed: {err}");
                break;
            }
        }
        output
    });

    let session = PlayerSession::new(course, config, settings.gesture_tutorial_seen());
    let controller = PlayerController::new(
        session,
        Arc::new(HeadlessEnvironment::new(Some(notice_tx))),
        settings,
        Arc::new(LineSink {
            lines: line_tx.clone(),
        }),
    );
    controller
        .attach_media(Box::new(ShellMedia { lines: line_tx }))
        .await;

    let mut lines = input.lines();
    tokio::pin!(interrupt);
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read input")? else {
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                match serde_json::from_str::<ShellMessage>(&line) {
                    Ok(ShellMessage::Input(input)) => controller.apply(input).await,
                    Ok(ShellMessage::Media(event)) => controller.handle_media_event(event).await,
                    Ok(ShellMessage::Environment(notice)) => {
                        controller.handle_environment(notice).await
                    }
                    Err(err) => log_warn!("ignoring malformed message: {err}"),
                }
            }
            Some(notice) = notice_rx.recv() => controller.handle_environment(notice).await,
            _ = &mut interrupt => break,
        }
    }

    // The writer stops once the media and the sink drop their senders.
    let media = controller.shutdown().await;
    drop(media);
    drop(controller);
    writer.await.context("Output writer panicked")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shell_messages_wrap_each_channel() {
        let message: ShellMessage = serde_json::from_str(
            r#"{"channel":"media","message":{"type":"timeUpdate","currentTime":3.5}}"#,
        )
        .unwrap();
        assert!(matches!(
            message,
            ShellMessage::Media(MediaEvent::TimeUpdate { current_time }) if current_time == 3.5
        ));

        let message: ShellMessage = serde_json::from_str(
            r#"{"channel":"input","message":{"type":"seek","secs":12}}"#,
        )
        .unwrap();
        assert!(matches!(message, ShellMessage::Input(PlayerInput::Seek { secs }) if secs == 12.0));
    }

    #[test]
    fn media_commands_encode_as_events() {
        let line = encode("media-command", MediaCommand::Load { source: "a.mp4" }).unwrap();
        let json: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(json["event"], "media-command");
        assert_eq!(json["payload"]["command"], "load");
        assert_eq!(json["payload"]["source"], "a.mp4");
    }

    #[tokio::test]
    async fn every_output_line_is_written_before_eof_returns() {
        let toggles = 21;
        let input =
            vec![r#"{"channel":"input","message":{"type":"toggleHighContrast"}}"#; toggles]
                .join("\n");

        let output = serve(
            PlayerConfig::default(),
            Course::builtin().unwrap(),
            Arc::new(SettingsStore::in_memory()),
            input.as_bytes(),
            Vec::new(),
            std::future::pending(),
        )
        .await
        .unwrap();

        let snapshots: Vec<serde_json::Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str::<serde_json::Value>(line).unwrap())
            .filter(|json| json["event"] == "player-state-changed")
            .collect();
        assert!(snapshots.len() > toggles);
        let last = snapshots.last().unwrap();
        assert_eq!(last["payload"]["highContrast"], true);
    }
}
