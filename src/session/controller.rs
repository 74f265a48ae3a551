use std::{
    future::Future,
    pin::Pin,
    sync::{Arc, Mutex as StdMutex, MutexGuard, PoisonError},
    time::Duration,
};

use tokio::{sync::Mutex, time};
use tokio_util::sync::CancellationToken;

use super::{
    events::{EventSink, PlayerEvent},
    input::PlayerInput,
    state::{ControlsHide, Followup, PlayerSession, PlayerSnapshot},
};
use crate::{
    effects::CelebrationStage,
    environment::{DisplayEnvironment, EnvironmentNotice},
    playback::{MediaElement, MediaEvent},
    settings::SettingsStore,
    utils::TaskSlot,
};

const ENABLE_LOGS: bool = true;

use crate::{log_error, log_info, log_warn};

type TimerTask = Pin<Box<dyn Future<Output = ()> + Send>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Timer {
    ControlsHide,
    VolumeIndicator,
    TranscriptScroll,
    AutoAdvance,
    CompletionBanner,
}

#[derive(Default)]
struct TimerSlots {
    controls_hide: TaskSlot,
    volume_indicator: TaskSlot,
    transcript_scroll: TaskSlot,
    auto_advance: TaskSlot,
    completion_banner: TaskSlot,
}

impl TimerSlots {
    fn slot(&mut self, timer: Timer) -> &mut TaskSlot {
        match timer {
            Timer::ControlsHide => &mut self.controls_hide,
            Timer::VolumeIndicator => &mut self.volume_indicator,
            Timer::TranscriptScroll => &mut self.transcript_scroll,
            Timer::AutoAdvance => &mut self.auto_advance,
            Timer::CompletionBanner => &mut self.completion_banner,
        }
    }

    fn cancel_all(&mut self) {
        self.controls_hide.cancel();
        self.volume_indicator.cancel();
        self.transcript_scroll.cancel();
        self.auto_advance.cancel();
        self.completion_banner.cancel();
    }
}

/// Drives a [`PlayerSession`] from async inputs.
///
/// Every input, media event, environment notice and timer firing takes the
/// session lock once, mutates, turns the resulting followups into timers or
/// environment requests, and publishes a fresh snapshot before releasing it.
/// Lock order is always session, then timers.
#[derive(Clone)]
pub struct PlayerController {
    session: Arc<Mutex<PlayerSession>>,
    timers: Arc<StdMutex<TimerSlots>>,
    environment: Arc<dyn DisplayEnvironment>,
    settings: Arc<SettingsStore>,
    sink: Arc<dyn EventSink>,
    shutdown: CancellationToken,
}

impl PlayerController {
    pub fn new(
        session: PlayerSession,
        environment: Arc<dyn DisplayEnvironment>,
        settings: Arc<SettingsStore>,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
            timers: Arc::new(StdMutex::new(TimerSlots::default())),
            environment,
            settings,
            sink,
            shutdown: CancellationToken::new(),
        }
    }

    pub async fn snapshot(&self) -> PlayerSnapshot {
        self.session.lock().await.snapshot()
    }

    pub async fn apply(&self, input: PlayerInput) {
        self.mutate(|session| session.apply_input(input)).await
    }

    pub async fn handle_media_event(&self, event: MediaEvent) {
        self.mutate(|session| session.on_media_event(event)).await
    }

    pub async fn handle_environment(&self, notice: EnvironmentNotice) {
        if notice == EnvironmentNotice::ImmersiveFailed {
            log_warn!("immersive mode change failed; reverting to windowed");
        }
        self.mutate(|session| session.on_environment(notice)).await
    }

    pub async fn attach_media(&self, media: Box<dyn MediaElement>) {
        self.mutate(|session| session.attach_media(media)).await
    }

    /// Runs `op` against the session and settles everything it asked for
    /// before the lock is released.
    pub async fn mutate<R>(&self, op: impl FnOnce(&mut PlayerSession) -> R) -> R {
        let mut session = self.session.lock().await;
        let result = op(&mut *session);
        self.settle(&mut session);
        result
    }

    /// Cancels every pending timer and burst and releases the media element.
    /// Later inputs only touch session state; nothing reaches the media and
    /// nothing new is scheduled.
    pub async fn shutdown(&self) -> Option<Box<dyn MediaElement>> {
        self.shutdown.cancel();
        let mut session = self.session.lock().await;
        let media = session.detach_media();
        session.take_followups();
        self.lock_timers().cancel_all();
        log_info!("player controller shut down");
        media
    }

    pub fn is_shut_down(&self) -> bool {
        self.shutdown.is_cancelled()
    }

    fn settle(&self, session: &mut PlayerSession) {
        loop {
            let followups = session.take_followups();
            if followups.is_empty() {
                break;
            }
            for followup in followups {
                self.run_followup(session, followup);
            }
        }
        self.sink
            .emit(PlayerEvent::PlayerStateChanged(Box::new(session.snapshot())));
    }

    fn run_followup(&self, session: &mut PlayerSession, followup: Followup) {
        let config = session.config().clone();
        match followup {
            Followup::ArmControlsHide(reason) => {
                let delay = match reason {
                    ControlsHide::Idle => config.controls_hide_delay_ms,
                    ControlsHide::PointerLeft => config.controls_leave_hide_delay_ms,
                };
                self.arm(Timer::ControlsHide, Duration::from_millis(delay));
            }
            Followup::CancelControlsHide => self.cancel(Timer::ControlsHide),
            Followup::ArmVolumeIndicatorHide => self.arm(
                Timer::VolumeIndicator,
                Duration::from_millis(config.volume_indicator_ms),
            ),
            Followup::ArmTranscriptScroll => self.arm(
                Timer::TranscriptScroll,
                config.scroll_debounce(session.playback().playing),
            ),
            Followup::CancelTranscriptScroll => self.cancel(Timer::TranscriptScroll),
            Followup::ArmAutoAdvance => self.arm(
                Timer::AutoAdvance,
                Duration::from_millis(config.auto_advance_delay_ms),
            ),
            Followup::CancelAutoAdvance => self.cancel(Timer::AutoAdvance),
            Followup::ExpireParticles(ids) => {
                self.expire_later(ids, Duration::from_millis(config.particle_lifetime_ms))
            }
            Followup::Celebrate => {
                self.arm(
                    Timer::CompletionBanner,
                    Duration::from_millis(config.completion_banner_ms),
                );
                for (stage, offset) in CelebrationStage::ALL
                    .into_iter()
                    .zip(config.celebration_burst_offsets_ms)
                {
                    self.burst_later(stage, Duration::from_millis(offset));
                }
            }
            Followup::LessonCompleted(lesson_id) => {
                self.sink.emit(PlayerEvent::LessonCompleted { lesson_id });
            }
            Followup::RequestImmersive(enter) => {
                if let Err(err) = self.environment.request_immersive(enter) {
                    log_warn!("immersive request ({enter}) failed: {err:#}");
                    session.set_immersive(self.environment.is_immersive());
                }
            }
            Followup::RequestDetached(enter) => {
                if !self.environment.supports_detached_playback() {
                    log_warn!("detached playback is not available here");
                    return;
                }
                if let Err(err) = self.environment.request_detached(enter) {
                    log_warn!("detached playback request ({enter}) failed: {err:#}");
                    session.set_detached(self.environment.is_detached());
                }
            }
            Followup::PersistTutorialSeen => {
                if let Err(err) = self.settings.mark_gesture_tutorial_seen() {
                    log_error!("failed to persist tutorial dismissal: {err:#}");
                }
            }
        }
    }

    fn arm(&self, timer: Timer, delay: Duration) {
        if self.shutdown.is_cancelled() {
            return;
        }
        let controller = self.clone();
        self.lock_timers().slot(timer).arm(move |generation| -> TimerTask {
            Box::pin(async move {
                tokio::select! {
                    _ = controller.shutdown.cancelled() => {}
                    _ = time::sleep(delay) => controller.fire(timer, generation).await,
                }
            })
        });
    }

    fn cancel(&self, timer: Timer) {
        self.lock_timers().slot(timer).cancel();
    }

    async fn fire(&self, timer: Timer, generation: u64) {
        let mut session = self.session.lock().await;
        if !self.lock_timers().slot(timer).settle(generation) {
            return;
        }
        match timer {
            Timer::ControlsHide => session.hide_controls(),
            Timer::VolumeIndicator => session.hide_volume_indicator(),
            Timer::TranscriptScroll => {
                if let Some(request) = session.scroll_request() {
                    self.sink.emit(PlayerEvent::TranscriptScroll(request));
                }
                return;
            }
            Timer::AutoAdvance => {
                session.auto_advance();
            }
            Timer::CompletionBanner => session.hide_completion_banner(),
        }
        self.settle(&mut session);
    }

    fn expire_later(&self, ids: Vec<u64>, lifetime: Duration) {
        if self.shutdown.is_cancelled() {
            return;
        }
        let controller = self.clone();
        let task: TimerTask = Box::pin(async move {
            tokio::select! {
                _ = controller.shutdown.cancelled() => {}
                _ = time::sleep(lifetime) => {
                    controller.mutate(|session| session.expire_effects(&ids)).await;
                }
            }
        });
        tokio::spawn(task);
    }

    fn burst_later(&self, stage: CelebrationStage, offset: Duration) {
        if self.shutdown.is_cancelled() {
            return;
        }
        let controller = self.clone();
        let task: TimerTask = Box::pin(async move {
            tokio::select! {
                _ = controller.shutdown.cancelled() => {}
                _ = time::sleep(offset) => {
                    controller
                        .mutate(|session| {
                            session.celebration_burst(stage, &mut rand::thread_rng())
                        })
                        .await;
                }
            }
        });
        tokio::spawn(task);
    }

    fn lock_timers(&self) -> MutexGuard<'_, TimerSlots> {
        self.timers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
