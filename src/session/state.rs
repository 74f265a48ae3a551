use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::keyboard::{KeyCommand, KeyInput, Shortcut, SHORTCUTS};
use crate::{
    config::PlayerConfig,
    effects::{CelebrationStage, EffectsQueue, TransientEffect, TEAL},
    environment::EnvironmentNotice,
    gesture::{
        DragAxis, DragGesture, DragIntent, LevelSnapshot, NavDirection, Point, SwipeTracker,
        Viewport, ZoomPanMachine, ZoomPanState,
    },
    models::{Course, Lesson},
    playback::{ClockChange, MediaElement, MediaEvent, PlaybackClock, PlaybackState},
    transcript::{sync_end_marker, ActiveSelection, MarkerUpdate, ScrollRequest, TranscriptLayout},
};

const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info};

pub const TUTORIAL_STEPS: u8 = 2;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum PanelMode {
    #[default]
    Transcript,
    Whiteboard,
    #[serde(rename = "none")]
    Hidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlsHide {
    Idle,
    PointerLeft,
}

/// Work a session mutation hands back to the controller: timers to arm or
/// cancel, environment requests, persistence.
#[derive(Debug, Clone, PartialEq)]
pub enum Followup {
    ArmControlsHide(ControlsHide),
    CancelControlsHide,
    ArmVolumeIndicatorHide,
    ArmTranscriptScroll,
    CancelTranscriptScroll,
    ArmAutoAdvance,
    CancelAutoAdvance,
    ExpireParticles(Vec<u64>),
    Celebrate,
    LessonCompleted(u32),
    RequestImmersive(bool),
    RequestDetached(bool),
    PersistTutorialSeen,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
pub struct TutorialState {
    pub visible: bool,
    pub step: u8,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct DragIndicator {
    pub axis: DragAxis,
    pub value: f64,
}

/// Everything the renderer needs to paint one frame of the player.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSnapshot {
    pub session_id: Uuid,
    pub course_title: String,
    pub lesson_index: usize,
    pub lesson_count: usize,
    pub lesson_id: Option<u32>,
    pub lesson_title: Option<String>,
    pub playback: PlaybackState,
    /// Played fraction for the progress bar, in `[0, 1]`
    pub progress: f64,
    pub active: ActiveSelection,
    pub completed: Vec<bool>,
    pub panel_mode: PanelMode,
    pub immersive: bool,
    pub detached: bool,
    pub settings_menu_open: bool,
    /// Shortcut table while the guide overlay is open
    pub keyboard_guide: Option<&'static [Shortcut]>,
    pub high_contrast: bool,
    pub controls_visible: bool,
    pub volume_indicator_visible: bool,
    pub completion_banner_visible: bool,
    pub drag_indicator: Option<DragIndicator>,
    pub whiteboard: ZoomPanState,
    pub hovered_time: Option<f64>,
    pub tutorial: TutorialState,
    pub effects: Vec<TransientEffect>,
}

/// The player aggregate. Purely synchronous: every mutation runs to
/// completion and leaves any timer work in the followup list.
pub struct PlayerSession {
    id: Uuid,
    config: PlayerConfig,
    course_title: String,
    lessons: Vec<Lesson>,
    current_index: usize,
    clock: PlaybackClock,
    viewport: Viewport,
    selection: ActiveSelection,
    layout: TranscriptLayout,
    panel_mode: PanelMode,
    immersive: bool,
    detached: bool,
    settings_menu_open: bool,
    keyboard_guide_open: bool,
    high_contrast: bool,
    controls_visible: bool,
    volume_indicator_visible: bool,
    completion_banner_visible: bool,
    hovered_time: Option<f64>,
    tutorial: TutorialState,
    drag: DragGesture,
    whiteboard: ZoomPanMachine,
    swipe: SwipeTracker,
    effects: EffectsQueue,
    followups: Vec<Followup>,
}

impl PlayerSession {
    pub fn new(course: Course, config: PlayerConfig, tutorial_seen: bool) -> Self {
        let mut session = Self {
            id: Uuid::new_v4(),
            config,
            course_title: course.title,
            lessons: course.lessons,
            current_index: 0,
            clock: PlaybackClock::new(),
            viewport: Viewport::default(),
            selection: ActiveSelection::default(),
            layout: TranscriptLayout::default(),
            panel_mode: PanelMode::Transcript,
            immersive: false,
            detached: false,
            settings_menu_open: false,
            keyboard_guide_open: false,
            high_contrast: false,
            controls_visible: true,
            volume_indicator_visible: false,
            completion_banner_visible: false,
            hovered_time: None,
            tutorial: TutorialState {
                visible: !tutorial_seen,
                step: 0,
            },
            drag: DragGesture::None,
            whiteboard: ZoomPanMachine::new(),
            swipe: SwipeTracker::default(),
            effects: EffectsQueue::new(),
            followups: Vec::new(),
        };
        session.refresh_selection();
        session
    }

    // ----- accessors -----

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }

    pub fn lesson(&self) -> Option<&Lesson> {
        self.lessons.get(self.current_index)
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn playback(&self) -> &PlaybackState {
        self.clock.state()
    }

    pub fn selection(&self) -> ActiveSelection {
        self.selection
    }

    pub fn panel_mode(&self) -> PanelMode {
        self.panel_mode
    }

    pub fn is_immersive(&self) -> bool {
        self.immersive
    }

    pub fn is_detached(&self) -> bool {
        self.detached
    }

    pub fn controls_visible(&self) -> bool {
        self.controls_visible
    }

    pub fn whiteboard(&self) -> ZoomPanState {
        self.whiteboard.view()
    }

    pub fn effects(&self) -> &EffectsQueue {
        &self.effects
    }

    pub fn tutorial(&self) -> TutorialState {
        self.tutorial
    }

    pub fn hovered_time(&self) -> Option<f64> {
        self.hovered_time
    }

    pub fn drag_indicator(&self) -> Option<DragIndicator> {
        let axis = self.drag.indicator()?;
        let state = self.clock.state();
        let value = match axis {
            DragAxis::Brightness => state.brightness,
            DragAxis::Volume => state.volume,
        };
        Some(DragIndicator { axis, value })
    }

    pub fn take_followups(&mut self) -> Vec<Followup> {
        std::mem::take(&mut self.followups)
    }

    pub fn snapshot(&self) -> PlayerSnapshot {
        let lesson = self.lesson();
        PlayerSnapshot {
            session_id: self.id,
            course_title: self.course_title.clone(),
            lesson_index: self.current_index,
            lesson_count: self.lessons.len(),
            lesson_id: lesson.map(|lesson| lesson.id),
            lesson_title: lesson.map(|lesson| lesson.title.clone()),
            playback: *self.clock.state(),
            progress: self.clock.state().progress(),
            active: self.selection,
            completed: self.lessons.iter().map(|lesson| lesson.completed).collect(),
            panel_mode: self.panel_mode,
            immersive: self.immersive,
            detached: self.detached,
            settings_menu_open: self.settings_menu_open,
            keyboard_guide: self.keyboard_guide_open.then_some(SHORTCUTS),
            high_contrast: self.high_contrast,
            controls_visible: self.controls_visible,
            volume_indicator_visible: self.volume_indicator_visible,
            completion_banner_visible: self.completion_banner_visible,
            drag_indicator: self.drag_indicator(),
            whiteboard: self.whiteboard.view(),
            hovered_time: self.hovered_time,
            tutorial: self.tutorial,
            effects: self.effects.snapshot(),
        }
    }

    // ----- media binding -----

    pub fn attach_media(&mut self, media: Box<dyn MediaElement>) {
        self.clock.attach(media);
        if let Some(source) = self.lesson().map(|lesson| lesson.media_uri.clone()) {
            self.clock.load(&source);
        }
        self.refresh_selection();
    }

    pub fn detach_media(&mut self) -> Option<Box<dyn MediaElement>> {
        let media = self.clock.detach();
        self.after_playing_change();
        media
    }

    pub fn on_media_event(&mut self, event: MediaEvent) {
        match self.clock.handle_event(event) {
            ClockChange::Time(_) => {
                self.refresh_selection();
                self.schedule_scroll();
            }
            ClockChange::Duration(duration) => {
                if let Some(lesson) = self.lessons.get_mut(self.current_index) {
                    let update = sync_end_marker(&mut lesson.transcript, duration);
                    if update != MarkerUpdate::Unchanged {
                        log_debug!("end marker {update:?} at {duration}s for lesson {}", lesson.id);
                    }
                }
                self.refresh_selection();
            }
            ClockChange::Playing(_) => self.after_playing_change(),
            ClockChange::Ended => {
                self.after_playing_change();
                if self.current_index + 1 < self.lessons.len() {
                    self.followups.push(Followup::ArmAutoAdvance);
                }
            }
            ClockChange::Ignored => {}
        }
    }

    // ----- playback intents -----

    pub fn toggle_play(&mut self) -> bool {
        let changed = self.clock.toggle_play();
        if changed {
            self.after_playing_change();
        }
        changed
    }

    pub fn seek(&mut self, secs: f64) -> Option<f64> {
        let applied = self.clock.seek(secs)?;
        self.after_seek();
        Some(applied)
    }

    pub fn seek_relative(&mut self, delta_secs: f64) -> Option<f64> {
        let applied = self.clock.seek_by(delta_secs)?;
        self.after_seek();
        Some(applied)
    }

    fn after_seek(&mut self) {
        self.refresh_selection();
        self.schedule_scroll();
    }

    pub fn seek_fraction(&mut self, fraction: f64) -> Option<f64> {
        let duration = self.clock.state().duration;
        if duration <= 0.0 || fraction.is_nan() {
            return None;
        }
        self.seek(duration * fraction.clamp(0.0, 1.0))
    }

    pub fn seek_to_transcript(&mut self, item_id: u32) -> Option<f64> {
        let start = self.lesson()?.transcript_item(item_id)?.start;
        self.seek(start)
    }

    pub fn seek_to_chapter(&mut self, chapter_id: u32) -> Option<f64> {
        let start = self.lesson()?.chapter(chapter_id)?.start;
        self.seek(start)
    }

    pub fn set_volume(&mut self, volume: f64) -> f64 {
        let applied = self.clock.set_volume(volume);
        self.volume_indicator_visible = true;
        self.followups.push(Followup::ArmVolumeIndicatorHide);
        applied
    }

    pub fn toggle_mute(&mut self) -> bool {
        self.clock.toggle_mute()
    }

    // ----- lessons -----

    /// Moves one lesson back or forward. Returns false, with no side effects,
    /// when already at that end of the course.
    pub fn navigate(&mut self, direction: NavDirection) -> bool {
        let Some(last) = self.lessons.len().checked_sub(1) else {
            return false;
        };
        let target = match direction {
            NavDirection::Prev => self.current_index.saturating_sub(1),
            NavDirection::Next => (self.current_index + 1).min(last),
        };
        if target == self.current_index {
            return false;
        }

        self.current_index = target;
        let source = self.lessons[target].media_uri.clone();
        self.clock.load(&source);
        self.panel_mode = PanelMode::Transcript;
        self.whiteboard.reset();
        self.layout.clear();
        self.hovered_time = None;
        self.refresh_selection();
        self.followups.push(Followup::CancelAutoAdvance);
        self.after_playing_change();

        let center = self.viewport.center();
        self.burst(center, TEAL);

        log_info!(
            "navigated {:?} to lesson {} ({})",
            direction,
            target,
            self.lessons[target].title
        );
        true
    }

    /// Fired by the auto-advance timer after a lesson ends.
    pub fn auto_advance(&mut self) -> bool {
        self.navigate(NavDirection::Next)
    }

    /// Marks the current lesson complete. The flag is permanent; the
    /// celebration replays on every call.
    pub fn mark_complete(&mut self) -> bool {
        let Some(lesson) = self.lessons.get_mut(self.current_index) else {
            return false;
        };
        let first_time = !lesson.completed;
        lesson.completed = true;
        if first_time {
            log_info!("lesson {} marked complete", lesson.id);
            self.followups.push(Followup::LessonCompleted(lesson.id));
        }
        self.completion_banner_visible = true;
        self.followups.push(Followup::Celebrate);
        first_time
    }

    pub fn celebration_burst<R: Rng>(&mut self, stage: CelebrationStage, rng: &mut R) {
        let center = self.viewport.center();
        for point in stage.burst_points(center, rng) {
            self.burst(point, stage.color());
        }
    }

    pub fn hide_completion_banner(&mut self) {
        self.completion_banner_visible = false;
    }

    // ----- immersive / detached -----

    pub fn toggle_immersive(&mut self) {
        self.followups
            .push(Followup::RequestImmersive(!self.immersive));
    }

    pub fn toggle_detached(&mut self) {
        self.followups.push(Followup::RequestDetached(!self.detached));
    }

    pub fn on_environment(&mut self, notice: EnvironmentNotice) {
        match notice {
            EnvironmentNotice::ImmersiveChanged { active } => self.set_immersive(active),
            EnvironmentNotice::ImmersiveFailed => self.set_immersive(false),
            EnvironmentNotice::DetachedChanged { active } => self.detached = active,
        }
    }

    /// Applies the environment's reported immersive state.
    pub fn set_immersive(&mut self, active: bool) {
        if self.immersive == active {
            return;
        }
        self.immersive = active;
        self.drag.end();
        self.swipe.clear();
    }

    pub fn set_detached(&mut self, active: bool) {
        self.detached = active;
    }

    // ----- player surface gestures -----

    pub fn touch_start(&mut self, touches: &[Point]) {
        let [touch] = touches else {
            return;
        };
        self.swipe.touch_start(*touch);
        if self.immersive {
            let snapshot = self.level_snapshot();
            self.drag.begin(*touch, self.viewport, snapshot);
        }
    }

    pub fn touch_move(&mut self, touches: &[Point]) {
        let [touch] = touches else {
            return;
        };
        if self.immersive {
            if let Some(intent) = self.drag.update(*touch, self.viewport) {
                self.apply_drag(intent);
            }
        } else {
            self.effects.push_trail(*touch);
        }
    }

    /// `lifted` is the contact that left the surface, if the platform reports one.
    pub fn touch_end(&mut self, lifted: Option<Point>) {
        self.effects.clear_trail();

        if self.immersive {
            self.drag.end();
            self.swipe.clear();
            return;
        }

        let direction = match lifted {
            Some(point) => self.swipe.touch_end(point),
            None => {
                self.swipe.clear();
                None
            }
        };
        if let Some(direction) = direction {
            self.navigate(direction);
        }
    }

    pub fn pointer_down(&mut self, point: Point) {
        if self.immersive {
            let snapshot = self.level_snapshot();
            self.drag.begin(point, self.viewport, snapshot);
        }
    }

    pub fn pointer_move(&mut self, point: Point) {
        self.pointer_activity();
        if self.immersive {
            if let Some(intent) = self.drag.update(point, self.viewport) {
                self.apply_drag(intent);
            }
        }
    }

    pub fn pointer_up(&mut self) {
        self.drag.end();
    }

    /// Shows the controls and restarts the idle countdown.
    pub fn pointer_activity(&mut self) {
        self.controls_visible = true;
        if self.clock.state().playing && !self.settings_menu_open {
            self.followups
                .push(Followup::ArmControlsHide(ControlsHide::Idle));
        }
    }

    pub fn pointer_leave(&mut self) {
        if self.clock.state().playing && !self.settings_menu_open {
            self.followups
                .push(Followup::ArmControlsHide(ControlsHide::PointerLeft));
        }
    }

    pub fn hide_controls(&mut self) {
        if self.clock.state().playing && !self.settings_menu_open {
            self.controls_visible = false;
        }
    }

    fn level_snapshot(&self) -> LevelSnapshot {
        let state = self.clock.state();
        LevelSnapshot {
            brightness: state.brightness,
            volume: state.volume,
        }
    }

    fn apply_drag(&mut self, intent: DragIntent) {
        match intent {
            DragIntent::SetBrightness(value) => {
                self.clock.set_brightness(value);
            }
            DragIntent::SetVolume(value) => {
                self.clock.set_volume(value);
            }
        }
    }

    // ----- whiteboard surface gestures -----

    fn whiteboard_active(&self) -> bool {
        self.panel_mode == PanelMode::Whiteboard
    }

    pub fn whiteboard_touch_start(&mut self, touches: &[Point]) {
        if self.whiteboard_active() {
            self.whiteboard.touch_start(touches);
        }
    }

    pub fn whiteboard_touch_move(&mut self, touches: &[Point]) {
        if self.whiteboard_active() {
            self.whiteboard.touch_move(touches);
        }
    }

    pub fn whiteboard_touch_end(&mut self, remaining_touches: usize) {
        self.whiteboard.touch_end(remaining_touches);
    }

    pub fn whiteboard_pointer_down(&mut self, point: Point) {
        if self.whiteboard_active() {
            self.whiteboard.pointer_down(point);
        }
    }

    pub fn whiteboard_pointer_move(&mut self, point: Point) {
        if self.whiteboard_active() {
            self.whiteboard.pointer_move(point);
        }
    }

    pub fn whiteboard_pointer_up(&mut self) {
        self.whiteboard.pointer_up();
    }

    pub fn whiteboard_wheel(&mut self, delta_y: f64) {
        if self.whiteboard_active() {
            self.whiteboard.wheel(delta_y);
        }
    }

    // ----- effects -----

    pub fn add_ripple(&mut self, control_id: &str, point: Point) -> u64 {
        self.effects.add_ripple(control_id, point)
    }

    pub fn ripple_finished(&mut self, id: u64) -> bool {
        self.effects.remove(id)
    }

    pub fn expire_effects(&mut self, ids: &[u64]) -> usize {
        self.effects.remove_all(ids)
    }

    fn burst(&mut self, point: Point, color: &str) {
        let ids = self.effects.add_particle_burst(point, color);
        self.followups.push(Followup::ExpireParticles(ids));
    }

    // ----- panels and overlays -----

    pub fn set_panel_mode(&mut self, mode: PanelMode) {
        if self.panel_mode == mode {
            return;
        }
        self.panel_mode = mode;
        self.schedule_scroll();
    }

    pub fn toggle_settings_menu(&mut self) {
        self.settings_menu_open = !self.settings_menu_open;
        if self.settings_menu_open {
            self.controls_visible = true;
            self.followups.push(Followup::CancelControlsHide);
        } else if self.clock.state().playing && self.controls_visible {
            self.followups
                .push(Followup::ArmControlsHide(ControlsHide::Idle));
        }
    }

    pub fn open_keyboard_guide(&mut self) {
        self.keyboard_guide_open = true;
    }

    pub fn close_keyboard_guide(&mut self) {
        self.keyboard_guide_open = false;
    }

    pub fn toggle_high_contrast(&mut self) {
        self.high_contrast = !self.high_contrast;
    }

    pub fn hide_volume_indicator(&mut self) {
        self.volume_indicator_visible = false;
    }

    pub fn hover_progress(&mut self, fraction: f64) {
        if fraction.is_nan() {
            return;
        }
        self.hovered_time = Some(self.clock.state().duration * fraction.clamp(0.0, 1.0));
    }

    pub fn leave_progress(&mut self) {
        self.hovered_time = None;
    }

    pub fn next_tutorial_step(&mut self) {
        if self.tutorial.visible && self.tutorial.step + 1 < TUTORIAL_STEPS {
            self.tutorial.step += 1;
        }
    }

    pub fn previous_tutorial_step(&mut self) {
        self.tutorial.step = self.tutorial.step.saturating_sub(1);
    }

    pub fn complete_tutorial(&mut self) {
        if !self.tutorial.visible {
            return;
        }
        self.tutorial.visible = false;
        self.followups.push(Followup::PersistTutorialSeen);
    }

    // ----- keyboard -----

    /// Returns true when the key mapped to a shortcut.
    pub fn handle_key(&mut self, input: &KeyInput) -> bool {
        let Some(command) = KeyCommand::from_input(input) else {
            return false;
        };
        let step = self.config.seek_step_secs;
        match command {
            KeyCommand::TogglePlay => {
                self.toggle_play();
            }
            KeyCommand::SeekBackward => {
                self.seek_relative(-step);
            }
            KeyCommand::SeekForward => {
                self.seek_relative(step);
            }
            KeyCommand::ToggleMute => {
                self.toggle_mute();
            }
            KeyCommand::ToggleImmersive => self.toggle_immersive(),
            KeyCommand::ShowShortcutGuide => self.open_keyboard_guide(),
            KeyCommand::SeekDecile(decile) => {
                self.seek_fraction(f64::from(decile) / 10.0);
            }
            KeyCommand::Navigate(direction) => {
                self.navigate(direction);
            }
        }
        true
    }

    // ----- transcript sync -----

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn set_transcript_layout(&mut self, offsets: impl IntoIterator<Item = (u32, f64)>) {
        self.layout.replace(offsets);
        self.schedule_scroll();
    }

    /// Where the transcript list should scroll to right now, if anywhere.
    pub fn scroll_request(&self) -> Option<ScrollRequest> {
        if self.panel_mode != PanelMode::Transcript {
            return None;
        }
        let item_id = self.selection.transcript_id?;
        let offset = self.layout.offset_of(item_id)?;
        let narrow = self.viewport.is_narrow(self.config.narrow_breakpoint);
        Some(ScrollRequest::for_item(item_id, offset, narrow))
    }

    fn refresh_selection(&mut self) {
        let time = self.clock.state().current_time;
        self.selection = self
            .lesson()
            .map(|lesson| ActiveSelection::at(lesson, time))
            .unwrap_or_default();
    }

    fn schedule_scroll(&mut self) {
        if self.panel_mode == PanelMode::Transcript && self.selection.transcript_id.is_some() {
            self.followups.push(Followup::ArmTranscriptScroll);
        } else {
            self.followups.push(Followup::CancelTranscriptScroll);
        }
    }

    fn after_playing_change(&mut self) {
        if self.clock.state().playing {
            if self.controls_visible && !self.settings_menu_open {
                self.followups
                    .push(Followup::ArmControlsHide(ControlsHide::Idle));
            }
        } else {
            self.followups.push(Followup::CancelControlsHide);
        }
        self.schedule_scroll();
    }
}
