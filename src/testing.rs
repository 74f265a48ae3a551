//! Test doubles for the media element, display environment and event sink.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex,
};

use anyhow::{bail, Result};

use crate::{
    environment::DisplayEnvironment,
    playback::MediaElement,
    session::{EventSink, PlayerEvent},
};

#[derive(Debug, Clone, PartialEq)]
pub enum MediaCall {
    Play,
    Pause,
    SetCurrentTime(f64),
    SetVolume(f64),
    SetMuted(bool),
    Load(String),
}

#[derive(Default)]
struct FakeMediaInner {
    calls: Vec<MediaCall>,
    fail_next_play: bool,
}

/// Records every call; clones share the same log.
#[derive(Clone, Default)]
pub struct FakeMedia {
    inner: Arc<Mutex<FakeMediaInner>>,
}

impl FakeMedia {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<MediaCall> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub fn last_seek(&self) -> Option<f64> {
        self.calls().into_iter().rev().find_map(|call| match call {
            MediaCall::SetCurrentTime(secs) => Some(secs),
            _ => None,
        })
    }

    pub fn fail_next_play(&self) {
        self.inner.lock().unwrap().fail_next_play = true;
    }

    fn record(&self, call: MediaCall) {
        self.inner.lock().unwrap().calls.push(call);
    }
}

impl MediaElement for FakeMedia {
    fn play(&mut self) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        if std::mem::take(&mut inner.fail_next_play) {
            bail!("playback was rejected");
        }
        inner.calls.push(MediaCall::Play);
        Ok(())
    }

    fn pause(&mut self) {
        self.record(MediaCall::Pause);
    }

    fn set_current_time(&mut self, secs: f64) {
        self.record(MediaCall::SetCurrentTime(secs));
    }

    fn set_volume(&mut self, volume: f64) {
        self.record(MediaCall::SetVolume(volume));
    }

    fn set_muted(&mut self, muted: bool) {
        self.record(MediaCall::SetMuted(muted));
    }

    fn load(&mut self, source: &str) {
        self.record(MediaCall::Load(source.to_string()));
    }
}

/// Environment whose requests can be made to fail; it never confirms on its own.
#[derive(Default)]
pub struct FakeEnvironment {
    pub immersive: AtomicBool,
    pub reject_requests: AtomicBool,
    pub requests: Mutex<Vec<bool>>,
}

impl FakeEnvironment {
    pub fn rejecting() -> Self {
        let env = Self::default();
        env.reject_requests.store(true, Ordering::SeqCst);
        env
    }
}

impl DisplayEnvironment for FakeEnvironment {
    fn is_immersive(&self) -> bool {
        self.immersive.load(Ordering::SeqCst)
    }

    fn request_immersive(&self, enter: bool) -> Result<()> {
        self.requests.lock().unwrap().push(enter);
        if self.reject_requests.load(Ordering::SeqCst) {
            bail!("fullscreen request denied");
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<PlayerEvent>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<PlayerEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn count(&self, name: &str) -> usize {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|event| event.name() == name)
            .count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: PlayerEvent) {
        self.events.lock().unwrap().push(event);
    }
}
