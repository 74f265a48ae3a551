//! Platform requests whose outcome is only known from a later notification:
//! immersive (fullscreen) display and detached (picture-in-picture) playback.

use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{bail, Result};
use serde::Deserialize;
use tokio::sync::mpsc::UnboundedSender;

pub trait DisplayEnvironment: Send + Sync {
    /// Authoritative immersive state, used to reconcile after a failed request.
    fn is_immersive(&self) -> bool;

    /// Starts entering or leaving immersive mode. Success is reported later
    /// through [`EnvironmentNotice::ImmersiveChanged`].
    fn request_immersive(&self, enter: bool) -> Result<()>;

    fn supports_detached_playback(&self) -> bool {
        false
    }

    fn is_detached(&self) -> bool {
        false
    }

    fn request_detached(&self, _enter: bool) -> Result<()> {
        bail!("detached playback is not supported")
    }
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EnvironmentNotice {
    ImmersiveChanged { active: bool },
    ImmersiveFailed,
    DetachedChanged { active: bool },
}

/// Environment without a real display. Requests flip local flags and the
/// confirmation is sent back through `notices`, the same way a windowing
/// shell would deliver it.
pub struct HeadlessEnvironment {
    immersive: AtomicBool,
    detached: AtomicBool,
    notices: Option<UnboundedSender<EnvironmentNotice>>,
}

impl HeadlessEnvironment {
    pub fn new(notices: Option<UnboundedSender<EnvironmentNotice>>) -> Self {
        Self {
            immersive: AtomicBool::new(false),
            detached: AtomicBool::new(false),
            notices,
        }
    }

    fn notify(&self, notice: EnvironmentNotice) {
        if let Some(tx) = &self.notices {
            let _ = tx.send(notice);
        }
    }
}

impl DisplayEnvironment for HeadlessEnvironment {
    fn is_immersive(&self) -> bool {
        self.immersive.load(Ordering::SeqCst)
    }

    fn request_immersive(&self, enter: bool) -> Result<()> {
        self.immersive.store(enter, Ordering::SeqCst);
        self.notify(EnvironmentNotice::ImmersiveChanged { active: enter });
        Ok(())
    }

    fn supports_detached_playback(&self) -> bool {
        true
    }

    fn is_detached(&self) -> bool {
        self.detached.load(Ordering::SeqCst)
    }

    fn request_detached(&self, enter: bool) -> Result<()> {
        self.detached.store(enter, Ordering::SeqCst);
        self.notify(EnvironmentNotice::DetachedChanged { active: enter });
        Ok(())
    }
}
