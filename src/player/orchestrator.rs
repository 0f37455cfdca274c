// SPDX-License-Identifier: MPL-2.0
//! Player orchestrator: one playback attempt at a time.
//!
//! ```text
//! idle ──start──▶ loading ──poll: ready──▶ playing ──close──▶ idle
//!                   │
//!                   ├──poll: failed──▶ idle + alert
//!                   └──timeout───────▶ idle + alert
//! ```
//!
//! Every deferred callback (timeout, autoplay, startup retry) carries the
//! [`AttemptId`] it was scheduled for. A callback whose attempt is no longer
//! current is ignored, so a superseded attempt can never touch the UI.

use super::backend::{
    MediaBackend, PlayerErrorInfo, PlayerHandle, PlayerStatus, StreamInfo, VideoFrame,
};
use super::error_hint::format_error;
use super::request::PlaybackRequest;
use crate::error::PlaybackError;
use crate::i18n::fluent::I18n;
use std::fmt;
use std::sync::Arc;

/// Identifies one playback attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttemptId(u64);

impl fmt::Display for AttemptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Content of the modal alert.
#[derive(Debug, Clone, PartialEq)]
pub enum AlertMessage {
    /// The attempt was rejected, failed to load, or timed out.
    AttemptFailed(PlaybackError),
    /// The stream broke after the playback view was shown.
    PlaybackFailed(PlayerErrorInfo),
}

impl AlertMessage {
    /// Renders the alert body in the current locale.
    #[must_use]
    pub fn localized(&self, i18n: &I18n) -> String {
        match self {
            AlertMessage::AttemptFailed(PlaybackError::LoadFailed(info)) => {
                if info.code == 0 && info.description.trim().is_empty() {
                    i18n.tr("error-load-failed-no-details")
                } else {
                    format!("{}\n{}", i18n.tr("error-load-failed"), format_error(i18n, info))
                }
            }
            AlertMessage::AttemptFailed(error) => i18n.tr(error.i18n_key()),
            AlertMessage::PlaybackFailed(info) => {
                format!("{}\n{}", i18n.tr("error-playback-failed"), format_error(i18n, info))
            }
        }
    }
}

/// Loading label shown in the play button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadingMessage {
    Started,
    Parsing,
}

impl LoadingMessage {
    #[must_use]
    pub fn i18n_key(self) -> &'static str {
        match self {
            LoadingMessage::Started => "loading-started",
            LoadingMessage::Parsing => "loading-parsing",
        }
    }
}

/// The flags the views render from. Mutated only by the orchestrator.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UiState {
    pub is_loading: bool,
    /// `None` while idle.
    pub loading_message: Option<LoadingMessage>,
    pub player_visible: bool,
    pub alert: Option<AlertMessage>,
}

/// Result of one status poll.
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    /// No attempt is loading; nothing changed.
    Stale,
    /// Status is still unknown.
    Pending,
    /// The playback view was revealed.
    Ready(StreamInfo),
    /// The attempt failed and the alert was raised.
    Failed,
}

pub struct Orchestrator {
    backend: Arc<dyn MediaBackend>,
    handle: Option<Box<dyn PlayerHandle>>,
    attempt: Option<AttemptId>,
    next_attempt: u64,
    /// Whether the revealed stream has a picture to wait for.
    has_video: bool,
    state: UiState,
}

impl fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Orchestrator")
            .field("attempt", &self.attempt)
            .field("has_handle", &self.handle.is_some())
            .field("state", &self.state)
            .finish()
    }
}

impl Orchestrator {
    pub fn new(backend: Arc<dyn MediaBackend>) -> Self {
        Self {
            backend,
            handle: None,
            attempt: None,
            next_attempt: 0,
            has_video: false,
            state: UiState::default(),
        }
    }

    #[must_use]
    pub fn state(&self) -> &UiState {
        &self.state
    }

    #[must_use]
    pub fn current_attempt(&self) -> Option<AttemptId> {
        self.attempt
    }

    #[must_use]
    pub fn has_handle(&self) -> bool {
        self.handle.is_some()
    }

    /// Starts a playback attempt, discarding any previous handle.
    ///
    /// # Errors
    ///
    /// Returns the validation error (also raised as the alert) when the
    /// input is empty or not a URL. No handle is created in that case.
    pub fn start(&mut self, input: &str) -> Result<AttemptId, PlaybackError> {
        let request = match PlaybackRequest::parse(input) {
            Ok(request) => request,
            Err(error) => {
                log::info!("Rejected playback input: {}", error);
                self.fail(AlertMessage::AttemptFailed(error.clone()));
                return Err(error);
            }
        };

        self.release_handle();

        self.next_attempt += 1;
        let attempt = AttemptId(self.next_attempt);
        log::info!("Starting playback attempt {} for {}", attempt, request.as_str());

        self.handle = Some(self.backend.open(&request));
        self.attempt = Some(attempt);
        self.state.is_loading = true;
        self.state.loading_message = Some(LoadingMessage::Started);
        self.state.player_visible = false;
        Ok(attempt)
    }

    /// Reads the current handle's status while an attempt is loading.
    pub fn poll(&mut self) -> PollOutcome {
        if !self.state.is_loading {
            return PollOutcome::Stale;
        }
        let Some(handle) = self.handle.as_ref() else {
            return PollOutcome::Stale;
        };

        match handle.status() {
            PlayerStatus::Unknown => {
                log::debug!("Attempt {:?} still loading", self.attempt);
                self.state.loading_message = Some(LoadingMessage::Parsing);
                PollOutcome::Pending
            }
            PlayerStatus::Ready(info) => {
                log::info!("Attempt {:?} ready, showing player", self.attempt);
                self.state.is_loading = false;
                self.state.loading_message = None;
                self.state.player_visible = true;
                self.has_video = info.width > 0 && info.height > 0;
                PollOutcome::Ready(info)
            }
            PlayerStatus::Failed(info) => {
                log::warn!("Attempt {:?} failed: {}", self.attempt, info);
                self.fail(AlertMessage::AttemptFailed(PlaybackError::LoadFailed(info)));
                PollOutcome::Failed
            }
        }
    }

    /// Cancels `attempt` if it is still loading. Returns true when it did.
    pub fn on_timeout(&mut self, attempt: AttemptId) -> bool {
        if self.attempt != Some(attempt) || !self.state.is_loading {
            return false;
        }
        log::warn!("Attempt {} timed out", attempt);
        self.fail(AlertMessage::AttemptFailed(PlaybackError::Timeout));
        true
    }

    /// Issues the deferred first `play()` for a revealed attempt.
    pub fn autoplay(&mut self, attempt: AttemptId) -> bool {
        if !self.is_showing(attempt) {
            return false;
        }
        if let Some(handle) = &self.handle {
            log::debug!("Autoplay for attempt {}", attempt);
            handle.play();
        }
        true
    }

    /// Re-issues `play()` once when no frame was presented after startup.
    ///
    /// Audio-only streams never present a frame and are left alone.
    pub fn retry_if_stalled(&mut self, attempt: AttemptId) -> bool {
        if !self.is_showing(attempt) || !self.has_video {
            return false;
        }
        let Some(handle) = &self.handle else {
            return false;
        };
        if handle.latest_frame().is_some() || handle.is_finished() {
            return false;
        }
        log::info!("No frame presented for attempt {}, retrying play", attempt);
        handle.play();
        true
    }

    /// Closes the playback view if its stream broke. Returns true when it did.
    pub fn check_playback(&mut self) -> bool {
        if !self.state.player_visible {
            return false;
        }
        let Some(handle) = &self.handle else {
            return false;
        };
        match handle.status() {
            PlayerStatus::Failed(info) => {
                log::warn!("Playback of attempt {:?} failed: {}", self.attempt, info);
                self.fail(AlertMessage::PlaybackFailed(info));
                true
            }
            PlayerStatus::Unknown | PlayerStatus::Ready(_) => false,
        }
    }

    /// Toggles play/pause and returns the new playing state.
    pub fn toggle_playback(&mut self) -> Option<bool> {
        let handle = self.handle.as_ref()?;
        if !self.state.player_visible {
            return None;
        }
        if handle.is_playing() {
            handle.pause();
        } else {
            handle.play();
        }
        Some(handle.is_playing())
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.handle.as_ref().is_some_and(|handle| handle.is_playing())
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_some_and(|handle| handle.is_finished())
    }

    #[must_use]
    pub fn latest_frame(&self) -> Option<VideoFrame> {
        self.handle.as_ref().and_then(|handle| handle.latest_frame())
    }

    /// Dismisses the playback view and releases the handle.
    pub fn close(&mut self) {
        log::info!("Closing player for attempt {:?}", self.attempt);
        self.reset();
    }

    pub fn dismiss_alert(&mut self) {
        self.state.alert = None;
    }

    fn is_showing(&self, attempt: AttemptId) -> bool {
        self.attempt == Some(attempt) && self.state.player_visible
    }

    fn fail(&mut self, alert: AlertMessage) {
        self.reset();
        self.state.alert = Some(alert);
    }

    fn reset(&mut self) {
        self.release_handle();
        self.attempt = None;
        self.has_video = false;
        self.state.is_loading = false;
        self.state.loading_message = None;
        self.state.player_visible = false;
    }

    fn release_handle(&mut self) {
        if let Some(mut handle) = self.handle.take() {
            handle.pause();
            handle.teardown();
        }
    }
}

impl Drop for Orchestrator {
    fn drop(&mut self) {
        self.release_handle();
    }
}
