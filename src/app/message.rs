// SPDX-License-Identifier: MPL-2.0
//! Top-level messages and runtime flags for the application.

use crate::player::AttemptId;
use crate::ui::{alert, input_view, playback_view};
use std::time::Instant;

/// Top-level messages consumed by `App::update`. The variants forward
/// lower-level component messages while keeping a single update entrypoint.
#[derive(Debug, Clone)]
pub enum Message {
    Input(input_view::Message),
    Playback(playback_view::Message),
    Alert(alert::Message),
    /// Result of reading the system clipboard for the paste button.
    ClipboardRead(Option<String>),
    /// Status poll while an attempt is loading.
    PollTick(Instant),
    /// The load timeout of an attempt elapsed.
    LoadTimedOut(AttemptId),
    /// The deferred first `play()` of an attempt is due.
    Autoplay(AttemptId),
    /// Time to check that the attempt presented a frame.
    StartupCheck(AttemptId),
    /// Frame refresh and overlay timer while the player is visible.
    FrameTick(Instant),
    /// Loading spinner animation step.
    SpinnerTick(Instant),
    KeyPressed(Shortcut),
    WindowCloseRequested(iced::window::Id),
}

/// Keys the application reacts to outside of focused widgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    Space,
    Escape,
    Enter,
}

/// Runtime flags passed in from the launcher.
#[derive(Debug, Default)]
pub struct Flags {
    /// Optional locale override provided on the command line.
    pub lang: Option<String>,
    /// Optional stream address used to pre-fill the input.
    pub url: Option<String>,
    /// Optional config directory override.
    pub config_dir: Option<String>,
}
