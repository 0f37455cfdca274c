// SPDX-License-Identifier: MPL-2.0
//! Playback pipeline: URL validation, the media backend seam, the FFmpeg
//! implementation behind it, and the orchestrator that drives one playback
//! attempt at a time.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐  start/poll/timeout   ┌──────────────┐  open/play/pause  ┌──────────────┐
//! │  app::update │ ────────────────────▶ │ Orchestrator │ ────────────────▶ │ PlayerHandle │
//! └──────────────┘                       └──────────────┘                   └──────┬───────┘
//!                                                                                  │
//!                                                         ┌────────────────────────┴──────┐
//!                                                         │ ffmpeg worker thread + cpal   │
//!                                                         └───────────────────────────────┘
//! ```
//!
//! The orchestrator never blocks: it only reads the status the handle
//! publishes, so every transition happens on the UI thread.

pub mod audio_output;
pub mod backend;
pub mod error_hint;
pub mod ffmpeg;
pub mod orchestrator;
pub mod request;

pub use backend::{
    MediaBackend, PlayerErrorInfo, PlayerHandle, PlayerStatus, StreamInfo, VideoFrame,
};
pub use error_hint::{format_error, ErrorHint};
pub use orchestrator::{
    AlertMessage, AttemptId, LoadingMessage, Orchestrator, PollOutcome, UiState,
};
pub use request::PlaybackRequest;
