// SPDX-License-Identifier: MPL-2.0
//! The seam between the orchestrator and the media framework.
//!
//! A [`MediaBackend`] turns a [`PlaybackRequest`] into a [`PlayerHandle`].
//! Opening never fails synchronously: the handle starts in
//! [`PlayerStatus::Unknown`] and later publishes `Ready` or `Failed`.

use super::request::PlaybackRequest;
use bytes::Bytes;
use std::fmt;

/// Error domain reported by the FFmpeg backend.
pub const FFMPEG_DOMAIN: &str = "FFmpeg";

/// Raw error details as reported by the media framework.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerErrorInfo {
    pub domain: String,
    pub code: i32,
    pub description: String,
}

impl PlayerErrorInfo {
    pub fn new(domain: &str, code: i32, description: &str) -> Self {
        Self {
            domain: domain.to_string(),
            code,
            description: description.to_string(),
        }
    }
}

impl fmt::Display for PlayerErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.domain, self.code, self.description)
    }
}

/// Properties of an opened stream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StreamInfo {
    pub width: u32,
    pub height: u32,
    pub has_audio: bool,
    /// `None` for live playlists.
    pub duration_secs: Option<f64>,
}

/// Status published by a player handle.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerStatus {
    /// Still opening the stream.
    Unknown,
    /// Stream opened and decoders are ready.
    Ready(StreamInfo),
    /// Opening failed, or a ready stream broke during playback.
    Failed(PlayerErrorInfo),
}

impl PlayerStatus {
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        matches!(self, PlayerStatus::Unknown)
    }
}

/// A decoded video frame in RGBA format.
#[derive(Debug, Clone)]
pub struct VideoFrame {
    /// RGBA pixel data; clones share the buffer.
    pub rgba_data: Bytes,
    pub width: u32,
    pub height: u32,
    pub pts_secs: f64,
    /// Monotonic per handle; lets the UI skip frames it already uploaded.
    pub sequence: u64,
}

/// A live playback session.
///
/// All methods are non-blocking. Implementations publish state from their own
/// worker and the UI thread only reads it.
pub trait PlayerHandle: Send {
    fn status(&self) -> PlayerStatus;

    fn play(&self);

    fn pause(&self);

    fn is_playing(&self) -> bool;

    /// Most recent frame, if any has been presented.
    fn latest_frame(&self) -> Option<VideoFrame>;

    /// True once the stream reached its end.
    fn is_finished(&self) -> bool;

    /// Stops playback and releases framework resources. Idempotent.
    fn teardown(&mut self);
}

/// Creates player handles for validated requests.
pub trait MediaBackend: Send + Sync {
    fn open(&self, request: &PlaybackRequest) -> Box<dyn PlayerHandle>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_info_display_includes_all_fields() {
        let info = PlayerErrorInfo::new(FFMPEG_DOMAIN, -5, "I/O error");
        assert_eq!(info.to_string(), "FFmpeg -5: I/O error");
    }

    #[test]
    fn status_unknown_helper() {
        assert!(PlayerStatus::Unknown.is_unknown());
        let failed = PlayerStatus::Failed(PlayerErrorInfo::new(FFMPEG_DOMAIN, -1, ""));
        assert!(!failed.is_unknown());
    }
}
