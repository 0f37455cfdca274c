// SPDX-License-Identifier: MPL-2.0
//! FFmpeg-backed [`MediaBackend`].
//!
//! Each handle owns one worker thread that opens the stream, publishes its
//! status, and decodes while playing. FFmpeg contexts are not `Send`, so
//! they never leave that thread; the handle only shares plain state with it.

mod clock;
mod pipeline;

use super::backend::{
    MediaBackend, PlayerErrorInfo, PlayerHandle, PlayerStatus, VideoFrame, FFMPEG_DOMAIN,
};
use super::request::PlaybackRequest;
use crate::config::PlaybackSettings;
use bytes::Bytes;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Once, PoisonError};
use std::time::Duration;
use tokio::sync::mpsc;

static FFMPEG_INIT: Once = Once::new();

/// Initializes FFmpeg once and lowers its log level to errors.
pub fn init_ffmpeg() -> Result<(), ffmpeg_next::Error> {
    let mut init_result = Ok(());

    FFMPEG_INIT.call_once(|| {
        if let Err(e) = ffmpeg_next::init() {
            init_result = Err(e);
            return;
        }

        // SAFETY: av_log_set_level is thread-safe and only affects logging
        unsafe {
            ffmpeg_next::ffi::av_log_set_level(ffmpeg_next::ffi::AV_LOG_ERROR);
        }
    });

    init_result
}

/// Worker tuning taken from the playback settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineSettings {
    pub forward_buffer: Duration,
    pub volume: f32,
    pub muted: bool,
}

impl From<&PlaybackSettings> for PipelineSettings {
    fn from(settings: &PlaybackSettings) -> Self {
        Self {
            forward_buffer: settings.forward_buffer,
            volume: settings.volume,
            muted: settings.muted,
        }
    }
}

/// Production backend.
#[derive(Debug, Clone)]
pub struct FfmpegBackend {
    settings: PipelineSettings,
}

impl FfmpegBackend {
    pub fn new(settings: &PlaybackSettings) -> Self {
        Self {
            settings: PipelineSettings::from(settings),
        }
    }
}

impl MediaBackend for FfmpegBackend {
    fn open(&self, request: &PlaybackRequest) -> Box<dyn PlayerHandle> {
        Box::new(FfmpegHandle::spawn(request.as_str(), self.settings))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Play,
    Pause,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// State written by the worker and read by the UI thread.
struct Shared {
    status: Mutex<PlayerStatus>,
    frame: Mutex<Option<VideoFrame>>,
    next_sequence: AtomicU64,
    playing: AtomicBool,
    finished: AtomicBool,
    cancelled: AtomicBool,
}

impl Shared {
    fn new() -> Self {
        Self {
            status: Mutex::new(PlayerStatus::Unknown),
            frame: Mutex::new(None),
            next_sequence: AtomicU64::new(0),
            playing: AtomicBool::new(false),
            finished: AtomicBool::new(false),
            cancelled: AtomicBool::new(false),
        }
    }

    fn status(&self) -> PlayerStatus {
        lock(&self.status).clone()
    }

    fn set_status(&self, status: PlayerStatus) {
        *lock(&self.status) = status;
    }

    fn fail(&self, info: PlayerErrorInfo) {
        log::warn!("Playback failed: {}", info);
        self.playing.store(false, Ordering::Relaxed);
        self.set_status(PlayerStatus::Failed(info));
    }

    fn publish_frame(&self, rgba_data: Vec<u8>, width: u32, height: u32, pts_secs: f64) {
        let sequence = self.next_sequence.fetch_add(1, Ordering::Relaxed);
        *lock(&self.frame) = Some(VideoFrame {
            rgba_data: Bytes::from(rgba_data),
            width,
            height,
            pts_secs,
            sequence,
        });
    }

    fn latest_frame(&self) -> Option<VideoFrame> {
        lock(&self.frame).clone()
    }

    fn mark_finished(&self) {
        self.finished.store(true, Ordering::Relaxed);
        self.playing.store(false, Ordering::Relaxed);
    }

    fn is_finished(&self) -> bool {
        self.finished.load(Ordering::Relaxed)
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Maps an FFmpeg error to the framework-neutral error info.
fn error_info(err: ffmpeg_next::Error) -> PlayerErrorInfo {
    PlayerErrorInfo::new(FFMPEG_DOMAIN, i32::from(err), &err.to_string())
}

/// Handle to one FFmpeg playback session.
pub struct FfmpegHandle {
    shared: Arc<Shared>,
    commands: Option<mpsc::UnboundedSender<Command>>,
}

impl FfmpegHandle {
    fn spawn(url: &str, settings: PipelineSettings) -> Self {
        let shared = Arc::new(Shared::new());
        let (command_tx, command_rx) = mpsc::unbounded_channel();

        let worker_shared = Arc::clone(&shared);
        let worker_url = url.to_string();
        let spawned = std::thread::Builder::new()
            .name("ffmpeg-playback".to_string())
            .spawn(move || pipeline::run(&worker_url, settings, &worker_shared, command_rx));

        if let Err(e) = spawned {
            let code = e.raw_os_error().map_or(-1, |errno| -errno);
            shared.fail(PlayerErrorInfo::new(
                FFMPEG_DOMAIN,
                code,
                &format!("Failed to start playback thread: {e}"),
            ));
        }

        log::debug!("Opened player handle for {}", url);

        Self {
            shared,
            commands: Some(command_tx),
        }
    }

    fn send(&self, command: Command) {
        if let Some(commands) = &self.commands {
            // A closed channel means the worker already exited.
            let _ = commands.send(command);
        }
    }
}

impl PlayerHandle for FfmpegHandle {
    fn status(&self) -> PlayerStatus {
        self.shared.status()
    }

    fn play(&self) {
        if self.shared.is_finished() {
            return;
        }
        self.shared.playing.store(true, Ordering::Relaxed);
        self.send(Command::Play);
    }

    fn pause(&self) {
        self.shared.playing.store(false, Ordering::Relaxed);
        self.send(Command::Pause);
    }

    fn is_playing(&self) -> bool {
        self.shared.playing.load(Ordering::Relaxed)
    }

    fn latest_frame(&self) -> Option<VideoFrame> {
        self.shared.latest_frame()
    }

    fn is_finished(&self) -> bool {
        self.shared.is_finished()
    }

    fn teardown(&mut self) {
        if self.commands.take().is_none() {
            return;
        }
        // The interrupt callback aborts a pending open or read; the worker
        // thread is detached and exits on its own.
        self.shared.cancelled.store(true, Ordering::Relaxed);
        self.shared.playing.store(false, Ordering::Relaxed);
        log::debug!("Player handle torn down");
    }
}

impl Drop for FfmpegHandle {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_starts_unknown_and_idle() {
        let shared = Shared::new();
        assert_eq!(shared.status(), PlayerStatus::Unknown);
        assert!(shared.latest_frame().is_none());
        assert!(!shared.is_finished());
        assert!(!shared.is_cancelled());
    }

    #[test]
    fn fail_stops_playing() {
        let shared = Shared::new();
        shared.playing.store(true, Ordering::Relaxed);
        shared.fail(PlayerErrorInfo::new(FFMPEG_DOMAIN, -5, "I/O error"));
        assert!(!shared.playing.load(Ordering::Relaxed));
        assert!(matches!(shared.status(), PlayerStatus::Failed(info) if info.code == -5));
    }

    #[test]
    fn published_frames_get_increasing_sequence() {
        let shared = Shared::new();
        shared.publish_frame(vec![0; 4], 1, 1, 0.0);
        let first = shared.latest_frame().expect("frame");
        shared.publish_frame(vec![255; 4], 1, 1, 0.04);
        let second = shared.latest_frame().expect("frame");
        assert!(second.sequence > first.sequence);
        assert_eq!(second.rgba_data.as_ref(), &[255, 255, 255, 255]);
    }

    #[test]
    fn latest_frame_shares_pixel_buffer() {
        let shared = Shared::new();
        shared.publish_frame(vec![7; 16], 2, 2, 0.0);
        let a = shared.latest_frame().expect("frame");
        let b = shared.latest_frame().expect("frame");
        assert_eq!(a.rgba_data.as_ptr(), b.rgba_data.as_ptr());
    }

    #[test]
    fn error_info_carries_raw_code() {
        let info = error_info(ffmpeg_next::Error::InvalidData);
        assert_eq!(info.domain, "FFmpeg");
        assert_eq!(info.code, crate::player::error_hint::AVERROR_INVALIDDATA);
        assert!(!info.description.is_empty());
    }
}
