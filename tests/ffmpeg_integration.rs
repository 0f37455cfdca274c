// SPDX-License-Identifier: MPL-2.0
//! FFmpeg backend tests.
//!
//! The sample-based tests need local playlists at `tests/data/sample.m3u8`
//! and `tests/data/audio_only.m3u8` and are skipped when they are absent.

use m3u8_player::config::PlaybackSettings;
use m3u8_player::player::backend::FFMPEG_DOMAIN;
use m3u8_player::player::ffmpeg::FfmpegBackend;
use m3u8_player::player::{MediaBackend, PlaybackRequest, PlayerHandle, PlayerStatus};
use std::path::Path;
use std::time::{Duration, Instant};

const SAMPLE_PLAYLIST: &str = "tests/data/sample.m3u8";
const AUDIO_ONLY_PLAYLIST: &str = "tests/data/audio_only.m3u8";

fn open(url: &str) -> Box<dyn PlayerHandle> {
    let mut settings = PlaybackSettings::default();
    settings.muted = true;
    let backend = FfmpegBackend::new(&settings);
    let request = PlaybackRequest::parse(url).expect("valid URL");
    backend.open(&request)
}

fn wait_for(timeout: Duration, mut done: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if done() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(20));
    }
    done()
}

fn sample_url() -> Option<String> {
    local_url(SAMPLE_PLAYLIST)
}

fn local_url(playlist: &str) -> Option<String> {
    let path = Path::new(playlist);
    if !path.exists() {
        return None;
    }
    let absolute = path.canonicalize().ok()?;
    url::Url::from_file_path(absolute).ok().map(String::from)
}

#[test]
fn missing_file_reports_ffmpeg_failure() {
    let mut handle = open("file:///nonexistent/m3u8_player/missing.m3u8");

    assert!(wait_for(Duration::from_secs(10), || !handle
        .status()
        .is_unknown()));
    match handle.status() {
        PlayerStatus::Failed(info) => {
            assert_eq!(info.domain, FFMPEG_DOMAIN);
            assert_ne!(info.code, 0);
        }
        other => panic!("expected failure, got {other:?}"),
    }

    handle.teardown();
}

#[test]
fn sample_playlist_becomes_ready_and_plays() {
    let Some(url) = sample_url() else {
        return; // Skip if test playlist doesn't exist
    };

    let mut handle = open(&url);
    assert!(wait_for(Duration::from_secs(10), || !handle
        .status()
        .is_unknown()));
    let PlayerStatus::Ready(info) = handle.status() else {
        panic!("sample playlist should open");
    };
    assert!(info.width > 0 && info.height > 0);

    handle.play();
    assert!(wait_for(Duration::from_secs(5), || handle
        .latest_frame()
        .is_some()));

    handle.pause();
    assert!(!handle.is_playing());
    handle.teardown();
}

#[test]
fn audio_only_playlist_becomes_ready_without_picture() {
    let Some(url) = local_url(AUDIO_ONLY_PLAYLIST) else {
        return; // Skip if test playlist doesn't exist
    };

    let mut handle = open(&url);
    assert!(wait_for(Duration::from_secs(10), || !handle
        .status()
        .is_unknown()));
    let PlayerStatus::Ready(info) = handle.status() else {
        panic!("audio-only playlist should open");
    };
    assert_eq!((info.width, info.height), (0, 0));
    assert!(info.has_audio);

    handle.play();
    assert!(handle.is_playing());
    assert!(handle.latest_frame().is_none());
    handle.teardown();
}

#[test]
fn teardown_during_open_is_safe() {
    let Some(url) = sample_url() else {
        return;
    };

    let mut handle = open(&url);
    handle.teardown();
    handle.teardown();
    assert!(!handle.is_playing());
}
