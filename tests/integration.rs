// SPDX-License-Identifier: MPL-2.0
//! End-to-end attempt lifecycle through the public API, driven by a scripted
//! media backend.

use m3u8_player::config::{self, Config, PlaybackSettings};
use m3u8_player::error::PlaybackError;
use m3u8_player::i18n::fluent::I18n;
use m3u8_player::player::{
    format_error, AlertMessage, LoadingMessage, MediaBackend, Orchestrator, PlaybackRequest,
    PlayerErrorInfo, PlayerHandle, PlayerStatus, PollOutcome, StreamInfo, VideoFrame,
};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::tempdir;

/// Status script shared by every handle the backend opens.
#[derive(Default)]
struct Script {
    status: Mutex<Vec<PlayerStatus>>,
    opened: AtomicUsize,
    torn_down: AtomicUsize,
    playing: AtomicBool,
}

impl Script {
    /// Queues statuses returned by successive `status()` calls; the last one sticks.
    fn push(&self, status: PlayerStatus) {
        self.status.lock().unwrap().push(status);
    }
}

struct ScriptedHandle {
    script: Arc<Script>,
    released: bool,
}

impl PlayerHandle for ScriptedHandle {
    fn status(&self) -> PlayerStatus {
        let mut queue = self.script.status.lock().unwrap();
        match queue.len() {
            0 => PlayerStatus::Unknown,
            1 => queue[0].clone(),
            _ => queue.remove(0),
        }
    }

    fn play(&self) {
        self.script.playing.store(true, Ordering::SeqCst);
    }

    fn pause(&self) {
        self.script.playing.store(false, Ordering::SeqCst);
    }

    fn is_playing(&self) -> bool {
        self.script.playing.load(Ordering::SeqCst)
    }

    fn latest_frame(&self) -> Option<VideoFrame> {
        None
    }

    fn is_finished(&self) -> bool {
        false
    }

    fn teardown(&mut self) {
        if !self.released {
            self.released = true;
            self.script.torn_down.fetch_add(1, Ordering::SeqCst);
        }
    }
}

struct ScriptedBackend(Arc<Script>);

impl MediaBackend for ScriptedBackend {
    fn open(&self, _request: &PlaybackRequest) -> Box<dyn PlayerHandle> {
        self.0.opened.fetch_add(1, Ordering::SeqCst);
        Box::new(ScriptedHandle {
            script: Arc::clone(&self.0),
            released: false,
        })
    }
}

fn orchestrator() -> (Orchestrator, Arc<Script>) {
    let script = Arc::new(Script::default());
    let backend = ScriptedBackend(Arc::clone(&script));
    (Orchestrator::new(Arc::new(backend)), script)
}

fn stream_info() -> StreamInfo {
    StreamInfo {
        width: 1920,
        height: 1080,
        has_audio: true,
        duration_secs: Some(60.0),
    }
}

#[test]
fn attempt_goes_from_loading_to_playing() {
    let (mut orchestrator, script) = orchestrator();
    script.push(PlayerStatus::Unknown);
    script.push(PlayerStatus::Ready(stream_info()));

    let attempt = orchestrator
        .start("  https://example.com/live/index.m3u8  ")
        .expect("valid URL");
    assert_eq!(
        orchestrator.state().loading_message,
        Some(LoadingMessage::Started)
    );

    assert_eq!(orchestrator.poll(), PollOutcome::Pending);
    assert_eq!(
        orchestrator.state().loading_message,
        Some(LoadingMessage::Parsing)
    );

    assert_eq!(orchestrator.poll(), PollOutcome::Ready(stream_info()));
    let state = orchestrator.state();
    assert!(state.player_visible);
    assert!(!state.is_loading);
    assert!(state.loading_message.is_none());

    assert!(orchestrator.autoplay(attempt));
    assert!(orchestrator.is_playing());

    orchestrator.close();
    assert!(!orchestrator.state().player_visible);
    assert_eq!(script.torn_down.load(Ordering::SeqCst), 1);
}

#[test]
fn invalid_input_never_opens_a_handle() {
    let (mut orchestrator, script) = orchestrator();

    let err = orchestrator.start("   ").unwrap_err();
    assert_eq!(err, PlaybackError::EmptyUrl);
    assert!(matches!(orchestrator.start("no scheme here"), Err(PlaybackError::InvalidUrl(_))));

    assert_eq!(script.opened.load(Ordering::SeqCst), 0);
    assert!(!orchestrator.state().is_loading);
    assert!(orchestrator.state().alert.is_some());
}

#[test]
fn load_failure_shows_formatted_alert() {
    let (mut orchestrator, script) = orchestrator();
    let info = PlayerErrorInfo::new("FFmpeg", -875_574_520, "Server returned 404 Not Found");
    script.push(PlayerStatus::Failed(info.clone()));

    orchestrator.start("https://example.com/missing.m3u8").unwrap();
    assert_eq!(orchestrator.poll(), PollOutcome::Failed);
    assert_eq!(script.torn_down.load(Ordering::SeqCst), 1);

    let i18n = I18n::new(Some("en-US".to_string()), &Config::default());
    let alert = orchestrator.state().alert.clone().expect("alert raised");
    assert_eq!(
        alert,
        AlertMessage::AttemptFailed(PlaybackError::LoadFailed(info.clone()))
    );
    let body = alert.localized(&i18n);
    assert!(body.contains(&format_error(&i18n, &info)));
    assert!(body.contains("FFmpeg"));
    assert!(body.contains("-875574520"));
}

#[test]
fn restart_discards_previous_handle() {
    let (mut orchestrator, script) = orchestrator();

    let first = orchestrator.start("https://example.com/a.m3u8").unwrap();
    let second = orchestrator.start("https://example.com/b.m3u8").unwrap();
    assert_ne!(first, second);
    assert_eq!(script.opened.load(Ordering::SeqCst), 2);
    assert_eq!(script.torn_down.load(Ordering::SeqCst), 1);

    assert!(!orchestrator.on_timeout(first));
    assert!(orchestrator.on_timeout(second));
    assert_eq!(
        orchestrator.state().alert,
        Some(AlertMessage::AttemptFailed(PlaybackError::Timeout))
    );
}

#[test]
fn settings_round_trip_through_config_file() {
    let dir = tempdir().expect("Failed to create temporary directory");
    let path = dir.path().join("settings.toml");

    let mut config = Config::default();
    config.general.language = Some("zh-CN".to_string());
    config.playback.load_timeout_secs = Some(30);
    config.overlay.timeout_secs = Some(5);
    config::save_to_path(&config, &path).expect("Failed to write config file");

    let loaded = config::load_from_path(&path).expect("Failed to load config file");
    let settings = PlaybackSettings::from_config(&loaded);
    assert_eq!(settings.load_timeout.as_secs(), 30);
    assert_eq!(settings.overlay_timeout.as_secs(), 5);

    let i18n = I18n::new(None, &loaded);
    assert_eq!(i18n.current_locale().to_string(), "zh-CN");
}
