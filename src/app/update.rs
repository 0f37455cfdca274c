// SPDX-License-Identifier: MPL-2.0
//! Update logic and message handlers for the application.
//!
//! Deferred work (load timeout, autoplay, startup retry) is scheduled as
//! tasks that resolve to the [`AttemptId`] they were created for; the
//! orchestrator discards any that no longer match the current attempt.

use super::{App, Message, Shortcut};
use crate::clipboard;
use crate::player::{AttemptId, PollOutcome};
use crate::ui::{alert, input_view, playback_view};
use iced::Task;
use std::time::{Duration, Instant};

pub(super) fn update(app: &mut App, message: Message) -> Task<Message> {
    match message {
        Message::Input(input_message) => handle_input_message(app, input_message),
        Message::Playback(playback_message) => {
            handle_playback_message(app, playback_message, Instant::now())
        }
        Message::Alert(alert::Message::Dismiss) => {
            app.orchestrator.dismiss_alert();
            Task::none()
        }
        Message::ClipboardRead(Some(text)) => {
            app.input.set_text(&text);
            Task::none()
        }
        Message::ClipboardRead(None) => Task::none(),
        Message::PollTick(_) => handle_poll(app),
        Message::LoadTimedOut(attempt) => {
            if app.orchestrator.on_timeout(attempt) {
                app.timeout_handle = None;
            }
            Task::none()
        }
        Message::Autoplay(attempt) => {
            if app.orchestrator.autoplay(attempt) {
                after(app.settings.startup_retry, attempt, Message::StartupCheck)
            } else {
                Task::none()
            }
        }
        Message::StartupCheck(attempt) => {
            app.orchestrator.retry_if_stalled(attempt);
            Task::none()
        }
        Message::FrameTick(now) => {
            handle_frame_tick(app, now);
            Task::none()
        }
        Message::SpinnerTick(_) => {
            if app.orchestrator.state().is_loading {
                app.input.tick_spinner();
            }
            Task::none()
        }
        Message::KeyPressed(shortcut) => handle_shortcut(app, shortcut),
        Message::WindowCloseRequested(window_id) => {
            log::info!("Window {:?} close requested, releasing player", window_id);
            cancel_timeout(app);
            app.orchestrator.close();
            app.playback.dismiss();
            iced::exit()
        }
    }
}

fn handle_input_message(app: &mut App, message: input_view::Message) -> Task<Message> {
    let is_loading = app.orchestrator.state().is_loading;
    match app.input.update(message, is_loading) {
        input_view::Event::None => Task::none(),
        input_view::Event::PasteRequested => {
            Task::perform(async { clipboard::read_text() }, Message::ClipboardRead)
        }
        input_view::Event::PlayRequested(text) => start_attempt(app, &text),
    }
}

fn start_attempt(app: &mut App, text: &str) -> Task<Message> {
    cancel_timeout(app);
    app.playback.dismiss();
    app.end_logged = false;

    match app.orchestrator.start(text) {
        Ok(attempt) => {
            let (task, handle) =
                after(app.settings.load_timeout, attempt, Message::LoadTimedOut).abortable();
            app.timeout_handle = Some(handle);
            task
        }
        Err(_) => Task::none(),
    }
}

fn handle_poll(app: &mut App) -> Task<Message> {
    match app.orchestrator.poll() {
        PollOutcome::Stale | PollOutcome::Pending => Task::none(),
        PollOutcome::Ready(info) => {
            cancel_timeout(app);
            log::info!(
                "Stream ready: {}x{}, audio: {}",
                info.width,
                info.height,
                info.has_audio
            );
            app.playback.reveal(Instant::now());
            match app.orchestrator.current_attempt() {
                Some(attempt) => after(app.settings.autoplay_delay, attempt, Message::Autoplay),
                None => Task::none(),
            }
        }
        PollOutcome::Failed => {
            cancel_timeout(app);
            Task::none()
        }
    }
}

fn handle_frame_tick(app: &mut App, now: Instant) {
    if app.orchestrator.check_playback() {
        app.playback.dismiss();
        return;
    }
    if !app.orchestrator.state().player_visible {
        return;
    }

    if let Some(frame) = app.orchestrator.latest_frame() {
        app.playback.present(frame);
    }
    app.playback.tick(now);

    if !app.end_logged && app.orchestrator.is_finished() {
        log::info!("Playback reached the end of the stream");
        app.end_logged = true;
    }
}

fn handle_playback_message(
    app: &mut App,
    message: playback_view::Message,
    now: Instant,
) -> Task<Message> {
    match app.playback.update(message, now) {
        playback_view::Event::None => {}
        playback_view::Event::TogglePlayback => {
            if let Some(playing) = app.orchestrator.toggle_playback() {
                log::debug!("Playback toggled, playing: {}", playing);
            }
        }
        playback_view::Event::Close => close_player(app),
    }
    Task::none()
}

fn handle_shortcut(app: &mut App, shortcut: Shortcut) -> Task<Message> {
    let state = app.orchestrator.state();
    if state.alert.is_some() {
        if matches!(shortcut, Shortcut::Escape | Shortcut::Enter) {
            app.orchestrator.dismiss_alert();
        }
        return Task::none();
    }
    if !state.player_visible {
        return Task::none();
    }

    let message = match shortcut {
        Shortcut::Space => playback_view::Message::TogglePlayback,
        Shortcut::Escape => playback_view::Message::Close,
        Shortcut::Enter => return Task::none(),
    };
    handle_playback_message(app, message, Instant::now())
}

fn close_player(app: &mut App) {
    app.orchestrator.close();
    app.playback.dismiss();
}

fn cancel_timeout(app: &mut App) {
    if let Some(handle) = app.timeout_handle.take() {
        handle.abort();
    }
}

/// Resolves to `on_due(attempt)` once `delay` has passed.
fn after(
    delay: Duration,
    attempt: AttemptId,
    on_due: fn(AttemptId) -> Message,
) -> Task<Message> {
    Task::perform(
        async move {
            tokio::time::sleep(delay).await;
            attempt
        },
        on_due,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlaybackSettings;
    use crate::i18n::fluent::I18n;
    use crate::player::{
        AlertMessage, MediaBackend, PlaybackRequest, PlayerErrorInfo, PlayerHandle,
        PlayerStatus, StreamInfo, VideoFrame,
    };
    use crate::ui::theming::ThemeMode;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Recorder {
        status: Mutex<Option<PlayerStatus>>,
        playing: AtomicBool,
        torn_down: AtomicBool,
    }

    struct ScriptedHandle(Arc<Recorder>);

    impl PlayerHandle for ScriptedHandle {
        fn status(&self) -> PlayerStatus {
            self.0
                .status
                .lock()
                .unwrap()
                .clone()
                .unwrap_or(PlayerStatus::Unknown)
        }
        fn play(&self) {
            self.0.playing.store(true, Ordering::SeqCst);
        }
        fn pause(&self) {
            self.0.playing.store(false, Ordering::SeqCst);
        }
        fn is_playing(&self) -> bool {
            self.0.playing.load(Ordering::SeqCst)
        }
        fn latest_frame(&self) -> Option<VideoFrame> {
            None
        }
        fn is_finished(&self) -> bool {
            false
        }
        fn teardown(&mut self) {
            self.0.torn_down.store(true, Ordering::SeqCst);
        }
    }

    struct ScriptedBackend(Arc<Recorder>);

    impl MediaBackend for ScriptedBackend {
        fn open(&self, _request: &PlaybackRequest) -> Box<dyn PlayerHandle> {
            Box::new(ScriptedHandle(Arc::clone(&self.0)))
        }
    }

    fn app_with_recorder() -> (App, Arc<Recorder>) {
        let recorder = Arc::new(Recorder::default());
        let app = App::with_backend(
            I18n::default(),
            ThemeMode::Dark,
            PlaybackSettings::default(),
            Arc::new(ScriptedBackend(Arc::clone(&recorder))),
        );
        (app, recorder)
    }

    fn set_status(recorder: &Recorder, status: PlayerStatus) {
        *recorder.status.lock().unwrap() = Some(status);
    }

    fn ready() -> PlayerStatus {
        PlayerStatus::Ready(StreamInfo {
            width: 1280,
            height: 720,
            has_audio: true,
            duration_secs: None,
        })
    }

    fn press_play(app: &mut App, url: &str) {
        app.input.set_text(url);
        let _ = app.update(Message::Input(input_view::Message::PlayPressed));
    }

    #[test]
    fn play_starts_loading_and_arms_timeout() {
        let (mut app, _recorder) = app_with_recorder();
        press_play(&mut app, "https://example.com/live.m3u8");
        assert!(app.orchestrator.state().is_loading);
        assert!(app.timeout_handle.is_some());
    }

    #[test]
    fn ready_poll_reveals_player_and_clears_timeout() {
        let (mut app, recorder) = app_with_recorder();
        press_play(&mut app, "https://example.com/live.m3u8");
        set_status(&recorder, ready());
        let _ = app.update(Message::PollTick(Instant::now()));

        let state = app.orchestrator.state();
        assert!(state.player_visible);
        assert!(!state.is_loading);
        assert!(app.timeout_handle.is_none());
        assert!(app.playback.overlay_visible());
    }

    #[test]
    fn later_polls_do_not_reveal_again() {
        let (mut app, recorder) = app_with_recorder();
        press_play(&mut app, "https://example.com/live.m3u8");
        set_status(&recorder, ready());
        let _ = app.update(Message::PollTick(Instant::now()));
        let _ = app.update(Message::Playback(playback_view::Message::SurfaceTapped));
        assert!(!app.playback.overlay_visible());

        let _ = app.update(Message::PollTick(Instant::now()));
        assert_eq!(app.orchestrator.poll(), PollOutcome::Stale);
        assert!(app.orchestrator.state().player_visible);
        assert!(!app.playback.overlay_visible());
    }

    #[test]
    fn stale_timeout_is_ignored() {
        let (mut app, _recorder) = app_with_recorder();
        press_play(&mut app, "https://example.com/first.m3u8");
        let first = app.orchestrator.current_attempt().unwrap();
        app.orchestrator.close();
        press_play(&mut app, "https://example.com/second.m3u8");

        let _ = app.update(Message::LoadTimedOut(first));
        assert!(app.orchestrator.state().is_loading);
        assert!(app.orchestrator.state().alert.is_none());
    }

    #[test]
    fn timeout_raises_alert() {
        let (mut app, recorder) = app_with_recorder();
        press_play(&mut app, "https://example.com/live.m3u8");
        let attempt = app.orchestrator.current_attempt().unwrap();
        let _ = app.update(Message::LoadTimedOut(attempt));

        assert!(!app.orchestrator.state().is_loading);
        assert!(matches!(
            app.orchestrator.state().alert,
            Some(AlertMessage::AttemptFailed(crate::error::PlaybackError::Timeout))
        ));
        assert!(recorder.torn_down.load(Ordering::SeqCst));
    }

    #[test]
    fn autoplay_then_space_pauses() {
        let (mut app, recorder) = app_with_recorder();
        press_play(&mut app, "https://example.com/live.m3u8");
        set_status(&recorder, ready());
        let _ = app.update(Message::PollTick(Instant::now()));
        let attempt = app.orchestrator.current_attempt().unwrap();
        let _ = app.update(Message::Autoplay(attempt));
        assert!(recorder.playing.load(Ordering::SeqCst));

        let _ = app.update(Message::KeyPressed(Shortcut::Space));
        assert!(!recorder.playing.load(Ordering::SeqCst));
    }

    #[test]
    fn escape_closes_player() {
        let (mut app, recorder) = app_with_recorder();
        press_play(&mut app, "https://example.com/live.m3u8");
        set_status(&recorder, ready());
        let _ = app.update(Message::PollTick(Instant::now()));
        let _ = app.update(Message::KeyPressed(Shortcut::Escape));

        assert!(!app.orchestrator.state().player_visible);
        assert!(!app.orchestrator.has_handle());
        assert!(recorder.torn_down.load(Ordering::SeqCst));
    }

    #[test]
    fn mid_playback_failure_closes_view_with_alert() {
        let (mut app, recorder) = app_with_recorder();
        press_play(&mut app, "https://example.com/live.m3u8");
        set_status(&recorder, ready());
        let _ = app.update(Message::PollTick(Instant::now()));

        set_status(
            &recorder,
            PlayerStatus::Failed(PlayerErrorInfo::new("FFmpeg", -5, "I/O error")),
        );
        let _ = app.update(Message::FrameTick(Instant::now()));

        let state = app.orchestrator.state();
        assert!(!state.player_visible);
        assert!(matches!(state.alert, Some(AlertMessage::PlaybackFailed(_))));
    }

    #[test]
    fn enter_dismisses_alert() {
        let (mut app, _recorder) = app_with_recorder();
        press_play(&mut app, "not a url");
        assert!(app.orchestrator.state().alert.is_some());
        let _ = app.update(Message::KeyPressed(Shortcut::Enter));
        assert!(app.orchestrator.state().alert.is_none());
    }

    #[test]
    fn clipboard_text_replaces_input() {
        let (mut app, _recorder) = app_with_recorder();
        let _ = app.update(Message::ClipboardRead(Some(
            "https://example.com/pasted.m3u8".to_string(),
        )));
        assert!(app.input_text().starts_with("https://example.com/pasted.m3u8"));
    }

    #[test]
    fn empty_clipboard_keeps_input() {
        let (mut app, _recorder) = app_with_recorder();
        app.input.set_text("kept");
        let _ = app.update(Message::ClipboardRead(None));
        assert!(app.input_text().starts_with("kept"));
    }
}
