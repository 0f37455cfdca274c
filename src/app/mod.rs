// SPDX-License-Identifier: MPL-2.0
//! Application root: wires the input and playback screens to the player
//! orchestrator.
//!
//! The `App` struct owns the orchestrator and the per-screen component state.
//! Component events and timer ticks are translated into orchestrator calls in
//! [`update`]; everything the views render comes back out of the
//! orchestrator's `UiState`.

mod message;
pub mod paths;
mod subscription;
mod update;
mod view;

pub use message::{Flags, Message, Shortcut};

use crate::config::{self, PlaybackSettings};
use crate::i18n::fluent::I18n;
use crate::player::ffmpeg::FfmpegBackend;
use crate::player::{MediaBackend, Orchestrator};
use crate::ui::theming::ThemeMode;
use crate::ui::{input_view, playback_view};
use iced::{task, window, Element, Subscription, Task, Theme};
use std::fmt;
use std::sync::Arc;

/// Root Iced application state.
pub struct App {
    pub i18n: I18n,
    theme_mode: ThemeMode,
    settings: PlaybackSettings,
    orchestrator: Orchestrator,
    input: input_view::State,
    playback: playback_view::State,
    /// Pending load timeout of the current attempt.
    timeout_handle: Option<task::Handle>,
    /// Whether the end of the current stream was already reported.
    end_logged: bool,
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("orchestrator", &self.orchestrator)
            .field("player_has_frame", &self.playback.has_frame())
            .finish()
    }
}

pub const WINDOW_DEFAULT_WIDTH: u32 = 800;
pub const WINDOW_DEFAULT_HEIGHT: u32 = 500;
pub const MIN_WINDOW_WIDTH: u32 = 480;
pub const MIN_WINDOW_HEIGHT: u32 = 360;

/// Builds the window settings.
///
/// Close requests are handled by the application so the live player is
/// torn down before the process exits.
pub fn window_settings() -> window::Settings {
    window::Settings {
        size: iced::Size::new(WINDOW_DEFAULT_WIDTH as f32, WINDOW_DEFAULT_HEIGHT as f32),
        min_size: Some(iced::Size::new(
            MIN_WINDOW_WIDTH as f32,
            MIN_WINDOW_HEIGHT as f32,
        )),
        exit_on_close_request: false,
        ..window::Settings::default()
    }
}

/// Entry point used by `main.rs` to launch the Iced application loop.
pub fn run(mut flags: Flags) -> iced::Result {
    use std::cell::RefCell;

    paths::init_cli_overrides(flags.config_dir.take());

    // iced 0.14 requires an `Fn` boot closure; the flags are consumed once.
    let boot_state = RefCell::new(Some(flags));
    let boot = move || {
        let flags = boot_state.borrow_mut().take().unwrap_or_default();
        App::new(flags)
    };

    iced::application(boot, App::update, App::view)
        .title(App::title)
        .theme(App::theme)
        .window(window_settings())
        .subscription(App::subscription)
        .run()
}

impl App {
    /// Loads preferences and builds the production FFmpeg backend.
    fn new(flags: Flags) -> (Self, Task<Message>) {
        let (config, config_warning) = config::load();
        let i18n = I18n::new(flags.lang, &config);

        if let Some(key) = config_warning {
            log::warn!("{}", i18n.tr(&key));
        }

        let settings = PlaybackSettings::from_config(&config);
        let backend: Arc<dyn MediaBackend> = Arc::new(FfmpegBackend::new(&settings));
        let mut app = Self::with_backend(i18n, config.general.theme_mode, settings, backend);
        if let Some(url) = flags.url.as_deref() {
            app.input.set_text(url);
        }

        (app, Task::none())
    }

    /// Assembles the application around an arbitrary media backend.
    pub fn with_backend(
        i18n: I18n,
        theme_mode: ThemeMode,
        settings: PlaybackSettings,
        backend: Arc<dyn MediaBackend>,
    ) -> Self {
        Self {
            i18n,
            theme_mode,
            settings,
            orchestrator: Orchestrator::new(backend),
            input: input_view::State::default(),
            playback: playback_view::State::new(settings.overlay_timeout),
            timeout_handle: None,
            end_logged: false,
        }
    }

    #[must_use]
    pub fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }

    #[must_use]
    pub fn input_text(&self) -> String {
        self.input.text()
    }

    fn title(&self) -> String {
        self.i18n.tr("window-title")
    }

    fn theme(&self) -> Theme {
        self.theme_mode.iced_theme()
    }

    fn subscription(&self) -> Subscription<Message> {
        let state = self.orchestrator.state();
        Subscription::batch([
            subscription::create_event_subscription(),
            subscription::create_loading_subscription(
                state.is_loading,
                self.settings.poll_interval,
            ),
            subscription::create_playback_subscription(state.player_visible),
        ])
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        update::update(self, message)
    }

    pub fn view(&self) -> Element<'_, Message> {
        view::view(self)
    }
}
