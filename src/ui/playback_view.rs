// SPDX-License-Identifier: MPL-2.0
//! Playback screen: the video surface with a tap-to-toggle controls overlay.
//!
//! The overlay holds a close ("Done") button and a play/pause toggle. It is
//! shown when the view appears and hides itself once `overlay_timeout` has
//! passed since it last became visible or was interacted with.

use crate::i18n::fluent::I18n;
use crate::player::VideoFrame;
use crate::ui::design_tokens::{opacity, palette, spacing, typography};
use crate::ui::styles;
use crate::ui::widgets::VideoCanvas;
use iced::widget::{button, column, container, mouse_area, row, text, Space, Stack};
use iced::{Element, Length};
use std::time::{Duration, Instant};

/// Contextual data needed to render the playback screen.
pub struct ViewContext<'a> {
    pub i18n: &'a I18n,
    pub is_playing: bool,
}

/// Messages emitted by the playback screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    SurfaceTapped,
    TogglePlayback,
    Close,
}

/// Events propagated to the parent application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    None,
    TogglePlayback,
    Close,
}

pub struct State {
    canvas: VideoCanvas<Message>,
    overlay_timeout: Duration,
    /// When the overlay was last shown or used; `None` while hidden.
    overlay_shown_at: Option<Instant>,
}

impl State {
    #[must_use]
    pub fn new(overlay_timeout: Duration) -> Self {
        Self {
            canvas: VideoCanvas::new(),
            overlay_timeout,
            overlay_shown_at: None,
        }
    }

    /// Prepares the view for a freshly revealed stream.
    pub fn reveal(&mut self, now: Instant) {
        self.canvas.clear();
        self.overlay_shown_at = Some(now);
    }

    /// Drops the last frame once the view is dismissed.
    pub fn dismiss(&mut self) {
        self.canvas.clear();
        self.overlay_shown_at = None;
    }

    #[must_use]
    pub fn overlay_visible(&self) -> bool {
        self.overlay_shown_at.is_some()
    }

    #[must_use]
    pub fn has_frame(&self) -> bool {
        self.canvas.has_frame()
    }

    /// Uploads `frame` if it is new. Returns true when the image changed.
    pub fn present(&mut self, frame: VideoFrame) -> bool {
        self.canvas.present(frame)
    }

    /// Hides the overlay once its timeout elapsed.
    pub fn tick(&mut self, now: Instant) {
        if let Some(shown_at) = self.overlay_shown_at {
            if now.saturating_duration_since(shown_at) >= self.overlay_timeout {
                self.overlay_shown_at = None;
            }
        }
    }

    pub fn update(&mut self, message: Message, now: Instant) -> Event {
        match message {
            Message::SurfaceTapped => {
                self.overlay_shown_at = match self.overlay_shown_at {
                    Some(_) => None,
                    None => Some(now),
                };
                Event::None
            }
            Message::TogglePlayback => {
                self.overlay_shown_at = Some(now);
                Event::TogglePlayback
            }
            Message::Close => Event::Close,
        }
    }

    pub fn view<'a>(&'a self, ctx: ViewContext<'a>) -> Element<'a, Message> {
        let surface = container(self.canvas.view())
            .width(Length::Fill)
            .height(Length::Fill)
            .style(styles::container::video_surface);

        let mut layers = Stack::new()
            .width(Length::Fill)
            .height(Length::Fill)
            .push(surface);

        if self.overlay_visible() {
            layers = layers.push(controls(ctx));
        }

        mouse_area(layers).on_press(Message::SurfaceTapped).into()
    }
}

fn controls(ctx: ViewContext<'_>) -> Element<'_, Message> {
    let overlay_button = styles::button::overlay(
        palette::WHITE,
        opacity::OVERLAY_MEDIUM,
        opacity::OVERLAY_HOVER,
    );

    let done = button(text(ctx.i18n.tr("playback-done")).size(typography::BODY))
        .padding([spacing::XS, spacing::MD])
        .style(overlay_button)
        .on_press(Message::Close);

    let toggle_key = if ctx.is_playing {
        "playback-pause"
    } else {
        "playback-play"
    };
    let toggle = button(text(ctx.i18n.tr(toggle_key)).size(typography::BODY_LG))
        .padding([spacing::SM, spacing::XL])
        .style(styles::button::overlay(
            palette::WHITE,
            opacity::OVERLAY_MEDIUM,
            opacity::OVERLAY_HOVER,
        ))
        .on_press(Message::TogglePlayback);

    let top_bar = row![Space::new().width(Length::Fill), done].width(Length::Fill);
    let bottom_bar = container(toggle)
        .padding(spacing::XS)
        .style(styles::overlay::controls_container);

    column![
        top_bar,
        Space::new().height(Length::Fill),
        container(bottom_bar).center_x(Length::Fill),
    ]
    .padding(spacing::MD)
    .width(Length::Fill)
    .height(Length::Fill)
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMEOUT: Duration = Duration::from_secs(3);

    #[test]
    fn overlay_hidden_until_reveal() {
        let state = State::new(TIMEOUT);
        assert!(!state.overlay_visible());
    }

    #[test]
    fn overlay_auto_hides_after_timeout() {
        let mut state = State::new(TIMEOUT);
        let start = Instant::now();
        state.reveal(start);
        state.tick(start + Duration::from_secs(2));
        assert!(state.overlay_visible());
        state.tick(start + TIMEOUT);
        assert!(!state.overlay_visible());
    }

    #[test]
    fn tap_toggles_overlay() {
        let mut state = State::new(TIMEOUT);
        let start = Instant::now();
        state.reveal(start);
        assert_eq!(state.update(Message::SurfaceTapped, start), Event::None);
        assert!(!state.overlay_visible());
        state.update(Message::SurfaceTapped, start);
        assert!(state.overlay_visible());
    }

    #[test]
    fn reshown_overlay_hides_again() {
        let mut state = State::new(TIMEOUT);
        let start = Instant::now();
        state.reveal(start);
        state.tick(start + TIMEOUT);
        let later = start + Duration::from_secs(10);
        state.update(Message::SurfaceTapped, later);
        state.tick(later + Duration::from_secs(1));
        assert!(state.overlay_visible());
        state.tick(later + TIMEOUT);
        assert!(!state.overlay_visible());
    }

    #[test]
    fn toggle_keeps_overlay_and_rearms_timer() {
        let mut state = State::new(TIMEOUT);
        let start = Instant::now();
        state.reveal(start);
        let later = start + Duration::from_secs(2);
        assert_eq!(
            state.update(Message::TogglePlayback, later),
            Event::TogglePlayback
        );
        state.tick(start + TIMEOUT);
        assert!(state.overlay_visible());
    }

    #[test]
    fn close_emits_event() {
        let mut state = State::new(TIMEOUT);
        assert_eq!(state.update(Message::Close, Instant::now()), Event::Close);
    }

    #[test]
    fn dismiss_clears_frame_and_overlay() {
        let mut state = State::new(TIMEOUT);
        state.reveal(Instant::now());
        state.present(VideoFrame {
            rgba_data: bytes::Bytes::from(vec![0; 4]),
            width: 1,
            height: 1,
            pts_secs: 0.0,
            sequence: 0,
        });
        assert!(state.has_frame());
        state.dismiss();
        assert!(!state.has_frame());
        assert!(!state.overlay_visible());
    }
}
