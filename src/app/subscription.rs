// SPDX-License-Identifier: MPL-2.0
//! Event and timer subscriptions for the application.

use super::{Message, Shortcut};
use iced::keyboard::{self, key::Named, Key};
use iced::{event, time, Subscription};
use std::time::Duration;

/// Spinner animation cadence while loading.
const SPINNER_TICK: Duration = Duration::from_millis(100);

/// Frame refresh cadence while the player is visible (~60 fps).
const FRAME_TICK: Duration = Duration::from_millis(16);

/// Routes keyboard shortcuts and window close requests.
///
/// Key presses already captured by a widget (typing in the URL editor) are
/// not treated as shortcuts.
pub fn create_event_subscription() -> Subscription<Message> {
    event::listen_with(|event, status, window_id| {
        if let event::Event::Window(iced::window::Event::CloseRequested) = &event {
            return Some(Message::WindowCloseRequested(window_id));
        }

        if status == event::Status::Captured {
            return None;
        }

        match event {
            event::Event::Keyboard(keyboard::Event::KeyPressed {
                key: Key::Named(named),
                ..
            }) => shortcut_for(named).map(Message::KeyPressed),
            _ => None,
        }
    })
}

fn shortcut_for(key: Named) -> Option<Shortcut> {
    match key {
        Named::Space => Some(Shortcut::Space),
        Named::Escape => Some(Shortcut::Escape),
        Named::Enter => Some(Shortcut::Enter),
        _ => None,
    }
}

/// Status polling and spinner animation, active only while loading.
pub fn create_loading_subscription(
    is_loading: bool,
    poll_interval: Duration,
) -> Subscription<Message> {
    if !is_loading {
        return Subscription::none();
    }

    Subscription::batch([
        time::every(poll_interval).map(Message::PollTick),
        time::every(SPINNER_TICK).map(Message::SpinnerTick),
    ])
}

/// Frame presentation and overlay timer, active only while the player is shown.
pub fn create_playback_subscription(player_visible: bool) -> Subscription<Message> {
    if player_visible {
        time::every(FRAME_TICK).map(Message::FrameTick)
    } else {
        Subscription::none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_playback_keys_are_shortcuts() {
        assert_eq!(shortcut_for(Named::Space), Some(Shortcut::Space));
        assert_eq!(shortcut_for(Named::Escape), Some(Shortcut::Escape));
        assert_eq!(shortcut_for(Named::Enter), Some(Shortcut::Enter));
        assert_eq!(shortcut_for(Named::Tab), None);
    }
}
