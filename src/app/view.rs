// SPDX-License-Identifier: MPL-2.0
//! View rendering for the application.
//!
//! Exactly one screen is shown: the playback view once the orchestrator has
//! revealed the player, the input view otherwise. A pending alert is layered
//! above whichever screen is current.

use super::{App, Message};
use crate::ui::{alert, input_view, playback_view};
use iced::widget::container;
use iced::{Element, Length};

pub(super) fn view(app: &App) -> Element<'_, Message> {
    let state = app.orchestrator.state();

    let screen: Element<'_, Message> = if state.player_visible {
        app.playback
            .view(playback_view::ViewContext {
                i18n: &app.i18n,
                is_playing: app.orchestrator.is_playing(),
            })
            .map(Message::Playback)
    } else {
        app.input
            .view(input_view::ViewContext {
                i18n: &app.i18n,
                is_loading: state.is_loading,
                loading_message: state.loading_message,
            })
            .map(Message::Input)
    };

    let content: Element<'_, Message> = container(screen)
        .width(Length::Fill)
        .height(Length::Fill)
        .into();

    match &state.alert {
        Some(message) => alert::overlay(content, message, &app.i18n, Message::Alert),
        None => content,
    }
}
