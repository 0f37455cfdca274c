// SPDX-License-Identifier: MPL-2.0
//! Input screen: the stream address editor, paste and play buttons.
//!
//! The component owns only the editor content and spinner angle. Loading
//! state comes from the orchestrator through [`ViewContext`].

use crate::i18n::fluent::I18n;
use crate::player::request::has_content;
use crate::player::LoadingMessage;
use crate::ui::design_tokens::{palette, sizing, spacing, typography};
use crate::ui::styles;
use crate::ui::widgets::animated_spinner::{self, AnimatedSpinner};
use iced::widget::{button, center, column, container, row, text, text_editor};
use iced::{Alignment, Element, Length};

/// Contextual data needed to render the input screen.
pub struct ViewContext<'a> {
    pub i18n: &'a I18n,
    pub is_loading: bool,
    pub loading_message: Option<LoadingMessage>,
}

/// Messages emitted by the input screen.
#[derive(Debug, Clone)]
pub enum Message {
    Edit(text_editor::Action),
    PastePressed,
    PlayPressed,
}

/// Events propagated to the parent application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    None,
    /// Read the clipboard and hand the text back via [`State::set_text`].
    PasteRequested,
    /// Start playback of the given raw input.
    PlayRequested(String),
}

#[derive(Debug, Default)]
pub struct State {
    content: text_editor::Content,
    spinner_rotation: f32,
}

impl State {
    /// Creates the editor, optionally pre-filled.
    #[must_use]
    pub fn new(initial: Option<&str>) -> Self {
        Self {
            content: initial.map_or_else(text_editor::Content::new, text_editor::Content::with_text),
            spinner_rotation: 0.0,
        }
    }

    #[must_use]
    pub fn text(&self) -> String {
        self.content.text()
    }

    /// Replaces the editor text, e.g. with clipboard contents.
    pub fn set_text(&mut self, value: &str) {
        self.content = text_editor::Content::with_text(value);
    }

    /// Advances the loading spinner by one animation step.
    pub fn tick_spinner(&mut self) {
        self.spinner_rotation = animated_spinner::advance(self.spinner_rotation);
    }

    /// The play button is enabled only for non-blank input while idle.
    #[must_use]
    pub fn can_play(&self, is_loading: bool) -> bool {
        !is_loading && has_content(&self.content.text())
    }

    pub fn update(&mut self, message: Message, is_loading: bool) -> Event {
        match message {
            Message::Edit(action) => {
                self.content.perform(action);
                Event::None
            }
            Message::PastePressed => Event::PasteRequested,
            Message::PlayPressed if self.can_play(is_loading) => {
                Event::PlayRequested(self.content.text())
            }
            Message::PlayPressed => Event::None,
        }
    }

    pub fn view<'a>(&'a self, ctx: ViewContext<'a>) -> Element<'a, Message> {
        let i18n = ctx.i18n;

        let title = text(i18n.tr("input-title")).size(typography::TITLE_MD);

        let editor = text_editor(&self.content)
            .placeholder(i18n.tr("input-placeholder"))
            .on_action(Message::Edit)
            .height(Length::Fixed(sizing::URL_EDITOR_HEIGHT))
            .size(typography::BODY);

        let paste_button = button(text(i18n.tr("paste-button")).size(typography::BODY))
            .padding([spacing::XS, spacing::MD])
            .style(styles::button::secondary)
            .on_press(Message::PastePressed);

        let play_label: Element<'a, Message> = match ctx.loading_message {
            Some(message) if ctx.is_loading => row![
                AnimatedSpinner::new(palette::WHITE, self.spinner_rotation, sizing::ICON_MD)
                    .into_element(),
                text(i18n.tr(message.i18n_key())).size(typography::BODY_LG),
            ]
            .spacing(spacing::XS)
            .align_y(Alignment::Center)
            .into(),
            _ => text(i18n.tr("play-button")).size(typography::BODY_LG).into(),
        };

        let play_button = button(
            container(play_label)
                .center_x(Length::Fill)
                .center_y(Length::Fill),
        )
        .width(Length::Fill)
        .height(Length::Fixed(sizing::PLAY_BUTTON_HEIGHT))
        .style(styles::button::primary)
        .on_press_maybe(
            self.can_play(ctx.is_loading)
                .then_some(Message::PlayPressed),
        );

        let form = column![
            title,
            editor,
            row![paste_button].width(Length::Fill),
            play_button,
        ]
        .spacing(spacing::MD)
        .max_width(sizing::FORM_MAX_WIDTH);

        center(container(form).padding(spacing::LG)).into()
    }
}
