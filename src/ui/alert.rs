// SPDX-License-Identifier: MPL-2.0
//! Modal alert drawn above the current screen.
//!
//! The dialog blocks interaction with the screen underneath until the user
//! acknowledges it with the OK button.

use crate::i18n::fluent::I18n;
use crate::player::AlertMessage;
use crate::ui::design_tokens::{sizing, spacing, typography};
use crate::ui::styles;
use iced::widget::{button, column, container, opaque, row, text, Space, Stack};
use iced::{Element, Length};

/// Messages emitted by the alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    Dismiss,
}

/// Layers `alert` on top of `base`.
pub fn overlay<'a, M: 'a>(
    base: Element<'a, M>,
    alert: &AlertMessage,
    i18n: &I18n,
    on_message: impl Fn(Message) -> M + 'a,
) -> Element<'a, M> {
    let dialog = view(alert, i18n).map(on_message);
    Stack::new()
        .width(Length::Fill)
        .height(Length::Fill)
        .push(base)
        .push(dialog)
        .into()
}

/// Renders the alert card over a dimmed backdrop.
pub fn view<'a>(alert: &AlertMessage, i18n: &I18n) -> Element<'a, Message> {
    let title = text(i18n.tr("alert-title")).size(typography::TITLE_SM);
    let body = text(alert.localized(i18n)).size(typography::BODY);

    let ok = button(text(i18n.tr("alert-ok")).size(typography::BODY))
        .padding([spacing::XS, spacing::LG])
        .style(styles::button::secondary)
        .on_press(Message::Dismiss);

    let card = container(
        column![
            title,
            body,
            row![Space::new().width(Length::Fill), ok].width(Length::Fill),
        ]
        .spacing(spacing::MD),
    )
    .padding(spacing::LG)
    .max_width(sizing::ALERT_MAX_WIDTH)
    .style(styles::container::alert_card);

    let backdrop = container(card)
        .center(Length::Fill)
        .style(styles::container::backdrop);

    // Swallow clicks so the screen underneath stays inert.
    opaque(backdrop)
}
