// SPDX-License-Identifier: GPL-3.0-only

//! Mode switcher widget (Sign to Speech / Speech to Text toggle)

use crate::app::state::{AppModel, Message, TranslateMode};
use crate::fl;
use cosmic::Element;
use cosmic::iced::Length;
use cosmic::widget;

impl AppModel {
    /// Build the mode switcher row
    ///
    /// Two mutually exclusive tabs; the active one is highlighted with
    /// a suggested button style. The SetMode handler ignores presses
    /// on the already-active tab.
    pub fn build_mode_switcher(&self) -> Element<'_, Message> {
        let spacing = cosmic::theme::spacing();

        let sign_button = widget::button::text(fl!("mode-sign"))
            .on_press(Message::SetMode(TranslateMode::Sign))
            .class(if self.mode == TranslateMode::Sign {
                cosmic::theme::Button::Suggested
            } else {
                cosmic::theme::Button::Text
            });

        let speech_button = widget::button::text(fl!("mode-speech"))
            .on_press(Message::SetMode(TranslateMode::Speech))
            .class(if self.mode == TranslateMode::Speech {
                cosmic::theme::Button::Suggested
            } else {
                cosmic::theme::Button::Text
            });

        let row = widget::row()
            .push(sign_button)
            .push(widget::horizontal_space().width(spacing.space_xs))
            .push(speech_button)
            .spacing(spacing.space_xxs);

        widget::container(row)
            .width(Length::Fill)
            .align_x(cosmic::iced::alignment::Horizontal::Center)
            .into()
    }
}
