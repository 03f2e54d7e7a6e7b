// SPDX-License-Identifier: GPL-3.0-only

//! Main application view
//!
//! Composes the screen from the modular components: the mode switcher
//! row on top, then either the sign pane (camera panel + translation
//! box) or the speech pane (waveform + transcription box).

use crate::app::state::{AppModel, Message, SpeechState, TranslateMode};
use crate::constants::ui;
use crate::fl;
use cosmic::Element;
use cosmic::iced::{Alignment, Color, Length};
use cosmic::widget;

impl AppModel {
    /// Build the main application view
    pub fn view(&self) -> Element<'_, Message> {
        let spacing = cosmic::theme::spacing();

        let content: Element<'_, Message> = match self.mode {
            TranslateMode::Sign => self.build_sign_pane(),
            TranslateMode::Speech => self.build_speech_pane(),
        };

        widget::column()
            .push(self.build_mode_switcher())
            .push(widget::vertical_space().height(spacing.space_m))
            .push(content)
            .padding([spacing.space_s, spacing.space_l])
            .width(Length::Fill)
            .into()
    }

    /// Sign mode: camera preview stacked above the translated text
    fn build_sign_pane(&self) -> Element<'_, Message> {
        let spacing = cosmic::theme::spacing();

        widget::column()
            .push(self.build_camera_panel())
            .push(self.build_result_box(fl!("sign-result-placeholder")))
            .spacing(spacing.space_s)
            .width(Length::Fill)
            .into()
    }

    /// Speech mode: waveform, listening status, transcribed text
    fn build_speech_pane(&self) -> Element<'_, Message> {
        let spacing = cosmic::theme::spacing();

        let status: Element<'_, Message> = match &self.speech {
            SpeechState::Idle => widget::text(fl!("mic-idle")).into(),
            SpeechState::Requesting => widget::text(fl!("mic-requesting")).into(),
            SpeechState::Listening { .. } => widget::text(fl!("mic-listening")).into(),
            SpeechState::Denied { message } => {
                widget::container(widget::text(message.clone()))
                    .style(|_theme| widget::container::Style {
                        text_color: Some(Color::from_rgb(0.85, 0.35, 0.3)),
                        ..Default::default()
                    })
                    .into()
            }
        };

        widget::column()
            .push(self.build_waveform())
            .push(
                widget::container(status)
                    .width(Length::Fill)
                    .align_x(cosmic::iced::alignment::Horizontal::Center),
            )
            .push(self.build_result_box(fl!("speech-result-placeholder")))
            .spacing(spacing.space_s)
            .width(Length::Fill)
            .into()
    }

    /// The box holding the (placeholder) translation result
    fn build_result_box(&self, result: String) -> Element<'_, Message> {
        let spacing = cosmic::theme::spacing();

        widget::container(widget::text(result).size(18))
            .padding(spacing.space_m)
            .width(Length::Fill)
            .height(Length::Fixed(ui::RESULT_BOX_HEIGHT))
            .align_y(Alignment::Start)
            .class(cosmic::theme::Container::Card)
            .into()
    }
}
