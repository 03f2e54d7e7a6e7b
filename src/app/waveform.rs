// SPDX-License-Identifier: GPL-3.0-only

//! Audio waveform indicator
//!
//! Purely decorative: a row of bars driven by the microphone level
//! history while listening, a thin static rule otherwise. Fresh
//! levels enter from the right.

use crate::app::state::{AppModel, Message};
use crate::constants::waveform;
use cosmic::Element;
use cosmic::iced::{Alignment, Background, Border, Color, Length};
use cosmic::widget;

impl AppModel {
    /// Build the waveform indicator for the speech pane
    pub fn build_waveform(&self) -> Element<'_, Message> {
        let spacing = cosmic::theme::spacing();

        let indicator: Element<'_, Message> = if self.speech.is_listening() {
            let mut bars = widget::row()
                .spacing(waveform::BAR_SPACING)
                .align_y(Alignment::Center);

            let pad = waveform::BAR_COUNT.saturating_sub(self.mic_levels.len());
            for slot in 0..waveform::BAR_COUNT {
                let level = slot
                    .checked_sub(pad)
                    .and_then(|i| self.mic_levels.get(i))
                    .copied()
                    .unwrap_or(0.0);

                let height = waveform::MIN_BAR_HEIGHT
                    + level * (waveform::MAX_BAR_HEIGHT - waveform::MIN_BAR_HEIGHT);

                bars = bars.push(
                    widget::container(widget::Space::new(
                        Length::Fixed(waveform::BAR_WIDTH),
                        Length::Fixed(height),
                    ))
                    .style(|theme: &cosmic::Theme| {
                        let accent = theme.cosmic().accent_color();
                        widget::container::Style {
                            background: Some(Background::Color(Color::from_rgba(
                                accent.red,
                                accent.green,
                                accent.blue,
                                accent.alpha,
                            ))),
                            border: Border {
                                radius: (waveform::BAR_WIDTH / 2.0).into(),
                                ..Default::default()
                            },
                            ..Default::default()
                        }
                    }),
                );
            }

            bars.into()
        } else {
            widget::container(widget::divider::horizontal::default())
                .width(Length::Fill)
                .padding([0, spacing.space_xl])
                .into()
        };

        widget::container(indicator)
            .width(Length::Fill)
            .height(Length::Fixed(waveform::INDICATOR_HEIGHT))
            .align_x(cosmic::iced::alignment::Horizontal::Center)
            .align_y(cosmic::iced::alignment::Vertical::Center)
            .into()
    }
}
