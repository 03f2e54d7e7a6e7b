// SPDX-License-Identifier: GPL-3.0-only

//! Settings drawer view

use crate::app::state::{AppModel, ContextPage, Message};
use crate::config::AppTheme;
use crate::constants::{app_info, capture};
use crate::fl;
use cosmic::Element;
use cosmic::app::context_drawer;
use cosmic::widget;

impl AppModel {
    /// Create the settings view for the context drawer
    ///
    /// Bridge camera marker, capture format, microphone, and theme.
    pub fn settings_view(&self) -> context_drawer::ContextDrawer<'_, Message> {
        let spacing = cosmic::theme::spacing();

        let marker_input = widget::text_input("", &self.config.bridge_marker)
            .on_input(Message::SetBridgeMarker);

        let resolution_index = capture::RESOLUTIONS.iter().position(|&(w, h)| {
            w == self.config.capture_format.width && h == self.config.capture_format.height
        });
        let resolution_dropdown = widget::dropdown(
            &self.resolution_dropdown_options,
            resolution_index,
            Message::SelectResolution,
        );

        let framerate_index = self
            .config
            .capture_format
            .framerate
            .and_then(|fps| capture::FRAMERATES.iter().position(|&f| f == fps));
        let framerate_dropdown = widget::dropdown(
            &self.framerate_dropdown_options,
            framerate_index,
            Message::SelectFramerate,
        );

        let audio_dropdown = widget::dropdown(
            &self.audio_dropdown_options,
            Some(self.current_audio_device_index),
            Message::SelectAudioDevice,
        );

        let theme_index = match self.config.app_theme {
            AppTheme::System => 0,
            AppTheme::Dark => 1,
            AppTheme::Light => 2,
        };
        let theme_dropdown = widget::dropdown(
            &self.theme_dropdown_options,
            Some(theme_index),
            Message::SetAppTheme,
        );

        let version_info = format!("Version {}", app_info::version());

        let settings_column: Element<'_, Message> = widget::column()
            .push(
                widget::text(fl!("settings-camera"))
                    .size(16)
                    .font(cosmic::font::bold()),
            )
            .push(widget::vertical_space().height(spacing.space_xxs))
            .push(widget::text(fl!("settings-bridge-marker")))
            .push(widget::vertical_space().height(spacing.space_xxs))
            .push(marker_input)
            .push(widget::vertical_space().height(spacing.space_s))
            .push(widget::text(fl!("settings-resolution")))
            .push(widget::vertical_space().height(spacing.space_xxs))
            .push(resolution_dropdown)
            .push(widget::vertical_space().height(spacing.space_s))
            .push(widget::text(fl!("settings-framerate")))
            .push(widget::vertical_space().height(spacing.space_xxs))
            .push(framerate_dropdown)
            .push(widget::vertical_space().height(spacing.space_l))
            .push(widget::divider::horizontal::default())
            .push(widget::vertical_space().height(spacing.space_s))
            .push(
                widget::text(fl!("settings-microphone"))
                    .size(16)
                    .font(cosmic::font::bold()),
            )
            .push(widget::vertical_space().height(spacing.space_xxs))
            .push(audio_dropdown)
            .push(widget::vertical_space().height(spacing.space_l))
            .push(widget::divider::horizontal::default())
            .push(widget::vertical_space().height(spacing.space_s))
            .push(
                widget::text(fl!("settings-appearance"))
                    .size(16)
                    .font(cosmic::font::bold()),
            )
            .push(widget::vertical_space().height(spacing.space_xxs))
            .push(widget::text(fl!("settings-theme")))
            .push(widget::vertical_space().height(spacing.space_xxs))
            .push(theme_dropdown)
            .push(widget::vertical_space().height(spacing.space_l))
            .push(widget::divider::horizontal::default())
            .push(widget::vertical_space().height(spacing.space_s))
            .push(
                widget::text(version_info)
                    .size(12)
                    .class(cosmic::theme::Text::Accent),
            )
            .spacing(0)
            .into();

        context_drawer::context_drawer(
            settings_column,
            Message::ToggleContextPage(ContextPage::Settings),
        )
        .title(fl!("settings"))
    }
}
