// SPDX-License-Identifier: GPL-3.0-only

//! Camera preview panel
//!
//! Cycles through the lifecycle states: a tap-to-start placeholder,
//! an acquiring notice, the live preview with a stop button, and the
//! error state showing the platform's message with tap-to-retry.

use crate::app::state::{AppModel, CameraStatus, Message};
use crate::constants::ui;
use crate::fl;
use cosmic::Element;
use cosmic::iced::{Alignment, Background, Border, Color, Length};
use cosmic::widget::{self, icon};

impl AppModel {
    /// Build the camera panel for the sign pane
    pub fn build_camera_panel(&self) -> Element<'_, Message> {
        let content: Element<'_, Message> = match self.camera.status() {
            CameraStatus::Active => self.build_active_preview(),
            CameraStatus::Acquiring => placeholder(&fl!("camera-starting"), None),
            CameraStatus::Idle => {
                placeholder(&fl!("camera-tap-to-start"), Some(Message::StartCamera))
            }
            CameraStatus::Error => {
                // The acquisition failure text is shown as-is; tapping
                // retries through the normal start path
                let message = self
                    .camera
                    .error_message()
                    .unwrap_or("Camera not found or permission denied.");
                placeholder(message, Some(Message::StartCamera))
            }
        };

        widget::container(content)
            .width(Length::Fill)
            .height(Length::Fixed(ui::CAMERA_PANEL_HEIGHT))
            .style(|_theme| widget::container::Style {
                background: Some(Background::Color(Color::from_rgb(0.2, 0.2, 0.2))),
                border: Border {
                    radius: ui::PANEL_RADIUS.into(),
                    ..Default::default()
                },
                text_color: Some(Color::from_rgb(0.73, 0.73, 0.73)),
                ..Default::default()
            })
            .into()
    }

    /// Live preview with the stop button overlaid top-right
    fn build_active_preview(&self) -> Element<'_, Message> {
        let preview: Element<'_, Message> = match &self.preview_frame {
            Some(handle) => widget::image::Image::new(handle.clone())
                .content_fit(cosmic::iced::ContentFit::Cover)
                .width(Length::Fill)
                .height(Length::Fill)
                .into(),
            // Stream is live but the first frame has not landed yet
            None => widget::Space::new(Length::Fill, Length::Fill).into(),
        };

        let stop_button = widget::container(
            widget::button::icon(icon::from_name("window-close-symbolic"))
                .on_press(Message::StopCamera),
        )
        .width(Length::Fill)
        .align_x(cosmic::iced::alignment::Horizontal::Right)
        .padding(10);

        cosmic::iced::widget::stack![preview, stop_button]
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }
}

/// Centered icon + text, optionally tappable
fn placeholder(message: &str, on_press: Option<Message>) -> Element<'_, Message> {
    let content = widget::column()
        .push(icon::from_name("camera-web-symbolic").size(48))
        .push(widget::vertical_space().height(Length::Fixed(10.0)))
        .push(widget::text(message.to_string()).size(14))
        .align_x(Alignment::Center);

    let centered = widget::container(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .align_x(cosmic::iced::alignment::Horizontal::Center)
        .align_y(cosmic::iced::alignment::Vertical::Center);

    match on_press {
        Some(message) => widget::mouse_area(centered).on_press(message).into(),
        None => centered.into(),
    }
}
