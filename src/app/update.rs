// SPDX-License-Identifier: GPL-3.0-only

//! Message update handling
//!
//! The main `update()` function acts as a dispatcher; the handlers
//! live in the `handlers` submodules grouped by functional domain.

use crate::app::state::{AppModel, Message};
use cosmic::Task;

impl AppModel {
    /// Main message handler - routes messages to the handler methods.
    pub fn update(&mut self, message: Message) -> Task<cosmic::Action<Message>> {
        match message {
            // ===== UI Navigation =====
            Message::LaunchUrl(url) => self.handle_launch_url(url),
            Message::ToggleContextPage(page) => self.handle_toggle_context_page(page),
            Message::SetMode(mode) => self.handle_set_mode(mode),

            // ===== Camera =====
            Message::StartCamera => self.handle_start_camera(),
            Message::StopCamera => self.handle_stop_camera(),
            Message::CameraActivated {
                attempt,
                slot,
                device_label,
            } => self.handle_camera_activated(attempt, slot, device_label),
            Message::CameraFailed { attempt, message } => {
                self.handle_camera_failed(attempt, message)
            }
            Message::CameraFrame(frame) => self.handle_camera_frame(frame),

            // ===== Speech =====
            Message::MicrophoneAccess(result) => self.handle_microphone_access(result),
            Message::AudioLevel(level) => self.handle_audio_level(level),

            // ===== Settings =====
            Message::UpdateConfig(config) => self.handle_update_config(config),
            Message::SetAppTheme(index) => self.handle_set_app_theme(index),
            Message::SetBridgeMarker(marker) => self.handle_set_bridge_marker(marker),
            Message::SelectResolution(index) => self.handle_select_resolution(index),
            Message::SelectFramerate(index) => self.handle_select_framerate(index),
            Message::SelectAudioDevice(index) => self.handle_select_audio_device(index),
        }
    }
}
