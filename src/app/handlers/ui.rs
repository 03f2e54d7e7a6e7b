// SPDX-License-Identifier: GPL-3.0-only

//! UI navigation and settings handlers

use crate::app::state::{AppModel, ContextPage, Message};
use crate::config::AppTheme;
use crate::constants::capture;
use cosmic::Task;
use cosmic::cosmic_config::CosmicConfigEntry;
use tracing::{error, info};

impl AppModel {
    pub(crate) fn handle_launch_url(&self, url: String) -> Task<cosmic::Action<Message>> {
        match open::that_detached(&url) {
            Ok(()) => {}
            Err(err) => {
                error!(url = %url, error = %err, "Failed to open URL");
            }
        }
        Task::none()
    }

    pub(crate) fn handle_toggle_context_page(
        &mut self,
        context_page: ContextPage,
    ) -> Task<cosmic::Action<Message>> {
        if self.context_page == context_page {
            self.core.window.show_context = !self.core.window.show_context;
        } else {
            self.context_page = context_page;
            self.core.window.show_context = true;
        }
        Task::none()
    }

    pub(crate) fn handle_update_config(
        &mut self,
        config: crate::config::Config,
    ) -> Task<cosmic::Action<Message>> {
        info!("UpdateConfig received");
        self.config = config;
        Task::none()
    }

    pub(crate) fn handle_set_app_theme(&mut self, index: usize) -> Task<cosmic::Action<Message>> {
        let app_theme = match index {
            0 => AppTheme::System,
            1 => AppTheme::Dark,
            2 => AppTheme::Light,
            _ => return Task::none(),
        };

        info!(?app_theme, "Setting application theme");
        self.config.app_theme = app_theme;
        self.save_config();

        cosmic::command::set_theme(app_theme.theme())
    }

    pub(crate) fn handle_set_bridge_marker(
        &mut self,
        marker: String,
    ) -> Task<cosmic::Action<Message>> {
        self.config.bridge_marker = marker;
        self.save_config();
        Task::none()
    }

    pub(crate) fn handle_select_resolution(
        &mut self,
        index: usize,
    ) -> Task<cosmic::Action<Message>> {
        let Some(&(width, height)) = capture::RESOLUTIONS.get(index) else {
            return Task::none();
        };

        info!(width, height, "Selected preview resolution");
        self.config.capture_format.width = width;
        self.config.capture_format.height = height;
        self.save_config();

        self.restart_camera_if_running()
    }

    pub(crate) fn handle_select_framerate(
        &mut self,
        index: usize,
    ) -> Task<cosmic::Action<Message>> {
        let Some(&fps) = capture::FRAMERATES.get(index) else {
            return Task::none();
        };

        info!(fps, "Selected preview framerate");
        self.config.capture_format.framerate = Some(fps);
        self.save_config();

        self.restart_camera_if_running()
    }

    /// Apply a changed capture format to a running preview
    fn restart_camera_if_running(&mut self) -> Task<cosmic::Action<Message>> {
        if !self.camera.is_running() {
            return Task::none();
        }

        info!("Restarting camera with new capture format");
        self.teardown_camera();
        self.handle_start_camera()
    }

    pub(crate) fn save_config(&self) {
        if let Some(handler) = self.config_handler.as_ref()
            && let Err(err) = self.config.write_entry(handler)
        {
            error!(?err, "Failed to save configuration");
        }
    }
}
