// SPDX-License-Identifier: GPL-3.0-only

//! Camera lifecycle handlers
//!
//! Start, stop, acquisition results, and preview frames. The state
//! machine itself lives in `state.rs`; these handlers wire it to the
//! subscription and the preview surface.

use crate::app::state::{AppModel, CameraStatus, Message, StreamSlot};
use crate::backends::camera::CameraFrame;
use cosmic::Task;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

impl AppModel {
    pub(crate) fn handle_start_camera(&mut self) -> Task<cosmic::Action<Message>> {
        match self.camera.begin() {
            Some(attempt) => {
                info!(attempt, "Starting camera acquisition");
                // Fresh flag per attempt; the old one stays set for any
                // still-draining loop of a previous stream
                self.camera_cancel_flag = Arc::new(AtomicBool::new(false));
                self.preview_frame = None;
            }
            None => {
                info!("Camera already acquiring or active - start ignored");
            }
        }
        Task::none()
    }

    pub(crate) fn handle_stop_camera(&mut self) -> Task<cosmic::Action<Message>> {
        self.teardown_camera();
        Task::none()
    }

    /// Release the camera through the single teardown path
    ///
    /// Reached from the user stop action, from switching to speech
    /// mode, and from app exit, so no exit leaves hardware acquired.
    pub(crate) fn teardown_camera(&mut self) {
        self.camera_cancel_flag.store(true, Ordering::Release);

        if let Some(handle) = self.camera.stop() {
            debug!(released = ?handle, "Camera stream released");
        }

        self.preview_frame = None;
    }

    pub(crate) fn handle_camera_activated(
        &mut self,
        attempt: u64,
        slot: StreamSlot,
        device_label: String,
    ) -> Task<cosmic::Action<Message>> {
        let handle = slot.lock().ok().and_then(|mut slot| slot.take());

        match handle {
            Some(handle) => {
                info!(attempt, device = %device_label, "Camera stream activated");
                self.camera.activate(attempt, handle, device_label);
            }
            None => {
                warn!(attempt, "Stream slot was empty on activation");
            }
        }

        Task::none()
    }

    pub(crate) fn handle_camera_failed(
        &mut self,
        attempt: u64,
        message: String,
    ) -> Task<cosmic::Action<Message>> {
        warn!(attempt, error = %message, "Camera acquisition failed");
        self.camera.fail(attempt, message);
        self.preview_frame = None;
        Task::none()
    }

    pub(crate) fn handle_camera_frame(
        &mut self,
        frame: CameraFrame,
    ) -> Task<cosmic::Action<Message>> {
        // Frames from a stream that was stopped in the meantime
        if self.camera.status() != CameraStatus::Active {
            return Task::none();
        }

        self.preview_frame = Some(cosmic::widget::image::Handle::from_rgba(
            frame.width,
            frame.height,
            frame.data.to_vec(),
        ));

        Task::none()
    }
}
