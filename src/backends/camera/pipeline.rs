// SPDX-License-Identifier: GPL-3.0-only

//! Camera preview pipeline
//!
//! Binds a live stream for the selected device and forwards RGBA
//! frames to the UI through a bounded channel. Frames are converted to
//! tightly packed RGBA inside the pipeline so the preview widget can
//! consume them directly.

use super::types::{CameraDevice, CameraFrame, CaptureFormat, FrameSender, MediaTrack};
use crate::errors::CameraError;
use gstreamer::prelude::*;
use gstreamer_app::AppSink;
use gstreamer_video::VideoInfo;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::{debug, error, info, warn};

static FRAME_COUNTER: AtomicU64 = AtomicU64::new(0);

const START_TIMEOUT_SECS: u64 = 5;
const STOP_TIMEOUT_SECS: u64 = 2;

/// Live camera stream bound to the preview surface
///
/// Created in the playing state; stopping releases the device. One
/// pipeline is one video track of a [`super::StreamHandle`].
pub struct CameraPipeline {
    pipeline: gstreamer::Pipeline,
    appsink: AppSink,
    live: bool,
}

impl CameraPipeline {
    /// Build and start the preview pipeline for one device
    ///
    /// Failures carry the platform's diagnostic message; the caller
    /// shows it to the user unmodified.
    pub fn open(
        device: &CameraDevice,
        format: &CaptureFormat,
        frame_sender: FrameSender,
    ) -> Result<Self, CameraError> {
        info!(device = %device.label, format = %format, "Creating camera pipeline");

        gstreamer::init().map_err(|e| CameraError::AcquisitionFailed(e.to_string()))?;

        let mut caps = format!(
            "video/x-raw,format=(string)RGBA,width=(int){},height=(int){}",
            format.width, format.height
        );
        if let Some(fps) = format.framerate {
            caps.push_str(&format!(",framerate=(fraction){}/1", fps));
        }

        // Empty id = let PipeWire pick its default video source
        let source = if device.id.is_empty() {
            "pipewiresrc".to_string()
        } else {
            format!("pipewiresrc target-object={}", device.id)
        };

        let description = format!(
            "{} ! videoconvert ! videoscale ! {} ! appsink name=sink",
            source, caps
        );
        debug!(pipeline = %description, "Launching pipeline");

        let pipeline = gstreamer::parse::launch(&description)
            .map_err(|e| CameraError::AcquisitionFailed(e.to_string()))?
            .downcast::<gstreamer::Pipeline>()
            .map_err(|_| {
                CameraError::AcquisitionFailed("Pipeline element is not a bin".to_string())
            })?;

        let appsink = pipeline
            .by_name("sink")
            .ok_or_else(|| CameraError::AcquisitionFailed("Failed to get appsink".to_string()))?
            .dynamic_cast::<AppSink>()
            .map_err(|_| CameraError::AcquisitionFailed("Failed to cast appsink".to_string()))?;

        // Low-latency preview: never block the stream, drop stale frames
        appsink.set_property("sync", false);
        appsink.set_property("max-buffers", 2u32);
        appsink.set_property("drop", true);
        appsink.set_property("enable-last-sample", false);

        appsink.set_callbacks(
            gstreamer_app::AppSinkCallbacks::builder()
                .new_sample(move |appsink| {
                    let frame_start = Instant::now();
                    let frame_num = FRAME_COUNTER.fetch_add(1, Ordering::Relaxed);

                    let sample = appsink.pull_sample().map_err(|e| {
                        if frame_num % 30 == 0 {
                            error!(frame = frame_num, error = ?e, "Failed to pull sample");
                        }
                        gstreamer::FlowError::Eos
                    })?;

                    let buffer = sample.buffer().ok_or(gstreamer::FlowError::Error)?;
                    let caps = sample.caps().ok_or(gstreamer::FlowError::Error)?;
                    let video_info =
                        VideoInfo::from_caps(caps).map_err(|_| gstreamer::FlowError::Error)?;
                    let map = buffer
                        .map_readable()
                        .map_err(|_| gstreamer::FlowError::Error)?;

                    let width = video_info.width();
                    let height = video_info.height();
                    let stride = video_info.stride()[0] as usize;
                    let row = width as usize * 4;

                    // Repack to tight rows only when the stride is padded
                    let data: Arc<[u8]> = if stride == row {
                        Arc::from(&map.as_slice()[..row * height as usize])
                    } else {
                        let mut tight = Vec::with_capacity(row * height as usize);
                        for chunk in map.as_slice().chunks(stride).take(height as usize) {
                            tight.extend_from_slice(&chunk[..row]);
                        }
                        Arc::from(tight)
                    };

                    let frame = CameraFrame {
                        width,
                        height,
                        data,
                        captured_at: frame_start,
                    };

                    // Non-blocking send; dropping frames is fine for live preview
                    let mut sender = frame_sender.clone();
                    if let Err(e) = sender.try_send(frame)
                        && frame_num % 30 == 0
                    {
                        debug!(frame = frame_num, error = ?e, "Frame dropped (channel full)");
                    }

                    Ok(gstreamer::FlowSuccess::Ok)
                })
                .build(),
        );

        if pipeline.set_state(gstreamer::State::Playing).is_err() {
            let err = acquisition_error(&pipeline, "Failed to start camera stream");
            let _ = pipeline.set_state(gstreamer::State::Null);
            return Err(err);
        }

        // Wait for the state change so acquisition failures surface here
        // rather than as a silent black preview
        let (result, state, pending) =
            pipeline.state(gstreamer::ClockTime::from_seconds(START_TIMEOUT_SECS));
        debug!(result = ?result, state = ?state, pending = ?pending, "Pipeline state");

        if result.is_err() {
            let err = acquisition_error(&pipeline, "Camera stream failed to start");
            let _ = pipeline.set_state(gstreamer::State::Null);
            return Err(err);
        }

        if state != gstreamer::State::Playing {
            warn!(state = ?state, "Pipeline not yet in playing state");
        }

        info!("Camera pipeline running");

        Ok(Self {
            pipeline,
            appsink,
            live: true,
        })
    }

    fn shutdown(&mut self) {
        if !self.live {
            return;
        }

        info!("Stopping camera pipeline");

        // Clear callbacks first so no frame lands after the stop
        self.appsink
            .set_callbacks(gstreamer_app::AppSinkCallbacks::builder().build());

        if let Err(e) = self.pipeline.set_state(gstreamer::State::Null) {
            warn!(error = ?e, "Failed to stop pipeline cleanly");
        }

        let (result, state, _) = self
            .pipeline
            .state(gstreamer::ClockTime::from_seconds(STOP_TIMEOUT_SECS));
        match result {
            Ok(_) => info!(state = ?state, "Camera pipeline stopped"),
            Err(e) => debug!(error = ?e, state = ?state, "Pipeline stop had issues"),
        }

        self.live = false;
    }
}

impl MediaTrack for CameraPipeline {
    fn stop(&mut self) {
        self.shutdown();
    }

    fn is_live(&self) -> bool {
        self.live
    }
}

impl Drop for CameraPipeline {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Extract the platform's diagnostic for a failed acquisition
///
/// The error message from the bus is surfaced verbatim; the fallback
/// only applies when the bus has nothing to say.
fn acquisition_error(pipeline: &gstreamer::Pipeline, fallback: &str) -> CameraError {
    if let Some(bus) = pipeline.bus()
        && let Some(msg) = bus.pop_filtered(&[gstreamer::MessageType::Error])
        && let gstreamer::MessageView::Error(err) = msg.view()
    {
        return CameraError::AcquisitionFailed(err.error().to_string());
    }

    CameraError::AcquisitionFailed(fallback.to_string())
}
