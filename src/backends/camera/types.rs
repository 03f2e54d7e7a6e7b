// SPDX-License-Identifier: GPL-3.0-only

//! Shared types for the camera backend

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

/// Kind of media input exposed by the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceKind {
    VideoInput,
    AudioInput,
    Other,
}

/// A media input device reported by the platform
///
/// Read-only to this application; produced by enumeration. The label
/// may be empty until the session's first stream grant (some platforms
/// redact labels before that).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraDevice {
    /// PipeWire target (object.serial when available, node id otherwise)
    pub id: String,
    /// Human-readable device label
    pub label: String,
    pub kind: DeviceKind,
}

/// Capture format requested from the stream binder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureFormat {
    pub width: u32,
    pub height: u32,
    /// Ideal framerate; `None` leaves the rate unconstrained
    pub framerate: Option<u32>,
}

impl Default for CaptureFormat {
    fn default() -> Self {
        Self {
            width: crate::constants::capture::DEFAULT_WIDTH,
            height: crate::constants::capture::DEFAULT_HEIGHT,
            framerate: Some(crate::constants::capture::DEFAULT_FRAMERATE),
        }
    }
}

impl std::fmt::Display for CaptureFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(fps) = self.framerate {
            write!(f, "{}x{} @ {}fps", self.width, self.height, fps)
        } else {
            write!(f, "{}x{}", self.width, self.height)
        }
    }
}

/// One RGBA frame from the preview pipeline
#[derive(Clone)]
pub struct CameraFrame {
    pub width: u32,
    pub height: u32,
    /// Tightly packed RGBA pixels (stride = width * 4)
    pub data: Arc<[u8]>,
    /// Timestamp when the frame left the pipeline (latency diagnostics)
    pub captured_at: Instant,
}

impl std::fmt::Debug for CameraFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "CameraFrame({}x{}, {} bytes)",
            self.width,
            self.height,
            self.data.len()
        )
    }
}

/// Frame sender used by the pipeline callback
pub type FrameSender = futures::channel::mpsc::Sender<CameraFrame>;

/// Frame receiver drained by the preview subscription
pub type FrameReceiver = futures::channel::mpsc::Receiver<CameraFrame>;

/// A live hardware track
///
/// The preview pipeline is one video track; the throwaway unlock
/// acquisition is another. Stopping a track releases its hardware and
/// is idempotent.
pub trait MediaTrack: Send {
    /// Stop the track and release the underlying hardware
    fn stop(&mut self);

    /// Whether the track still holds hardware
    fn is_live(&self) -> bool;
}

/// Exclusive ownership of the live tracks of one acquisition
///
/// Held by the camera lifecycle while the preview is active. `release`
/// stops every track; dropping an unreleased handle stops them too, so
/// a handle can never outlive its owner with hardware still acquired.
pub struct StreamHandle {
    tracks: Vec<Box<dyn MediaTrack>>,
}

impl StreamHandle {
    pub fn new(tracks: Vec<Box<dyn MediaTrack>>) -> Self {
        Self { tracks }
    }

    /// Handle owning a single track
    pub fn single(track: impl MediaTrack + 'static) -> Self {
        Self::new(vec![Box::new(track)])
    }

    /// Stop every track held by this handle
    pub fn release(&mut self) {
        for track in &mut self.tracks {
            track.stop();
        }
    }

    /// Number of tracks still holding hardware
    pub fn live_tracks(&self) -> usize {
        self.tracks.iter().filter(|t| t.is_live()).count()
    }
}

impl Drop for StreamHandle {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for StreamHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "StreamHandle({}/{} live)",
            self.live_tracks(),
            self.tracks.len()
        )
    }
}
