// SPDX-License-Identifier: GPL-3.0-only

//! Error types for the application

use std::fmt;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Main application error type
#[derive(Debug, Clone)]
pub enum AppError {
    /// Camera acquisition errors
    Camera(CameraError),
    /// Microphone/audio errors
    Audio(AudioError),
    /// Configuration errors
    Config(String),
    /// Generic error with message
    Other(String),
}

/// Camera acquisition errors
///
/// Every variant is surfaced to the user as text; none is fatal to the
/// process. Recovery is a manual retry through the start action.
#[derive(Debug, Clone)]
pub enum CameraError {
    /// No video input device matched the selection policy
    DeviceNotFound,
    /// The platform refused or dropped the stream request.
    /// Carries the platform's diagnostic message, shown verbatim.
    AcquisitionFailed(String),
}

/// Microphone errors
#[derive(Debug, Clone)]
pub enum AudioError {
    /// The user or the portal refused microphone access
    PermissionDenied,
    /// The permission portal could not be reached
    PortalUnavailable(String),
    /// The level monitor pipeline could not be started
    MonitorFailed(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Camera(e) => write!(f, "Camera error: {}", e),
            AppError::Audio(e) => write!(f, "Audio error: {}", e),
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
            AppError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl fmt::Display for CameraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraError::DeviceNotFound => {
                write!(f, "No camera devices found. Is the bridge running?")
            }
            CameraError::AcquisitionFailed(msg) => write!(f, "{}", msg),
        }
    }
}

impl fmt::Display for AudioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioError::PermissionDenied => write!(f, "Microphone access denied"),
            AudioError::PortalUnavailable(msg) => {
                write!(f, "Permission portal unavailable: {}", msg)
            }
            AudioError::MonitorFailed(msg) => write!(f, "Level monitor failed: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}
impl std::error::Error for CameraError {}
impl std::error::Error for AudioError {}

impl From<CameraError> for AppError {
    fn from(err: CameraError) -> Self {
        AppError::Camera(err)
    }
}

impl From<AudioError> for AppError {
    fn from(err: AudioError) -> Self {
        AppError::Audio(err)
    }
}

impl From<String> for AppError {
    fn from(msg: String) -> Self {
        AppError::Other(msg)
    }
}
