// SPDX-License-Identifier: GPL-3.0-only

//! Application state management

use crate::backends::audio::AudioDevice;
use crate::backends::camera::{CameraFrame, StreamHandle};
use crate::config::Config;
use cosmic::cosmic_config;
use cosmic::widget::about::About;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

/// Transport for a freshly acquired stream handle
///
/// Messages must be cloneable while the handle must stay unique, so
/// the acquisition task parks it behind a shared slot and the handler
/// takes it out exactly once.
pub type StreamSlot = Arc<Mutex<Option<StreamHandle>>>;

/// The two presentation modes of the main screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TranslateMode {
    /// Camera preview + translated text
    #[default]
    Sign,
    /// Waveform indicator + transcribed text
    Speech,
}

/// Camera acquisition status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CameraStatus {
    #[default]
    Idle,
    Acquiring,
    Active,
    Error,
}

/// Camera lifecycle state machine
///
/// Owns the stream handle while the preview is active and guarantees
/// every exit path (user stop, mode switch, app exit) releases it.
///
/// Invariants: at most one handle is held; the status is `Active` iff
/// a handle is held; `Error` implies no handle is held.
#[derive(Debug, Default)]
pub struct CameraLifecycle {
    status: CameraStatus,
    handle: Option<StreamHandle>,
    device_label: Option<String>,
    error: Option<String>,
    attempts: u64,
}

impl CameraLifecycle {
    pub fn status(&self) -> CameraStatus {
        self.status
    }

    /// Whether an acquisition is in flight or the preview is live
    pub fn is_running(&self) -> bool {
        matches!(self.status, CameraStatus::Acquiring | CameraStatus::Active)
    }

    /// The id of the current (or last) acquisition attempt
    pub fn attempt(&self) -> u64 {
        self.attempts
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn device_label(&self) -> Option<&str> {
        self.device_label.as_deref()
    }

    /// Begin an acquisition attempt
    ///
    /// Not reentrant: returns `None` while one is already in flight or
    /// the preview is live, so a second start action never spawns a
    /// second acquisition. From `Error`, begins a fresh attempt.
    pub fn begin(&mut self) -> Option<u64> {
        match self.status {
            CameraStatus::Acquiring | CameraStatus::Active => None,
            CameraStatus::Idle | CameraStatus::Error => {
                self.attempts += 1;
                self.status = CameraStatus::Acquiring;
                self.error = None;
                Some(self.attempts)
            }
        }
    }

    /// Install the handle produced by acquisition attempt `attempt`
    ///
    /// In-flight acquisitions cannot be cancelled; if a stop or a
    /// newer attempt superseded this one, the late handle is released
    /// on the spot instead of being installed.
    pub fn activate(&mut self, attempt: u64, mut handle: StreamHandle, device_label: String) {
        if self.status != CameraStatus::Acquiring || attempt != self.attempts {
            info!(attempt, "Releasing stream handle from superseded acquisition");
            handle.release();
            return;
        }

        debug!(attempt, device = %device_label, "Camera stream active");
        self.status = CameraStatus::Active;
        self.handle = Some(handle);
        self.device_label = Some(device_label);
        self.error = None;
    }

    /// Record the failure of acquisition attempt `attempt`
    ///
    /// The message is user-visible text; stale failures are ignored.
    pub fn fail(&mut self, attempt: u64, message: String) {
        if self.status != CameraStatus::Acquiring || attempt != self.attempts {
            debug!(attempt, "Ignoring stale acquisition failure");
            return;
        }

        self.status = CameraStatus::Error;
        self.error = Some(message);
        self.device_label = None;
        debug_assert!(self.handle.is_none());
    }

    /// Stop the preview and release every held track
    ///
    /// Returns the released handle (all tracks stopped). Also records
    /// a stop against an in-flight acquisition so the handle it
    /// eventually resolves to is released on arrival. No-op in `Idle`
    /// and `Error`.
    pub fn stop(&mut self) -> Option<StreamHandle> {
        let released = self.handle.take().map(|mut handle| {
            handle.release();
            handle
        });

        if matches!(self.status, CameraStatus::Active | CameraStatus::Acquiring) {
            self.status = CameraStatus::Idle;
        }
        self.device_label = None;

        released
    }
}

/// Speech mode state
///
/// The tab switches before the permission request resolves; this
/// records where that request ended up. Denied keeps the tab but shows
/// an explicit notice instead of pretending to listen.
#[derive(Debug, Default)]
pub enum SpeechState {
    #[default]
    Idle,
    /// Microphone permission request in flight
    Requesting,
    /// Microphone granted; the level monitor is running
    Listening { session: u64 },
    /// Microphone refused; no audio is captured
    Denied { message: String },
}

impl SpeechState {
    pub fn is_listening(&self) -> bool {
        matches!(self, SpeechState::Listening { .. })
    }
}

/// The context page to display in the context drawer
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum ContextPage {
    #[default]
    About,
    Settings,
}

/// Messages emitted by the application and its widgets
#[derive(Debug, Clone)]
pub enum Message {
    // ===== UI Navigation =====
    /// Open external URL (repository, etc.)
    LaunchUrl(String),
    /// Toggle context drawer page (About, Settings)
    ToggleContextPage(ContextPage),
    /// Switch between the Sign and Speech tabs
    SetMode(TranslateMode),

    // ===== Camera =====
    /// User start action (also retry from the error state)
    StartCamera,
    /// User stop action
    StopCamera,
    /// Acquisition resolved with a live stream handle
    CameraActivated {
        attempt: u64,
        slot: StreamSlot,
        device_label: String,
    },
    /// Acquisition failed; the message is shown verbatim
    CameraFailed { attempt: u64, message: String },
    /// New preview frame from the pipeline
    CameraFrame(CameraFrame),

    // ===== Speech =====
    /// Microphone permission request resolved
    MicrophoneAccess(Result<(), crate::errors::AudioError>),
    /// RMS level from the microphone monitor
    AudioLevel(f32),

    // ===== Settings =====
    /// Configuration updated externally
    UpdateConfig(Config),
    /// Select application theme from dropdown
    SetAppTheme(usize),
    /// Bridge camera marker edited
    SetBridgeMarker(String),
    /// Select preview resolution from dropdown
    SelectResolution(usize),
    /// Select preview framerate from dropdown
    SelectFramerate(usize),
    /// Select microphone from dropdown
    SelectAudioDevice(usize),
}

/// The application model stores app-specific state used to describe
/// its interface and drive its logic.
pub struct AppModel {
    /// Application state which is managed by the COSMIC runtime
    pub core: cosmic::Core,
    /// Display a context drawer with the designated page if defined
    pub context_page: ContextPage,
    /// The about page for this app
    pub about: About,
    /// Configuration data that persists between application runs
    pub config: Config,
    /// Configuration handler for saving settings
    pub config_handler: Option<cosmic_config::Config>,
    /// Current presentation mode (Sign or Speech)
    pub mode: TranslateMode,
    /// Camera lifecycle (owns the stream handle while active)
    pub camera: CameraLifecycle,
    /// Flag to cancel the frame-forwarding loop of a stopped preview
    pub camera_cancel_flag: Arc<AtomicBool>,
    /// Latest preview frame, ready for the image widget
    pub preview_frame: Option<cosmic::widget::image::Handle>,
    /// Speech mode state (permission + monitor)
    pub speech: SpeechState,
    /// Monitor session counter; bumping it restarts the monitor
    pub mic_session: u64,
    /// Rolling microphone level history, newest last
    pub mic_levels: Vec<f32>,
    /// Available audio input devices
    pub audio_devices: Vec<AudioDevice>,
    /// Current audio device index
    pub current_audio_device_index: usize,
    /// Dropdown options (cached for UI)
    pub audio_dropdown_options: Vec<String>,
    pub resolution_dropdown_options: Vec<String>,
    pub framerate_dropdown_options: Vec<String>,
    pub theme_dropdown_options: Vec<String>,
}
