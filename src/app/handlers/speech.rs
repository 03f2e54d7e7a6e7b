// SPDX-License-Identifier: GPL-3.0-only

//! Speech mode handlers
//!
//! Mode switching, the microphone permission request, and the level
//! feed for the waveform indicator.

use crate::app::state::{AppModel, Message, SpeechState, TranslateMode};
use crate::constants::waveform;
use crate::errors::AudioError;
use crate::fl;
use cosmic::Task;
use tracing::{info, warn};

impl AppModel {
    pub(crate) fn handle_set_mode(
        &mut self,
        mode: TranslateMode,
    ) -> Task<cosmic::Action<Message>> {
        if self.mode == mode {
            return Task::none();
        }

        match mode {
            TranslateMode::Sign => {
                info!("Switching to sign mode");
                self.mode = TranslateMode::Sign;
                // Dropping the listening state stops the level monitor
                self.speech = SpeechState::Idle;
                self.mic_levels.clear();
                Task::none()
            }
            TranslateMode::Speech => {
                info!("Switching to speech mode");
                // The camera subtree unmounts; release its hardware
                self.teardown_camera();

                // The tab switches immediately; the permission result
                // decides between listening and the denied notice
                self.mode = TranslateMode::Speech;
                self.speech = SpeechState::Requesting;

                Task::perform(
                    crate::backends::audio::request_microphone_access(),
                    |result| cosmic::Action::App(Message::MicrophoneAccess(result)),
                )
            }
        }
    }

    pub(crate) fn handle_microphone_access(
        &mut self,
        result: Result<(), AudioError>,
    ) -> Task<cosmic::Action<Message>> {
        // A late response after switching back to sign mode
        if !matches!(
            self.speech,
            SpeechState::Requesting | SpeechState::Listening { .. }
        ) {
            return Task::none();
        }

        match result {
            Ok(()) => {
                info!("Microphone access granted - listening");
                self.mic_session += 1;
                self.mic_levels.clear();
                self.speech = SpeechState::Listening {
                    session: self.mic_session,
                };
            }
            Err(AudioError::PermissionDenied) => {
                warn!("Microphone access denied");
                self.speech = SpeechState::Denied {
                    message: fl!("mic-denied"),
                };
            }
            Err(err) => {
                warn!(error = %err, "Microphone unavailable");
                self.speech = SpeechState::Denied {
                    message: err.to_string(),
                };
            }
        }

        Task::none()
    }

    pub(crate) fn handle_audio_level(&mut self, level: f32) -> Task<cosmic::Action<Message>> {
        if !self.speech.is_listening() {
            return Task::none();
        }

        self.mic_levels.push(level.clamp(0.0, 1.0));
        if self.mic_levels.len() > waveform::BAR_COUNT {
            self.mic_levels.remove(0);
        }

        Task::none()
    }

    pub(crate) fn handle_select_audio_device(
        &mut self,
        index: usize,
    ) -> Task<cosmic::Action<Message>> {
        if index < self.audio_devices.len() {
            info!(index, "Selected audio device index");
            self.current_audio_device_index = index;

            // Restart the monitor against the new target
            if self.speech.is_listening() {
                self.mic_session += 1;
                self.mic_levels.clear();
                self.speech = SpeechState::Listening {
                    session: self.mic_session,
                };
            }
        }
        Task::none()
    }
}
