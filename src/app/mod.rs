// SPDX-License-Identifier: GPL-3.0-only

//! Main application module
//!
//! # Architecture
//!
//! - `state`: application state types (AppModel, Message, lifecycle
//!   state machines)
//! - `update`: message dispatcher
//! - `handlers`: message handlers grouped by domain
//! - `view`: main view rendering
//! - `mode_switcher`: Sign/Speech tab row
//! - `camera_panel`: camera preview panel
//! - `waveform`: audio level indicator
//! - `settings`: settings drawer

mod camera_panel;
mod handlers;
mod mode_switcher;
mod settings;
mod state;
mod update;
mod view;
mod waveform;

use crate::config::Config;
use crate::fl;
use cosmic::app::context_drawer;
use cosmic::cosmic_config::{self, CosmicConfigEntry};
use cosmic::iced::Subscription;
use cosmic::widget::{self, about::About};
use cosmic::{Element, Task};
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;
use tracing::{error, info, warn};

pub use state::{
    AppModel, CameraLifecycle, CameraStatus, ContextPage, Message, SpeechState, StreamSlot,
    TranslateMode,
};

const REPOSITORY: &str = "https://github.com/echify/echify";
const APP_ICON: &[u8] =
    include_bytes!("../../resources/icons/hicolor/scalable/apps/io.github.echify.echify.svg");

impl cosmic::Application for AppModel {
    /// The async executor that will be used to run your application's commands.
    type Executor = cosmic::executor::Default;

    /// Data that your application receives to its init method.
    type Flags = ();

    /// Messages which the application and its widgets will emit.
    type Message = Message;

    /// Unique identifier in RDNN (reverse domain name notation) format.
    const APP_ID: &'static str = "io.github.echify.echify";

    fn core(&self) -> &cosmic::Core {
        &self.core
    }

    fn core_mut(&mut self) -> &mut cosmic::Core {
        &mut self.core
    }

    /// Initializes the application with any given flags and startup commands.
    fn init(
        core: cosmic::Core,
        _flags: Self::Flags,
    ) -> (Self, Task<cosmic::Action<Self::Message>>) {
        // Create the about widget
        let about = About::default()
            .name(fl!("app-title"))
            .icon(widget::icon::from_svg_bytes(APP_ICON))
            .version(crate::constants::app_info::version())
            .links([(fl!("repository"), REPOSITORY)])
            .license(env!("CARGO_PKG_LICENSE"));

        // Load configuration
        let (config_handler, config) =
            match cosmic_config::Config::new(Self::APP_ID, Config::VERSION) {
                Ok(handler) => {
                    let config = match Config::get_entry(&handler) {
                        Ok(config) => config,
                        Err((errors, config)) => {
                            error!(?errors, "Errors loading config");
                            config
                        }
                    };
                    (Some(handler), config)
                }
                Err(err) => {
                    error!(%err, "Failed to create config handler");
                    (None, Config::default())
                }
            };

        // Initialize GStreamer early (required before any GStreamer calls)
        if let Err(e) = gstreamer::init() {
            error!(error = %e, "Failed to initialize GStreamer");
        }

        // Enumerate audio devices synchronously (fast operation)
        let audio_devices = crate::backends::audio::enumerate_audio_devices();
        let current_audio_device_index = 0; // Default device is sorted first
        let audio_dropdown_options: Vec<String> = audio_devices
            .iter()
            .map(|dev| {
                if dev.is_default {
                    format!("{} (Default)", dev.name)
                } else {
                    dev.name.clone()
                }
            })
            .collect();

        let resolution_dropdown_options = crate::constants::capture::RESOLUTIONS
            .iter()
            .map(|(w, h)| format!("{}x{}", w, h))
            .collect();
        let framerate_dropdown_options = crate::constants::capture::FRAMERATES
            .iter()
            .map(|fps| format!("{} fps", fps))
            .collect();
        let theme_dropdown_options = vec![
            fl!("theme-system"),
            fl!("theme-dark"),
            fl!("theme-light"),
        ];

        let app_theme = config.app_theme;

        // Construct the app model with the runtime's core.
        let app = AppModel {
            core,
            context_page: ContextPage::default(),
            about,
            config,
            config_handler,
            mode: TranslateMode::default(),
            camera: CameraLifecycle::default(),
            camera_cancel_flag: Arc::new(std::sync::atomic::AtomicBool::new(false)),
            preview_frame: None,
            speech: SpeechState::default(),
            mic_session: 0,
            mic_levels: Vec::new(),
            audio_devices,
            current_audio_device_index,
            audio_dropdown_options,
            resolution_dropdown_options,
            framerate_dropdown_options,
            theme_dropdown_options,
        };

        (app, cosmic::command::set_theme(app_theme.theme()))
    }

    /// Elements to pack in the center of the header bar.
    fn header_center(&self) -> Vec<Element<'_, Self::Message>> {
        vec![widget::text::heading(fl!("app-title")).into()]
    }

    /// Elements to pack at the end of the header bar.
    fn header_end(&self) -> Vec<Element<'_, Self::Message>> {
        vec![
            widget::button::icon(widget::icon::from_name("preferences-system-symbolic"))
                .on_press(Message::ToggleContextPage(ContextPage::Settings))
                .into(),
        ]
    }

    /// Display a context drawer if the context page is requested.
    fn context_drawer(&self) -> Option<context_drawer::ContextDrawer<'_, Self::Message>> {
        if !self.core.window.show_context {
            return None;
        }

        Some(match self.context_page {
            ContextPage::About => context_drawer::about(
                &self.about,
                |url| Message::LaunchUrl(url.to_string()),
                Message::ToggleContextPage(ContextPage::About),
            ),
            ContextPage::Settings => self.settings_view(),
        })
    }

    /// Describes the interface based on the current state of the application model.
    fn view(&self) -> Element<'_, Self::Message> {
        self.view()
    }

    /// Register subscriptions for this application.
    fn subscription(&self) -> Subscription<Self::Message> {
        use futures::{SinkExt, StreamExt};

        let config_sub = self
            .core()
            .watch_config::<Config>(Self::APP_ID)
            .map(|update| Message::UpdateConfig(update.config));

        // Camera acquisition + frame forwarding. Keyed by the attempt
        // id: a new start action is a new stream, while the transition
        // from Acquiring to Active keeps the running one.
        let camera_sub = if self.camera.is_running() {
            let attempt = self.camera.attempt();
            let marker = self.config.bridge_marker.clone();
            let format = self.config.capture_format;
            let cancel = Arc::clone(&self.camera_cancel_flag);

            Subscription::run_with_id(
                ("camera", attempt),
                cosmic::iced::stream::channel(100, move |mut output| async move {
                    info!(attempt, "Camera acquisition started");

                    let device = match crate::backends::camera::acquire_device(&marker) {
                        Ok(device) => device,
                        Err(e) => {
                            let _ = output
                                .send(Message::CameraFailed {
                                    attempt,
                                    message: e.to_string(),
                                })
                                .await;
                            return;
                        }
                    };

                    // A stop may have landed while enumerating; skip
                    // the hardware acquisition entirely in that case.
                    if cancel.load(Ordering::Acquire) {
                        info!("Cancel flag set before stream binding - skipping");
                        return;
                    }

                    let (sender, mut receiver) = futures::channel::mpsc::channel(8);
                    let pipeline = match crate::backends::camera::CameraPipeline::open(
                        &device, &format, sender,
                    ) {
                        Ok(pipeline) => pipeline,
                        Err(e) => {
                            let _ = output
                                .send(Message::CameraFailed {
                                    attempt,
                                    message: e.to_string(),
                                })
                                .await;
                            return;
                        }
                    };

                    let slot: StreamSlot = Arc::new(std::sync::Mutex::new(Some(
                        crate::backends::camera::StreamHandle::single(pipeline),
                    )));

                    let _ = output
                        .send(Message::CameraActivated {
                            attempt,
                            slot,
                            device_label: device.label.clone(),
                        })
                        .await;

                    let mut frame_count = 0u64;
                    loop {
                        if cancel.load(Ordering::Acquire) {
                            info!("Cancel flag set - preview loop exiting");
                            break;
                        }

                        if output.is_closed() {
                            info!("Output channel closed - preview loop exiting");
                            break;
                        }

                        // Short timeout so cancellation is noticed
                        // even when the stopped pipeline goes quiet
                        match tokio::time::timeout(Duration::from_millis(16), receiver.next()).await
                        {
                            Ok(Some(frame)) => {
                                frame_count += 1;
                                if frame_count % 30 == 0 {
                                    info!(
                                        frame = frame_count,
                                        width = frame.width,
                                        height = frame.height,
                                        latency_ms =
                                            frame.captured_at.elapsed().as_micros() as f64 / 1000.0,
                                        "Forwarding preview frame"
                                    );
                                }

                                // try_send: dropping frames beats blocking the stream
                                if let Err(e) = output.try_send(Message::CameraFrame(frame))
                                    && e.is_disconnected()
                                {
                                    info!("Output channel disconnected - preview loop exiting");
                                    break;
                                }
                            }
                            Ok(None) => {
                                info!("Preview frame stream ended");
                                break;
                            }
                            Err(_) => continue,
                        }
                    }
                }),
            )
        } else {
            Subscription::none()
        };

        // Microphone level monitor, running only while listening.
        // Keyed by the session id so retargeting restarts it; dropping
        // the subscription drops the monitor and releases the device.
        let mic_sub = if let SpeechState::Listening { session } = self.speech {
            let target = self
                .audio_devices
                .get(self.current_audio_device_index)
                .map(|dev| dev.node_name.clone());

            Subscription::run_with_id(
                ("microphone", session),
                cosmic::iced::stream::channel(32, move |mut output| async move {
                    info!(session, "Microphone level monitor starting");

                    let (sender, mut receiver) = futures::channel::mpsc::channel(32);
                    let monitor = match crate::backends::audio::MicMonitor::open(
                        target.as_deref(),
                        sender,
                    ) {
                        Ok(monitor) => monitor,
                        Err(e) => {
                            warn!(error = %e, "Failed to start level monitor");
                            let _ = output.send(Message::MicrophoneAccess(Err(e))).await;
                            return;
                        }
                    };

                    loop {
                        if output.is_closed() {
                            break;
                        }

                        match tokio::time::timeout(Duration::from_millis(200), receiver.next())
                            .await
                        {
                            Ok(Some(level)) => {
                                let _ = output.try_send(Message::AudioLevel(level));
                            }
                            Ok(None) => break,
                            Err(_) => continue,
                        }
                    }

                    drop(monitor);
                    info!(session, "Microphone level monitor stopped");
                }),
            )
        } else {
            Subscription::none()
        };

        Subscription::batch([config_sub, camera_sub, mic_sub])
    }

    /// Handles messages emitted by the application and its widgets.
    fn update(&mut self, message: Self::Message) -> Task<cosmic::Action<Self::Message>> {
        self.update(message)
    }

    /// Release the camera when the window is closed.
    fn on_app_exit(&mut self) -> Option<Self::Message> {
        self.teardown_camera();
        None
    }
}
