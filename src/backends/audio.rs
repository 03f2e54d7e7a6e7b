// SPDX-License-Identifier: GPL-3.0-only

//! Microphone support
//!
//! Input enumeration through the PipeWire dump, the RMS level monitor
//! feeding the waveform indicator, and the desktop portal permission
//! request.

use crate::constants::waveform;
use crate::errors::AudioError;
use gstreamer::prelude::*;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// An audio input device
#[derive(Debug, Clone)]
pub struct AudioDevice {
    /// Human-readable device name
    pub name: String,
    /// PipeWire node name, used as the monitor target
    pub node_name: String,
    /// Whether this is the session's default source
    pub is_default: bool,
}

/// Level sender used by the monitor's bus handler
pub type LevelSender = futures::channel::mpsc::Sender<f32>;

/// Level receiver drained by the waveform subscription
pub type LevelReceiver = futures::channel::mpsc::Receiver<f32>;

/// Enumerate available audio input devices using PipeWire
///
/// Returns an empty list when `pw-dump` is unavailable; the settings
/// drawer then shows no microphone entries and the monitor falls back
/// to the default source.
pub fn enumerate_audio_devices() -> Vec<AudioDevice> {
    let output = match std::process::Command::new("pw-dump").output() {
        Ok(output) if output.status.success() => output,
        Ok(_) => {
            warn!("pw-dump command failed");
            return Vec::new();
        }
        Err(e) => {
            warn!(error = %e, "Failed to run pw-dump");
            return Vec::new();
        }
    };

    let nodes: Vec<serde_json::Value> = match serde_json::from_slice(&output.stdout) {
        Ok(nodes) => nodes,
        Err(e) => {
            warn!(error = %e, "Failed to parse pw-dump output");
            return Vec::new();
        }
    };

    let default_node_name = find_default_source(&nodes);

    let mut devices: Vec<AudioDevice> = nodes
        .iter()
        .filter_map(|node| {
            let props = node.get("info")?.get("props")?;
            if props.get("media.class")?.as_str()? != "Audio/Source" {
                return None;
            }

            let name = props
                .get("node.nick")
                .or_else(|| props.get("node.description"))
                .or_else(|| props.get("node.name"))
                .and_then(|v| v.as_str())
                .unwrap_or("Unknown Audio Device")
                .to_string();

            let node_name = props
                .get("node.name")
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string();

            let is_default = default_node_name.as_deref() == Some(node_name.as_str());

            debug!(name = %name, node = %node_name, is_default, "Found audio input device");

            Some(AudioDevice {
                name,
                node_name,
                is_default,
            })
        })
        .collect();

    // Default first, then alphabetically
    devices.sort_by(|a, b| match (a.is_default, b.is_default) {
        (true, false) => std::cmp::Ordering::Less,
        (false, true) => std::cmp::Ordering::Greater,
        _ => a.name.cmp(&b.name),
    });

    devices
}

/// Find the default audio source node name from the PipeWire metadata
fn find_default_source(nodes: &[serde_json::Value]) -> Option<String> {
    let metadata_node = nodes.iter().find(|node| {
        node.get("type").and_then(|v| v.as_str()) == Some("PipeWire:Interface:Metadata")
            && node
                .get("props")
                .and_then(|p| p.get("metadata.name"))
                .and_then(|v| v.as_str())
                == Some("default")
    })?;

    let entries = metadata_node.get("metadata")?.as_array()?;
    for entry in entries {
        let key = entry.get("key").and_then(|v| v.as_str());
        if key == Some("default.audio.source") || key == Some("default.configured.audio.source") {
            if let Some(name) = entry
                .get("value")
                .and_then(|v| v.get("name"))
                .and_then(|v| v.as_str())
            {
                debug!(default_source = %name, "Found default audio source");
                return Some(name.to_string());
            }
        }
    }

    None
}

/// Microphone level monitor
///
/// A small audio pipeline whose only output is a stream of normalized
/// RMS levels on a channel; nothing is recorded. Dropping the monitor
/// releases the microphone.
pub struct MicMonitor {
    pipeline: gstreamer::Pipeline,
    live: bool,
}

impl MicMonitor {
    /// Open the monitor against a specific PipeWire node, or the
    /// default source when `target` is `None`.
    pub fn open(target: Option<&str>, sender: LevelSender) -> Result<Self, AudioError> {
        gstreamer::init().map_err(|e| AudioError::MonitorFailed(e.to_string()))?;

        let source = match target {
            Some(node) if !node.is_empty() => format!("pipewiresrc target-object={}", node),
            _ => "autoaudiosrc".to_string(),
        };

        let description = format!(
            "{} ! audioconvert ! level post-messages=true interval={} ! fakesink sync=false",
            source,
            waveform::LEVEL_INTERVAL_NS
        );
        debug!(pipeline = %description, "Launching level monitor");

        let pipeline = gstreamer::parse::launch(&description)
            .map_err(|e| AudioError::MonitorFailed(e.to_string()))?
            .downcast::<gstreamer::Pipeline>()
            .map_err(|_| AudioError::MonitorFailed("Monitor element is not a bin".to_string()))?;

        let bus = pipeline
            .bus()
            .ok_or_else(|| AudioError::MonitorFailed("Monitor pipeline has no bus".to_string()))?;

        // The level element posts one message per interval; convert the
        // channel average from dB to a 0..1 amplitude for the bars.
        bus.set_sync_handler(move |_, msg| {
            if let gstreamer::MessageView::Element(element) = msg.view()
                && let Some(s) = element.structure()
                && s.name() == "level"
                && let Ok(rms) = s.get::<gstreamer::List>("rms")
            {
                let mut sum = 0.0f64;
                let mut channels = 0usize;
                for value in rms.iter() {
                    if let Ok(db) = value.get::<f64>() {
                        sum += db;
                        channels += 1;
                    }
                }

                if channels > 0 {
                    let db = sum / channels as f64;
                    let level = 10f64.powf(db / 20.0).clamp(0.0, 1.0) as f32;
                    let mut sender = sender.clone();
                    let _ = sender.try_send(level);
                }
            }

            gstreamer::BusSyncReply::Drop
        });

        pipeline
            .set_state(gstreamer::State::Playing)
            .map_err(|e| AudioError::MonitorFailed(e.to_string()))?;

        info!("Microphone level monitor running");

        Ok(Self {
            pipeline,
            live: true,
        })
    }

    fn shutdown(&mut self) {
        if !self.live {
            return;
        }

        info!("Stopping microphone level monitor");

        if let Some(bus) = self.pipeline.bus() {
            bus.unset_sync_handler();
        }
        if let Err(e) = self.pipeline.set_state(gstreamer::State::Null) {
            warn!(error = ?e, "Failed to stop level monitor cleanly");
        }

        self.live = false;
    }
}

impl Drop for MicMonitor {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Ask the desktop portal for microphone access
///
/// Distinguishes an explicit refusal (`PermissionDenied`) from a
/// portal that cannot be reached at all (`PortalUnavailable`).
pub async fn request_microphone_access() -> Result<(), AudioError> {
    use futures::StreamExt;
    use zbus::zvariant::Value;

    let connection = zbus::Connection::session().await.map_err(portal_err)?;

    // The portal replies through a Request object at a predictable
    // path; subscribe before calling so the response cannot be missed.
    let unique = connection
        .unique_name()
        .ok_or_else(|| AudioError::PortalUnavailable("no unique bus name".to_string()))?;
    let sender_token = unique.as_str().trim_start_matches(':').replace('.', "_");
    let handle_token = "echify_mic";
    let request_path = format!(
        "/org/freedesktop/portal/desktop/request/{}/{}",
        sender_token, handle_token
    );

    let request = zbus::Proxy::new(
        &connection,
        "org.freedesktop.portal.Desktop",
        request_path.as_str(),
        "org.freedesktop.portal.Request",
    )
    .await
    .map_err(portal_err)?;

    let mut responses = request.receive_signal("Response").await.map_err(portal_err)?;

    let mut options: HashMap<&str, Value> = HashMap::new();
    options.insert("handle_token", Value::from(handle_token));

    connection
        .call_method(
            Some("org.freedesktop.portal.Desktop"),
            "/org/freedesktop/portal/desktop",
            Some("org.freedesktop.portal.Device"),
            "AccessDevice",
            &(std::process::id(), vec!["microphone"], options),
        )
        .await
        .map_err(portal_err)?;

    let message = responses.next().await.ok_or_else(|| {
        AudioError::PortalUnavailable("request closed without a response".to_string())
    })?;

    let (code, _results): (u32, HashMap<String, zbus::zvariant::OwnedValue>) =
        message.body().deserialize().map_err(portal_err)?;

    info!(code, "Microphone permission response");
    if code == 0 {
        Ok(())
    } else {
        Err(AudioError::PermissionDenied)
    }
}

fn portal_err<E: std::fmt::Display>(err: E) -> AudioError {
    AudioError::PortalUnavailable(err.to_string())
}
