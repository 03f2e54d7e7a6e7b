// SPDX-License-Identifier: GPL-3.0-only

//! Camera enumeration and device selection
//!
//! Devices are discovered through the PipeWire node list (`pw-cli`).
//! Selection prefers the external bridge camera, identified by a
//! case-insensitive marker substring in the device label, and falls
//! back to the first video input in enumeration order.

use super::types::{CameraDevice, DeviceKind};
use crate::errors::CameraError;
use gstreamer::prelude::*;
use tracing::{debug, info, warn};

/// Enumerate media input devices from the PipeWire node list
///
/// Returns an empty list when PipeWire is unreachable; the caller
/// turns that into a device-not-found error.
pub fn enumerate_devices() -> Vec<CameraDevice> {
    debug!("Enumerating devices via pw-cli");

    let output = match std::process::Command::new("pw-cli")
        .args(["ls", "Node"])
        .output()
    {
        Ok(output) => output,
        Err(e) => {
            warn!(error = %e, "Failed to run pw-cli");
            return Vec::new();
        }
    };

    if !output.status.success() {
        warn!("pw-cli command failed");
        return Vec::new();
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    parse_node_list(&stdout)
}

/// Parse `pw-cli ls Node` output into devices
///
/// Node properties arrive line by line after each `id N,` header, so
/// this runs as a small accumulator that flushes on every new header
/// and at end of input.
pub fn parse_node_list(listing: &str) -> Vec<CameraDevice> {
    let mut devices = Vec::new();

    let mut current_id: Option<String> = None;
    let mut current_serial: Option<String> = None;
    let mut current_label: Option<String> = None;
    let mut current_kind: Option<DeviceKind> = None;

    let mut flush = |id: &mut Option<String>,
                     serial: &mut Option<String>,
                     label: &mut Option<String>,
                     kind: &mut Option<DeviceKind>,
                     devices: &mut Vec<CameraDevice>| {
        if let (Some(node_id), Some(kind)) = (id.take(), kind.take()) {
            // object.serial is the stable PipeWire target; node id works too
            let target = serial.take().unwrap_or(node_id);
            let label = label.take().unwrap_or_default();
            debug!(id = %target, label = %label, ?kind, "Found media node");
            devices.push(CameraDevice {
                id: target,
                label,
                kind,
            });
        } else {
            *serial = None;
            *label = None;
            *kind = None;
        }
    };

    for line in listing.lines() {
        let trimmed = line.trim();

        // Node header, e.g. `id 76, type PipeWire:Interface:Node/3`
        if trimmed.starts_with("id ") && trimmed.contains("type PipeWire:Interface:Node") {
            flush(
                &mut current_id,
                &mut current_serial,
                &mut current_label,
                &mut current_kind,
                &mut devices,
            );

            if let Some(id_str) = trimmed.strip_prefix("id ")
                && let Some(id_num) = id_str.split(',').next()
            {
                current_id = Some(id_num.trim().to_string());
            }
        }

        if trimmed.contains("media.class")
            && let Some(class) = extract_quoted_value(trimmed)
        {
            current_kind = Some(match class.as_str() {
                "Video/Source" => DeviceKind::VideoInput,
                "Audio/Source" => DeviceKind::AudioInput,
                _ => DeviceKind::Other,
            });
        }

        if trimmed.contains("object.serial")
            && let Some(value) = extract_quoted_value(trimmed)
        {
            current_serial = Some(value);
        }

        if trimmed.contains("node.description")
            && let Some(value) = extract_quoted_value(trimmed)
        {
            current_label = Some(value);
        }
    }

    flush(
        &mut current_id,
        &mut current_serial,
        &mut current_label,
        &mut current_kind,
        &mut devices,
    );

    devices
}

/// Extract the value between the first pair of double quotes
fn extract_quoted_value(line: &str) -> Option<String> {
    let start = line.find('"')? + 1;
    let end = line[start..].find('"')? + start;
    Some(line[start..end].to_string())
}

/// Select one video input from the enumerated devices
///
/// The first device whose label contains `marker` (case-insensitive)
/// wins regardless of position; otherwise the first video input in
/// enumeration order; otherwise the device-not-found error.
pub fn select_device<'a>(
    devices: &'a [CameraDevice],
    marker: &str,
) -> Result<&'a CameraDevice, CameraError> {
    let video_inputs = || devices.iter().filter(|d| d.kind == DeviceKind::VideoInput);

    let marker = marker.to_lowercase();
    let bridge = (!marker.is_empty())
        .then(|| video_inputs().find(|d| d.label.to_lowercase().contains(&marker)))
        .flatten();

    bridge
        .or_else(|| video_inputs().next())
        .ok_or(CameraError::DeviceNotFound)
}

/// Whether video input labels are still redacted
///
/// Some platforms only populate device labels after the first stream
/// grant of the session. Redacted means: at least one video input
/// exists and none of them carries a label.
pub fn labels_redacted(devices: &[CameraDevice]) -> bool {
    let mut video_inputs = devices
        .iter()
        .filter(|d| d.kind == DeviceKind::VideoInput)
        .peekable();

    video_inputs.peek().is_some() && video_inputs.all(|d| d.label.is_empty())
}

/// Throwaway generic acquisition that unlocks device labels
///
/// Opens the default video source briefly and releases it immediately;
/// the platform populates labels once any stream has been granted in
/// the session. Best effort: a failure here only means selection falls
/// back to label-less enumeration order.
fn unlock_labels() {
    info!("Labels redacted, performing unlock acquisition");

    if gstreamer::init().is_err() {
        warn!("GStreamer init failed, skipping unlock acquisition");
        return;
    }

    let pipeline = match gstreamer::parse::launch("pipewiresrc ! fakesink") {
        Ok(p) => p,
        Err(e) => {
            warn!(error = %e, "Failed to build unlock pipeline");
            return;
        }
    };

    if pipeline.set_state(gstreamer::State::Playing).is_ok() {
        // Wait for the grant to land, then release the tracks right away
        let _ = pipeline.state(gstreamer::ClockTime::from_seconds(2));
    }

    let _ = pipeline.set_state(gstreamer::State::Null);
}

/// Full device acquisition: enumerate, unlock labels if needed, select
///
/// This is the enumeration half of a start action. Runs the unlock
/// acquisition at most once per call.
pub fn acquire_device(marker: &str) -> Result<CameraDevice, CameraError> {
    let mut devices = enumerate_devices();

    if labels_redacted(&devices) {
        unlock_labels();
        devices = enumerate_devices();
    }

    let selected = select_device(&devices, marker)?.clone();
    info!(id = %selected.id, label = %selected.label, "Selected camera");
    Ok(selected)
}
