// SPDX-License-Identifier: GPL-3.0-only

//! Command-line camera listing

use echify::Config;
use echify::backends::camera::{DeviceKind, enumerate_devices, select_device};

/// List the enumerated cameras and mark the selected one
///
/// Uses the configured bridge marker unless one is passed explicitly.
pub fn list_cameras(marker: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let marker = marker.unwrap_or_else(|| Config::default().bridge_marker);

    let devices = enumerate_devices();
    let selected = select_device(&devices, &marker).ok().map(|d| d.id.clone());

    let cameras: Vec<_> = devices
        .iter()
        .filter(|d| d.kind == DeviceKind::VideoInput)
        .collect();

    if cameras.is_empty() {
        println!("No camera devices found. Is the bridge running?");
        return Ok(());
    }

    println!("Available cameras (marker: {:?}):", marker);
    for (index, device) in cameras.iter().enumerate() {
        let mark = if Some(&device.id) == selected.as_ref() {
            "*"
        } else {
            " "
        };
        let label = if device.label.is_empty() {
            "(unlabeled)"
        } else {
            device.label.as_str()
        };
        println!("{} {}: {} [{}]", mark, index, label, device.id);
    }

    Ok(())
}
