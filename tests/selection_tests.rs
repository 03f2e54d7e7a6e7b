// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for camera enumeration and device selection

use echify::backends::camera::enumeration::{labels_redacted, parse_node_list, select_device};
use echify::backends::camera::{CameraDevice, DeviceKind};
use echify::errors::CameraError;

fn video(id: &str, label: &str) -> CameraDevice {
    CameraDevice {
        id: id.to_string(),
        label: label.to_string(),
        kind: DeviceKind::VideoInput,
    }
}

fn audio(id: &str, label: &str) -> CameraDevice {
    CameraDevice {
        id: id.to_string(),
        label: label.to_string(),
        kind: DeviceKind::AudioInput,
    }
}

#[test]
fn test_marker_match_wins_regardless_of_position() {
    let devices = vec![video("a", "USB Camera"), video("b", "Echify Bridge")];

    let selected = select_device(&devices, "Echify").expect("selection should succeed");
    assert_eq!(selected.id, "b", "Bridge camera should win over position");
}

#[test]
fn test_marker_match_is_case_insensitive() {
    let devices = vec![video("a", "USB Camera"), video("b", "ECHIFY bridge cam")];

    let selected = select_device(&devices, "echify").expect("selection should succeed");
    assert_eq!(selected.id, "b");

    let selected = select_device(&devices, "Echify").expect("selection should succeed");
    assert_eq!(selected.id, "b");
}

#[test]
fn test_fallback_to_first_video_input() {
    let devices = vec![video("a", "USB Camera")];

    let selected = select_device(&devices, "Echify").expect("selection should succeed");
    assert_eq!(selected.id, "a", "First video input should be the fallback");
}

#[test]
fn test_fallback_preserves_enumeration_order() {
    let devices = vec![
        video("a", "USB Camera"),
        video("b", "Laptop Webcam"),
        video("c", "Capture Card"),
    ];

    let selected = select_device(&devices, "Echify").expect("selection should succeed");
    assert_eq!(selected.id, "a");
}

#[test]
fn test_empty_device_list_fails_with_device_not_found() {
    let result = select_device(&[], "Echify");

    assert!(matches!(result, Err(CameraError::DeviceNotFound)));
    let message = result.unwrap_err().to_string();
    assert!(!message.is_empty(), "Error message must be user-visible");
}

#[test]
fn test_marker_only_matches_video_inputs() {
    // A microphone named after the bridge must not shadow the camera
    let devices = vec![audio("m", "Echify Mic"), video("a", "USB Camera")];

    let selected = select_device(&devices, "Echify").expect("selection should succeed");
    assert_eq!(selected.id, "a");
}

#[test]
fn test_audio_only_list_fails() {
    let devices = vec![audio("m", "Echify Mic")];

    assert!(matches!(
        select_device(&devices, "Echify"),
        Err(CameraError::DeviceNotFound)
    ));
}

#[test]
fn test_empty_marker_falls_back_to_first() {
    let devices = vec![video("a", "USB Camera"), video("b", "Echify Bridge")];

    let selected = select_device(&devices, "").expect("selection should succeed");
    assert_eq!(selected.id, "a", "Empty marker must not match every label");
}

#[test]
fn test_labels_redacted_detection() {
    assert!(
        labels_redacted(&[video("a", ""), video("b", "")]),
        "All-empty labels are redacted"
    );
    assert!(
        !labels_redacted(&[video("a", ""), video("b", "Echify Bridge")]),
        "One populated label means the platform reports labels"
    );
    assert!(
        !labels_redacted(&[]),
        "No devices means nothing to unlock"
    );
    assert!(
        !labels_redacted(&[audio("m", "")]),
        "Redaction only considers video inputs"
    );
}

#[test]
fn test_parse_node_list_extracts_video_sources() {
    let listing = r#"
	id 42, type PipeWire:Interface:Node/3
 		object.serial = "2146"
 		media.class = "Video/Source"
 		node.description = "Echify Bridge"
	id 43, type PipeWire:Interface:Node/3
 		object.serial = "2147"
 		media.class = "Audio/Source"
 		node.description = "Built-in Microphone"
	id 44, type PipeWire:Interface:Node/3
 		media.class = "Video/Source"
 		node.description = "USB Camera"
"#;

    let devices = parse_node_list(listing);
    assert_eq!(devices.len(), 3);

    assert_eq!(devices[0].id, "2146", "object.serial is the preferred id");
    assert_eq!(devices[0].label, "Echify Bridge");
    assert_eq!(devices[0].kind, DeviceKind::VideoInput);

    assert_eq!(devices[1].kind, DeviceKind::AudioInput);

    assert_eq!(devices[2].id, "44", "Node id is the fallback target");
    assert_eq!(devices[2].label, "USB Camera");

    let selected = select_device(&devices, "echify").expect("selection should succeed");
    assert_eq!(selected.id, "2146");
}

#[test]
fn test_parse_node_list_skips_nodes_without_media_class() {
    let listing = r#"
	id 30, type PipeWire:Interface:Node/3
 		node.description = "Dummy Driver"
	id 31, type PipeWire:Interface:Node/3
 		media.class = "Video/Source"
 		node.description = "USB Camera"
"#;

    let devices = parse_node_list(listing);
    assert_eq!(devices.len(), 1);
    assert_eq!(devices[0].label, "USB Camera");
}
