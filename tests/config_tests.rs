// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for configuration defaults

use echify::Config;
use echify::config::AppTheme;

#[test]
fn test_config_default() {
    let config = Config::default();

    assert_eq!(config.app_theme, AppTheme::System);
    assert!(
        !config.bridge_marker.is_empty(),
        "Bridge marker should have a default"
    );
}

#[test]
fn test_capture_format_default() {
    let config = Config::default();

    assert_eq!(config.capture_format.width, 640);
    assert_eq!(config.capture_format.height, 480);
    assert_eq!(config.capture_format.framerate, Some(30));
}

#[test]
fn test_capture_format_display() {
    let format = Config::default().capture_format;
    assert_eq!(format.to_string(), "640x480 @ 30fps");
}
