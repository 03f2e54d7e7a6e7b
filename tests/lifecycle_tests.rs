// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for the camera lifecycle state machine

use echify::{CameraLifecycle, CameraStatus, MediaTrack, StreamHandle};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Track whose liveness the test can observe after the handle moved
/// into the lifecycle
struct MockTrack {
    live: Arc<AtomicBool>,
}

impl MockTrack {
    fn new() -> (Self, Arc<AtomicBool>) {
        let live = Arc::new(AtomicBool::new(true));
        (
            Self {
                live: Arc::clone(&live),
            },
            live,
        )
    }
}

impl MediaTrack for MockTrack {
    fn stop(&mut self) {
        self.live.store(false, Ordering::SeqCst);
    }

    fn is_live(&self) -> bool {
        self.live.load(Ordering::SeqCst)
    }
}

#[test]
fn test_start_is_not_reentrant() {
    let mut camera = CameraLifecycle::default();

    let first = camera.begin();
    assert!(first.is_some(), "First start must begin an acquisition");

    // A second start while the first is still acquiring is a no-op,
    // not a queued retry
    assert_eq!(camera.begin(), None);
    assert_eq!(camera.status(), CameraStatus::Acquiring);

    let (track, _) = MockTrack::new();
    camera.activate(first.unwrap(), StreamHandle::single(track), "Cam".into());
    assert_eq!(camera.status(), CameraStatus::Active);

    // And while active
    assert_eq!(camera.begin(), None);
}

#[test]
fn test_stop_releases_every_track() {
    let mut camera = CameraLifecycle::default();
    let attempt = camera.begin().unwrap();

    let (track_a, live_a) = MockTrack::new();
    let (track_b, live_b) = MockTrack::new();
    camera.activate(
        attempt,
        StreamHandle::new(vec![Box::new(track_a), Box::new(track_b)]),
        "Cam".into(),
    );
    assert_eq!(camera.status(), CameraStatus::Active);

    let released = camera.stop().expect("stop must return the held handle");

    assert_eq!(camera.status(), CameraStatus::Idle);
    assert_eq!(released.live_tracks(), 0);
    assert!(!live_a.load(Ordering::SeqCst));
    assert!(!live_b.load(Ordering::SeqCst));

    // Stopping again is a no-op
    assert!(camera.stop().is_none());
    assert_eq!(camera.status(), CameraStatus::Idle);
}

#[test]
fn test_active_iff_handle_held() {
    let mut camera = CameraLifecycle::default();
    assert_eq!(camera.status(), CameraStatus::Idle);

    let attempt = camera.begin().unwrap();
    assert_eq!(camera.status(), CameraStatus::Acquiring);

    let (track, _) = MockTrack::new();
    camera.activate(attempt, StreamHandle::single(track), "Cam".into());
    assert_eq!(camera.status(), CameraStatus::Active);
    assert_eq!(camera.device_label(), Some("Cam"));

    camera.stop();
    assert_eq!(camera.status(), CameraStatus::Idle);
    assert_eq!(camera.device_label(), None);
}

#[test]
fn test_failure_enters_error_without_handle() {
    let mut camera = CameraLifecycle::default();
    let attempt = camera.begin().unwrap();

    camera.fail(attempt, "No camera devices found. Is the bridge running?".into());

    assert_eq!(camera.status(), CameraStatus::Error);
    let message = camera.error_message().expect("error message must be set");
    assert!(!message.is_empty());

    // Error holds no handle, so stop is a no-op and keeps the message
    assert!(camera.stop().is_none());
    assert_eq!(camera.status(), CameraStatus::Error);
    assert!(camera.error_message().is_some());
}

#[test]
fn test_retry_from_error_begins_fresh_attempt() {
    let mut camera = CameraLifecycle::default();
    let first = camera.begin().unwrap();
    camera.fail(first, "hardware busy".into());

    let second = camera.begin().expect("retry must begin a new attempt");
    assert!(second > first);
    assert_eq!(camera.status(), CameraStatus::Acquiring);
    assert_eq!(camera.error_message(), None, "Retry clears the old error");
}

#[test]
fn test_late_activation_after_stop_releases_handle() {
    let mut camera = CameraLifecycle::default();
    let attempt = camera.begin().unwrap();

    // Teardown lands while the acquisition is still in flight
    assert!(camera.stop().is_none());
    assert_eq!(camera.status(), CameraStatus::Idle);

    // The in-flight acquisition resolves afterwards; its handle must
    // be released immediately instead of being installed
    let (track, live) = MockTrack::new();
    camera.activate(attempt, StreamHandle::single(track), "Cam".into());

    assert_eq!(camera.status(), CameraStatus::Idle);
    assert!(!live.load(Ordering::SeqCst), "Late handle must be released");
}

#[test]
fn test_stale_failure_is_ignored() {
    let mut camera = CameraLifecycle::default();
    let attempt = camera.begin().unwrap();
    camera.stop();

    camera.fail(attempt, "too late".into());

    assert_eq!(camera.status(), CameraStatus::Idle);
    assert_eq!(camera.error_message(), None);
}

#[test]
fn test_dropping_handle_stops_tracks() {
    let (track, live) = MockTrack::new();
    let handle = StreamHandle::single(track);

    drop(handle);

    assert!(
        !live.load(Ordering::SeqCst),
        "An unreleased handle must stop its tracks on drop"
    );
}
