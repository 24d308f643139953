//! End-to-end tests: scripted device, real driver, recording backend

use std::time::Duration;
use touch_cursor::backend::{CursorEvent, MockCursorBackend};
use touch_cursor::device::{DeviceInfo, MockInputSource};
use touch_cursor::manager::{DriverError, TouchDriver};
use touch_cursor::{CalibrationMatrix, DriverConfig, RawEvent, RetryPolicy};

type Driver = TouchDriver<MockInputSource, MockCursorBackend>;

fn init_logging() {
    let _ = env_logger::builder()
        .is_test(true)
        .filter_level(log::LevelFilter::Debug)
        .try_init();
}

fn panel() -> DeviceInfo {
    DeviceInfo::new("/dev/input/event1", "FT5406 memory based driver")
}

fn setup(config: DriverConfig) -> (Driver, MockInputSource, MockCursorBackend) {
    init_logging();
    let source = MockInputSource::new(vec![DeviceInfo::new("/dev/input/event0", "gpio-keys"), panel()]);
    let backend = MockCursorBackend::new();
    let mut driver = TouchDriver::new(config, source.clone(), backend.clone()).unwrap();
    driver.start();
    driver.process_pending();
    (driver, source, backend)
}

fn feed(driver: &mut Driver, source: &MockInputSource, batch: Vec<RawEvent>) {
    assert!(source.inject(batch));
    driver.process_pending();
}

#[test]
fn tap_produces_press_then_release() {
    let (mut driver, source, backend) = setup(DriverConfig::new("FT5406"));

    feed(&mut driver, &source, vec![RawEvent::AxisX(100), RawEvent::AxisY(200)]);
    backend.take_events();

    feed(&mut driver, &source, vec![RawEvent::Touch(true)]);
    feed(&mut driver, &source, vec![RawEvent::Touch(false)]);

    assert_eq!(
        backend.events(),
        vec![CursorEvent::press((100.0, 200.0)), CursorEvent::release((100.0, 200.0))]
    );
    let pointer = &driver.state().pointer;
    assert_eq!(pointer.mouse_x, None);
    assert_eq!(pointer.mouse_y, None);
    assert_eq!(pointer.mouse_event, None);
}

#[test]
fn full_touch_sequence_with_calibration() {
    // x' = x / 2, y' = y / 2 + 10
    let matrix = CalibrationMatrix::new(0.5, 0.0, 0.0, 0.0, 0.5, 10.0).unwrap();
    let (mut driver, source, backend) = setup(DriverConfig::new("FT5406").with_calibration(matrix));

    // Finger down
    feed(
        &mut driver,
        &source,
        vec![RawEvent::TrackingId(0), RawEvent::AxisX(400), RawEvent::AxisY(300), RawEvent::Touch(true)],
    );
    // Drag
    feed(&mut driver, &source, vec![RawEvent::AxisX(420), RawEvent::AxisY(310)]);
    // Finger up, no coordinates in the frame
    feed(&mut driver, &source, vec![RawEvent::Touch(false)]);

    assert_eq!(
        backend.events(),
        vec![
            CursorEvent::press((200.0, 160.0)),
            CursorEvent::move_to((210.0, 165.0)),
            CursorEvent::release((210.0, 165.0)),
        ]
    );
    assert!(!driver.state().tracker.is_touching());
    assert!(driver.state().tracker.is_empty());
}

#[test]
fn begin_and_end_in_one_frame_press_only() {
    let (mut driver, source, backend) = setup(DriverConfig::new("FT5406"));

    feed(&mut driver, &source, vec![RawEvent::AxisX(10), RawEvent::AxisY(20)]);
    backend.take_events();

    // One transition per frame: the press is kept, the release is lost
    feed(&mut driver, &source, vec![RawEvent::Touch(true), RawEvent::Touch(false)]);
    assert_eq!(backend.take_events(), vec![CursorEvent::press((10.0, 20.0))]);
    assert_eq!(driver.state().pointer.position(), Some((10, 20)));
    assert_eq!(driver.state().pointer.mouse_event, None);
    assert!(!driver.state().tracker.is_touching());

    // The next touch-end frame releases and clears
    feed(&mut driver, &source, vec![RawEvent::Touch(false)]);
    assert_eq!(backend.events(), vec![CursorEvent::release((10.0, 20.0))]);
    assert_eq!(driver.state().pointer.position(), None);
}

#[test]
fn moves_reuse_last_known_coordinate() {
    let (mut driver, source, backend) = setup(DriverConfig::new("FT5406"));

    feed(&mut driver, &source, vec![RawEvent::AxisX(10), RawEvent::AxisY(20)]);
    feed(&mut driver, &source, vec![RawEvent::AxisX(15)]);

    assert_eq!(
        backend.events(),
        vec![CursorEvent::move_to((10.0, 20.0)), CursorEvent::move_to((15.0, 20.0))]
    );
}

#[test]
fn release_without_position_emits_nothing() {
    let (mut driver, source, backend) = setup(DriverConfig::new("FT5406"));

    feed(&mut driver, &source, vec![RawEvent::AxisX(10)]);
    feed(&mut driver, &source, vec![RawEvent::Touch(false)]);

    assert!(backend.events().is_empty());
    assert_eq!(driver.state().pointer.mouse_x, None);
    assert_eq!(driver.state().pointer.mouse_event, None);
}

#[test]
fn keepalive_batches_are_inert() {
    let (mut driver, source, backend) = setup(DriverConfig::new("FT5406"));
    feed(&mut driver, &source, vec![RawEvent::AxisX(10), RawEvent::AxisY(20)]);
    backend.take_events();
    let before = driver.state().pointer.clone();

    for _ in 0..3 {
        feed(&mut driver, &source, vec![RawEvent::FingerCount(0)]);
    }

    assert!(backend.events().is_empty());
    assert_eq!(driver.state().pointer, before);
}

#[test]
fn secondary_finger_does_not_move_pointer() {
    let (mut driver, source, backend) = setup(DriverConfig::new("FT5406"));
    feed(&mut driver, &source, vec![RawEvent::AxisX(10), RawEvent::AxisY(20)]);
    backend.take_events();

    // Second finger lands: leading slot marker only bumps the estimate
    feed(&mut driver, &source, vec![RawEvent::FingerCount(1), RawEvent::TrackingId(1), RawEvent::AxisX(500)]);
    assert_eq!(driver.state().pointer.finger_count, 1);

    // Frame trailed by the secondary slot marker
    feed(&mut driver, &source, vec![RawEvent::AxisX(510), RawEvent::AxisY(90), RawEvent::FingerCount(1)]);

    assert!(backend.events().is_empty());
    assert_eq!(driver.state().pointer.position(), Some((10, 20)));
}

#[test]
fn malformed_calibration_behaves_as_identity() {
    let config = DriverConfig::from_toml_str(
        r#"
        device = "FT5406"
        calibration = [[1, 0, "oops"], [0, 1, 0]]
        "#,
    )
    .unwrap();
    assert!(config.calibration.is_none());

    let (mut driver, source, backend) = setup(config);
    feed(&mut driver, &source, vec![RawEvent::AxisX(33), RawEvent::AxisY(44)]);
    assert_eq!(backend.events(), vec![CursorEvent::move_to((33.0, 44.0))]);
}

#[test]
fn resolves_after_device_appears() {
    init_logging();
    let source = MockInputSource::new(Vec::new());
    let config = DriverConfig::new("FT5406")
        .with_retry(RetryPolicy { delay: Duration::from_millis(5), max_attempts: None });
    let mut driver = TouchDriver::new(config, source.clone(), MockCursorBackend::new()).unwrap();
    driver.start();
    driver.process_pending();
    assert!(!driver.state().is_attached());

    source.add_device(panel());
    assert!(driver.process_next(Duration::from_secs(2)));
    assert!(driver.state().is_attached());
    assert_eq!(source.attach_count(), 1);
}

#[test]
fn threaded_driver_answers_stats_and_stops() {
    init_logging();
    let source = MockInputSource::new(vec![panel()]);
    let backend = MockCursorBackend::new();
    let driver = TouchDriver::new(DriverConfig::new("FT5406"), source.clone(), backend.clone()).unwrap();
    let mut handle = driver.spawn().unwrap();

    // The stats round trip also proves the initial Resolve was handled
    assert!(matches!(handle.stats(), Err(DriverError::NotImplemented("stats"))));
    assert_eq!(source.attach_count(), 1);

    assert!(source.inject(vec![RawEvent::AxisX(1), RawEvent::AxisY(2)]));
    assert!(matches!(handle.stats(), Err(DriverError::NotImplemented(_))));
    assert_eq!(backend.events(), vec![CursorEvent::move_to((1.0, 2.0))]);

    handle.stop();
    assert!(!handle.is_running());
    assert!(matches!(handle.stats(), Err(DriverError::Stopped)));
}
