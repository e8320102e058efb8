//! Interrupt and orientation status decoding

use crate::common::create_mock_driver;
use msa301::registers::{REG_MOTION_INT, REG_ORIENT_STATUS, REG_TAP_ACTIVE_STATUS};
use msa301::{MotionInterruptStatus, Orientation, TapActivityStatus};

#[test]
fn test_motion_interrupts() {
    let (mut driver, mock) = create_mock_driver();

    assert!(!driver.motion_interrupts().unwrap().any_set());

    mock.set_register(REG_MOTION_INT, 0b0010_0001);
    let status = driver.motion_interrupts().unwrap();
    assert_eq!(
        status,
        MotionInterruptStatus {
            single_tap: true,
            freefall: true,
            ..Default::default()
        }
    );
    assert!(status.any_set());
}

#[test]
fn test_tap_activity_status() {
    let (mut driver, mock) = create_mock_driver();
    mock.set_register(REG_TAP_ACTIVE_STATUS, 0b1010_0101);

    let status = driver.tap_activity_status().unwrap();

    assert_eq!(
        status,
        TapActivityStatus {
            tap_negative: true,
            tap_first_y: true,
            active_first_x: true,
            active_first_z: true,
            ..Default::default()
        }
    );
}

#[test]
fn test_orientation_status() {
    let (mut driver, mock) = create_mock_driver();

    let status = driver.orientation_status().unwrap();
    assert_eq!(status.orientation, Orientation::PortraitUpright);
    assert!(!status.z_downward);

    mock.set_register(REG_ORIENT_STATUS, 0b0110_0000);
    let status = driver.orientation_status().unwrap();
    assert_eq!(status.orientation, Orientation::LandscapeLeft);
    assert_eq!(status.ordinal(), 2);
    assert!(status.z_downward);

    // Reserved bits are ignored
    mock.set_register(REG_ORIENT_STATUS, 0b1011_1111);
    let status = driver.orientation_status().unwrap();
    assert_eq!(status.orientation, Orientation::LandscapeRight);
    assert!(!status.z_downward);
}
