//! Configuration validation tests

use crate::common::{MockInterface, create_mock_driver};
use msa301::registers::{REG_OFFSET_X, REG_OFFSET_Y, REG_OFFSET_Z};
use msa301::{Error, Msa301Config, Msa301Driver, OffsetsUpdate, Range, Resolution, Units};

fn assert_validation<T: core::fmt::Debug>(
    result: Result<T, Error<crate::common::MockError>>,
    field: &str,
) {
    match result {
        Err(Error::Validation(e)) => assert_eq!(e.field, field),
        other => panic!("expected validation error for {field}, got {other:?}"),
    }
}

#[test]
fn test_offset_out_of_range_writes_nothing() {
    let (mut driver, mock) = create_mock_driver();
    mock.clear_operations();

    let update = OffsetsUpdate {
        x: Some(10.0),
        y: Some(500.0),
        z: Some(-10.0),
    };
    assert_validation(driver.set_offsets(&update), "y_offset");

    assert!(mock.written_addresses().is_empty());
    assert_eq!(mock.get_register(REG_OFFSET_X), 0);
}

#[test]
fn test_offset_range_boundaries() {
    let (mut driver, mock) = create_mock_driver();

    driver
        .set_offsets(&OffsetsUpdate::all(-500.0, 499.9, 0.0))
        .unwrap();

    assert_eq!(mock.get_register(REG_OFFSET_X), 0x80);
    assert_eq!(mock.get_register(REG_OFFSET_Y), 0x7F);
    assert_eq!(mock.get_register(REG_OFFSET_Z), 0x00);
}

#[test]
fn test_offset_rejects_nan() {
    let (mut driver, _mock) = create_mock_driver();
    let update = OffsetsUpdate {
        z: Some(f64::NAN),
        ..Default::default()
    };
    assert_validation(driver.set_offsets(&update), "z_offset");
}

#[test]
fn test_empty_offsets_update_is_noop() {
    let (mut driver, mock) = create_mock_driver();
    mock.clear_operations();

    driver.set_offsets(&OffsetsUpdate::default()).unwrap();

    assert!(mock.operations().is_empty());
}

#[test]
fn test_freefall_domains() {
    let (mut driver, mock) = create_mock_driver();
    mock.clear_operations();

    assert_validation(driver.set_fall_duration(1), "fall_duration");
    assert_validation(driver.set_fall_duration(514), "fall_duration");
    assert_validation(driver.set_fall_threshold(2000.0), "fall_threshold");
    assert_validation(driver.set_fall_threshold(-0.5), "fall_threshold");
    assert_validation(driver.set_fall_hysteresis(100), "fall_hysteresis");
    assert_validation(driver.set_fall_hysteresis(500), "fall_hysteresis");

    assert!(mock.written_addresses().is_empty());

    driver.set_fall_duration(2).unwrap();
    driver.set_fall_threshold(0.0).unwrap();
    driver.set_fall_hysteresis(375).unwrap();
}

#[test]
fn test_activity_and_tap_domains() {
    let (mut driver, mock) = create_mock_driver();
    mock.clear_operations();

    assert_validation(driver.set_active_duration(0), "active_duration");
    assert_validation(driver.set_active_duration(5), "active_duration");
    assert_validation(driver.set_active_threshold(0.5), "active_threshold");
    assert_validation(driver.set_tap_threshold(1.0), "tap_threshold");
    assert_validation(driver.set_tap_threshold(f64::NAN), "tap_threshold");

    assert!(mock.written_addresses().is_empty());

    driver.set_active_duration(4).unwrap();
    driver.set_active_threshold(0.499).unwrap();
    driver.set_tap_threshold(0.99).unwrap();
}

#[test]
fn test_orientation_domains() {
    let (mut driver, mock) = create_mock_driver();
    mock.clear_operations();

    assert_validation(driver.set_orient_hysteresis(500.0), "orient_hysteresis");
    assert_validation(driver.set_z_block_threshold(1000.0), "z_block_threshold");
    assert_validation(driver.set_z_block_threshold(-62.5), "z_block_threshold");

    assert!(mock.written_addresses().is_empty());
}

#[test]
fn test_sample_averaging_must_be_positive() {
    let (mut driver, _mock) = create_mock_driver();

    assert_validation(driver.set_sample_averaging(0), "sample_averaging");
    assert_eq!(driver.sample_averaging(), 1);

    driver.set_sample_averaging(8).unwrap();
    assert_eq!(driver.sample_averaging(), 8);
}

#[test]
fn test_zero_averaging_config_touches_nothing() {
    let mock = MockInterface::new();
    let config = Msa301Config {
        sample_averaging: 0,
        ..Default::default()
    };

    let result = Msa301Driver::with_config(mock.clone(), config);

    assert!(matches!(result, Err(Error::Validation(e)) if e.field == "sample_averaging"));
    assert!(mock.operations().is_empty());
}

#[test]
fn test_numeric_conversions() {
    let err = Resolution::try_from(16).unwrap_err();
    assert_eq!(err.domain, "8, 10, 12, 14 (bits)");
    assert_eq!(
        err.to_string(),
        "invalid resolution: allowed values are 8, 10, 12, 14 (bits)"
    );

    assert_eq!(Range::try_from(8), Ok(Range::G8));
    assert!(Range::try_from(32).is_err());

    assert_eq!("SI".parse::<Units>(), Ok(Units::Si));
    assert!("mg".parse::<Units>().is_err());
}
