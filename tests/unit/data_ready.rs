//! Data-ready polling, scaling and averaging

use crate::common::{MockInterface, assert_float_eq, create_running_driver};
use msa301::registers::{REG_DATA_INT, REG_INT_SET_1, REG_RES_RANGE};
use msa301::{Error, Msa301Config, Msa301Driver, Range, Units};

/// One LSB at ±2g in g
const LSB_2G: f64 = 0.061_035_156_25e-3;

fn driver_with_new_data_int(config: Msa301Config) -> (Msa301Driver<MockInterface>, MockInterface) {
    let mock = MockInterface::new();
    mock.set_register(REG_INT_SET_1, 0b0001_0000);
    let driver = Msa301Driver::with_config(mock.clone(), config).unwrap();
    (driver, mock)
}

#[test]
fn test_range_read_at_construction() {
    let mock = MockInterface::new();
    mock.set_register(REG_RES_RANGE, 0b01);

    let driver = Msa301Driver::new(mock).unwrap();

    assert_float_eq(driver.scale_factor(), 0.122_070_312_5, 1e-12);
    assert_float_eq(driver.combined_factor(), 1.220_703_125e-4, 1e-15);
}

#[test]
fn test_combined_factor_follows_settings() {
    let (mut driver, _mock) = create_running_driver();
    assert_float_eq(driver.combined_factor(), LSB_2G, 1e-15);

    driver.set_units(Units::Si);
    driver.set_sample_averaging(4).unwrap();
    driver.set_range(Range::G16).unwrap();

    let expected = 0.488_281_25 * 0.009_806_65 / 4.0;
    assert_float_eq(driver.combined_factor(), expected, 1e-15);
}

#[test]
fn test_read_raw_little_endian() {
    let (mut driver, mock) = create_running_driver();
    mock.set_accel_data(-1, i16::MIN, 16384);

    let raw = driver.read_raw().unwrap();

    assert_eq!((raw.x, raw.y, raw.z), (-1, i16::MIN, 16384));
    assert_eq!(mock.get_register(0x02), 0xFF);
    assert_eq!(mock.get_register(0x05), 0x80);
}

#[test]
fn test_averaging_sums_before_scaling() {
    let (mut driver, mock) = create_running_driver();
    mock.set_accel_sequence(vec![[100, -50, 0], [300, -150, 1]]);
    driver.set_sample_averaging(2).unwrap();

    let accel = driver.acceleration().unwrap();

    assert_float_eq(accel.x, 200.0 * LSB_2G, 1e-15);
    assert_float_eq(accel.y, -100.0 * LSB_2G, 1e-15);
    assert_float_eq(accel.z, 0.5 * LSB_2G, 1e-15);
}

#[test]
fn test_averaging_does_not_overflow() {
    let (mut driver, mock) = create_running_driver();
    mock.set_accel_data(i16::MAX, i16::MIN, i16::MAX);
    driver.set_sample_averaging(16).unwrap();

    let accel = driver.acceleration().unwrap();

    assert_float_eq(accel.x, f64::from(i16::MAX) * LSB_2G, 1e-12);
    assert_float_eq(accel.y, f64::from(i16::MIN) * LSB_2G, 1e-12);
}

#[test]
fn test_waits_for_new_data() {
    let (mut driver, mock) = driver_with_new_data_int(Msa301Config::default());
    mock.set_accel_data(100, 0, 0);
    mock.delay_data_ready(3);
    mock.clear_operations();

    let accel = driver.acceleration().unwrap();

    assert_float_eq(accel.x, 100.0 * LSB_2G, 1e-15);
    assert_eq!(mock.read_count(REG_DATA_INT), 4);
}

#[test]
fn test_poll_limit_times_out() {
    let config = Msa301Config {
        data_ready_poll_limit: Some(5),
        ..Default::default()
    };
    let (mut driver, mock) = driver_with_new_data_int(config);
    mock.set_data_ready(false);
    mock.clear_operations();

    let result = driver.acceleration();

    assert!(matches!(result, Err(Error::DataReadyTimeout)));
    assert_eq!(mock.read_count(REG_DATA_INT), 5);
    assert_eq!(mock.read_count(0x02), 0);
}

#[test]
fn test_poll_limit_can_be_lifted() {
    let (mut driver, mock) = driver_with_new_data_int(Msa301Config::default());
    driver.set_data_ready_poll_limit(Some(2));
    assert_eq!(driver.data_ready_poll_limit(), Some(2));

    mock.delay_data_ready(1);
    driver.wait_for_data().unwrap();

    mock.delay_data_ready(10);
    assert!(matches!(driver.wait_for_data(), Err(Error::DataReadyTimeout)));

    driver.set_data_ready_poll_limit(None);
    driver.wait_for_data().unwrap();
}
