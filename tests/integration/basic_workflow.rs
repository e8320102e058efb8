//! Integration tests for basic driver workflows

use crate::common::{MockDelay, MockInterface, assert_float_eq};
use msa301::registers::{REG_ORIENT_HY, REG_PWR_MODE_BW, REG_RES_RANGE, RESET_DEFAULTS};
use msa301::{
    InterruptEnableUpdate, InterruptLatch, InterruptMapUpdate, Msa301Config, Msa301Driver,
    OutputDataRate, PowerMode, Range, Resolution, Units,
};

#[test]
fn test_initialization_and_reading() {
    let mock = MockInterface::new();
    mock.set_accel_data(100, 200, 300);
    let config = Msa301Config {
        power_mode: Some(PowerMode::Normal),
        range: Some(Range::G2),
        units: Units::G,
        ..Default::default()
    };

    let mut driver = Msa301Driver::with_config(mock.clone(), config).unwrap();
    let accel = driver.acceleration().unwrap();

    assert_float_eq(accel.x, 0.006_103_515_625, 1e-12);
    assert_float_eq(accel.y, 0.012_207_031_25, 1e-12);
    assert_float_eq(accel.z, 0.018_310_546_875, 1e-12);
}

#[test]
fn test_config_applied_at_construction() {
    let mock = MockInterface::new();
    let config = Msa301Config {
        power_mode: Some(PowerMode::Normal),
        resolution: Some(Resolution::Bits12),
        range: Some(Range::G16),
        output_data_rate: Some(OutputDataRate::Ms4),
        units: Units::Si,
        sample_averaging: 2,
        data_ready_poll_limit: Some(100),
    };

    let mut driver = Msa301Driver::with_config(mock.clone(), config).unwrap();

    assert_eq!(mock.get_register(REG_RES_RANGE), 0b0000_0111);
    assert_eq!(driver.power_mode().unwrap(), PowerMode::Normal);
    assert_eq!(driver.output_data_rate().unwrap(), OutputDataRate::Ms4);
    assert_eq!(driver.units(), Units::Si);
    assert_eq!(driver.sample_averaging(), 2);
    assert_eq!(driver.data_ready_poll_limit(), Some(100));
    assert_float_eq(driver.scale_factor(), 0.488_281_25, 1e-12);
}

#[test]
fn test_default_config_leaves_hardware_untouched() {
    let mock = MockInterface::new();
    let _driver = Msa301Driver::new(mock.clone()).unwrap();
    assert!(mock.written_addresses().is_empty());
}

#[test]
fn test_range_and_units_change_reading() {
    let mock = MockInterface::new();
    mock.set_accel_data(100, 200, 300);
    let mut driver = Msa301Driver::new(mock.clone()).unwrap();

    driver.set_range(Range::G4).unwrap();
    let accel = driver.acceleration().unwrap();
    assert_float_eq(accel.x, 0.012_207_031_25, 1e-12);

    driver.set_units(Units::Si);
    let accel = driver.acceleration().unwrap();
    assert_float_eq(accel.x, 12.207_031_25 * 0.009_806_65, 1e-12);
}

#[test]
fn test_reset_all_defaults() {
    let mock = MockInterface::new();
    let mut driver = Msa301Driver::new(mock.clone()).unwrap();
    driver.set_range(Range::G16).unwrap();
    driver.set_sample_averaging(4).unwrap();
    mock.clear_operations();

    driver.reset_all_defaults().unwrap();

    assert_eq!(mock.written_addresses().len(), RESET_DEFAULTS.len());
    assert_eq!(mock.get_register(REG_PWR_MODE_BW), 0x9E);
    assert_eq!(mock.get_register(REG_ORIENT_HY), 0x18);
    assert_eq!(driver.range().unwrap(), Range::G2);
    assert_eq!(driver.power_mode().unwrap(), PowerMode::Suspend);
    // Driver-side settings are kept
    assert_eq!(driver.sample_averaging(), 4);
    assert_float_eq(driver.scale_factor(), Range::G2.scale_factor(), 1e-12);
}

#[test]
fn test_complete_workflow() {
    let mock = MockInterface::new();
    let config = Msa301Config {
        power_mode: Some(PowerMode::Normal),
        data_ready_poll_limit: Some(1000),
        ..Default::default()
    };
    let mut driver = Msa301Driver::with_config(mock.clone(), config).unwrap();

    // Freefall on the INT pin, latched
    driver.set_fall_threshold(375.0).unwrap();
    driver.set_fall_duration(20).unwrap();
    driver
        .update_interrupt_enable(&InterruptEnableUpdate {
            freefall: Some(true),
            ..Default::default()
        })
        .unwrap();
    driver
        .update_interrupt_map(&InterruptMapUpdate {
            freefall: Some(true),
            ..Default::default()
        })
        .unwrap();
    driver.set_interrupt_latch(InterruptLatch::Latched).unwrap();

    // Calibrate and apply the hardware offsets
    let bias = [164i16, -82, 41];
    let orientations = [[16384i16, 0, 0], [0, 16384, 0], [0, 0, 16384], [-16384, 0, 0]];
    let sequence: Vec<[i16; 3]> = orientations
        .iter()
        .flat_map(|o| {
            std::iter::repeat_n([o[0] + bias[0], o[1] + bias[1], o[2] + bias[2]], 100)
        })
        .collect();
    mock.set_accel_sequence(sequence);

    let report = driver
        .calibrate_offsets(&mut MockDelay::default(), 10, |_| {})
        .unwrap();
    let offsets = report.hardware_offsets().unwrap();
    driver.set_offsets(&offsets).unwrap();

    let applied = driver.offsets().unwrap();
    assert_float_eq(applied.x, -7.8125, 1e-9);
    assert_float_eq(applied.y, 3.906_25, 1e-9);
    assert_float_eq(applied.z, 0.0, 1e-9);

    // Settings configured before calibration are still in place
    assert!(driver.interrupt_enable().unwrap().freefall);
    assert!(driver.interrupt_map().unwrap().freefall);
    assert_eq!(driver.interrupt_latch().unwrap(), InterruptLatch::Latched);
    assert_eq!(driver.fall_duration().unwrap(), 20);
}
