//! Sphere-fit calibration run against the mock

use crate::common::{MockDelay, MockInterface, assert_float_eq, create_running_driver};
use msa301::registers::{REG_INT_SET_1, REG_OFFSET_X, REG_SWAP_POLARITY};
use msa301::{
    AxesConfigUpdate, CalibrationStage, Error, Msa301Driver, OffsetsUpdate, OutputDataRate,
    PowerMode, Range, Resolution, Units,
};

const SETTLE_MS: u32 = 1500;

/// 100 identical samples per orientation: ±1g on one axis plus a raw bias
fn orientation_sequence(bias: [i16; 3], orientations: [[i16; 3]; 4]) -> Vec<[i16; 3]> {
    orientations
        .iter()
        .flat_map(|o| {
            let sample = [o[0] + bias[0], o[1] + bias[1], o[2] + bias[2]];
            std::iter::repeat_n(sample, 100)
        })
        .collect()
}

const CUBE: [[i16; 3]; 4] = [
    [16384, 0, 0],
    [-16384, 0, 0],
    [0, 16384, 0],
    [0, 0, 16384],
];

/// Put the driver in a state that differs from the calibration settings
fn configure_away_from_defaults(driver: &mut Msa301Driver<MockInterface>) {
    driver.set_range(Range::G8).unwrap();
    driver.set_resolution(Resolution::Bits10).unwrap();
    driver.set_output_data_rate(OutputDataRate::Ms64).unwrap();
    driver.set_power_mode(PowerMode::LowPower).unwrap();
    driver.set_units(Units::Si);
    driver.set_sample_averaging(3).unwrap();
    driver
        .update_axes_config(&AxesConfigUpdate {
            x_axis_invert: Some(true),
            ..Default::default()
        })
        .unwrap();
    driver
        .set_offsets(&OffsetsUpdate {
            x: Some(7.8125),
            ..Default::default()
        })
        .unwrap();
}

fn assert_settings_restored(driver: &mut Msa301Driver<MockInterface>, mock: &MockInterface) {
    assert_eq!(driver.range().unwrap(), Range::G8);
    assert_eq!(driver.resolution().unwrap(), Resolution::Bits10);
    assert_eq!(driver.output_data_rate().unwrap(), OutputDataRate::Ms64);
    assert_eq!(driver.power_mode().unwrap(), PowerMode::LowPower);
    assert_eq!(driver.units(), Units::Si);
    assert_eq!(driver.sample_averaging(), 3);
    assert!(!driver.interrupt_enable().unwrap().new_data);
    assert_eq!(mock.get_register(REG_INT_SET_1), 0);
    assert_eq!(mock.get_register(REG_SWAP_POLARITY), 0b0000_1000);
    assert_eq!(mock.get_register(REG_OFFSET_X), 2);

    let expected = Range::G8.scale_factor() * Units::Si.factor() / 3.0;
    assert_float_eq(driver.combined_factor(), expected, 1e-15);
}

#[test]
fn test_calibration_recovers_bias() {
    let (mut driver, mock) = create_running_driver();
    mock.set_accel_sequence(orientation_sequence([820, -492, 328], CUBE));
    let mut delay = MockDelay::default();

    let report = driver.calibrate_offsets(&mut delay, SETTLE_MS, |_| {}).unwrap();

    assert_float_eq(report.offsets_mg.x, -50.048_828_125, 1e-6);
    assert_float_eq(report.offsets_mg.y, 30.029_296_875, 1e-6);
    assert_float_eq(report.offsets_mg.z, -20.019_531_25, 1e-6);

    // Constant samples carry no noise
    assert!(report.uncertainty_mg.length() < 1e-9);
    assert!(report.is_precise());
    assert!(report.fits_hardware());
    assert!((0.0..1.0).contains(&report.score));

    assert_eq!(delay.total_ms, 4 * u64::from(SETTLE_MS));
}

#[test]
fn test_calibration_offsets_are_not_applied() {
    let (mut driver, mock) = create_running_driver();
    mock.set_accel_sequence(orientation_sequence([820, -492, 328], CUBE));

    let report = driver
        .calibrate_offsets(&mut MockDelay::default(), SETTLE_MS, |_| {})
        .unwrap();
    assert_eq!(mock.get_register(REG_OFFSET_X), 0);

    let offsets = report.hardware_offsets().unwrap();
    driver.set_offsets(&offsets).unwrap();
    // -50.05 mg truncates to -12 LSB
    assert_eq!(mock.get_register(REG_OFFSET_X), (-12i8).to_ne_bytes()[0]);
    assert_float_eq(driver.offsets().unwrap().x, -46.875, 1e-9);
}

#[test]
fn test_calibration_restores_settings() {
    let (mut driver, mock) = create_running_driver();
    configure_away_from_defaults(&mut driver);
    mock.set_accel_sequence(orientation_sequence([0, 0, 0], CUBE));

    driver
        .calibrate_offsets(&mut MockDelay::default(), SETTLE_MS, |_| {})
        .unwrap();

    assert_settings_restored(&mut driver, &mock);
}

#[test]
fn test_calibration_stage_order() {
    let (mut driver, mock) = create_running_driver();
    mock.set_accel_sequence(orientation_sequence([0, 0, 0], CUBE));
    let mut stages = Vec::new();

    driver
        .calibrate_offsets(&mut MockDelay::default(), SETTLE_MS, |stage| {
            stages.push(stage);
        })
        .unwrap();

    assert_eq!(
        stages,
        vec![
            CalibrationStage::Configuring,
            CalibrationStage::Sampling(0),
            CalibrationStage::Sampling(1),
            CalibrationStage::Sampling(2),
            CalibrationStage::Sampling(3),
            CalibrationStage::Fitting,
            CalibrationStage::Reporting,
            CalibrationStage::Restoring,
            CalibrationStage::Idle,
        ]
    );
}

#[test]
fn test_coplanar_orientations_fail_and_restore() {
    let (mut driver, mock) = create_running_driver();
    configure_away_from_defaults(&mut driver);
    let flat = [
        [16384, 0, 0],
        [-16384, 0, 0],
        [0, 16384, 0],
        [0, -16384, 0],
    ];
    mock.set_accel_sequence(orientation_sequence([0, 0, 0], flat));
    let mut stages = Vec::new();

    let result =
        driver.calibrate_offsets(&mut MockDelay::default(), SETTLE_MS, |s| stages.push(s));

    assert!(matches!(result, Err(Error::DegenerateGeometry)));
    assert!(!stages.contains(&CalibrationStage::Reporting));
    assert_eq!(
        &stages[stages.len() - 2..],
        &[CalibrationStage::Restoring, CalibrationStage::Idle]
    );
    assert_settings_restored(&mut driver, &mock);
}

#[test]
fn test_sampling_timeout_restores_settings() {
    let (mut driver, mock) = create_running_driver();
    configure_away_from_defaults(&mut driver);
    driver.set_data_ready_poll_limit(Some(3));
    mock.set_data_ready(false);
    let mut stages = Vec::new();

    let result =
        driver.calibrate_offsets(&mut MockDelay::default(), SETTLE_MS, |s| stages.push(s));

    assert!(matches!(result, Err(Error::DataReadyTimeout)));
    assert_eq!(
        stages,
        vec![
            CalibrationStage::Configuring,
            CalibrationStage::Sampling(0),
            CalibrationStage::Restoring,
            CalibrationStage::Idle,
        ]
    );
    assert_settings_restored(&mut driver, &mock);
}

#[test]
fn test_failed_restore_step_still_restores_the_rest() {
    let (mut driver, mock) = create_running_driver();
    configure_away_from_defaults(&mut driver);
    mock.set_accel_sequence(orientation_sequence([0, 0, 0], CUBE));
    let bus = mock.clone();

    // The first restore write (resolution) fails
    let result = driver.calibrate_offsets(&mut MockDelay::default(), SETTLE_MS, |stage| {
        if stage == CalibrationStage::Restoring {
            bus.fail_next_write();
        }
    });

    assert!(matches!(result, Err(Error::Bus(_))));
    assert_eq!(mock.get_register(REG_OFFSET_X), 2);
    assert_eq!(mock.get_register(REG_SWAP_POLARITY), 0b0000_1000);
    assert_eq!(driver.power_mode().unwrap(), PowerMode::LowPower);
    assert_eq!(driver.range().unwrap(), Range::G8);
    assert_eq!(driver.output_data_rate().unwrap(), OutputDataRate::Ms64);
    assert_eq!(driver.sample_averaging(), 3);
    assert_eq!(mock.get_register(REG_INT_SET_1), 0);
}
