//! Boolean flag groups: axes, interrupt enable/map and pin configuration

use crate::common::{MockInterface, create_mock_driver};
use msa301::registers::{
    REG_DATA_INT, REG_INT_CONFIG, REG_INT_MAP_0, REG_INT_MAP_1, REG_INT_SET_0, REG_INT_SET_1,
    REG_ODR_AXIS, REG_SWAP_POLARITY,
};
use msa301::{
    AxesConfig, AxesConfigUpdate, InterruptEnableUpdate, InterruptMapUpdate, InterruptPinUpdate,
    Msa301Driver,
};

#[test]
fn test_axes_update_touches_only_named_flag() {
    let (mut driver, mock) = create_mock_driver();
    mock.set_register(REG_ODR_AXIS, 0x0F);
    mock.set_register(REG_SWAP_POLARITY, 0x05);
    mock.clear_operations();

    driver
        .update_axes_config(&AxesConfigUpdate {
            y_axis_disable: Some(true),
            ..Default::default()
        })
        .unwrap();

    assert_eq!(mock.get_register(REG_ODR_AXIS), 0x4F);
    assert_eq!(mock.written_addresses(), vec![REG_ODR_AXIS]);

    let axes = driver.axes_config().unwrap();
    assert_eq!(
        axes,
        AxesConfig {
            y_axis_disable: true,
            y_axis_invert: true,
            xy_swap: true,
            ..Default::default()
        }
    );
}

#[test]
fn test_axes_query_reads_each_register_once() {
    let (mut driver, mock) = create_mock_driver();
    mock.clear_operations();

    driver.axes_config().unwrap();

    assert_eq!(mock.read_count(REG_ODR_AXIS), 1);
    assert_eq!(mock.read_count(REG_SWAP_POLARITY), 1);
    assert_eq!(mock.operations().len(), 2);
}

#[test]
fn test_axes_update_spanning_two_registers() {
    let (mut driver, mock) = create_mock_driver();
    mock.set_register(REG_ODR_AXIS, 0b1110_0111);
    mock.set_register(REG_SWAP_POLARITY, 0b0000_1111);

    driver
        .update_axes_config(&AxesConfigUpdate::identity())
        .unwrap();

    // Output data rate bits survive
    assert_eq!(mock.get_register(REG_ODR_AXIS), 0b0000_0111);
    assert_eq!(mock.get_register(REG_SWAP_POLARITY), 0);
    assert!(driver.axes_config().unwrap().is_identity());
}

#[test]
fn test_empty_update_is_noop() {
    let (mut driver, mock) = create_mock_driver();
    mock.clear_operations();

    driver
        .update_axes_config(&AxesConfigUpdate::default())
        .unwrap();
    driver
        .update_interrupt_enable(&InterruptEnableUpdate::default())
        .unwrap();

    assert!(mock.operations().is_empty());
}

#[test]
fn test_unknown_flag_name() {
    let mut update = AxesConfigUpdate::default();
    let err = update.set_flag("w_axis_disable", true).unwrap_err();
    assert_eq!(err.group, "axes");
    assert!(err.available.contains(&"xy_swap"));
    assert!(update.is_empty());

    let mut update = InterruptEnableUpdate::default();
    let err = update.set_flag("tap", true).unwrap_err();
    assert_eq!(err.group, "interrupt_enable");
    assert!(err.available.contains(&"double_tap"));

    update.set_flag("freefall", true).unwrap();
    assert_eq!(update.freefall, Some(true));
}

#[test]
fn test_interrupt_enable_groups_by_register() {
    let (mut driver, mock) = create_mock_driver();
    mock.set_register(REG_INT_SET_0, 0b0000_0111);
    mock.clear_operations();

    driver
        .update_interrupt_enable(&InterruptEnableUpdate {
            double_tap: Some(true),
            active_y: Some(false),
            freefall: Some(true),
            ..Default::default()
        })
        .unwrap();

    assert_eq!(mock.get_register(REG_INT_SET_0), 0b0001_0101);
    assert_eq!(mock.get_register(REG_INT_SET_1), 0b0000_1000);
    assert_eq!(mock.written_addresses(), vec![REG_INT_SET_0, REG_INT_SET_1]);

    let enabled = driver.interrupt_enable().unwrap();
    assert!(enabled.double_tap);
    assert!(enabled.active_x);
    assert!(!enabled.active_y);
    assert!(enabled.freefall);
    assert!(!enabled.new_data);
}

#[test]
fn test_new_data_enable_gates_status_reads() {
    let (mut driver, mock) = create_mock_driver();
    mock.set_data_ready(false);
    mock.clear_operations();

    // Disabled: the status bit is not maintained, so it is not read
    assert!(driver.new_data_ready().unwrap());
    assert_eq!(mock.read_count(REG_DATA_INT), 0);

    driver
        .update_interrupt_enable(&InterruptEnableUpdate {
            new_data: Some(true),
            ..Default::default()
        })
        .unwrap();
    assert!(!driver.new_data_ready().unwrap());
    mock.set_data_ready(true);
    assert!(driver.new_data_ready().unwrap());
    assert_eq!(mock.read_count(REG_DATA_INT), 2);
}

#[test]
fn test_new_data_enable_read_at_construction() {
    let mock = MockInterface::new();
    mock.set_register(REG_INT_SET_1, 0b0001_0000);
    mock.set_data_ready(false);

    let mut driver = Msa301Driver::new(mock.clone()).unwrap();

    assert!(!driver.new_data_ready().unwrap());
}

#[test]
fn test_interrupt_map() {
    let (mut driver, mock) = create_mock_driver();

    driver
        .update_interrupt_map(&InterruptMapUpdate {
            freefall: Some(true),
            new_data: Some(true),
            ..Default::default()
        })
        .unwrap();

    assert_eq!(mock.get_register(REG_INT_MAP_0), 0b0000_0001);
    assert_eq!(mock.get_register(REG_INT_MAP_1), 0b0000_0001);
    let map = driver.interrupt_map().unwrap();
    assert!(map.freefall && map.new_data);
    assert!(!map.orient);
}

#[test]
fn test_interrupt_pin() {
    let (mut driver, mock) = create_mock_driver();
    mock.set_register(REG_INT_CONFIG, 0b0000_0001);

    driver
        .update_interrupt_pin(&InterruptPinUpdate {
            open_drain: Some(true),
            active_high: Some(false),
        })
        .unwrap();

    assert_eq!(mock.get_register(REG_INT_CONFIG), 0b0000_0010);
    let pin = driver.interrupt_pin_config().unwrap();
    assert!(pin.open_drain);
    assert!(!pin.active_high);
}
