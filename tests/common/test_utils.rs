//! Test utilities and helper functions

use crate::common::mock_interface::MockInterface;
use msa301::{Msa301Config, Msa301Driver, PowerMode};

/// Mock delay that records the requested time instead of sleeping
#[derive(Debug, Default, Clone, Copy)]
pub struct MockDelay {
    /// Total requested delay in milliseconds
    pub total_ms: u64,
}

impl embedded_hal::delay::DelayNs for MockDelay {
    fn delay_ns(&mut self, _ns: u32) {
        // No-op for testing
    }

    fn delay_ms(&mut self, ms: u32) {
        self.total_ms += u64::from(ms);
    }
}

/// Create a mock driver for testing
/// Returns (driver, interface) where interface is a clone that shares state with the driver
pub fn create_mock_driver() -> (Msa301Driver<MockInterface>, MockInterface) {
    let interface = MockInterface::new();
    let interface_clone = interface.clone();
    let driver = Msa301Driver::new(interface).expect("Failed to create mock driver");
    (driver, interface_clone)
}

/// Create a mock driver already switched to normal power
pub fn create_running_driver() -> (Msa301Driver<MockInterface>, MockInterface) {
    let interface = MockInterface::new();
    let interface_clone = interface.clone();
    let config = Msa301Config {
        power_mode: Some(PowerMode::Normal),
        ..Default::default()
    };
    let driver =
        Msa301Driver::with_config(interface, config).expect("Failed to create mock driver");
    (driver, interface_clone)
}

/// Assert that two floating point values are approximately equal
pub fn assert_float_eq(a: f64, b: f64, epsilon: f64) {
    let diff = (a - b).abs();
    assert!(
        diff < epsilon,
        "Values not equal within epsilon: {} vs {} (diff: {}, epsilon: {})",
        a,
        b,
        diff,
        epsilon
    );
}
