//! Common test utilities and mock implementations

pub mod test_utils;

pub use mock_interface::{MockError, MockInterface, Operation};
pub use test_utils::{MockDelay, assert_float_eq, create_mock_driver, create_running_driver};
