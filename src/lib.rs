#![cfg_attr(not(feature = "std"), no_std)]
#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod axes;
pub mod calibration;
pub mod device;
pub mod interface;
pub mod interrupt;
pub mod math;
pub mod motion;
pub mod offsets;
pub mod power;
pub mod registers;
pub mod sensor;

// Re-export main types
pub use axes::{AxesConfig, AxesConfigUpdate};
pub use calibration::{CalibrationReport, CalibrationStage, DEFAULT_SETTLE_MS};
pub use device::{AccelData, Acceleration, HardwareOffsets, Msa301Config, Msa301Driver, OffsetsUpdate};
pub use interface::I2cInterface;
pub use interrupt::{
    InterruptEnable, InterruptEnableUpdate, InterruptLatch, InterruptMap, InterruptMapUpdate,
    InterruptPinConfig, InterruptPinUpdate, MotionInterruptStatus, Orientation, OrientationStatus,
    TapActivityStatus,
};
pub use math::{DegenerateGeometry, Vector3, Welford, sphere_center};
pub use motion::{FallMode, OrientMode, TapDuration, TapQuietDuration, TapShockDuration, ZBlockMode};
#[cfg(feature = "std")]
pub use offsets::FileOffsetStore;
pub use offsets::{MemoryOffsetStore, OffsetStore, SoftwareCalibration};
pub use power::{LowPowerOutputDataRate, OutputDataRate, PowerMode};
pub use registers::{FieldValue, InvalidAttribute, ValidationError};
pub use sensor::{Range, Resolution, Units};

/// Default MSA301 I2C address
///
/// The MSA301 has a fixed 7-bit address; use [`I2cInterface::default()`]
/// for this configuration.
pub const I2C_ADDRESS_DEFAULT: u8 = 0x26;

/// Expected value of the `PART_ID` (`WHO_AM_I`) register
pub const PART_ID: u8 = 0x13;

/// Driver errors
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Communication error with the device
    Bus(E),
    /// The identity register did not read [`PART_ID`] (contains the actual value read)
    DeviceNotFound(u8),
    /// A setting was outside the legal domain of its field; nothing was written
    Validation(ValidationError),
    /// A named configuration flag does not exist; nothing was written
    InvalidAttribute(InvalidAttribute),
    /// The four calibration points are coplanar or collinear
    DegenerateGeometry,
    /// A field read back a bit pattern that has no symbolic value
    UnrecognizedFieldValue {
        /// Field name
        field: &'static str,
        /// Field code as read from the register
        bits: u8,
    },
    /// The data-ready flag stayed clear for the configured number of polls
    DataReadyTimeout,
}

impl<E> From<E> for Error<E> {
    fn from(error: E) -> Self {
        Self::Bus(error)
    }
}
