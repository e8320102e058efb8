//! Register definitions for the MSA301
//!
//! The register map is declared with the `device_driver` DSL, which
//! generates a typed accessor per register (`device.res_range().modify(..)`)
//! and a getter/setter per field. On top of the generated device this
//! module holds:
//!
//! - the register addresses, for raw bursts and for tests,
//! - the [`FieldValue`] trait that ties a symbolic type to a fixed
//!   bidirectional `(value, code)` table,
//! - the error types raised when a caller passes an illegal value,
//! - the factory-default table applied by a bulk reset.
//!
//! Field codes in the tables are right-aligned, exactly as the generated
//! `uint` field accessors take and return them.

use core::fmt;

device_driver::create_device!(
    device_name: Msa301,
    dsl: {
        config {
            type RegisterAddressType = u8;
            type DefaultByteOrder = LE;
        }

        // ==================== STATUS REGISTERS ====================

        /// SOFT_RESET - Soft reset trigger (0x00)
        register SoftReset {
            const ADDRESS = 0x00;
            const SIZE_BITS = 8;

            /// Writing 1 returns every register to its factory value
            soft_reset: bool = 5,
        },
        /// PART_ID - Device identity (0x01)
        register PartId {
            const ADDRESS = 0x01;
            const SIZE_BITS = 8;

            /// Part ID, 0x13 for an MSA301
            part_id: uint = 0..8,
        },
        /// MOTION_INTERRUPT - Motion interrupt status (0x09)
        register MotionInterrupt {
            const ADDRESS = 0x09;
            const SIZE_BITS = 8;

            freefall: bool = 0,
            active: bool = 2,
            double_tap: bool = 4,
            single_tap: bool = 5,
            orient: bool = 6,
        },
        /// DATA_INTERRUPT - New data status (0x0A)
        register DataInterrupt {
            const ADDRESS = 0x0A;
            const SIZE_BITS = 8;

            /// Set while a new sample is available
            new_data: bool = 0,
        },
        /// TAP_ACTIVE_STATUS - Axis and sign of the last tap and activity (0x0B)
        register TapActiveStatus {
            const ADDRESS = 0x0B;
            const SIZE_BITS = 8;

            active_first_z: bool = 0,
            active_first_y: bool = 1,
            active_first_x: bool = 2,
            active_sign: bool = 3,
            tap_first_z: bool = 4,
            tap_first_y: bool = 5,
            tap_first_x: bool = 6,
            tap_sign: bool = 7,
        },
        /// ORIENT_STATUS - Orientation status (0x0C)
        register OrientStatus {
            const ADDRESS = 0x0C;
            const SIZE_BITS = 8;

            /// X/Y orientation ordinal
            orient: uint = 4..6,
            /// Z axis points downward
            z_down: bool = 6,
        },

        // ==================== CONFIGURATION REGISTERS ====================

        /// RES_RANGE - Resolution and full-scale range (0x0F)
        register ResRange {
            const ADDRESS = 0x0F;
            const SIZE_BITS = 8;
            const RESET_VALUE = 0x00;

            range: uint = 0..2,
            resolution: uint = 2..4,
        },
        /// ODR_AXIS - Output data rate and axis disable bits (0x10)
        register OdrAxis {
            const ADDRESS = 0x10;
            const SIZE_BITS = 8;
            const RESET_VALUE = 0x0F;

            odr: uint = 0..4,
            z_axis_disable: bool = 5,
            y_axis_disable: bool = 6,
            x_axis_disable: bool = 7,
        },
        /// PWR_MODE_BW - Power mode and low-power bandwidth (0x11)
        register PwrModeBw {
            const ADDRESS = 0x11;
            const SIZE_BITS = 8;
            const RESET_VALUE = 0x9E;

            low_power_bw: uint = 1..5,
            power_mode: uint = 6..8,
        },
        /// SWAP_POLARITY - Axis polarity and X/Y swap (0x12)
        register SwapPolarity {
            const ADDRESS = 0x12;
            const SIZE_BITS = 8;
            const RESET_VALUE = 0x00;

            xy_swap: bool = 0,
            z_axis_invert: bool = 1,
            y_axis_invert: bool = 2,
            x_axis_invert: bool = 3,
        },
        /// INT_SET_0 - Motion interrupt enables (0x16)
        register IntSet0 {
            const ADDRESS = 0x16;
            const SIZE_BITS = 8;
            const RESET_VALUE = 0x00;

            active_x: bool = 0,
            active_y: bool = 1,
            active_z: bool = 2,
            double_tap: bool = 4,
            single_tap: bool = 5,
            orient: bool = 6,
        },
        /// INT_SET_1 - New data and freefall interrupt enables (0x17)
        register IntSet1 {
            const ADDRESS = 0x17;
            const SIZE_BITS = 8;
            const RESET_VALUE = 0x00;

            freefall: bool = 3,
            new_data: bool = 4,
        },
        /// INT_MAP_0 - Motion interrupts routed to INT (0x19)
        register IntMap0 {
            const ADDRESS = 0x19;
            const SIZE_BITS = 8;
            const RESET_VALUE = 0x00;

            freefall: bool = 0,
            active: bool = 2,
            double_tap: bool = 4,
            single_tap: bool = 5,
            orient: bool = 6,
        },
        /// INT_MAP_1 - New data interrupt routed to INT (0x1A)
        register IntMap1 {
            const ADDRESS = 0x1A;
            const SIZE_BITS = 8;
            const RESET_VALUE = 0x00;

            new_data: bool = 0,
        },
        /// INT_CONFIG - INT pin electrical behaviour (0x20)
        register IntConfig {
            const ADDRESS = 0x20;
            const SIZE_BITS = 8;
            const RESET_VALUE = 0x00;

            active_high: bool = 0,
            open_drain: bool = 1,
        },
        /// INT_LATCH - Latch mode and latch reset (0x21)
        register IntLatch {
            const ADDRESS = 0x21;
            const SIZE_BITS = 8;
            const RESET_VALUE = 0x00;

            latch: uint = 0..4,
            /// Clears every latched interrupt, self-clearing
            reset_int: bool = 7,
        },
        /// FREEFALL_DUR - Freefall duration, `(value + 1) * 2 ms` (0x22)
        register FreefallDur {
            const ADDRESS = 0x22;
            const SIZE_BITS = 8;
            const RESET_VALUE = 0x09;

            duration: uint = 0..8,
        },
        /// FREEFALL_TH - Freefall threshold, `value * 7.8125 mg` (0x23)
        register FreefallTh {
            const ADDRESS = 0x23;
            const SIZE_BITS = 8;
            const RESET_VALUE = 0x30;

            threshold: uint = 0..8,
        },
        /// FREEFALL_HY - Freefall hysteresis and mode (0x24)
        register FreefallHy {
            const ADDRESS = 0x24;
            const SIZE_BITS = 8;
            const RESET_VALUE = 0x01;

            hysteresis: uint = 0..2,
            mode: uint = 2..3,
        },
        /// ACTIVE_DUR - Activity duration, `value + 1` ms (0x27)
        register ActiveDur {
            const ADDRESS = 0x27;
            const SIZE_BITS = 8;
            const RESET_VALUE = 0x00;

            duration: uint = 0..2,
        },
        /// ACTIVE_TH - Activity threshold (0x28)
        register ActiveTh {
            const ADDRESS = 0x28;
            const SIZE_BITS = 8;
            const RESET_VALUE = 0x14;

            threshold: uint = 0..8,
        },
        /// TAP_DUR - Tap quiet, shock and double-tap window (0x2A)
        register TapDur {
            const ADDRESS = 0x2A;
            const SIZE_BITS = 8;
            const RESET_VALUE = 0x04;

            duration: uint = 0..3,
            shock: uint = 6..7,
            quiet: uint = 7..8,
        },
        /// TAP_TH - Tap threshold (0x2B)
        register TapTh {
            const ADDRESS = 0x2B;
            const SIZE_BITS = 8;
            const RESET_VALUE = 0x0A;

            threshold: uint = 0..5,
        },
        /// ORIENT_HY - Orientation hysteresis, z-blocking and mode (0x2C)
        register OrientHy {
            const ADDRESS = 0x2C;
            const SIZE_BITS = 8;
            const RESET_VALUE = 0x18;

            mode: uint = 0..2,
            z_block_mode: uint = 2..4,
            hysteresis: uint = 4..7,
        },
        /// Z_BLOCK - Z-blocking threshold (0x2D)
        register ZBlock {
            const ADDRESS = 0x2D;
            const SIZE_BITS = 8;
            const RESET_VALUE = 0x08;

            threshold: uint = 0..4,
        },
        /// OFFSET_COMP_X - Hardware X offset, signed, 3.90625 mg/LSB (0x38)
        register OffsetCompX {
            const ADDRESS = 0x38;
            const SIZE_BITS = 8;
            const RESET_VALUE = 0x00;

            offset: int = 0..8,
        },
        /// OFFSET_COMP_Y - Hardware Y offset, signed, 3.90625 mg/LSB (0x39)
        register OffsetCompY {
            const ADDRESS = 0x39;
            const SIZE_BITS = 8;
            const RESET_VALUE = 0x00;

            offset: int = 0..8,
        },
        /// OFFSET_COMP_Z - Hardware Z offset, signed, 3.90625 mg/LSB (0x3A)
        register OffsetCompZ {
            const ADDRESS = 0x3A;
            const SIZE_BITS = 8;
            const RESET_VALUE = 0x00;

            offset: int = 0..8,
        },
    }
);

// ==================== ADDRESSES ====================

/// `SOFT_RESET` - Soft reset (write-only trigger)
pub const REG_SOFT_RESET: u8 = 0x00;
/// `PART_ID` - Device identity
pub const REG_PART_ID: u8 = 0x01;
/// `ACC_X_LSB` - First byte of the X/Y/Z output block (6 bytes, little-endian)
pub const REG_ACC_X_LSB: u8 = 0x02;
/// `MOTION_INTERRUPT` - Motion interrupt status
pub const REG_MOTION_INT: u8 = 0x09;
/// `DATA_INTERRUPT` - New-data interrupt status
pub const REG_DATA_INT: u8 = 0x0A;
/// `TAP_ACTIVE_STATUS` - Tap and activity interrupt details
pub const REG_TAP_ACTIVE_STATUS: u8 = 0x0B;
/// `ORIENT_STATUS` - Orientation status
pub const REG_ORIENT_STATUS: u8 = 0x0C;
/// `RES_RANGE` - Resolution and full-scale range
pub const REG_RES_RANGE: u8 = 0x0F;
/// `ODR_AXIS` - Output data rate and axis disable bits
pub const REG_ODR_AXIS: u8 = 0x10;
/// `PWR_MODE_BW` - Power mode and low-power bandwidth
pub const REG_PWR_MODE_BW: u8 = 0x11;
/// `SWAP_POLARITY` - Axis polarity and X/Y swap
pub const REG_SWAP_POLARITY: u8 = 0x12;
/// `INT_SET_0` - Motion interrupt enables
pub const REG_INT_SET_0: u8 = 0x16;
/// `INT_SET_1` - New-data and freefall interrupt enables
pub const REG_INT_SET_1: u8 = 0x17;
/// `INT_MAP_0` - Motion interrupt to INT pin mapping
pub const REG_INT_MAP_0: u8 = 0x19;
/// `INT_MAP_1` - New-data interrupt to INT pin mapping
pub const REG_INT_MAP_1: u8 = 0x1A;
/// `INT_CONFIG` - INT pin electrical behaviour
pub const REG_INT_CONFIG: u8 = 0x20;
/// `INT_LATCH` - Interrupt latch mode and latch reset
pub const REG_INT_LATCH: u8 = 0x21;
/// `FREEFALL_DUR` - Freefall duration
pub const REG_FREEFALL_DUR: u8 = 0x22;
/// `FREEFALL_TH` - Freefall threshold
pub const REG_FREEFALL_TH: u8 = 0x23;
/// `FREEFALL_HY` - Freefall mode and hysteresis
pub const REG_FREEFALL_HY: u8 = 0x24;
/// `ACTIVE_DUR` - Activity duration
pub const REG_ACTIVE_DUR: u8 = 0x27;
/// `ACTIVE_TH` - Activity threshold
pub const REG_ACTIVE_TH: u8 = 0x28;
/// `TAP_DUR` - Tap quiet, shock and duration
pub const REG_TAP_DUR: u8 = 0x2A;
/// `TAP_TH` - Tap threshold
pub const REG_TAP_TH: u8 = 0x2B;
/// `ORIENT_HY` - Orientation hysteresis, z-blocking and mode
pub const REG_ORIENT_HY: u8 = 0x2C;
/// `Z_BLOCK` - Z-blocking threshold
pub const REG_Z_BLOCK: u8 = 0x2D;
/// `OFFSET_COMP_X` - Hardware X offset
pub const REG_OFFSET_X: u8 = 0x38;
/// `OFFSET_COMP_Y` - Hardware Y offset
pub const REG_OFFSET_Y: u8 = 0x39;
/// `OFFSET_COMP_Z` - Hardware Z offset
pub const REG_OFFSET_Z: u8 = 0x3A;

/// Hardware offset resolution in mg per LSB
pub const OFFSET_LSB_MG: f64 = 3.906_25;

/// Factory defaults of every read/write register, `(address, value)`
///
/// Mirrors the `RESET_VALUE`s of the register map above.
pub const RESET_DEFAULTS: [(u8, u8); 22] = [
    (REG_RES_RANGE, 0x00),
    (REG_ODR_AXIS, 0x0F),
    (REG_PWR_MODE_BW, 0x9E),
    (REG_SWAP_POLARITY, 0x00),
    (REG_INT_SET_0, 0x00),
    (REG_INT_SET_1, 0x00),
    (REG_INT_MAP_0, 0x00),
    (REG_INT_MAP_1, 0x00),
    (REG_INT_CONFIG, 0x00),
    (REG_INT_LATCH, 0x00),
    (REG_FREEFALL_DUR, 0x09),
    (REG_FREEFALL_TH, 0x30),
    (REG_FREEFALL_HY, 0x01),
    (REG_ACTIVE_DUR, 0x00),
    (REG_ACTIVE_TH, 0x14),
    (REG_TAP_DUR, 0x04),
    (REG_TAP_TH, 0x0A),
    (REG_ORIENT_HY, 0x18),
    (REG_Z_BLOCK, 0x08),
    (REG_OFFSET_X, 0x00),
    (REG_OFFSET_Y, 0x00),
    (REG_OFFSET_Z, 0x00),
];

/// A symbolic setting backed by a fixed bidirectional `(value, code)` table
///
/// The table must be a bijection whose codes fit in `WIDTH` bits; every
/// table in this crate is checked by a unit test.
pub trait FieldValue: Copy + PartialEq + Sized + 'static {
    /// Field name used in errors
    const NAME: &'static str;
    /// Width of the register field in bits
    const WIDTH: u32;
    /// Human-readable list of the legal values
    const DOMAIN: &'static str;
    /// Bidirectional value/code table
    const TABLE: &'static [(Self, u8)];

    /// Encode into a right-aligned field code
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] listing the legal values if the value has
    /// no table entry.
    fn encode(self) -> Result<u8, ValidationError> {
        Self::TABLE
            .iter()
            .find(|(value, _)| *value == self)
            .map(|&(_, code)| code)
            .ok_or(ValidationError::new(Self::NAME, Self::DOMAIN))
    }

    /// Decode a field code, `None` if no table entry matches
    #[must_use]
    fn decode(code: u8) -> Option<Self> {
        Self::TABLE
            .iter()
            .find(|(_, c)| *c == code)
            .map(|&(value, _)| value)
    }
}

/// A caller-supplied value was outside a field's legal domain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ValidationError {
    /// Offending field
    pub field: &'static str,
    /// Legal domain of the field
    pub domain: &'static str,
}

impl ValidationError {
    /// Create a validation error for `field`
    #[must_use]
    pub const fn new(field: &'static str, domain: &'static str) -> Self {
        Self { field, domain }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: allowed values are {}", self.field, self.domain)
    }
}

/// A configuration flag name does not exist in the addressed group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InvalidAttribute {
    /// Flag group that was addressed
    pub group: &'static str,
    /// Flag names the group knows
    pub available: &'static [&'static str],
}

impl fmt::Display for InvalidAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} flag, available flags are:", self.group)?;
        for name in self.available {
            write!(f, " {name}")?;
        }
        Ok(())
    }
}

/// Position of `name` in a flag group's name list
pub(crate) fn flag_index(names: &[&str], name: &str) -> Option<usize> {
    names.iter().position(|candidate| *candidate == name)
}
