//! Interrupt configuration and status
//!
//! The MSA301 has a single interrupt pin (INT) that can be driven by:
//! - Orientation change
//! - Single and double tap
//! - Activity (per-axis slope)
//! - Freefall
//! - New data
//!
//! Enabling, mapping and pin behaviour are updated with sparse `*Update`
//! structs: fields left as `None` keep their current hardware state. The
//! matching full-state structs are returned by the query methods.
//!
//! # Example
//!
//! ```ignore
//! # use msa301::{Msa301Driver, InterruptEnableUpdate, InterruptMapUpdate};
//! # let mut accel: Msa301Driver<_> = todo!();
//! // Route double taps to the INT pin, leaving every other interrupt untouched
//! accel.update_interrupt_enable(&InterruptEnableUpdate {
//!     double_tap: Some(true),
//!     ..Default::default()
//! })?;
//! accel.update_interrupt_map(&InterruptMapUpdate {
//!     double_tap: Some(true),
//!     ..Default::default()
//! })?;
//!
//! let status = accel.motion_interrupts()?;
//! if status.double_tap {
//!     // ...
//! }
//! # Ok::<(), msa301::Error<()>>(())
//! ```

use crate::registers::{FieldValue, InvalidAttribute, flag_index};

const INT_ENABLE_NAMES: &[&str] = &[
    "orient",
    "single_tap",
    "double_tap",
    "active_z",
    "active_y",
    "active_x",
    "new_data",
    "freefall",
];

const INT_MAP_NAMES: &[&str] = &[
    "orient",
    "single_tap",
    "double_tap",
    "active",
    "freefall",
    "new_data",
];

const INT_PIN_NAMES: &[&str] = &["open_drain", "active_high"];

/// Interrupt sources currently enabled (`INT_SET_0`, `INT_SET_1`)
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[allow(clippy::struct_excessive_bools)]
pub struct InterruptEnable {
    /// Orientation change interrupt
    pub orient: bool,
    /// Single tap interrupt
    pub single_tap: bool,
    /// Double tap interrupt
    pub double_tap: bool,
    /// Activity interrupt on the Z axis
    pub active_z: bool,
    /// Activity interrupt on the Y axis
    pub active_y: bool,
    /// Activity interrupt on the X axis
    pub active_x: bool,
    /// New data interrupt (also gates the data-ready poll)
    pub new_data: bool,
    /// Freefall interrupt
    pub freefall: bool,
}

impl InterruptEnable {
    /// Check if any interrupt source is enabled
    #[must_use]
    pub const fn any_enabled(&self) -> bool {
        self.orient
            || self.single_tap
            || self.double_tap
            || self.active_z
            || self.active_y
            || self.active_x
            || self.new_data
            || self.freefall
    }
}

/// Sparse update of [`InterruptEnable`]; `None` leaves a flag untouched
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[allow(missing_docs)]
pub struct InterruptEnableUpdate {
    pub orient: Option<bool>,
    pub single_tap: Option<bool>,
    pub double_tap: Option<bool>,
    pub active_z: Option<bool>,
    pub active_y: Option<bool>,
    pub active_x: Option<bool>,
    pub new_data: Option<bool>,
    pub freefall: Option<bool>,
}

impl InterruptEnableUpdate {
    pub(crate) const fn values(&self) -> [Option<bool>; 8] {
        [
            self.orient,
            self.single_tap,
            self.double_tap,
            self.active_z,
            self.active_y,
            self.active_x,
            self.new_data,
            self.freefall,
        ]
    }

    /// `true` when no flag is addressed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values().iter().all(Option::is_none)
    }

    /// Address a flag by name
    ///
    /// # Errors
    ///
    /// Returns [`InvalidAttribute`] if the group has no flag called `name`.
    pub fn set_flag(&mut self, name: &str, value: bool) -> Result<(), InvalidAttribute> {
        let slot = match flag_index(INT_ENABLE_NAMES, name) {
            Some(0) => &mut self.orient,
            Some(1) => &mut self.single_tap,
            Some(2) => &mut self.double_tap,
            Some(3) => &mut self.active_z,
            Some(4) => &mut self.active_y,
            Some(5) => &mut self.active_x,
            Some(6) => &mut self.new_data,
            Some(7) => &mut self.freefall,
            _ => {
                return Err(InvalidAttribute {
                    group: "interrupt_enable",
                    available: INT_ENABLE_NAMES,
                });
            }
        };
        *slot = Some(value);
        Ok(())
    }
}

impl From<InterruptEnable> for InterruptEnableUpdate {
    fn from(state: InterruptEnable) -> Self {
        Self {
            orient: Some(state.orient),
            single_tap: Some(state.single_tap),
            double_tap: Some(state.double_tap),
            active_z: Some(state.active_z),
            active_y: Some(state.active_y),
            active_x: Some(state.active_x),
            new_data: Some(state.new_data),
            freefall: Some(state.freefall),
        }
    }
}

/// Interrupt sources routed to the INT pin (`INT_MAP_0`, `INT_MAP_1`)
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[allow(clippy::struct_excessive_bools, missing_docs)]
pub struct InterruptMap {
    pub orient: bool,
    pub single_tap: bool,
    pub double_tap: bool,
    pub active: bool,
    pub freefall: bool,
    pub new_data: bool,
}

/// Sparse update of [`InterruptMap`]; `None` leaves a flag untouched
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[allow(missing_docs)]
pub struct InterruptMapUpdate {
    pub orient: Option<bool>,
    pub single_tap: Option<bool>,
    pub double_tap: Option<bool>,
    pub active: Option<bool>,
    pub freefall: Option<bool>,
    pub new_data: Option<bool>,
}

impl InterruptMapUpdate {
    pub(crate) const fn values(&self) -> [Option<bool>; 6] {
        [
            self.orient,
            self.single_tap,
            self.double_tap,
            self.active,
            self.freefall,
            self.new_data,
        ]
    }

    /// `true` when no flag is addressed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values().iter().all(Option::is_none)
    }

    /// Address a flag by name
    ///
    /// # Errors
    ///
    /// Returns [`InvalidAttribute`] if the group has no flag called `name`.
    pub fn set_flag(&mut self, name: &str, value: bool) -> Result<(), InvalidAttribute> {
        let slot = match flag_index(INT_MAP_NAMES, name) {
            Some(0) => &mut self.orient,
            Some(1) => &mut self.single_tap,
            Some(2) => &mut self.double_tap,
            Some(3) => &mut self.active,
            Some(4) => &mut self.freefall,
            Some(5) => &mut self.new_data,
            _ => {
                return Err(InvalidAttribute {
                    group: "interrupt_map",
                    available: INT_MAP_NAMES,
                });
            }
        };
        *slot = Some(value);
        Ok(())
    }
}

/// INT pin electrical behaviour (`INT_CONFIG`)
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InterruptPinConfig {
    /// Open-drain (true) or push-pull (false)
    pub open_drain: bool,
    /// Active high (true) or active low (false)
    pub active_high: bool,
}

/// Sparse update of [`InterruptPinConfig`]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[allow(missing_docs)]
pub struct InterruptPinUpdate {
    pub open_drain: Option<bool>,
    pub active_high: Option<bool>,
}

impl InterruptPinUpdate {
    pub(crate) const fn values(&self) -> [Option<bool>; 2] {
        [self.open_drain, self.active_high]
    }

    /// `true` when no flag is addressed
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.open_drain.is_none() && self.active_high.is_none()
    }

    /// Address a flag by name
    ///
    /// # Errors
    ///
    /// Returns [`InvalidAttribute`] if the group has no flag called `name`.
    pub fn set_flag(&mut self, name: &str, value: bool) -> Result<(), InvalidAttribute> {
        let slot = match flag_index(INT_PIN_NAMES, name) {
            Some(0) => &mut self.open_drain,
            Some(1) => &mut self.active_high,
            _ => {
                return Err(InvalidAttribute {
                    group: "interrupt_pin",
                    available: INT_PIN_NAMES,
                });
            }
        };
        *slot = Some(value);
        Ok(())
    }
}

/// Interrupt latching behaviour (`INT_LATCH` bits 3:0)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[allow(missing_docs)]
pub enum InterruptLatch {
    /// Interrupts follow the detection state (factory default)
    NonLatched,
    Ms250,
    Ms500,
    S1,
    S2,
    S4,
    S8,
    /// Latched until [`reset_latched_interrupts`](crate::Msa301Driver::reset_latched_interrupts)
    Latched,
    Ms1,
    Ms2,
    Ms25,
    Ms50,
    Ms100,
}

impl FieldValue for InterruptLatch {
    const NAME: &'static str = "interrupt_latch";
    const WIDTH: u32 = 4;
    const DOMAIN: &'static str =
        "NonLatched, Ms250, Ms500, S1, S2, S4, S8, Latched, Ms1, Ms2, Ms25, Ms50, Ms100";
    const TABLE: &'static [(Self, u8)] = &[
        (Self::NonLatched, 0b0000),
        (Self::Ms250, 0b0001),
        (Self::Ms500, 0b0010),
        (Self::S1, 0b0011),
        (Self::S2, 0b0100),
        (Self::S4, 0b0101),
        (Self::S8, 0b0110),
        (Self::Latched, 0b0111),
        (Self::Ms1, 0b1010),
        (Self::Ms2, 0b1011),
        (Self::Ms25, 0b1100),
        (Self::Ms50, 0b1101),
        (Self::Ms100, 0b1110),
    ];

    fn decode(code: u8) -> Option<Self> {
        match code {
            0b1000 => Some(Self::NonLatched),
            0b1111 => Some(Self::Latched),
            code => Self::TABLE
                .iter()
                .find(|(_, c)| *c == code)
                .map(|&(value, _)| value),
        }
    }
}

/// Motion interrupt status (`MOTION_INTERRUPT`)
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[allow(clippy::struct_excessive_bools)]
pub struct MotionInterruptStatus {
    /// Orientation changed
    pub orient: bool,
    /// Single tap detected
    pub single_tap: bool,
    /// Double tap detected
    pub double_tap: bool,
    /// Activity detected
    pub active: bool,
    /// Freefall detected
    pub freefall: bool,
}

impl MotionInterruptStatus {
    /// Check if any interrupt flag is set
    #[must_use]
    pub const fn any_set(&self) -> bool {
        self.orient || self.single_tap || self.double_tap || self.active || self.freefall
    }
}

/// Which axis triggered the tap and activity interrupts (`TAP_ACTIVE_STATUS`)
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[allow(clippy::struct_excessive_bools)]
pub struct TapActivityStatus {
    /// Tap was negative
    pub tap_negative: bool,
    /// Tap triggered by the X axis
    pub tap_first_x: bool,
    /// Tap triggered by the Y axis
    pub tap_first_y: bool,
    /// Tap triggered by the Z axis
    pub tap_first_z: bool,
    /// Activity slope was negative
    pub active_negative: bool,
    /// Activity triggered by the X axis
    pub active_first_x: bool,
    /// Activity triggered by the Y axis
    pub active_first_y: bool,
    /// Activity triggered by the Z axis
    pub active_first_z: bool,
}

/// X/Y orientation reported by the orientation engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Orientation {
    /// Portrait, upright (ordinal 0)
    PortraitUpright = 0,
    /// Portrait, upside down (ordinal 1)
    PortraitUpsideDown = 1,
    /// Landscape, left (ordinal 2)
    LandscapeLeft = 2,
    /// Landscape, right (ordinal 3)
    LandscapeRight = 3,
}

impl Orientation {
    /// Orientation for a 2-bit ordinal; only the low two bits are used
    #[must_use]
    pub const fn from_ordinal(ordinal: u8) -> Self {
        match ordinal & 0b11 {
            0 => Self::PortraitUpright,
            1 => Self::PortraitUpsideDown,
            2 => Self::LandscapeLeft,
            _ => Self::LandscapeRight,
        }
    }
}

/// Orientation status (`ORIENT_STATUS`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OrientationStatus {
    /// X/Y orientation
    pub orientation: Orientation,
    /// Z axis currently points downward
    pub z_downward: bool,
}

impl OrientationStatus {
    /// Orientation ordinal (0-3)
    #[must_use]
    pub const fn ordinal(&self) -> u8 {
        self.orientation as u8
    }
}
