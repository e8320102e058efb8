//! Axis enable, polarity and swap configuration
//!
//! The three disable bits live in `ODR_AXIS` next to the output data rate;
//! polarity and the X/Y swap live in `SWAP_POLARITY`. Both registers are
//! updated read-modify-write so the neighbouring fields are preserved.

use crate::registers::{InvalidAttribute, flag_index};

const AXES_NAMES: &[&str] = &[
    "x_axis_disable",
    "y_axis_disable",
    "z_axis_disable",
    "x_axis_invert",
    "y_axis_invert",
    "z_axis_invert",
    "xy_swap",
];

/// Axis configuration as read from the device
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[allow(clippy::struct_excessive_bools)]
pub struct AxesConfig {
    /// X axis output disabled
    pub x_axis_disable: bool,
    /// Y axis output disabled
    pub y_axis_disable: bool,
    /// Z axis output disabled
    pub z_axis_disable: bool,
    /// X axis polarity inverted
    pub x_axis_invert: bool,
    /// Y axis polarity inverted
    pub y_axis_invert: bool,
    /// Z axis polarity inverted
    pub z_axis_invert: bool,
    /// X and Y outputs exchanged
    pub xy_swap: bool,
}

impl AxesConfig {
    /// All axes enabled, no inversion, no swap
    #[must_use]
    pub const fn is_identity(&self) -> bool {
        !(self.x_axis_disable
            || self.y_axis_disable
            || self.z_axis_disable
            || self.x_axis_invert
            || self.y_axis_invert
            || self.z_axis_invert
            || self.xy_swap)
    }
}

/// Sparse update of [`AxesConfig`]; `None` leaves a flag untouched
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[allow(missing_docs)]
pub struct AxesConfigUpdate {
    pub x_axis_disable: Option<bool>,
    pub y_axis_disable: Option<bool>,
    pub z_axis_disable: Option<bool>,
    pub x_axis_invert: Option<bool>,
    pub y_axis_invert: Option<bool>,
    pub z_axis_invert: Option<bool>,
    pub xy_swap: Option<bool>,
}

impl AxesConfigUpdate {
    /// Update that enables every axis and clears inversion and swap
    #[must_use]
    pub const fn identity() -> Self {
        Self {
            x_axis_disable: Some(false),
            y_axis_disable: Some(false),
            z_axis_disable: Some(false),
            x_axis_invert: Some(false),
            y_axis_invert: Some(false),
            z_axis_invert: Some(false),
            xy_swap: Some(false),
        }
    }

    pub(crate) const fn values(&self) -> [Option<bool>; 7] {
        [
            self.x_axis_disable,
            self.y_axis_disable,
            self.z_axis_disable,
            self.x_axis_invert,
            self.y_axis_invert,
            self.z_axis_invert,
            self.xy_swap,
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
        let slot = match flag_index(AXES_NAMES, name) {
            Some(0) => &mut self.x_axis_disable,
            Some(1) => &mut self.y_axis_disable,
            Some(2) => &mut self.z_axis_disable,
            Some(3) => &mut self.x_axis_invert,
            Some(4) => &mut self.y_axis_invert,
            Some(5) => &mut self.z_axis_invert,
            Some(6) => &mut self.xy_swap,
            _ => {
                return Err(InvalidAttribute {
                    group: "axes",
                    available: AXES_NAMES,
                });
            }
        };
        *slot = Some(value);
        Ok(())
    }
}

impl From<AxesConfig> for AxesConfigUpdate {
    fn from(state: AxesConfig) -> Self {
        Self {
            x_axis_disable: Some(state.x_axis_disable),
            y_axis_disable: Some(state.y_axis_disable),
            z_axis_disable: Some(state.z_axis_disable),
            x_axis_invert: Some(state.x_axis_invert),
            y_axis_invert: Some(state.y_axis_invert),
            z_axis_invert: Some(state.z_axis_invert),
            xy_swap: Some(state.xy_swap),
        }
    }
}
